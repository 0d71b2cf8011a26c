//! Client for the Campact user service.
//!
//! [`session`] and [`account`] build an [`HttpClient`] from a [`ClientConfig`] and wrap it
//! in a read-mostly view. Views fetch their json document on first access and keep it
//! for their whole lifetime.
//!
//! ```no_run
//! use campact_user_service::{ClientConfig, TotpAuth};
//!
//! let config = ClientConfig::new("weact-adapter.staging.campact.de")
//!     .with_totp_auth(TotpAuth::new("api_user", "shh! a secret!"));
//! let session = campact_user_service::session("abcdef", "campact-session", config)?;
//! if session.has_hard_login_session()? {
//!     println!("{:?}", session.user_id()?);
//! }
//! # Ok::<(), campact_user_service::Error>(())
//! ```

pub mod account;
pub mod client;
pub mod config;
pub mod document;
mod error;
pub mod response;
pub mod session;
pub mod totp;

#[cfg(feature = "mocks")]
pub mod mocks;

pub use account::Account;
pub use client::{Cookies, HttpClient, RequestOptions};
pub use config::{ClientConfig, Scheme, TotpAuth};
pub use error::{Error, ResponseError, Result};
pub use response::Outcome;
pub use secrecy;
pub use session::Session;

use std::sync::Arc;

/// Create a [`Session`] view for the session cookie `cookie_name=session_id`.
///
/// # Errors
/// Returns error if `config` is invalid.
pub fn session(
    session_id: impl Into<String>,
    cookie_name: impl Into<String>,
    config: ClientConfig,
) -> Result<Session> {
    let client = Arc::new(HttpClient::new(config)?);
    Ok(Session::new(client, session_id, cookie_name))
}

/// Create an [`Account`] view for `user_id`.
///
/// # Errors
/// Returns error if `config` is invalid.
pub fn account(user_id: impl Into<String>, config: ClientConfig) -> Result<Account> {
    let client = Arc::new(HttpClient::new(config)?);
    Ok(Account::new(client, user_id))
}
