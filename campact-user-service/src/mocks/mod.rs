//! Mock server helpers for the user service endpoints.

pub mod account;
pub mod session;

use crate::config::{ClientConfig, Scheme, TotpAuth};
pub use mockito;
use mockito::{Matcher, Mock, Server, ServerOpts};
use std::net::SocketAddr;

pub const TOTP_USER: &str = "api_user";
pub const TOTP_SECRET: &str = "shh! a secret!";

pub trait MatchExtension {
    /// Match against the `Cookie` header carrying the session cookie.
    fn match_session_cookie(self, cookie_name: &str, session_id: &str) -> Self;

    /// Match against an `authorization` header for [`TOTP_USER`] with any 8 digit code.
    fn match_totp_auth(self) -> Self;
}

impl MatchExtension for Mock {
    fn match_session_cookie(self, cookie_name: &str, session_id: &str) -> Self {
        self.match_header("cookie", format!("{cookie_name}={session_id};").as_str())
    }

    fn match_totp_auth(self) -> Self {
        self.match_header(
            "authorization",
            Matcher::Regex(format!(r"^Token {TOTP_USER}:\d{{8}}$")),
        )
    }
}

/// Create new server.
#[must_use]
pub fn new() -> Server {
    Server::new_with_opts(ServerOpts {
        host: "127.0.0.1",
        port: 0,
        assert_on_drop: true,
    })
}

/// Plain http configuration pointing at `server`.
///
/// # Panics
/// Panics if the server address is not an ip and port pair.
#[must_use]
pub fn config(server: &Server) -> ClientConfig {
    let address = server
        .host_with_port()
        .parse::<SocketAddr>()
        .expect("mock server listens on an ip address");
    ClientConfig::new(address.ip().to_string())
        .with_scheme(Scheme::Http)
        .with_port(address.port())
}

/// Like [`config`], with totp authentication for [`TOTP_USER`].
#[must_use]
pub fn config_with_totp(server: &Server) -> ClientConfig {
    config(server).with_totp_auth(TotpAuth::new(TOTP_USER, TOTP_SECRET))
}
