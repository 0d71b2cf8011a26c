use crate::client::{HttpClient, RequestOptions};
use crate::document::{DocumentCell, dig, dig_str};
use crate::error::Result;
use serde_json::Value;
use std::sync::Arc;

pub(crate) const SESSIONS_PATH: &str = "/v1/sessions";

const PERMISSION_LEVEL_LIMITED: &str = "limited";
const PERMISSION_LEVEL_FULL: &str = "full";

/// Server side session identified by the value of the session cookie.
///
/// The session document is fetched on first access and reused afterwards.
#[derive(Debug)]
pub struct Session {
    client: Arc<HttpClient>,
    session_id: String,
    cookie_name: String,
    document: DocumentCell,
}

impl Session {
    #[must_use]
    pub fn new(
        client: Arc<HttpClient>,
        session_id: impl Into<String>,
        cookie_name: impl Into<String>,
    ) -> Self {
        Self {
            client,
            session_id: session_id.into(),
            cookie_name: cookie_name.into(),
            document: DocumentCell::new(),
        }
    }

    #[must_use]
    pub fn client(&self) -> &Arc<HttpClient> {
        &self.client
    }

    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    #[must_use]
    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Whether the service knows this session.
    ///
    /// # Errors
    /// Returns error if fetching the session failed.
    pub fn exists(&self) -> Result<bool> {
        Ok(dig(&*self.session()?, "/id").is_some())
    }

    /// Id of the user the session belongs to.
    ///
    /// Only string ids are exposed, any other json value is reported as `None`.
    ///
    /// # Errors
    /// Returns error if fetching the session failed.
    pub fn user_id(&self) -> Result<Option<String>> {
        Ok(dig_str(&*self.session()?, "/user_id"))
    }

    /// Whether the session was created by a soft (limited) login.
    ///
    /// # Errors
    /// Returns error if fetching the session failed.
    pub fn has_soft_login_session(&self) -> Result<bool> {
        self.has_permission_level(PERMISSION_LEVEL_LIMITED)
    }

    /// Whether the session was created by a hard (full) login.
    ///
    /// # Errors
    /// Returns error if fetching the session failed.
    pub fn has_hard_login_session(&self) -> Result<bool> {
        self.has_permission_level(PERMISSION_LEVEL_FULL)
    }

    /// Delete the session on the server.
    ///
    /// Returns `false` if the server did not know the session. The cached
    /// document is left untouched.
    ///
    /// # Errors
    /// Returns error if the request failed.
    pub fn destroy(&self) -> Result<bool> {
        let outcome = self.client.delete(SESSIONS_PATH, &self.request_options())?;
        Ok(outcome.is_success())
    }

    fn has_permission_level(&self, level: &str) -> Result<bool> {
        Ok(dig_str(&*self.session()?, "/permission_level").as_deref() == Some(level))
    }

    fn request_options(&self) -> RequestOptions {
        RequestOptions::default().with_cookie(&self.cookie_name, &self.session_id)
    }

    fn session(&self) -> Result<Arc<Value>> {
        self.document.get_or_fetch(|| {
            Ok(self
                .client
                .get(SESSIONS_PATH, &self.request_options())?
                .into_document())
        })
    }
}
