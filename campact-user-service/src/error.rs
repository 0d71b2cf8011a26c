use std::sync::Arc;

/// Server replied with a status code that signals a failure (3xx, 4xx except 404, 5xx).
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
#[error("unexpected status {status_code}: {body}")]
pub struct ResponseError {
    pub status_code: u16,
    pub body: String,
}

/// Errors that may arise while talking to the user service.
///
/// The type is cheap to clone so views can hand out the same failure on every
/// access after a failed fetch.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// The client configuration is invalid.
    #[error("Invalid configuration: {0}")]
    Config(String),
    /// The request never produced a response (connection, timeout, IO).
    #[error("Transport: {0}")]
    Transport(Arc<user_service_http::Error>),
    /// The server answered with an error status.
    #[error(transparent)]
    Response(#[from] ResponseError),
    /// A successful response carried a body that is not valid json.
    #[error("Json: {0}")]
    Json(Arc<serde_json::Error>),
}

impl Error {
    /// Whether the current error is a connection error that may indicate there are issues
    /// connecting to the server.
    #[must_use]
    pub fn is_connection_error(&self) -> bool {
        match self {
            Error::Transport(e) => e.is_connection_error(),
            _ => false,
        }
    }

    /// The status code of the response if this error originated from one.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Response(e) => Some(e.status_code),
            _ => None,
        }
    }
}

impl From<user_service_http::Error> for Error {
    fn from(value: user_service_http::Error) -> Self {
        Self::Transport(Arc::new(value))
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(Arc::new(value))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[test]
fn response_error_message_contains_status_and_body() {
    let error = Error::from(ResponseError {
        status_code: 410,
        body: "An error occurred".to_owned(),
    });
    assert_eq!(error.to_string(), "unexpected status 410: An error occurred");
    assert_eq!(error.status_code(), Some(410));
    assert!(!error.is_connection_error());
}
