//! Blocking HTTP transport for the user service client built on top of ureq.
//!
//! The transport never turns a status code into an error: every response that
//! made it back from the server is returned as a [`Response`] with its status
//! code and raw body bytes, and interpreting it is left to the caller.

pub use http;
use std::collections::HashMap;
use std::io;
use std::io::Read;
use std::time::Duration;
pub use ureq;
use ureq::Body;
use ureq::typestate::WithoutBody;
pub use url;
use url::Url;

/// Errors that may arrise while executing a request.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP Transport error.
    #[error("Ureq: {0}")]
    Ureq(#[from] ureq::Error),
    /// IO Error
    #[error("IO: {0}")]
    IO(#[from] io::Error),
    /// Parsing or manipulation of Urls.
    #[error("Url: {0}")]
    Url(#[from] url::ParseError),
}

impl Error {
    /// Whether the current error is a connection error that may indicate there are issues
    /// connecting to the server.
    #[must_use]
    pub fn is_connection_error(&self) -> bool {
        let Self::Ureq(err) = self else {
            return false;
        };
        matches!(
            err,
            ureq::Error::Io(_)
                | ureq::Error::Timeout(_)
                | ureq::Error::ConnectionFailed
                | ureq::Error::HostNotFound
                | ureq::Error::TooManyRedirects
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// HTTP method for the request.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Method {
    Delete,
    Get,
}

impl Method {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Delete => "DELETE",
            Method::Get => "GET",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Defines an Http Request.
pub trait Request {
    /// Http Method.
    fn method(&self) -> Method;

    /// The url of the request, relative to the client's base url.
    fn url(&self) -> String;

    /// Build the request.
    ///
    /// Request specific headers should be set here.
    ///
    /// # Errors
    /// Returns error if building the operation failed.
    fn build(&self, builder: RequestBuilder) -> Result<RequestBuilder> {
        Ok(builder)
    }
}

pub struct RequestBuilder {
    request: ureq::RequestBuilder<WithoutBody>,
}

impl From<ureq::RequestBuilder<WithoutBody>> for RequestBuilder {
    fn from(request: ureq::RequestBuilder<WithoutBody>) -> Self {
        Self { request }
    }
}

impl RequestBuilder {
    /// Set a header with `key` and `value`.
    #[must_use]
    pub fn header(mut self, key: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.request = self.request.header(key.as_ref(), value.as_ref());
        self
    }
}

/// Status code and body of a completed request.
///
/// The body is kept as received, decoding it is up to the caller.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Response {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Http client builder.
#[derive(Debug)]
pub struct ClientBuilder {
    base_url: Url,
    request_timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    user_agent: String,
    allow_http: bool,
    verify_tls: bool,
    default_headers: HashMap<String, String>,
}

impl ClientBuilder {
    fn new(base_url: Url) -> Self {
        Self {
            user_agent: "user-service-http/0.1.0".to_string(),
            base_url,
            request_timeout: None,
            connect_timeout: None,
            allow_http: false,
            verify_tls: true,
            default_headers: HashMap::new(),
        }
    }

    /// Set the user agent to be submitted with every request.
    #[must_use]
    pub fn user_agent(mut self, agent: &str) -> Self {
        self.user_agent = agent.to_string();
        self
    }

    /// Set the full request timeout. By default there is no timeout.
    #[must_use]
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set the connection timeout. By default there is no timeout.
    #[must_use]
    pub fn connect_timeout(mut self, duration: Duration) -> Self {
        self.connect_timeout = Some(duration);
        self
    }

    /// Allow plain http requests.
    #[must_use]
    pub fn allow_http(mut self) -> Self {
        self.allow_http = true;
        self
    }

    /// Skip verification of the server's TLS certificate.
    #[must_use]
    pub fn danger_accept_invalid_certs(mut self) -> Self {
        self.verify_tls = false;
        self
    }

    /// Set a header with `key` and `value` that is sent with every request.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    /// Create the client.
    #[must_use]
    pub fn build(self) -> Client {
        let mut builder = ureq::Agent::config_builder();

        if let Some(d) = self.request_timeout {
            builder = builder.timeout_global(Some(d));
        }

        if let Some(d) = self.connect_timeout {
            builder = builder.timeout_connect(Some(d));
        }

        if !self.allow_http {
            builder = builder.https_only(true);
        }

        if !self.verify_tls {
            builder = builder.tls_config(
                ureq::tls::TlsConfig::builder()
                    .disable_verification(true)
                    .build(),
            );
        }

        let agent = builder
            .user_agent(self.user_agent.as_str())
            .max_idle_connections(0)
            .max_idle_connections_per_host(0)
            // Status codes are interpreted by the caller.
            .http_status_as_error(false)
            .build()
            .into();

        Client {
            agent,
            base_url: self.base_url,
            default_headers: self.default_headers,
        }
    }
}

/// HTTP Client on which to execute requests.
///
/// All request executed on this client will be appended to the base url.
pub struct Client {
    agent: ureq::Agent,
    base_url: Url,
    default_headers: HashMap<String, String>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url.as_str())
            .field("default_headers", &self.default_headers)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Create a new builder with the given `base_url`.
    #[must_use]
    pub fn builder(base_url: Url) -> ClientBuilder {
        ClientBuilder::new(base_url)
    }

    /// Execute the request and return the status code and body of the response.
    ///
    /// # Errors
    /// Returns an error if the request construction or execution failed, or if the body
    /// could not be read. Error status codes are not considered failures.
    pub fn execute<R: Request>(&self, request: &R) -> Result<Response> {
        let url = self.base_url.join(&request.url())?;
        let method = request.method();
        let mut builder: RequestBuilder = match method {
            Method::Get => self.agent.get(url.as_str()).into(),
            Method::Delete => self.agent.delete(url.as_str()).into(),
        };

        for (key, value) in &self.default_headers {
            builder = builder.header(key, value);
        }

        let builder = request.build(builder)?;

        tracing::debug!("{method} {url}");
        let mut ureq_response = builder.request.call()?;
        let status = ureq_response.status().as_u16();

        let mut bytes = Vec::new();
        ureq_response.safe_reader().read_to_end(&mut bytes)?;
        tracing::debug!("{method} {url} -> {status} ({} bytes)", bytes.len());

        Ok(Response {
            status,
            body: bytes,
        })
    }
}

/// Extension trait to read the body with safe upper limit.
pub trait ExtSafeResponse {
    /// Create a safe reader that reads up to a maximum number of bytes from the server.
    fn safe_reader(&mut self) -> impl Read;
}

const MAX_BYTES_FROM_RESPONSE: u64 = 10_000_000;

impl ExtSafeResponse for http::Response<Body> {
    fn safe_reader(&mut self) -> impl Read {
        self.body_mut()
            .with_config()
            .limit(MAX_BYTES_FROM_RESPONSE)
            .reader()
    }
}
