//! Http client for the user service.

use crate::config::{ClientConfig, Scheme};
use crate::error::{Error, Result};
use crate::response::{Outcome, classify};
use crate::totp::Totp;
use secrecy::ExposeSecret;
use std::time::Duration;
use user_service_http::http::{HeaderName, HeaderValue};
use user_service_http::url::Url;
use user_service_http::{Client, Method, Request, RequestBuilder};

pub(crate) const AUTHORIZATION_HEADER: &str = "authorization";
pub(crate) const COOKIE_HEADER: &str = "Cookie";

/// Cookies attached to a single request.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Cookies {
    /// Sent verbatim as the `Cookie` header.
    Raw(String),
    /// Rendered as `key=value;` pairs in insertion order.
    Pairs(Vec<(String, String)>),
}

impl Cookies {
    /// Value of the `Cookie` header.
    #[must_use]
    pub fn to_header_value(&self) -> String {
        match self {
            Cookies::Raw(raw) => raw.clone(),
            Cookies::Pairs(pairs) => pairs.iter().map(|(k, v)| format!("{k}={v};")).collect(),
        }
    }
}

impl From<&str> for Cookies {
    fn from(value: &str) -> Self {
        Self::Raw(value.to_owned())
    }
}

impl From<String> for Cookies {
    fn from(value: String) -> Self {
        Self::Raw(value)
    }
}

impl From<Vec<(String, String)>> for Cookies {
    fn from(value: Vec<(String, String)>) -> Self {
        Self::Pairs(value)
    }
}

/// Per request options. Nothing here outlives the request.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct RequestOptions {
    pub cookies: Option<Cookies>,
}

impl RequestOptions {
    /// Append a `name=value;` cookie.
    ///
    /// Replaces previously set raw cookies.
    #[must_use]
    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let pair = (name.into(), value.into());
        if let Some(Cookies::Pairs(pairs)) = &mut self.cookies {
            pairs.push(pair);
        } else {
            self.cookies = Some(Cookies::Pairs(vec![pair]));
        }
        self
    }

    /// Send `cookies` verbatim as the `Cookie` header.
    #[must_use]
    pub fn with_raw_cookies(mut self, cookies: impl Into<String>) -> Self {
        self.cookies = Some(Cookies::Raw(cookies.into()));
        self
    }
}

/// Client for the user service.
///
/// Holds no state besides its configuration, so a single instance can be
/// shared by any number of views.
#[derive(Debug)]
pub struct HttpClient {
    config: ClientConfig,
    endpoint: String,
    client: Client,
    totp: Totp,
}

struct ServiceRequest<'a> {
    method: Method,
    path: &'a str,
    cookie: Option<String>,
    authorization: Option<String>,
}

impl Request for ServiceRequest<'_> {
    fn method(&self) -> Method {
        self.method
    }

    fn url(&self) -> String {
        self.path.to_owned()
    }

    fn build(&self, mut builder: RequestBuilder) -> user_service_http::Result<RequestBuilder> {
        if let Some(cookie) = &self.cookie {
            builder = builder.header(COOKIE_HEADER, cookie);
        }
        if let Some(authorization) = &self.authorization {
            builder = builder.header(AUTHORIZATION_HEADER, authorization);
        }
        Ok(builder)
    }
}

impl HttpClient {
    /// Create a new client from `config`. No network traffic happens here.
    ///
    /// # Errors
    /// Returns [`Error::Config`] if the configuration is not usable.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate().map_err(Error::Config)?;

        let endpoint = config.endpoint();
        let base_url = Url::parse(&endpoint)
            .map_err(|e| Error::Config(format!("Invalid endpoint '{endpoint}': {e}")))?;

        let timeout = Duration::from_secs(config.timeout_seconds);
        let mut builder = Client::builder(base_url)
            .request_timeout(timeout)
            .connect_timeout(timeout);

        for (key, value) in config.merged_headers() {
            HeaderName::from_bytes(key.as_bytes())
                .map_err(|e| Error::Config(format!("Invalid header name '{key}': {e}")))?;
            HeaderValue::from_str(&value)
                .map_err(|e| Error::Config(format!("Invalid value for header '{key}': {e}")))?;
            if key.eq_ignore_ascii_case("user-agent") {
                builder = builder.user_agent(&value);
            } else {
                builder = builder.header(key, value);
            }
        }

        if config.scheme == Scheme::Http {
            builder = builder.allow_http();
        }

        if !config.tls_verify {
            tracing::warn!("TLS certificate verification disabled for {endpoint}");
            builder = builder.danger_accept_invalid_certs();
        }

        Ok(Self {
            client: builder.build(),
            endpoint,
            config,
            totp: Totp::default(),
        })
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// `scheme://host[:port]` every request path is resolved against.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Perform a GET request on `path`.
    ///
    /// # Errors
    /// Returns error if the request could not be executed, the server replied with an
    /// error status or a successful body could not be parsed.
    pub fn get(&self, path: &str, options: &RequestOptions) -> Result<Outcome> {
        self.request(Method::Get, path, options)
    }

    /// Perform a DELETE request on `path`.
    ///
    /// # Errors
    /// Returns error if the request could not be executed, the server replied with an
    /// error status or a successful body could not be parsed.
    pub fn delete(&self, path: &str, options: &RequestOptions) -> Result<Outcome> {
        self.request(Method::Delete, path, options)
    }

    fn request(&self, method: Method, path: &str, options: &RequestOptions) -> Result<Outcome> {
        let request = ServiceRequest {
            method,
            path,
            cookie: options.cookies.as_ref().map(Cookies::to_header_value),
            authorization: self.authorization(),
        };
        tracing::debug!(
            "{method} {path} (authorized: {})",
            request.authorization.is_some()
        );

        let response = self.client.execute(&request)?;
        classify(response.status, &response.body)
    }

    /// `Token <user>:<code>` when totp authentication is configured.
    fn authorization(&self) -> Option<String> {
        let auth = self.config.totp_auth.as_ref()?;
        let code = self.totp.generate(auth.secret.expose_secret().as_bytes());
        Some(format!("Token {}:{code}", auth.user))
    }
}
