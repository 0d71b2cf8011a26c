//! Connection settings for the user service.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;

/// Timeout applied to both connecting and the whole request when none is configured.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 5;

/// User agent sent unless overridden through [`ClientConfig::headers`].
pub const DEFAULT_USER_AGENT: &str = "campact_user_service";

#[derive(Debug, Copy, Clone, Eq, PartialEq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    Http,
    #[default]
    Https,
}

impl Scheme {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Credentials used to derive the `authorization` header of every request.
#[derive(Debug, Clone, Deserialize)]
pub struct TotpAuth {
    pub user: String,
    pub secret: SecretString,
}

impl TotpAuth {
    #[must_use]
    pub fn new(user: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            secret: SecretString::new(secret.into().into()),
        }
    }
}

impl PartialEq for TotpAuth {
    fn eq(&self, other: &Self) -> bool {
        self.user == other.user && self.secret.expose_secret() == other.secret.expose_secret()
    }
}

impl Eq for TotpAuth {}

/// Configuration of a [`crate::HttpClient`].
///
/// Header overrides are merged case-insensitively on top of the default
/// `Accept`, `Accept-Charset` and `User-Agent` headers.
#[derive(Debug, Clone, Eq, PartialEq, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub scheme: Scheme,
    pub host: String,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(default = "default_tls_verify")]
    pub tls_verify: bool,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default)]
    pub totp_auth: Option<TotpAuth>,
}

fn default_tls_verify() -> bool {
    true
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

impl ClientConfig {
    /// Https configuration for `host` with every other option at its default.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            scheme: Scheme::Https,
            host: host.into(),
            port: None,
            headers: HashMap::new(),
            tls_verify: true,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            totp_auth: None,
        }
    }

    #[must_use]
    pub fn with_scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = scheme;
        self
    }

    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Override or add a header sent with every request.
    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    #[must_use]
    pub fn with_timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_totp_auth(mut self, auth: TotpAuth) -> Self {
        self.totp_auth = Some(auth);
        self
    }

    /// `scheme://host[:port]`, the port only being present when configured.
    #[must_use]
    pub fn endpoint(&self) -> String {
        let mut endpoint = format!("{}://{}", self.scheme, self.host);
        if let Some(port) = self.port {
            endpoint.push_str(&format!(":{port}"));
        }
        endpoint
    }

    /// Check the invariants that can not be expressed in the type.
    ///
    /// # Errors
    /// Returns a description of the first violated invariant.
    pub fn validate(&self) -> Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("host must not be empty".to_owned());
        }
        if self.port == Some(0) {
            return Err("port must be a positive integer".to_owned());
        }
        if self.timeout_seconds == 0 {
            return Err("timeout must be at least one second".to_owned());
        }
        Ok(())
    }

    /// Default headers with the configured overrides applied.
    ///
    /// Header names are compared case-insensitively; an override keeps the
    /// spelling of its key.
    #[must_use]
    pub fn merged_headers(&self) -> Vec<(String, String)> {
        let mut headers: Vec<(String, String)> = [
            ("Accept", "application/json;q=0.1"),
            ("Accept-Charset", "utf-8"),
            ("User-Agent", DEFAULT_USER_AGENT),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .collect();

        let mut overrides: Vec<_> = self.headers.iter().collect();
        overrides.sort();
        for (key, value) in overrides {
            headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(key));
            headers.push((key.clone(), value.clone()));
        }
        headers
    }
}
