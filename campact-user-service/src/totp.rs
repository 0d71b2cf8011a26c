//! Time based one time passwords (RFC 6238) used to authorize requests.
//!
//! The service expects HMAC-SHA-256 codes with 8 digits over a 30 second step,
//! computed for the current instant. The shared secret's bytes are the key as is.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

pub const DIGITS: u32 = 8;
pub const INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Totp {
    digits: u32,
    interval: u64,
}

impl Default for Totp {
    fn default() -> Self {
        Self {
            digits: DIGITS,
            interval: INTERVAL.as_secs(),
        }
    }
}

impl Totp {
    /// Code for `secret` at the current system time.
    #[must_use]
    pub fn generate(&self, secret: &[u8]) -> String {
        // A clock before the epoch is treated as the epoch.
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        self.generate_at(secret, now.as_secs())
    }

    /// Code for `secret` at `unix_time` seconds since the epoch.
    ///
    /// # Panics
    /// Never, HMAC accepts keys of any length.
    #[must_use]
    pub fn generate_at(&self, secret: &[u8], unix_time: u64) -> String {
        let counter = unix_time / self.interval;
        let mut mac = Hmac::<Sha256>::new_from_slice(secret)
            .expect("HMAC accepts keys of any length");
        mac.update(&counter.to_be_bytes());
        let digest = mac.finalize().into_bytes();

        let offset = usize::from(digest[digest.len() - 1] & 0x0f);
        let truncated = u32::from_be_bytes([
            digest[offset] & 0x7f,
            digest[offset + 1],
            digest[offset + 2],
            digest[offset + 3],
        ]);
        let code = truncated % 10u32.pow(self.digits);
        format!("{code:0width$}", width = self.digits as usize)
    }
}

/// Code for `secret` at the current time with the service's parameters.
#[must_use]
pub fn generate(secret: &[u8]) -> String {
    Totp::default().generate(secret)
}
