//! Builder for [`UdpSession`].

use std::time::Duration;

use super::{Retry, SessionConfig, UdpSession};
use crate::error::{Error, Result};
use crate::version::Version;

/// Builder for constructing a [`UdpSession`].
///
/// # Example
///
/// ```rust
/// use mibwalk::session::{Retry, UdpSession};
/// use mibwalk::Version;
/// use std::time::Duration;
///
/// let session = UdpSession::builder()
///     .version(Version::V1)
///     .timeout(Duration::from_secs(2))
///     .retry(Retry::fixed(1, Duration::from_millis(200)))
///     .build()
///     .unwrap();
/// assert_eq!(session.config().version, Version::V1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct UdpSessionBuilder {
    config: SessionConfig,
}

impl UdpSessionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the SNMP version (default: v2c).
    ///
    /// GETBULK requests fail locally when the version is v1.
    pub fn version(mut self, version: Version) -> Self {
        self.config.version = version;
        self
    }

    /// Set the request timeout (default: 5 seconds).
    ///
    /// This is the wait for each attempt. A request that keeps timing out
    /// takes up to `timeout * (retries + 1)` plus any backoff.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the retry policy (default: 3 retries, no backoff).
    pub fn retry(mut self, retry: impl Into<Retry>) -> Self {
        self.config.retry = retry.into();
        self
    }

    /// Validate the settings and build the session.
    ///
    /// No sockets are opened here; each agent endpoint gets one on first use.
    pub fn build(self) -> Result<UdpSession> {
        if self.config.timeout.is_zero() {
            return Err(Error::Config("timeout must be greater than zero".into()));
        }
        Ok(UdpSession::from_config(self.config))
    }
}
