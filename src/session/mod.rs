//! Agent sessions: the request/response side of a walk.
//!
//! [`AgentSession`] is the seam between the walk logic and whatever actually
//! answers GETNEXT and GETBULK. Three implementations ship with the crate:
//!
//! - [`UdpSession`] talks SNMPv1/v2c to real agents over UDP
//! - [`TableSession`] answers from an in-memory tree
//! - [`ScriptedSession`] replays canned replies, including failures

mod builder;
mod retry;
mod scripted;
mod table;
mod udp;

pub use builder::UdpSessionBuilder;
pub use retry::{Backoff, Retry};
pub use scripted::{Call, Reply, ScriptedSession};
pub use table::TableSession;
pub use udp::UdpSession;

use std::fmt;
use std::future::Future;
use std::time::Duration;

use bytes::Bytes;

use crate::error::{Error, Result};
use crate::oid::Oid;
use crate::varbind::VarBind;
use crate::version::Version;

/// Standard SNMP agent port.
pub const DEFAULT_PORT: u16 = 161;

/// Something that answers GETNEXT and GETBULK for a target.
///
/// Errors map onto the way a walk reports them: timeouts and transport
/// failures are error indications, a non-zero error-status comes back as
/// [`Error::Snmp`]. End of the MIB view is not an error; it is returned as an
/// [`Value::EndOfMibView`](crate::Value::EndOfMibView) varbind or an empty list.
pub trait AgentSession: Send + Sync {
    /// One GETNEXT for `oid`.
    fn get_next(
        &self,
        target: &Target,
        oid: &Oid,
    ) -> impl Future<Output = Result<Vec<VarBind>>> + Send;

    /// One GETBULK for `oid` with no non-repeaters and `max_records` repetitions.
    fn get_bulk(
        &self,
        target: &Target,
        oid: &Oid,
        max_records: u32,
    ) -> impl Future<Output = Result<Vec<VarBind>>> + Send;
}

/// Agent address as typed by the user: host name or IP literal plus port.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Parse `host`, `host:port`, `[v6]` or `[v6]:port`; the port defaults to 161.
    ///
    /// ```
    /// use mibwalk::session::Endpoint;
    ///
    /// assert_eq!(Endpoint::parse("10.0.0.1").unwrap().to_string(), "10.0.0.1:161");
    /// assert_eq!(Endpoint::parse("switch:1161").unwrap().port, 1161);
    /// assert_eq!(Endpoint::parse("[::1]").unwrap().to_string(), "[::1]:161");
    /// assert_eq!(Endpoint::parse("fe80::1").unwrap().host, "fe80::1");
    /// ```
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        let bad = |why: &str| Error::Config(format!("invalid target {:?}: {}", input, why));

        if let Some(rest) = input.strip_prefix('[') {
            let (host, tail) = rest.split_once(']').ok_or_else(|| bad("missing ']'"))?;
            let port = match tail {
                "" => DEFAULT_PORT,
                _ => tail
                    .strip_prefix(':')
                    .and_then(|p| p.parse().ok())
                    .ok_or_else(|| bad("invalid port"))?,
            };
            return Ok(Self::new(host, port));
        }

        match input.rsplit_once(':') {
            // more than one colon without brackets is a bare IPv6 address
            Some((host, _)) if host.contains(':') => Ok(Self::new(input, DEFAULT_PORT)),
            Some((host, port)) => {
                let port = port.parse().map_err(|_| bad("invalid port"))?;
                if host.is_empty() {
                    return Err(bad("missing host"));
                }
                Ok(Self::new(host, port))
            }
            None if input.is_empty() => Err(bad("missing host")),
            None => Ok(Self::new(input, DEFAULT_PORT)),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

/// SNMPv1/v2c community string.
#[derive(Clone, PartialEq, Eq)]
pub struct Community(Bytes);

impl Community {
    pub fn new(value: impl Into<Bytes>) -> Self {
        Self(value.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub(crate) fn to_bytes(&self) -> Bytes {
        self.0.clone()
    }
}

impl Default for Community {
    fn default() -> Self {
        Self(Bytes::from_static(b"public"))
    }
}

impl From<&str> for Community {
    fn from(value: &str) -> Self {
        Self(Bytes::copy_from_slice(value.as_bytes()))
    }
}

// never print the secret itself
impl fmt::Debug for Community {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Community(<{} bytes>)", self.0.len())
    }
}

/// Where a walk sends its requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub endpoint: Endpoint,
    pub community: Community,
}

impl Target {
    pub fn new(endpoint: Endpoint, community: impl Into<Community>) -> Self {
        Self {
            endpoint,
            community: community.into(),
        }
    }
}

/// Protocol settings for [`UdpSession`].
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// SNMP version (default: v2c).
    pub version: Version,
    /// Time to wait for each response (default: 5s).
    pub timeout: Duration,
    /// Re-send policy on timeout (default: 3 immediate retries).
    pub retry: Retry,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            version: Version::V2c,
            timeout: Duration::from_secs(5),
            retry: Retry::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_forms() {
        assert_eq!(
            Endpoint::parse("192.0.2.5").unwrap(),
            Endpoint::new("192.0.2.5", 161)
        );
        assert_eq!(
            Endpoint::parse(" router.lab:10161 ").unwrap(),
            Endpoint::new("router.lab", 10161)
        );
        assert_eq!(
            Endpoint::parse("[2001:db8::1]:162").unwrap(),
            Endpoint::new("2001:db8::1", 162)
        );
        assert_eq!(
            Endpoint::parse("2001:db8::1").unwrap().to_string(),
            "[2001:db8::1]:161"
        );
    }

    #[test]
    fn endpoint_rejects_garbage() {
        for input in ["", ":161", "host:port", "host:70000", "[::1", "[::1]x"] {
            assert!(Endpoint::parse(input).is_err(), "{input:?} should not parse");
        }
    }

    #[test]
    fn community_debug_hides_secret() {
        let community = Community::from("s3cret");
        assert_eq!(format!("{:?}", community), "Community(<6 bytes>)");
        assert_eq!(Community::default().as_bytes(), b"public");
    }
}
