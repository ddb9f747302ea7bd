//! Command-line argument structures for the `mibwalk` binary.

use clap::{Parser, ValueEnum};
use std::time::Duration;

use crate::Version;
use crate::error::{Error, Result};
use crate::fetch::{DEFAULT_PAGE_LIMIT, FetchConfig, FetchMode, WalkScope};
use crate::mib;
use crate::oid::Oid;
use crate::session::{Backoff, Endpoint, Retry, Target, UdpSession};

/// SNMP version for CLI argument parsing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SnmpVersion {
    /// SNMPv1
    #[value(name = "1")]
    V1,
    /// SNMPv2c (default)
    #[default]
    #[value(name = "2c")]
    V2c,
}

impl From<SnmpVersion> for Version {
    fn from(v: SnmpVersion) -> Self {
        match v {
            SnmpVersion::V1 => Version::V1,
            SnmpVersion::V2c => Version::V2c,
        }
    }
}

/// Backoff strategy for CLI argument parsing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum BackoffStrategy {
    /// No delay between retries (immediate retry on timeout).
    #[default]
    None,
    /// Fixed delay between each retry.
    Fixed,
    /// Exponential backoff: delay doubles after each attempt.
    Exponential,
}

/// Fetch operation for `--once`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OnceMode {
    /// A single GETNEXT.
    Next,
    /// One page of GETBULK.
    Bulk,
}

impl From<OnceMode> for FetchMode {
    fn from(mode: OnceMode) -> Self {
        match mode {
            OnceMode::Next => FetchMode::Next,
            OnceMode::Bulk => FetchMode::Bulk,
        }
    }
}

/// Agent and protocol arguments.
#[derive(Debug, Parser)]
pub struct CommonArgs {
    /// Target host or host:port (default port 161).
    #[arg(value_name = "TARGET", default_value = "127.0.0.1")]
    pub target: String,

    /// SNMP version: 1 or 2c.
    #[arg(short = 'v', long = "snmp-version", default_value = "2c")]
    pub snmp_version: SnmpVersion,

    /// Community string.
    #[arg(short = 'c', long = "community", default_value = "public")]
    pub community: String,

    /// Request timeout in seconds.
    #[arg(short = 't', long = "timeout", default_value = "5")]
    pub timeout: f64,

    /// Retry count.
    #[arg(short = 'r', long = "retries", default_value = "3")]
    pub retries: u32,

    /// Backoff strategy between retries: none, fixed, or exponential.
    #[arg(long = "backoff", default_value = "none")]
    pub backoff: BackoffStrategy,

    /// Backoff delay in milliseconds (initial delay for exponential, fixed delay otherwise).
    #[arg(long = "backoff-delay", default_value = "1000")]
    pub backoff_delay: u64,

    /// Maximum backoff delay in milliseconds (exponential only).
    #[arg(long = "backoff-max", default_value = "5000")]
    pub backoff_max: u64,

    /// Jitter factor for exponential backoff (0.0-1.0, e.g., 0.25 means +/-25%).
    #[arg(long = "backoff-jitter", default_value = "0.25")]
    pub backoff_jitter: f64,
}

impl CommonArgs {
    pub fn target(&self) -> Result<Target> {
        Ok(Target::new(
            Endpoint::parse(&self.target)?,
            self.community.as_str(),
        ))
    }

    /// Get the timeout as a Duration.
    pub fn timeout_duration(&self) -> Result<Duration> {
        Duration::try_from_secs_f64(self.timeout)
            .map_err(|_| Error::Config(format!("invalid timeout: {}", self.timeout)))
    }

    /// Build a Retry configuration from the CLI arguments.
    pub fn retry_config(&self) -> Retry {
        let backoff = match self.backoff {
            BackoffStrategy::None => Backoff::None,
            BackoffStrategy::Fixed => Backoff::Fixed {
                delay: Duration::from_millis(self.backoff_delay),
            },
            BackoffStrategy::Exponential => Backoff::Exponential {
                initial: Duration::from_millis(self.backoff_delay),
                max: Duration::from_millis(self.backoff_max),
                jitter: self.backoff_jitter.clamp(0.0, 1.0),
            },
        };
        Retry {
            max_attempts: self.retries,
            backoff,
        }
    }

    pub fn session(&self) -> Result<UdpSession> {
        UdpSession::builder()
            .version(self.snmp_version.into())
            .timeout(self.timeout_duration()?)
            .retry(self.retry_config())
            .build()
    }
}

/// Walk arguments.
#[derive(Debug, Parser)]
pub struct WalkArgs {
    /// Starting OID (dotted notation or well-known name such as sysDescr).
    #[arg(short = 'o', long = "oid", value_name = "OID")]
    pub start: Option<String>,

    /// Maximum records returned by one bulk fetch.
    #[arg(long = "page-limit", default_value_t = DEFAULT_PAGE_LIMIT)]
    pub page_limit: u32,

    /// End the walk when the agent leaves this subtree.
    #[arg(long = "subtree", value_name = "OID")]
    pub subtree: Option<String>,

    /// Run a single fetch and exit instead of starting the prompt.
    #[arg(long = "once", value_name = "MODE")]
    pub once: Option<OnceMode>,
}

impl WalkArgs {
    /// The starting OID, if one was given.
    pub fn start_oid(&self) -> Result<Option<Oid>> {
        self.start.as_deref().map(mib::resolve).transpose()
    }

    pub fn fetch_config(&self) -> Result<FetchConfig> {
        let scope = match self.subtree.as_deref() {
            Some(root) => WalkScope::Subtree(mib::resolve(root)?),
            None => WalkScope::Lexicographic,
        };
        let config = FetchConfig {
            page_limit: self.page_limit,
            scope,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Output control arguments.
#[derive(Debug, Parser)]
pub struct OutputArgs {
    /// Label rows with well-known node names (sysDescr.0) instead of the last arc.
    #[arg(long = "names")]
    pub names: bool,

    /// Enable debug logging (mibwalk=debug).
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,

    /// Enable trace logging (mibwalk=trace).
    #[arg(short = 'D', long = "trace")]
    pub trace: bool,
}

impl OutputArgs {
    /// Initialize tracing based on debug/trace flags.
    pub fn init_tracing(&self) {
        use tracing_subscriber::EnvFilter;

        let filter = if self.trace {
            "mibwalk=trace"
        } else if self.debug {
            "mibwalk=debug"
        } else {
            "mibwalk=warn"
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(filter))
            .with_writer(std::io::stderr)
            .try_init();
    }
}
