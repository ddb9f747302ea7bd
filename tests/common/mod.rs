//! Shared test infrastructure for mibwalk.
//!
//! Provides TestAgent (in-process UDP agent), fixtures, and session helpers.

// Not every test file uses every helper
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod agent;
pub mod fixtures;

pub use agent::{TestAgent, TestAgentBuilder};
pub use fixtures::{combined, interface_table, system_mib};

use mibwalk::session::{Endpoint, Retry, Target, UdpSession};
use mibwalk::Version;
use std::time::Duration;

/// Target for an agent bound on localhost.
pub fn target_for(agent: &TestAgent) -> Target {
    Target::new(Endpoint::new("127.0.0.1", agent.addr().port()), "public")
}

/// UDP session with a short timeout and the given retry policy.
pub fn session(version: Version, retry: Retry) -> UdpSession {
    UdpSession::builder()
        .version(version)
        .timeout(Duration::from_millis(200))
        .retry(retry)
        .build()
        .expect("valid session config")
}
