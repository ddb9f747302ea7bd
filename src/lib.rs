// The Error enum carries OIDs inline so a failed walk can say where it stopped.
#![allow(clippy::result_large_err)]

//! # mibwalk
//!
//! Page through an SNMP agent's MIB one record, or one bounded page, at a time.
//!
//! ## Features
//!
//! - GETNEXT and GETBULK walks that resume from where the last fetch stopped
//! - Forward-only progress: agents that loop or go backwards are detected
//! - Partial pages survive errors; nothing decoded is thrown away
//! - Every wire value decoded to display text and a type name
//! - SNMPv1/v2c over UDP, plus in-memory and scripted agents
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mibwalk::session::{Endpoint, Target, UdpSession};
//! use mibwalk::{Fetcher, WalkCursor, oid};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), mibwalk::Error> {
//!     let fetcher = Fetcher::new(UdpSession::builder().build()?);
//!     let target = Target::new(Endpoint::parse("192.168.1.1")?, "public");
//!     let mut cursor = WalkCursor::new();
//!     let cancel = CancellationToken::new();
//!
//!     // first page starts at the system group
//!     let page = fetcher
//!         .fetch_bulk(&mut cursor, &target, Some(&oid!(1, 3, 6, 1, 2, 1, 1)), &cancel)
//!         .await;
//!     for record in &page.records {
//!         println!("{} = {} ({})", record.label(), record.value_text(), record.value_type());
//!     }
//!
//!     // the next page continues from the cursor
//!     let page = fetcher.fetch_bulk(&mut cursor, &target, None, &cancel).await;
//!     if let Some(e) = page.error {
//!         eprintln!("walk stopped: {}", e);
//!     }
//!     Ok(())
//! }
//! ```

pub mod ber;
pub mod browser;
pub mod cursor;
pub mod display;
pub mod error;
pub mod fetch;
pub mod message;
pub mod mib;
pub mod oid;
pub mod pdu;
pub mod record;
pub mod session;
pub mod sink;
pub mod transport;
pub mod value;
pub mod varbind;
pub mod version;

pub(crate) mod util;

#[cfg(feature = "cli")]
pub mod cli;

// Re-exports for convenience
pub use browser::{Browser, BrowserEvent};
pub use cursor::WalkCursor;
pub use display::DisplayValue;
pub use error::{DecodeErrorKind, Error, ErrorClass, ErrorStatus, OidErrorKind, Result};
pub use fetch::{DEFAULT_PAGE_LIMIT, FetchConfig, FetchMode, FetchOutcome, Fetcher, WalkScope};
pub use oid::Oid;
pub use record::Record;
pub use session::{AgentSession, Endpoint, Target};
pub use sink::{MemorySink, ResultSink};
pub use value::Value;
pub use varbind::VarBind;
pub use version::Version;
