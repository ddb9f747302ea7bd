//! Terminal output for the `mibwalk` binary.

use std::io::{self, Write};

use crate::error::Error;
use crate::fetch::FetchOutcome;
use crate::mib;
use crate::record::Record;
use crate::sink::ResultSink;

const NAME_WIDTH: usize = 44;
const VALUE_WIDTH: usize = 32;
const TYPE_WIDTH: usize = 16;

/// How the Name/OID column is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Labels {
    /// `"<last arc> (<oid>)"`
    #[default]
    LastArc,
    /// `"<well-known name> (<oid>)"` where the tree knows the node.
    Names,
}

/// Result sink that prints each record as a table row.
///
/// The header is printed before the first row and again after every clear.
pub struct TableSink<W: Write> {
    out: W,
    labels: Labels,
    header_pending: bool,
}

impl<W: Write> TableSink<W> {
    pub fn new(out: W, labels: Labels) -> Self {
        Self {
            out,
            labels,
            header_pending: true,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_row(&mut self, record: &Record) -> io::Result<()> {
        if self.header_pending {
            writeln!(
                self.out,
                "{:<NAME_WIDTH$} {:<VALUE_WIDTH$} {:<TYPE_WIDTH$} IP:Port",
                "Name/OID", "Value", "Type"
            )?;
            writeln!(
                self.out,
                "{}",
                "-".repeat(NAME_WIDTH + VALUE_WIDTH + TYPE_WIDTH + 24)
            )?;
            self.header_pending = false;
        }
        writeln!(
            self.out,
            "{:<NAME_WIDTH$} {:<VALUE_WIDTH$} {:<TYPE_WIDTH$} {}",
            label(record, self.labels),
            single_line(record.value_text()),
            record.value_type(),
            record.source_endpoint()
        )?;
        self.out.flush()
    }
}

impl<W: Write> ResultSink for TableSink<W> {
    fn append(&mut self, record: &Record) {
        if let Err(e) = self.write_row(record) {
            tracing::warn!(target: "mibwalk::cli", { error = %e }, "failed to write row");
        }
    }

    fn clear(&mut self) {
        self.header_pending = true;
    }
}

/// Name/OID column text.
pub fn label(record: &Record, labels: Labels) -> String {
    match labels {
        Labels::LastArc => record.label(),
        Labels::Names => match mib::name_of(record.oid()) {
            Some(name) => format!("{} ({})", name, record.oid()),
            None => record.label(),
        },
    }
}

// multi-line sysDescr values would break the table
fn single_line(text: &str) -> String {
    text.replace(['\r', '\n'], " ")
}

/// Print an error the way the prompt and `--once` report it.
pub fn write_error(out: &mut impl Write, error: &Error) -> io::Result<()> {
    writeln!(out, "Error ({}): {}", error.class(), error)
}

/// Summarise a finished fetch after its rows.
pub fn write_outcome(out: &mut impl Write, outcome: &FetchOutcome) -> io::Result<()> {
    if let Some(error) = &outcome.error {
        if !outcome.records.is_empty() {
            writeln!(out, "({} records before the error)", outcome.records.len())?;
        }
        return write_error(out, error);
    }
    if outcome.records.is_empty() {
        writeln!(out, "No more results found.")
    } else {
        Ok(())
    }
}

/// Print the built-in tree, one node per line.
pub fn write_tree(out: &mut impl Write) -> io::Result<()> {
    for node in mib::NODES {
        writeln!(
            out,
            "{:indent$}{} ({})",
            "",
            node.name,
            node.oid(),
            indent = node.depth * 2
        )?;
    }
    Ok(())
}
