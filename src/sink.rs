//! Where fetched records go.

use crate::record::Record;

/// Append-only consumer of fetched records.
///
/// `append` is called once per record in the order the walk produced them.
/// `clear` drops everything shown so far; it runs when a new starting node is
/// selected or the user asks for it.
pub trait ResultSink {
    fn append(&mut self, record: &Record);
    fn clear(&mut self);
}

/// Sink that keeps records in a `Vec`.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    records: Vec<Record>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&Record> {
        self.records.last()
    }
}

impl ResultSink for MemorySink {
    fn append(&mut self, record: &Record) {
        self.records.push(record.clone());
    }

    fn clear(&mut self) {
        self.records.clear();
    }
}

impl<S: ResultSink + ?Sized> ResultSink for &mut S {
    fn append(&mut self, record: &Record) {
        (**self).append(record);
    }

    fn clear(&mut self) {
        (**self).clear();
    }
}

impl<S: ResultSink + ?Sized> ResultSink for Box<S> {
    fn append(&mut self, record: &Record) {
        (**self).append(record);
    }

    fn clear(&mut self) {
        (**self).clear();
    }
}
