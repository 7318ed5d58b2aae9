//! Row and table types shared by every pipeline stage.

use serde::Serialize;

/// One row of a dataset. Field meaning is positional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Record(Vec<String>);

impl Record {
    pub fn new(fields: Vec<String>) -> Self {
        Self(fields)
    }

    /// Returns the field at `index`, or `None` for a short row.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> &[String] {
        &self.0
    }
}

impl From<&csv::StringRecord> for Record {
    fn from(record: &csv::StringRecord) -> Self {
        Self(record.iter().map(str::to_string).collect())
    }
}

impl<S: Into<String>> FromIterator<S> for Record {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// A header plus the rows that share it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    pub header: Record,
    pub rows: Vec<Record>,
}

impl Dataset {
    pub fn new(header: Record, rows: Vec<Record>) -> Self {
        Self { header, rows }
    }

    /// Number of columns declared by the header.
    pub fn width(&self) -> usize {
        self.header.len()
    }
}
