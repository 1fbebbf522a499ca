//! CSV format handling shared by the sync and async readers
//!
//! Both readers tokenize with the csv crate family and hand every record to a
//! [`RowGate`], which applies the layout's header skip and width policy.
//!
//! # Record Handling
//!
//! - Fields are decoded as UTF-8, replacing invalid bytes (Latin-1 exports are common)
//! - The first `skip` non-blank records are discarded
//! - The width of each remaining record is checked against the layout's policy
//! - A width mismatch is fatal for the whole run

use crate::types::{ConvertError, FieldCount, FieldLayout, RawRow};
use tracing::trace;

/// Decode the raw bytes of a record into owned fields
pub fn decode_fields<'a>(fields: impl Iterator<Item = &'a [u8]>) -> RawRow {
    fields
        .map(|field| String::from_utf8_lossy(field).into_owned())
        .collect()
}

/// Header skip and width policy for a stream of records
#[derive(Debug, Clone)]
pub struct RowGate {
    to_skip: usize,
    fields: FieldCount,
    expected: Option<usize>,
}

impl RowGate {
    /// Create a gate for the given layout
    pub fn new(layout: &FieldLayout) -> Self {
        Self {
            to_skip: layout.skip,
            fields: layout.fields,
            expected: None,
        }
    }

    /// Whether the gate is still discarding leading records
    pub fn skipping(&self) -> bool {
        self.to_skip > 0
    }

    /// Account for one discarded record (for example one that failed to tokenize)
    pub fn skip_one(&mut self) {
        self.to_skip = self.to_skip.saturating_sub(1);
    }

    /// Pass a record through the gate
    ///
    /// # Returns
    ///
    /// * `Ok(Some(row))` - the record is a data row
    /// * `Ok(None)` - the record was skipped
    /// * `Err(ConvertError::FieldCount)` - the record has the wrong width
    pub fn admit(&mut self, line: u64, row: RawRow) -> Result<Option<RawRow>, ConvertError> {
        if self.skipping() {
            self.skip_one();
            trace!(line, record = ?row, "skipped record");
            return Ok(None);
        }

        let expected = match self.fields {
            FieldCount::Unchecked => return Ok(Some(row)),
            FieldCount::Exact(width) => width,
            FieldCount::Infer => *self.expected.get_or_insert(row.len()),
        };

        if row.len() != expected {
            return Err(ConvertError::field_count(line, expected, row.len()));
        }

        trace!(line, record = ?row, "processing a csv record");
        Ok(Some(row))
    }
}
