//! Synchronous CSV reader with iterator interface
//!
//! Provides a streaming iterator over the data rows of a CSV export.
//!
//! # Design
//!
//! The SyncReader tokenizes with `csv::Reader` using the layout's separator, no
//! header row, no trimming and flexible widths. Each record is decoded and passed
//! through a [`RowGate`], which handles the header skip and the width policy.
//!
//! # Iterator Interface
//!
//! SyncReader implements the Iterator trait, yielding
//! `Result<(line, RawRow), ConvertError>` for each data row:
//!
//! ```no_run
//! use csv2beancount::io::sync_reader::SyncReader;
//! use csv2beancount::types::FieldLayout;
//! use std::path::Path;
//!
//! let layout = FieldLayout::default();
//! let reader = SyncReader::from_path(Path::new("export.csv"), &layout).unwrap();
//! for result in reader {
//!     match result {
//!         Ok((line, row)) => println!("line {}: {:?}", line, row),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - Opening errors are returned from `from_path()`
//! - Tokenization errors inside the skipped header region are logged and ignored
//! - Any later tokenization error or width mismatch is yielded once, after which
//!   the iterator ends

use crate::io::csv_format::{decode_fields, RowGate};
use crate::core::batch::NumberedRow;
use crate::types::{ConvertError, FieldLayout};
use csv::{ByteRecord, ReaderBuilder, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::trace;

/// Synchronous CSV reader
///
/// Maintains streaming behavior with constant memory usage.
#[derive(Debug)]
pub struct SyncReader<R: Read> {
    reader: csv::Reader<R>,
    record: ByteRecord,
    gate: RowGate,
    finished: bool,
}

/// Open a file, mapping a missing file to [`ConvertError::FileNotFound`]
pub(crate) fn open_error(path: &Path, error: std::io::Error) -> ConvertError {
    if error.kind() == std::io::ErrorKind::NotFound {
        ConvertError::FileNotFound {
            path: path.display().to_string(),
        }
    } else {
        ConvertError::Io {
            message: format!("Failed to open file '{}': {}", path.display(), error),
        }
    }
}

impl SyncReader<File> {
    /// Open a CSV file for streaming iteration
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::FileNotFound`] or [`ConvertError::Io`] if the file
    /// cannot be opened.
    pub fn from_path(path: &Path, layout: &FieldLayout) -> Result<Self, ConvertError> {
        let file = File::open(path).map_err(|e| open_error(path, e))?;
        Ok(Self::new(file, layout))
    }
}

impl<R: Read> SyncReader<R> {
    /// Create a SyncReader over any byte source
    pub fn new(reader: R, layout: &FieldLayout) -> Self {
        let reader = ReaderBuilder::new()
            .delimiter(layout.separator)
            .has_headers(false)
            .flexible(true)
            .trim(Trim::None)
            .buffer_capacity(8 * 1024)
            .from_reader(reader);

        Self {
            reader,
            record: ByteRecord::new(),
            gate: RowGate::new(layout),
            finished: false,
        }
    }

    fn fail(&mut self, error: ConvertError) -> Option<Result<NumberedRow, ConvertError>> {
        self.finished = true;
        Some(Err(error))
    }
}

impl<R: Read> Iterator for SyncReader<R> {
    type Item = Result<NumberedRow, ConvertError>;

    /// Get the next data row
    ///
    /// # Returns
    ///
    /// * `Some(Ok((line, row)))` - A data row and its source line
    /// * `Some(Err(ConvertError))` - A fatal error; the iterator ends after it
    /// * `None` - End of input reached
    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            match self.reader.read_byte_record(&mut self.record) {
                Ok(false) => {
                    self.finished = true;
                    return None;
                }
                Ok(true) => {
                    let line = self.record.position().map_or(0, |pos| pos.line());
                    let row = decode_fields(self.record.iter());

                    match self.gate.admit(line, row) {
                        Ok(Some(row)) => return Some(Ok((line, row))),
                        Ok(None) => continue,
                        Err(e) => return self.fail(e),
                    }
                }
                Err(e) if self.gate.skipping() => {
                    trace!(error = %e, "skipped line returned error");
                    self.gate.skip_one();
                }
                Err(e) => return self.fail(e.into()),
            }
        }
    }
}
