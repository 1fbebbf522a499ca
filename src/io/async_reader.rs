//! Asynchronous CSV reader with batch interface
//!
//! Provides a streaming interface over the data rows of a CSV export.
//! Supports batch reading for the async strategy.
//!
//! # Design
//!
//! The AsyncReader uses:
//! - csv-async for streaming CSV tokenization
//! - the same [`RowGate`] as the sync reader, so both strategies see identical rows
//! - batch reading, so classification can fan out over a whole batch
//!
//! # Architecture
//!
//! ```text
//! CSV Reader → AsyncReader → Batches of (line, RawRow)
//!                  ↓
//!           csv_format module
//!           (decode_fields, RowGate)
//! ```

use crate::core::batch::NumberedRow;
use crate::io::csv_format::{decode_fields, RowGate};
use crate::types::{ConvertError, FieldLayout};
use csv_async::{AsyncReaderBuilder, ByteRecord, Trim};
use futures::io::AsyncRead;
use tracing::trace;

/// Asynchronous CSV reader
///
/// Maintains streaming behavior with memory bounded by the batch size.
pub struct AsyncReader<R: AsyncRead + Unpin + Send> {
    csv_reader: csv_async::AsyncReader<R>,
    record: ByteRecord,
    gate: RowGate,
    finished: bool,
    pending: Option<ConvertError>,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    /// Create a new AsyncReader from an async byte source
    ///
    /// # Arguments
    ///
    /// * `reader` - Async reader providing CSV data
    /// * `layout` - Field layout supplying separator, skip and width policy
    pub fn new(reader: R, layout: &FieldLayout) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .delimiter(layout.separator)
            .has_headers(false)
            .flexible(true)
            .trim(Trim::None)
            .create_reader(reader);

        Self {
            csv_reader,
            record: ByteRecord::new(),
            gate: RowGate::new(layout),
            finished: false,
            pending: None,
        }
    }

    /// Read a batch of data rows
    ///
    /// Reads up to `batch_size` rows, each paired with its source line.
    ///
    /// # Returns
    ///
    /// The rows read, or an empty vector once the end of the input is reached.
    ///
    /// # Errors
    ///
    /// A tokenization error after the skipped header region or a width mismatch
    /// ends the input. The rows read before it are returned first; the error is
    /// returned by the next call, and later calls return an empty batch.
    pub async fn read_batch(&mut self, batch_size: usize) -> Result<Vec<NumberedRow>, ConvertError> {
        if let Some(e) = self.pending.take() {
            return Err(e);
        }

        let mut batch = Vec::with_capacity(batch_size);

        while !self.finished && batch.len() < batch_size {
            match self.csv_reader.read_byte_record(&mut self.record).await {
                Ok(false) => self.finished = true,
                Ok(true) => {
                    let line = self.record.position().map_or(0, |pos| pos.line());
                    let row = decode_fields(self.record.iter());

                    match self.gate.admit(line, row) {
                        Ok(Some(row)) => batch.push((line, row)),
                        Ok(None) => {}
                        Err(e) => return self.defer(batch, e),
                    }
                }
                Err(e) if self.gate.skipping() => {
                    trace!(error = %e, "skipped line returned error");
                    self.gate.skip_one();
                }
                Err(e) => return self.defer(batch, e.into()),
            }
        }

        Ok(batch)
    }

    fn defer(
        &mut self,
        batch: Vec<NumberedRow>,
        error: ConvertError,
    ) -> Result<Vec<NumberedRow>, ConvertError> {
        self.finished = true;
        if batch.is_empty() {
            return Err(error);
        }
        self.pending = Some(error);
        Ok(batch)
    }
}
