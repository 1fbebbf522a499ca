//! Asynchronous batch processing strategy
//!
//! This module provides an asynchronous, multi-threaded implementation of the
//! ProcessingStrategy trait. It reads rows in batches and classifies each batch
//! in parallel on a tokio runtime.
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── BatchConfig (batch_size, max_concurrent_batches)
//!     ├── AsyncReader (batch CSV reading)
//!     └── BatchClassifier (contiguous chunks, one task per chunk)
//! ```
//!
//! # Ordering
//!
//! Batches are handled one after another. Within a batch the chunks are
//! contiguous and reassembled in spawn order, so entries are written in input
//! order and the output is byte-identical to the sync strategy.

use crate::core::BatchClassifier;
use crate::io::async_reader::AsyncReader;
use crate::io::sync_reader::open_error;
use crate::strategy::{write_entry, ConvertJob, ConvertStats, ProcessingStrategy};
use crate::types::ConvertError;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// Configuration for batch processing
///
/// Controls how rows are batched and the number of worker threads classifying
/// each batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchConfig {
    /// Number of rows per batch
    pub batch_size: usize,
    /// Number of worker threads, and of chunks per batch
    pub max_concurrent_batches: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrent_batches: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a new BatchConfig with custom values
    ///
    /// A zero value is replaced by its default with a warning.
    pub fn new(batch_size: usize, max_concurrent_batches: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            warn!(
                batch_size,
                default = default.batch_size,
                "invalid batch_size, using default"
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_concurrent_batches = if max_concurrent_batches == 0 {
            warn!(
                max_concurrent_batches,
                default = default.max_concurrent_batches,
                "invalid max_concurrent_batches, using default"
            );
            default.max_concurrent_batches
        } else {
            max_concurrent_batches
        };

        Self {
            batch_size,
            max_concurrent_batches,
        }
    }
}

/// Asynchronous batch processing strategy
///
/// # Configuration
///
/// The strategy accepts a BatchConfig with:
/// - `batch_size`: Number of rows per batch (default: 1000)
/// - `max_concurrent_batches`: Number of worker threads (default: CPU cores)
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    config: BatchConfig,
}

impl AsyncProcessingStrategy {
    /// Create a new AsyncProcessingStrategy with the specified configuration
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    /// Convert the input file using batched, parallel classification
    ///
    /// 1. Creates a tokio multi-threaded runtime
    /// 2. Reads rows in batches using AsyncReader
    /// 3. Classifies each batch across the worker threads
    /// 4. Renders and writes the batch's entries before reading the next batch
    ///
    /// # Error Handling
    ///
    /// Fatal errors (file not found, width mismatch, missing field, runtime or
    /// output errors) end the run. Every entry before the failing row is written
    /// first, as with the sync strategy. Render failures are logged and counted.
    fn process(
        &self,
        input_path: &Path,
        job: &ConvertJob,
        output: &mut dyn Write,
    ) -> Result<ConvertStats, ConvertError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.max_concurrent_batches)
            .build()
            .map_err(|e| ConvertError::runtime(format!("Failed to create tokio runtime: {}", e)))?;

        runtime.block_on(async {
            let classifier = BatchClassifier::new(
                Arc::clone(&job.layout),
                Arc::clone(&job.rules),
                self.config.max_concurrent_batches,
            );

            let file = tokio::fs::File::open(input_path)
                .await
                .map_err(|e| open_error(input_path, e))?;

            // csv-async reads through the futures io traits
            let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);
            let mut reader = AsyncReader::new(compat_file, &job.layout);
            let mut stats = ConvertStats::default();

            loop {
                let batch = reader.read_batch(self.config.batch_size).await?;
                if batch.is_empty() {
                    break;
                }

                debug!(rows = batch.len(), "classifying batch");
                let classified = classifier.classify_batch(batch).await;
                for entry in &classified.entries {
                    write_entry(entry, &job.template, output, &mut stats)?;
                }
                if let Some(e) = classified.error {
                    output.flush()?;
                    return Err(e);
                }
            }

            output.flush()?;
            Ok(stats)
        })
    }
}
