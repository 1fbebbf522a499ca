//! Parallel batch classification with order-preserving reassembly
//!
//! This module provides the `BatchClassifier` struct, which splits a batch of rows
//! into contiguous chunks, classifies the chunks concurrently on tokio tasks and
//! concatenates the results back in row order.
//!
//! # Design
//!
//! Classification has no shared mutable state, so chunks need no coordination
//! beyond sharing the read-only layout and rules through `Arc`. Chunks are
//! contiguous and awaited in spawn order, which makes the output order of
//! [`BatchClassifier::classify_batch`] identical to its input order.

use std::sync::Arc;

use crate::core::classify;
use crate::types::{ConvertError, Entry, FieldLayout, RawRow, RuleSet};

/// One row of a batch with the source line it came from
pub type NumberedRow = (u64, RawRow);

/// Entries classified before the first fatal error, and that error
#[derive(Debug, Default, PartialEq)]
pub struct ClassifiedBatch {
    /// Entries of the rows before the failing one, in row order
    pub entries: Vec<Entry>,
    /// First fatal error in row order
    pub error: Option<ConvertError>,
}

impl ClassifiedBatch {
    /// Append a later chunk, dropping it when this batch already failed
    fn append(&mut self, chunk: ClassifiedBatch) {
        if self.error.is_none() {
            self.entries.extend(chunk.entries);
            self.error = chunk.error;
        }
    }
}

/// Batch classifier with contiguous chunking
#[derive(Debug, Clone)]
pub struct BatchClassifier {
    layout: Arc<FieldLayout>,
    rules: Arc<RuleSet>,
    workers: usize,
}

impl BatchClassifier {
    /// Create a new BatchClassifier
    ///
    /// # Arguments
    ///
    /// * `layout` - Shared field layout
    /// * `rules` - Shared rule set
    /// * `workers` - Number of chunks a batch is split into (at least 1)
    pub fn new(layout: Arc<FieldLayout>, rules: Arc<RuleSet>, workers: usize) -> Self {
        Self {
            layout,
            rules,
            workers: workers.max(1),
        }
    }

    /// Split a batch into at most `workers` contiguous chunks of near-equal size
    ///
    /// # Guarantees
    ///
    /// - Each row appears in exactly one chunk
    /// - Concatenating the chunks yields the original batch
    pub fn partition(&self, batch: Vec<NumberedRow>) -> Vec<Vec<NumberedRow>> {
        if batch.is_empty() {
            return Vec::new();
        }

        let chunk_size = batch.len().div_ceil(self.workers);
        let mut chunks = Vec::with_capacity(self.workers);
        let mut rows = batch.into_iter().peekable();

        while rows.peek().is_some() {
            chunks.push(rows.by_ref().take(chunk_size).collect());
        }

        chunks
    }

    /// Classify one chunk sequentially, stopping at the first fatal error
    pub fn classify_chunk(&self, chunk: Vec<NumberedRow>) -> ClassifiedBatch {
        let mut classified = ClassifiedBatch::default();
        for (_, row) in &chunk {
            match classify(row, &self.layout, &self.rules) {
                Ok(entry) => classified.entries.push(entry),
                Err(e) => {
                    classified.error = Some(e);
                    break;
                }
            }
        }
        classified
    }

    /// Classify a batch concurrently
    ///
    /// # Returns
    ///
    /// The entries in the same order as the input rows. When a row fails, the
    /// entries stop before it and the error is the first fatal error in row order.
    pub async fn classify_batch(&self, batch: Vec<NumberedRow>) -> ClassifiedBatch {
        let mut tasks = Vec::new();
        for chunk in self.partition(batch) {
            let classifier = self.clone();
            tasks.push(tokio::spawn(async move { classifier.classify_chunk(chunk) }));
        }

        let mut classified = ClassifiedBatch::default();
        for result in futures::future::join_all(tasks).await {
            let chunk = result.unwrap_or_else(|e| ClassifiedBatch {
                entries: Vec::new(),
                error: Some(ConvertError::runtime(format!(
                    "classification task failed: {}",
                    e
                ))),
            });
            classified.append(chunk);
        }

        classified
    }
}
