//! Synchronous processing strategy
//!
//! This module provides a synchronous, single-threaded implementation of the
//! ProcessingStrategy trait.
//!
//! # Design
//!
//! The SyncProcessingStrategy focuses on orchestration, delegating:
//! - CSV reading to `SyncReader` (iterator interface)
//! - Row classification to `core::classify`
//! - Rendering to the job's `Template`
//!
//! # Memory Efficiency
//!
//! Rows are read, classified, rendered and written one at a time, so memory use
//! does not grow with the size of the export.

use crate::core::classify;
use crate::io::sync_reader::SyncReader;
use crate::strategy::{write_entry, ConvertJob, ConvertStats, ProcessingStrategy};
use crate::types::ConvertError;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Synchronous processing strategy
///
/// # Examples
///
/// ```no_run
/// use csv2beancount::config::Config;
/// use csv2beancount::io::Template;
/// use csv2beancount::strategy::{ConvertJob, ProcessingStrategy, SyncProcessingStrategy};
/// use std::path::Path;
/// use std::io;
///
/// let config = Config::default();
/// let job = ConvertJob::new(config.layout, config.rules, Template::default());
/// let mut output = io::stdout();
///
/// SyncProcessingStrategy
///     .process(Path::new("export.csv"), &job, &mut output)
///     .expect("Conversion failed");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SyncProcessingStrategy;

impl ProcessingStrategy for SyncProcessingStrategy {
    fn process(
        &self,
        input_path: &Path,
        job: &ConvertJob,
        output: &mut dyn Write,
    ) -> Result<ConvertStats, ConvertError> {
        let reader = SyncReader::from_path(input_path, &job.layout)?;
        let mut stats = ConvertStats::default();

        for result in reader {
            let (line, row) = result?;
            let entry = classify(&row, &job.layout, &job.rules)?;
            debug!(line, account = %entry.account_in, "classified row");
            write_entry(&entry, &job.template, output, &mut stats)?;
        }

        output.flush()?;
        Ok(stats)
    }
}
