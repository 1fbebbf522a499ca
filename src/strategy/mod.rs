//! Processing strategy module for conversion runs
//!
//! This module defines the Strategy pattern for complete conversion pipelines,
//! covering CSV reading, classification, rendering and output. This allows
//! different processing implementations (synchronous, asynchronous batch) to be
//! selected at runtime while producing the same output.

use crate::cli::StrategyType;
use crate::io::Template;
use crate::types::{ConvertError, Entry, FieldLayout, RuleSet};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tracing::error;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// Everything a strategy needs besides the input and output
#[derive(Debug, Clone)]
pub struct ConvertJob {
    /// Field layout of the export
    pub layout: Arc<FieldLayout>,
    /// Classification rules
    pub rules: Arc<RuleSet>,
    /// Output template
    pub template: Template,
}

impl ConvertJob {
    /// Bundle a layout, rules and template into a job
    pub fn new(layout: FieldLayout, rules: RuleSet, template: Template) -> Self {
        Self {
            layout: Arc::new(layout),
            rules: Arc::new(rules),
            template,
        }
    }
}

/// Outcome counters of a conversion run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertStats {
    /// Entries rendered and written
    pub written: usize,
    /// Rows whose entry failed to render
    pub render_failures: usize,
}

/// Processing strategy trait for complete conversion pipelines
///
/// Each strategy reads data rows from a CSV file, classifies them into entries,
/// renders each entry through the job's template and writes it to output, in
/// input order.
pub trait ProcessingStrategy: Send + Sync {
    /// Convert the input file and write the rendered entries to output
    ///
    /// # Arguments
    ///
    /// * `input_path` - Path to the CSV export
    /// * `job` - Layout, rules and template for the run
    /// * `output` - Writer receiving the rendered entries
    ///
    /// # Returns
    ///
    /// * `Ok(ConvertStats)` once every row was handled
    /// * `Err(ConvertError)` on the first fatal error
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The input file cannot be opened
    /// - A record fails to tokenize or has the wrong width
    /// - A configured column is missing from a row
    /// - Output cannot be written
    ///
    /// A render failure is logged and counted, and processing continues with the
    /// next row. Entries already written stay written when a later row fails.
    fn process(
        &self,
        input_path: &Path,
        job: &ConvertJob,
        output: &mut dyn Write,
    ) -> Result<ConvertStats, ConvertError>;
}

/// Render one entry and write it to output
///
/// A render failure is row-local: it is logged, counted and swallowed. A write
/// failure is returned.
pub(crate) fn write_entry(
    entry: &Entry,
    template: &Template,
    output: &mut dyn Write,
    stats: &mut ConvertStats,
) -> Result<(), ConvertError> {
    let written = template.render(entry).and_then(|text| {
        output
            .write_all(text.as_bytes())
            .map_err(ConvertError::from)
    });

    match written {
        Ok(()) => stats.written += 1,
        Err(e) if e.is_row_local() => {
            error!(error = %e, record = %entry.raw, "failed to render entry");
            stats.render_failures += 1;
        }
        Err(e) => return Err(e),
    }
    Ok(())
}

/// Create a processing strategy based on the specified strategy type
///
/// # Arguments
///
/// * `strategy_type` - The type of processing strategy to create (Sync or Async)
/// * `config` - Optional configuration for async batch processing (ignored for sync)
///
/// # Returns
///
/// A boxed trait object implementing the ProcessingStrategy trait
pub fn create_strategy(
    strategy_type: StrategyType,
    config: Option<BatchConfig>,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy),
        StrategyType::Async => {
            let config = config.unwrap_or_default();
            Box::new(AsyncProcessingStrategy::new(config))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> Entry {
        Entry {
            account_in: "Expenses:Unknown".to_string(),
            account_out: "Assets:Unknown".to_string(),
            amount_in: "1.00".to_string(),
            amount_out: "-1.00".to_string(),
            comment: None,
            currency: "EUR".to_string(),
            date: "2020-01-01".to_string(),
            description: String::new(),
            payee: "Shop".to_string(),
            raw: "[]".to_string(),
        }
    }

    struct BrokenWriter;

    impl Write for BrokenWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_entry_counts_written() {
        let template = Template::parse("{{.Payee}}\n").unwrap();
        let mut output = Vec::new();
        let mut stats = ConvertStats::default();

        write_entry(&entry(), &template, &mut output, &mut stats).unwrap();
        assert_eq!(output, b"Shop\n");
        assert_eq!(stats, ConvertStats { written: 1, render_failures: 0 });
    }

    #[test]
    fn test_write_entry_swallows_render_failure() {
        let template = Template::parse("{{.Nope}}").unwrap();
        let mut output = Vec::new();
        let mut stats = ConvertStats::default();

        write_entry(&entry(), &template, &mut output, &mut stats).unwrap();
        assert!(output.is_empty());
        assert_eq!(stats.render_failures, 1);
    }

    #[test]
    fn test_write_entry_write_failure_is_fatal() {
        let template = Template::default();
        let mut stats = ConvertStats::default();

        let err = write_entry(&entry(), &template, &mut BrokenWriter, &mut stats).unwrap_err();
        assert!(matches!(err, ConvertError::Io { .. }));
        assert!(!err.is_row_local());
        assert_eq!(stats, ConvertStats::default());
    }

    #[test]
    fn test_create_strategy_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn ProcessingStrategy>();
        let _ = create_strategy(StrategyType::Sync, None);
        let _ = create_strategy(StrategyType::Async, Some(BatchConfig::new(10, 2)));
    }
}
