//! Error types for csv2beancount
//!
//! This module defines all error types that can occur while converting a CSV export.
//! Errors carry plain string payloads so they stay `Clone + PartialEq` and can be
//! compared directly in tests.
//!
//! # Error Categories
//!
//! - **File I/O Errors**: input not found, output not writable
//! - **CSV Errors**: tokenization failures, rows of the wrong width
//! - **Row Shape Errors**: a configured column index past the end of a row
//! - **Configuration Errors**: unreadable config, bad separator, invalid rule pattern
//! - **Template Errors**: unterminated placeholders, unknown fields at render time
//!
//! Only [`ConvertError::Render`] is row-local; the strategies log it and move on.
//! Every other variant aborts the run.

use thiserror::Error;

/// Main error type for the converter
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConvertError {
    /// Input file not found at the specified path
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O error while reading input or writing output
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
    },

    /// The CSV tokenizer rejected a record
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    Parse {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },

    /// A record does not have the width the layout demands
    #[error("Record on line {line} has {found} fields, expected {expected}")]
    FieldCount {
        /// Line number of the offending record
        line: u64,
        /// Width required by the layout (explicit or inferred)
        expected: usize,
        /// Width of the offending record
        found: usize,
    },

    /// A configured column index is past the end of the row
    #[error("Missing {field} field: column {index} requested but the row has {width} fields")]
    MissingField {
        /// Semantic name of the field (date, payee, ...)
        field: String,
        /// Configured zero-based column index
        index: usize,
        /// Number of fields in the row
        width: usize,
    },

    /// The configuration could not be read or is invalid
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the problem
        message: String,
    },

    /// A rule pattern failed to compile
    #[error("Invalid {field} pattern in rule '{rule}': {message}")]
    InvalidPattern {
        /// Name of the rule
        rule: String,
        /// Which pattern (match_payee or match_description)
        field: String,
        /// Regex compiler message
        message: String,
    },

    /// The template text could not be parsed
    #[error("Template error: {message}")]
    Template {
        /// Description of the syntax error
        message: String,
    },

    /// An entry could not be rendered through the template
    #[error("Render error: {message}")]
    Render {
        /// Description of the failure
        message: String,
    },

    /// The async runtime failed or a worker task panicked
    #[error("Runtime error: {message}")]
    Runtime {
        /// Description of the failure
        message: String,
    },
}

impl From<std::io::Error> for ConvertError {
    fn from(error: std::io::Error) -> Self {
        ConvertError::Io {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for ConvertError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        ConvertError::Parse {
            line,
            message: error.to_string(),
        }
    }
}

impl From<csv_async::Error> for ConvertError {
    fn from(error: csv_async::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        ConvertError::Parse {
            line,
            message: error.to_string(),
        }
    }
}

impl From<toml::de::Error> for ConvertError {
    fn from(error: toml::de::Error) -> Self {
        ConvertError::Config {
            message: error.message().to_string(),
        }
    }
}

// Helper functions for creating common errors

impl ConvertError {
    /// Create a MissingField error
    pub fn missing_field(field: &str, index: usize, width: usize) -> Self {
        ConvertError::MissingField {
            field: field.to_string(),
            index,
            width,
        }
    }

    /// Create a FieldCount error
    pub fn field_count(line: u64, expected: usize, found: usize) -> Self {
        ConvertError::FieldCount {
            line,
            expected,
            found,
        }
    }

    /// Create a Config error
    pub fn config(message: impl Into<String>) -> Self {
        ConvertError::Config {
            message: message.into(),
        }
    }

    /// Create an InvalidPattern error
    pub fn invalid_pattern(rule: &str, field: &str, message: impl Into<String>) -> Self {
        ConvertError::InvalidPattern {
            rule: rule.to_string(),
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Create a Template error
    pub fn template(message: impl Into<String>) -> Self {
        ConvertError::Template {
            message: message.into(),
        }
    }

    /// Create a Render error
    pub fn render(message: impl Into<String>) -> Self {
        ConvertError::Render {
            message: message.into(),
        }
    }

    /// Create a Runtime error
    pub fn runtime(message: impl Into<String>) -> Self {
        ConvertError::Runtime {
            message: message.into(),
        }
    }

    /// Whether the error only affects the row it was raised for
    pub fn is_row_local(&self) -> bool {
        matches!(self, ConvertError::Render { .. })
    }
}
