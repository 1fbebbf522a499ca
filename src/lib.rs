//! csv2beancount Library
//! # Overview
//!
//! This library converts the CSV exports of bank accounts into beancount ledger
//! entries, with a streaming sync strategy and a batched async strategy.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (FieldLayout, Rule, Entry, ConvertError)
//! - [`config`] - TOML configuration loading and validation
//! - [`cli`] - CLI arguments parsing and log setup
//! - [`core`] - Conversion logic:
//!   - [`core::amount`] - Amount normalization
//!   - [`core::date`] - Date layouts
//!   - [`core::rules`] - Rule matching
//!   - [`core::classifier`] - Row to entry classification
//! - [`io`] - CSV readers and output templates
//! - [`strategy`] - Complete pipelines selectable at runtime
//!
//! # Direction
//!
//! Every row becomes one two-legged entry. A negative amount is a debit: money
//! leaves the processing account and goes to the counter-account. Anything else
//! is a credit: money arrives in the processing account from the
//! counter-account. The counter-account starts as the default account and may
//! be replaced by matching rules.

// Module declarations
pub mod cli;
pub mod config;
pub mod core;
pub mod io;
pub mod strategy;
pub mod types;

pub use config::Config;
pub use core::{classify, normalize, BatchClassifier, DateLayout};
pub use io::{load_template, Template};
pub use types::{ConvertError, Entry, FieldCount, FieldLayout, RawRow, Rule, RuleSet};
