//! Core conversion logic module
//!
//! This module contains the row transformation components:
//! - `amount` - Locale-aware amount normalization and sign helpers
//! - `date` - Reference-layout date parsing and formatting
//! - `rules` - Rule matching and last-writer-wins application
//! - `classifier` - Row to entry classification (legs, direction, rules)
//! - `batch` - Parallel, order-preserving classification of row batches

pub mod amount;
pub mod batch;
pub mod classifier;
pub mod date;
pub mod rules;

pub use amount::normalize;
pub use batch::BatchClassifier;
pub use classifier::classify;
pub use date::DateLayout;
