//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `layout`: where fields live in a row and the per-file settings
//! - `rule`: compiled transaction rules and the ordered rule set
//! - `entry`: raw rows and resolved ledger entries
//! - `error`: Error types for the converter

pub mod entry;
pub mod error;
pub mod layout;
pub mod rule;

pub use entry::{Entry, RawRow};
pub use error::ConvertError;
pub use layout::{FieldCount, FieldLayout};
pub use rule::{Rule, RuleSet};
