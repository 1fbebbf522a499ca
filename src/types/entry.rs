//! Row and entry types
//!
//! A [`RawRow`] is what the CSV reader hands to the classifier; an [`Entry`] is
//! what the classifier hands to the template renderer.

/// The fields of one CSV record, in column order
pub type RawRow = Vec<String>;

/// A resolved double-entry record
///
/// Both amounts are strings already in canonical form. `amount_in` and
/// `amount_out` have the same magnitude and opposite signs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Account credited by the transaction
    pub account_in: String,
    /// Account debited by the transaction
    pub account_out: String,
    /// Amount on the `account_in` leg
    pub amount_in: String,
    /// Amount on the `account_out` leg
    pub amount_out: String,
    /// Comment set by a matching rule
    pub comment: Option<String>,
    /// Currency code of both legs
    pub currency: String,
    /// Booking date in the output layout
    pub date: String,
    /// Description field, verbatim
    pub description: String,
    /// Payee field, verbatim
    pub payee: String,
    /// Debug rendering of the original row
    pub raw: String,
}
