//! Field layout of a CSV export
//!
//! A [`FieldLayout`] says which column carries which semantic field, how wide
//! rows must be, how dates are written, and which accounts the two legs default
//! to. It is built once per run and shared read-only by every row conversion.

use crate::core::date::DateLayout;

/// Default counter-account when no rule overrides it
pub const DEFAULT_ACCOUNT: &str = "Expenses:Unknown";

/// Default account for the CSV file itself
pub const DEFAULT_PROCESSING_ACCOUNT: &str = "Assets:Unknown";

/// Default output date layout (`YYYY-MM-DD`)
pub const DEFAULT_DATE_LAYOUT_OUT: &str = "2006-01-02";

/// Default field separator
pub const DEFAULT_SEPARATOR: u8 = b';';

/// Row width policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldCount {
    /// Accept rows of any width
    Unchecked,
    /// Every row must match the width of the first data row
    #[default]
    Infer,
    /// Every row must have exactly this many fields
    Exact(usize),
}

impl FieldCount {
    /// Interpret the configuration value: `-1` no check, `0` infer, `n > 0` exact
    pub fn from_config(value: i64) -> Option<Self> {
        match value {
            -1 => Some(FieldCount::Unchecked),
            0 => Some(FieldCount::Infer),
            n if n > 0 => usize::try_from(n).ok().map(FieldCount::Exact),
            _ => None,
        }
    }
}

/// Where each semantic field lives in a raw row, plus the per-file settings
#[derive(Debug, Clone, PartialEq)]
pub struct FieldLayout {
    /// Column of the booking date
    pub date: usize,
    /// Column of the payee
    pub payee: usize,
    /// Column of the description
    pub description: usize,
    /// Column of incoming amounts
    ///
    /// When equal to `amount_out`, that single column carries signed amounts.
    pub amount_in: usize,
    /// Column of outgoing amounts
    pub amount_out: usize,
    /// Currency code written on both legs
    pub currency: String,
    /// Row width policy
    pub fields: FieldCount,
    /// Layout of dates in the CSV
    pub date_layout_in: DateLayout,
    /// Layout of dates in the output
    pub date_layout_out: DateLayout,
    /// Counter-account used when no rule matches
    pub default_account: String,
    /// The account this CSV export belongs to
    pub processing_account: String,
    /// Field separator
    pub separator: u8,
    /// Number of leading non-blank records to discard
    pub skip: usize,
}

impl FieldLayout {
    /// Whether one column carries signed amounts in both directions
    pub fn single_amount_column(&self) -> bool {
        self.amount_in == self.amount_out
    }
}

impl Default for FieldLayout {
    fn default() -> Self {
        Self {
            date: 0,
            payee: 0,
            description: 0,
            amount_in: 0,
            amount_out: 0,
            currency: String::new(),
            fields: FieldCount::Infer,
            date_layout_in: DateLayout::new(""),
            date_layout_out: DateLayout::new(DEFAULT_DATE_LAYOUT_OUT),
            default_account: DEFAULT_ACCOUNT.to_string(),
            processing_account: DEFAULT_PROCESSING_ACCOUNT.to_string(),
            separator: DEFAULT_SEPARATOR,
            skip: 0,
        }
    }
}
