//! Transaction classifier
//!
//! This module turns one [`RawRow`] into one [`Entry`]. It enforces:
//! - every configured column exists in the row (a fatal shape error otherwise)
//! - the direction of the transaction follows the sign of the resolved amount
//! - rules only ever override the counter-account, never the processing account
//!
//! Classification is pure: the same row, layout and rules always produce an equal
//! entry, so rows can be classified in any order or in parallel.

use crate::core::amount;
use crate::core::date::zero_instant;
use crate::types::{ConvertError, Entry, FieldLayout, RawRow, RuleSet};
use tracing::warn;

/// Classify one row into a ledger entry
///
/// # Arguments
///
/// * `row` - The fields of one CSV record
/// * `layout` - Column positions and per-file settings
/// * `rules` - Rules that may override the counter-account and comment
///
/// # Errors
///
/// Returns [`ConvertError::MissingField`] if any column the layout refers to is
/// past the end of the row. A date that fails to parse is not an error: it is
/// logged and the zero date is used instead.
pub fn classify(row: &RawRow, layout: &FieldLayout, rules: &RuleSet) -> Result<Entry, ConvertError> {
    let date = format_date(field(row, "date", layout.date)?, layout);
    let payee = field(row, "payee", layout.payee)?.to_string();
    let description = field(row, "description", layout.description)?.to_string();
    let amount = resolve_amount(row, layout)?;

    let mut comment = None;

    let (account_in, account_out, amount_in, amount_out) = if amount::is_negative(&amount) {
        // Debit: money leaves the processing account
        let mut account_in = layout.default_account.clone();
        rules.apply(&payee, &description, &mut account_in, &mut comment);

        let amount_in = amount::unsigned(&amount).to_string();
        (account_in, layout.processing_account.clone(), amount_in, amount)
    } else {
        // Credit: money arrives in the processing account
        let mut account_out = layout.default_account.clone();
        rules.apply(&payee, &description, &mut account_out, &mut comment);

        let amount_out = amount::negate(&amount);
        (layout.processing_account.clone(), account_out, amount, amount_out)
    };

    Ok(Entry {
        account_in,
        account_out,
        amount_in,
        amount_out,
        comment,
        currency: layout.currency.clone(),
        date,
        description,
        payee,
        raw: format!("{:?}", row),
    })
}

fn field<'a>(row: &'a RawRow, name: &str, index: usize) -> Result<&'a str, ConvertError> {
    row.get(index)
        .map(String::as_str)
        .ok_or_else(|| ConvertError::missing_field(name, index, row.len()))
}

fn format_date(value: &str, layout: &FieldLayout) -> String {
    let instant = match layout.date_layout_in.parse(value) {
        Ok(instant) => instant,
        Err(e) => {
            warn!(
                layout = layout.date_layout_in.as_str(),
                value,
                error = %e,
                "error parsing date"
            );
            zero_instant()
        }
    };

    layout.date_layout_out.format(&instant).unwrap_or_else(|_| {
        warn!(
            layout = layout.date_layout_out.as_str(),
            "output date layout cannot be rendered"
        );
        String::new()
    })
}

/// Resolve the single signed amount of the row
///
/// With one amount column the value's own sign is the direction. With two
/// columns, a non-empty amount-in is a credit as written; otherwise the
/// amount-out value is a debit and is returned negative.
fn resolve_amount(row: &RawRow, layout: &FieldLayout) -> Result<String, ConvertError> {
    let amount_in = field(row, "amount_in", layout.amount_in)?;

    if layout.single_amount_column() {
        return Ok(amount::normalize(amount_in));
    }

    if !amount_in.is_empty() {
        return Ok(amount::normalize(amount_in));
    }

    let amount_out = field(row, "amount_out", layout.amount_out)?;
    if amount_out.is_empty() {
        return Ok(String::new());
    }

    let normalized = amount::normalize(amount_out);
    Ok(amount::negate(amount::unsigned(&normalized)))
}
