//! Amount string handling
//!
//! Amounts stay strings from the CSV to the rendered ledger line. The only
//! transformation is [`normalize`], which rewrites German-style `1.344,01` into
//! `1344.01`; the sign helpers work on the leading `-` alone.

/// Normalize a locale-formatted amount to use `.` as the decimal separator
///
/// When the value ends in a comma followed by exactly two digits, every `.` is
/// treated as a thousands separator and dropped, and the comma becomes `.`.
/// Anything else is returned unchanged.
pub fn normalize(raw: &str) -> String {
    if has_decimal_comma(raw) {
        raw.replace('.', "").replace(',', ".")
    } else {
        raw.to_string()
    }
}

fn has_decimal_comma(raw: &str) -> bool {
    match raw.as_bytes() {
        [.., b',', d1, d2] => d1.is_ascii_digit() && d2.is_ascii_digit(),
        _ => false,
    }
}

/// Whether the amount carries a leading minus sign
pub fn is_negative(amount: &str) -> bool {
    amount.starts_with('-')
}

/// The amount without its leading minus sign
pub fn unsigned(amount: &str) -> &str {
    amount.strip_prefix('-').unwrap_or(amount)
}

/// The amount with a minus sign prefixed
pub fn negate(amount: &str) -> String {
    format!("-{amount}")
}
