//! Reference-layout date handling
//!
//! Date formats in the configuration are written the way the reference instant
//! `Mon Jan 2 15:04:05 MST 2006` would look in that format: `02.01.2006` reads
//! German bank dates, `2006-01-02` writes ISO dates. A [`DateLayout`] translates
//! such a layout into a chrono strftime format once, so parsing and formatting
//! per row is a plain chrono call.
//!
//! Any text that is not a recognised token is copied literally, including `%`.
//!
//! Numeric fields accept input without their padding: `02.01.2006` reads
//! `4.4.2019` as well as `04.04.2019`. Zone offsets are read (a `Z07:00` layout
//! also takes a literal `Z`) but dropped, so the wall-clock time is kept.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt::Write;

/// Layout tokens and their strftime equivalents, longest spelling first so that
/// `January` wins over `Jan` and `2006` wins over `2`.
const TOKENS: &[(&str, &str)] = &[
    ("January", "%B"),
    ("Jan", "%b"),
    ("Monday", "%A"),
    ("Mon", "%a"),
    ("MST", "%Z"),
    ("_2006", "_%Y"),
    ("2006", "%Y"),
    ("002", "%j"),
    ("01", "%m"),
    ("02", "%d"),
    ("03", "%I"),
    ("04", "%M"),
    ("05", "%S"),
    ("06", "%y"),
    ("_2", "%e"),
    ("15", "%H"),
    ("1", "%-m"),
    ("2", "%-d"),
    ("3", "%-I"),
    ("4", "%-M"),
    ("5", "%-S"),
    ("PM", "%p"),
    ("pm", "%P"),
    ("Z07:00", "%#z"),
    ("Z0700", "%#z"),
    ("Z07", "%#z"),
    ("-07:00", "%:z"),
    ("-0700", "%z"),
    ("-07", "%#z"),
    (".000000000", "%.9f"),
    (".000000", "%.6f"),
    (".000", "%.3f"),
    ("%", "%%"),
];

/// A date layout in reference-date notation, pre-translated for chrono
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateLayout {
    layout: String,
    strftime: String,
}

impl DateLayout {
    /// Translate a reference layout. Every string is a valid layout.
    pub fn new(layout: &str) -> Self {
        Self {
            layout: layout.to_string(),
            strftime: translate(layout),
        }
    }

    /// The layout as written in the configuration
    pub fn as_str(&self) -> &str {
        &self.layout
    }

    /// The equivalent chrono strftime format
    pub fn strftime(&self) -> &str {
        &self.strftime
    }

    /// Parse a date or datetime written in this layout
    ///
    /// Layouts without time components yield midnight. Layouts with only time
    /// components yield that time on January 1st of year 0.
    pub fn parse(&self, value: &str) -> Result<NaiveDateTime, chrono::ParseError> {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(value, &self.strftime) {
            return Ok(datetime);
        }

        match NaiveDate::parse_from_str(value, &self.strftime) {
            Ok(date) => Ok(date.and_time(NaiveTime::default())),
            Err(e) => NaiveTime::parse_from_str(value, &self.strftime)
                .map(|time| year_zero().and_time(time))
                .map_err(|_| e),
        }
    }

    /// Render a datetime in this layout
    ///
    /// Fails when the layout asks for something a naive datetime cannot supply,
    /// such as a zone name.
    pub fn format(&self, datetime: &NaiveDateTime) -> Result<String, std::fmt::Error> {
        let mut out = String::new();
        write!(out, "{}", datetime.format(&self.strftime))?;
        Ok(out)
    }
}

impl Default for DateLayout {
    fn default() -> Self {
        Self::new("2006-01-02")
    }
}

/// The instant used when a date cannot be parsed: `0001-01-01 00:00:00`
pub fn zero_instant() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1, 1, 1)
        .unwrap_or_default()
        .and_time(NaiveTime::default())
}

fn year_zero() -> NaiveDate {
    NaiveDate::from_ymd_opt(0, 1, 1).unwrap_or_default()
}

fn translate(layout: &str) -> String {
    let mut out = String::with_capacity(layout.len() * 2);
    let mut rest = layout;

    'outer: while !rest.is_empty() {
        for (token, directive) in TOKENS {
            if let Some(tail) = rest.strip_prefix(token) {
                out.push_str(directive);
                rest = tail;
                continue 'outer;
            }
        }

        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            out.push(c);
        }
        rest = chars.as_str();
    }

    out
}
