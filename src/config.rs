//! Configuration loading
//!
//! The configuration is a TOML file with a `[csv]` table describing the export's
//! layout and a `[transactions_rules.<name>]` table per rule:
//!
//! ```toml
//! [csv]
//! amount_in = 7
//! amount_out = 7
//! currency = "EUR"
//! date = 0
//! date_layout_in = "02.01.2006"
//! description = 4
//! payee = 2
//! skip = 10
//!
//! [transactions_rules.travel]
//! match_payee = "RYANAIR"
//! set_account = "Expenses:Travel"
//! ```
//!
//! Missing keys take their defaults. Any `[csv]` key can also be set through
//! the environment as `CSV2BEANCOUNT_CSV_<KEY>` (for example
//! `CSV2BEANCOUNT_CSV_SKIP=10`), which takes precedence over the file. The file
//! is validated and every rule is compiled here, so a bad configuration stops
//! the run before any row is read.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::core::date::DateLayout;
use crate::types::layout::{
    DEFAULT_ACCOUNT, DEFAULT_DATE_LAYOUT_OUT, DEFAULT_PROCESSING_ACCOUNT,
};
use crate::types::{ConvertError, FieldCount, FieldLayout, Rule, RuleSet};

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Prefix of environment variables overriding `[csv]` keys
pub const ENV_PREFIX: &str = "CSV2BEANCOUNT_CSV_";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    csv: CsvConfig,
    #[serde(default)]
    transactions_rules: BTreeMap<String, RuleConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct CsvConfig {
    amount_in: usize,
    amount_out: usize,
    currency: String,
    date: usize,
    date_layout_in: String,
    date_layout_out: String,
    default_account: String,
    description: usize,
    fields: i64,
    payee: usize,
    processing_account: String,
    separator: String,
    skip: usize,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            amount_in: 0,
            amount_out: 0,
            currency: String::new(),
            date: 0,
            date_layout_in: String::new(),
            date_layout_out: DEFAULT_DATE_LAYOUT_OUT.to_string(),
            default_account: DEFAULT_ACCOUNT.to_string(),
            description: 0,
            fields: 0,
            payee: 0,
            processing_account: DEFAULT_PROCESSING_ACCOUNT.to_string(),
            separator: ";".to_string(),
            skip: 0,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RuleConfig {
    match_payee: String,
    match_description: String,
    set_account: String,
    set_comment: String,
}

/// A validated configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Field layout of the CSV export
    pub layout: FieldLayout,
    /// Transaction rules, ordered by name
    pub rules: RuleSet,
}

impl Config {
    /// Parse and validate a TOML configuration
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::Config`] for malformed TOML, unknown keys, a
    /// separator that is not one ASCII character, or a `fields` value below -1,
    /// and [`ConvertError::InvalidPattern`] for a rule pattern that does not compile.
    pub fn from_toml_str(content: &str) -> Result<Self, ConvertError> {
        Self::from_toml_str_with_env(content, std::iter::empty())
    }

    /// Parse and validate a TOML configuration, then apply environment overrides
    ///
    /// Variables named `CSV2BEANCOUNT_CSV_<KEY>` replace the `[csv]` key of the
    /// same name (case-insensitive). Other variables are ignored; an unknown key
    /// after the prefix is logged with `warn!` and ignored.
    ///
    /// # Errors
    ///
    /// As [`Config::from_toml_str`], plus [`ConvertError::Config`] for an
    /// override whose value does not parse as the key's type.
    pub fn from_toml_str_with_env<I>(content: &str, vars: I) -> Result<Self, ConvertError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut raw: RawConfig = toml::from_str(content)?;
        apply_env(&mut raw.csv, vars)?;

        let layout = build_layout(raw.csv)?;
        let rules = raw
            .transactions_rules
            .iter()
            .map(|(name, rule)| {
                Rule::new(
                    name,
                    &rule.match_payee,
                    &rule.match_description,
                    &rule.set_account,
                    &rule.set_comment,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            layout,
            rules: RuleSet::new(rules),
        })
    }

    /// Load the configuration for a run
    ///
    /// With an explicit path the file must exist. Without one, `config.toml` in
    /// the working directory is used when present and defaults otherwise. The
    /// process environment is applied on top in both cases.
    pub fn load(path: Option<&Path>) -> Result<Self, ConvertError> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if !explicit && e.kind() == std::io::ErrorKind::NotFound => {
                debug!(file = %path.display(), "no config file found, using defaults");
                String::new()
            }
            Err(e) => {
                return Err(ConvertError::config(format!(
                    "cannot read '{}': {}",
                    path.display(),
                    e
                )))
            }
        };

        let config = Self::from_toml_str_with_env(&content, std::env::vars())?;
        debug!(
            file = %path.display(),
            rules = config.rules.len(),
            "config loaded"
        );
        Ok(config)
    }
}

fn apply_env<I>(csv: &mut CsvConfig, vars: I) -> Result<(), ConvertError>
where
    I: IntoIterator<Item = (String, String)>,
{
    for (name, value) in vars {
        let Some(key) = name.strip_prefix(ENV_PREFIX) else {
            continue;
        };

        match key.to_ascii_lowercase().as_str() {
            "amount_in" => csv.amount_in = env_value(&name, &value)?,
            "amount_out" => csv.amount_out = env_value(&name, &value)?,
            "currency" => csv.currency = value,
            "date" => csv.date = env_value(&name, &value)?,
            "date_layout_in" => csv.date_layout_in = value,
            "date_layout_out" => csv.date_layout_out = value,
            "default_account" => csv.default_account = value,
            "description" => csv.description = env_value(&name, &value)?,
            "fields" => csv.fields = env_value(&name, &value)?,
            "payee" => csv.payee = env_value(&name, &value)?,
            "processing_account" => csv.processing_account = value,
            "separator" => csv.separator = value,
            "skip" => csv.skip = env_value(&name, &value)?,
            _ => {
                warn!(variable = %name, "unknown configuration variable ignored");
                continue;
            }
        }
        debug!(variable = %name, "config key set from environment");
    }
    Ok(())
}

fn env_value<T>(name: &str, value: &str) -> Result<T, ConvertError>
where
    T: FromStr,
    T::Err: Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| ConvertError::config(format!("{} = '{}': {}", name, value, e)))
}

fn build_layout(csv: CsvConfig) -> Result<FieldLayout, ConvertError> {
    let separator = match csv.separator.as_bytes() {
        [byte] if byte.is_ascii() => *byte,
        _ => {
            return Err(ConvertError::config(format!(
                "separator must be a single ASCII character, got '{}'",
                csv.separator
            )))
        }
    };

    let fields = FieldCount::from_config(csv.fields).ok_or_else(|| {
        ConvertError::config(format!(
            "fields must be -1 (no check), 0 (infer) or a positive width, got {}",
            csv.fields
        ))
    })?;

    Ok(FieldLayout {
        date: csv.date,
        payee: csv.payee,
        description: csv.description,
        amount_in: csv.amount_in,
        amount_out: csv.amount_out,
        currency: csv.currency,
        fields,
        date_layout_in: DateLayout::new(&csv.date_layout_in),
        date_layout_out: DateLayout::new(&csv.date_layout_out),
        default_account: csv.default_account,
        processing_account: csv.processing_account,
        separator,
        skip: csv.skip,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const ING_CONFIG: &str = r#"
[csv]
amount_in = 7
amount_out = 7
currency = "EUR"
date = 0
date_layout_in = "02.01.2006"
date_layout_out = "2006-01-02"
default_account = "Expenses:Unknown"
description = 4
fields = 0
payee = 2
processing_account = "Assets:ING:Giro"
separator = ";"
skip = 10

[transactions_rules.travel]
match_payee = "RYANAIR"
set_account = "Expenses:Travel"
set_comment = "Flight"

[transactions_rules.salary]
match_description = "GEHALT"
set_account = "Income:Salary"
"#;

    #[test]
    fn test_parses_full_config() {
        let config = Config::from_toml_str(ING_CONFIG).unwrap();
        let layout = &config.layout;

        assert_eq!(layout.amount_in, 7);
        assert_eq!(layout.amount_out, 7);
        assert_eq!(layout.currency, "EUR");
        assert_eq!(layout.payee, 2);
        assert_eq!(layout.description, 4);
        assert_eq!(layout.fields, FieldCount::Infer);
        assert_eq!(layout.date_layout_in.as_str(), "02.01.2006");
        assert_eq!(layout.processing_account, "Assets:ING:Giro");
        assert_eq!(layout.separator, b';');
        assert_eq!(layout.skip, 10);

        let names: Vec<_> = config.rules.iter().map(Rule::name).collect();
        assert_eq!(names, ["salary", "travel"]);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.layout, FieldLayout::default());
        assert!(config.rules.is_empty());
    }

    #[test]
    fn test_partial_csv_table_keeps_other_defaults() {
        let config = Config::from_toml_str("[csv]\ncurrency = \"USD\"\nseparator = \",\"\n").unwrap();
        assert_eq!(config.layout.currency, "USD");
        assert_eq!(config.layout.separator, b',');
        assert_eq!(config.layout.default_account, "Expenses:Unknown");
        assert_eq!(config.layout.date_layout_out.as_str(), "2006-01-02");
    }

    #[rstest]
    #[case::two_characters("[csv]\nseparator = \";;\"\n")]
    #[case::empty("[csv]\nseparator = \"\"\n")]
    #[case::non_ascii("[csv]\nseparator = \"§\"\n")]
    #[case::fields_below_range("[csv]\nfields = -3\n")]
    #[case::unknown_key("[csv]\ncolumns = 3\n")]
    #[case::wrong_type("[csv]\nskip = \"ten\"\n")]
    #[case::unknown_rule_key("[transactions_rules.x]\nmatch = \"a\"\n")]
    fn test_invalid_config(#[case] content: &str) {
        let err = Config::from_toml_str(content).unwrap_err();
        assert!(matches!(err, ConvertError::Config { .. }), "got {:?}", err);
    }

    #[test]
    fn test_invalid_rule_pattern_fails_at_load() {
        let err = Config::from_toml_str("[transactions_rules.bad]\nmatch_payee = \"[a-\"\n").unwrap_err();
        assert!(matches!(err, ConvertError::InvalidPattern { ref rule, .. } if rule == "bad"));
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(ING_CONFIG.as_bytes()).expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.layout.skip, 10);
        assert_eq!(config.rules.len(), 2);
    }

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn test_environment_overrides_file_values() {
        let config = Config::from_toml_str_with_env(
            ING_CONFIG,
            vars(&[
                ("CSV2BEANCOUNT_CSV_SKIP", "3"),
                ("CSV2BEANCOUNT_CSV_CURRENCY", "USD"),
                ("csv2beancount_csv_skip", "99"),
                ("CSV2BEANCOUNT_CSV_separator", ","),
                ("CSV2BEANCOUNT_CSV_FIELDS", "-1"),
                ("PATH", "/usr/bin"),
            ]),
        )
        .unwrap();

        assert_eq!(config.layout.skip, 3);
        assert_eq!(config.layout.currency, "USD");
        assert_eq!(config.layout.separator, b',');
        assert_eq!(config.layout.fields, FieldCount::Unchecked);
        assert_eq!(config.layout.payee, 2);
        assert_eq!(config.rules.len(), 2);
    }

    #[test]
    fn test_environment_applies_without_file_content() {
        let config = Config::from_toml_str_with_env(
            "",
            vars(&[
                ("CSV2BEANCOUNT_CSV_AMOUNT_IN", "5"),
                ("CSV2BEANCOUNT_CSV_DATE_LAYOUT_IN", "01/02/2006"),
            ]),
        )
        .unwrap();

        assert_eq!(config.layout.amount_in, 5);
        assert_eq!(config.layout.date_layout_in.as_str(), "01/02/2006");
    }

    #[test]
    fn test_environment_unknown_key_is_ignored() {
        let config =
            Config::from_toml_str_with_env("", vars(&[("CSV2BEANCOUNT_CSV_COLUMNS", "3")])).unwrap();
        assert_eq!(config.layout, FieldLayout::default());
    }

    #[rstest]
    #[case::not_a_number("CSV2BEANCOUNT_CSV_SKIP", "ten")]
    #[case::negative_index("CSV2BEANCOUNT_CSV_PAYEE", "-1")]
    #[case::fields_below_range("CSV2BEANCOUNT_CSV_FIELDS", "-3")]
    #[case::bad_separator("CSV2BEANCOUNT_CSV_SEPARATOR", ";;")]
    fn test_invalid_environment_value(#[case] name: &str, #[case] value: &str) {
        let err = Config::from_toml_str_with_env("", vars(&[(name, value)])).unwrap_err();
        assert!(matches!(err, ConvertError::Config { .. }), "got {:?}", err);
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let err = Config::load(Some(Path::new("does-not-exist.toml"))).unwrap_err();
        assert!(err.to_string().contains("does-not-exist.toml"));
    }
}
