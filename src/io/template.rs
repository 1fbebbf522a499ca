//! Output templates
//!
//! A template is literal text with `{{.Field}}` placeholders, one rendered block
//! per entry. Whitespace inside the braces is allowed (`{{ .Raw }}`).
//!
//! # Fields
//!
//! `Date`, `Payee`, `Description`, `AccountIn`, `AccountOut`, `AmountIn`,
//! `AmountOut`, `Currency`, `Raw` and `Comment` (empty when no rule set one).
//!
//! Parsing only checks the placeholder syntax. A placeholder naming an unknown
//! field is a render error, reported per entry.

use std::path::Path;

use tracing::debug;

use crate::types::{ConvertError, Entry};

/// Template used when none is configured or the configured one is unusable
pub const DEFAULT_TEMPLATE: &str = r#"{{.Date}} * "{{.Payee}}" "{{.Description}}"
  ; {{ .Raw }}
  {{.AccountOut}}  {{.Currency}} {{.AmountOut}}
  {{.AccountIn}}   {{.Currency}} {{.AmountIn}}

"#;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Field(String),
}

/// A parsed output template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Default for Template {
    fn default() -> Self {
        // The built-in text always parses.
        Self::parse(DEFAULT_TEMPLATE).unwrap_or(Self {
            segments: Vec::new(),
        })
    }
}

impl Template {
    /// Parse template text
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::Template`] for an unterminated `{{` or a
    /// placeholder that is not of the form `.Name`.
    pub fn parse(text: &str) -> Result<Self, ConvertError> {
        let mut segments = Vec::new();
        let mut rest = text;

        while let Some(open) = rest.find("{{") {
            if open > 0 {
                segments.push(Segment::Text(rest[..open].to_string()));
            }

            let after = &rest[open + 2..];
            let close = after.find("}}").ok_or_else(|| {
                ConvertError::template(format!(
                    "unclosed action at byte {}",
                    text.len() - rest.len() + open
                ))
            })?;

            let action = after[..close].trim();
            let name = action
                .strip_prefix('.')
                .filter(|name| !name.is_empty() && name.chars().all(char::is_alphanumeric))
                .ok_or_else(|| {
                    ConvertError::template(format!("unsupported action '{{{{{}}}}}'", action))
                })?;

            segments.push(Segment::Field(name.to_string()));
            rest = &after[close + 2..];
        }

        if !rest.is_empty() {
            segments.push(Segment::Text(rest.to_string()));
        }

        Ok(Self { segments })
    }

    /// Render one entry
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::Render`] if a placeholder names an unknown field.
    pub fn render(&self, entry: &Entry) -> Result<String, ConvertError> {
        let mut out = String::with_capacity(256);

        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Field(name) => out.push_str(field_value(entry, name)?),
            }
        }

        Ok(out)
    }
}

fn field_value<'a>(entry: &'a Entry, name: &str) -> Result<&'a str, ConvertError> {
    let value = match name {
        "Date" => &entry.date,
        "Payee" => &entry.payee,
        "Description" => &entry.description,
        "AccountIn" => &entry.account_in,
        "AccountOut" => &entry.account_out,
        "AmountIn" => &entry.amount_in,
        "AmountOut" => &entry.amount_out,
        "Currency" => &entry.currency,
        "Raw" => &entry.raw,
        "Comment" => return Ok(entry.comment.as_deref().unwrap_or_default()),
        _ => {
            return Err(ConvertError::render(format!(
                "can't evaluate field {} in entry",
                name
            )))
        }
    };

    Ok(value)
}

/// Load the template for a run
///
/// Without a path the default template is used. A file that cannot be read or
/// parsed is reported at debug level and the default is used instead.
pub fn load_template(path: Option<&Path>) -> Template {
    let Some(path) = path else {
        return Template::default();
    };

    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            debug!(file = %path.display(), error = %e, "cannot read template, using default");
            return Template::default();
        }
    };

    match Template::parse(&text) {
        Ok(template) => {
            debug!(file = %path.display(), "template loaded");
            template
        }
        Err(e) => {
            debug!(file = %path.display(), error = %e, "cannot parse template, using default");
            Template::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn entry() -> Entry {
        Entry {
            account_in: "Expenses:Travel".to_string(),
            account_out: "Assets:ING:Giro".to_string(),
            amount_in: "35.00".to_string(),
            amount_out: "-35.00".to_string(),
            comment: None,
            currency: "EUR".to_string(),
            date: "2019-04-24".to_string(),
            description: "Flight".to_string(),
            payee: "RYANAIR".to_string(),
            raw: r#"["24.04.2019", "RYANAIR", "-35,00"]"#.to_string(),
        }
    }

    fn template_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes()).expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    #[test]
    fn test_default_template_output() {
        let rendered = Template::default().render(&entry()).unwrap();
        let expected = "2019-04-24 * \"RYANAIR\" \"Flight\"\n  \
                        ; [\"24.04.2019\", \"RYANAIR\", \"-35,00\"]\n  \
                        Assets:ING:Giro  EUR -35.00\n  \
                        Expenses:Travel   EUR 35.00\n\n";
        assert_eq!(rendered, expected);
    }

    #[rstest]
    #[case::tight("{{.Payee}}", "RYANAIR")]
    #[case::spaced("{{ .Payee }}", "RYANAIR")]
    #[case::surrounded("<{{.Currency}}>", "<EUR>")]
    #[case::adjacent("{{.AmountIn}}{{.AmountOut}}", "35.00-35.00")]
    #[case::no_placeholders("plain text", "plain text")]
    #[case::absent_comment("c={{.Comment}}", "c=")]
    #[case::lone_braces("a } b { c", "a } b { c")]
    fn test_render(#[case] text: &str, #[case] expected: &str) {
        let template = Template::parse(text).unwrap();
        assert_eq!(template.render(&entry()).unwrap(), expected);
    }

    #[test]
    fn test_render_comment() {
        let mut entry = entry();
        entry.comment = Some("Flight".to_string());
        let template = Template::parse("; {{.Comment}}").unwrap();
        assert_eq!(template.render(&entry).unwrap(), "; Flight");
    }

    #[rstest]
    #[case::unterminated("{{.Date")]
    #[case::empty_action("{{}}")]
    #[case::no_dot("{{Date}}")]
    #[case::bare_dot("{{.}}")]
    #[case::pipeline("{{.Date | printf}}")]
    fn test_parse_errors(#[case] text: &str) {
        let err = Template::parse(text).unwrap_err();
        assert!(matches!(err, ConvertError::Template { .. }), "got {:?}", err);
    }

    #[test]
    fn test_unknown_field_fails_at_render() {
        let template = Template::parse("{{.Amount}}").unwrap();
        let err = template.render(&entry()).unwrap_err();
        assert!(matches!(err, ConvertError::Render { .. }));
        assert!(err.is_row_local());
    }

    #[test]
    fn test_load_template_without_path() {
        assert_eq!(load_template(None), Template::default());
    }

    #[test]
    fn test_load_template_from_file() {
        let file = template_file("{{.Date}} {{.Payee}}\n");
        let template = load_template(Some(file.path()));
        assert_eq!(template.render(&entry()).unwrap(), "2019-04-24 RYANAIR\n");
    }

    #[test]
    fn test_load_template_falls_back_when_unreadable() {
        let template = load_template(Some(Path::new("no-such-template.tmpl")));
        assert_eq!(template, Template::default());
    }

    #[test]
    fn test_load_template_falls_back_when_invalid() {
        let file = template_file("{{.Date} broken");
        assert_eq!(load_template(Some(file.path())), Template::default());
    }
}
