//! Transaction rules
//!
//! A [`Rule`] overrides the inferred counter-account and/or comment of entries
//! whose payee or description match its patterns. Patterns are compiled when the
//! rule is built; a pattern that fails to compile is a configuration error, never
//! a per-row one.

use crate::types::ConvertError;
use regex::Regex;

/// A named pattern-match directive
#[derive(Debug, Clone)]
pub struct Rule {
    name: String,
    match_payee: Option<Regex>,
    match_description: Option<Regex>,
    set_account: Option<String>,
    set_comment: Option<String>,
}

impl Rule {
    /// Build a rule, compiling its patterns
    ///
    /// Empty patterns and empty overrides are stored as absent: an absent
    /// pattern never matches and an absent override never overwrites.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::InvalidPattern`] if a non-empty pattern is not
    /// a valid regex.
    pub fn new(
        name: &str,
        match_payee: &str,
        match_description: &str,
        set_account: &str,
        set_comment: &str,
    ) -> Result<Self, ConvertError> {
        Ok(Self {
            name: name.to_string(),
            match_payee: compile(name, "match_payee", match_payee)?,
            match_description: compile(name, "match_description", match_description)?,
            set_account: non_empty(set_account),
            set_comment: non_empty(set_comment),
        })
    }

    /// The rule's name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The compiled payee pattern, if any
    pub fn payee_pattern(&self) -> Option<&Regex> {
        self.match_payee.as_ref()
    }

    /// The compiled description pattern, if any
    pub fn description_pattern(&self) -> Option<&Regex> {
        self.match_description.as_ref()
    }

    /// The account override, if any
    pub fn set_account(&self) -> Option<&str> {
        self.set_account.as_deref()
    }

    /// The comment override, if any
    pub fn set_comment(&self) -> Option<&str> {
        self.set_comment.as_deref()
    }
}

fn compile(rule: &str, field: &str, pattern: &str) -> Result<Option<Regex>, ConvertError> {
    if pattern.is_empty() {
        return Ok(None);
    }

    Regex::new(pattern)
        .map(Some)
        .map_err(|e| ConvertError::invalid_pattern(rule, field, e.to_string()))
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// The rules of one run, in a fixed order
///
/// Rules are kept sorted by name, so when several rules match the same row the
/// outcome does not depend on how the configuration was laid out or read.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Build a rule set, ordering the rules by name
    pub fn new(mut rules: Vec<Rule>) -> Self {
        rules.sort_by(|a, b| a.name.cmp(&b.name));
        Self { rules }
    }

    /// Iterate the rules in application order
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    /// Number of rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the set has no rules
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
