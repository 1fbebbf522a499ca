//! Rule matching and application
//!
//! Every rule in the set is checked against the entry's payee and description.
//! All matching rules apply in name order and each one overwrites whatever the
//! previous ones set, so the last matching rule wins on every field it sets.

use crate::types::{Rule, RuleSet};
use regex::Regex;
use tracing::{debug, trace};

impl Rule {
    /// Whether the rule fires for this payee/description pair
    ///
    /// The payee pattern and the description pattern are alternatives: either one
    /// matching is enough. An absent pattern never matches.
    pub fn matches(&self, payee: &str, description: &str) -> bool {
        pattern_matches(self.payee_pattern(), payee)
            || pattern_matches(self.description_pattern(), description)
    }
}

/// A pattern matches when its leftmost match is non-empty
fn pattern_matches(pattern: Option<&Regex>, text: &str) -> bool {
    let Some(re) = pattern else {
        return false;
    };

    let matched = re.find(text).is_some_and(|m| !m.as_str().is_empty());

    trace!(
        expression = re.as_str(),
        text,
        matched,
        "checked rule"
    );

    matched
}

impl RuleSet {
    /// Apply every matching rule to the target account and comment
    ///
    /// A matching rule without an account (or comment) override leaves the
    /// current value untouched.
    pub fn apply(
        &self,
        payee: &str,
        description: &str,
        account: &mut String,
        comment: &mut Option<String>,
    ) {
        for rule in self.iter() {
            debug!(rule = rule.name(), payee, description, "iterating over rules");

            if !rule.matches(payee, description) {
                continue;
            }

            if let Some(set_account) = rule.set_account() {
                *account = set_account.to_string();
            }
            if let Some(set_comment) = rule.set_comment() {
                *comment = Some(set_comment.to_string());
            }
        }
    }
}
