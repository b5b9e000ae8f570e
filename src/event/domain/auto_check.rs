//! Rules acknowledging known errors on arrival.

use super::AutoCheckRuleId;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A pattern whose matching error descriptions need no manual review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoCheckRule {
    id: AutoCheckRuleId,
    pattern: String,
}

impl AutoCheckRule {
    /// Creates a rule without compiling the pattern.
    #[must_use]
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            id: AutoCheckRuleId::new(),
            pattern: pattern.into(),
        }
    }

    /// Returns the rule identifier.
    #[must_use]
    pub const fn id(&self) -> AutoCheckRuleId {
        self.id
    }

    /// Returns the regular expression source.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

/// Compiled auto-check rules in evaluation order.
#[derive(Debug, Clone, Default)]
pub struct AutoChecker {
    rules: Vec<(AutoCheckRuleId, Regex)>,
}

impl AutoChecker {
    /// Compiles `rules`, skipping malformed patterns with a warning.
    #[must_use]
    pub fn compile(rules: &[AutoCheckRule]) -> Self {
        let compiled = rules
            .iter()
            .filter_map(|rule| match Regex::new(rule.pattern()) {
                Ok(regex) => Some((rule.id(), regex)),
                Err(err) => {
                    warn!(
                        rule_id = %rule.id(),
                        pattern = rule.pattern(),
                        error = %err,
                        "ignoring malformed auto-check pattern"
                    );
                    None
                }
            })
            .collect();
        Self { rules: compiled }
    }

    /// Returns the first rule whose pattern occurs anywhere in
    /// `description`.
    #[must_use]
    pub fn first_match(&self, description: &str) -> Option<AutoCheckRuleId> {
        self.rules
            .iter()
            .find(|(_, regex)| regex.is_match(description))
            .map(|(id, _)| *id)
    }

    /// Returns the number of usable rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` when no usable rule exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
