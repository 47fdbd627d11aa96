//! Redaction policy: the user-facing knobs that decide which filter is built.

use crate::error::{RedactionError, Result};
use crate::filter::RedactionFilter;
use crate::rule::{Ipv4Mode, RedactionRule};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Redaction policy, usually read from the `[redaction]` table of the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RedactionPolicy {
    /// Whether sensitive sections are filtered at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Matching mode for the IPv4 rule.
    #[serde(default)]
    pub ipv4_mode: Ipv4Mode,

    /// Additional rules, applied after the built-ins in declaration order.
    #[serde(default)]
    pub extra_rules: Vec<CustomRule>,
}

fn default_true() -> bool {
    true
}

impl Default for RedactionPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            ipv4_mode: Ipv4Mode::Syntactic,
            extra_rules: Vec::new(),
        }
    }
}

/// A user-defined pattern and its replacement template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CustomRule {
    pub name: String,
    pub pattern: String,
    #[serde(default = "default_replacement")]
    pub replacement: String,
}

fn default_replacement() -> String {
    crate::rule::REDACTED.to_string()
}

impl RedactionPolicy {
    /// Compile the policy into a filter.
    pub fn build(&self) -> Result<RedactionFilter> {
        if !self.enabled {
            debug!("redaction disabled by policy");
            return Ok(RedactionFilter::disabled());
        }

        let mut rules = RedactionRule::builtin(self.ipv4_mode);
        for custom in &self.extra_rules {
            rules.push(compile_custom(custom)?);
        }

        debug!(
            rules = rules.len(),
            ipv4_mode = ?self.ipv4_mode,
            "redaction filter built"
        );
        Ok(RedactionFilter::with_rules(rules))
    }
}

fn compile_custom(rule: &CustomRule) -> Result<RedactionRule> {
    if rule.name.trim().is_empty() {
        return Err(RedactionError::InvalidRule(
            "custom rule name must not be empty".to_string(),
        ));
    }
    if rule.pattern.is_empty() {
        return Err(RedactionError::InvalidRule(format!(
            "rule '{}' has an empty pattern",
            rule.name
        )));
    }
    let pattern = Regex::new(&rule.pattern).map_err(|source| RedactionError::Pattern {
        name: rule.name.clone(),
        source,
    })?;
    Ok(RedactionRule::custom(
        rule.name.clone(),
        pattern,
        rule.replacement.clone(),
    ))
}
