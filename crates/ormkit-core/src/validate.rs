//! Runtime validation helpers.
//!
//! These functions back the pre-validation hooks the construction pipeline
//! registers on record types: choices checks and optional regex pattern
//! checks for string fields.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use crate::error::ValidationError;

/// Thread-safe cache of compiled regex patterns.
///
/// Patterns come from field declarations and repeat across records, so they
/// are compiled once and reused for the lifetime of the program.
struct RegexCache {
    cache: std::sync::RwLock<std::collections::HashMap<String, Regex>>,
}

impl RegexCache {
    fn new() -> Self {
        Self {
            cache: std::sync::RwLock::new(std::collections::HashMap::new()),
        }
    }

    fn get_or_compile(&self, pattern: &str) -> Result<Regex, regex::Error> {
        {
            let cache = self.cache.read().unwrap();
            if let Some(regex) = cache.get(pattern) {
                return Ok(regex.clone());
            }
        }

        let regex = Regex::new(pattern)?;
        {
            let mut cache = self.cache.write().unwrap();
            cache.insert(pattern.to_string(), regex.clone());
        }
        Ok(regex)
    }
}

fn regex_cache() -> &'static RegexCache {
    static CACHE: OnceLock<RegexCache> = OnceLock::new();
    CACHE.get_or_init(RegexCache::new)
}

/// Check if a string matches a regex pattern.
///
/// Invalid patterns are treated as non-matches and logged.
pub fn matches_pattern(value: &str, pattern: &str) -> bool {
    match regex_cache().get_or_compile(pattern) {
        Ok(regex) => regex.is_match(value),
        Err(e) => {
            tracing::warn!(
                pattern = pattern,
                error = %e,
                "Invalid regex pattern in validation, treating as non-match"
            );
            false
        }
    }
}

/// Render a JSON value the way it appears in validation messages.
///
/// Strings are rendered bare (without quotes) so that messages read
/// `status: 'c' not in ...` rather than `status: '"c"' not in ...`.
#[must_use]
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Check a field value against its declared choices set.
///
/// An empty choices set never fails. Missing values (callers pass `None`
/// when the record leaves the field unset) are not checked.
pub fn check_choices(
    field_name: &str,
    value: Option<&Value>,
    choices: &[Value],
) -> Result<(), ValidationError> {
    if choices.is_empty() {
        return Ok(());
    }
    let Some(value) = value else {
        return Ok(());
    };
    if choices.contains(value) {
        return Ok(());
    }
    Err(ValidationError::ChoiceViolation {
        field: field_name.to_string(),
        value: display_value(value),
        allowed: choices.iter().map(display_value).collect(),
    })
}

/// Check a string field value against its declared pattern.
pub fn check_pattern(
    field_name: &str,
    value: Option<&Value>,
    pattern: &str,
) -> Result<(), ValidationError> {
    let Some(Value::String(s)) = value else {
        return Ok(());
    };
    if matches_pattern(s, pattern) {
        return Ok(());
    }
    Err(ValidationError::PatternMismatch {
        field: field_name.to_string(),
        pattern: pattern.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_check_choices_accepts_member() {
        let choices = vec![json!("a"), json!("b")];
        assert!(check_choices("status", Some(&json!("a")), &choices).is_ok());
    }

    #[test]
    fn test_check_choices_rejects_non_member() {
        let choices = vec![json!("a"), json!("b")];
        let err = check_choices("status", Some(&json!("c")), &choices).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("status"));
        assert!(msg.contains("'c'"));
        assert!(msg.contains("a"));
        assert!(msg.contains("b"));
    }

    #[test]
    fn test_check_choices_skips_unset_and_unconstrained() {
        assert!(check_choices("status", None, &[json!("a")]).is_ok());
        assert!(check_choices("status", Some(&json!("anything")), &[]).is_ok());
    }

    #[test]
    fn test_check_choices_numeric() {
        let choices = vec![json!(1), json!(2)];
        assert!(check_choices("level", Some(&json!(2)), &choices).is_ok());
        assert!(check_choices("level", Some(&json!(3)), &choices).is_err());
    }

    #[test]
    fn test_check_pattern() {
        assert!(check_pattern("code", Some(&json!("AB12")), r"^[A-Z]{2}\d{2}$").is_ok());
        assert!(check_pattern("code", Some(&json!("nope")), r"^[A-Z]{2}\d{2}$").is_err());
        // non-string values are not pattern-checked
        assert!(check_pattern("code", Some(&json!(5)), r"^[A-Z]+$").is_ok());
    }

    #[test]
    fn test_invalid_pattern_is_non_match() {
        assert!(!matches_pattern("anything", r"[unclosed"));
    }
}
