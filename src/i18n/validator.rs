//! Dictionary validation.
//!
//! Checks a loaded dictionary against the messages that records declared:
//! translations must keep the placeholders of their default pattern, and keys
//! on either side without a counterpart are reported.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::i18n::Dictionary;

/// Findings from checking a dictionary against declared messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Patterns whose placeholder count differs from the default
    pub errors: Vec<String>,

    /// Verb mismatches, undeclared keys and missing entries
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Some pattern would consume a different number of arguments than its
    /// default.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Every declared key has a matching pattern and the dictionary holds
    /// nothing else.
    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Validator for dictionaries.
pub struct DictionaryValidator;

static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

impl DictionaryValidator {
    /// Validate a dictionary against declared messages.
    ///
    /// # Arguments
    /// * `declared` - Message key to default pattern, for every declared field
    /// * `dictionary` - The dictionary to check
    ///
    /// # Returns
    /// A `ValidationReport`. Errors: placeholder count differs from the
    /// default pattern. Warnings: placeholder verbs differ, keys nobody
    /// declared, declared keys without a translation.
    pub fn validate(declared: &BTreeMap<String, String>, dictionary: &Dictionary) -> ValidationReport {
        let mut report = ValidationReport::new();

        for (key, default) in declared {
            let Some(translated) = dictionary.get(key) else {
                report.warnings.push(format!("Missing translation for '{}'", key));
                continue;
            };

            let expected = Self::extract_verbs(default);
            let found = Self::extract_verbs(translated);
            if expected.len() != found.len() {
                report.errors.push(format!(
                    "Placeholder count mismatch for '{}': default has {}, translation has {}",
                    key,
                    expected.len(),
                    found.len()
                ));
            } else if expected != found {
                report.warnings.push(format!(
                    "Placeholder mismatch for '{}': default has {:?}, translation has {:?}",
                    key, expected, found
                ));
            }
        }

        let mut unknown: Vec<&str> = dictionary
            .keys()
            .filter(|key| !declared.contains_key(*key))
            .collect();
        unknown.sort_unstable();
        for key in unknown {
            report.warnings.push(format!("Unknown message key '{}'", key));
        }

        report
    }

    /// Extract the verbs of argument-consuming placeholders, in order.
    fn extract_verbs(pattern: &str) -> Vec<char> {
        let regex = PLACEHOLDER_REGEX
            .get_or_init(|| Regex::new(r"%%|%[-+0]*[0-9]*(?:\.[0-9]*)?([a-zA-Z])").unwrap());

        regex
            .captures_iter(pattern)
            .filter_map(|cap| cap.get(1))
            .filter_map(|m| m.as_str().chars().next())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn declared(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    // ==================== ValidationReport Tests ====================

    #[test]
    fn test_report_new_is_clean() {
        let report = ValidationReport::new();
        assert!(report.is_clean());
        assert!(!report.has_errors());
        assert!(!report.has_warnings());
    }

    #[test]
    fn test_report_with_warning_is_not_clean() {
        let mut report = ValidationReport::default();
        report.warnings.push("x".to_string());
        assert!(!report.is_clean());
        assert!(report.has_warnings());
    }

    // ==================== validate Tests ====================

    #[test]
    fn test_matching_dictionary_is_clean() {
        let declared = declared(&[("Greeter.Hello", "Hello, %v!"), ("Greeter.Title", "Welcome")]);
        let dictionary: Dictionary = [("Greeter.Hello", "Bonjour, %v!"), ("Greeter.Title", "Bienvenue")]
            .into_iter()
            .collect();

        let report = DictionaryValidator::validate(&declared, &dictionary);
        assert!(report.is_clean(), "{:?}", report);
    }

    #[test]
    fn test_placeholder_count_mismatch_is_error() {
        let declared = declared(&[("Greeter.Hello", "Hello, %v!")]);
        let dictionary: Dictionary = [("Greeter.Hello", "Bonjour!")].into_iter().collect();

        let report = DictionaryValidator::validate(&declared, &dictionary);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("Greeter.Hello"));
        assert!(report.errors[0].contains("default has 1, translation has 0"));
    }

    #[test]
    fn test_verb_mismatch_is_warning() {
        let declared = declared(&[("Inbox.Count", "%d messages")]);
        let dictionary: Dictionary = [("Inbox.Count", "%s messages")].into_iter().collect();

        let report = DictionaryValidator::validate(&declared, &dictionary);
        assert!(!report.has_errors());
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("Placeholder mismatch"));
    }

    #[test]
    fn test_report_state_helpers() {
        let mut report = ValidationReport::default();
        assert!(report.is_clean());

        report.warnings.push("Unknown message key 'Menu.Extra'".to_string());
        assert!(report.has_warnings() && !report.has_errors());
        assert!(!report.is_clean());

        report.errors.push("Placeholder count mismatch for 'Menu.Title'".to_string());
        assert!(report.has_errors());
    }

    #[test]
    fn test_percent_literal_not_counted() {
        let declared = declared(&[("Stats.Done", "%d%% done")]);
        let dictionary: Dictionary = [("Stats.Done", "%d%% fait")].into_iter().collect();

        let report = DictionaryValidator::validate(&declared, &dictionary);
        assert!(report.is_clean(), "{:?}", report);
    }

    #[test]
    fn test_missing_translation_is_warning() {
        let declared = declared(&[("Greeter.Hello", "Hello, %v!")]);
        let report = DictionaryValidator::validate(&declared, &Dictionary::new());

        assert!(!report.has_errors());
        assert_eq!(report.warnings, vec!["Missing translation for 'Greeter.Hello'".to_string()]);
    }

    #[test]
    fn test_unknown_keys_sorted() {
        let declared = declared(&[]);
        let dictionary: Dictionary = [("Zeta.A", "z"), ("Alpha.B", "a")].into_iter().collect();

        let report = DictionaryValidator::validate(&declared, &dictionary);
        assert_eq!(
            report.warnings,
            vec![
                "Unknown message key 'Alpha.B'".to_string(),
                "Unknown message key 'Zeta.A'".to_string()
            ]
        );
    }

    #[test]
    fn test_extract_verbs_with_flags() {
        assert_eq!(DictionaryValidator::extract_verbs("%-5s %05.2f %%"), vec!['s', 'f']);
    }
}
