//! Locale type: validated language/region tag.
//!
//! This module provides the `Locale` type, a thin wrapper over
//! `unic_langid::LanguageIdentifier` used as the registry key for locale files.
//! Equality is exact: `fr` and `fr-CA` are distinct locales and no parent
//! fallback is performed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use unic_langid::LanguageIdentifier;

use crate::error::FactoryError;

/// A parsed language tag (e.g., "en", "fr-CA", "zh-Hant-TW").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Locale {
    id: LanguageIdentifier,
}

impl Locale {
    /// Parse a locale from a BCP 47 style tag.
    ///
    /// # Arguments
    /// * `tag` - The language tag (e.g., "en", "es-MX")
    ///
    /// # Returns
    /// * `Ok(Locale)` if the tag is well formed
    /// * `Err(FactoryError::InvalidLocale)` otherwise
    ///
    /// # Example
    /// ```ignore
    /// let french = Locale::parse("fr")?;
    /// ```
    pub fn parse(tag: &str) -> Result<Locale, FactoryError> {
        let tag = tag.trim();
        if tag.is_empty() {
            return Err(FactoryError::InvalidLocale(tag.to_string()));
        }

        tag.parse::<LanguageIdentifier>()
            .map(|id| Locale { id })
            .map_err(|_| FactoryError::InvalidLocale(tag.to_string()))
    }

    /// Get the primary language subtag (e.g., "fr" for "fr-CA").
    pub fn language(&self) -> &str {
        self.id.language.as_str()
    }

    /// Get the underlying language identifier.
    pub fn id(&self) -> &LanguageIdentifier {
        &self.id
    }
}

impl From<LanguageIdentifier> for Locale {
    fn from(id: LanguageIdentifier) -> Self {
        Locale { id }
    }
}

impl FromStr for Locale {
    type Err = FactoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Locale::parse(s)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl Serialize for Locale {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Locale {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Locale::parse(&tag).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== parse Tests ====================

    #[test]
    fn test_parse_language_only() {
        let locale = Locale::parse("fr").expect("Should parse");
        assert_eq!(locale.to_string(), "fr");
        assert_eq!(locale.language(), "fr");
    }

    #[test]
    fn test_parse_language_and_region() {
        let locale = Locale::parse("es-MX").expect("Should parse");
        assert_eq!(locale.to_string(), "es-MX");
        assert_eq!(locale.language(), "es");
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let locale = Locale::parse("  de ").expect("Should parse");
        assert_eq!(locale.to_string(), "de");
    }

    #[test]
    fn test_parse_empty_fails() {
        let result = Locale::parse("");
        assert!(matches!(result, Err(FactoryError::InvalidLocale(_))));
    }

    #[test]
    fn test_parse_garbage_fails() {
        let result = Locale::parse("not a locale!");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("not a locale!"));
    }

    #[test]
    fn test_from_str() {
        let locale: Locale = "pt-BR".parse().expect("Should parse");
        assert_eq!(locale.to_string(), "pt-BR");
    }

    // ==================== Equality Tests ====================

    #[test]
    fn test_equality_is_exact() {
        let fr = Locale::parse("fr").unwrap();
        let fr_ca = Locale::parse("fr-CA").unwrap();
        assert_ne!(fr, fr_ca);
        assert_eq!(fr, Locale::parse("fr").unwrap());
    }

    // ==================== Serde Tests ====================

    #[test]
    fn test_serialize_as_tag() {
        let locale = Locale::parse("en-GB").unwrap();
        let json = serde_json::to_string(&locale).expect("Should serialize");
        assert_eq!(json, "\"en-GB\"");
    }

    #[test]
    fn test_deserialize_from_tag() {
        let locale: Locale = serde_json::from_str("\"it\"").expect("Should deserialize");
        assert_eq!(locale, Locale::parse("it").unwrap());
    }

    #[test]
    fn test_deserialize_invalid_tag_fails() {
        let result: Result<Locale, _> = serde_json::from_str("\"???\"");
        assert!(result.is_err());
    }
}
