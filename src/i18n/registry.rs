//! Locale registry: which file backs each locale, and in which format.
//!
//! Entries are plain data. Nothing is validated at registration time; the
//! format name and path are resolved only when a locale is loaded.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::i18n::Locale;

/// Where a locale's messages live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleInfo {
    /// Loader name used to parse the file (e.g., "json", "yaml")
    pub format: String,

    /// Location of the locale source file
    pub path: PathBuf,
}

/// Mapping from locale to its source file.
///
/// Keys are unique; registering a locale twice replaces the earlier entry.
#[derive(Debug, Clone, Default)]
pub struct LocaleRegistry {
    locales: HashMap<Locale, LocaleInfo>,
}

impl LocaleRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the entry for `locale`.
    ///
    /// # Returns
    /// The previous entry, if the locale was already registered.
    pub fn insert(
        &mut self,
        locale: Locale,
        format: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> Option<LocaleInfo> {
        self.locales.insert(
            locale,
            LocaleInfo {
                format: format.into(),
                path: path.as_ref().to_path_buf(),
            },
        )
    }

    /// Get the entry for a locale.
    pub fn get(&self, locale: &Locale) -> Option<&LocaleInfo> {
        self.locales.get(locale)
    }

    /// Check if a locale is registered.
    pub fn contains(&self, locale: &Locale) -> bool {
        self.locales.contains_key(locale)
    }

    /// All registered locales, in no particular order.
    pub fn list(&self) -> Vec<Locale> {
        self.locales.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.locales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locales.is_empty()
    }
}
