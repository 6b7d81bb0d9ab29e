use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::i18n::Locale;

#[derive(Debug, Clone)]
pub struct Config {
    // Locale files
    pub locales_dir: PathBuf,
    pub locale_format: String,

    // Locale to activate at startup (None keeps the default patterns)
    pub locale: Option<Locale>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            locales_dir: std::env::var("MESSAGES_LOCALES_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("locales")),
            locale_format: std::env::var("MESSAGES_FORMAT")
                .unwrap_or_else(|_| "json".to_string()),

            locale: match std::env::var("MESSAGES_LOCALE") {
                Ok(tag) if !tag.trim().is_empty() => Some(
                    Locale::parse(&tag)
                        .with_context(|| format!("MESSAGES_LOCALE is not a valid locale: {}", tag))?,
                ),
                _ => None,
            },
        })
    }
}
