//! Error types for the message factory and locale loaders.

use std::path::PathBuf;

use thiserror::Error;

use crate::i18n::Locale;

/// Failure reading or parsing a locale source file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read locale file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse locale file {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Unsupported value for key '{key}' in {}: expected a string", .path.display())]
    InvalidValue { path: PathBuf, key: String },
}

/// Errors surfaced by [`MessageFactory`](crate::MessageFactory).
///
/// Every variant is reported before the factory changes state: a failed
/// `load_locale` leaves the active dictionary untouched, and a failed `init`
/// leaves no refresher registered for the offending field.
#[derive(Debug, Error)]
pub enum FactoryError {
    #[error("Unknown locale '{0}'")]
    UnknownLocale(Locale),

    #[error("Unknown locale format '{0}'")]
    UnknownFormat(String),

    #[error("Invalid locale tag '{0}'")]
    InvalidLocale(String),

    #[error("Wrong number of results in message '{key}': expected 1, got {results}")]
    WrongResultArity { key: String, results: usize },

    #[error("Field '{record}.{field}' has no message slot")]
    UnsupportedField {
        record: &'static str,
        field: &'static str,
    },

    #[error("Field '{record}.{field}' is declared as {expected} but its slot is {found}")]
    FieldKindMismatch {
        record: &'static str,
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Failed to load locale '{locale}'")]
    Load {
        locale: Locale,
        #[source]
        source: LoadError,
    },

    #[error("Failed to scan locale directory {}: {source}", .dir.display())]
    Scan {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
