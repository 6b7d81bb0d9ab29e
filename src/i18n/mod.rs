//! Locale-side infrastructure: locale tags, the locale registry, dictionaries
//! and the loaders that produce them.
//!
//! # Architecture
//!
//! - `locale`: `Locale`, an exact-match language tag
//! - `registry`: locale to `{format, path}` mapping
//! - `dictionary`: flat message key to pattern mapping
//! - `loader`: pluggable file loaders keyed by format name (`json`, `yaml`)
//! - `validator`: checks a dictionary against declared messages
//! - `metrics`: lookup and refresh counters
//!
//! # Example
//!
//! ```rust,ignore
//! use message_records::i18n::{Locale, LoaderRegistry};
//!
//! let loaders = LoaderRegistry::with_builtin();
//! let dictionary = loaders.get("yaml").unwrap().load("locales/fr.yaml".as_ref())?;
//! let french = Locale::parse("fr")?;
//! ```

mod dictionary;
mod loader;
mod locale;
mod metrics;
mod registry;
mod validator;

pub use dictionary::Dictionary;
pub use loader::{JsonLoader, Loader, LoaderRegistry, YamlLoader};
pub use locale::Locale;
pub use metrics::{FactoryMetrics, MetricsReport};
pub use registry::{LocaleInfo, LocaleRegistry};
pub use validator::{DictionaryValidator, ValidationReport};
