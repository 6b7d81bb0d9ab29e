//! The message factory: wires records to the active dictionary and swaps
//! dictionaries on locale load.
//!
//! # Lifecycle
//!
//! 1. Register locales (`register_locale`, `register_locales`,
//!    `register_locale_dir`).
//! 2. Initialize records (`init` / `create`). Text fields start at their
//!    default pattern and follow the dictionary from the next locale load on;
//!    message functions are bound to the live dictionary.
//! 3. Load a locale (`load_locale`). The dictionary is swapped in one step and
//!    every live text field is rewritten in the order it was initialized.
//!    Message functions see the new dictionary on their next call.
//!
//! Mutation (`init`, `load_locale`, registration) takes `&mut self`, so there
//! is a single writer. Message functions only read the dictionary through an
//! `ArcSwap` and observe either the old or the new dictionary, never a mix.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::{debug, info, warn};

use crate::error::FactoryError;
use crate::i18n::{
    Dictionary, DictionaryValidator, FactoryMetrics, Loader, LoaderRegistry, Locale,
    LocaleRegistry, ValidationReport,
};
use crate::message::field::{MessageHandler, MessageSlot, Refresher, TextSlot};
use crate::message::record::{DynRecord, FieldDescriptor, FieldMut, MessageRecord};

/// Initializes message records and provides them with translations.
pub struct MessageFactory {
    locales: LocaleRegistry,
    loaders: LoaderRegistry,
    dictionary: Arc<ArcSwap<Dictionary>>,
    active: Option<Locale>,
    refreshers: Vec<Refresher>,
    declared: BTreeMap<String, String>,
    metrics: Arc<FactoryMetrics>,
}

impl MessageFactory {
    /// Create a factory with the built-in loaders, no locales and an empty
    /// dictionary (every field shows its default pattern).
    pub fn new() -> Self {
        Self::with_loaders(LoaderRegistry::with_builtin())
    }

    /// Create a factory with a custom loader registry.
    pub fn with_loaders(loaders: LoaderRegistry) -> Self {
        Self {
            locales: LocaleRegistry::new(),
            loaders,
            dictionary: Arc::new(ArcSwap::from_pointee(Dictionary::new())),
            active: None,
            refreshers: Vec::new(),
            declared: BTreeMap::new(),
            metrics: Arc::new(FactoryMetrics::new()),
        }
    }

    // ==================== Registration ====================

    /// Register (or replace) the loader for a format name.
    pub fn register_loader(&mut self, format: impl Into<String>, loader: impl Loader + 'static) {
        self.loaders.register(format, loader);
    }

    /// Register a locale file. The format and path are not checked until the
    /// locale is loaded.
    pub fn register_locale(&mut self, locale: Locale, format: impl Into<String>, path: impl AsRef<Path>) {
        let format = format.into();
        debug!("Registering locale {} ({}: {})", locale, format, path.as_ref().display());
        self.locales.insert(locale, format, path);
    }

    /// Register several locale files sharing one format.
    pub fn register_locales<I, P>(&mut self, locales: I, format: &str)
    where
        I: IntoIterator<Item = (Locale, P)>,
        P: AsRef<Path>,
    {
        for (locale, path) in locales {
            self.register_locale(locale, format, path);
        }
    }

    /// Register every `<tag>.<ext>` file in `dir`, where `<ext>` is one of the
    /// extensions of the `format` loader.
    ///
    /// Files whose stem is not a valid locale tag are skipped with a warning.
    ///
    /// # Returns
    /// The number of locales registered.
    pub fn register_locale_dir(&mut self, dir: impl AsRef<Path>, format: &str) -> Result<usize, FactoryError> {
        let dir = dir.as_ref();
        let extensions: Vec<&'static str> = self
            .loaders
            .get(format)
            .ok_or_else(|| FactoryError::UnknownFormat(format.to_string()))?
            .extensions()
            .to_vec();

        let scan_error = |source| FactoryError::Scan {
            dir: dir.to_path_buf(),
            source,
        };

        let mut found = Vec::new();
        for entry in fs::read_dir(dir).map_err(scan_error)? {
            let path = entry.map_err(scan_error)?.path();
            let matches_format = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| extensions.iter().any(|known| *known == ext));
            if !matches_format || !path.is_file() {
                continue;
            }

            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            match Locale::parse(stem) {
                Ok(locale) => found.push((locale, path.clone())),
                Err(e) => warn!("Skipping {}: {}", path.display(), e),
            }
        }

        let count = found.len();
        self.register_locales(found, format);
        info!("Registered {} locales from {}", count, dir.display());
        Ok(count)
    }

    /// Registered locales, in no particular order.
    pub fn locales(&self) -> Vec<Locale> {
        self.locales.list()
    }

    /// The most recently loaded locale, if any.
    pub fn active_locale(&self) -> Option<&Locale> {
        self.active.as_ref()
    }

    /// Snapshot of the active dictionary.
    pub fn dictionary(&self) -> Arc<Dictionary> {
        self.dictionary.load_full()
    }

    // ==================== Locale Loading ====================

    /// Make `locale` the active locale.
    ///
    /// Loads the registered file, replaces the dictionary wholesale, then
    /// rewrites every live text field in initialization order. On any error
    /// the active dictionary is left untouched.
    ///
    /// # Errors
    /// * `UnknownLocale` if `locale` was never registered
    /// * `UnknownFormat` if no loader handles the registered format
    /// * `Load` if the loader fails
    pub fn load_locale(&mut self, locale: &Locale) -> Result<(), FactoryError> {
        let info = self
            .locales
            .get(locale)
            .ok_or_else(|| FactoryError::UnknownLocale(locale.clone()))?;
        let loader = self
            .loaders
            .get(&info.format)
            .ok_or_else(|| FactoryError::UnknownFormat(info.format.clone()))?;
        let dictionary = loader.load(&info.path).map_err(|source| FactoryError::Load {
            locale: locale.clone(),
            source,
        })?;

        info!(
            "Loaded locale {} ({} messages from {})",
            locale,
            dictionary.len(),
            info.path.display()
        );

        let dictionary = Arc::new(dictionary);
        self.dictionary.store(Arc::clone(&dictionary));
        self.active = Some(locale.clone());
        self.metrics.record_locale_load();

        let before = self.refreshers.len();
        self.refreshers.retain(|refresher| refresher.run(&dictionary));
        let pruned = before - self.refreshers.len();

        self.metrics.record_refreshes(self.refreshers.len());
        self.metrics.record_pruned(pruned);
        if pruned > 0 {
            debug!("Pruned {} refreshers for dropped text fields", pruned);
        }
        debug!("Refreshed {} text fields", self.refreshers.len());

        Ok(())
    }

    // ==================== Record Initialization ====================

    /// Initialize the message fields of `record`.
    ///
    /// Embedded records are replaced by fresh instances and initialized
    /// recursively. The whole record is checked before anything is wired, so
    /// on error no field has been bound.
    ///
    /// # Errors
    /// * `WrongResultArity` if a text or message field's result type is not
    ///   a single value
    /// * `UnsupportedField` if a declared field has no slot
    /// * `FieldKindMismatch` if a slot's kind differs from its declaration
    pub fn init<'r, R: MessageRecord>(&mut self, record: &'r mut R) -> Result<&'r mut R, FactoryError> {
        check_record(record)?;
        self.init_record(record)?;
        Ok(record)
    }

    /// Create and initialize a record.
    pub fn create<R: MessageRecord>(&mut self) -> Result<R, FactoryError> {
        let mut record = R::default();
        self.init(&mut record)?;
        Ok(record)
    }

    fn init_record(&mut self, record: &mut dyn DynRecord) -> Result<(), FactoryError> {
        let descriptor = record.record_descriptor();
        debug!(
            "Initializing record {} ({} fields)",
            descriptor.name(),
            descriptor.fields().len()
        );

        for field in descriptor.fields() {
            match resolve_slot(record, descriptor.name(), field)? {
                FieldMut::Embedded(embedded) => {
                    embedded.reset_record();
                    self.init_record(embedded)?;
                }
                FieldMut::Text(slot) => self.init_text(field, slot),
                FieldMut::Message(slot) => self.init_message(field, slot),
            }
        }

        Ok(())
    }

    fn init_text(&mut self, field: &FieldDescriptor, slot: &mut dyn TextSlot) {
        let refresher = slot.bind(field.key(), field.default_pattern());

        // Re-initializing a field replaces its refresher.
        self.refreshers.retain(|existing| existing.target() != refresher.target());
        self.refreshers.push(refresher);
        self.declare(field);
    }

    fn init_message(&mut self, field: &FieldDescriptor, slot: &mut dyn MessageSlot) {
        slot.bind(Arc::new(MessageHandler::new(
            field.key(),
            field.default_pattern(),
            Arc::clone(&self.dictionary),
            Arc::clone(&self.metrics),
        )));
        self.declare(field);
    }

    fn declare(&mut self, field: &FieldDescriptor) {
        if let Some(previous) = self
            .declared
            .insert(field.key().to_string(), field.default_pattern().to_string())
        {
            if previous != field.default_pattern() {
                warn!(
                    "Message key {} declared with different defaults: {:?} and {:?}",
                    field.key(),
                    previous,
                    field.default_pattern()
                );
            }
        }
    }

    // ==================== Diagnostics ====================

    /// Check the active dictionary against every message declared so far.
    pub fn validate(&self) -> ValidationReport {
        let report = DictionaryValidator::validate(&self.declared, &self.dictionary.load());
        for error in &report.errors {
            warn!("{}", error);
        }
        report
    }

    /// Message keys declared by initialized records, with their defaults.
    pub fn declared_messages(&self) -> &BTreeMap<String, String> {
        &self.declared
    }

    /// Number of text fields that will be rewritten by the next locale load
    /// (including fields dropped since the last load, which are pruned then).
    pub fn tracked_text_fields(&self) -> usize {
        self.refreshers.len()
    }

    pub fn metrics(&self) -> &FactoryMetrics {
        &self.metrics
    }
}

impl Default for MessageFactory {
    fn default() -> Self {
        Self::new()
    }
}

/// Check a record tree without binding anything.
fn check_record(record: &mut dyn DynRecord) -> Result<(), FactoryError> {
    let descriptor = record.record_descriptor();
    for field in descriptor.fields() {
        if let FieldMut::Embedded(embedded) = resolve_slot(record, descriptor.name(), field)? {
            check_record(embedded)?;
        }
    }
    Ok(())
}

/// Get the slot for a declared field, verifying its kind and result arity.
fn resolve_slot<'a>(
    record: &'a mut dyn DynRecord,
    record_name: &'static str,
    field: &FieldDescriptor,
) -> Result<FieldMut<'a>, FactoryError> {
    let slot = record
        .record_field(field.name())
        .ok_or(FactoryError::UnsupportedField {
            record: record_name,
            field: field.name(),
        })?;

    if slot.kind() != field.kind() {
        return Err(FactoryError::FieldKindMismatch {
            record: record_name,
            field: field.name(),
            expected: field.kind().as_str(),
            found: slot.kind().as_str(),
        });
    }

    let results = match &slot {
        FieldMut::Text(text) => Some(text.result_arity()),
        FieldMut::Message(message) => Some(message.result_arity()),
        FieldMut::Embedded(_) => None,
    };
    if let Some(results) = results {
        if results != 1 {
            return Err(FactoryError::WrongResultArity {
                key: field.key().to_string(),
                results,
            });
        }
    }

    Ok(slot)
}
