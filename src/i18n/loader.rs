//! Locale file loaders, keyed by format name.
//!
//! A loader turns one locale source file into a flat [`Dictionary`]. Nested
//! mappings are flattened into dot-joined keys, so both of these produce the
//! key `Greeter.Hello`:
//!
//! ```yaml
//! Greeter.Hello: "Bonjour, %v!"
//! ---
//! Greeter:
//!   Hello: "Bonjour, %v!"
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::LoadError;
use crate::i18n::Dictionary;

/// Converts a locale source file into a dictionary.
pub trait Loader: Send + Sync {
    /// Read `path` and return its messages.
    fn load(&self, path: &Path) -> Result<Dictionary, LoadError>;

    /// File extensions this loader recognizes when scanning a directory.
    fn extensions(&self) -> &[&'static str];
}

/// Named loaders available to a factory.
pub struct LoaderRegistry {
    loaders: HashMap<String, Box<dyn Loader>>,
}

impl LoaderRegistry {
    /// Create a registry with no loaders.
    pub fn empty() -> Self {
        Self {
            loaders: HashMap::new(),
        }
    }

    /// Create a registry with the built-in `json` and `yaml` loaders.
    pub fn with_builtin() -> Self {
        let mut registry = Self::empty();
        registry.register("json", JsonLoader);
        registry.register("yaml", YamlLoader);
        registry
    }

    /// Register (or replace) the loader for a format name.
    pub fn register(&mut self, format: impl Into<String>, loader: impl Loader + 'static) {
        self.loaders.insert(format.into(), Box::new(loader));
    }

    /// Get the loader for a format name.
    pub fn get(&self, format: &str) -> Option<&dyn Loader> {
        self.loaders.get(format).map(|loader| loader.as_ref())
    }

    /// Registered format names.
    pub fn formats(&self) -> Vec<&str> {
        self.loaders.keys().map(String::as_str).collect()
    }
}

impl Default for LoaderRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}

// ==================== Built-in Loaders ====================

/// Loads JSON objects.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLoader;

impl Loader for JsonLoader {
    fn load(&self, path: &Path) -> Result<Dictionary, LoadError> {
        let raw = read_source(path)?;
        let value: serde_json::Value =
            serde_json::from_str(&raw).map_err(|e| LoadError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        let mut dictionary = Dictionary::new();
        flatten_json(path, "", &value, &mut dictionary)?;

        debug!("Loaded {} messages from {}", dictionary.len(), path.display());
        Ok(dictionary)
    }

    fn extensions(&self) -> &[&'static str] {
        &["json"]
    }
}

/// Loads YAML mappings.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlLoader;

impl Loader for YamlLoader {
    fn load(&self, path: &Path) -> Result<Dictionary, LoadError> {
        let raw = read_source(path)?;
        let value: serde_yaml::Value =
            serde_yaml::from_str(&raw).map_err(|e| LoadError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        let mut dictionary = Dictionary::new();
        // An empty file parses as null: no messages.
        if !value.is_null() {
            flatten_yaml(path, "", &value, &mut dictionary)?;
        }

        debug!("Loaded {} messages from {}", dictionary.len(), path.display());
        Ok(dictionary)
    }

    fn extensions(&self) -> &[&'static str] {
        &["yaml", "yml"]
    }
}

fn read_source(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn join_key(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

fn invalid_value(path: &Path, key: &str) -> LoadError {
    LoadError::InvalidValue {
        path: path.to_path_buf(),
        key: if key.is_empty() { "<root>".to_string() } else { key.to_string() },
    }
}

fn flatten_json(
    path: &Path,
    prefix: &str,
    value: &serde_json::Value,
    out: &mut Dictionary,
) -> Result<(), LoadError> {
    use serde_json::Value;

    match value {
        Value::Object(map) => {
            for (key, child) in map {
                flatten_json(path, &join_key(prefix, key), child, out)?;
            }
            Ok(())
        }
        _ if prefix.is_empty() => Err(invalid_value(path, prefix)),
        Value::String(s) => {
            out.insert(prefix, s.as_str());
            Ok(())
        }
        Value::Number(n) => {
            out.insert(prefix, n.to_string());
            Ok(())
        }
        Value::Bool(b) => {
            out.insert(prefix, b.to_string());
            Ok(())
        }
        Value::Null | Value::Array(_) => Err(invalid_value(path, prefix)),
    }
}

fn flatten_yaml(
    path: &Path,
    prefix: &str,
    value: &serde_yaml::Value,
    out: &mut Dictionary,
) -> Result<(), LoadError> {
    use serde_yaml::Value;

    match value {
        Value::Mapping(map) => {
            for (key, child) in map {
                let key = match key {
                    Value::String(s) => s.clone(),
                    Value::Number(n) => n.to_string(),
                    Value::Bool(b) => b.to_string(),
                    _ => return Err(invalid_value(path, prefix)),
                };
                flatten_yaml(path, &join_key(prefix, &key), child, out)?;
            }
            Ok(())
        }
        Value::Tagged(tagged) => flatten_yaml(path, prefix, &tagged.value, out),
        _ if prefix.is_empty() => Err(invalid_value(path, prefix)),
        Value::String(s) => {
            out.insert(prefix, s.as_str());
            Ok(())
        }
        Value::Number(n) => {
            out.insert(prefix, n.to_string());
            Ok(())
        }
        Value::Bool(b) => {
            out.insert(prefix, b.to_string());
            Ok(())
        }
        Value::Null | Value::Sequence(_) => Err(invalid_value(path, prefix)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).expect("Failed to write locale file");
        path
    }

    // ==================== Registry Tests ====================

    #[test]
    fn test_builtin_formats_registered() {
        let registry = LoaderRegistry::with_builtin();
        assert!(registry.get("json").is_some());
        assert!(registry.get("yaml").is_some());
        assert!(registry.get("xml").is_none());
    }

    #[test]
    fn test_empty_registry_has_no_loaders() {
        let registry = LoaderRegistry::empty();
        assert!(registry.formats().is_empty());
        assert!(registry.get("json").is_none());
    }

    #[test]
    fn test_register_custom_format() {
        struct Fixed;
        impl Loader for Fixed {
            fn load(&self, _path: &Path) -> Result<Dictionary, LoadError> {
                Ok([("A.B", "c")].into_iter().collect())
            }
            fn extensions(&self) -> &[&'static str] {
                &["fixed"]
            }
        }

        let mut registry = LoaderRegistry::empty();
        registry.register("fixed", Fixed);

        let loader = registry.get("fixed").expect("Should be registered");
        let dictionary = loader.load(Path::new("unused")).unwrap();
        assert_eq!(dictionary.get("A.B"), Some("c"));
    }

    // ==================== JSON Tests ====================

    #[test]
    fn test_json_flat() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "fr.json", r#"{"Greeter.Hello": "Bonjour, %v!"}"#);

        let dictionary = JsonLoader.load(&path).expect("Should load");
        assert_eq!(dictionary.get("Greeter.Hello"), Some("Bonjour, %v!"));
    }

    #[test]
    fn test_json_nested_flattens() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "fr.json",
            r#"{"Greeter": {"Hello": "Bonjour", "Count": 3, "Formal": true}}"#,
        );

        let dictionary = JsonLoader.load(&path).expect("Should load");
        assert_eq!(dictionary.get("Greeter.Hello"), Some("Bonjour"));
        assert_eq!(dictionary.get("Greeter.Count"), Some("3"));
        assert_eq!(dictionary.get("Greeter.Formal"), Some("true"));
    }

    #[test]
    fn test_json_array_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "fr.json", r#"{"Greeter": {"Hello": ["a", "b"]}}"#);

        let err = JsonLoader.load(&path).unwrap_err();
        assert!(matches!(err, LoadError::InvalidValue { ref key, .. } if key == "Greeter.Hello"));
    }

    #[test]
    fn test_json_root_must_be_object() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "fr.json", r#""just a string""#);

        let err = JsonLoader.load(&path).unwrap_err();
        assert!(matches!(err, LoadError::InvalidValue { ref key, .. } if key == "<root>"));
    }

    #[test]
    fn test_json_syntax_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "fr.json", "{ not json");

        let err = JsonLoader.load(&path).unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = JsonLoader.load(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("missing.json"));
    }

    // ==================== YAML Tests ====================

    #[test]
    fn test_yaml_flat_and_nested() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "fr.yaml",
            "Greeter.Hello: \"Bonjour, %v!\"\nMenu:\n  Title: Carte\n  Items: 4\n",
        );

        let dictionary = YamlLoader.load(&path).expect("Should load");
        assert_eq!(dictionary.get("Greeter.Hello"), Some("Bonjour, %v!"));
        assert_eq!(dictionary.get("Menu.Title"), Some("Carte"));
        assert_eq!(dictionary.get("Menu.Items"), Some("4"));
    }

    #[test]
    fn test_yaml_empty_file() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "fr.yaml", "");

        let dictionary = YamlLoader.load(&path).expect("Should load");
        assert!(dictionary.is_empty());
    }

    #[test]
    fn test_yaml_null_value_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "fr.yaml", "Greeter:\n  Hello: ~\n");

        let err = YamlLoader.load(&path).unwrap_err();
        assert!(err.to_string().contains("Greeter.Hello"));
    }

    #[test]
    fn test_yaml_extensions() {
        assert_eq!(YamlLoader.extensions(), &["yaml", "yml"]);
        assert_eq!(JsonLoader.extensions(), &["json"]);
    }
}
