//! Configuration layer
//!
//! [`Settings`] is a flat, dynamically extensible attribute bag;
//! [`Config`] wraps one `Settings` instance and is what config-dependent
//! tools hold. The config is created once, shared by reference
//! ([`SharedConfig`]), and mutated in place on reload: holders observe
//! the new values after the next `update` pass, the instance is never
//! replaced underneath them.
//!
//! Loading merges sources with later-wins priority: defaults, then an
//! optional TOML file, then `TOOLGRAPH_`-prefixed environment variables.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::value::Value;

/// Flat key→value bag of JSON-typed settings.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings {
    values: IndexMap<String, serde_json::Value>,
}

impl Settings {
    pub fn new() -> Self {
        Settings::default()
    }

    pub fn from_values(values: IndexMap<String, serde_json::Value>) -> Self {
        Settings { values }
    }

    /// Merge defaults, an optional TOML file, and `TOOLGRAPH_`-prefixed
    /// environment variables. Later sources win.
    pub fn load(file: Option<&Path>) -> Result<Settings> {
        let mut figment = Figment::from(Serialized::defaults(Settings::new()));
        if let Some(path) = file {
            figment = figment.merge(Toml::file(path));
        }
        figment = figment.merge(Env::prefixed("TOOLGRAPH_"));

        let settings = figment.extract::<Settings>()?;
        debug!(keys = settings.len(), "settings loaded");
        Ok(settings)
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.values.get(key)
    }

    /// Default-returning lookup.
    pub fn get_or(&self, key: &str, default: serde_json::Value) -> serde_json::Value {
        self.values.get(key).cloned().unwrap_or(default)
    }

    pub fn set(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.values.insert(key.into(), value);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Merge another bag into this one; the other side wins on clashes.
    pub fn merge(&mut self, other: Settings) {
        for (key, value) in other.values {
            self.values.insert(key, value);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &serde_json::Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Configuration handed to config-dependent tools.
#[derive(Clone, Debug, Default)]
pub struct Config {
    settings: Settings,
}

/// Shared, single-threaded reference to one mutable [`Config`].
pub type SharedConfig = Rc<RefCell<Config>>;

impl Config {
    pub fn new(settings: Settings) -> Self {
        Config { settings }
    }

    pub fn into_shared(self) -> SharedConfig {
        Rc::new(RefCell::new(self))
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Lookup bridged into the engine's value plane.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.settings.get(key).map(Value::from_json)
    }

    pub fn get_or(&self, key: &str, default: impl Into<Value>) -> Value {
        self.get(key).unwrap_or_else(|| default.into())
    }

    /// Integral coordinate lookup, truncating floats.
    pub fn coord(&self, key: &str) -> Option<i64> {
        self.get(key).as_ref().and_then(Value::as_coord)
    }

    /// Replace settings in place by merging a fresh bag over the
    /// current one. The `Config` instance itself stays where it is, so
    /// every holder sees the new values.
    pub fn reload(&mut self, settings: Settings) {
        debug!(keys = settings.len(), "config reloaded");
        self.settings.merge(settings);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn settings_of(pairs: &[(&str, serde_json::Value)]) -> Settings {
        let mut settings = Settings::new();
        for (key, value) in pairs {
            settings.set(*key, value.clone());
        }
        settings
    }

    #[test]
    fn test_default_returning_lookup() {
        let settings = settings_of(&[("width", json!(1920))]);
        assert_eq!(settings.get_or("width", json!(0)), json!(1920));
        assert_eq!(settings.get_or("height", json!(1080)), json!(1080));
    }

    #[test]
    fn test_merge_later_wins() {
        let mut settings = settings_of(&[("scale", json!(1.0)), ("path", json!("a"))]);
        settings.merge(settings_of(&[("scale", json!(2.0))]));
        assert_eq!(settings.get("scale"), Some(&json!(2.0)));
        assert_eq!(settings.get("path"), Some(&json!("a")));
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "width = 800\nlabel = \"hp\"").unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.get("width"), Some(&json!(800)));
        assert_eq!(settings.get("label"), Some(&json!("hp")));
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let settings = Settings::load(Some(Path::new("/nonexistent/toolgraph.toml"))).unwrap();
        assert!(settings.is_empty());
    }

    #[test]
    fn test_shared_config_reload_is_visible_to_holders() {
        let config = Config::new(settings_of(&[("x", json!(10))])).into_shared();
        let holder = config.clone();
        assert_eq!(holder.borrow().coord("x"), Some(10));

        config
            .borrow_mut()
            .reload(settings_of(&[("x", json!(25))]));
        assert_eq!(holder.borrow().coord("x"), Some(25));
    }

    #[test]
    fn test_config_value_bridging() {
        let config = Config::new(settings_of(&[("scale", json!(1.5)), ("name", json!("bar"))]));
        assert_eq!(config.get("scale"), Some(Value::Float(1.5)));
        assert_eq!(config.get_or("missing", 7), Value::Int(7));
        assert_eq!(config.coord("scale"), Some(1));
    }
}
