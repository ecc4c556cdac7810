//! Config-driven position mappers
//!
//! A mapper is a producer leaf: it evaluates one closure per geometry
//! field against the shared config and emits a raw `{x, y, w, h}` map.
//! Mappers sit inside a `ProducerCache` so consumers only ever read
//! their cached output, and a config reload followed by one `update`
//! moves every region at once.

use indexmap::IndexMap;
use tracing::trace;

use toolgraph_core::{Args, Config, Map, Result, SharedConfig, Tool, Value};

type FieldFn = Box<dyn Fn(&Config) -> Value>;

/// Produces a position map by evaluating per-field closures over the
/// shared config. Fields evaluate in insertion order on every invoke;
/// nothing is cached here, caching is the `ProducerCache`'s job.
pub struct PositionMapper {
    name: String,
    config: SharedConfig,
    fields: IndexMap<String, FieldFn>,
}

impl PositionMapper {
    pub fn new(name: impl Into<String>, config: SharedConfig) -> Self {
        Self {
            name: name.into(),
            config,
            fields: IndexMap::new(),
        }
    }

    /// Add a geometry field computed from config.
    pub fn field(
        mut self,
        key: impl Into<String>,
        f: impl Fn(&Config) -> Value + 'static,
    ) -> Self {
        self.fields.insert(key.into(), Box::new(f));
        self
    }

    /// Shorthand for a field that reads one config key with a default.
    pub fn from_config(self, key: &'static str, default: i64) -> Self {
        self.field(key, move |config| config.get_or(key, default))
    }
}

impl Tool for PositionMapper {
    fn name(&self) -> &str {
        &self.name
    }

    fn invoke(&mut self, _args: &Args) -> Result<Value> {
        let config = self.config.borrow();
        let mut result = Map::new();
        for (key, f) in &self.fields {
            result.insert(key.clone(), f(&config));
        }
        trace!(mapper = %self.name, fields = result.len(), "mapped positions");
        Ok(Value::Map(result))
    }
}
