//! Named tool collections
//!
//! A [`ToolSet`] is an ordered, name-keyed set of entries with one
//! aggregate-invocation strategy fixed at construction. The entry type
//! distinguishes live tools from plain stored values, so cascade and
//! cache logic never has to guess what a slot holds.

use indexmap::IndexMap;
use tracing::trace;

use crate::error::Result;
use crate::tool::{Tool, ToolHandle};
use crate::value::{Args, Map, Value};

/// One slot in a collection: either a live tool or a plain value.
#[derive(Clone, Debug)]
pub enum Entry {
    Tool(ToolHandle),
    Value(Value),
}

impl Entry {
    pub fn as_tool(&self) -> Option<&ToolHandle> {
        match self {
            Entry::Tool(handle) => Some(handle),
            Entry::Value(_) => None,
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Entry::Value(value) => Some(value),
            Entry::Tool(_) => None,
        }
    }
}

/// How `invoke` combines the children's results. Fixed at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// Invoke every entry with identical arguments; result is a map
    /// name → result in insertion order.
    Dict,
    /// Thread a single value through the entries in insertion order,
    /// with per-name keyword routing (a kwarg map keyed by an entry's
    /// name applies to that entry only, others see the shared kwargs).
    Sequential,
    /// Invoke every entry with identical arguments; result is the
    /// ordered list of results.
    Concatenate,
}

/// Ordered, name-keyed collection of tools with a fixed strategy.
///
/// `update` always cascades to every held tool regardless of strategy;
/// only `invoke` behavior differs. Names need not be unique across the
/// whole graph, only within one collection.
pub struct ToolSet {
    name: String,
    strategy: Strategy,
    entries: IndexMap<String, Entry>,
}

impl ToolSet {
    pub fn new(name: impl Into<String>, strategy: Strategy) -> Self {
        Self {
            name: name.into(),
            strategy,
            entries: IndexMap::new(),
        }
    }

    /// Build from a list of handles, keyed by each tool's own name.
    pub fn from_handles(
        name: impl Into<String>,
        strategy: Strategy,
        handles: Vec<ToolHandle>,
    ) -> Self {
        let mut set = Self::new(name, strategy);
        for handle in handles {
            set.entries.insert(handle.name(), Entry::Tool(handle));
        }
        set
    }

    pub fn with_tool(mut self, key: impl Into<String>, tool: impl Tool + 'static) -> Self {
        self.insert_tool(key, ToolHandle::new(tool));
        self
    }

    pub fn with_handle(mut self, key: impl Into<String>, handle: ToolHandle) -> Self {
        self.insert_tool(key, handle);
        self
    }

    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries.insert(key.into(), Entry::Value(value.into()));
        self
    }

    pub fn insert_tool(&mut self, key: impl Into<String>, handle: ToolHandle) {
        self.entries.insert(key.into(), Entry::Tool(handle));
    }

    pub fn insert_value(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(key.into(), Entry::Value(value.into()));
    }

    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.entries.get(key)
    }

    /// Handle of the tool stored under `key`, if that entry is a tool.
    pub fn handle(&self, key: &str) -> Option<ToolHandle> {
        self.entries.get(key).and_then(|e| e.as_tool()).cloned()
    }

    /// Remove and return the entry under `key`, preserving the order of
    /// the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Entry> {
        self.entries.shift_remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.entries.iter().map(|(k, e)| (k.as_str(), e))
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    fn invoke_dict(&self, args: &Args) -> Result<Value> {
        let mut result = Map::new();
        for (key, entry) in &self.entries {
            let value = match entry {
                Entry::Tool(handle) => handle.invoke(args)?,
                Entry::Value(value) => value.clone(),
            };
            result.insert(key.clone(), value);
        }
        Ok(Value::Map(result))
    }

    fn invoke_sequential(&self, args: &Args) -> Result<Value> {
        let mut entries = self.entries.iter();
        let Some((first_key, first_entry)) = entries.next() else {
            return Ok(Value::Null);
        };

        let mut threaded = match first_entry {
            Entry::Tool(handle) => handle.invoke(&args.routed(first_key))?,
            Entry::Value(value) => value.clone(),
        };

        for (key, entry) in entries {
            threaded = match entry {
                Entry::Tool(handle) => {
                    let step = Args {
                        positional: vec![threaded],
                        kwargs: args.routed_kwargs(key),
                    };
                    handle.invoke(&step)?
                }
                Entry::Value(value) => value.clone(),
            };
        }
        Ok(threaded)
    }

    fn invoke_concatenate(&self, args: &Args) -> Result<Value> {
        let mut result = Vec::with_capacity(self.entries.len());
        for entry in self.entries.values() {
            result.push(match entry {
                Entry::Tool(handle) => handle.invoke(args)?,
                Entry::Value(value) => value.clone(),
            });
        }
        Ok(Value::Seq(result))
    }
}

impl Tool for ToolSet {
    fn name(&self) -> &str {
        &self.name
    }

    fn invoke(&mut self, args: &Args) -> Result<Value> {
        trace!(set = %self.name, strategy = ?self.strategy, "invoking tool set");
        match self.strategy {
            Strategy::Dict => self.invoke_dict(args),
            Strategy::Sequential => self.invoke_sequential(args),
            Strategy::Concatenate => self.invoke_concatenate(args),
        }
    }

    fn update(&mut self, args: &Args) -> Result<()> {
        for (key, entry) in &self.entries {
            if let Entry::Tool(handle) = entry {
                trace!(set = %self.name, tool = %key, "cascading update");
                handle.update(args)?;
            }
        }
        Ok(())
    }
}
