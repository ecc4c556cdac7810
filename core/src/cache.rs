//! Producer/consumer caching
//!
//! A [`ProducerCache`] wraps a set of producer tools whose results are
//! expensive or trigger-driven (typically geometry derived from config).
//! `update` recomputes and caches every producer's value; consumers then
//! read only the cache through [`get`](ProducerCache::get), never the
//! producers themselves. Before the first `update` the cache is empty
//! and reads yield `None`.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;
use tracing::debug;

use crate::collection::{Entry, ToolSet};
use crate::error::Result;
use crate::tool::Tool;
use crate::value::{Args, Value};

/// Caches the outputs of a producer [`ToolSet`], keyed by producer name.
pub struct ProducerCache {
    name: String,
    source: ToolSet,
    cache: IndexMap<String, Value>,
}

/// Shared handle for consumers that read the cache while the cache
/// itself sits in the graph as a tool.
pub type SharedCache = Rc<RefCell<ProducerCache>>;

impl ProducerCache {
    pub fn new(source: ToolSet) -> Self {
        Self {
            name: source.name().to_string(),
            source,
            cache: IndexMap::new(),
        }
    }

    pub fn into_shared(self) -> SharedCache {
        Rc::new(RefCell::new(self))
    }

    /// Cached value for `name`. `None` until the producer has been
    /// refreshed by an `update`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.cache.get(name)
    }

    pub fn cached(&self) -> &IndexMap<String, Value> {
        &self.cache
    }

    pub fn source(&self) -> &ToolSet {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut ToolSet {
        &mut self.source
    }

    /// Re-derive the cache: rescan the source for live producers,
    /// invoke each with `args`, and overwrite the stored value under
    /// the producer's name. Plain value entries are stored as-is.
    fn refresh(&mut self, args: &Args) -> Result<()> {
        for (key, entry) in self.source.iter() {
            let value = match entry {
                Entry::Tool(handle) => handle.invoke(args)?,
                Entry::Value(value) => value.clone(),
            };
            self.cache.insert(key.to_string(), value);
        }
        debug!(cache = %self.name, entries = self.cache.len(), "producer cache refreshed");
        Ok(())
    }
}

impl Tool for ProducerCache {
    fn name(&self) -> &str {
        &self.name
    }

    fn invoke(&mut self, args: &Args) -> Result<Value> {
        self.refresh(args)?;
        Ok(Value::Map(self.cache.clone()))
    }

    /// Cascade into the producers first, then re-derive the cache, so
    /// one `update` on this node leaves every cached value current.
    fn update(&mut self, args: &Args) -> Result<()> {
        self.source.update(args)?;
        self.refresh(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::Strategy;
    use crate::ops::Lambda;
    use std::cell::Cell;

    fn counter_producer(name: &str) -> (crate::tool::ToolHandle, Rc<Cell<i64>>) {
        let count = Rc::new(Cell::new(0));
        let inner = count.clone();
        let handle = crate::tool::ToolHandle::new(Lambda::new(name, move |_: &Args| {
            inner.set(inner.get() + 1);
            Ok(Value::Int(inner.get()))
        }));
        (handle, count)
    }

    #[test]
    fn test_cache_is_empty_before_update() {
        let (producer, _) = counter_producer("geometry");
        let cache =
            ProducerCache::new(ToolSet::from_handles("positions", Strategy::Dict, vec![producer]));
        assert!(cache.get("geometry").is_none());
    }

    #[test]
    fn test_update_populates_and_overwrites() {
        let (producer, invocations) = counter_producer("geometry");
        let mut cache =
            ProducerCache::new(ToolSet::from_handles("positions", Strategy::Dict, vec![producer]));

        cache.update(&Args::none()).unwrap();
        assert_eq!(cache.get("geometry"), Some(&Value::Int(1)));

        // A second update overwrites the previous cached value.
        cache.update(&Args::none()).unwrap();
        assert_eq!(cache.get("geometry"), Some(&Value::Int(2)));
        assert_eq!(invocations.get(), 2);
    }

    #[test]
    fn test_reads_do_not_touch_producers() {
        let (producer, invocations) = counter_producer("geometry");
        let mut cache =
            ProducerCache::new(ToolSet::from_handles("positions", Strategy::Dict, vec![producer]));
        cache.update(&Args::none()).unwrap();

        let before = invocations.get();
        for _ in 0..5 {
            assert!(cache.get("geometry").is_some());
        }
        assert_eq!(invocations.get(), before);
    }

    #[test]
    fn test_plain_value_entries_are_stored() {
        let source = ToolSet::new("positions", Strategy::Dict).with_value("fixed", 11);
        let mut cache = ProducerCache::new(source);
        cache.update(&Args::none()).unwrap();
        assert_eq!(cache.get("fixed"), Some(&Value::Int(11)));
    }

    #[test]
    fn test_invoke_refreshes_and_returns_the_cache() {
        let (producer, _) = counter_producer("geometry");
        let mut cache =
            ProducerCache::new(ToolSet::from_handles("positions", Strategy::Dict, vec![producer]));
        let result = cache.invoke(&Args::none()).unwrap();
        assert_eq!(result.get("geometry"), Some(&Value::Int(1)));
    }
}
