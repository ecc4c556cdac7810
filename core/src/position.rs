//! Cached geometry derivation
//!
//! Producers emit raw position maps (`x`, `y`, `w`, `h`, all optional);
//! consumers want a normalized `(x_start, y_start, x_end, y_end)`
//! rectangle. [`Region`] is that normal form and [`RegionDependent`]
//! keeps one region cached per consumer, re-derived from a shared
//! [`ProducerCache`] on every `update`.

use crate::cache::SharedCache;
use crate::error::Result;
use crate::tool::Tool;
use crate::value::{Args, Map, Value};

/// Normalized rectangle. Missing `x`/`y` in the source map default to
/// 0; a missing `w`/`h` leaves the corresponding end coordinate unset
/// (crop to the end of the input).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    pub x_start: i64,
    pub y_start: i64,
    pub x_end: Option<i64>,
    pub y_end: Option<i64>,
}

impl Region {
    /// Derive from a raw position map. A *present* `w`/`h` always sets
    /// the end coordinate, zero included; only absence leaves it unset.
    pub fn from_map(map: &Map) -> Region {
        let x_start = map.get("x").and_then(Value::as_coord).unwrap_or(0);
        let y_start = map.get("y").and_then(Value::as_coord).unwrap_or(0);
        Region {
            x_start,
            y_start,
            x_end: map.get("w").and_then(Value::as_coord).map(|w| x_start + w),
            y_end: map.get("h").and_then(Value::as_coord).map(|h| y_start + h),
        }
    }

    /// Accepts either a raw `{x,y,w,h}` map or an already-normalized
    /// 4-element sequence.
    pub fn from_value(value: &Value) -> Option<Region> {
        match value {
            Value::Map(map) => Some(Region::from_map(map)),
            Value::Seq(seq) if seq.len() == 4 => Some(Region {
                x_start: seq[0].as_coord().unwrap_or(0),
                y_start: seq[1].as_coord().unwrap_or(0),
                x_end: seq[2].as_coord(),
                y_end: seq[3].as_coord(),
            }),
            _ => None,
        }
    }

    pub fn to_value(self) -> Value {
        let end = |v: Option<i64>| v.map(Value::Int).unwrap_or(Value::Null);
        Value::Seq(vec![
            Value::Int(self.x_start),
            Value::Int(self.y_start),
            end(self.x_end),
            end(self.y_end),
        ])
    }

    pub fn width(&self) -> Option<i64> {
        self.x_end.map(|x| x - self.x_start)
    }

    pub fn height(&self) -> Option<i64> {
        self.y_end.map(|y| y - self.y_start)
    }
}

/// A consumer-side region cache keyed into a shared [`ProducerCache`].
///
/// `update` re-derives the region from the producer cache; `invoke`
/// returns the cached normalized region (or `Null` before any update).
/// Consumers embedding this (a cropper, say) read [`region`](Self::region)
/// only, never the producers.
pub struct RegionDependent {
    name: String,
    manager: SharedCache,
    key: String,
    region: Option<Region>,
}

impl RegionDependent {
    pub fn new(name: impl Into<String>, manager: SharedCache, key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            manager,
            key: key.into(),
            region: None,
        }
    }

    /// The cached region; `None` until the first successful `update`
    /// that found the key in the producer cache.
    pub fn region(&self) -> Option<Region> {
        self.region
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    fn derive(&self) -> Option<Region> {
        self.manager
            .borrow()
            .get(&self.key)
            .and_then(Region::from_value)
    }
}

impl Tool for RegionDependent {
    fn name(&self) -> &str {
        &self.name
    }

    fn invoke(&mut self, _args: &Args) -> Result<Value> {
        Ok(match self.region {
            Some(region) => region.to_value(),
            None => Value::Null,
        })
    }

    fn update(&mut self, _args: &Args) -> Result<()> {
        self.region = self.derive();
        Ok(())
    }
}
