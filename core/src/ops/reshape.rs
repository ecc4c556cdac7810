//! Data reshaping between map and sequence forms
//!
//! These adapters only move values around; none of them invoke tools.
//! Missing keys soften to `Null` rather than failing, which is the
//! deliberate exception to the engine's propagate-everything policy.

use crate::error::{Result, ToolError};
use crate::tool::Tool;
use crate::value::{Args, Map, Value};

fn require_map(value: &Value) -> Result<&Map> {
    value.as_map().ok_or(ToolError::TypeMismatch {
        expected: "map",
        found: value.kind(),
    })
}

fn require_seq(value: &Value) -> Result<&[Value]> {
    value.as_seq().ok_or(ToolError::TypeMismatch {
        expected: "seq",
        found: value.kind(),
    })
}

/// Restricts a map to a fixed ordered key list. Absent keys yield
/// `Null` entries instead of failing.
pub struct Gather {
    name: String,
    keys: Vec<String>,
}

impl Gather {
    pub fn new(name: impl Into<String>, keys: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }
}

impl Tool for Gather {
    fn name(&self) -> &str {
        &self.name
    }

    fn invoke(&mut self, args: &Args) -> Result<Value> {
        let map = require_map(args.require_first()?)?;
        let mut result = Map::new();
        for key in &self.keys {
            result.insert(key.clone(), map.get(key).cloned().unwrap_or(Value::Null));
        }
        Ok(Value::Map(result))
    }
}

/// Same key selection as [`Gather`] but yields the ordered values as a
/// sequence instead of a map.
pub struct Pluck {
    name: String,
    keys: Vec<String>,
}

impl Pluck {
    pub fn new(name: impl Into<String>, keys: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }
}

impl Tool for Pluck {
    fn name(&self) -> &str {
        &self.name
    }

    fn invoke(&mut self, args: &Args) -> Result<Value> {
        let map = require_map(args.require_first()?)?;
        Ok(Value::Seq(
            self.keys
                .iter()
                .map(|key| map.get(key).cloned().unwrap_or(Value::Null))
                .collect(),
        ))
    }
}

/// Zips a fixed key list with the input sequence into a map. Excess
/// values beyond the key list are dropped, as are excess keys beyond
/// the sequence length.
pub struct Spread {
    name: String,
    keys: Vec<String>,
}

impl Spread {
    pub fn new(name: impl Into<String>, keys: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }
}

impl Tool for Spread {
    fn name(&self) -> &str {
        &self.name
    }

    fn invoke(&mut self, args: &Args) -> Result<Value> {
        let values = require_seq(args.require_first()?)?;
        Ok(Value::Map(
            self.keys
                .iter()
                .zip(values.iter())
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        ))
    }
}

/// Merges every positional map argument into one; later arguments win
/// on key clashes.
pub struct MergeMaps {
    name: String,
}

impl MergeMaps {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Tool for MergeMaps {
    fn name(&self) -> &str {
        &self.name
    }

    fn invoke(&mut self, args: &Args) -> Result<Value> {
        let mut merged = Map::new();
        for value in &args.positional {
            for (key, entry) in require_map(value)? {
                merged.insert(key.clone(), entry.clone());
            }
        }
        Ok(Value::Map(merged))
    }
}

/// Concatenates every positional sequence argument into one.
pub struct MergeSeqs {
    name: String,
}

impl MergeSeqs {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Tool for MergeSeqs {
    fn name(&self) -> &str {
        &self.name
    }

    fn invoke(&mut self, args: &Args) -> Result<Value> {
        let mut merged = Vec::new();
        for value in &args.positional {
            merged.extend(require_seq(value)?.iter().cloned());
        }
        Ok(Value::Seq(merged))
    }
}
