//! Single-key extraction

use crate::error::{Result, ToolError};
use crate::tool::Tool;
use crate::value::{Args, Value};

/// Where to look inside the input value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Key {
    /// Map lookup by name.
    Name(String),
    /// Sequence lookup by position.
    Index(usize),
}

/// What to do when the key is absent.
///
/// The factory runs fresh on every miss; its results are never
/// memoized. A key that is present always wins, whatever its value:
/// `Null`, `0`, and empty containers are legitimate cached values, not
/// triggers for the default.
pub enum MissingKey {
    /// Propagate a missing-key / out-of-range error.
    Fail,
    /// Yield a fixed fallback value.
    Default(Value),
    /// Yield a freshly computed fallback value.
    Factory(Box<dyn Fn() -> Value>),
}

/// Extracts one entry from a map or sequence input.
///
/// The strict form (`MissingKey::Fail`) errors on absence; the soft
/// forms substitute a default instead. Both read the first positional
/// argument as their input.
pub struct Extract {
    name: String,
    key: Key,
    missing: MissingKey,
}

impl Extract {
    /// Strict map lookup.
    pub fn key(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            name: format!("extract[{key}]"),
            key: Key::Name(key),
            missing: MissingKey::Fail,
        }
    }

    /// Strict sequence lookup.
    pub fn index(index: usize) -> Self {
        Self {
            name: format!("extract[{index}]"),
            key: Key::Index(index),
            missing: MissingKey::Fail,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.missing = MissingKey::Default(value.into());
        self
    }

    pub fn with_factory(mut self, factory: impl Fn() -> Value + 'static) -> Self {
        self.missing = MissingKey::Factory(Box::new(factory));
        self
    }

    fn on_miss(&self) -> Result<Value> {
        match &self.missing {
            MissingKey::Fail => Err(match &self.key {
                Key::Name(name) => ToolError::MissingKey(name.clone()),
                Key::Index(index) => ToolError::IndexOutOfRange {
                    index: *index,
                    len: 0,
                },
            }),
            MissingKey::Default(value) => Ok(value.clone()),
            MissingKey::Factory(factory) => Ok(factory()),
        }
    }
}

impl Tool for Extract {
    fn name(&self) -> &str {
        &self.name
    }

    fn invoke(&mut self, args: &Args) -> Result<Value> {
        let input = args.require_first()?;
        match (&self.key, input) {
            (Key::Name(key), Value::Map(map)) => match map.get(key) {
                Some(value) => Ok(value.clone()),
                None => self.on_miss(),
            },
            (Key::Index(index), Value::Seq(seq)) => match seq.get(*index) {
                Some(value) => Ok(value.clone()),
                None => match &self.missing {
                    MissingKey::Fail => Err(ToolError::IndexOutOfRange {
                        index: *index,
                        len: seq.len(),
                    }),
                    _ => self.on_miss(),
                },
            },
            (Key::Name(_), other) => Err(ToolError::TypeMismatch {
                expected: "map",
                found: other.kind(),
            }),
            (Key::Index(_), other) => Err(ToolError::TypeMismatch {
                expected: "seq",
                found: other.kind(),
            }),
        }
    }
}
