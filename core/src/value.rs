//! Dynamic value plane
//!
//! Every tool consumes and produces [`Value`]s. The variant set is closed:
//! scalars, ordered sequences, insertion-ordered maps, and a shared
//! tool handle (the graph sometimes passes a tool *as data*, see
//! `Wrapper` and `Compose`). Mixing plain data and tools is
//! therefore always explicit in the type, never a runtime downcast.

use indexmap::IndexMap;

use crate::error::{Result, ToolError};
use crate::tool::ToolHandle;

/// Insertion-ordered string-keyed map of values.
pub type Map = IndexMap<String, Value>;

/// A dynamically typed value flowing through the tool graph.
#[derive(Clone, Debug)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Seq(Vec<Value>),
    Map(Map),
    /// A tool travelling through the data plane. Cloning shares the
    /// underlying tool, it does not copy it.
    Tool(ToolHandle),
}

impl Value {
    /// Short kind name, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::Seq(_) => "seq",
            Value::Map(_) => "map",
            Value::Tool(_) => "tool",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric coercion: `Int` widens, `Float` passes through.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Integral coercion: `Float` truncates, as coordinate math expects.
    pub fn as_coord(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Float(f) => Some(*f as i64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_seq(&self) -> Option<&[Value]> {
        match self {
            Value::Seq(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_tool(&self) -> Option<&ToolHandle> {
        match self {
            Value::Tool(t) => Some(t),
            _ => None,
        }
    }

    /// Map lookup; `None` for absent keys and non-map values.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map().and_then(|m| m.get(key))
    }

    /// Sequence lookup; `None` when out of range or not a sequence.
    pub fn index(&self, index: usize) -> Option<&Value> {
        self.as_seq().and_then(|s| s.get(index))
    }

    /// Build a value from a JSON tree. Numbers become `Int` when they
    /// fit an `i64`, `Float` otherwise.
    pub fn from_json(json: &serde_json::Value) -> Value {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Str(s.clone()),
            serde_json::Value::Array(items) => {
                Value::Seq(items.iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(fields) => Value::Map(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Convert back into JSON. Fails on `Tool` values, which have no
    /// serialized form.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::from(*i),
            Value::Float(f) => serde_json::Value::from(*f),
            Value::Str(s) => serde_json::Value::String(s.clone()),
            Value::Seq(items) => serde_json::Value::Array(
                items.iter().map(|v| v.to_json()).collect::<Result<_>>()?,
            ),
            Value::Map(fields) => serde_json::Value::Object(
                fields
                    .iter()
                    .map(|(k, v)| Ok((k.clone(), v.to_json()?)))
                    .collect::<Result<_>>()?,
            ),
            Value::Tool(_) => {
                return Err(ToolError::TypeMismatch {
                    expected: "serializable value",
                    found: "tool",
                });
            }
        })
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Seq(a), Value::Seq(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            // Tools compare by identity, not by behavior.
            (Value::Tool(a), Value::Tool(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Seq(v)
    }
}

impl From<Map> for Value {
    fn from(v: Map) -> Self {
        Value::Map(v)
    }
}

impl From<ToolHandle> for Value {
    fn from(v: ToolHandle) -> Self {
        Value::Tool(v)
    }
}

/// Calling convention for `invoke`/`update`: ordered positional values
/// plus string-keyed keyword values.
#[derive(Clone, Debug, Default)]
pub struct Args {
    pub positional: Vec<Value>,
    pub kwargs: Map,
}

impl Args {
    /// No arguments at all.
    pub fn none() -> Self {
        Args::default()
    }

    /// A single positional argument.
    pub fn of(value: impl Into<Value>) -> Self {
        Args {
            positional: vec![value.into()],
            kwargs: Map::new(),
        }
    }

    pub fn positional(values: Vec<Value>) -> Self {
        Args {
            positional: values,
            kwargs: Map::new(),
        }
    }

    pub fn with_kwarg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.kwargs.insert(key.into(), value.into());
        self
    }

    pub fn first(&self) -> Option<&Value> {
        self.positional.first()
    }

    /// First positional argument, required.
    pub fn require_first(&self) -> Result<&Value> {
        self.first()
            .ok_or(ToolError::MissingArgument("positional input value"))
    }

    pub fn kwarg(&self, key: &str) -> Option<&Value> {
        self.kwargs.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.kwargs.is_empty()
    }

    /// Per-tool keyword routing: when the kwargs hold a map under
    /// `name`, that sub-map becomes the routed kwargs; otherwise the
    /// shared kwargs apply unchanged.
    pub fn routed_kwargs(&self, name: &str) -> Map {
        match self.kwargs.get(name) {
            Some(Value::Map(sub)) => sub.clone(),
            _ => self.kwargs.clone(),
        }
    }

    /// Same positional arguments, kwargs routed for `name`.
    pub fn routed(&self, name: &str) -> Args {
        Args {
            positional: self.positional.clone(),
            kwargs: self.routed_kwargs(name),
        }
    }
}

impl From<Value> for Args {
    fn from(value: Value) -> Self {
        Args::of(value)
    }
}
