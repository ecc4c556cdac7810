//! Function and reference wrappers

use crate::error::Result;
use crate::tool::{Tool, ToolHandle};
use crate::value::{Args, Value};

/// Wraps an external function as a tool. Arguments forward unchanged.
pub struct Lambda {
    name: String,
    func: Box<dyn Fn(&Args) -> Result<Value>>,
}

impl Lambda {
    pub fn new(name: impl Into<String>, func: impl Fn(&Args) -> Result<Value> + 'static) -> Self {
        Self {
            name: name.into(),
            func: Box::new(func),
        }
    }
}

impl Tool for Lambda {
    fn name(&self) -> &str {
        &self.name
    }

    fn invoke(&mut self, args: &Args) -> Result<Value> {
        (self.func)(args)
    }
}

/// Holds a value and returns it from `invoke` without ever invoking it,
/// even when the value is a tool. `update` does not cascade.
///
/// This is the escape hatch for passing a tool as a literal argument
/// into [`Compose`](crate::ops::Compose) without triggering it.
pub struct Wrapper {
    name: String,
    value: Value,
}

impl Wrapper {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Wrap a tool handle as an inert value.
    pub fn tool(name: impl Into<String>, handle: ToolHandle) -> Self {
        Self::new(name, Value::Tool(handle))
    }
}

impl Tool for Wrapper {
    fn name(&self) -> &str {
        &self.name
    }

    fn invoke(&mut self, _args: &Args) -> Result<Value> {
        Ok(self.value.clone())
    }
}

/// Holds a tool and delegates both `invoke` and `update` to it.
///
/// The delegating sibling of [`Wrapper`]: use it when a shared tool must
/// both execute and receive cascaded updates at this point in the graph.
pub struct Variable {
    name: String,
    tool: ToolHandle,
}

impl Variable {
    pub fn new(name: impl Into<String>, tool: ToolHandle) -> Self {
        Self {
            name: name.into(),
            tool,
        }
    }
}

impl Tool for Variable {
    fn name(&self) -> &str {
        &self.name
    }

    fn invoke(&mut self, args: &Args) -> Result<Value> {
        self.tool.invoke(args)
    }

    fn update(&mut self, args: &Args) -> Result<()> {
        self.tool.update(args)
    }
}
