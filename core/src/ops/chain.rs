//! Sequencing, folding, and function composition

use indexmap::IndexMap;

use crate::error::{Result, ToolError};
use crate::tool::{Tool, ToolHandle};
use crate::value::{Args, Value};

/// Threads a single value through an ordered list of tools:
/// `out = t_n(...t_1(in))`.
///
/// Children receive only the threaded value; keyword routing is the
/// business of `ToolSet` with the Sequential strategy, not of this
/// combinator.
pub struct Chain {
    name: String,
    tools: Vec<ToolHandle>,
}

impl Chain {
    pub fn new(name: impl Into<String>, tools: Vec<ToolHandle>) -> Self {
        Self {
            name: name.into(),
            tools,
        }
    }
}

impl Tool for Chain {
    fn name(&self) -> &str {
        &self.name
    }

    fn invoke(&mut self, args: &Args) -> Result<Value> {
        let mut threaded = args.first().cloned().unwrap_or(Value::Null);
        for tool in &self.tools {
            threaded = tool.invoke(&Args::of(threaded))?;
        }
        Ok(threaded)
    }

    fn update(&mut self, args: &Args) -> Result<()> {
        for tool in &self.tools {
            tool.update(args)?;
        }
        Ok(())
    }
}

/// Associative reduction operator for [`Fold`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FoldOp {
    Sum,
    Product,
}

impl FoldOp {
    fn identity(self) -> Value {
        match self {
            FoldOp::Sum => Value::Int(0),
            FoldOp::Product => Value::Int(1),
        }
    }

    fn apply(self, acc: Value, next: Value) -> Result<Value> {
        match (&acc, &next) {
            (Value::Int(a), Value::Int(b)) => Ok(match self {
                FoldOp::Sum => Value::Int(a + b),
                FoldOp::Product => Value::Int(a * b),
            }),
            _ => {
                let (a, b) = match (acc.as_float(), next.as_float()) {
                    (Some(a), Some(b)) => (a, b),
                    _ => {
                        return Err(ToolError::TypeMismatch {
                            expected: "numeric value",
                            found: if acc.as_float().is_none() {
                                acc.kind()
                            } else {
                                next.kind()
                            },
                        });
                    }
                };
                Ok(match self {
                    FoldOp::Sum => Value::Float(a + b),
                    FoldOp::Product => Value::Float(a * b),
                })
            }
        }
    }
}

/// Invokes every held tool with identical arguments and reduces the
/// ordered results with one associative operator. An empty tool list
/// yields the operator's identity.
pub struct Fold {
    name: String,
    tools: Vec<ToolHandle>,
    op: FoldOp,
}

impl Fold {
    pub fn sum(name: impl Into<String>, tools: Vec<ToolHandle>) -> Self {
        Self {
            name: name.into(),
            tools,
            op: FoldOp::Sum,
        }
    }

    pub fn product(name: impl Into<String>, tools: Vec<ToolHandle>) -> Self {
        Self {
            name: name.into(),
            tools,
            op: FoldOp::Product,
        }
    }
}

impl Tool for Fold {
    fn name(&self) -> &str {
        &self.name
    }

    fn invoke(&mut self, args: &Args) -> Result<Value> {
        let mut acc = self.op.identity();
        for tool in &self.tools {
            acc = self.op.apply(acc, tool.invoke(args)?)?;
        }
        Ok(acc)
    }

    fn update(&mut self, args: &Args) -> Result<()> {
        for tool in &self.tools {
            tool.update(args)?;
        }
        Ok(())
    }
}

/// One fixed argument of a [`Compose`]: either a literal value or a
/// tool resolved at call time.
pub enum ComposeArg {
    Value(Value),
    Tool(ToolHandle),
}

impl ComposeArg {
    pub fn value(value: impl Into<Value>) -> Self {
        ComposeArg::Value(value.into())
    }

    pub fn tool(handle: ToolHandle) -> Self {
        ComposeArg::Tool(handle)
    }

    fn resolve(&self, caller: &Args) -> Result<Value> {
        match self {
            ComposeArg::Value(value) => Ok(value.clone()),
            ComposeArg::Tool(handle) => handle.invoke(caller),
        }
    }
}

impl From<Value> for ComposeArg {
    fn from(value: Value) -> Self {
        ComposeArg::Value(value)
    }
}

impl From<ToolHandle> for ComposeArg {
    fn from(handle: ToolHandle) -> Self {
        ComposeArg::Tool(handle)
    }
}

/// The function a [`Compose`] applies to its resolved arguments.
pub enum ComposeFn {
    Func(Box<dyn Fn(&Args) -> Result<Value>>),
    Tool(ToolHandle),
}

/// Wraps an external function plus a fixed tuple of positional and
/// keyword arguments, any of which may themselves be tools.
///
/// On `invoke`, each tool-valued argument is invoked with the *caller's*
/// arguments to resolve it to a concrete value; literals pass through;
/// the wrapped function is then applied to the resolved arguments.
/// `update` cascades to every tool-valued argument and to the function
/// itself when it is a tool.
pub struct Compose {
    name: String,
    func: ComposeFn,
    args: Vec<ComposeArg>,
    kwargs: IndexMap<String, ComposeArg>,
}

impl Compose {
    pub fn new(
        name: impl Into<String>,
        func: impl Fn(&Args) -> Result<Value> + 'static,
        args: Vec<ComposeArg>,
    ) -> Self {
        Self {
            name: name.into(),
            func: ComposeFn::Func(Box::new(func)),
            args,
            kwargs: IndexMap::new(),
        }
    }

    /// Compose over a tool instead of a bare function.
    pub fn tool(name: impl Into<String>, func: ToolHandle, args: Vec<ComposeArg>) -> Self {
        Self {
            name: name.into(),
            func: ComposeFn::Tool(func),
            args,
            kwargs: IndexMap::new(),
        }
    }

    pub fn with_kwarg(mut self, key: impl Into<String>, arg: impl Into<ComposeArg>) -> Self {
        self.kwargs.insert(key.into(), arg.into());
        self
    }
}

impl Tool for Compose {
    fn name(&self) -> &str {
        &self.name
    }

    fn invoke(&mut self, args: &Args) -> Result<Value> {
        let mut call = Args::default();
        for arg in &self.args {
            call.positional.push(arg.resolve(args)?);
        }
        for (key, arg) in &self.kwargs {
            call.kwargs.insert(key.clone(), arg.resolve(args)?);
        }
        match &self.func {
            ComposeFn::Func(func) => func(&call),
            ComposeFn::Tool(handle) => handle.invoke(&call),
        }
    }

    fn update(&mut self, args: &Args) -> Result<()> {
        if let ComposeFn::Tool(handle) = &self.func {
            handle.update(args)?;
        }
        for arg in self.args.iter().chain(self.kwargs.values()) {
            if let ComposeArg::Tool(handle) = arg {
                handle.update(args)?;
            }
        }
        Ok(())
    }
}
