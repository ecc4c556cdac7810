//! Branching and broadcast

use crate::error::{Result, ToolError};
use crate::tool::{Tool, ToolHandle};
use crate::value::{Args, Value};

enum FanoutMode {
    /// Many tools, one shared input.
    Broadcast(Vec<ToolHandle>),
    /// One tool, one invocation per element of the input sequence.
    PerElement(ToolHandle),
}

/// Fan-out combinator: either broadcast the same arguments to an
/// ordered list of tools, or map one tool over the elements of the
/// first positional sequence. Both produce an ordered sequence of
/// results.
pub struct Fanout {
    name: String,
    mode: FanoutMode,
}

impl Fanout {
    pub fn broadcast(name: impl Into<String>, tools: Vec<ToolHandle>) -> Self {
        Self {
            name: name.into(),
            mode: FanoutMode::Broadcast(tools),
        }
    }

    pub fn per_element(name: impl Into<String>, tool: ToolHandle) -> Self {
        Self {
            name: name.into(),
            mode: FanoutMode::PerElement(tool),
        }
    }
}

impl Tool for Fanout {
    fn name(&self) -> &str {
        &self.name
    }

    fn invoke(&mut self, args: &Args) -> Result<Value> {
        match &self.mode {
            FanoutMode::Broadcast(tools) => {
                let mut results = Vec::with_capacity(tools.len());
                for tool in tools {
                    results.push(tool.invoke(args)?);
                }
                Ok(Value::Seq(results))
            }
            FanoutMode::PerElement(tool) => {
                let input = args.require_first()?;
                let Some(elements) = input.as_seq() else {
                    return Err(ToolError::TypeMismatch {
                        expected: "seq",
                        found: input.kind(),
                    });
                };
                let mut results = Vec::with_capacity(elements.len());
                for element in elements {
                    let call = Args {
                        positional: vec![element.clone()],
                        kwargs: args.kwargs.clone(),
                    };
                    results.push(tool.invoke(&call)?);
                }
                Ok(Value::Seq(results))
            }
        }
    }

    fn update(&mut self, args: &Args) -> Result<()> {
        match &self.mode {
            FanoutMode::Broadcast(tools) => {
                for tool in tools {
                    tool.update(args)?;
                }
            }
            FanoutMode::PerElement(tool) => tool.update(args)?,
        }
        Ok(())
    }
}

/// Holds one tool and invokes it with the first positional sequence
/// unpacked into positional arguments. Adapts a multi-argument consumer
/// to a single-sequence input.
pub struct Unpack {
    name: String,
    tool: ToolHandle,
}

impl Unpack {
    pub fn new(name: impl Into<String>, tool: ToolHandle) -> Self {
        Self {
            name: name.into(),
            tool,
        }
    }
}

impl Tool for Unpack {
    fn name(&self) -> &str {
        &self.name
    }

    fn invoke(&mut self, args: &Args) -> Result<Value> {
        let input = args.require_first()?;
        let Some(elements) = input.as_seq() else {
            return Err(ToolError::TypeMismatch {
                expected: "seq",
                found: input.kind(),
            });
        };
        let call = Args {
            positional: elements.to_vec(),
            kwargs: args.kwargs.clone(),
        };
        self.tool.invoke(&call)
    }

    fn update(&mut self, args: &Args) -> Result<()> {
        self.tool.update(args)
    }
}
