//! The Tool contract
//!
//! A tool is the unit of computation: `invoke` produces a value from
//! arguments, `update` refreshes whatever cached or derived state the
//! tool holds. Composites forward `update` to every child ("cascade"),
//! so one call on the root refreshes the whole graph; `invoke` then
//! flows purely through cached state and fresh inputs.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::error::Result;
use crate::value::{Args, Value};

/// The capability contract every node in the graph implements.
///
/// Both methods take the same [`Args`] so leaves are free to pull
/// whatever context their composite passes down. Failures propagate
/// unmodified through every enclosing combinator frame.
pub trait Tool {
    /// Name used as a dispatch/lookup key where the tool sits in a
    /// named collection. Unique only within one collection.
    fn name(&self) -> &str;

    /// Produce a value. Must not mutate graph state except where the
    /// node is explicitly a cache.
    fn invoke(&mut self, args: &Args) -> Result<Value>;

    /// Refresh internal/cached state. Default: nothing to refresh.
    fn update(&mut self, _args: &Args) -> Result<()> {
        Ok(())
    }
}

/// Shared, single-threaded handle to a tool in the graph.
///
/// Composites hold children through handles; cloning a handle shares
/// the tool rather than copying it, which is how non-owning combinators
/// (`Wrapper`, `Variable`) and tool-valued data (`Value::Tool`) refer
/// to a node owned elsewhere. The graph is strictly single-threaded:
/// handles are neither `Send` nor `Sync`, and a tool that re-enters
/// itself through a cycle will panic on the inner borrow.
#[derive(Clone)]
pub struct ToolHandle {
    inner: Rc<RefCell<dyn Tool>>,
}

impl ToolHandle {
    pub fn new(tool: impl Tool + 'static) -> Self {
        Self {
            inner: Rc::new(RefCell::new(tool)),
        }
    }

    /// Wrap an already-shared tool, e.g. a producer cache the host also
    /// keeps typed access to.
    pub fn from_shared<T: Tool + 'static>(tool: Rc<RefCell<T>>) -> Self {
        Self { inner: tool }
    }

    pub fn name(&self) -> String {
        self.inner.borrow().name().to_string()
    }

    pub fn invoke(&self, args: &Args) -> Result<Value> {
        self.inner.borrow_mut().invoke(args)
    }

    pub fn update(&self, args: &Args) -> Result<()> {
        self.inner.borrow_mut().update(args)
    }

    /// Identity comparison: two handles are equal when they share the
    /// same underlying tool.
    pub fn ptr_eq(&self, other: &ToolHandle) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for ToolHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_borrow() {
            Ok(tool) => write!(f, "ToolHandle({})", tool.name()),
            Err(_) => write!(f, "ToolHandle(<borrowed>)"),
        }
    }
}

impl<T: Tool + 'static> From<T> for ToolHandle {
    fn from(tool: T) -> Self {
        ToolHandle::new(tool)
    }
}
