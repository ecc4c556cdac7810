//! Whole-graph lifecycle tests: update cascades through arbitrarily
//! deep composites, and tool-valued data flows through Compose without
//! premature invocation.

use std::cell::Cell;
use std::rc::Rc;

use toolgraph_core::ops::{Chain, Compose, ComposeArg, Fanout, Variable, Wrapper};
use toolgraph_core::{Args, Result, Strategy, Tool, ToolHandle, ToolSet, Value};

struct Counting {
    name: String,
    updates: Rc<Cell<usize>>,
}

impl Counting {
    fn handle(name: &str, updates: &Rc<Cell<usize>>) -> ToolHandle {
        ToolHandle::new(Counting {
            name: name.to_string(),
            updates: updates.clone(),
        })
    }
}

impl Tool for Counting {
    fn name(&self) -> &str {
        &self.name
    }

    fn invoke(&mut self, args: &Args) -> Result<Value> {
        Ok(args.first().cloned().unwrap_or(Value::Null))
    }

    fn update(&mut self, _args: &Args) -> Result<()> {
        self.updates.set(self.updates.get() + 1);
        Ok(())
    }
}

#[test]
fn update_cascades_through_every_nesting_level() {
    let updates = Rc::new(Cell::new(0));

    // Six counting leaves spread across a chain, a fanout, a variable,
    // and a nested tool set; one update on the root must reach all six.
    let chain = Chain::new(
        "chain",
        vec![
            Counting::handle("c1", &updates),
            Counting::handle("c2", &updates),
        ],
    );
    let fanout = Fanout::broadcast(
        "fan",
        vec![
            Counting::handle("c3", &updates),
            Counting::handle("c4", &updates),
        ],
    );
    let variable = Variable::new("var", Counting::handle("c5", &updates));
    let inner = ToolSet::new("inner", Strategy::Dict)
        .with_handle("leaf", Counting::handle("c6", &updates));

    let mut root = ToolSet::new("root", Strategy::Dict)
        .with_tool("chain", chain)
        .with_tool("fan", fanout)
        .with_tool("var", variable)
        .with_tool("inner", inner);

    root.update(&Args::none()).unwrap();
    assert_eq!(updates.get(), 6);

    // A second update cascades again; nothing is memoized away.
    root.update(&Args::none()).unwrap();
    assert_eq!(updates.get(), 12);
}

#[test]
fn wrapper_keeps_a_tool_inert_inside_compose() {
    let updates = Rc::new(Cell::new(0));
    let inner = Counting::handle("inner", &updates);

    // The first argument resolves to the tool itself (Wrapper never
    // invokes it); the function then applies it to the second argument.
    let mut compose = Compose::new(
        "apply",
        |call: &Args| {
            let tool = call.require_first()?.as_tool().cloned().expect("tool arg");
            let input = call.positional[1].clone();
            tool.invoke(&Args::of(input))
        },
        vec![
            ComposeArg::tool(ToolHandle::new(Wrapper::tool("held", inner.clone()))),
            ComposeArg::value(9),
        ],
    );

    assert_eq!(compose.invoke(&Args::none()).unwrap(), Value::Int(9));

    // Wrapper does not cascade: the held tool saw no update.
    compose.update(&Args::none()).unwrap();
    assert_eq!(updates.get(), 0);
}

#[test]
fn errors_propagate_unmodified_through_composite_frames() {
    let failing = ToolHandle::new(toolgraph_core::ops::Lambda::new("fail", |_: &Args| {
        Err(toolgraph_core::ToolError::MissingKey("hp_bar".to_string()))
    }));
    let mut root = ToolSet::from_handles(
        "root",
        Strategy::Dict,
        vec![ToolHandle::new(Chain::new("chain", vec![failing]))],
    );

    let err = root.invoke(&Args::none()).unwrap_err();
    assert!(matches!(err, toolgraph_core::ToolError::MissingKey(key) if key == "hp_bar"));
}
