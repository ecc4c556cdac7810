//! Terminal rendering of value trees

use colored::Colorize;

use toolgraph_core::{Args, Result, Tool, Value};

/// Renders a value tree into an indented string for the terminal.
/// Colors are optional so output stays greppable in logs and tests.
pub struct TextRenderer {
    name: String,
    color: bool,
}

impl TextRenderer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: true,
        }
    }

    /// Disable ANSI colors.
    pub fn plain(mut self) -> Self {
        self.color = false;
        self
    }

    fn key(&self, key: &str) -> String {
        if self.color {
            key.cyan().to_string()
        } else {
            key.to_string()
        }
    }

    fn scalar(&self, value: &Value) -> String {
        match value {
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Str(s) => s.clone(),
            Value::Tool(handle) => {
                let label = format!("<tool {}>", handle.name());
                if self.color {
                    label.yellow().to_string()
                } else {
                    label
                }
            }
            Value::Seq(_) | Value::Map(_) => unreachable!("containers handled by render_into"),
        }
    }

    fn render_into(&self, value: &Value, indent: usize, out: &mut String) {
        let pad = "  ".repeat(indent);
        match value {
            Value::Map(map) => {
                for (key, entry) in map {
                    match entry {
                        Value::Map(_) | Value::Seq(_) => {
                            out.push_str(&format!("{pad}{}:\n", self.key(key)));
                            self.render_into(entry, indent + 1, out);
                        }
                        _ => {
                            out.push_str(&format!(
                                "{pad}{}: {}\n",
                                self.key(key),
                                self.scalar(entry)
                            ));
                        }
                    }
                }
            }
            Value::Seq(items) => {
                for item in items {
                    match item {
                        Value::Map(_) | Value::Seq(_) => {
                            out.push_str(&format!("{pad}-\n"));
                            self.render_into(item, indent + 1, out);
                        }
                        _ => out.push_str(&format!("{pad}- {}\n", self.scalar(item))),
                    }
                }
            }
            scalar => out.push_str(&format!("{pad}{}\n", self.scalar(scalar))),
        }
    }
}

impl Tool for TextRenderer {
    fn name(&self) -> &str {
        &self.name
    }

    fn invoke(&mut self, args: &Args) -> Result<Value> {
        let mut out = String::new();
        self.render_into(args.require_first()?, 0, &mut out);
        Ok(Value::Str(out))
    }
}
