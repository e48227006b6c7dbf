//! Registries for the callables and constants expressions may reference.
//!
//! There is no ambient namespace: callers register what templates are
//! allowed to call, and which constant tokens resolve to values.

use std::collections::HashMap;

use stencil_tree::Value;

use crate::escape::escape_html;

/// The signature of a template function: one evaluated argument in, one value
/// out. Results are trusted by the renderer and bypass HTML escaping.
pub type TemplateFunction = fn(Value) -> Value;

/// Functions callable from `name(...)` and `name::name(...)` expressions.
#[derive(Debug)]
pub struct FunctionRegistry {
    functions: HashMap<String, TemplateFunction>,
}

impl FunctionRegistry {
    /// Creates a new, empty function registry.
    pub fn new() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }

    /// Registers a function. The name may be qualified (`html::strip`) and is
    /// matched case-insensitively.
    pub fn register(&mut self, name: &str, function: TemplateFunction) {
        self.functions.insert(name.to_lowercase(), function);
    }

    /// Finds a function by name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&TemplateFunction> {
        self.functions.get(&name.to_lowercase())
    }
}

impl Default for FunctionRegistry {
    /// Creates a registry populated with the built-in functions.
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register("upper", upper);
        registry.register("lower", lower);
        registry.register("trim", trim);
        registry.register("length", length);
        registry.register("escape", escape);
        registry
    }
}

/// Values substituted for all-caps constant tokens. Empty by default; an
/// undefined constant renders as its literal token.
#[derive(Debug, Default)]
pub struct ConstantRegistry {
    constants: HashMap<String, Value>,
}

impl ConstantRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define(&mut self, name: &str, value: impl Into<Value>) {
        self.constants.insert(name.to_string(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.constants.get(name)
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.constants.contains_key(name)
    }
}

// --- Built-in Function Implementations ---

fn upper(value: Value) -> Value {
    Value::Str(value.to_string().to_uppercase())
}

fn lower(value: Value) -> Value {
    Value::Str(value.to_string().to_lowercase())
}

fn trim(value: Value) -> Value {
    Value::Str(value.to_string().trim().to_string())
}

fn length(value: Value) -> Value {
    let length = match &value {
        Value::Str(s) => s.chars().count(),
        Value::List(items) => items.len(),
        Value::Map(entries) => entries.len(),
        _ => 0,
    };
    Value::Int(length as i64)
}

fn escape(value: Value) -> Value {
    Value::Str(escape_html(&value.to_string()))
}
