//! The bracket expression language evaluated during template rendering.
//!
//! Raw `{...}` span content is classified into one of a handful of forms
//! (ternary, variable lookup, function call, constant, default-value, literal)
//! and evaluated against a data tree scope. Classification happens at render
//! time, per span, so malformed content in a branch that never renders never
//! fails.

pub mod ast;
pub mod engine;
pub mod error;
mod escape;
pub mod functions;
mod parser;

// --- Public API ---
pub use ast::{Access, Expr};
pub use engine::{EvaluationContext, evaluate, evaluate_value};
pub use error::ExprError;
pub use escape::escape_html;
pub use functions::{ConstantRegistry, FunctionRegistry, TemplateFunction};
pub use parser::classify;
