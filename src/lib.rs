//! Stencil: a block-based HTML template engine.
//!
//! Templates are plain text with two directives, `{block:<name>}` and
//! `{end}`, delimiting repeatable sections, plus arbitrary `{...}` expression
//! spans resolved against a hierarchical data scope at render time. This
//! facade crate re-exports the public API of the workspace members:
//!
//! - `stencil-tree`: the scoped key/value data tree and value model
//! - `stencil-expr`: the bracket expression language and its registries
//! - `stencil-template`: template parsing, file lookup and rendering
//!
//! ```
//! use stencil::Template;
//!
//! let mut tpl = Template::from_source(
//!     "<h1>{$page_title}</h1>{block:ad}<div>{$ad_content}</div>{end}",
//! )?;
//! tpl.set("page_title", "Some title");
//! for ad in ["Some ad", "Another ad", "More ads"] {
//!     tpl.add("ad").set("ad_content", ad);
//! }
//!
//! assert_eq!(
//!     tpl.render()?,
//!     "<h1>Some title</h1><div>Some ad</div><div>Another ad</div><div>More ads</div>",
//! );
//! # Ok::<(), stencil::TemplateError>(())
//! ```

pub use stencil_expr::{
    Access, ConstantRegistry, EvaluationContext, Expr, ExprError, FunctionRegistry,
    TemplateFunction, classify, escape_html, evaluate, evaluate_value,
};
pub use stencil_template::{
    BlockNode, DEFAULT_EXTENSION, Template, TemplateError, TemplateLoader, TemplateNode,
};
pub use stencil_tree::{NodeId, NodeMut, ObjectValue, Tree, TreeError, Value};
