//! Recursive rendering of a block tree against a data scope.

use stencil_expr::{ConstantRegistry, EvaluationContext, FunctionRegistry, evaluate};
use stencil_tree::{NodeId, Tree};

use crate::ast::{BlockNode, TemplateNode};
use crate::error::TemplateError;

/// Render one block with `scope` as the current data node. Nested blocks are
/// rendered once per same-named child of the scope, in insertion order; a
/// block with no matching data children contributes nothing.
pub(crate) fn render_block(
    block: &BlockNode,
    tree: &Tree,
    scope: NodeId,
    functions: &FunctionRegistry,
    constants: &ConstantRegistry,
) -> Result<String, TemplateError> {
    let mut html = String::new();

    for child in &block.children {
        match child {
            TemplateNode::Html(content) => html.push_str(content),
            TemplateNode::Expression(raw) => {
                let e_ctx = EvaluationContext {
                    tree,
                    scope,
                    functions,
                    constants,
                };
                html.push_str(&evaluate(raw, &e_ctx)?);
            }
            TemplateNode::Block(inner) => {
                let data_scopes = tree.find(scope, &inner.name);
                log::trace!(
                    "block '{}': {} matching data node(s)",
                    inner.name,
                    data_scopes.len()
                );
                for data_scope in data_scopes {
                    html.push_str(&render_block(inner, tree, data_scope, functions, constants)?);
                }
            }
        }
    }

    Ok(html)
}
