//! Evaluation of classified expressions against a data scope.

use stencil_tree::{NodeId, Tree, Value};

use crate::ast::{Access, Expr};
use crate::error::ExprError;
use crate::escape::escape_html;
use crate::functions::{ConstantRegistry, FunctionRegistry};
use crate::parser::classify;

/// Everything evaluation needs: the data tree, the node acting as the current
/// scope, and the registries for callables and constants.
pub struct EvaluationContext<'a> {
    pub tree: &'a Tree,
    pub scope: NodeId,
    pub functions: &'a FunctionRegistry,
    pub constants: &'a ConstantRegistry,
}

/// Evaluate raw bracket content to its rendered string form.
pub fn evaluate(raw: &str, e_ctx: &EvaluationContext) -> Result<String, ExprError> {
    Ok(evaluate_value(raw, e_ctx, true)?.to_string())
}

/// Evaluate raw bracket content to a value.
///
/// `root_level` marks content that sat directly between braces in the
/// template. Unresolved constants and literal fallthrough are re-wrapped in
/// braces there; in sub-expressions they come back as bare text.
pub fn evaluate_value(
    raw: &str,
    e_ctx: &EvaluationContext,
    root_level: bool,
) -> Result<Value, ExprError> {
    match classify(raw) {
        Expr::Ternary {
            condition,
            then,
            otherwise,
        } => {
            // A missing variable in condition position reads as falsy instead
            // of raising.
            let truthy = match evaluate_value(&condition, e_ctx, false) {
                Err(ExprError::UnknownVariable(_)) => false,
                result => result?.is_truthy(),
            };
            if truthy {
                evaluate_value(&then, e_ctx, false)
            } else if let Some(otherwise) = otherwise {
                evaluate_value(&otherwise, e_ctx, false)
            } else {
                Ok(Value::Str(String::new()))
            }
        }
        Expr::Variable {
            name,
            access,
            escape,
        } => evaluate_variable(&name, access.as_ref(), escape, e_ctx),
        Expr::Call { callee, argument } => {
            let function = *e_ctx
                .functions
                .get(&callee)
                .ok_or(ExprError::InvalidFunction(callee))?;
            let argument = evaluate_value(&argument, e_ctx, false)?;
            // Function results are trusted and bypass escaping.
            Ok(function(argument))
        }
        Expr::Constant(name) => match e_ctx.constants.get(&name) {
            Some(value) => Ok(value.clone()),
            None => Ok(Value::Str(wrap_literal(name, root_level))),
        },
        Expr::DefaultValue { left, right } => match evaluate_value(&left, e_ctx, false) {
            Ok(value) => Ok(value),
            Err(error) => {
                // The one designed recovery point: any evaluation error on the
                // left operand selects the fallback.
                log::trace!("expression '{}' failed ({}), using fallback", left, error);
                evaluate_value(&right, e_ctx, false)
            }
        },
        Expr::Literal(text) => Ok(Value::Str(wrap_literal(text, root_level))),
    }
}

fn wrap_literal(text: String, root_level: bool) -> String {
    if root_level {
        format!("{{{}}}", text)
    } else {
        text
    }
}

fn evaluate_variable(
    name: &str,
    access: Option<&Access>,
    escape: bool,
    e_ctx: &EvaluationContext,
) -> Result<Value, ExprError> {
    let base = e_ctx.tree.get(e_ctx.scope, name).cloned();

    let value = match access {
        None => base.ok_or_else(|| ExprError::UnknownVariable(name.to_string()))?,
        Some(Access::Attribute(attribute)) => {
            let base = base.ok_or_else(|| invalid_value(name, attribute, "value is null"))?;
            match base {
                Value::Map(entries) => {
                    entries
                        .get(attribute)
                        .cloned()
                        .ok_or_else(|| ExprError::OutOfRange {
                            variable: name.to_string(),
                            key: attribute.clone(),
                        })?
                }
                Value::Object(object) => object
                    .attribute(attribute)
                    .ok_or_else(|| invalid_value(name, attribute, "no such attribute"))?,
                _ => return Err(invalid_value(name, attribute, "value is not a map or object")),
            }
        }
        Some(Access::Method(method)) => {
            let base = base.ok_or_else(|| invalid_method(name, method, "value is null"))?;
            match base {
                Value::Object(object) => {
                    if !object.has_method(method) {
                        return Err(invalid_method(name, method, "no such method"));
                    }
                    object
                        .call(method)
                        .ok_or_else(|| invalid_method(name, method, "no such method"))?
                }
                _ => return Err(invalid_method(name, method, "value is not an object")),
            }
        }
    };

    Ok(apply_escaping(value, escape))
}

/// Escaping applies to string results of variable lookups only; the `$$` form
/// turns it off per occurrence.
fn apply_escaping(value: Value, escape: bool) -> Value {
    match value {
        Value::Str(s) if escape => Value::Str(escape_html(&s)),
        other => other,
    }
}

fn invalid_value(variable: &str, attribute: &str, reason: &str) -> ExprError {
    ExprError::InvalidValue {
        variable: variable.to_string(),
        attribute: attribute.to_string(),
        reason: reason.to_string(),
    }
}

fn invalid_method(variable: &str, method: &str, reason: &str) -> ExprError {
    ExprError::InvalidMethod {
        variable: variable.to_string(),
        method: method.to_string(),
        reason: reason.to_string(),
    }
}
