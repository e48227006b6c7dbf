use thiserror::Error;

/// Errors raised while evaluating a bracket expression.
///
/// Any of these may be swallowed by a `left||right` default-value expression,
/// which evaluates its right operand instead of propagating.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExprError {
    #[error("unknown variable \"${0}\"")]
    UnknownVariable(String),

    #[error("cannot get attribute \"{variable}.{attribute}\": {reason}")]
    InvalidValue {
        variable: String,
        attribute: String,
        reason: String,
    },

    #[error("cannot get attribute \"{variable}.{key}\": no such key")]
    OutOfRange { variable: String, key: String },

    #[error("cannot call method \"{variable}.{method}()\": {reason}")]
    InvalidMethod {
        variable: String,
        method: String,
        reason: String,
    },

    #[error("cannot call function \"{0}\": no such function is registered")]
    InvalidFunction(String),
}
