//! A `nom`-based recogniser for the expression forms of a bracket span.

use nom::{
    IResult, Parser,
    bytes::complete::{tag, take_while1},
    character::complete::char,
    combinator::{map, opt, recognize},
    sequence::{pair, preceded},
};

use crate::ast::{Access, Expr};

// --- Main Public Parser ---

/// Classify raw bracket content into its expression form.
///
/// Matching follows the grammar's precedence: ternary, variable, function
/// call, constant, default-value, then literal fallthrough. The function is
/// total; content matching no form comes back as [`Expr::Literal`].
pub fn classify(raw: &str) -> Expr {
    if raw.is_empty() {
        return Expr::Literal(String::new());
    }

    if let Some(split) = raw.find('?') {
        let condition = raw[..split].trim_end().to_string();
        let rest = &raw[split + 1..];
        let (then, otherwise) = match rest.find(':') {
            Some(colon) => (
                rest[..colon].to_string(),
                Some(rest[colon + 1..].to_string()),
            ),
            None => (rest.to_string(), None),
        };
        return Expr::Ternary {
            condition,
            then,
            otherwise,
        };
    }

    if let Ok(("", expr)) = variable(raw) {
        return expr;
    }
    if let Ok(("", expr)) = function_call(raw) {
        return expr;
    }
    if is_constant_token(raw) {
        return Expr::Constant(raw.to_string());
    }
    if let Some(split) = default_value_split(raw) {
        return Expr::DefaultValue {
            left: raw[..split].to_string(),
            right: raw[split + 2..].to_string(),
        };
    }

    Expr::Literal(raw.to_string())
}

// --- Combinators ---

/// Variable, attribute and method names: `[A-Za-z0-9_-]+`.
fn identifier(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-').parse(input)
}

fn variable(input: &str) -> IResult<&str, Expr> {
    map(
        pair(
            pair(char('$'), opt(char('$'))),
            pair(
                identifier,
                opt(preceded(char('.'), pair(identifier, opt(tag("()"))))),
            ),
        ),
        |((_, no_escape), (name, access))| Expr::Variable {
            name: name.to_string(),
            access: access.map(|(member, parens)| match parens {
                Some(_) => Access::Method(member.to_string()),
                None => Access::Attribute(member.to_string()),
            }),
            escape: no_escape.is_none(),
        },
    )
    .parse(input)
}

/// `name` or `name::name`.
fn callee(input: &str) -> IResult<&str, &str> {
    recognize(pair(identifier, opt(preceded(tag("::"), identifier)))).parse(input)
}

fn function_call(input: &str) -> IResult<&str, Expr> {
    let (rest, name) = callee(input)?;
    let (rest, _) = char('(').parse(rest)?;
    match rest.strip_suffix(')') {
        Some(argument) if !argument.is_empty() => Ok((
            "",
            Expr::Call {
                callee: name.to_string(),
                argument: argument.to_string(),
            },
        )),
        _ => Err(nom::Err::Error(nom::error::Error::new(
            rest,
            nom::error::ErrorKind::Verify,
        ))),
    }
}

fn is_constant_token(raw: &str) -> bool {
    !raw.is_empty()
        && raw
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'_')
}

/// Position of the first `||` after the opening character, so that a leading
/// `||` is never read as the operator.
fn default_value_split(raw: &str) -> Option<usize> {
    let first = raw.chars().next()?;
    let start = first.len_utf8();
    raw[start..].find("||").map(|offset| offset + start)
}
