use std::path::PathBuf;

use itertools::Itertools;
use stencil_expr::ExprError;
use stencil_tree::TreeError;
use thiserror::Error;

/// Errors raised while locating, parsing or rendering a template.
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("could not find template file \"{name}\", looked in folders:\n{}", .searched.iter().map(|p| p.display().to_string()).join("\n"))]
    NotFound {
        name: String,
        searched: Vec<PathBuf>,
    },

    #[error("no such include directory: {}", .0.display())]
    MissingRoot(PathBuf),

    #[error("parse error in {file}, line {line}: {message}")]
    Parse {
        file: String,
        line: usize,
        message: String,
    },

    #[error(transparent)]
    Expression(#[from] ExprError),

    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
