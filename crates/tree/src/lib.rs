//! A hierarchical key/value store with named, repeatable child nodes.
//!
//! This crate provides the data model shared by the template parser and
//! renderer: a [`Tree`] of named nodes whose variables are resolved through
//! scope-chained lookup, and the [`Value`] type those variables hold. The
//! [`ObjectValue`] trait lets record-like application types expose attributes
//! and zero-argument methods to template expressions.

mod node;
mod value;

pub use node::{NodeId, NodeMut, Tree, TreeError};
pub use value::{ObjectValue, Value};
