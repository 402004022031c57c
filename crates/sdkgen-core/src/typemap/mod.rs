//! Shape → per-language type expressions.
//!
//! [`TypeMapper`] turns a [`Shape`](crate::ir::Shape) into a
//! language-neutral [`TypeExpr`]; each target supplies a [`TypeRenderer`]
//! that prints a `TypeExpr` in its own syntax.

pub mod fingerprint;
pub mod mapper;

use indexmap::IndexSet;

pub use fingerprint::{FingerprintIndex, FingerprintMode};
pub use mapper::{Declaration, Field, TypeMapper};

/// Language-neutral type expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    String,
    StringEnum(Vec<String>),
    Integer,
    Number,
    Boolean,
    Array(Box<TypeExpr>),
    /// A declared schema, by its post-remapping name.
    Named(String),
    /// String-keyed map with typed values.
    Map(Box<TypeExpr>),
    /// Object of unknown structure.
    OpenObject,
    Unknown,
}

impl TypeExpr {
    /// Named types mentioned by this expression, in first-seen order.
    pub fn collect_named(&self, out: &mut IndexSet<String>) {
        match self {
            TypeExpr::Named(name) => {
                out.insert(name.clone());
            }
            TypeExpr::Array(inner) | TypeExpr::Map(inner) => inner.collect_named(out),
            TypeExpr::String
            | TypeExpr::StringEnum(_)
            | TypeExpr::Integer
            | TypeExpr::Number
            | TypeExpr::Boolean
            | TypeExpr::OpenObject
            | TypeExpr::Unknown => {}
        }
    }
}

/// Prints a [`TypeExpr`] in one target language's syntax.
pub trait TypeRenderer {
    fn render(&self, expr: &TypeExpr) -> String;
}
