use crate::ir::{SchemaRecord, Shape};

use super::fingerprint::{FingerprintIndex, FingerprintMode};
use super::{TypeExpr, TypeRenderer};

/// Maps shapes to type expressions for one run.
///
/// The fingerprint index is built from the run's (already renamed) schema
/// records at construction and never changes afterwards.
#[derive(Debug, Clone)]
pub struct TypeMapper {
    index: FingerprintIndex,
}

/// How a named schema is declared in generated code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    /// A record type with named fields.
    Object {
        fields: Vec<Field>,
        /// Value type of extra keys when `additionalProperties` is declared.
        additional: Option<TypeExpr>,
    },
    /// A string literal union.
    Enum(Vec<String>),
    /// Any other shape, declared as a type alias.
    Alias(TypeExpr),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Property name on the wire.
    pub name: String,
    pub ty: TypeExpr,
    pub required: bool,
}

impl TypeMapper {
    pub fn new(schemas: &[SchemaRecord], mode: FingerprintMode) -> Self {
        let index = FingerprintIndex::build(schemas, mode);
        log::debug!("fingerprint index holds {} object schemas", index.len());
        Self { index }
    }

    pub fn mode(&self) -> FingerprintMode {
        self.index.mode()
    }

    pub fn map_shape(&self, shape: &Shape) -> TypeExpr {
        match shape {
            Shape::String { enum_values, .. } if enum_values.is_empty() => TypeExpr::String,
            Shape::String { enum_values, .. } => TypeExpr::StringEnum(enum_values.clone()),
            Shape::Integer { .. } => TypeExpr::Integer,
            Shape::Number { .. } => TypeExpr::Number,
            Shape::Boolean => TypeExpr::Boolean,
            Shape::Array(item) => TypeExpr::Array(Box::new(self.map_shape(item))),
            Shape::Object(object) => {
                if let Some(name) = self.index.lookup(object) {
                    log::debug!("folded inline object onto `{name}`");
                    return TypeExpr::Named(name.to_string());
                }
                match &object.additional_properties {
                    Some(value) => TypeExpr::Map(Box::new(self.map_shape(value))),
                    None => TypeExpr::OpenObject,
                }
            }
            Shape::Reference(name) => TypeExpr::Named(name.clone()),
            Shape::Unknown => TypeExpr::Unknown,
        }
    }

    /// Map and print a shape in one step.
    pub fn map_shape_to<R: TypeRenderer + ?Sized>(&self, shape: &Shape, target: &R) -> String {
        target.render(&self.map_shape(shape))
    }

    /// Decide how a named schema is declared. Field types go through
    /// [`map_shape`](Self::map_shape), so inline objects inside a named
    /// schema fold like any other.
    pub fn declare(&self, record: &SchemaRecord) -> Declaration {
        match &record.shape {
            Shape::Object(object) if !object.properties.is_empty() => Declaration::Object {
                fields: object
                    .properties
                    .iter()
                    .map(|(name, shape)| Field {
                        name: name.clone(),
                        ty: self.map_shape(shape),
                        required: object.required.contains(name),
                    })
                    .collect(),
                additional: object
                    .additional_properties
                    .as_deref()
                    .map(|value| self.map_shape(value)),
            },
            Shape::String { enum_values, .. } if !enum_values.is_empty() => {
                Declaration::Enum(enum_values.clone())
            }
            other => Declaration::Alias(self.map_shape(other)),
        }
    }
}
