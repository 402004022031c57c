use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

/// Structural representation of one schema fragment.
///
/// Every construct the extractor cannot classify becomes [`Shape::Unknown`]
/// rather than an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    String {
        #[serde(skip_serializing_if = "Vec::is_empty")]
        enum_values: Vec<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        format: Option<String>,
    },
    Integer {
        #[serde(skip_serializing_if = "Option::is_none")]
        format: Option<String>,
    },
    Number {
        #[serde(skip_serializing_if = "Option::is_none")]
        format: Option<String>,
    },
    Boolean,
    Array(Box<Shape>),
    Object(ObjectShape),
    /// A `#/components/schemas/<name>` reference, by current schema name.
    Reference(String),
    Unknown,
}

/// Properties of an object shape, in declaration order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ObjectShape {
    pub properties: IndexMap<String, Shape>,
    pub required: IndexSet<String>,
    /// `Some(Unknown)` for `additionalProperties: true`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<Box<Shape>>,
}

impl Shape {
    pub fn plain_string() -> Self {
        Shape::String {
            enum_values: Vec::new(),
            format: None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectShape> {
        match self {
            Shape::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Rewrite every `Reference` in this shape through `rename`. Names for
    /// which `rename` returns `None` are left alone.
    pub fn rename_references<F>(&mut self, rename: &F)
    where
        F: Fn(&str) -> Option<String>,
    {
        match self {
            Shape::Reference(name) => {
                if let Some(new_name) = rename(name) {
                    *name = new_name;
                }
            }
            Shape::Array(inner) => inner.rename_references(rename),
            Shape::Object(obj) => {
                for prop in obj.properties.values_mut() {
                    prop.rename_references(rename);
                }
                if let Some(extra) = obj.additional_properties.as_mut() {
                    extra.rename_references(rename);
                }
            }
            Shape::String { .. }
            | Shape::Integer { .. }
            | Shape::Number { .. }
            | Shape::Boolean
            | Shape::Unknown => {}
        }
    }

    /// Names of all schemas referenced from this shape, in first-seen order.
    pub fn collect_references(&self, out: &mut IndexSet<String>) {
        match self {
            Shape::Reference(name) => {
                out.insert(name.clone());
            }
            Shape::Array(inner) => inner.collect_references(out),
            Shape::Object(obj) => {
                for prop in obj.properties.values() {
                    prop.collect_references(out);
                }
                if let Some(extra) = &obj.additional_properties {
                    extra.collect_references(out);
                }
            }
            Shape::String { .. }
            | Shape::Integer { .. }
            | Shape::Number { .. }
            | Shape::Boolean
            | Shape::Unknown => {}
        }
    }

    /// Compact structural signature, used by typed fingerprints. Object
    /// members are sorted so that declaration order does not matter.
    pub fn signature(&self) -> String {
        match self {
            Shape::String { enum_values, .. } if enum_values.is_empty() => "string".to_string(),
            Shape::String { enum_values, .. } => {
                let mut values = enum_values.clone();
                values.sort();
                format!("enum({})", values.join("|"))
            }
            Shape::Integer { .. } => "integer".to_string(),
            Shape::Number { .. } => "number".to_string(),
            Shape::Boolean => "boolean".to_string(),
            Shape::Array(inner) => format!("array<{}>", inner.signature()),
            Shape::Object(obj) => {
                let mut members: Vec<String> = obj
                    .properties
                    .iter()
                    .map(|(name, shape)| format!("{name}:{}", shape.signature()))
                    .collect();
                members.sort();
                match &obj.additional_properties {
                    Some(extra) => format!("object{{{}|*:{}}}", members.join(","), extra.signature()),
                    None => format!("object{{{}}}", members.join(",")),
                }
            }
            Shape::Reference(name) => format!("ref:{name}"),
            Shape::Unknown => "unknown".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(props: &[(&str, Shape)]) -> Shape {
        Shape::Object(ObjectShape {
            properties: props
                .iter()
                .map(|(name, shape)| (name.to_string(), shape.clone()))
                .collect(),
            ..Default::default()
        })
    }

    #[test]
    fn test_rename_references_reaches_nested_shapes() {
        let mut shape = object(&[
            ("pet", Shape::Reference("Pet".into())),
            (
                "tags",
                Shape::Array(Box::new(Shape::Reference("Tag".into()))),
            ),
        ]);
        shape.rename_references(&|name| (name == "Pet").then(|| "Animal".to_string()));

        let mut refs = IndexSet::new();
        shape.collect_references(&mut refs);
        assert_eq!(refs.into_iter().collect::<Vec<_>>(), ["Animal", "Tag"]);
    }

    #[test]
    fn test_signature_ignores_property_order() {
        let a = object(&[("id", Shape::Integer { format: None }), ("name", Shape::plain_string())]);
        let b = object(&[("name", Shape::plain_string()), ("id", Shape::Integer { format: None })]);
        assert_eq!(a.signature(), b.signature());
        assert_eq!(a.signature(), "object{id:integer,name:string}");
    }
}
