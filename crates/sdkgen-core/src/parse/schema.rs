use indexmap::IndexMap;
use serde::Deserialize;

use super::reference::RefOr;

/// A JSON Schema `type` keyword value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
    Null,
}

/// `type` is one keyword in 3.0 and may be a list in 3.1.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TypeSet {
    Single(SchemaType),
    Multiple(Vec<SchemaType>),
}

impl TypeSet {
    /// The declared type once `null` is dropped, if exactly one remains.
    pub fn non_null(&self) -> Option<SchemaType> {
        match self {
            TypeSet::Single(SchemaType::Null) => None,
            TypeSet::Single(t) => Some(*t),
            TypeSet::Multiple(types) => {
                let mut rest = types.iter().filter(|t| **t != SchemaType::Null);
                match (rest.next(), rest.next()) {
                    (Some(t), None) => Some(*t),
                    _ => None,
                }
            }
        }
    }
}

pub type SchemaOrRef = RefOr<Box<Schema>>;

/// The JSON Schema keywords that shape a client type. Everything else
/// (validation bounds, examples, titles) is ignored.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    #[serde(rename = "type")]
    pub schema_type: Option<TypeSet>,
    pub format: Option<String>,
    pub description: Option<String>,

    #[serde(default)]
    pub properties: IndexMap<String, SchemaOrRef>,
    #[serde(default)]
    pub required: Vec<String>,
    pub additional_properties: Option<AdditionalProperties>,

    pub items: Option<Box<SchemaOrRef>>,

    #[serde(default)]
    pub all_of: Vec<SchemaOrRef>,
    #[serde(default)]
    pub one_of: Vec<SchemaOrRef>,
    #[serde(default)]
    pub any_of: Vec<SchemaOrRef>,

    #[serde(rename = "enum", default)]
    pub enum_values: Vec<serde_json::Value>,
    #[serde(rename = "const")]
    pub const_value: Option<serde_json::Value>,
}

impl Schema {
    /// A schema that only admits `null`: a 3.1 `type: null`, typically one
    /// arm of a nullable `oneOf`.
    pub fn is_null_only(&self) -> bool {
        matches!(self.schema_type, Some(TypeSet::Single(SchemaType::Null)))
            && self.properties.is_empty()
    }
}

/// `additionalProperties: true|false` or a value schema.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Bool(bool),
    Schema(Box<SchemaOrRef>),
}
