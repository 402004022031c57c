use serde::Deserialize;

use super::reference::RefOr;
use super::schema::SchemaOrRef;

/// Where a parameter travels. Only path and query parameters reach the
/// generated clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Query,
    Header,
    Path,
    Cookie,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    pub description: Option<String>,
    #[serde(default)]
    pub required: bool,
    pub schema: Option<SchemaOrRef>,
}

pub type ParameterOrRef = RefOr<Parameter>;
