use std::fmt;

use serde::Serialize;

use super::operations::OperationRecord;
use super::shape::Shape;

/// Everything the extractor pulls out of one document.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractedApi {
    pub info: ApiInfo,
    /// First server URL, with variables replaced by their defaults.
    pub base_url: Option<String>,
    pub operations: Vec<OperationRecord>,
    pub schemas: Vec<SchemaRecord>,
}

/// API metadata.
#[derive(Debug, Clone, Serialize)]
pub struct ApiInfo {
    pub title: String,
    pub description: Option<String>,
    pub version: String,
}

/// A named component schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaRecord {
    /// Name after remapping.
    pub name: String,
    /// Name as declared under `components.schemas`; mapping lookups use this.
    pub original_name: String,
    pub description: Option<String>,
    pub shape: Shape,
}

/// A name with multiple casing variants pre-computed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct NormalizedName {
    pub original: String,
    pub pascal_case: String,
    pub camel_case: String,
    pub snake_case: String,
    pub screaming_snake: String,
}

impl fmt::Display for NormalizedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.original)
    }
}
