use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::ir::ExtractedApi;

/// Default mapping file name.
pub const MAPPING_FILE_NAME: &str = "sdkgen.mapping.json";

/// User-editable renames and service groupings, keyed by extracted
/// (original) identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingTable {
    #[serde(default)]
    pub operations: IndexMap<String, OperationMapping>,
    #[serde(default)]
    pub schemas: IndexMap<String, String>,
}

/// Mapping for one operation: a new method name, or a method inside a
/// named service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OperationMapping {
    Method(String),
    Service { service: String, method: String },
}

impl OperationMapping {
    pub fn method(&self) -> &str {
        match self {
            OperationMapping::Method(method) => method,
            OperationMapping::Service { method, .. } => method,
        }
    }

    pub fn service(&self) -> Option<&str> {
        match self {
            OperationMapping::Method(_) => None,
            OperationMapping::Service { service, .. } => Some(service),
        }
    }
}

/// Whether a run has a mapping table to apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingState {
    /// No file yet. The run writes an identity table and stops.
    Missing,
    Present(MappingTable),
}

impl MappingTable {
    /// A table mapping every discovered operation and schema to itself.
    pub fn identity(api: &ExtractedApi) -> Self {
        Self {
            operations: api
                .operations
                .iter()
                .map(|op| {
                    (
                        op.original_id.clone(),
                        OperationMapping::Method(op.original_id.clone()),
                    )
                })
                .collect(),
            schemas: api
                .schemas
                .iter()
                .map(|s| (s.original_name.clone(), s.original_name.clone()))
                .collect(),
        }
    }

    pub fn operation(&self, original_id: &str) -> Option<&OperationMapping> {
        self.operations.get(original_id)
    }

    pub fn schema(&self, original_name: &str) -> Option<&str> {
        self.schemas.get(original_name).map(String::as_str)
    }

    /// Pretty-printed JSON, as written to the mapping file.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }
}

/// Load the mapping file at `path`.
///
/// A missing file is [`MappingState::Missing`]. A file that cannot be read
/// or parsed is treated as an empty table, with a warning.
pub fn load_mapping(path: &Path) -> MappingState {
    if !path.exists() {
        return MappingState::Missing;
    }
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            log::warn!(
                "could not read mapping file {}: {e}; using an empty table",
                path.display()
            );
            return MappingState::Present(MappingTable::default());
        }
    };
    match serde_json::from_str(&content) {
        Ok(table) => MappingState::Present(table),
        Err(e) => {
            log::warn!(
                "mapping file {} is malformed: {e}; using an empty table",
                path.display()
            );
            MappingState::Present(MappingTable::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_both_entry_forms() {
        let table: MappingTable = serde_json::from_str(
            r#"{
                "operations": {
                    "getUsersById": "fetchUser",
                    "listPets": {"service": "pets", "method": "list"}
                },
                "schemas": {"Pet": "Animal"}
            }"#,
        )
        .unwrap();
        assert_eq!(table.operation("getUsersById").unwrap().method(), "fetchUser");
        assert_eq!(table.operation("getUsersById").unwrap().service(), None);
        assert_eq!(table.operation("listPets").unwrap().service(), Some("pets"));
        assert_eq!(table.schema("Pet"), Some("Animal"));
    }

    #[test]
    fn test_missing_sections_default() {
        let table: MappingTable = serde_json::from_str("{}").unwrap();
        assert!(table.operations.is_empty());
        assert!(table.schemas.is_empty());
    }

    #[test]
    fn test_to_json_round_trips() {
        let mut table = MappingTable::default();
        table.operations.insert(
            "a".into(),
            OperationMapping::Service {
                service: "s".into(),
                method: "m".into(),
            },
        );
        let json = table.to_json().unwrap();
        assert!(json.contains("\"service\": \"s\""));
        assert_eq!(serde_json::from_str::<MappingTable>(&json).unwrap(), table);
    }
}
