use indexmap::IndexMap;
use serde::Serialize;

use crate::error::MappingError;
use crate::ir::OperationRecord;

use super::rename::checked_identifier;
use super::table::MappingTable;

/// Group that receives every operation without a service mapping.
pub const DEFAULT_SERVICE: &str = "default";

/// Operations partitioned by service, groups in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct GroupedOperations {
    groups: IndexMap<String, Vec<OperationRecord>>,
}

impl GroupedOperations {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[OperationRecord])> {
        self.groups
            .iter()
            .map(|(name, ops)| (name.as_str(), ops.as_slice()))
    }

    pub fn get(&self, service: &str) -> Option<&[OperationRecord]> {
        self.groups.get(service).map(Vec::as_slice)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of operations across all groups.
    pub fn operation_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }
}

/// Partition `operations` by the `service` of their mapping entry.
///
/// Every operation lands in exactly one group and keeps its relative order.
/// Two operations with the same method name in one group are rejected.
pub fn group_by_service(
    operations: &[OperationRecord],
    table: &MappingTable,
) -> Result<GroupedOperations, MappingError> {
    let mut groups: IndexMap<String, Vec<OperationRecord>> = IndexMap::new();

    for op in operations {
        let service = match table.operation(&op.original_id).and_then(|m| m.service()) {
            Some(service) => checked_identifier(&op.original_id, service)?,
            None => DEFAULT_SERVICE.to_string(),
        };
        let members = groups.entry(service.clone()).or_default();
        if let Some(existing) = members.iter().find(|other| other.id == op.id) {
            return Err(MappingError::DuplicateMethod {
                service,
                method: op.id.clone(),
                first: existing.original_id.clone(),
                second: op.original_id.clone(),
            });
        }
        members.push(op.clone());
    }

    Ok(GroupedOperations { groups })
}
