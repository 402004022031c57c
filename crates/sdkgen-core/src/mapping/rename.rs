use std::collections::{HashMap, HashSet};

use crate::error::MappingError;
use crate::ir::{OperationRecord, SchemaRecord};
use crate::transform::name_normalizer::{sanitize_identifier, unique_id};

use super::table::MappingTable;

/// Apply schema and operation renames from `table`.
///
/// Lookups always use `original_name` / `original_id`, and every
/// `Reference` is rewritten from the record's current name, so applying the
/// same table twice gives the same result as applying it once.
pub fn apply_mappings(
    operations: &[OperationRecord],
    schemas: &[SchemaRecord],
    table: &MappingTable,
) -> Result<(Vec<OperationRecord>, Vec<SchemaRecord>), MappingError> {
    let mut renames: HashMap<&str, String> = HashMap::with_capacity(schemas.len());
    let mut claimed: HashMap<String, &str> = HashMap::with_capacity(schemas.len());

    // Names chosen in the table are checked strictly. Unchanged names are
    // repaired, and two of them that sanitize alike get a numeric suffix.
    for schema in schemas {
        let original = schema.original_name.as_str();
        let Some(target) = table.schema(original).filter(|t| *t != original) else {
            continue;
        };
        let name = checked_identifier(original, target)?;
        if let Some(first) = claimed.insert(name.clone(), original) {
            return Err(MappingError::DuplicateSchema {
                name,
                first: first.to_string(),
                second: original.to_string(),
            });
        }
        renames.insert(schema.name.as_str(), name);
    }
    let mut used: HashSet<String> = claimed.keys().cloned().collect();
    for schema in schemas {
        if renames.contains_key(schema.name.as_str()) {
            continue;
        }
        let original = schema.original_name.as_str();
        let base = repaired_identifier(original, "Schema");
        if let Some(first) = claimed.get(&base) {
            return Err(MappingError::DuplicateSchema {
                name: base,
                first: first.to_string(),
                second: original.to_string(),
            });
        }
        renames.insert(schema.name.as_str(), unique_id(base, &mut used));
    }
    let rename = |name: &str| renames.get(name).cloned();

    let renamed_schemas = schemas
        .iter()
        .map(|schema| {
            let mut renamed = schema.clone();
            if let Some(name) = rename(&schema.name) {
                renamed.name = name;
            }
            renamed.shape.rename_references(&rename);
            renamed
        })
        .collect();

    let mut used_ids = HashSet::new();
    let renamed_operations = operations
        .iter()
        .map(|op| {
            let original = op.original_id.as_str();
            let mut renamed = op.clone();
            renamed.id = match table.operation(original).map(|m| m.method()) {
                Some(method) if method != original => checked_identifier(original, method)?,
                _ => unique_id(repaired_identifier(original, "op"), &mut used_ids),
            };
            for shape in renamed.shapes_mut() {
                shape.rename_references(&rename);
            }
            Ok(renamed)
        })
        .collect::<Result<Vec<_>, MappingError>>()?;

    Ok((renamed_operations, renamed_schemas))
}

/// Sanitize a name nobody chose explicitly. An empty result becomes
/// `prefix`, and a leading digit gets `prefix` in front.
fn repaired_identifier(value: &str, prefix: &str) -> String {
    let sanitized = sanitize_identifier(value);
    match sanitized.chars().next() {
        None => prefix.to_string(),
        Some(c) if c.is_ascii_digit() => format!("{prefix}{sanitized}"),
        Some(_) => sanitized,
    }
}

/// Sanitize `value` and reject results that cannot be an identifier,
/// reporting `original` as the offending entry.
pub fn checked_identifier(original: &str, value: &str) -> Result<String, MappingError> {
    let sanitized = sanitize_identifier(value);
    match sanitized.chars().next() {
        None => Err(MappingError::EmptyIdentifier {
            original: original.to_string(),
            value: value.to_string(),
        }),
        Some(c) if c.is_ascii_digit() => Err(MappingError::InvalidIdentifier {
            original: original.to_string(),
            value: value.to_string(),
        }),
        Some(_) => Ok(sanitized),
    }
}
