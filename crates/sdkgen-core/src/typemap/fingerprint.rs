use std::collections::HashMap;
use std::collections::hash_map::Entry;

use serde::{Deserialize, Serialize};

use crate::ir::{ObjectShape, SchemaRecord, Shape};

/// What goes into an object's structural fingerprint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FingerprintMode {
    /// Sorted property names only. Objects that share names but differ in
    /// property types fold onto the same schema.
    #[default]
    #[serde(rename = "names")]
    PropertyNames,
    /// Sorted `name:signature` pairs.
    Typed,
}

const SEPARATOR: char = '\u{1f}';

/// Canonical key for an object shape. Objects without properties have none
/// and never fold.
pub fn fingerprint(object: &ObjectShape, mode: FingerprintMode) -> Option<String> {
    if object.properties.is_empty() {
        return None;
    }
    let mut members: Vec<String> = match mode {
        FingerprintMode::PropertyNames => object.properties.keys().cloned().collect(),
        FingerprintMode::Typed => object
            .properties
            .iter()
            .map(|(name, shape)| format!("{name}:{}", shape.signature()))
            .collect(),
    };
    members.sort();
    Some(members.join(&SEPARATOR.to_string()))
}

/// Fingerprint → schema name, built once from the named schemas of a run.
#[derive(Debug, Clone, Default)]
pub struct FingerprintIndex {
    mode: FingerprintMode,
    by_fingerprint: HashMap<String, String>,
}

impl FingerprintIndex {
    /// Index every named object schema. When two schemas share a
    /// fingerprint the one declared first keeps it.
    pub fn build(schemas: &[SchemaRecord], mode: FingerprintMode) -> Self {
        let mut by_fingerprint = HashMap::new();
        for record in schemas {
            let Shape::Object(object) = &record.shape else {
                continue;
            };
            let Some(key) = fingerprint(object, mode) else {
                continue;
            };
            match by_fingerprint.entry(key) {
                Entry::Vacant(slot) => {
                    slot.insert(record.name.clone());
                }
                Entry::Occupied(existing) => {
                    log::warn!(
                        "schemas `{}` and `{}` have the same structure; inline objects will fold onto `{}`",
                        existing.get(),
                        record.name,
                        existing.get()
                    );
                }
            }
        }
        Self {
            mode,
            by_fingerprint,
        }
    }

    pub fn mode(&self) -> FingerprintMode {
        self.mode
    }

    pub fn lookup(&self, object: &ObjectShape) -> Option<&str> {
        let key = fingerprint(object, self.mode)?;
        self.by_fingerprint.get(&key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_fingerprint.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_fingerprint.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(props: &[(&str, Shape)]) -> ObjectShape {
        ObjectShape {
            properties: props
                .iter()
                .map(|(n, s)| (n.to_string(), s.clone()))
                .collect(),
            ..Default::default()
        }
    }

    fn record(name: &str, shape: ObjectShape) -> SchemaRecord {
        SchemaRecord {
            name: name.into(),
            original_name: name.into(),
            description: None,
            shape: Shape::Object(shape),
        }
    }

    #[test]
    fn test_names_mode_ignores_types() {
        let a = object(&[("id", Shape::plain_string())]);
        let b = object(&[("id", Shape::Integer { format: None })]);
        assert_eq!(
            fingerprint(&a, FingerprintMode::PropertyNames),
            fingerprint(&b, FingerprintMode::PropertyNames)
        );
        assert_ne!(
            fingerprint(&a, FingerprintMode::Typed),
            fingerprint(&b, FingerprintMode::Typed)
        );
    }

    #[test]
    fn test_empty_object_has_no_fingerprint() {
        assert_eq!(fingerprint(&ObjectShape::default(), FingerprintMode::Typed), None);
    }

    #[test]
    fn test_first_declaration_wins() {
        let shape = object(&[("a", Shape::Boolean), ("b", Shape::Boolean)]);
        let index = FingerprintIndex::build(
            &[record("First", shape.clone()), record("Second", shape.clone())],
            FingerprintMode::PropertyNames,
        );
        assert_eq!(index.len(), 1);
        assert_eq!(index.lookup(&shape), Some("First"));
    }
}
