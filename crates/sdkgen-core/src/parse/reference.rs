use serde::Deserialize;

/// Either a `$ref` to a component or the object written inline.
///
/// Untagged, with `Ref` first: any object carrying `$ref` is a reference and
/// its sibling keys are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RefOr<T> {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    Inline(T),
}

impl<T> RefOr<T> {
    pub fn as_inline(&self) -> Option<&T> {
        match self {
            RefOr::Inline(value) => Some(value),
            RefOr::Ref { .. } => None,
        }
    }

    pub fn ref_path(&self) -> Option<&str> {
        match self {
            RefOr::Ref { ref_path } => Some(ref_path),
            RefOr::Inline(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Named {
        name: String,
    }

    #[test]
    fn test_ref_wins_over_siblings() {
        let value: RefOr<Named> = serde_json::from_str(
            r##"{"$ref": "#/components/parameters/Id", "name": "ignored"}"##,
        )
        .unwrap();
        assert_eq!(value.ref_path(), Some("#/components/parameters/Id"));
        assert!(value.as_inline().is_none());
    }

    #[test]
    fn test_inline_object() {
        let value: RefOr<Named> = serde_json::from_str(r#"{"name": "id"}"#).unwrap();
        assert_eq!(value.as_inline().map(|n| n.name.as_str()), Some("id"));
    }
}
