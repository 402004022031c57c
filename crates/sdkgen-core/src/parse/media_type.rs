use indexmap::IndexMap;
use serde::Deserialize;

use super::schema::SchemaOrRef;

pub const APPLICATION_JSON: &str = "application/json";
pub const TEXT_EVENT_STREAM: &str = "text/event-stream";
pub const APPLICATION_NDJSON: &str = "application/x-ndjson";

/// One entry of a `content` map.
///
/// `item_schema` (OpenAPI 3.2 `itemSchema`) describes a single element of a
/// streamed body; older documents put the element schema under `schema`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaType {
    pub schema: Option<SchemaOrRef>,
    pub item_schema: Option<SchemaOrRef>,
}

impl MediaType {
    pub fn stream_item_schema(&self) -> Option<&SchemaOrRef> {
        self.item_schema.as_ref().or(self.schema.as_ref())
    }
}

/// Whether a content-type key names `expected`, ignoring parameters
/// (`application/json; charset=utf-8`) and ASCII case.
pub fn is_media_type(content_type: &str, expected: &str) -> bool {
    content_type
        .split(';')
        .next()
        .map(str::trim)
        .is_some_and(|essence| essence.eq_ignore_ascii_case(expected))
}

/// First entry of `content` whose key names `expected`.
pub fn find_media<'c>(
    content: &'c IndexMap<String, MediaType>,
    expected: &str,
) -> Option<&'c MediaType> {
    content
        .iter()
        .find_map(|(key, media)| is_media_type(key, expected).then_some(media))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_with_parameters() {
        assert!(is_media_type("application/json; charset=utf-8", APPLICATION_JSON));
        assert!(is_media_type("Application/JSON", APPLICATION_JSON));
        assert!(!is_media_type("application/problem+json", APPLICATION_JSON));
        assert!(is_media_type("text/event-stream", TEXT_EVENT_STREAM));
    }

    #[test]
    fn test_find_media_keeps_document_order() {
        let content: IndexMap<String, MediaType> = serde_yaml_ng::from_str(
            "application/xml: {}\napplication/json; charset=utf-8: { schema: { type: string } }\napplication/json: {}\n",
        )
        .unwrap();
        let media = find_media(&content, APPLICATION_JSON).unwrap();
        assert!(media.schema.is_some());
        assert!(find_media(&content, APPLICATION_NDJSON).is_none());
    }

    #[test]
    fn test_item_schema_preferred_for_streams() {
        let media: MediaType = serde_yaml_ng::from_str(
            "schema: { type: string }\nitemSchema: { $ref: \"#/components/schemas/Chunk\" }\n",
        )
        .unwrap();
        assert!(media.stream_item_schema().unwrap().ref_path().is_some());
    }
}
