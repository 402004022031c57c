use indexmap::IndexMap;

use crate::ir::{Shape, Streaming, StreamingKind};
use crate::parse::media_type::{APPLICATION_JSON, APPLICATION_NDJSON, MediaType, TEXT_EVENT_STREAM};
use crate::parse::response::{Response, ResponseOrRef};
use crate::parse::schema::SchemaOrRef;

use super::shape_resolver::ShapeResolver;

/// Successful statuses, in the order they are consulted.
const SUCCESS_STATUSES: [&str; 5] = ["200", "201", "202", "203", "204"];

/// Response shape and streaming classification of one operation.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseInfo {
    pub shape: Option<Shape>,
    pub streaming: Option<Streaming>,
}

/// Classify an operation's responses.
///
/// The shape comes from the first successful status whose content declares
/// JSON, event-stream or NDJSON (JSON preferred within a status). Streaming
/// is decided separately: any successful event-stream wins over any
/// successful NDJSON.
pub fn detect_response(
    operation_id: &str,
    responses: &IndexMap<String, ResponseOrRef>,
    resolver: &ShapeResolver<'_>,
) -> ResponseInfo {
    let successes: Vec<&Response> = SUCCESS_STATUSES
        .iter()
        .filter_map(|status| match responses.get(*status)? {
            ResponseOrRef::Inline(r) => Some(r),
            ResponseOrRef::Ref { ref_path } => {
                log::warn!("{operation_id}: unresolved response {ref_path}, ignoring");
                None
            }
        })
        .collect();

    let shape = successes.iter().find_map(|r| {
        if let Some(json) = r.media(APPLICATION_JSON) {
            return Some(body_shape(json.schema.as_ref(), resolver));
        }
        r.media(TEXT_EVENT_STREAM)
            .or_else(|| r.media(APPLICATION_NDJSON))
            .map(|stream| body_shape(stream.stream_item_schema(), resolver))
    });

    let streaming = find_stream(&successes, TEXT_EVENT_STREAM)
        .map(|mt| (StreamingKind::Sse, mt))
        .or_else(|| find_stream(&successes, APPLICATION_NDJSON).map(|mt| (StreamingKind::Ndjson, mt)))
        .map(|(kind, mt)| Streaming {
            kind,
            item: body_shape(mt.stream_item_schema(), resolver),
        });

    if let Some(s) = &streaming {
        log::debug!("{operation_id}: streaming ({})", s.kind.as_str());
    }

    ResponseInfo { shape, streaming }
}

fn find_stream<'r>(successes: &[&'r Response], media: &str) -> Option<&'r MediaType> {
    successes.iter().copied().find_map(|r| r.media(media))
}

fn body_shape(schema: Option<&SchemaOrRef>, resolver: &ShapeResolver<'_>) -> Shape {
    schema.map_or(Shape::Unknown, |s| resolver.shape_of(s))
}
