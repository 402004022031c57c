use std::fmt;

use serde::Serialize;

use super::shape::Shape;

/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Head,
    Trace,
}

impl HttpMethod {
    /// Extraction order within a path item.
    pub const ALL: [HttpMethod; 8] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Patch,
        HttpMethod::Options,
        HttpMethod::Head,
        HttpMethod::Trace,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
            HttpMethod::Trace => "TRACE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One endpoint/method pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationRecord {
    /// Identifier after remapping; becomes the client method name.
    pub id: String,
    /// Identifier as extracted (document `operationId` or route-derived,
    /// made unique). Mapping lookups and service grouping use this.
    pub original_id: String,
    pub method: HttpMethod,
    pub path: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub deprecated: bool,
    pub path_params: Vec<Parameter>,
    pub query_params: Vec<Parameter>,
    pub request_body: Option<RequestBody>,
    /// `None` when no successful status declares a supported body.
    pub response: Option<Shape>,
    pub streaming: Option<Streaming>,
}

/// A path or query parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    pub name: String,
    pub required: bool,
    pub shape: Shape,
    pub description: Option<String>,
}

/// A JSON request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestBody {
    pub required: bool,
    pub shape: Shape,
}

/// Streaming response details.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Streaming {
    pub kind: StreamingKind,
    /// Shape of one element of the stream.
    pub item: Shape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamingKind {
    /// `text/event-stream`
    Sse,
    /// `application/x-ndjson`
    Ndjson,
}

impl StreamingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamingKind::Sse => "sse",
            StreamingKind::Ndjson => "ndjson",
        }
    }
}

impl OperationRecord {
    pub fn is_streaming(&self) -> bool {
        self.streaming.is_some()
    }

    /// Every shape the operation carries, for reference rewriting.
    pub fn shapes_mut(&mut self) -> impl Iterator<Item = &mut Shape> {
        self.path_params
            .iter_mut()
            .chain(self.query_params.iter_mut())
            .map(|p| &mut p.shape)
            .chain(self.request_body.iter_mut().map(|b| &mut b.shape))
            .chain(self.response.iter_mut())
            .chain(self.streaming.iter_mut().map(|s| &mut s.item))
    }
}
