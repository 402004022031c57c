use minijinja::context;
use sdkgen_core::GeneratorError;
use sdkgen_core::ir::{OperationRecord, StreamingKind};
use sdkgen_core::render::{GenerationModel, GeneratorOptions, OperationView, operation_views};
use serde::Serialize;

use crate::type_mapper::{TsTypes, ts_ident, ts_key};

/// One client method, with the TypeScript-specific pieces precomputed.
#[derive(Debug, Serialize)]
pub struct MethodContext {
    #[serde(flatten)]
    pub view: OperationView,
    pub method_name: String,
    pub params_signature: String,
    /// Resolved value type, or element type for streaming methods.
    pub return_type: String,
    /// `RequestParts` literal passed to the transport.
    pub request_parts: String,
    /// Stream decoder to call, if the method streams.
    pub decoder: Option<&'static str>,
    pub accept: &'static str,
}

impl MethodContext {
    pub fn build(view: OperationView) -> Self {
        let (return_type, decoder, accept) = match &view.streaming {
            Some(s) => (
                s.item_type.clone(),
                Some(decoder_for(s.kind)),
                accept_for(s.kind),
            ),
            None => (
                view.response.ty.clone().unwrap_or_else(|| "void".to_string()),
                None,
                "application/json",
            ),
        };
        Self {
            method_name: ts_ident(&view.name.camel_case),
            params_signature: params_signature(&view),
            request_parts: request_parts(&view),
            return_type,
            decoder,
            accept,
            view,
        }
    }
}

fn decoder_for(kind: StreamingKind) -> &'static str {
    match kind {
        StreamingKind::Sse => "parseSse",
        StreamingKind::Ndjson => "parseNdjson",
    }
}

fn accept_for(kind: StreamingKind) -> &'static str {
    match kind {
        StreamingKind::Sse => "text/event-stream",
        StreamingKind::Ndjson => "application/x-ndjson",
    }
}

/// Path parameters, then a required body or query object, then the
/// optional ones, then `options`.
fn params_signature(view: &OperationView) -> String {
    let mut required_parts = Vec::new();
    let mut optional_parts = Vec::new();

    for param in &view.path_params {
        required_parts.push(format!("{}: {}", ts_ident(&param.ident.camel_case), param.ty));
    }

    if let Some(body) = &view.body {
        if body.required {
            required_parts.push(format!("body: {}", body.ty));
        } else {
            optional_parts.push(format!("body?: {}", body.ty));
        }
    }

    if !view.query_params.is_empty() {
        let fields: Vec<String> = view
            .query_params
            .iter()
            .map(|p| {
                let marker = if p.required { "" } else { "?" };
                format!("{}{marker}: {}", ts_key(&p.name), p.ty)
            })
            .collect();
        let object = format!("{{ {} }}", fields.join("; "));
        if view.has_required_query() {
            required_parts.push(format!("query: {object}"));
        } else {
            optional_parts.push(format!("query?: {object}"));
        }
    }

    optional_parts.push("options?: RequestOptions".to_string());

    let mut parts = required_parts;
    parts.extend(optional_parts);
    parts.join(", ")
}

fn request_parts(view: &OperationView) -> String {
    let mut parts = Vec::new();
    if !view.path_params.is_empty() {
        let pairs: Vec<String> = view
            .path_params
            .iter()
            .map(|p| format!("{}: {}", ts_key(&p.name), ts_ident(&p.ident.camel_case)))
            .collect();
        parts.push(format!("pathParams: {{ {} }}", pairs.join(", ")));
    }
    if !view.query_params.is_empty() {
        parts.push("query".to_string());
    }
    if view.body.is_some() {
        parts.push("body".to_string());
    }
    if parts.is_empty() {
        "{}".to_string()
    } else {
        format!("{{ {} }}", parts.join(", "))
    }
}

/// Method contexts for `ops`.
pub fn method_contexts(ops: &[OperationRecord], model: &GenerationModel) -> Vec<MethodContext> {
    operation_views(ops, &model.mapper, &TsTypes)
        .into_iter()
        .map(MethodContext::build)
        .collect()
}

/// Declared types the methods mention, sorted for stable imports.
pub fn imported_types<'a>(methods: impl IntoIterator<Item = &'a MethodContext>) -> Vec<String> {
    let mut types: Vec<String> = methods
        .into_iter()
        .flat_map(|m| m.view.named_types.iter().cloned())
        .collect();
    types.sort();
    types.dedup();
    types
}

/// Stream decoders the methods call, sorted.
pub fn imported_decoders<'a>(
    methods: impl IntoIterator<Item = &'a MethodContext>,
) -> Vec<&'static str> {
    let mut decoders: Vec<&'static str> = methods.into_iter().filter_map(|m| m.decoder).collect();
    decoders.sort_unstable();
    decoders.dedup();
    decoders
}

/// Emit `client.ts`: a single `ApiClient` class with one method per
/// operation.
pub fn emit_client(
    model: &GenerationModel,
    options: &GeneratorOptions,
) -> Result<String, GeneratorError> {
    let ops = model.flat_operations()?;
    let methods = method_contexts(ops, model);

    super::render(
        "client.ts.j2",
        context! {
            title => model.info.title.clone(),
            imported_types => imported_types(&methods),
            decoders => imported_decoders(&methods),
            operations => methods,
            no_docs => options.no_docs,
        },
    )
}
