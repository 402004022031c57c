use std::collections::HashSet;

use minijinja::context;
use sdkgen_core::GeneratorError;
use sdkgen_core::ir::{OperationRecord, StreamingKind};
use sdkgen_core::render::{
    GenerationModel, GeneratorOptions, OperationView, ParamView, operation_views,
};
use serde::Serialize;

use super::escape_docstring;
use crate::type_mapper::{PyTypes, py_ident, py_string};

/// One client method, with the Python-specific pieces precomputed.
#[derive(Debug, Serialize)]
pub struct MethodContext {
    #[serde(flatten)]
    pub view: OperationView,
    pub method_name: String,
    pub params_signature: String,
    pub return_annotation: String,
    /// Docstring body, already escaped and indented.
    pub docstring: Option<String>,
    /// Keyword arguments passed to the transport, each with a leading `, `.
    pub call_args: String,
    pub decoder: Option<&'static str>,
    pub accept: &'static str,
}

impl MethodContext {
    pub fn build(view: OperationView) -> Self {
        let (return_annotation, decoder, accept) = match &view.streaming {
            Some(s) => (
                format!("Iterator[{}]", s.item_type),
                Some(decoder_for(s.kind)),
                accept_for(s.kind),
            ),
            None => (
                view.response.ty.clone().unwrap_or_else(|| "None".to_string()),
                None,
                "application/json",
            ),
        };
        Self {
            method_name: py_ident(&view.name.snake_case),
            params_signature: params_signature(&view),
            call_args: call_args(&view),
            docstring: docstring(&view),
            return_annotation,
            decoder,
            accept,
            view,
        }
    }
}

/// Summary, description and a deprecation note as docstring paragraphs.
fn docstring(view: &OperationView) -> Option<String> {
    let mut paragraphs: Vec<String> = [&view.summary, &view.description]
        .into_iter()
        .flatten()
        .map(|text| escape_docstring(text))
        .filter(|text| !text.is_empty())
        .collect();
    if view.deprecated {
        paragraphs.push("Deprecated.".to_string());
    }
    match paragraphs.len() {
        0 => None,
        1 => paragraphs.pop(),
        _ => Some(format!("{}\n        ", paragraphs.join("\n\n        "))),
    }
}

fn decoder_for(kind: StreamingKind) -> &'static str {
    match kind {
        StreamingKind::Sse => "iter_sse",
        StreamingKind::Ndjson => "iter_ndjson",
    }
}

fn accept_for(kind: StreamingKind) -> &'static str {
    match kind {
        StreamingKind::Sse => "text/event-stream",
        StreamingKind::Ndjson => "application/x-ndjson",
    }
}

/// Python argument names for the path then the query parameters. Names that
/// collide after snake-casing get a numeric suffix; the wire names stay as
/// the dict keys.
fn argument_names(view: &OperationView) -> (Vec<String>, Vec<String>) {
    let mut seen = HashSet::new();
    let mut unique = |name: &str| {
        let base = py_ident(name);
        let mut ident = base.clone();
        let mut n = 2;
        while !seen.insert(ident.clone()) {
            ident = format!("{base}_{n}");
            n += 1;
        }
        ident
    };
    let path = view.path_params.iter().map(|p| unique(&p.name)).collect();
    let query = view.query_params.iter().map(|p| unique(&p.name)).collect();
    (path, query)
}

/// `self`, path parameters and a required body positionally; query
/// parameters (required first) and an optional body as keywords.
fn params_signature(view: &OperationView) -> String {
    let (path_names, query_names) = argument_names(view);
    let mut positional = vec!["self".to_string()];
    let mut keyword = Vec::new();

    for (param, ident) in view.path_params.iter().zip(&path_names) {
        positional.push(format!("{ident}: {}", param.ty));
    }

    let body = view.body.as_ref();
    if let Some(body) = body.filter(|b| b.required) {
        positional.push(format!("body: {}", body.ty));
    }

    let query: Vec<_> = view.query_params.iter().zip(&query_names).collect();
    for (param, ident) in query.iter().filter(|(p, _)| p.required) {
        keyword.push(format!("{ident}: {}", param.ty));
    }
    for (param, ident) in query.iter().filter(|(p, _)| !p.required) {
        keyword.push(format!("{ident}: {} | None = None", param.ty));
    }
    if let Some(body) = body.filter(|b| !b.required) {
        keyword.push(format!("body: {} | None = None", body.ty));
    }

    if !keyword.is_empty() {
        positional.push("*".to_string());
        positional.extend(keyword);
    }
    positional.join(", ")
}

fn call_args(view: &OperationView) -> String {
    let (path_names, query_names) = argument_names(view);
    let dict = |params: &[ParamView], names: &[String]| {
        let pairs: Vec<String> = params
            .iter()
            .zip(names)
            .map(|(p, ident)| format!("{}: {ident}", py_string(&p.name)))
            .collect();
        pairs.join(", ")
    };

    let mut args = String::new();
    if !view.path_params.is_empty() {
        let pairs = dict(view.path_params.as_slice(), path_names.as_slice());
        args.push_str(&format!(", path_params={{{pairs}}}"));
    }
    if !view.query_params.is_empty() {
        let pairs = dict(view.query_params.as_slice(), query_names.as_slice());
        args.push_str(&format!(", query={{{pairs}}}"));
    }
    if view.body.is_some() {
        args.push_str(", body=body");
    }
    args
}

/// Method contexts for `ops`.
pub fn method_contexts(ops: &[OperationRecord], model: &GenerationModel) -> Vec<MethodContext> {
    operation_views(ops, &model.mapper, &PyTypes::ANNOTATION)
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

pub fn imported_decoders<'a>(
    methods: impl IntoIterator<Item = &'a MethodContext>,
) -> Vec<&'static str> {
    let mut decoders: Vec<&'static str> = methods.into_iter().filter_map(|m| m.decoder).collect();
    decoders.sort_unstable();
    decoders.dedup();
    decoders
}

/// Emit `client.py`: `ApiClient` with one method per operation.
pub fn emit_client(
    model: &GenerationModel,
    options: &GeneratorOptions,
) -> Result<String, GeneratorError> {
    let ops = model.flat_operations()?;
    let methods = method_contexts(ops, model);

    super::render(
        "client.py.j2",
        context! {
            title => model.info.title.clone(),
            imported_types => imported_types(&methods),
            decoders => imported_decoders(&methods),
            operations => methods,
            no_docs => options.no_docs,
        },
    )
}
