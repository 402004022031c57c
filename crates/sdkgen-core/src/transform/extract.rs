use std::collections::HashSet;

use indexmap::IndexMap;

use crate::ir::{
    ApiInfo, ExtractedApi, HttpMethod, OperationRecord, Parameter, RequestBody, SchemaRecord,
    Shape,
};
use crate::parse::media_type::APPLICATION_JSON;
use crate::parse::operation::{Operation, PathItem};
use crate::parse::parameter::{self, ParameterLocation, ParameterOrRef};
use crate::parse::request_body::RequestBodyOrRef;
use crate::parse::schema::SchemaOrRef;
use crate::parse::spec::OpenApiSpec;

use super::name_normalizer::{derive_operation_id, template_params, unique_id};
use super::shape_resolver::ShapeResolver;
use super::stream_detector::detect_response;

/// Walk a loaded document and produce its operation and schema records.
///
/// Extraction never fails: anything it cannot classify becomes
/// [`Shape::Unknown`].
pub fn extract(spec: &OpenApiSpec) -> ExtractedApi {
    let components = spec.components.as_ref().map(|c| &c.schemas);
    let resolver = ShapeResolver::new(components);

    let schemas: Vec<SchemaRecord> = components
        .map(|schemas| {
            schemas
                .iter()
                .map(|(name, schema)| schema_record(name, schema, &resolver))
                .collect()
        })
        .unwrap_or_default();

    let operations = extract_operations(spec, &resolver);

    log::debug!(
        "extracted {} operations and {} schemas",
        operations.len(),
        schemas.len()
    );

    ExtractedApi {
        info: ApiInfo {
            title: spec.info.title.clone(),
            description: spec.info.description.clone(),
            version: spec.info.version.clone(),
        },
        base_url: spec.servers.first().map(|s| s.resolved_url()),
        operations,
        schemas,
    }
}

fn schema_record(name: &str, schema: &SchemaOrRef, resolver: &ShapeResolver<'_>) -> SchemaRecord {
    let description = match schema {
        SchemaOrRef::Inline(s) => s.description.clone(),
        SchemaOrRef::Ref { .. } => None,
    };
    SchemaRecord {
        name: name.to_string(),
        original_name: name.to_string(),
        description,
        shape: resolver.shape_of(schema),
    }
}

fn extract_operations(spec: &OpenApiSpec, resolver: &ShapeResolver<'_>) -> Vec<OperationRecord> {
    let mut operations = Vec::new();
    let mut used_ids = HashSet::new();

    for (path, item) in &spec.paths {
        for method in HttpMethod::ALL {
            let Some(op) = item.operation(method) else {
                continue;
            };
            let base_id = op
                .operation_id
                .clone()
                .unwrap_or_else(|| derive_operation_id(method, path));
            let id = unique_id(base_id, &mut used_ids);
            operations.push(build_operation(id, method, path, item, op, resolver));
        }
    }

    operations
}

fn build_operation(
    id: String,
    method: HttpMethod,
    path: &str,
    item: &PathItem,
    op: &Operation,
    resolver: &ShapeResolver<'_>,
) -> OperationRecord {
    let declared = declared_parameters(&id, &item.parameters, &op.parameters);

    let path_params = template_params(path)
        .into_iter()
        .map(|name| {
            match declared.get(&(ParameterLocation::Path, name.to_string())) {
                Some(p) => Parameter {
                    name: name.to_string(),
                    required: true,
                    shape: p
                        .schema
                        .as_ref()
                        .map_or_else(Shape::plain_string, |s| resolver.shape_of(s)),
                    description: p.description.clone(),
                },
                None => Parameter {
                    name: name.to_string(),
                    required: true,
                    shape: Shape::plain_string(),
                    description: None,
                },
            }
        })
        .collect();

    let query_params = declared
        .values()
        .filter(|p| p.location == ParameterLocation::Query)
        .map(|p| Parameter {
            name: p.name.clone(),
            required: p.required,
            shape: p
                .schema
                .as_ref()
                .map_or(Shape::Unknown, |s| resolver.shape_of(s)),
            description: p.description.clone(),
        })
        .collect();

    let request_body = match &op.request_body {
        Some(RequestBodyOrRef::Inline(rb)) => rb.media(APPLICATION_JSON).map(|mt| RequestBody {
            required: rb.required,
            shape: mt
                .schema
                .as_ref()
                .map_or(Shape::Unknown, |s| resolver.shape_of(s)),
        }),
        Some(RequestBodyOrRef::Ref { ref_path }) => {
            log::warn!("{id}: unresolved request body {ref_path}, ignoring");
            None
        }
        None => None,
    };

    let response = detect_response(&id, &op.responses, resolver);

    OperationRecord {
        original_id: id.clone(),
        id,
        method,
        path: path.to_string(),
        summary: op.summary.clone(),
        description: op.description.clone(),
        deprecated: op.deprecated,
        path_params,
        query_params,
        request_body,
        response: response.shape,
        streaming: response.streaming,
    }
}

/// Path-level then operation-level parameters, keyed by location and name.
/// An operation-level declaration replaces a path-level one in place.
fn declared_parameters<'s>(
    id: &str,
    path_level: &'s [ParameterOrRef],
    op_level: &'s [ParameterOrRef],
) -> IndexMap<(ParameterLocation, String), &'s parameter::Parameter> {
    let mut declared = IndexMap::new();
    for p in path_level.iter().chain(op_level) {
        match p {
            ParameterOrRef::Inline(param) => {
                declared.insert((param.location, param.name.clone()), param);
            }
            ParameterOrRef::Ref { ref_path } => {
                log::warn!("{id}: unresolved parameter {ref_path}, ignoring");
            }
        }
    }
    declared
}
