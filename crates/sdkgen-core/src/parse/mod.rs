pub mod components;
pub mod media_type;
pub mod operation;
pub mod parameter;
pub mod ref_resolve;
pub mod reference;
pub mod request_body;
pub mod response;
pub mod schema;
pub mod server;
pub mod spec;

use std::fs;
use std::path::Path;

use crate::error::{LoadError, ParseError};
use ref_resolve::RefResolver;
use spec::OpenApiSpec;

pub use reference::RefOr;

/// Parse an OpenAPI document from YAML.
pub fn from_yaml(input: &str) -> Result<OpenApiSpec, ParseError> {
    let spec: OpenApiSpec = serde_yaml_ng::from_str(input)?;
    validate_version(&spec)?;
    Ok(spec)
}

/// Parse an OpenAPI document from JSON.
pub fn from_json(input: &str) -> Result<OpenApiSpec, ParseError> {
    let spec: OpenApiSpec = serde_json::from_str(input)?;
    validate_version(&spec)?;
    Ok(spec)
}

/// Read and parse a document, choosing JSON for `.json` files and YAML otherwise.
pub fn from_path(path: &Path) -> Result<OpenApiSpec, ParseError> {
    let content = fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => from_json(&content),
        _ => from_yaml(&content),
    }
}

/// Parse a document from disk and validate its references, returning a
/// document whose parameters, request bodies and responses are inlined and
/// whose schema references are known to resolve.
pub fn load(path: &Path) -> Result<OpenApiSpec, LoadError> {
    let spec = from_path(path)?;
    let resolved = RefResolver::new(&spec).resolve_spec(&spec)?;
    log::debug!(
        "loaded {} ({} paths)",
        path.display(),
        resolved.paths.len()
    );
    Ok(resolved)
}

fn validate_version(spec: &OpenApiSpec) -> Result<(), ParseError> {
    if !(spec.openapi.starts_with("3.0") || spec.openapi.starts_with("3.1")) {
        return Err(ParseError::UnsupportedVersion(spec.openapi.clone()));
    }
    Ok(())
}
