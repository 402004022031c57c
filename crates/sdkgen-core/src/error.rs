use std::path::PathBuf;

use thiserror::Error;

use crate::TargetLanguage;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported OpenAPI version: {0} (expected 3.0.x or 3.1.x)")]
    UnsupportedVersion(String),
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("invalid reference format: {0}")]
    InvalidRefFormat(String),

    #[error("reference target not found: {0}")]
    RefTargetNotFound(String),
}

/// Failure to turn a file into a validated, dereferenced document.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("document failed validation: {0}")]
    Resolve(#[from] ResolveError),
}

/// A name-mapping entry (or a document identifier) that cannot become a
/// usable identifier in generated code.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MappingError {
    #[error("identifier for `{original}` is empty after sanitizing `{value}`")]
    EmptyIdentifier { original: String, value: String },

    #[error("identifier for `{original}` is not valid: `{value}` starts with a digit")]
    InvalidIdentifier { original: String, value: String },

    #[error(
        "service `{service}` has two operations named `{method}` (`{first}` and `{second}`); rename one in the mapping file"
    )]
    DuplicateMethod {
        service: String,
        method: String,
        first: String,
        second: String,
    },

    #[error("schemas `{first}` and `{second}` are both mapped to `{name}`")]
    DuplicateSchema {
        name: String,
        first: String,
        second: String,
    },
}

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("template `{template}` failed: {message}")]
    Template { template: String, message: String },

    #[error(
        "schema `{original}` is declared as `{name}`, a name the generated {target} code already uses; rename it in the mapping file"
    )]
    ReservedName {
        name: String,
        original: String,
        target: TargetLanguage,
    },

    #[error(transparent)]
    Mapping(#[from] MappingError),
}
