//! The data contract between the pipeline and the per-language renderers.

pub mod view;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::TargetLanguage;
use crate::error::{GeneratorError, MappingError};
use crate::ir::{ApiInfo, OperationRecord, SchemaRecord};
use crate::mapping::{DEFAULT_SERVICE, GroupedOperations};
use crate::transform::name_normalizer::normalize_name;
use crate::typemap::TypeMapper;

pub use view::{
    BodyView, FieldView, OperationView, ParamView, ResponseKind, ResponseView, SchemaView,
    StreamingView, named_types, operation_views,
};

/// Which client surfaces to emit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// One client with every operation as a method.
    Flat,
    /// One sub-client per service.
    Grouped,
    #[default]
    Both,
}

/// Renderer options that do not come from the document.
#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    pub layout: Layout,
    /// Overrides the document's first server URL.
    pub base_url: Option<String>,
    /// Default request timeout in seconds.
    pub timeout: u64,
    /// Skip doc comments in generated code.
    pub no_docs: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            layout: Layout::Both,
            base_url: None,
            timeout: 30,
            no_docs: false,
        }
    }
}

/// One generated source file, per target language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// Type declarations.
    Types,
    /// Runtime validation schemas.
    Validators,
    /// Shared transport, configuration and error types.
    Runtime,
    FlatClient,
    ServiceClient,
    /// Stream decoding helpers; only when an operation streams.
    Streaming,
    /// Re-exports.
    Index,
}

/// Class generated for a service, e.g. `pets` → `PetsService`.
pub fn service_class_name(service: &str) -> String {
    format!("{}Service", normalize_name(service).pascal_case)
}

impl ArtifactKind {
    /// The artifacts a run produces, in emission order.
    pub fn plan(model: &GenerationModel, options: &GeneratorOptions) -> Vec<ArtifactKind> {
        let mut kinds = vec![
            ArtifactKind::Types,
            ArtifactKind::Validators,
            ArtifactKind::Runtime,
        ];
        if matches!(options.layout, Layout::Flat | Layout::Both) {
            kinds.push(ArtifactKind::FlatClient);
        }
        if matches!(options.layout, Layout::Grouped | Layout::Both) {
            kinds.push(ArtifactKind::ServiceClient);
        }
        if model.has_streaming() {
            kinds.push(ArtifactKind::Streaming);
        }
        kinds.push(ArtifactKind::Index);
        kinds
    }
}

/// Everything a renderer needs for one run: renamed records, their service
/// groups and the run's type mapper.
#[derive(Debug, Clone)]
pub struct GenerationModel {
    pub info: ApiInfo,
    pub base_url: Option<String>,
    pub schemas: Vec<SchemaRecord>,
    pub operations: Vec<OperationRecord>,
    pub groups: GroupedOperations,
    pub mapper: TypeMapper,
}

impl GenerationModel {
    pub fn has_streaming(&self) -> bool {
        self.operations.iter().any(OperationRecord::is_streaming)
    }

    /// All operations as methods of a single client. Method names must be
    /// unique across services for this to work.
    pub fn flat_operations(&self) -> Result<&[OperationRecord], MappingError> {
        let mut seen: HashMap<&str, &OperationRecord> = HashMap::new();
        for op in &self.operations {
            if let Some(first) = seen.insert(op.id.as_str(), op) {
                return Err(MappingError::DuplicateMethod {
                    service: "client".to_string(),
                    method: op.id.clone(),
                    first: first.original_id.clone(),
                    second: op.original_id.clone(),
                });
            }
        }
        Ok(&self.operations)
    }

    /// Operations without a service, exposed on the root of the grouped client.
    pub fn default_operations(&self) -> &[OperationRecord] {
        self.groups.get(DEFAULT_SERVICE).unwrap_or(&[])
    }

    /// Named services with their operations, in order of first appearance.
    ///
    /// Fails when a root method would share its name with a service
    /// accessor.
    pub fn services(&self) -> Result<Vec<(&str, &[OperationRecord])>, MappingError> {
        let services: Vec<_> = self
            .groups
            .iter()
            .filter(|(name, _)| *name != DEFAULT_SERVICE)
            .collect();
        for op in self.default_operations() {
            let method = normalize_name(&op.id).camel_case;
            if let Some((service, _)) = services
                .iter()
                .find(|(name, _)| normalize_name(name).camel_case == method)
            {
                return Err(MappingError::DuplicateMethod {
                    service: DEFAULT_SERVICE.to_string(),
                    method: op.id.clone(),
                    first: op.original_id.clone(),
                    second: format!("service {service}"),
                });
            }
        }
        Ok(services)
    }

    /// Class names of the named services.
    pub fn service_class_names(&self) -> Vec<String> {
        self.groups
            .iter()
            .filter(|(name, _)| *name != DEFAULT_SERVICE)
            .map(|(name, _)| service_class_name(name))
            .collect()
    }

    /// Fail on the first schema whose final name `is_taken` reports as
    /// already used by the target's generated code.
    pub fn check_type_names(
        &self,
        target: TargetLanguage,
        is_taken: impl Fn(&str) -> bool,
    ) -> Result<(), GeneratorError> {
        match self.schemas.iter().find(|s| is_taken(&s.name)) {
            Some(schema) => Err(GeneratorError::ReservedName {
                name: schema.name.clone(),
                original: schema.original_name.clone(),
                target,
            }),
            None => Ok(()),
        }
    }

    /// Base URL baked into the generated client configuration.
    pub fn default_base_url<'m>(&'m self, options: &'m GeneratorOptions) -> &'m str {
        options
            .base_url
            .as_deref()
            .or(self.base_url.as_deref())
            .unwrap_or("")
    }
}
