use sdkgen_core::render::{ArtifactKind, GenerationModel, GeneratorOptions};
use sdkgen_core::{CodeGenerator, GeneratorError, TargetLanguage};

use crate::{emitters, type_mapper};

/// TypeScript client generator: interfaces, zod validators and a
/// fetch-based client.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeScriptGenerator;

impl CodeGenerator for TypeScriptGenerator {
    fn target(&self) -> TargetLanguage {
        TargetLanguage::Typescript
    }

    fn file_name(&self, kind: ArtifactKind) -> &'static str {
        match kind {
            ArtifactKind::Types => "types.ts",
            ArtifactKind::Validators => "schemas.ts",
            ArtifactKind::Runtime => "runtime.ts",
            ArtifactKind::FlatClient => "client.ts",
            ArtifactKind::ServiceClient => "services.ts",
            ArtifactKind::Streaming => "streaming.ts",
            ArtifactKind::Index => "index.ts",
        }
    }

    fn render(
        &self,
        kind: ArtifactKind,
        model: &GenerationModel,
        options: &GeneratorOptions,
    ) -> Result<String, GeneratorError> {
        log::debug!("rendering {}", self.file_name(kind));
        model.check_type_names(self.target(), |name| {
            type_mapper::is_taken_type_name(name, model)
        })?;
        match kind {
            ArtifactKind::Types => emitters::types::emit_types(model, options),
            ArtifactKind::Validators => emitters::validators::emit_validators(model, options),
            ArtifactKind::Runtime => emitters::runtime::emit_runtime(model, options),
            ArtifactKind::FlatClient => emitters::client::emit_client(model, options),
            ArtifactKind::ServiceClient => emitters::services::emit_services(model, options),
            ArtifactKind::Streaming => emitters::streaming::emit_streaming(),
            ArtifactKind::Index => emitters::index::emit_index(model, options),
        }
    }
}
