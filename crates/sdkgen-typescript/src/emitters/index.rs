use minijinja::context;
use sdkgen_core::GeneratorError;
use sdkgen_core::render::{ArtifactKind, GenerationModel, GeneratorOptions};

/// Emit `index.ts`, re-exporting every other planned artifact.
pub fn emit_index(
    model: &GenerationModel,
    options: &GeneratorOptions,
) -> Result<String, GeneratorError> {
    let plan = ArtifactKind::plan(model, options);
    super::render(
        "index.ts.j2",
        context! {
            flat => plan.contains(&ArtifactKind::FlatClient),
            grouped => plan.contains(&ArtifactKind::ServiceClient),
            streaming => plan.contains(&ArtifactKind::Streaming),
        },
    )
}
