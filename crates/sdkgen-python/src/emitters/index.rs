use minijinja::context;
use sdkgen_core::GeneratorError;
use sdkgen_core::render::{ArtifactKind, GenerationModel, GeneratorOptions};

/// Emit `__init__.py`, re-exporting the clients, runtime and type names.
pub fn emit_index(
    model: &GenerationModel,
    options: &GeneratorOptions,
) -> Result<String, GeneratorError> {
    let plan = ArtifactKind::plan(model, options);
    let type_names: Vec<&str> = model.schemas.iter().map(|s| s.name.as_str()).collect();
    super::render(
        "__init__.py.j2",
        context! {
            title => model.info.title.clone(),
            type_names => type_names,
            flat => plan.contains(&ArtifactKind::FlatClient),
            grouped => plan.contains(&ArtifactKind::ServiceClient),
            streaming => plan.contains(&ArtifactKind::Streaming),
        },
    )
}
