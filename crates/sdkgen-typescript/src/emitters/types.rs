use minijinja::context;
use sdkgen_core::GeneratorError;
use sdkgen_core::render::{GenerationModel, GeneratorOptions, SchemaView};

use crate::type_mapper::TsTypes;

/// Emit `types.ts`: an interface, string-literal union or alias per schema.
pub fn emit_types(
    model: &GenerationModel,
    options: &GeneratorOptions,
) -> Result<String, GeneratorError> {
    let schemas: Vec<SchemaView> = model
        .schemas
        .iter()
        .map(|record| SchemaView::build(record, &model.mapper, &TsTypes))
        .collect();

    super::render(
        "types.ts.j2",
        context! {
            title => model.info.title.clone(),
            version => model.info.version.clone(),
            schemas => schemas,
            no_docs => options.no_docs,
        },
    )
}
