use minijinja::context;
use sdkgen_core::GeneratorError;
use sdkgen_core::render::{GenerationModel, GeneratorOptions, SchemaView};
use serde::Serialize;

use crate::type_mapper::{ZodTypes, schema_const};

#[derive(Debug, Serialize)]
struct ValidatorContext {
    #[serde(flatten)]
    schema: SchemaView,
    const_name: String,
}

/// Emit `schemas.ts`: a zod validator per declared type.
pub fn emit_validators(
    model: &GenerationModel,
    options: &GeneratorOptions,
) -> Result<String, GeneratorError> {
    let validators: Vec<ValidatorContext> = model
        .schemas
        .iter()
        .map(|record| ValidatorContext {
            const_name: schema_const(&record.name),
            schema: SchemaView::build(record, &model.mapper, &ZodTypes),
        })
        .collect();
    let type_names: Vec<&str> = model.schemas.iter().map(|s| s.name.as_str()).collect();

    super::render(
        "schemas.ts.j2",
        context! {
            type_names => type_names,
            validators => validators,
            no_docs => options.no_docs,
        },
    )
}
