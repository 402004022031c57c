use minijinja::context;
use sdkgen_core::GeneratorError;
use sdkgen_core::render::{GenerationModel, GeneratorOptions, SchemaView};
use serde::Serialize;

use crate::type_mapper::{PyTypes, py_ident};

#[derive(Debug, Serialize)]
struct ModelField {
    ident: String,
    /// Wire name, when it differs from `ident`.
    alias: Option<String>,
    annotation: String,
    required: bool,
}

#[derive(Debug, Serialize)]
struct ModelContext {
    #[serde(flatten)]
    schema: SchemaView,
    model_fields: Vec<ModelField>,
}

/// Emit `schemas.py`: a pydantic model per object schema and a type alias
/// for everything else.
pub fn emit_validators(
    model: &GenerationModel,
    options: &GeneratorOptions,
) -> Result<String, GeneratorError> {
    let models: Vec<ModelContext> = model
        .schemas
        .iter()
        .map(|record| {
            let is_model = record
                .shape
                .as_object()
                .is_some_and(|o| !o.properties.is_empty());
            let renderer = if is_model {
                PyTypes::ANNOTATION
            } else {
                PyTypes::EAGER
            };
            let schema = SchemaView::build(record, &model.mapper, &renderer);
            let model_fields = schema
                .fields
                .iter()
                .map(|f| {
                    let ident = py_ident(&f.name);
                    ModelField {
                        alias: (ident != f.name).then(|| f.name.clone()),
                        annotation: f.ty.clone(),
                        required: f.required,
                        ident,
                    }
                })
                .collect();
            ModelContext {
                schema,
                model_fields,
            }
        })
        .collect();

    super::render(
        "schemas.py.j2",
        context! {
            models => models,
            no_docs => options.no_docs,
        },
    )
}
