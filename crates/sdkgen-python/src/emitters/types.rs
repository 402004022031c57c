use minijinja::context;
use sdkgen_core::GeneratorError;
use sdkgen_core::render::{GenerationModel, GeneratorOptions, SchemaView};
use serde::Serialize;

use crate::type_mapper::{PyTypes, is_identifier};

#[derive(Debug, Serialize)]
struct TypedDictContext {
    #[serde(flatten)]
    schema: SchemaView,
    /// Class syntax needs every key to be an identifier; otherwise the
    /// functional form is used, with forward references quoted.
    functional: bool,
}

/// Emit `types.py`: a `TypedDict`, `Literal` or alias per schema.
pub fn emit_types(
    model: &GenerationModel,
    options: &GeneratorOptions,
) -> Result<String, GeneratorError> {
    let schemas: Vec<TypedDictContext> = model
        .schemas
        .iter()
        .map(|record| {
            let lazy = SchemaView::build(record, &model.mapper, &PyTypes::ANNOTATION);
            let functional =
                lazy.kind == "object" && !lazy.fields.iter().all(|f| is_identifier(&f.name));
            let schema = if functional || lazy.kind == "alias" {
                SchemaView::build(record, &model.mapper, &PyTypes::EAGER)
            } else {
                lazy
            };
            TypedDictContext { schema, functional }
        })
        .collect();

    super::render(
        "types.py.j2",
        context! {
            title => model.info.title.clone(),
            version => model.info.version.clone(),
            schemas => schemas,
            no_docs => options.no_docs,
        },
    )
}
