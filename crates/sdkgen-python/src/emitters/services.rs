use minijinja::context;
use sdkgen_core::GeneratorError;
use sdkgen_core::render::{GenerationModel, GeneratorOptions, service_class_name};
use sdkgen_core::transform::name_normalizer::normalize_name;
use serde::Serialize;

use super::client::{MethodContext, imported_decoders, imported_types, method_contexts};
use crate::type_mapper::py_ident;

#[derive(Debug, Serialize)]
struct ServiceContext {
    class_name: String,
    attribute: String,
    operations: Vec<MethodContext>,
}

/// Emit `services.py`: a class per service and a `ServiceClient` holding
/// one of each, with unassigned operations on the client itself.
pub fn emit_services(
    model: &GenerationModel,
    options: &GeneratorOptions,
) -> Result<String, GeneratorError> {
    let services: Vec<ServiceContext> = model
        .services()?
        .into_iter()
        .map(|(name, ops)| {
            ServiceContext {
                class_name: service_class_name(name),
                attribute: py_ident(&normalize_name(name).snake_case),
                operations: method_contexts(ops, model),
            }
        })
        .collect();
    let root = method_contexts(model.default_operations(), model);

    let all_methods = || {
        services
            .iter()
            .flat_map(|s| s.operations.iter())
            .chain(root.iter())
    };
    let types = imported_types(all_methods());
    let decoders = imported_decoders(all_methods());

    super::render(
        "services.py.j2",
        context! {
            title => model.info.title.clone(),
            imported_types => types,
            decoders => decoders,
            services => services,
            operations => root,
            no_docs => options.no_docs,
        },
    )
}
