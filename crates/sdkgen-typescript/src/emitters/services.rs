use minijinja::context;
use sdkgen_core::GeneratorError;
use sdkgen_core::render::{GenerationModel, GeneratorOptions, service_class_name};
use sdkgen_core::transform::name_normalizer::normalize_name;
use serde::Serialize;

use super::client::{MethodContext, imported_decoders, imported_types, method_contexts};
use crate::type_mapper::ts_ident;

#[derive(Debug, Serialize)]
struct ServiceContext {
    class_name: String,
    accessor: String,
    operations: Vec<MethodContext>,
}

/// Emit `services.ts`: one class per service plus a `ServiceClient` that
/// exposes them as properties and carries the unassigned operations itself.
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
                accessor: ts_ident(&normalize_name(name).camel_case),
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
        "services.ts.j2",
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
