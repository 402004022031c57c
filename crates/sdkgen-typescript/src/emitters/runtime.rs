use minijinja::context;
use sdkgen_core::GeneratorError;
use sdkgen_core::render::{GenerationModel, GeneratorOptions};

/// Emit `runtime.ts`: client configuration, `ApiError` and the fetch-based
/// transport every client method goes through.
pub fn emit_runtime(
    model: &GenerationModel,
    options: &GeneratorOptions,
) -> Result<String, GeneratorError> {
    super::render(
        "runtime.ts.j2",
        context! {
            title => model.info.title.clone(),
            version => model.info.version.clone(),
            base_url => model.default_base_url(options),
            timeout_ms => options.timeout.saturating_mul(1000),
            no_docs => options.no_docs,
        },
    )
}
