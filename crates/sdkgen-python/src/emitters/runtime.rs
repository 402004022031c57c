use minijinja::context;
use sdkgen_core::GeneratorError;
use sdkgen_core::render::{GenerationModel, GeneratorOptions};

/// Emit `runtime.py`: `ApiClientConfig`, `ApiError` and the
/// `requests`-based transport.
pub fn emit_runtime(
    model: &GenerationModel,
    options: &GeneratorOptions,
) -> Result<String, GeneratorError> {
    super::render(
        "runtime.py.j2",
        context! {
            title => model.info.title.clone(),
            version => model.info.version.clone(),
            base_url => model.default_base_url(options),
            timeout => options.timeout,
            no_docs => options.no_docs,
        },
    )
}
