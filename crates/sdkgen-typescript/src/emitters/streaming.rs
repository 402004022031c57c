use minijinja::context;
use sdkgen_core::GeneratorError;

/// Emit `streaming.ts`: SSE and NDJSON decoders over a fetch `Response`.
pub fn emit_streaming() -> Result<String, GeneratorError> {
    super::render("streaming.ts.j2", context! {})
}
