use minijinja::context;
use sdkgen_core::GeneratorError;

/// Emit `streaming.py`: SSE and NDJSON iterators over a streamed response.
pub fn emit_streaming() -> Result<String, GeneratorError> {
    super::render("streaming.py.j2", context! {})
}
