pub mod client;
pub mod index;
pub mod runtime;
pub mod services;
pub mod streaming;
pub mod types;
pub mod validators;

use minijinja::{Environment, Value};
use sdkgen_core::GeneratorError;

use crate::type_mapper;

const TEMPLATES: &[(&str, &str)] = &[
    ("types.py.j2", include_str!("../../templates/types.py.j2")),
    ("schemas.py.j2", include_str!("../../templates/schemas.py.j2")),
    ("runtime.py.j2", include_str!("../../templates/runtime.py.j2")),
    ("methods.py.j2", include_str!("../../templates/methods.py.j2")),
    ("client.py.j2", include_str!("../../templates/client.py.j2")),
    ("services.py.j2", include_str!("../../templates/services.py.j2")),
    ("streaming.py.j2", include_str!("../../templates/streaming.py.j2")),
    ("__init__.py.j2", include_str!("../../templates/__init__.py.j2")),
];

/// Make text safe inside a triple-quoted docstring. Every quote is escaped,
/// so a trailing `"` cannot run into the closing delimiter.
pub(crate) fn escape_docstring(value: &str) -> String {
    value.trim().replace('\\', "\\\\").replace('"', "\\\"")
}

fn py_string(value: String) -> String {
    type_mapper::py_string(&value)
}

fn py_ident(value: String) -> String {
    type_mapper::py_ident(&value)
}

/// Template environment with every Python template and filter loaded.
pub fn environment() -> Result<Environment<'static>, GeneratorError> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.set_keep_trailing_newline(true);
    env.add_filter("escape_docstring", |value: String| escape_docstring(&value));
    env.add_filter("py_string", py_string);
    env.add_filter("py_ident", py_ident);
    for (name, source) in TEMPLATES {
        env.add_template(name, source)
            .map_err(|e| template_error(name, &e))?;
    }
    Ok(env)
}

/// Render one template with `ctx`.
pub fn render(name: &str, ctx: Value) -> Result<String, GeneratorError> {
    let env = environment()?;
    let tmpl = env.get_template(name).map_err(|e| template_error(name, &e))?;
    tmpl.render(ctx).map_err(|e| template_error(name, &e))
}

fn template_error(name: &str, err: &minijinja::Error) -> GeneratorError {
    GeneratorError::Template {
        template: name.to_string(),
        message: format!("{err:#}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_compile() {
        let env = environment().unwrap();
        for (name, _) in TEMPLATES {
            assert!(env.get_template(name).is_ok(), "{name}");
        }
    }

    #[test]
    fn test_escape_docstring() {
        assert_eq!(
            escape_docstring("say \"\"\"hi\"\"\" \\o/ "),
            "say \\\"\\\"\\\"hi\\\"\\\"\\\" \\\\o/"
        );
        assert_eq!(escape_docstring("An \"item\""), "An \\\"item\\\"");
    }
}
