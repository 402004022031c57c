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
    ("types.ts.j2", include_str!("../../templates/types.ts.j2")),
    ("schemas.ts.j2", include_str!("../../templates/schemas.ts.j2")),
    ("runtime.ts.j2", include_str!("../../templates/runtime.ts.j2")),
    ("methods.ts.j2", include_str!("../../templates/methods.ts.j2")),
    ("client.ts.j2", include_str!("../../templates/client.ts.j2")),
    ("services.ts.j2", include_str!("../../templates/services.ts.j2")),
    ("streaming.ts.j2", include_str!("../../templates/streaming.ts.j2")),
    ("index.ts.j2", include_str!("../../templates/index.ts.j2")),
];

/// Escape `*/` sequences that would prematurely close JSDoc comment blocks
/// and fold the text onto one line.
fn escape_jsdoc(value: String) -> String {
    value
        .replace("*/", "*\\/")
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn ts_string(value: String) -> String {
    type_mapper::ts_string(&value)
}

fn ts_key(value: String) -> String {
    type_mapper::ts_key(&value)
}

fn ts_ident(value: String) -> String {
    type_mapper::ts_ident(&value)
}

/// Template environment with every TypeScript template and filter loaded.
pub fn environment() -> Result<Environment<'static>, GeneratorError> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.set_keep_trailing_newline(true);
    env.add_filter("escape_jsdoc", escape_jsdoc);
    env.add_filter("ts_string", ts_string);
    env.add_filter("ts_key", ts_key);
    env.add_filter("ts_ident", ts_ident);
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
