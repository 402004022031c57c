use heck::ToSnakeCase;
use sdkgen_core::render::GenerationModel;
use sdkgen_core::typemap::{TypeExpr, TypeRenderer};

/// Python type syntax.
///
/// Generated modules use `from __future__ import annotations`, so names in
/// annotations may refer forward. Expressions evaluated at import time
/// (type aliases, functional `TypedDict`s) need `quote_refs` instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct PyTypes {
    pub quote_refs: bool,
}

impl PyTypes {
    pub const ANNOTATION: PyTypes = PyTypes { quote_refs: false };
    pub const EAGER: PyTypes = PyTypes { quote_refs: true };
}

impl TypeRenderer for PyTypes {
    fn render(&self, expr: &TypeExpr) -> String {
        match expr {
            TypeExpr::String => "str".to_string(),
            TypeExpr::StringEnum(values) => {
                let values: Vec<String> = values.iter().map(|v| py_string(v)).collect();
                format!("Literal[{}]", values.join(", "))
            }
            TypeExpr::Integer => "int".to_string(),
            TypeExpr::Number => "float".to_string(),
            TypeExpr::Boolean => "bool".to_string(),
            TypeExpr::Array(inner) => format!("list[{}]", self.render(inner)),
            TypeExpr::Named(name) if self.quote_refs => py_string(name),
            TypeExpr::Named(name) => name.clone(),
            TypeExpr::Map(value) => format!("dict[str, {}]", self.render(value)),
            TypeExpr::OpenObject => "dict[str, Any]".to_string(),
            TypeExpr::Unknown => "Any".to_string(),
        }
    }
}

/// Double-quoted string literal. JSON string escapes are valid Python.
pub fn py_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("\"{value}\""))
}

const KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try",
    "while", "with", "yield", "match", "case", "type",
];

// Names the generated methods and models already use.
const TAKEN: &[&str] = &[
    "self", "body", "response", "model_config", "json", "dict", "copy", "schema", "validate",
    "construct", "fields",
];

/// Imports, builtins and runtime classes that share a namespace with the
/// declared types in the generated modules.
const GENERATED_NAMES: &[&str] = &[
    "Any", "Literal", "NotRequired", "TypedDict", "Iterator", "Mapping", "BaseModel", "ConfigDict",
    "Field", "ApiClient", "ApiClientConfig", "ApiError", "Transport", "ServiceClient", "requests",
    "schemas", "str", "int", "float", "bool", "list", "dict",
];

/// Whether a schema named `name` would shadow a keyword, an import or a
/// generated class.
pub fn is_taken_type_name(name: &str, model: &GenerationModel) -> bool {
    KEYWORDS.contains(&name)
        || GENERATED_NAMES.contains(&name)
        || model.service_class_names().iter().any(|class| class == name)
}

pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_') && !KEYWORDS.contains(&name)
}

/// snake_case identifier for a wire name, with a `_` suffix when it would
/// clash with a keyword or a name the generated code uses.
pub fn py_ident(name: &str) -> String {
    let snake = name.to_snake_case();
    if snake.is_empty() {
        return "_".to_string();
    }
    if snake.starts_with(|c: char| c.is_ascii_digit()) {
        return format!("_{snake}");
    }
    if KEYWORDS.contains(&snake.as_str()) || TAKEN.contains(&snake.as_str()) {
        return format!("{snake}_");
    }
    snake
}
