use sdkgen_core::render::GenerationModel;
use sdkgen_core::typemap::{TypeExpr, TypeRenderer};

/// TypeScript type syntax. Integers and numbers both print as `number`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TsTypes;

impl TypeRenderer for TsTypes {
    fn render(&self, expr: &TypeExpr) -> String {
        match expr {
            TypeExpr::String => "string".to_string(),
            TypeExpr::StringEnum(values) => values
                .iter()
                .map(|v| ts_string(v))
                .collect::<Vec<_>>()
                .join(" | "),
            TypeExpr::Integer | TypeExpr::Number => "number".to_string(),
            TypeExpr::Boolean => "boolean".to_string(),
            TypeExpr::Array(inner) => {
                let inner_ts = self.render(inner);
                if inner_ts.contains('|') {
                    format!("({inner_ts})[]")
                } else {
                    format!("{inner_ts}[]")
                }
            }
            TypeExpr::Named(name) => name.clone(),
            TypeExpr::Map(value) => format!("Record<string, {}>", self.render(value)),
            TypeExpr::OpenObject => "Record<string, unknown>".to_string(),
            TypeExpr::Unknown => "unknown".to_string(),
        }
    }
}

/// zod validator expressions. Named types go through `z.lazy` so that
/// declaration order in `schemas.ts` does not matter.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZodTypes;

impl TypeRenderer for ZodTypes {
    fn render(&self, expr: &TypeExpr) -> String {
        match expr {
            TypeExpr::String => "z.string()".to_string(),
            TypeExpr::StringEnum(values) => {
                let values: Vec<String> = values.iter().map(|v| ts_string(v)).collect();
                format!("z.enum([{}])", values.join(", "))
            }
            TypeExpr::Integer => "z.number().int()".to_string(),
            TypeExpr::Number => "z.number()".to_string(),
            TypeExpr::Boolean => "z.boolean()".to_string(),
            TypeExpr::Array(inner) => format!("z.array({})", self.render(inner)),
            TypeExpr::Named(name) => format!("z.lazy(() => {})", schema_const(name)),
            TypeExpr::Map(value) => format!("z.record(z.string(), {})", self.render(value)),
            TypeExpr::OpenObject => "z.record(z.string(), z.unknown())".to_string(),
            TypeExpr::Unknown => "z.unknown()".to_string(),
        }
    }
}

/// Name of the exported validator for a declared type.
pub fn schema_const(name: &str) -> String {
    format!("{name}Schema")
}

/// Double-quoted string literal.
pub fn ts_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("\"{value}\""))
}

const RESERVED: &[&str] = &[
    "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete", "do",
    "else", "enum", "export", "extends", "false", "finally", "for", "function", "if", "import",
    "in", "instanceof", "new", "null", "return", "super", "switch", "this", "throw", "true", "try",
    "typeof", "var", "void", "while", "with", "yield", "let", "static", "implements", "interface",
    "package", "private", "protected", "public", "await", "async",
    // names the generated methods already use
    "body", "query", "options", "response",
];

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Object key as written in a type or literal: bare when it is an
/// identifier, quoted otherwise.
pub fn ts_key(name: &str) -> String {
    if is_identifier(name) {
        name.to_string()
    } else {
        ts_string(name)
    }
}

/// Globals, runtime exports and imports that sit next to the declared types
/// in the generated modules.
const GENERATED_NAMES: &[&str] = &[
    "Record", "Promise", "AsyncGenerator", "z", "ClientConfig", "RequestOptions", "RequestParts",
    "Transport", "ApiError", "ApiClient", "ServiceClient", "DEFAULT_BASE_URL",
    "DEFAULT_TIMEOUT_MS", "parseSse", "parseNdjson",
];

/// Whether a schema named `name` would collide with a generated name. A
/// service class or another schema's validator const counts too, since
/// `index.ts` re-exports every module.
pub fn is_taken_type_name(name: &str, model: &GenerationModel) -> bool {
    RESERVED.contains(&name)
        || GENERATED_NAMES.contains(&name)
        || model.service_class_names().iter().any(|class| class == name)
        || name
            .strip_suffix("Schema")
            .is_some_and(|base| model.schemas.iter().any(|s| s.name == base))
}

/// A local identifier that cannot clash with a keyword or a name the
/// generated method body uses.
pub fn ts_ident(name: &str) -> String {
    if name.is_empty() {
        return "_".to_string();
    }
    if RESERVED.contains(&name) {
        return format!("{name}_");
    }
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        return format!("_{name}");
    }
    name.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(expr: TypeExpr) -> String {
        TsTypes.render(&expr)
    }

    #[test]
    fn test_primitives() {
        assert_eq!(ts(TypeExpr::String), "string");
        assert_eq!(ts(TypeExpr::Integer), "number");
        assert_eq!(ts(TypeExpr::Number), "number");
        assert_eq!(ts(TypeExpr::Boolean), "boolean");
        assert_eq!(ts(TypeExpr::Unknown), "unknown");
        assert_eq!(ts(TypeExpr::OpenObject), "Record<string, unknown>");
    }

    #[test]
    fn test_array() {
        assert_eq!(ts(TypeExpr::Array(Box::new(TypeExpr::String))), "string[]");
        assert_eq!(
            ts(TypeExpr::Array(Box::new(TypeExpr::StringEnum(vec![
                "a".into(),
                "b".into()
            ])))),
            "(\"a\" | \"b\")[]"
        );
    }

    #[test]
    fn test_map_of_named() {
        insta::assert_snapshot!(
            ts(TypeExpr::Map(Box::new(TypeExpr::Array(Box::new(TypeExpr::Named("Pet".into())))))),
            @"Record<string, Pet[]>"
        );
    }

    #[test]
    fn test_zod() {
        assert_eq!(ZodTypes.render(&TypeExpr::Integer), "z.number().int()");
        insta::assert_snapshot!(
            ZodTypes.render(&TypeExpr::Array(Box::new(TypeExpr::Named("Pet".into())))),
            @"z.array(z.lazy(() => PetSchema))"
        );
        assert_eq!(
            ZodTypes.render(&TypeExpr::StringEnum(vec!["on".into(), "off".into()])),
            "z.enum([\"on\", \"off\"])"
        );
    }

    #[test]
    fn test_keys_and_idents() {
        assert_eq!(ts_key("limit"), "limit");
        assert_eq!(ts_key("X-Request-Id"), "\"X-Request-Id\"");
        assert_eq!(ts_key("1st"), "\"1st\"");
        assert_eq!(ts_ident("delete"), "delete_");
        assert_eq!(ts_ident("options"), "options_");
        assert_eq!(ts_ident("petId"), "petId");
    }
}
