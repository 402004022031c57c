use std::collections::HashSet;

use heck::{ToLowerCamelCase, ToPascalCase, ToShoutySnakeCase, ToSnakeCase};

use crate::ir::{HttpMethod, NormalizedName};

/// Create a `NormalizedName` from an arbitrary string, computing all casing variants.
pub fn normalize_name(name: &str) -> NormalizedName {
    let mut sanitized = sanitize_identifier(name);
    if sanitized.is_empty() {
        sanitized = "unnamed".to_string();
    }

    NormalizedName {
        original: name.to_string(),
        pascal_case: sanitized.to_pascal_case(),
        camel_case: sanitized.to_lower_camel_case(),
        snake_case: sanitized.to_snake_case(),
        screaming_snake: sanitized.to_shouty_snake_case(),
    }
}

/// Derive an operation identifier from method and path.
///
/// The lowercase method is followed by every path segment in PascalCase;
/// `{param}` segments become `By<Param>`.
///
/// - `GET /users` → `getUsers`
/// - `GET /users/{id}` → `getUsersById`
/// - `POST /api/v2/users/{userId}/messages` → `postApiV2UsersByUserIdMessages`
pub fn derive_operation_id(method: HttpMethod, path: &str) -> String {
    let mut id = method.as_str().to_ascii_lowercase();

    for seg in path.split('/').filter(|s| !s.is_empty()) {
        match seg.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            Some(param) => {
                id.push_str("By");
                id.push_str(&sanitize_identifier(param).to_pascal_case());
            }
            None => id.push_str(&sanitize_identifier(seg).to_pascal_case()),
        }
    }

    id
}

/// Turn an arbitrary string into a bare identifier: every run of
/// non-alphanumeric characters is dropped and the character following it is
/// upper-cased. The result may be empty or start with a digit; callers
/// decide whether that is acceptable.
pub fn sanitize_identifier(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut upper_next = false;

    for ch in value.chars() {
        if ch.is_ascii_alphanumeric() {
            if upper_next {
                result.push(ch.to_ascii_uppercase());
            } else {
                result.push(ch);
            }
            upper_next = false;
        } else {
            upper_next = true;
        }
    }

    result
}

/// Append `2`, `3`, ... to an identifier already taken in this run.
pub fn unique_id(base: String, used: &mut HashSet<String>) -> String {
    if used.insert(base.clone()) {
        return base;
    }
    let mut n = 2;
    loop {
        let candidate = format!("{base}{n}");
        if used.insert(candidate.clone()) {
            log::warn!("`{base}` is already taken, using `{candidate}`");
            return candidate;
        }
        n += 1;
    }
}

/// Names every `{placeholder}` of a URL template, in order.
pub fn template_params(path: &str) -> Vec<&str> {
    let mut params = Vec::new();
    let mut rest = path;
    while let Some(start) = rest.find('{') {
        let Some(len) = rest[start + 1..].find('}') else {
            break;
        };
        let name = &rest[start + 1..start + 1 + len];
        if !name.is_empty() && !params.contains(&name) {
            params.push(name);
        }
        rest = &rest[start + 1 + len + 1..];
    }
    params
}
