use std::collections::HashSet;

use indexmap::IndexMap;

use super::components::Components;
use super::media_type::MediaType;
use super::operation::PathItem;
use super::parameter::ParameterOrRef;
use super::reference::RefOr;
use super::schema::{AdditionalProperties, Schema, SchemaOrRef};
use super::spec::OpenApiSpec;
use crate::error::ResolveError;

/// Looks up one `components` section.
type Section<T> = for<'c> fn(&'c Components) -> &'c IndexMap<String, RefOr<T>>;

/// Dereferences component parameters, request bodies and responses, and checks
/// that every schema `$ref` names an existing `#/components/schemas/*` entry.
///
/// Schema references are kept as references: the extractor turns them into
/// named-type references instead of inlining (and possibly looping on) them.
pub struct RefResolver<'a> {
    components: Option<&'a Components>,
}

impl<'a> RefResolver<'a> {
    pub fn new(spec: &'a OpenApiSpec) -> Self {
        Self {
            components: spec.components.as_ref(),
        }
    }

    /// Produce a copy of `spec` with every non-schema `$ref` inlined.
    pub fn resolve_spec(&self, spec: &OpenApiSpec) -> Result<OpenApiSpec, ResolveError> {
        let mut resolved = spec.clone();

        for item in resolved.paths.values_mut() {
            self.resolve_path_item(item)?;
        }

        if let Some(components) = &resolved.components {
            for schema in components.schemas.values() {
                self.check_schema_or_ref(schema)?;
            }
        }

        Ok(resolved)
    }

    fn resolve_path_item(&self, item: &mut PathItem) -> Result<(), ResolveError> {
        item.parameters = self.resolve_parameters(&item.parameters)?;

        for op in item.operations_mut() {
            op.parameters = self.resolve_parameters(&op.parameters)?;

            if let Some(body) = &op.request_body {
                let body = self.inline(body, "requestBodies", |c| &c.request_bodies)?;
                self.check_content(&body.content)?;
                op.request_body = Some(RefOr::Inline(body));
            }

            for response in op.responses.values_mut() {
                let inlined = self.inline(response, "responses", |c| &c.responses)?;
                self.check_content(&inlined.content)?;
                *response = RefOr::Inline(inlined);
            }
        }
        Ok(())
    }

    fn resolve_parameters(
        &self,
        params: &[ParameterOrRef],
    ) -> Result<Vec<ParameterOrRef>, ResolveError> {
        params
            .iter()
            .map(|p| {
                let param = self.inline(p, "parameters", |c| &c.parameters)?;
                if let Some(schema) = &param.schema {
                    self.check_schema_or_ref(schema)?;
                }
                Ok(RefOr::Inline(param))
            })
            .collect()
    }

    /// Follow `value` through `section` until an inline object is reached.
    fn inline<T: Clone>(
        &self,
        value: &RefOr<T>,
        section_name: &str,
        section: Section<T>,
    ) -> Result<T, ResolveError> {
        let mut seen = HashSet::new();
        let mut current = value;
        loop {
            let ref_path = match current {
                RefOr::Inline(inline) => return Ok(inline.clone()),
                RefOr::Ref { ref_path } => ref_path,
            };
            if !seen.insert(ref_path.as_str()) {
                return Err(ResolveError::InvalidRefFormat(format!(
                    "circular reference at {ref_path}"
                )));
            }
            let name = parse_ref_name(ref_path, section_name)?;
            current = self
                .components
                .and_then(|c| section(c).get(name))
                .ok_or_else(|| ResolveError::RefTargetNotFound(ref_path.clone()))?;
        }
    }

    fn check_content(&self, content: &IndexMap<String, MediaType>) -> Result<(), ResolveError> {
        for mt in content.values() {
            for schema in mt.schema.iter().chain(mt.item_schema.iter()) {
                self.check_schema_or_ref(schema)?;
            }
        }
        Ok(())
    }

    /// Walk a schema tree and fail on the first reference that does not name
    /// a component schema.
    pub fn check_schema_or_ref(&self, schema_or_ref: &SchemaOrRef) -> Result<(), ResolveError> {
        match schema_or_ref {
            SchemaOrRef::Ref { ref_path } => {
                let name = parse_ref_name(ref_path, "schemas")?;
                if self.components.is_some_and(|c| c.schemas.contains_key(name)) {
                    Ok(())
                } else {
                    Err(ResolveError::RefTargetNotFound(ref_path.clone()))
                }
            }
            SchemaOrRef::Inline(schema) => self.check_schema(schema),
        }
    }

    fn check_schema(&self, schema: &Schema) -> Result<(), ResolveError> {
        for prop in schema.properties.values() {
            self.check_schema_or_ref(prop)?;
        }
        if let Some(items) = &schema.items {
            self.check_schema_or_ref(items)?;
        }
        for part in schema
            .all_of
            .iter()
            .chain(&schema.one_of)
            .chain(&schema.any_of)
        {
            self.check_schema_or_ref(part)?;
        }
        if let Some(AdditionalProperties::Schema(s)) = &schema.additional_properties {
            self.check_schema_or_ref(s)?;
        }
        Ok(())
    }
}

/// Parse a `$ref` path like `#/components/schemas/Foo` and extract the name.
pub fn parse_ref_name<'a>(
    ref_path: &'a str,
    expected_section: &str,
) -> Result<&'a str, ResolveError> {
    let stripped = ref_path
        .strip_prefix("#/components/")
        .ok_or_else(|| ResolveError::InvalidRefFormat(ref_path.to_string()))?;
    let (section, name) = stripped
        .split_once('/')
        .ok_or_else(|| ResolveError::InvalidRefFormat(ref_path.to_string()))?;
    if section != expected_section {
        return Err(ResolveError::InvalidRefFormat(format!(
            "expected section '{}', got '{}' in {}",
            expected_section, section, ref_path
        )));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::from_yaml;

    const DOC: &str = r##"
openapi: 3.0.3
info: { title: t, version: "1" }
paths:
  /pets/{id}:
    parameters:
      - $ref: "#/components/parameters/PetId"
    get:
      responses:
        "200":
          $ref: "#/components/responses/PetResponse"
components:
  parameters:
    PetId:
      name: id
      in: path
      required: true
      schema: { type: integer }
  responses:
    PetResponse:
      description: ok
      content:
        application/json:
          schema:
            $ref: "#/components/schemas/Pet"
  schemas:
    Pet:
      type: object
      properties:
        id: { type: integer }
"##;

    #[test]
    fn test_inlines_components_and_keeps_schema_refs() {
        let spec = from_yaml(DOC).unwrap();
        let resolved = RefResolver::new(&spec).resolve_spec(&spec).unwrap();
        let item = &resolved.paths["/pets/{id}"];
        assert_eq!(
            item.parameters[0].as_inline().map(|p| p.name.as_str()),
            Some("id")
        );
        let op = item.get.as_ref().unwrap();
        let resp = op.responses["200"]
            .as_inline()
            .expect("response should be inlined");
        let schema = resp.content["application/json"].schema.as_ref().unwrap();
        assert_eq!(schema.ref_path(), Some("#/components/schemas/Pet"));
    }

    #[test]
    fn test_dangling_schema_ref_fails() {
        let doc = DOC.replace("schemas/Pet\"", "schemas/Missing\"");
        let spec = from_yaml(&doc).unwrap();
        let err = RefResolver::new(&spec).resolve_spec(&spec).unwrap_err();
        assert!(matches!(err, ResolveError::RefTargetNotFound(r) if r.ends_with("Missing")));
    }

    #[test]
    fn test_parse_ref_name_rejects_wrong_section() {
        assert!(parse_ref_name("#/components/responses/Pet", "schemas").is_err());
        assert!(parse_ref_name("Pet.yaml", "schemas").is_err());
        assert_eq!(
            parse_ref_name("#/components/schemas/Pet", "schemas").unwrap(),
            "Pet"
        );
    }
}
