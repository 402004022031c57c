use indexmap::IndexMap;

use crate::ir::{ObjectShape, Shape};
use crate::parse::schema::{AdditionalProperties, Schema, SchemaOrRef, SchemaType};

/// Converts parsed JSON Schema fragments into [`Shape`]s.
///
/// Component references stay references. The component table is only
/// consulted to flatten `allOf` parts.
pub struct ShapeResolver<'a> {
    components: Option<&'a IndexMap<String, SchemaOrRef>>,
}

impl ObjectShape {
    /// Required names are collected from every part first, so a part may
    /// require a property another part declares.
    fn drop_undeclared_required(&mut self) {
        let properties = &self.properties;
        self.required.retain(|name| properties.contains_key(name));
    }
}

impl<'a> ShapeResolver<'a> {
    pub fn new(components: Option<&'a IndexMap<String, SchemaOrRef>>) -> Self {
        Self { components }
    }

    pub fn shape_of(&self, schema_or_ref: &SchemaOrRef) -> Shape {
        match schema_or_ref {
            SchemaOrRef::Ref { ref_path } => match ref_name(ref_path) {
                Some(name) => Shape::Reference(name.to_string()),
                None => {
                    log::debug!("unsupported reference {ref_path}, using unknown");
                    Shape::Unknown
                }
            },
            SchemaOrRef::Inline(schema) => self.shape_of_schema(schema),
        }
    }

    pub fn shape_of_schema(&self, schema: &Schema) -> Shape {
        if !schema.all_of.is_empty() {
            return self.all_of_shape(schema);
        }

        if !schema.one_of.is_empty() || !schema.any_of.is_empty() {
            return self.single_variant(schema);
        }

        if let Some(values) = string_enum(schema) {
            return Shape::String {
                enum_values: values,
                format: schema.format.clone(),
            };
        }

        if let Some(serde_json::Value::String(value)) = &schema.const_value {
            return Shape::String {
                enum_values: vec![value.clone()],
                format: schema.format.clone(),
            };
        }

        let Some(type_set) = &schema.schema_type else {
            return self.untyped(schema);
        };
        let Some(schema_type) = type_set.non_null() else {
            log::debug!("schema with type {type_set:?} has no single non-null type, using unknown");
            return Shape::Unknown;
        };

        match schema_type {
            SchemaType::String => Shape::String {
                enum_values: Vec::new(),
                format: schema.format.clone(),
            },
            SchemaType::Integer => Shape::Integer {
                format: schema.format.clone(),
            },
            SchemaType::Number => Shape::Number {
                format: schema.format.clone(),
            },
            SchemaType::Boolean => Shape::Boolean,
            SchemaType::Array => Shape::Array(Box::new(self.items_shape(schema))),
            SchemaType::Object => Shape::Object(self.object_shape(schema)),
            SchemaType::Null => Shape::Unknown,
        }
    }

    fn untyped(&self, schema: &Schema) -> Shape {
        if !schema.properties.is_empty() || schema.additional_properties.is_some() {
            Shape::Object(self.object_shape(schema))
        } else if schema.items.is_some() {
            Shape::Array(Box::new(self.items_shape(schema)))
        } else {
            Shape::Unknown
        }
    }

    fn items_shape(&self, schema: &Schema) -> Shape {
        schema
            .items
            .as_deref()
            .map_or(Shape::Unknown, |items| self.shape_of(items))
    }

    fn object_shape(&self, schema: &Schema) -> ObjectShape {
        let mut object = ObjectShape::default();
        self.merge_properties(schema, &mut object);
        object.drop_undeclared_required();
        object
    }

    fn merge_properties(&self, schema: &Schema, into: &mut ObjectShape) {
        for (name, prop) in &schema.properties {
            into.properties.insert(name.clone(), self.shape_of(prop));
        }
        into.required.extend(schema.required.iter().cloned());
        if into.additional_properties.is_none() {
            into.additional_properties = match &schema.additional_properties {
                Some(AdditionalProperties::Bool(true)) => Some(Box::new(Shape::Unknown)),
                Some(AdditionalProperties::Schema(s)) => Some(Box::new(self.shape_of(s))),
                Some(AdditionalProperties::Bool(false)) | None => None,
            };
        }
    }

    fn all_of_shape(&self, schema: &Schema) -> Shape {
        if let [only] = schema.all_of.as_slice()
            && schema.properties.is_empty()
            && schema.required.is_empty()
        {
            return self.shape_of(only);
        }

        let mut object = ObjectShape::default();
        let mut stack = Vec::new();
        self.merge_all_of(schema, &mut object, &mut stack);
        object.drop_undeclared_required();
        Shape::Object(object)
    }

    /// Merge the parts of `schema.allOf`, then its own properties.
    fn merge_all_of<'s>(&'s self, schema: &'s Schema, into: &mut ObjectShape, stack: &mut Vec<&'s str>) {
        for part in &schema.all_of {
            match part {
                SchemaOrRef::Ref { ref_path } => {
                    let Some(name) = ref_name(ref_path) else {
                        continue;
                    };
                    if stack.contains(&name) {
                        log::debug!("allOf cycle through {name}, skipping");
                        continue;
                    }
                    match self.lookup(name) {
                        Some(target) => {
                            stack.push(name);
                            self.merge_all_of(target, into, stack);
                            stack.pop();
                        }
                        None => log::debug!("allOf part {ref_path} is not an inline schema"),
                    }
                }
                SchemaOrRef::Inline(inner) => self.merge_all_of(inner, into, stack),
            }
        }
        self.merge_properties(schema, into);
    }

    fn lookup(&self, name: &str) -> Option<&'a Schema> {
        match self.components?.get(name)? {
            SchemaOrRef::Inline(schema) => Some(schema),
            SchemaOrRef::Ref { .. } => None,
        }
    }

    fn single_variant(&self, schema: &Schema) -> Shape {
        let variants = if schema.one_of.is_empty() {
            &schema.any_of
        } else {
            &schema.one_of
        };
        let mut non_null = variants.iter().filter(|v| match v {
            SchemaOrRef::Inline(s) => !s.is_null_only(),
            SchemaOrRef::Ref { .. } => true,
        });
        match (non_null.next(), non_null.next()) {
            (Some(only), None) => self.shape_of(only),
            _ => {
                log::debug!("union of {} variants has no single shape, using unknown", variants.len());
                Shape::Unknown
            }
        }
    }
}

/// The schema name of a `#/components/schemas/<name>` reference.
pub fn ref_name(ref_path: &str) -> Option<&str> {
    ref_path
        .strip_prefix("#/components/schemas/")
        .filter(|name| !name.is_empty())
}

fn string_enum(schema: &Schema) -> Option<Vec<String>> {
    if schema.enum_values.is_empty() {
        return None;
    }
    let mut values = Vec::with_capacity(schema.enum_values.len());
    for value in &schema.enum_values {
        match value {
            serde_json::Value::String(s) => values.push(s.clone()),
            serde_json::Value::Null => {}
            _ => return None,
        }
    }
    (!values.is_empty()).then_some(values)
}
