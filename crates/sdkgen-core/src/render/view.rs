use indexmap::IndexSet;
use serde::Serialize;

use crate::ir::{NormalizedName, OperationRecord, Parameter, SchemaRecord, StreamingKind};
use crate::transform::name_normalizer::normalize_name;
use crate::typemap::{Declaration, TypeExpr, TypeMapper, TypeRenderer};

/// Template data for one client method.
#[derive(Debug, Clone, Serialize)]
pub struct OperationView {
    /// Method identifier in every casing.
    pub name: NormalizedName,
    pub original_id: String,
    pub http_method: &'static str,
    /// URL template with `{placeholders}`.
    pub path: String,
    pub path_params: Vec<ParamView>,
    pub query_params: Vec<ParamView>,
    pub body: Option<BodyView>,
    pub response: ResponseView,
    pub streaming: Option<StreamingView>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub deprecated: bool,
    /// Declared types the method signature mentions.
    pub named_types: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParamView {
    /// Name on the wire.
    pub name: String,
    /// Identifier casings derived from the wire name.
    pub ident: NormalizedName,
    #[serde(rename = "type")]
    pub ty: String,
    pub required: bool,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BodyView {
    #[serde(rename = "type")]
    pub ty: String,
    pub required: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseKind {
    /// No body is returned.
    Empty,
    Typed,
    /// An array of a declared type.
    List,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResponseView {
    pub kind: ResponseKind,
    #[serde(rename = "type")]
    pub ty: Option<String>,
    pub item_type: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StreamingView {
    pub kind: StreamingKind,
    pub item_type: String,
}

/// Template data for one declared schema.
#[derive(Debug, Clone, Serialize)]
pub struct SchemaView {
    pub name: String,
    pub description: Option<String>,
    /// `object`, `enum` or `alias`.
    pub kind: &'static str,
    pub fields: Vec<FieldView>,
    pub additional: Option<String>,
    pub values: Vec<String>,
    pub target: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldView {
    pub name: String,
    pub ident: NormalizedName,
    #[serde(rename = "type")]
    pub ty: String,
    pub required: bool,
}

impl OperationView {
    pub fn build<R: TypeRenderer + ?Sized>(
        op: &OperationRecord,
        mapper: &TypeMapper,
        renderer: &R,
    ) -> Self {
        let mut named = IndexSet::new();
        let mut render = |expr: TypeExpr| {
            expr.collect_named(&mut named);
            renderer.render(&expr)
        };

        let path_params = op
            .path_params
            .iter()
            .map(|p| param_view(p, render(mapper.map_shape(&p.shape))))
            .collect();
        let query_params = op
            .query_params
            .iter()
            .map(|p| param_view(p, render(mapper.map_shape(&p.shape))))
            .collect();
        let body = op.request_body.as_ref().map(|b| BodyView {
            ty: render(mapper.map_shape(&b.shape)),
            required: b.required,
        });

        let response = match op.response.as_ref().map(|s| mapper.map_shape(s)) {
            None => ResponseView {
                kind: ResponseKind::Empty,
                ty: None,
                item_type: None,
            },
            Some(TypeExpr::Array(item)) if matches!(*item, TypeExpr::Named(_)) => {
                let item_type = render((*item).clone());
                ResponseView {
                    kind: ResponseKind::List,
                    ty: Some(render(TypeExpr::Array(item))),
                    item_type: Some(item_type),
                }
            }
            Some(expr) => ResponseView {
                kind: ResponseKind::Typed,
                ty: Some(render(expr)),
                item_type: None,
            },
        };

        let streaming = op.streaming.as_ref().map(|s| StreamingView {
            kind: s.kind,
            item_type: render(mapper.map_shape(&s.item)),
        });

        Self {
            name: normalize_name(&op.id),
            original_id: op.original_id.clone(),
            http_method: op.method.as_str(),
            path: op.path.clone(),
            path_params,
            query_params,
            body,
            response,
            streaming,
            summary: op.summary.clone(),
            description: op.description.clone(),
            deprecated: op.deprecated,
            named_types: named.into_iter().collect(),
        }
    }

    pub fn has_required_query(&self) -> bool {
        self.query_params.iter().any(|p| p.required)
    }
}

fn param_view(p: &Parameter, ty: String) -> ParamView {
    ParamView {
        name: p.name.clone(),
        ident: normalize_name(&p.name),
        ty,
        required: p.required,
        description: p.description.clone(),
    }
}

impl SchemaView {
    pub fn build<R: TypeRenderer + ?Sized>(
        record: &SchemaRecord,
        mapper: &TypeMapper,
        renderer: &R,
    ) -> Self {
        let mut view = Self {
            name: record.name.clone(),
            description: record.description.clone(),
            kind: "alias",
            fields: Vec::new(),
            additional: None,
            values: Vec::new(),
            target: None,
        };
        match mapper.declare(record) {
            Declaration::Object { fields, additional } => {
                view.kind = "object";
                view.fields = fields
                    .into_iter()
                    .map(|f| FieldView {
                        ident: normalize_name(&f.name),
                        ty: renderer.render(&f.ty),
                        name: f.name,
                        required: f.required,
                    })
                    .collect();
                view.additional = additional.map(|a| renderer.render(&a));
            }
            Declaration::Enum(values) => {
                view.kind = "enum";
                view.values = values;
            }
            Declaration::Alias(target) => {
                view.target = Some(renderer.render(&target));
            }
        }
        view
    }
}

/// Views for a run of operations, in order.
pub fn operation_views<R: TypeRenderer + ?Sized>(
    ops: &[OperationRecord],
    mapper: &TypeMapper,
    renderer: &R,
) -> Vec<OperationView> {
    ops.iter()
        .map(|op| OperationView::build(op, mapper, renderer))
        .collect()
}

/// Union of the declared types mentioned by `views`, in first-seen order.
pub fn named_types(views: &[OperationView]) -> Vec<String> {
    let mut all = IndexSet::new();
    for view in views {
        all.extend(view.named_types.iter().cloned());
    }
    all.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{HttpMethod, ObjectShape, RequestBody, Shape, Streaming};
    use crate::typemap::FingerprintMode;

    struct Plain;

    impl TypeRenderer for Plain {
        fn render(&self, expr: &TypeExpr) -> String {
            match expr {
                TypeExpr::Named(n) => n.clone(),
                TypeExpr::Array(inner) => format!("[{}]", self.render(inner)),
                TypeExpr::String => "str".into(),
                other => format!("{other:?}"),
            }
        }
    }

    fn op() -> OperationRecord {
        OperationRecord {
            id: "listPets".into(),
            original_id: "listPets".into(),
            method: HttpMethod::Get,
            path: "/pets/{owner}".into(),
            summary: None,
            description: None,
            deprecated: false,
            path_params: vec![Parameter {
                name: "owner".into(),
                required: true,
                shape: Shape::plain_string(),
                description: None,
            }],
            query_params: vec![],
            request_body: None,
            response: Some(Shape::Array(Box::new(Shape::Reference("Pet".into())))),
            streaming: None,
        }
    }

    #[test]
    fn test_list_response() {
        let mapper = TypeMapper::new(&[], FingerprintMode::PropertyNames);
        let view = OperationView::build(&op(), &mapper, &Plain);
        assert_eq!(view.response.kind, ResponseKind::List);
        assert_eq!(view.response.ty.as_deref(), Some("[Pet]"));
        assert_eq!(view.response.item_type.as_deref(), Some("Pet"));
        assert_eq!(view.named_types, ["Pet"]);
        assert_eq!(view.name.snake_case, "list_pets");
    }

    #[test]
    fn test_empty_response_and_streaming() {
        let mapper = TypeMapper::new(&[], FingerprintMode::PropertyNames);
        let mut record = op();
        record.response = None;
        record.request_body = Some(RequestBody {
            required: true,
            shape: Shape::Object(ObjectShape::default()),
        });
        record.streaming = Some(Streaming {
            kind: StreamingKind::Ndjson,
            item: Shape::Reference("Event".into()),
        });
        let view = OperationView::build(&record, &mapper, &Plain);
        assert_eq!(view.response.kind, ResponseKind::Empty);
        assert_eq!(view.body.unwrap().ty, "OpenObject");
        assert_eq!(view.streaming.unwrap().item_type, "Event");
        assert_eq!(view.named_types, ["Event"]);
    }
}
