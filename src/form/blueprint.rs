use serde_json::{Map, Value, json};

use crate::{
    domain::{PropertyDefinition, PropertyType},
    session::SegmentForm,
};

use super::control::project;

/// Builds the JSON UI blueprint of a segment form: the fields and widgets a
/// renderer needs, without binding to any UI toolkit.
pub fn form_blueprint(form: &SegmentForm) -> Value {
    json!({
        "segment_type": form.segment_type,
        "definition": form.definition_key,
        "match": form.matched,
        "notice": form.notice(),
        "defaults": form.defaults,
        "fields": form.properties.iter().map(property_blueprint).collect::<Vec<_>>(),
    })
}

pub fn property_blueprint(definition: &PropertyDefinition) -> Value {
    let control = project(definition);
    let mut base = Map::new();
    base.insert("name".into(), Value::String(definition.name.clone()));
    base.insert("label".into(), Value::String(control.props.label));
    if !control.props.description.is_empty() {
        base.insert(
            "description".into(),
            Value::String(control.props.description),
        );
    }
    base.insert("required".into(), Value::Bool(control.props.required));
    if let Some(default) = control.props.default_value {
        base.insert("default".into(), default);
    }
    if !control.validation.is_empty()
        && let Ok(value) = serde_json::to_value(&control.validation)
    {
        base.insert("validation".into(), value);
    }
    base.insert("widget".into(), widget_blueprint(definition));
    Value::Object(base)
}

fn widget_blueprint(definition: &PropertyDefinition) -> Value {
    let kind = definition.property_type.control_kind();
    match definition.property_type {
        PropertyType::String | PropertyType::Format => match &definition.format {
            Some(format) => json!({"component": "text", "data_type": kind, "format": format}),
            None => json!({"component": "text", "data_type": kind}),
        },
        PropertyType::Number => json!({"component": "text", "data_type": kind}),
        PropertyType::Boolean => json!({"component": "boolean"}),
        PropertyType::Color => json!({"component": "color_picker"}),
        PropertyType::Icon => json!({"component": "icon_picker"}),
        PropertyType::Enum => json!({
            "component": "enum",
            "options": definition.enum_values,
        }),
        PropertyType::Array => json!({
            "component": "array",
            "reorderable": true,
            "item": definition.item_type.as_deref().map(property_blueprint),
        }),
        PropertyType::Object => json!({
            "component": "object",
            "fields": definition.children().iter().map(property_blueprint).collect::<Vec<_>>(),
        }),
    }
}
