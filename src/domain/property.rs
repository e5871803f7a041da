use std::fmt;

use serde::Serialize;
use serde_json::{Number, Value};

/// The kind of value a single configurable property holds.
///
/// `Color` and `Icon` are refinements of `String` picked from the property
/// name or an explicit `format: "color"`. `Enum` wins over every other kind
/// whenever the schema node lists `enum` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PropertyType {
    String,
    Number,
    Boolean,
    Object,
    Array,
    Enum,
    Color,
    Icon,
    Format,
}

impl PropertyType {
    pub const ALL: [PropertyType; 9] = [
        PropertyType::String,
        PropertyType::Number,
        PropertyType::Boolean,
        PropertyType::Object,
        PropertyType::Array,
        PropertyType::Enum,
        PropertyType::Color,
        PropertyType::Icon,
        PropertyType::Format,
    ];

    /// Upper-case tag, as used in serialized definitions.
    pub fn tag(self) -> &'static str {
        match self {
            PropertyType::String => "STRING",
            PropertyType::Number => "NUMBER",
            PropertyType::Boolean => "BOOLEAN",
            PropertyType::Object => "OBJECT",
            PropertyType::Array => "ARRAY",
            PropertyType::Enum => "ENUM",
            PropertyType::Color => "COLOR",
            PropertyType::Icon => "ICON",
            PropertyType::Format => "FORMAT",
        }
    }

    /// Lower-case tag naming the control a renderer should use.
    pub fn control_kind(self) -> &'static str {
        match self {
            PropertyType::String => "string",
            PropertyType::Number => "number",
            PropertyType::Boolean => "boolean",
            PropertyType::Object => "object",
            PropertyType::Array => "array",
            PropertyType::Enum => "enum",
            PropertyType::Color => "color",
            PropertyType::Icon => "icon",
            PropertyType::Format => "format",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// One selectable value of an enum property.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumOption {
    pub value: Value,
    pub label: String,
}

/// Typed, labelled description of one configurable value, derived purely from
/// a schema node.
///
/// `children` is only set for objects whose schema declared `properties`,
/// `item_type` only for arrays whose schema declared `items`, and
/// `enum_values` only for enums.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    pub label: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<EnumOption>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<PropertyDefinition>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_type: Option<Box<PropertyDefinition>>,
}

impl PropertyDefinition {
    pub fn is_object(&self) -> bool {
        self.property_type == PropertyType::Object
    }

    pub fn children(&self) -> &[PropertyDefinition] {
        self.children.as_deref().unwrap_or_default()
    }

    pub fn child(&self, name: &str) -> Option<&PropertyDefinition> {
        self.children().iter().find(|child| child.name == name)
    }

    /// Serialize into a plain JSON value, e.g. for golden-file comparisons.
    pub fn to_value(&self) -> Value {
        // Every field is plain data, serialization cannot fail.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
