use serde::Serialize;
use serde_json::{Number, Value};

use super::property::{EnumOption, PropertyDefinition};

/// Declarative description of the widget a renderer should build for one
/// property. Always derived fresh from a [`PropertyDefinition`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlDescriptor {
    pub control_kind: &'static str,
    pub props: ControlProps,
    pub validation: ControlValidation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlProps {
    pub label: String,
    pub description: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<EnumOption>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_type: Option<Box<PropertyDefinition>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<PropertyDefinition>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ControlValidation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<Number>,
}

impl ControlValidation {
    pub fn is_empty(&self) -> bool {
        self.pattern.is_none() && self.min.is_none() && self.max.is_none()
    }
}
