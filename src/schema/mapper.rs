use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::domain::{EnumOption, PropertyDefinition, PropertyType};

use super::{
    classify::classify_inline,
    metadata::{format_enum_label, format_label},
    resolver::{RefTrail, ReferenceResolver},
};

/// Name given to the definition describing every element of an array.
pub const ARRAY_ITEM_NAME: &str = "item";

const COLOR_FORMAT: &str = "color";
const COLOR_NAMES: [&str; 2] = ["foreground", "background"];
const ICON_MARKERS: [&str; 3] = ["icon", "glyph", "symbol"];
const PASSTHROUGH_FORMATS: [&str; 7] = [
    "date",
    "date-time",
    "time",
    "email",
    "uri",
    "uri-reference",
    "hostname",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapperOptions {
    /// Object/array nesting below which children and item types are no
    /// longer mapped.
    pub max_depth: usize,
}

impl Default for MapperOptions {
    fn default() -> Self {
        Self { max_depth: 64 }
    }
}

impl MapperOptions {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Turns raw schema nodes into [`PropertyDefinition`] trees.
///
/// Mapping is total: unresolvable or cyclic `$ref`s, unknown types and
/// malformed keywords all degrade to plain string definitions.
#[derive(Debug, Clone, Copy)]
pub struct PropertyMapper<'a> {
    resolver: ReferenceResolver<'a>,
    options: MapperOptions,
}

impl<'a> PropertyMapper<'a> {
    pub fn new(resolver: ReferenceResolver<'a>) -> Self {
        Self {
            resolver,
            options: MapperOptions::default(),
        }
    }

    pub fn with_options(mut self, options: MapperOptions) -> Self {
        self.options = options;
        self
    }

    pub fn resolver(&self) -> &ReferenceResolver<'a> {
        &self.resolver
    }

    pub fn map(&self, name: &str, node: &Value, required: bool) -> PropertyDefinition {
        let mut trail = RefTrail::new();
        self.map_node(name, node, required, &mut trail, 0)
    }

    /// Maps every entry of an object node's `properties`, in source order,
    /// taking `required` flags from the node's `required` array.
    pub fn map_properties(&self, node: &Value) -> Vec<PropertyDefinition> {
        let mut trail = RefTrail::new();
        let (current, _) = self.resolver.unwind(node, &mut trail);
        match properties_of(current) {
            Some(properties) => {
                self.map_children(properties, &required_set(current), &mut trail, 0)
            }
            None => Vec::new(),
        }
    }

    fn map_node(
        &self,
        name: &str,
        node: &Value,
        required: bool,
        trail: &mut RefTrail,
        depth: usize,
    ) -> PropertyDefinition {
        let (node, hops) = self.resolver.unwind(node, trail);
        let definition = self.map_resolved(name, node, required, trail, depth);
        for _ in 0..hops {
            trail.leave();
        }
        definition
    }

    /// Maps a node whose own `$ref` (if any) is unresolved or cyclic.
    fn map_resolved(
        &self,
        name: &str,
        node: &Value,
        required: bool,
        trail: &mut RefTrail,
        depth: usize,
    ) -> PropertyDefinition {
        let mut definition = PropertyDefinition {
            name: name.to_string(),
            property_type: classify_inline(node),
            label: format_label(name),
            description: node
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            default_value: node.get("default").cloned(),
            required,
            enum_values: None,
            minimum: node.get("minimum").and_then(Value::as_number).cloned(),
            maximum: node.get("maximum").and_then(Value::as_number).cloned(),
            pattern: node
                .get("pattern")
                .and_then(Value::as_str)
                .map(str::to_string),
            format: None,
            children: None,
            item_type: None,
        };

        refine_format(&mut definition, node);
        refine_enum(&mut definition, node);

        let nested = depth + 1;
        match definition.property_type {
            PropertyType::Object => {
                if let Some(properties) = properties_of(node)
                    && self.within_depth(name, nested)
                {
                    definition.children = Some(self.map_children(
                        properties,
                        &required_set(node),
                        trail,
                        nested,
                    ));
                }
            }
            PropertyType::Array => {
                if let Some(items) = items_of(node)
                    && self.within_depth(name, nested)
                {
                    definition.item_type = Some(Box::new(self.map_node(
                        ARRAY_ITEM_NAME,
                        items,
                        false,
                        trail,
                        nested,
                    )));
                }
            }
            _ => {}
        }

        definition
    }

    fn map_children(
        &self,
        properties: &Map<String, Value>,
        required: &HashSet<&str>,
        trail: &mut RefTrail,
        depth: usize,
    ) -> Vec<PropertyDefinition> {
        properties
            .iter()
            .map(|(child, schema)| {
                self.map_node(child, schema, required.contains(child.as_str()), trail, depth)
            })
            .collect()
    }

    fn within_depth(&self, name: &str, depth: usize) -> bool {
        if depth > self.options.max_depth {
            tracing::warn!(
                property = name,
                max_depth = self.options.max_depth,
                "schema nesting too deep, skipping nested properties"
            );
            return false;
        }
        true
    }
}

/// Color wins over icon; path-like formats are kept as metadata only.
/// Name matching never turns an object or array into a scalar control.
fn refine_format(definition: &mut PropertyDefinition, node: &Value) {
    let format = node.get("format").and_then(Value::as_str);
    let name = definition.name.as_str();
    let by_name = !matches!(
        definition.property_type,
        PropertyType::Object | PropertyType::Array
    );

    if format == Some(COLOR_FORMAT)
        || (by_name && (name.contains("color") || COLOR_NAMES.contains(&name)))
    {
        definition.property_type = PropertyType::Color;
    } else if by_name && ICON_MARKERS.iter().any(|marker| name.contains(marker)) {
        definition.property_type = PropertyType::Icon;
    } else if let Some(format) = format.filter(|f| PASSTHROUGH_FORMATS.contains(f)) {
        definition.format = Some(format.to_string());
    }
}

fn refine_enum(definition: &mut PropertyDefinition, node: &Value) {
    let Some(values) = node.get("enum").and_then(Value::as_array) else {
        return;
    };
    if values.is_empty() {
        return;
    }

    definition.property_type = PropertyType::Enum;
    definition.enum_values = Some(
        values
            .iter()
            .map(|value| EnumOption {
                value: value.clone(),
                label: format_enum_label(&enum_value_text(value)),
            })
            .collect(),
    );
}

fn enum_value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn properties_of(node: &Value) -> Option<&Map<String, Value>> {
    node.get("properties").and_then(Value::as_object)
}

fn items_of(node: &Value) -> Option<&Value> {
    match node.get("items")? {
        Value::Array(tuple) => tuple.first(),
        Value::Null => None,
        single => Some(single),
    }
}

fn required_set(node: &Value) -> HashSet<&str> {
    node.get("required")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}
