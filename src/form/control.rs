use crate::domain::{
    ControlDescriptor, ControlProps, ControlValidation, PropertyDefinition, PropertyType,
};

/// Projects a definition into the descriptor a renderer consumes.
///
/// Never touches the schema; everything comes from `definition`.
pub fn project(definition: &PropertyDefinition) -> ControlDescriptor {
    let mut props = ControlProps {
        label: definition.label.clone(),
        description: definition.description.clone(),
        required: definition.required,
        default_value: definition.default_value.clone(),
        options: None,
        item_type: None,
        children: None,
    };

    match definition.property_type {
        PropertyType::Enum => props.options = definition.enum_values.clone(),
        PropertyType::Array => props.item_type = definition.item_type.clone(),
        PropertyType::Object => props.children = definition.children.clone(),
        _ => {}
    }

    ControlDescriptor {
        control_kind: definition.property_type.control_kind(),
        props,
        validation: ControlValidation {
            pattern: definition.pattern.clone(),
            min: definition.minimum.clone(),
            max: definition.maximum.clone(),
        },
    }
}

pub fn project_all(definitions: &[PropertyDefinition]) -> Vec<ControlDescriptor> {
    definitions.iter().map(project).collect()
}
