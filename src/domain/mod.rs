mod control;
mod property;

pub use control::{ControlDescriptor, ControlProps, ControlValidation};
pub use property::{EnumOption, PropertyDefinition, PropertyType};
