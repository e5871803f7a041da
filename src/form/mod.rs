//! Consumers of mapped definitions: control projection, defaults and JSON
//! blueprints for renderers.

mod blueprint;
mod control;
mod defaults;

pub use blueprint::{form_blueprint, property_blueprint};
pub use control::{project, project_all};
pub use defaults::{apply_defaults, extract_defaults, extract_defaults_from, schema_defaults};
