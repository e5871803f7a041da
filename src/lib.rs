#![deny(rust_2018_idioms)]
//! Schema-driven form model for oh-my-posh prompt themes.
//!
//! A segment's JSON Schema fragment is mapped into [`PropertyDefinition`]
//! trees (typed, labelled, with nested objects and homogeneous arrays),
//! projected into [`ControlDescriptor`]s for a renderer, and mined for the
//! defaults a freshly added segment starts with.
//!
//! ```
//! use ompform::{EditorSession, PropertyType};
//! use serde_json::json;
//!
//! let mut session = EditorSession::new(json!({
//!     "definitions": {
//!         "gitSegment": {
//!             "properties": {
//!                 "properties": {
//!                     "properties": {
//!                         "fetch_status": {"type": "boolean", "default": false},
//!                         "branch_icon": {"type": "string"}
//!                     }
//!                 }
//!             }
//!         }
//!     }
//! }));
//! let form = session.segment_form("git").unwrap();
//! assert_eq!(form.properties[1].property_type, PropertyType::Icon);
//! assert_eq!(form.defaults["fetch_status"], json!(false));
//! ```

mod cache;
mod domain;
mod form;
mod io;
mod schema;
mod session;
mod theme;
mod validation;

pub use cache::{CacheKey, CacheStats, SchemaCache};
pub use domain::{
    ControlDescriptor, ControlProps, ControlValidation, EnumOption, PropertyDefinition,
    PropertyType,
};
pub use form::{
    apply_defaults, extract_defaults, extract_defaults_from, form_blueprint, project, project_all,
    property_blueprint, schema_defaults,
};
pub use io::{
    DocumentFormat, OutputDestination, OutputOptions, emit, parse_document_str,
    parse_document_with_fallback, read_document, serialize_value,
};
pub use schema::{
    ARRAY_ITEM_NAME, FALLBACK_SEGMENT_DEFINITION, MapperOptions, PropertyMapper, RefStep, RefTrail,
    ReferenceResolver, SchemaDocument, SchemaLookupError, SegmentMatch, SegmentSchema, classify,
    format_enum_label, format_label, locate_segment, reference_of,
};
pub use session::{EditorSession, SegmentForm, SessionOptions, empty_form_notice};
pub use theme::{PathSegment, PropertyPath, Theme};
pub use validation::{ThemeIssue, ValidationReport, validate_theme};

pub mod prelude {
    pub use super::{
        ControlDescriptor, EditorSession, PropertyDefinition, PropertyMapper, PropertyType,
        SchemaDocument, SegmentForm, SessionOptions, Theme,
    };
}
