//! Schema traversal: reference resolution, type classification and mapping of
//! raw JSON Schema nodes into [`PropertyDefinition`](crate::PropertyDefinition)
//! trees.

mod classify;
mod document;
mod locator;
mod mapper;
mod metadata;
mod resolver;

pub use classify::classify;
pub use document::SchemaDocument;
pub use locator::{
    FALLBACK_SEGMENT_DEFINITION, SchemaLookupError, SegmentMatch, SegmentSchema, locate_segment,
};
pub use mapper::{ARRAY_ITEM_NAME, MapperOptions, PropertyMapper};
pub use metadata::{format_enum_label, format_label};
pub use resolver::{RefStep, RefTrail, ReferenceResolver, reference_of};
