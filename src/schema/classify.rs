use serde_json::Value;

use crate::domain::PropertyType;

use super::resolver::ReferenceResolver;

/// Maps a raw schema node to its base [`PropertyType`].
///
/// `$ref` nodes are classified through their target. When `type` lists
/// several types only the first is honored. Missing, `null` or unknown types
/// fall back to [`PropertyType::String`]. Name-driven refinements (color,
/// icon) and enums are the mapper's job.
pub fn classify(resolver: &ReferenceResolver<'_>, node: &Value) -> PropertyType {
    classify_inline(resolver.follow(node))
}

/// Classifies `node` by its own `type` keyword, ignoring any `$ref`.
pub(crate) fn classify_inline(node: &Value) -> PropertyType {
    match declared_type(node) {
        Some("string") => PropertyType::String,
        Some("number" | "integer") => PropertyType::Number,
        Some("boolean") => PropertyType::Boolean,
        Some("object") => PropertyType::Object,
        Some("array") => PropertyType::Array,
        _ => PropertyType::String,
    }
}

fn declared_type(node: &Value) -> Option<&str> {
    match node.get("type")? {
        Value::String(kind) => Some(kind.as_str()),
        Value::Array(kinds) => kinds.first().and_then(Value::as_str),
        _ => None,
    }
}
