use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use super::document::SchemaDocument;

/// Definition used when nothing more specific matches a segment type.
pub const FALLBACK_SEGMENT_DEFINITION: &str = "segment";

const COMPOSITION_KEYWORDS: [&str; 3] = ["allOf", "anyOf", "oneOf"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaLookupError {
    #[error("no schema available for segment type '{segment_type}'")]
    NoSchema { segment_type: String },
}

/// How a segment definition was found, most specific first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentMatch {
    Exact,
    Substring,
    Composition,
    Fallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SegmentSchema<'a> {
    pub segment_type: String,
    pub definition_key: String,
    pub matched: SegmentMatch,
    pub node: &'a Value,
}

impl<'a> SegmentSchema<'a> {
    /// The node describing the segment's own `properties` object.
    ///
    /// oh-my-posh nests segment options as `properties.properties`. A node
    /// without that layout (e.g. the generic `segment` definition, whose
    /// `properties` object is free-form) has no options; its own keys such as
    /// `style` or `foreground` belong to the segment, not to its options.
    pub fn options_node(&self, document: &'a SchemaDocument) -> Option<&'a Value> {
        let options = self.node.get("properties")?.get("properties")?;
        let options = document.resolver().follow(options);
        options
            .get("properties")
            .is_some_and(Value::is_object)
            .then_some(options)
    }
}

/// Finds the most specific definition describing `segment_type`.
///
/// Search order: an exact `<type>Segment` key, a key containing the type, a
/// composition branch whose `type` property names the segment, and finally
/// the generic `segment` definition.
pub fn locate_segment<'a>(
    document: &'a SchemaDocument,
    segment_type: &str,
) -> Result<SegmentSchema<'a>, SchemaLookupError> {
    let definitions = document.definitions();
    let found = |key: &str, matched: SegmentMatch, node: &'a Value| SegmentSchema {
        segment_type: segment_type.to_string(),
        definition_key: key.to_string(),
        matched,
        node,
    };

    if !segment_type.is_empty() {
        let exact = format!("{segment_type}Segment");
        if let Some((key, node)) = definitions
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(&exact))
        {
            return Ok(found(key, SegmentMatch::Exact, node));
        }

        let needle = segment_type.to_ascii_lowercase();
        if let Some((key, node)) = definitions
            .iter()
            .find(|(key, _)| key.to_ascii_lowercase().contains(&needle))
        {
            return Ok(found(key, SegmentMatch::Substring, node));
        }

        for (key, definition) in definitions {
            if let Some(branch) = composition_branch(definition, segment_type) {
                return Ok(found(key, SegmentMatch::Composition, branch));
            }
        }
    }

    if let Some(node) = definitions.get(FALLBACK_SEGMENT_DEFINITION) {
        tracing::debug!(segment_type, "using generic segment definition");
        return Ok(found(FALLBACK_SEGMENT_DEFINITION, SegmentMatch::Fallback, node));
    }

    Err(SchemaLookupError::NoSchema {
        segment_type: segment_type.to_string(),
    })
}

fn composition_branch<'a>(definition: &'a Value, segment_type: &str) -> Option<&'a Value> {
    COMPOSITION_KEYWORDS
        .iter()
        .filter_map(|keyword| definition.get(*keyword).and_then(Value::as_array))
        .flatten()
        .find(|branch| {
            names_segment(branch, segment_type)
                || branch
                    .get("if")
                    .is_some_and(|condition| names_segment(condition, segment_type))
        })
        .map(|branch| branch.get("then").unwrap_or(branch))
}

fn names_segment(node: &Value, segment_type: &str) -> bool {
    let Some(type_schema) = node.get("properties").and_then(|p| p.get("type")) else {
        return false;
    };
    let in_enum = type_schema
        .get("enum")
        .and_then(Value::as_array)
        .is_some_and(|values| values.iter().any(|v| v.as_str() == Some(segment_type)));
    let is_const = type_schema.get("const").and_then(Value::as_str) == Some(segment_type);
    in_enum || is_const
}
