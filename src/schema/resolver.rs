use std::collections::HashMap;

use percent_encoding::percent_decode_str;
use serde_json::{Map, Value};

const DEFINITIONS_PREFIX: &str = "#/definitions/";

/// Resolves `#/definitions/<name>[/<nested>...]` pointers against the
/// `definitions` map captured at construction.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceResolver<'a> {
    definitions: &'a Map<String, Value>,
}

/// Outcome of looking at a node that may carry a `$ref`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RefStep<'a> {
    /// The node has no string `$ref`.
    Inline,
    /// The reference points at this node.
    Resolved(&'a Value),
    /// The reference cannot be walked to a value.
    Unresolved,
    /// The reference is already being expanded further up the current path.
    Cycle,
}

/// The `$ref`s being expanded along one mapping path, outermost first.
#[derive(Debug, Clone, Default)]
pub struct RefTrail {
    active: Vec<String>,
    counts: HashMap<String, usize>,
}

impl RefTrail {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, reference: &str) -> bool {
        self.counts.contains_key(reference)
    }

    pub fn enter(&mut self, reference: &str) {
        self.active.push(reference.to_string());
        *self.counts.entry(reference.to_string()).or_default() += 1;
    }

    pub fn leave(&mut self) {
        let Some(reference) = self.active.pop() else {
            return;
        };
        if let Some(count) = self.counts.get_mut(&reference) {
            *count -= 1;
            if *count == 0 {
                self.counts.remove(&reference);
            }
        }
    }

    pub fn depth(&self) -> usize {
        self.active.len()
    }
}

impl<'a> ReferenceResolver<'a> {
    pub fn new(definitions: &'a Map<String, Value>) -> Self {
        Self { definitions }
    }

    pub fn definitions(&self) -> &'a Map<String, Value> {
        self.definitions
    }

    /// Walks `reference` through the definitions map. Anything other than a
    /// `#/definitions/...` pointer, or a pointer with a missing segment,
    /// yields `None`.
    pub fn resolve(&self, reference: &str) -> Option<&'a Value> {
        let path = reference.strip_prefix(DEFINITIONS_PREFIX)?;
        let mut segments = path.split('/');
        let first = decode_segment(segments.next()?)?;
        let mut current = self.definitions.get(&first)?;
        for raw in segments {
            let segment = decode_segment(raw)?;
            current = match current {
                Value::Object(map) => map.get(&segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Classifies the `$ref` of `node`, if any, against the refs already on
    /// `trail`.
    pub fn step(&self, node: &Value, trail: &RefTrail) -> RefStep<'a> {
        let Some(reference) = reference_of(node) else {
            return RefStep::Inline;
        };
        if trail.contains(reference) {
            tracing::warn!(reference, "cyclic $ref, falling back to an untyped node");
            return RefStep::Cycle;
        }
        match self.resolve(reference) {
            Some(target) => RefStep::Resolved(target),
            None => {
                tracing::debug!(reference, "unresolvable $ref, leaving node opaque");
                RefStep::Unresolved
            }
        }
    }

    /// Follows a chain of `$ref`s to the first node that is not a resolvable
    /// reference. Cycles stop at the node whose reference would re-enter the
    /// chain.
    pub fn follow<'n>(&self, node: &'n Value) -> &'n Value
    where
        'a: 'n,
    {
        let mut trail = RefTrail::new();
        self.unwind(node, &mut trail).0
    }

    /// Like [`follow`](Self::follow), but records every hop on `trail` and
    /// returns how many were entered, so the caller can `leave` them again.
    pub fn unwind<'n>(&self, node: &'n Value, trail: &mut RefTrail) -> (&'n Value, usize)
    where
        'a: 'n,
    {
        let mut current = node;
        let mut hops = 0;
        while let RefStep::Resolved(target) = self.step(current, trail) {
            if let Some(reference) = reference_of(current) {
                trail.enter(reference);
                hops += 1;
            }
            current = target;
        }
        (current, hops)
    }
}

pub fn reference_of(node: &Value) -> Option<&str> {
    node.get("$ref").and_then(Value::as_str)
}

fn decode_segment(raw: &str) -> Option<String> {
    let decoded = percent_decode_str(raw).decode_utf8().ok()?;
    Some(decoded.replace("~1", "/").replace("~0", "~"))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn definitions() -> Value {
        json!({
            "color": {"type": "string", "format": "color"},
            "segment": {
                "type": "object",
                "properties": {
                    "style": {"enum": ["plain", "powerline"]}
                }
            },
            "a/b": {"type": "boolean"},
            "alias": {"$ref": "#/definitions/color"},
            "loop_a": {"$ref": "#/definitions/loop_b"},
            "loop_b": {"$ref": "#/definitions/loop_a"},
            "list": [{"type": "number"}]
        })
    }

    #[test]
    fn resolves_top_level_definition() {
        let defs = definitions();
        let resolver = ReferenceResolver::new(defs.as_object().unwrap());
        let node = resolver.resolve("#/definitions/color").expect("color");
        assert_eq!(node["format"], json!("color"));
    }

    #[test]
    fn resolves_nested_segments() {
        let defs = definitions();
        let resolver = ReferenceResolver::new(defs.as_object().unwrap());
        let style = resolver
            .resolve("#/definitions/segment/properties/style")
            .expect("nested style");
        assert_eq!(style["enum"][1], json!("powerline"));
        let number = resolver.resolve("#/definitions/list/0").expect("index");
        assert_eq!(number["type"], json!("number"));
    }

    #[test]
    fn unescapes_pointer_segments() {
        let defs = definitions();
        let resolver = ReferenceResolver::new(defs.as_object().unwrap());
        assert!(resolver.resolve("#/definitions/a~1b").is_some());
        assert!(resolver.resolve("#/definitions/a%7E1b").is_some());
    }

    #[test]
    fn misses_return_none() {
        let defs = definitions();
        let resolver = ReferenceResolver::new(defs.as_object().unwrap());
        assert!(resolver.resolve("#/definitions/missing").is_none());
        assert!(resolver.resolve("#/definitions/segment/properties/nope").is_none());
        assert!(resolver.resolve("#/properties/color").is_none());
        assert!(resolver.resolve("https://example.com/schema.json").is_none());
        assert!(resolver.resolve("#/definitions/color/format/deeper").is_none());
    }

    #[test]
    fn follow_chases_aliases() {
        let defs = definitions();
        let resolver = ReferenceResolver::new(defs.as_object().unwrap());
        let node = json!({"$ref": "#/definitions/alias"});
        assert_eq!(resolver.follow(&node)["format"], json!("color"));
    }

    #[test]
    fn follow_stops_on_cycles() {
        let defs = definitions();
        let resolver = ReferenceResolver::new(defs.as_object().unwrap());
        let node = json!({"$ref": "#/definitions/loop_a"});
        let end = resolver.follow(&node);
        assert_eq!(reference_of(end), Some("#/definitions/loop_a"));
    }

    #[test]
    fn step_reports_cycle_for_active_reference() {
        let defs = definitions();
        let resolver = ReferenceResolver::new(defs.as_object().unwrap());
        let node = json!({"$ref": "#/definitions/color"});
        let mut trail = RefTrail::new();
        assert!(matches!(resolver.step(&node, &trail), RefStep::Resolved(_)));
        trail.enter("#/definitions/color");
        assert_eq!(resolver.step(&node, &trail), RefStep::Cycle);
        trail.leave();
        assert_eq!(trail.depth(), 0);
        assert_eq!(resolver.step(&json!({"type": "string"}), &trail), RefStep::Inline);
    }

    #[test]
    fn unwind_records_and_releases_hops() {
        let defs = definitions();
        let resolver = ReferenceResolver::new(defs.as_object().unwrap());
        let node = json!({"$ref": "#/definitions/alias"});
        let mut trail = RefTrail::new();
        let (end, hops) = resolver.unwind(&node, &mut trail);
        assert_eq!(end["format"], json!("color"));
        assert_eq!(hops, 2);
        assert!(trail.contains("#/definitions/alias"));
        assert!(trail.contains("#/definitions/color"));
        for _ in 0..hops {
            trail.leave();
        }
        assert_eq!(trail.depth(), 0);
        assert!(!trail.contains("#/definitions/color"));
    }
}
