use serde_json::{Map, Value};

use crate::{domain::PropertyDefinition, schema::ReferenceResolver};

/// Defaults of an object definition's direct children, keyed by name.
///
/// Children without a schema default are skipped. Grandchildren are not
/// visited; call again on an object child to collect its defaults.
pub fn extract_defaults(definition: &PropertyDefinition) -> Map<String, Value> {
    extract_defaults_from(definition.children())
}

/// Defaults of a list of sibling definitions, e.g. a segment's options.
pub fn extract_defaults_from(definitions: &[PropertyDefinition]) -> Map<String, Value> {
    definitions
        .iter()
        .filter_map(|def| {
            def.default_value
                .as_ref()
                .map(|value| (def.name.clone(), value.clone()))
        })
        .collect()
}

/// Same shallow collection, read straight from a raw object node.
pub fn schema_defaults(resolver: &ReferenceResolver<'_>, node: &Value) -> Map<String, Value> {
    let node = resolver.follow(node);
    let Some(properties) = node.get("properties").and_then(Value::as_object) else {
        return Map::new();
    };
    properties
        .iter()
        .filter_map(|(name, schema)| {
            resolver
                .follow(schema)
                .get("default")
                .map(|value| (name.clone(), value.clone()))
        })
        .collect()
}

/// Seeds `target` with every default it does not already have.
///
/// Existing values, including explicit nulls, are left alone, so applying
/// the same defaults twice changes nothing.
pub fn apply_defaults(target: &mut Map<String, Value>, defaults: &Map<String, Value>) -> usize {
    let mut inserted = 0;
    for (name, value) in defaults {
        if !target.contains_key(name) {
            target.insert(name.clone(), value.clone());
            inserted += 1;
        }
    }
    inserted
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::schema::PropertyMapper;

    fn segment_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "fetch_status": {"type": "boolean", "default": false},
                "branch_icon": {"type": "string", "default": " "},
                "template": {"type": "string"},
                "mapped_branches": {
                    "type": "object",
                    "default": {},
                    "properties": {
                        "feat/*": {"type": "string", "default": "🚀 "}
                    }
                },
                "nullable": {"default": null}
            }
        })
    }

    #[test]
    fn collects_shallow_defaults() {
        let empty = Map::new();
        let mapper = PropertyMapper::new(ReferenceResolver::new(&empty));
        let def = mapper.map("git", &segment_schema(), false);
        let defaults = extract_defaults(&def);
        assert_eq!(
            Value::Object(defaults),
            json!({
                "fetch_status": false,
                "branch_icon": " ",
                "mapped_branches": {},
                "nullable": null
            })
        );
    }

    #[test]
    fn non_objects_have_no_defaults() {
        let empty = Map::new();
        let mapper = PropertyMapper::new(ReferenceResolver::new(&empty));
        let def = mapper.map("template", &json!({"type": "string", "default": "x"}), false);
        assert!(extract_defaults(&def).is_empty());
    }

    #[test]
    fn raw_schema_defaults_match_mapped_defaults() {
        let definitions = json!({
            "git": segment_schema(),
            "flag": {"type": "boolean", "default": true}
        });
        let resolver = ReferenceResolver::new(definitions.as_object().unwrap());
        let mapper = PropertyMapper::new(resolver);
        let node = json!({"$ref": "#/definitions/git"});

        assert_eq!(
            schema_defaults(&resolver, &node),
            extract_defaults_from(&mapper.map_properties(&node))
        );

        let with_ref = json!({"properties": {"enabled": {"$ref": "#/definitions/flag"}}});
        assert_eq!(
            Value::Object(schema_defaults(&resolver, &with_ref)),
            json!({"enabled": true})
        );
    }

    #[test]
    fn applying_defaults_is_idempotent() {
        let defaults: Map<String, Value> = json!({"fetch_status": false, "branch_icon": "x"})
            .as_object()
            .cloned()
            .unwrap();
        let mut segment = json!({"fetch_status": true}).as_object().cloned().unwrap();

        assert_eq!(apply_defaults(&mut segment, &defaults), 1);
        let once = segment.clone();
        assert_eq!(apply_defaults(&mut segment, &defaults), 0);
        assert_eq!(segment, once);
        assert_eq!(segment["fetch_status"], json!(true));
    }
}
