mod options;

pub use options::SessionOptions;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::{
    cache::{CacheKey, CacheStats, SchemaCache},
    domain::{ControlDescriptor, PropertyDefinition},
    form::{extract_defaults_from, project_all},
    schema::{PropertyMapper, SchemaDocument, SchemaLookupError, SegmentMatch, locate_segment},
};

/// Everything a renderer needs to show the options of one segment type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentForm {
    pub segment_type: String,
    pub definition_key: String,
    pub matched: SegmentMatch,
    pub properties: Vec<PropertyDefinition>,
    pub controls: Vec<ControlDescriptor>,
    pub defaults: Map<String, Value>,
}

impl SegmentForm {
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn property(&self, name: &str) -> Option<&PropertyDefinition> {
        self.properties.iter().find(|def| def.name == name)
    }

    /// Message to show instead of an empty panel.
    pub fn notice(&self) -> Option<String> {
        self.is_empty().then(|| empty_form_notice(&self.segment_type))
    }
}

pub fn empty_form_notice(segment_type: &str) -> String {
    format!("No configurable properties found for segment type '{segment_type}'.")
}

/// Owns the active schema document and the mapping cache tied to it.
#[derive(Debug)]
pub struct EditorSession {
    document: SchemaDocument,
    cache: SchemaCache,
    options: SessionOptions,
}

impl EditorSession {
    pub fn new(schema: Value) -> Self {
        let document = SchemaDocument::new(schema);
        let cache = SchemaCache::for_fingerprint(document.fingerprint());
        Self {
            document,
            cache,
            options: SessionOptions::default(),
        }
    }

    /// Cached mappings were built under the previous mapper options and are
    /// dropped when those change.
    pub fn with_options(mut self, options: SessionOptions) -> Self {
        if options.mapper != self.options.mapper {
            self.cache.clear();
        }
        self.options = options;
        self
    }

    pub fn document(&self) -> &SchemaDocument {
        &self.document
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn cached_definitions(&self) -> usize {
        self.cache.len()
    }

    /// Swaps the schema document. Returns whether cached mappings were
    /// dropped, which only happens when the definitions actually changed.
    pub fn replace_schema(&mut self, schema: Value) -> bool {
        self.document = SchemaDocument::new(schema);
        self.cache.invalidate(self.document.fingerprint())
    }

    pub fn segment_form(&mut self, segment_type: &str) -> Result<SegmentForm, SchemaLookupError> {
        let located = locate_segment(&self.document, segment_type)?;
        let resolver = self.document.resolver();
        let mapper = PropertyMapper::new(resolver).with_options(self.options.mapper);

        let mut properties = Vec::new();
        if let Some(options_node) = located.options_node(&self.document)
            && let Some(schema_properties) =
                options_node.get("properties").and_then(Value::as_object)
        {
            let required: Vec<&str> = options_node
                .get("required")
                .and_then(Value::as_array)
                .map(|names| names.iter().filter_map(Value::as_str).collect())
                .unwrap_or_default();
            for (name, node) in schema_properties {
                let is_required = required.contains(&name.as_str());
                let definition = if self.options.cache_enabled {
                    self.cache
                        .get_or_insert_with(CacheKey::new(name, node, is_required), || {
                            mapper.map(name, node, is_required)
                        })
                } else {
                    mapper.map(name, node, is_required)
                };
                properties.push(definition);
            }
        }

        if properties.is_empty() {
            tracing::info!(segment_type, "segment schema has no configurable properties");
        }

        Ok(SegmentForm {
            segment_type: segment_type.to_string(),
            definition_key: located.definition_key,
            matched: located.matched,
            controls: project_all(&properties),
            defaults: extract_defaults_from(&properties),
            properties,
        })
    }

    /// Maps each segment type on its own; a type without a schema only
    /// affects its own entry.
    pub fn segment_forms<I, S>(
        &mut self,
        segment_types: I,
    ) -> IndexMap<String, Result<SegmentForm, SchemaLookupError>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        segment_types
            .into_iter()
            .map(|segment_type| {
                let segment_type = segment_type.as_ref();
                (segment_type.to_string(), self.segment_form(segment_type))
            })
            .collect()
    }

    /// A new segment of `segment_type` with its `properties` pre-populated from
    /// schema defaults.
    pub fn new_segment(&mut self, segment_type: &str) -> Result<Value, SchemaLookupError> {
        let form = self.segment_form(segment_type)?;
        Ok(json!({
            "type": segment_type,
            "properties": form.defaults,
        }))
    }
}
