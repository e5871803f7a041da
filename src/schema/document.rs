use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    sync::LazyLock,
};

use serde_json::{Map, Value};

use super::resolver::ReferenceResolver;

static EMPTY_DEFINITIONS: LazyLock<Map<String, Value>> = LazyLock::new(Map::new);

/// A schema document as fetched or bundled: `{ "definitions": { ... }, ... }`.
///
/// Any JSON value is accepted. A root that is not an object, or one without
/// an object-valued `definitions` key, behaves as if it had no definitions.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDocument {
    raw: Value,
}

impl SchemaDocument {
    pub fn new(raw: Value) -> Self {
        Self { raw }
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn into_raw(self) -> Value {
        self.raw
    }

    pub fn definitions(&self) -> &Map<String, Value> {
        self.raw
            .get("definitions")
            .and_then(Value::as_object)
            .unwrap_or(&EMPTY_DEFINITIONS)
    }

    pub fn definition(&self, name: &str) -> Option<&Value> {
        self.definitions().get(name)
    }

    pub fn resolver(&self) -> ReferenceResolver<'_> {
        ReferenceResolver::new(self.definitions())
    }

    /// Structural hash of the definitions set. Changes whenever a definition
    /// is added, removed or edited.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        let definitions = self.definitions();
        definitions.len().hash(&mut hasher);
        for (name, body) in definitions {
            name.hash(&mut hasher);
            body.to_string().hash(&mut hasher);
        }
        hasher.finish()
    }
}

impl From<Value> for SchemaDocument {
    fn from(raw: Value) -> Self {
        Self::new(raw)
    }
}
