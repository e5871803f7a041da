use std::collections::HashMap;

use serde_json::Value;

use crate::domain::PropertyDefinition;

/// Identity of one mapping call: `(name, schema node, required)`.
///
/// The node is kept as its canonical JSON text so that equal keys always
/// mean equal inputs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    name: String,
    node: String,
    required: bool,
}

impl CacheKey {
    pub fn new(name: &str, node: &Value, required: bool) -> Self {
        Self {
            name: name.to_string(),
            node: node.to_string(),
            required,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Memoizes mapped definitions for the schema identified by a fingerprint.
///
/// Owned by whoever owns the editor session. Entries are only valid for one
/// schema document; [`SchemaCache::invalidate`] drops all of them as soon as
/// the fingerprint changes.
#[derive(Debug, Default)]
pub struct SchemaCache {
    fingerprint: Option<u64>,
    entries: HashMap<CacheKey, PropertyDefinition>,
    stats: CacheStats,
}

impl SchemaCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_fingerprint(fingerprint: u64) -> Self {
        Self {
            fingerprint: Some(fingerprint),
            ..Self::default()
        }
    }

    pub fn fingerprint(&self) -> Option<u64> {
        self.fingerprint
    }

    /// Clears every entry when `fingerprint` differs from the one the cache
    /// was filled for. Returns whether anything was invalidated.
    pub fn invalidate(&mut self, fingerprint: u64) -> bool {
        if self.fingerprint == Some(fingerprint) {
            return false;
        }
        let dropped = self.entries.len();
        self.entries.clear();
        self.fingerprint = Some(fingerprint);
        tracing::info!(fingerprint, dropped, "schema changed, mapping cache invalidated");
        true
    }

    pub fn get(&self, key: &CacheKey) -> Option<&PropertyDefinition> {
        self.entries.get(key)
    }

    pub fn get_or_insert_with(
        &mut self,
        key: CacheKey,
        map: impl FnOnce() -> PropertyDefinition,
    ) -> PropertyDefinition {
        if let Some(hit) = self.entries.get(&key) {
            self.stats.hits += 1;
            tracing::trace!(property = %hit.name, "mapping cache hit");
            return hit.clone();
        }
        self.stats.misses += 1;
        let definition = map();
        self.entries.insert(key, definition.clone());
        definition
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Map, json};

    use super::*;
    use crate::schema::{PropertyMapper, ReferenceResolver};

    #[test]
    fn keys_distinguish_every_input() {
        let node = json!({"type": "string"});
        let base = CacheKey::new("template", &node, false);
        assert_eq!(base, CacheKey::new("template", &node, false));
        assert_ne!(base, CacheKey::new("template", &node, true));
        assert_ne!(base, CacheKey::new("tooltip", &node, false));
        assert_ne!(base, CacheKey::new("template", &json!({"type": "number"}), false));
    }

    #[test]
    fn memoizes_until_fingerprint_changes() {
        let empty = Map::new();
        let mapper = PropertyMapper::new(ReferenceResolver::new(&empty));
        let node = json!({"type": "boolean", "default": true});
        let key = CacheKey::new("fetch_status", &node, false);

        let mut cache = SchemaCache::for_fingerprint(1);
        let mut calls = 0;
        for _ in 0..3 {
            let def = cache.get_or_insert_with(key.clone(), || {
                calls += 1;
                mapper.map("fetch_status", &node, false)
            });
            assert_eq!(def.default_value, Some(json!(true)));
        }
        assert_eq!(calls, 1);
        assert_eq!(cache.stats(), CacheStats { hits: 2, misses: 1 });
        assert!(cache.get(&key).is_some());

        assert!(!cache.invalidate(1));
        assert_eq!(cache.len(), 1);
        assert!(cache.invalidate(2));
        assert!(cache.is_empty());
        assert_eq!(cache.fingerprint(), Some(2));
    }

    #[test]
    fn fresh_cache_adopts_first_fingerprint() {
        let mut cache = SchemaCache::new();
        assert_eq!(cache.fingerprint(), None);
        assert!(cache.invalidate(7));
        assert!(!cache.invalidate(7));
    }
}
