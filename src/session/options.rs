use crate::schema::MapperOptions;

/// Knobs for an [`EditorSession`](super::EditorSession).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    pub mapper: MapperOptions,
    pub cache_enabled: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            mapper: MapperOptions::default(),
            cache_enabled: true,
        }
    }
}

impl SessionOptions {
    pub fn with_mapper(mut self, mapper: MapperOptions) -> Self {
        self.mapper = mapper;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.mapper = self.mapper.with_max_depth(max_depth);
        self
    }

    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }
}
