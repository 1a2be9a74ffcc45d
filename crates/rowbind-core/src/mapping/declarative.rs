use super::{MappingSource, ModelCache};
use crate::schema::{EntryType, MappingConfig, MetaModel};
use crate::Result;

/// Builds models from the [`Database`](crate::Database) and
/// [`Entity`](crate::Entity) declarations of the entry type.
#[derive(Default)]
pub struct DeclarativeMappingSource {
    cache: ModelCache,
    config: MappingConfig,
}

impl DeclarativeMappingSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: MappingConfig) -> Self {
        Self {
            cache: ModelCache::new(),
            config,
        }
    }

    pub fn config(&self) -> &MappingConfig {
        &self.config
    }
}

impl MappingSource for DeclarativeMappingSource {
    fn cache(&self) -> &ModelCache {
        &self.cache
    }

    fn create_model(&self, entry: &EntryType) -> Result<MetaModel> {
        MetaModel::build(entry, self.id(), &self.config)
    }
}
