use super::ModelCache;
use crate::schema::{Database, EntryType, MetaModel};
use crate::{Error, Result};

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Produces mapping models and caches one per entry type.
///
/// Implementors provide the cache and the build; [`MappingSource::get_model`]
/// guarantees that each entry type resolves to a single shared model however
/// many threads ask for it concurrently.
pub trait MappingSource: Send + Sync {
    fn cache(&self) -> &ModelCache;

    /// Builds a new model for `entry`. Called by the cache; a returned error
    /// is propagated to the caller and nothing is cached.
    fn create_model(&self, entry: &EntryType) -> Result<MetaModel>;

    fn id(&self) -> MappingSourceId {
        self.cache().source_id()
    }

    /// Returns the model for `entry`, building it on first use.
    ///
    /// Fails with an invalid argument error, before touching the cache, if
    /// no entry type is given.
    fn get_model(&self, entry: Option<&EntryType>) -> Result<Arc<MetaModel>> {
        let Some(entry) = entry else {
            return Err(Error::argument_invalid(
                "an entry type is required to resolve a model",
            ));
        };

        self.cache()
            .get_or_build(entry, |entry| self.create_model(entry))
    }

    fn model_for<D: Database>(&self) -> Result<Arc<MetaModel>>
    where
        Self: Sized,
    {
        self.get_model(Some(&D::entry_type()))
    }
}

/// Identifies a mapping source; every model records the source that built
/// it.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct MappingSourceId(u64);

impl MappingSourceId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Debug for MappingSourceId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "MappingSourceId({})", self.0)
    }
}
