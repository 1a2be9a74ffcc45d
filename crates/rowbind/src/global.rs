use rowbind_core::{Database, DeclarativeMappingSource, MappingSource, MetaModel, Result};

use std::sync::{Arc, LazyLock};

static MAPPING_SOURCE: LazyLock<DeclarativeMappingSource> =
    LazyLock::new(DeclarativeMappingSource::new);

/// The process-wide mapping source used by [`model`] and
/// [`Context::new`](crate::Context::new).
pub fn mapping_source() -> &'static DeclarativeMappingSource {
    &MAPPING_SOURCE
}

/// Returns the model for database `D`, building it on first use.
pub fn model<D: Database>() -> Result<Arc<MetaModel>> {
    MAPPING_SOURCE.model_for::<D>()
}
