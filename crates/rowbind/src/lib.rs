mod context;
pub use context::Context;

mod global;
pub use global::{mapping_source, model};

pub mod prelude;

pub use rowbind_core::{
    mapping, schema, stmt, Database, DeclarativeMappingSource, Entity, EntryType, Error,
    MappingConfig, MappingSource, MetaModel, Result,
};
