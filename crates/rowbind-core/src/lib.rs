#[macro_use]
mod macros;

mod error;
pub use error::{Error, IntoError};

pub mod mapping;
pub use mapping::{DeclarativeMappingSource, MappingSource, ModelCache};

pub mod schema;
pub use schema::{Database, Entity, EntryType, MappingConfig, MetaModel};

pub mod stmt;

/// A Result type alias that uses rowbind's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;
