//! Mapping sources and the registry of models they have built.

mod cache;
pub use cache::ModelCache;

mod declarative;
pub use declarative::DeclarativeMappingSource;

mod source;
pub use source::{MappingSource, MappingSourceId};
