pub use crate::{Context, Database, Entity, MappingSource};
pub use rowbind_core::schema::{AssociationDecl, ColumnDecl, DatabaseDecl, EntityDecl};
