//! Declarations describing how Rust types map onto tables.
//!
//! A [`Database`] names the entry point of a model and lists its tables. Each
//! [`Entity`] returns an [`EntityDecl`] listing its columns, associations and
//! place in an inheritance hierarchy. Declarations are plain data; they are
//! validated and resolved when a [`MetaModel`](super::MetaModel) is built.

mod association;
pub use association::AssociationDecl;
pub(crate) use association::{AssociationDef, AssociationKind};

mod column;
pub use column::ColumnDecl;
pub(crate) use column::ColumnDef;

mod database;
pub(crate) use database::TableDef;
pub use database::{Database, DatabaseDecl};

mod entity;
pub use entity::{Entity, EntityDecl};
pub(crate) use entity::{EntityDef, EntityRef, MemberDef};
