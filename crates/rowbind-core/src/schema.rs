//! Mapping metadata: declarations, descriptors and the model that owns them.

mod accessor;
pub use accessor::{FieldAccessor, MetaAccessor};

mod association;
pub use association::{AssociationId, AssociationKeys, MetaAssociation, ResolvedKeys};

mod builder;

pub mod classify;

mod config;
pub use config::MappingConfig;

pub mod decl;
pub use decl::{AssociationDecl, ColumnDecl, Database, DatabaseDecl, Entity, EntityDecl};

mod entry;
pub use entry::EntryType;

mod member;
pub use member::{AutoSync, MemberId, MemberTy, MetaDataMember, ScalarMember, UpdateCheck};

mod meta_type;
pub use meta_type::{Inheritance, MetaType, MetaTypeId};

mod model;
pub use model::MetaModel;

mod name;
pub use name::Name;

mod table;
pub use table::{MetaTable, TableId};

mod verify;
