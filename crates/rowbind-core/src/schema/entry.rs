use super::decl::{Database, DatabaseDecl};
use super::name::short_type_name;

use std::any::{type_name, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identifies the entry point a model is built from.
///
/// Two entry types are equal when they name the same Rust type.
#[derive(Clone, Copy)]
pub struct EntryType {
    type_id: TypeId,
    type_name: &'static str,
    declare: fn(&mut DatabaseDecl),
}

impl EntryType {
    pub fn of<D: Database>() -> Self {
        Self {
            type_id: TypeId::of::<D>(),
            type_name: type_name::<D>(),
            declare: D::declare,
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// The fully qualified Rust type name.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// The type name without its module path.
    pub fn name(&self) -> &'static str {
        short_type_name(self.type_name)
    }

    pub(crate) fn declaration(&self) -> DatabaseDecl {
        let mut decl = DatabaseDecl::new();
        (self.declare)(&mut decl);
        decl
    }
}

impl PartialEq for EntryType {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for EntryType {}

impl Hash for EntryType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntryType({})", self.name())
    }
}
