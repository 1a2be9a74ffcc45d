use super::{AssociationDecl, AssociationDef, ColumnDecl, ColumnDef};
use crate::schema::accessor::{BaseProjection, Projection};
use crate::schema::name::short_type_name;
use crate::stmt::Value;

use std::any::{type_name, TypeId};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// A Rust type mapped to rows of a table.
pub trait Entity: Sized + 'static {
    fn mapping() -> EntityDecl<Self>;
}

/// The mapping of one entity type.
pub struct EntityDecl<T> {
    def: EntityDef,
    _p: PhantomData<fn() -> T>,
}

pub(crate) struct EntityDef {
    pub(crate) type_id: TypeId,
    pub(crate) type_name: &'static str,
    pub(crate) name: String,
    pub(crate) table_name: Option<String>,
    pub(crate) can_instantiate: bool,
    pub(crate) members: Vec<MemberDef>,
    pub(crate) inheritance_code: Option<Value>,
    pub(crate) is_inheritance_default: bool,
    pub(crate) derived: Vec<EntityRef>,
    pub(crate) extends: Option<ExtendsDef>,
}

pub(crate) enum MemberDef {
    Column(ColumnDef),
    Association(AssociationDef),
}

pub(crate) struct ExtendsDef {
    pub(crate) base: EntityRef,
    pub(crate) projection: Arc<dyn Projection>,
}

/// A lazily loaded reference to another entity's declaration.
#[derive(Clone, Copy)]
pub(crate) struct EntityRef {
    pub(crate) type_id: TypeId,
    pub(crate) type_name: &'static str,
    load: fn() -> EntityDef,
}

impl<T: Entity> EntityDecl<T> {
    pub fn new() -> Self {
        let type_name = type_name::<T>();

        Self {
            def: EntityDef {
                type_id: TypeId::of::<T>(),
                type_name,
                name: short_type_name(type_name).to_string(),
                table_name: None,
                can_instantiate: true,
                members: vec![],
                inheritance_code: None,
                is_inheritance_default: false,
                derived: vec![],
                extends: None,
            },
            _p: PhantomData,
        }
    }

    /// Overrides the entity name, which defaults to the Rust type name.
    pub fn name(mut self, name: &str) -> Self {
        self.def.name = name.to_string();
        self
    }

    /// Sets the table name used when this entity roots a table.
    pub fn table(mut self, name: &str) -> Self {
        self.def.table_name = Some(name.to_string());
        self
    }

    pub fn column(mut self, column: ColumnDecl<T>) -> Self {
        self.def.members.push(MemberDef::Column(column.into_def()));
        self
    }

    pub fn association(mut self, association: AssociationDecl<T>) -> Self {
        self.def
            .members
            .push(MemberDef::Association(association.into_def()));
        self
    }

    /// Marks the type as never materialized directly, only through one of
    /// its derived types.
    pub fn abstract_type(mut self) -> Self {
        self.def.can_instantiate = false;
        self
    }

    /// The discriminator value identifying rows of this type.
    pub fn inheritance_code(mut self, code: impl Into<Value>) -> Self {
        self.def.inheritance_code = Some(code.into());
        self
    }

    /// Marks this type as the one materialized for unknown discriminator
    /// values.
    pub fn inheritance_default(mut self) -> Self {
        self.def.is_inheritance_default = true;
        self
    }

    /// Registers `D` as a type derived from this one. `D` must declare
    /// [`EntityDecl::extends`] naming this type.
    pub fn derived<D: Entity>(mut self) -> Self {
        self.def.derived.push(EntityRef::of::<D>());
        self
    }

    /// Declares this type as derived from `B`, which it embeds. The
    /// projections let members declared on `B` read and write instances of
    /// this type.
    pub fn extends<B: Entity>(
        mut self,
        as_base: fn(&T) -> &B,
        as_base_mut: fn(&mut T) -> &mut B,
    ) -> Self {
        self.def.extends = Some(ExtendsDef {
            base: EntityRef::of::<B>(),
            projection: Arc::new(BaseProjection::new(as_base, as_base_mut)),
        });
        self
    }
}

impl<T: Entity> Default for EntityDecl<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl MemberDef {
    pub(crate) fn name(&self) -> &str {
        match self {
            Self::Column(column) => &column.name,
            Self::Association(association) => &association.name,
        }
    }
}

impl EntityRef {
    pub(crate) fn of<T: Entity>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            load: load::<T>,
        }
    }

    pub(crate) fn load(&self) -> EntityDef {
        (self.load)()
    }
}

fn load<T: Entity>() -> EntityDef {
    T::mapping().def
}

impl fmt::Debug for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityRef({})", self.type_name)
    }
}
