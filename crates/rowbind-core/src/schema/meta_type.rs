use super::{AssociationId, MemberId, MetaDataMember, MetaModel, MetaTable, TableId};
use crate::stmt::Value;

use std::any::TypeId;
use std::fmt;

/// A mapped Rust type: its members, identity and place in an inheritance
/// hierarchy.
#[derive(Debug)]
pub struct MetaType {
    /// Uniquely identifies the type within the model
    pub id: MetaTypeId,

    pub type_id: TypeId,

    pub type_name: &'static str,

    /// The entity name
    pub name: String,

    /// The table rows of this type are stored in. Derived types share the
    /// table of their hierarchy root.
    pub table: TableId,

    /// False for abstract types.
    pub can_instantiate: bool,

    /// All members in ordinal order, inherited members first
    pub data_members: Vec<MemberId>,

    /// The subset of `data_members` backed by columns or associations
    pub persistent_data_members: Vec<MemberId>,

    /// Primary key members, in declaration order
    pub identity_members: Vec<MemberId>,

    pub associations: Vec<AssociationId>,

    pub version_member: Option<MemberId>,

    /// The discriminator of the hierarchy. Every type in a hierarchy refers
    /// to the same member.
    pub discriminator: Option<MemberId>,

    pub inheritance: Inheritance,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MetaTypeId(pub usize);

#[derive(Debug, Clone)]
pub struct Inheritance {
    pub root: MetaTypeId,

    /// The immediate base type, `None` for the root
    pub base: Option<MetaTypeId>,

    /// Types directly derived from this one
    pub derived: Vec<MetaTypeId>,

    /// Every type in the hierarchy, root first
    pub types: Vec<MetaTypeId>,

    /// The discriminator value selecting this type
    pub code: Option<Value>,

    pub is_default: bool,

    /// The hierarchy's default type
    pub default: Option<MetaTypeId>,
}

impl MetaType {
    pub fn id(&self) -> MetaTypeId {
        self.id
    }

    pub fn table<'a>(&self, model: &'a MetaModel) -> &'a MetaTable {
        model.table(self.table)
    }

    /// True if the type has an identity and can be tracked.
    pub fn is_entity(&self) -> bool {
        !self.identity_members.is_empty()
    }

    pub fn has_inheritance(&self) -> bool {
        self.inheritance.types.len() > 1 || self.discriminator.is_some()
    }

    pub fn is_inheritance_root(&self) -> bool {
        self.inheritance.root == self.id
    }

    pub fn data_members<'a>(
        &'a self,
        model: &'a MetaModel,
    ) -> impl Iterator<Item = &'a MetaDataMember> + 'a {
        self.data_members.iter().map(|id| model.member(*id))
    }

    pub fn persistent_data_members<'a>(
        &'a self,
        model: &'a MetaModel,
    ) -> impl Iterator<Item = &'a MetaDataMember> + 'a {
        self.persistent_data_members
            .iter()
            .map(|id| model.member(*id))
    }

    pub fn identity_members<'a>(
        &'a self,
        model: &'a MetaModel,
    ) -> impl Iterator<Item = &'a MetaDataMember> + 'a {
        self.identity_members.iter().map(|id| model.member(*id))
    }

    /// Finds a member by name, falling back to its column name.
    pub fn data_member<'a>(&self, model: &'a MetaModel, name: &str) -> Option<&'a MetaDataMember> {
        let members = || self.data_members.iter().map(|id| model.member(*id));
        members()
            .find(|member| member.name == name)
            .or_else(|| members().find(|member| member.mapped_name() == name))
    }

    pub fn version_member<'a>(&self, model: &'a MetaModel) -> Option<&'a MetaDataMember> {
        self.version_member.map(|id| model.member(id))
    }

    pub fn discriminator<'a>(&self, model: &'a MetaModel) -> Option<&'a MetaDataMember> {
        self.discriminator.map(|id| model.member(id))
    }

    /// The type in this hierarchy selected by discriminator value `code`.
    ///
    /// The code is cast to the discriminator type before comparing, so an
    /// `i64` code matches an `i16` discriminator.
    pub fn inheritance_type_for_code<'a>(
        &self,
        model: &'a MetaModel,
        code: &Value,
    ) -> Option<&'a MetaType> {
        let ty = self.discriminator(model)?.member_ty()?;
        let code = ty.cast(code.clone()).ok()?;

        self.inheritance
            .types
            .iter()
            .map(|id| model.meta_type(*id))
            .find(|ty| ty.inheritance.code.as_ref() == Some(&code))
    }

    /// The hierarchy's default type, if it declares one.
    pub fn inheritance_default<'a>(&self, model: &'a MetaModel) -> Option<&'a MetaType> {
        self.inheritance.default.map(|id| model.meta_type(id))
    }

    pub fn inheritance_root<'a>(&self, model: &'a MetaModel) -> &'a MetaType {
        model.meta_type(self.inheritance.root)
    }

    pub fn inheritance_base<'a>(&self, model: &'a MetaModel) -> Option<&'a MetaType> {
        self.inheritance.base.map(|id| model.meta_type(id))
    }
}

impl fmt::Debug for MetaTypeId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "MetaTypeId({})", self.0)
    }
}
