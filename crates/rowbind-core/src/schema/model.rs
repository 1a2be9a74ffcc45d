use super::{
    builder::Builder, AssociationId, EntryType, MappingConfig, MemberId, MetaAssociation,
    MetaDataMember, MetaTable, MetaType, MetaTypeId, TableId,
};
use crate::mapping::MappingSourceId;
use crate::Result;

use indexmap::IndexMap;
use std::any::TypeId;

/// The complete, immutable mapping built from one entry type.
///
/// Descriptors reference each other by id; the model owns all of them.
#[derive(Debug)]
pub struct MetaModel {
    pub(crate) entry: EntryType,
    pub(crate) source: MappingSourceId,
    pub(crate) database_name: String,
    pub(crate) tables: Vec<MetaTable>,
    pub(crate) types: Vec<MetaType>,
    pub(crate) members: Vec<MetaDataMember>,
    pub(crate) associations: Vec<MetaAssociation>,
    pub(crate) types_by_type_id: IndexMap<TypeId, MetaTypeId>,
    pub(crate) tables_by_name: IndexMap<String, TableId>,
}

impl MetaModel {
    /// Builds and validates the model rooted at `entry`.
    pub fn build(
        entry: &EntryType,
        source: MappingSourceId,
        config: &MappingConfig,
    ) -> Result<Self> {
        Builder::build(entry, source, config)
    }

    pub fn entry_type(&self) -> &EntryType {
        &self.entry
    }

    /// The source that built this model.
    pub fn mapping_source(&self) -> MappingSourceId {
        self.source
    }

    pub fn database_name(&self) -> &str {
        &self.database_name
    }

    /// The table storing rows of `T`. Derived types resolve to the table of
    /// their hierarchy root.
    pub fn get_table<T: 'static>(&self) -> Option<&MetaTable> {
        self.get_table_by_type_id(TypeId::of::<T>())
    }

    pub fn get_table_by_type_id(&self, type_id: TypeId) -> Option<&MetaTable> {
        let ty = self.get_meta_type_by_type_id(type_id)?;
        Some(self.table(ty.table))
    }

    pub fn get_table_by_name(&self, name: &str) -> Option<&MetaTable> {
        self.tables_by_name.get(name).map(|id| self.table(*id))
    }

    pub fn tables(&self) -> impl Iterator<Item = &MetaTable> {
        self.tables.iter()
    }

    pub fn get_meta_type<T: 'static>(&self) -> Option<&MetaType> {
        self.get_meta_type_by_type_id(TypeId::of::<T>())
    }

    pub fn get_meta_type_by_type_id(&self, type_id: TypeId) -> Option<&MetaType> {
        self.types_by_type_id
            .get(&type_id)
            .map(|id| self.meta_type(*id))
    }

    pub fn meta_types(&self) -> impl Iterator<Item = &MetaType> {
        self.types.iter()
    }

    /// Get a table by ID
    pub fn table(&self, id: impl Into<TableId>) -> &MetaTable {
        self.tables.get(id.into().0).expect("invalid table ID")
    }

    /// Get a type by ID
    pub fn meta_type(&self, id: impl Into<MetaTypeId>) -> &MetaType {
        self.types.get(id.into().0).expect("invalid type ID")
    }

    /// Get a member by ID
    pub fn member(&self, id: impl Into<MemberId>) -> &MetaDataMember {
        self.members.get(id.into().0).expect("invalid member ID")
    }

    /// Get an association by ID
    pub fn association(&self, id: impl Into<AssociationId>) -> &MetaAssociation {
        self.associations
            .get(id.into().0)
            .expect("invalid association ID")
    }

    /// The association a member represents, if it is an association member.
    pub fn association_for(&self, member: &MetaDataMember) -> Option<&MetaAssociation> {
        member.association().map(|id| self.association(id))
    }
}
