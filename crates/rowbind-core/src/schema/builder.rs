mod association;
mod hierarchy;

use super::decl::{AssociationDef, EntityDef, EntityRef, TableDef};
use super::{
    AssociationId, EntryType, MappingConfig, MemberId, MetaDataMember, MetaModel, MetaTable,
    MetaType, MetaTypeId, TableId,
};
use crate::mapping::MappingSourceId;
use crate::{Error, Result};

use indexmap::{IndexMap, IndexSet};
use std::any::TypeId;
use tracing::debug;

pub(crate) struct Builder<'a> {
    config: &'a MappingConfig,
    entry: EntryType,
    source: MappingSourceId,

    /// Table names declared by the entry type, overriding the entity's own
    table_overrides: IndexMap<TypeId, String>,

    /// One slot per type, in the order types were first reached
    slots: Vec<TypeSlot>,
    types_by_type_id: IndexMap<TypeId, MetaTypeId>,

    tables: Vec<MetaTable>,
    tables_by_name: IndexMap<String, TableId>,

    members: Vec<MetaDataMember>,

    /// Associations whose keys are resolved once every type is known
    pending: Vec<PendingAssociation>,
}

enum TypeSlot {
    /// The type is registered and its id can be referenced, but it is not
    /// complete yet.
    InProgress(String),
    Built(MetaType),
}

struct PendingAssociation {
    id: AssociationId,
    this_type: MetaTypeId,
    this_member: MemberId,
    def: AssociationDef,
}

impl<'a> Builder<'a> {
    pub(crate) fn build(
        entry: &EntryType,
        source: MappingSourceId,
        config: &'a MappingConfig,
    ) -> Result<MetaModel> {
        debug!(entry = entry.name(), "Building mapping model");

        let decl = entry.declaration();

        if decl.tables.is_empty() {
            return Err(Error::invalid_mapping(format!(
                "entry type `{}` declares no tables",
                entry.name()
            )));
        }

        let mut builder = Builder {
            config,
            entry: *entry,
            source,
            table_overrides: IndexMap::new(),
            slots: vec![],
            types_by_type_id: IndexMap::new(),
            tables: vec![],
            tables_by_name: IndexMap::new(),
            members: vec![],
            pending: vec![],
        };

        builder.collect_table_overrides(&decl.tables)?;

        for table in &decl.tables {
            builder.visit_table(table)?;
        }

        let types = builder.take_types()?;
        let associations = builder.resolve_associations(&types)?;

        let database_name = config
            .database_name
            .clone()
            .or(decl.name)
            .unwrap_or_else(|| entry.name().to_string());

        let model = MetaModel {
            entry: builder.entry,
            source: builder.source,
            database_name,
            tables: builder.tables,
            types,
            members: builder.members,
            associations,
            types_by_type_id: builder.types_by_type_id,
            tables_by_name: builder.tables_by_name,
        };

        super::verify::verify(&model)?;

        debug!(
            entry = entry.name(),
            tables = model.tables.len(),
            types = model.types.len(),
            "Built mapping model"
        );

        Ok(model)
    }

    fn collect_table_overrides(&mut self, tables: &[TableDef]) -> Result<()> {
        let mut seen = IndexSet::new();

        for table in tables {
            if !seen.insert(table.entity.type_id) {
                return Err(Error::invalid_mapping(format!(
                    "entry type `{}` declares a table for `{}` more than once",
                    self.entry.name(),
                    table.entity.type_name
                )));
            }

            if let Some(name) = &table.name {
                self.table_overrides
                    .insert(table.entity.type_id, name.clone());
            }
        }

        Ok(())
    }

    fn visit_table(&mut self, table: &TableDef) -> Result<MetaTypeId> {
        let def = table.entity.load();

        if def.extends.is_some() {
            return Err(Error::invalid_mapping(format!(
                "table declared for derived type `{}`; tables map the root of an inheritance hierarchy",
                def.name
            )));
        }

        match self.types_by_type_id.get(&def.type_id) {
            Some(id) => Ok(*id),
            None => self.build_hierarchy(def),
        }
    }

    /// Registers the type `entity` refers to, building its whole hierarchy if
    /// it was not reached before. Types already registered, including ones
    /// still under construction, are reused.
    fn visit(&mut self, entity: EntityRef) -> Result<MetaTypeId> {
        if let Some(id) = self.types_by_type_id.get(&entity.type_id) {
            return Ok(*id);
        }

        let def = entity.load();

        let Some(base) = def.extends.as_ref().map(|extends| extends.base) else {
            return self.build_hierarchy(def);
        };

        let root = self.find_root(&def, base)?;
        self.build_hierarchy(root)?;

        self.types_by_type_id
            .get(&entity.type_id)
            .copied()
            .ok_or_else(|| {
                Error::invalid_mapping(format!(
                    "`{}` extends a type that does not list it as derived",
                    def.name
                ))
            })
    }

    fn find_root(&self, def: &EntityDef, base: EntityRef) -> Result<EntityDef> {
        let mut seen = IndexSet::new();
        seen.insert(def.type_id);

        let mut base = base.load();

        while let Some(extends) = &base.extends {
            if !seen.insert(base.type_id) {
                return Err(Error::invalid_mapping(format!(
                    "inheritance cycle through `{}`",
                    base.name
                )));
            }
            base = extends.base.load();
        }

        if let Some(id) = self.types_by_type_id.get(&base.type_id) {
            return Err(Error::invalid_mapping(format!(
                "`{}` extends a type in the hierarchy of `{}` that does not list it as derived",
                def.name,
                self.slot_name(*id)
            )));
        }

        Ok(base)
    }

    fn reserve_type(&mut self, def: &EntityDef) -> MetaTypeId {
        let id = MetaTypeId(self.slots.len());
        self.slots.push(TypeSlot::InProgress(def.name.clone()));
        self.types_by_type_id.insert(def.type_id, id);
        id
    }

    fn complete_type(&mut self, ty: MetaType) {
        let id = ty.id;
        self.slots[id.0] = TypeSlot::Built(ty);
    }

    fn slot_name(&self, id: MetaTypeId) -> &str {
        match &self.slots[id.0] {
            TypeSlot::InProgress(name) => name,
            TypeSlot::Built(ty) => &ty.name,
        }
    }

    fn add_table(&mut self, def: &EntityDef, row_type: MetaTypeId) -> Result<TableId> {
        let name = self
            .table_overrides
            .get(&def.type_id)
            .or(def.table_name.as_ref())
            .unwrap_or(&def.name);
        let name = self.config.table_name(name);

        if self.tables_by_name.contains_key(&name) {
            return Err(Error::invalid_mapping(format!(
                "table name `{name}` is used by more than one type"
            )));
        }

        let id = TableId(self.tables.len());
        self.tables_by_name.insert(name.clone(), id);
        self.tables.push(MetaTable { id, name, row_type });
        Ok(id)
    }

    fn take_types(&mut self) -> Result<Vec<MetaType>> {
        std::mem::take(&mut self.slots)
            .into_iter()
            .map(|slot| match slot {
                TypeSlot::Built(ty) => Ok(ty),
                TypeSlot::InProgress(name) => Err(Error::invalid_mapping(format!(
                    "type `{name}` was never completed"
                ))),
            })
            .collect()
    }

    fn member_name(&self, ty: &str, member: MemberId) -> String {
        format!("{ty}::{}", self.members[member.0].name)
    }
}
