use super::{Builder, PendingAssociation};
use crate::schema::accessor::{HierarchyAccessor, MetaAccessor, Projection};
use crate::schema::classify::{
    is_supported_discriminator_type, is_supported_identity_type, is_supported_version_type,
};
use crate::schema::decl::{AssociationKind, ColumnDef, EntityDef, MemberDef};
use crate::schema::{
    AssociationId, AutoSync, Inheritance, MemberId, MemberTy, MetaDataMember, MetaType, MetaTypeId,
    ScalarMember,
};
use crate::stmt::Value;
use crate::{Error, Result};

use std::sync::Arc;

/// A type of the hierarchy being built.
struct Node {
    def: EntityDef,
    id: MetaTypeId,
    parent: Option<usize>,
    data_members: Vec<MemberId>,
    associations: Vec<AssociationId>,
}

impl Builder<'_> {
    /// Builds `root` and every type derived from it, then follows their
    /// associations.
    pub(super) fn build_hierarchy(&mut self, root: EntityDef) -> Result<MetaTypeId> {
        let mut nodes = self.collect_hierarchy(root)?;
        let root_id = nodes[0].id;
        let table = self.add_table(&nodes[0].def, root_id)?;

        let projections: Arc<[Arc<dyn Projection>]> = nodes
            .iter()
            .filter_map(|node| node.def.extends.as_ref())
            .map(|extends| extends.projection.clone())
            .collect();

        let first_association = self.pending.len();

        for index in 0..nodes.len() {
            self.add_members(&mut nodes, index, &projections)?;
        }

        if nodes[0].data_members.is_empty() {
            return Err(Error::invalid_mapping(format!(
                "`{}` declares no data members",
                nodes[0].def.name
            )));
        }

        let discriminator = self.hierarchy_discriminator(&nodes)?;
        let codes = self.inheritance_codes(&nodes, discriminator)?;
        let default = self.inheritance_default(&nodes)?;
        let all: Vec<MetaTypeId> = nodes.iter().map(|node| node.id).collect();

        for (index, node) in nodes.iter().enumerate() {
            let identity_members = self.identity_members(&nodes, index)?;
            let version_member = self.version_member(node)?;

            let persistent_data_members = node
                .data_members
                .iter()
                .copied()
                .filter(|id| self.members[id.0].is_persistent())
                .collect();

            let derived = nodes
                .iter()
                .filter(|other| other.parent == Some(index))
                .map(|other| other.id)
                .collect();

            self.complete_type(MetaType {
                id: node.id,
                type_id: node.def.type_id,
                type_name: node.def.type_name,
                name: node.def.name.clone(),
                table,
                can_instantiate: node.def.can_instantiate,
                data_members: node.data_members.clone(),
                persistent_data_members,
                identity_members,
                associations: node.associations.clone(),
                version_member,
                discriminator,
                inheritance: Inheritance {
                    root: root_id,
                    base: node.parent.map(|parent| nodes[parent].id),
                    derived,
                    types: all.clone(),
                    code: codes[index].clone(),
                    is_default: default == Some(node.id),
                    default,
                },
            });
        }

        // Every type of the hierarchy is registered, so associations leading
        // back into it resolve to the ids reserved above.
        let others: Vec<_> = self.pending[first_association..]
            .iter()
            .map(|pending| pending.def.other)
            .collect();

        for other in others {
            self.visit(other)?;
        }

        Ok(root_id)
    }

    /// Loads the declarations of `root` and its derived types, parents first,
    /// and reserves an id for each.
    fn collect_hierarchy(&mut self, root: EntityDef) -> Result<Vec<Node>> {
        let mut defs = vec![(root, None)];
        let mut index = 0;

        while index < defs.len() {
            let (parent_type_id, parent_name, derived) = {
                let (parent, _) = &defs[index];
                (parent.type_id, parent.name.clone(), parent.derived.clone())
            };

            for entity in derived {
                if defs.iter().any(|(def, _)| def.type_id == entity.type_id)
                    || self.types_by_type_id.contains_key(&entity.type_id)
                {
                    return Err(Error::invalid_mapping(format!(
                        "`{}` is listed as a derived type more than once",
                        entity.type_name
                    )));
                }

                let def = entity.load();

                match &def.extends {
                    Some(extends) if extends.base.type_id == parent_type_id => {}
                    _ => {
                        return Err(Error::invalid_mapping(format!(
                            "`{}` is listed as derived from `{parent_name}` but does not extend it",
                            def.name
                        )))
                    }
                }

                defs.push((def, Some(index)));
            }

            index += 1;
        }

        Ok(defs
            .into_iter()
            .map(|(def, parent)| Node {
                id: self.reserve_type(&def),
                def,
                parent,
                data_members: vec![],
                associations: vec![],
            })
            .collect())
    }

    fn add_members(
        &mut self,
        nodes: &mut [Node],
        index: usize,
        projections: &Arc<[Arc<dyn Projection>]>,
    ) -> Result<()> {
        let (mut data_members, mut associations) = match nodes[index].parent {
            Some(parent) => (
                nodes[parent].data_members.clone(),
                nodes[parent].associations.clone(),
            ),
            None => (vec![], vec![]),
        };

        let node = &mut nodes[index];
        let is_derived = node.parent.is_some();

        for member in std::mem::take(&mut node.def.members) {
            if let Some(existing) = data_members
                .iter()
                .find(|id| self.members[id.0].name == member.name())
            {
                let declared_by = if self.members[existing.0].declaring_type == node.id {
                    "declared twice"
                } else {
                    "already declared by a base type"
                };
                return Err(Error::invalid_mapping(format!(
                    "member `{}::{}` is {declared_by}",
                    node.def.name,
                    member.name()
                )));
            }

            let id = MemberId(self.members.len());
            let ordinal = data_members.len();

            let member = match member {
                MemberDef::Column(column) => {
                    if column.primary_key && is_derived {
                        return Err(Error::invalid_mapping(format!(
                            "derived type `{}` declares primary key member `{}`; the identity is inherited from the hierarchy root",
                            node.def.name, column.name
                        )));
                    }

                    self.scalar_member(id, ordinal, node, column, projections)?
                }
                MemberDef::Association(def) => {
                    let association = AssociationId(self.pending.len());
                    associations.push(association);

                    let member = MetaDataMember {
                        id,
                        name: def.name.clone(),
                        ordinal,
                        declaring_type: node.id,
                        nullable: def.nullable.unwrap_or(def.kind != AssociationKind::HasMany),
                        deferred: def.deferred,
                        ty: MemberTy::Association(association),
                    };

                    self.pending.push(PendingAssociation {
                        id: association,
                        this_type: node.id,
                        this_member: id,
                        def,
                    });

                    member
                }
            };

            self.members.push(member);
            data_members.push(id);
        }

        node.data_members = data_members;
        node.associations = associations;
        Ok(())
    }

    fn scalar_member(
        &self,
        id: MemberId,
        ordinal: usize,
        node: &Node,
        column: ColumnDef,
        projections: &Arc<[Arc<dyn Projection>]>,
    ) -> Result<MetaDataMember> {
        let ty = column.accessor.ty().clone();
        let full_name = format!("{}::{}", node.def.name, column.name);

        let invalid = |role: &str| {
            Error::invalid_mapping(format!(
                "member `{full_name}` has type {ty}, which is not supported for {role}"
            ))
        };

        if column.primary_key && !is_supported_identity_type(&ty) {
            return Err(invalid("a primary key"));
        }

        if column.db_generated && !is_supported_identity_type(&ty) {
            return Err(invalid("database generated values"));
        }

        if column.discriminator && !is_supported_discriminator_type(&ty) {
            return Err(invalid("an inheritance discriminator"));
        }

        if column.version && !is_supported_version_type(&ty) {
            return Err(invalid("a row version"));
        }

        if !column.persistent
            && (column.primary_key || column.version || column.discriminator || column.db_generated)
        {
            return Err(Error::invalid_mapping(format!(
                "transient member `{full_name}` cannot be a key, version, discriminator or generated column"
            )));
        }

        let wrap = |accessor: Arc<dyn MetaAccessor>| -> Arc<dyn MetaAccessor> {
            if projections.is_empty() {
                accessor
            } else {
                Arc::new(HierarchyAccessor::new(
                    accessor,
                    node.def.type_id,
                    projections.clone(),
                ))
            }
        };

        let auto_sync = column.auto_sync.unwrap_or_else(|| {
            AutoSync::infer(
                column.db_generated,
                column.version,
                column.expression.is_some(),
            )
        });

        Ok(MetaDataMember {
            id,
            ordinal,
            declaring_type: node.id,
            nullable: column.nullable,
            deferred: column.deferred,
            ty: MemberTy::Scalar(ScalarMember {
                ty,
                column_name: column.column_name.unwrap_or_else(|| column.name.clone()),
                accessor: wrap(column.accessor),
                storage_accessor: column.storage.map(wrap),
                convert_to: column.convert_to,
                db_type: column.db_type,
                expression: column.expression,
                primary_key: column.primary_key,
                db_generated: column.db_generated,
                version: column.version,
                discriminator: column.discriminator,
                persistent: column.persistent,
                update_check: column.update_check,
                auto_sync,
            }),
            name: column.name,
        })
    }

    fn hierarchy_discriminator(&self, nodes: &[Node]) -> Result<Option<MemberId>> {
        let mut found: Option<MemberId> = None;

        for node in nodes {
            for id in &node.data_members {
                let member = &self.members[id.0];

                if !member.is_discriminator() || member.declaring_type != node.id {
                    continue;
                }

                if node.parent.is_some() {
                    return Err(Error::invalid_mapping(format!(
                        "discriminator `{}::{}` must be declared on the hierarchy root",
                        node.def.name, member.name
                    )));
                }

                if let Some(existing) = found {
                    return Err(Error::invalid_mapping(format!(
                        "`{}` declares more than one discriminator (`{}` and `{}`)",
                        node.def.name, self.members[existing.0].name, member.name
                    )));
                }

                found = Some(*id);
            }
        }

        if found.is_none() && nodes.len() > 1 {
            return Err(Error::invalid_mapping(format!(
                "`{}` has derived types but no discriminator",
                nodes[0].def.name
            )));
        }

        Ok(found)
    }

    /// Validates each type's inheritance code and casts it to the
    /// discriminator type.
    fn inheritance_codes(
        &self,
        nodes: &[Node],
        discriminator: Option<MemberId>,
    ) -> Result<Vec<Option<Value>>> {
        let discriminator_ty = discriminator.and_then(|id| self.members[id.0].member_ty());
        let mut codes: Vec<Option<Value>> = Vec::with_capacity(nodes.len());

        for node in nodes {
            let Some(code) = &node.def.inheritance_code else {
                if nodes.len() > 1 && node.def.can_instantiate {
                    return Err(Error::invalid_mapping(format!(
                        "`{}` is part of an inheritance hierarchy but has no inheritance code",
                        node.def.name
                    )));
                }
                codes.push(None);
                continue;
            };

            let Some(ty) = discriminator_ty else {
                return Err(Error::invalid_mapping(format!(
                    "`{}` declares an inheritance code but its hierarchy has no discriminator",
                    node.def.name
                )));
            };

            let code = ty.cast(code.clone()).map_err(|_| {
                Error::invalid_mapping(format!(
                    "inheritance code {code:?} of `{}` cannot be converted to discriminator type {ty}",
                    node.def.name
                ))
            })?;

            if let Some(position) = codes.iter().position(|other| other.as_ref() == Some(&code)) {
                return Err(Error::invalid_mapping(format!(
                    "`{}` and `{}` share inheritance code {code:?}",
                    nodes[position].def.name, node.def.name
                )));
            }

            codes.push(Some(code));
        }

        Ok(codes)
    }

    fn inheritance_default(&self, nodes: &[Node]) -> Result<Option<MetaTypeId>> {
        let mut defaults = nodes.iter().filter(|node| node.def.is_inheritance_default);

        let default = defaults.next();

        if let Some(second) = defaults.next() {
            return Err(Error::invalid_mapping(format!(
                "hierarchy of `{}` declares more than one default type (`{}` is also a default)",
                nodes[0].def.name, second.def.name
            )));
        }

        match default {
            Some(node) if !node.def.can_instantiate => Err(Error::invalid_mapping(format!(
                "abstract type `{}` cannot be the inheritance default",
                node.def.name
            ))),
            Some(node) => Ok(Some(node.id)),
            None if nodes.len() > 1 || nodes[0].def.inheritance_code.is_some() => {
                Err(Error::invalid_mapping(format!(
                    "hierarchy of `{}` has no inheritance default",
                    nodes[0].def.name
                )))
            }
            None => Ok(None),
        }
    }

    fn identity_members(&self, nodes: &[Node], index: usize) -> Result<Vec<MemberId>> {
        let identity: Vec<MemberId> = nodes[index]
            .data_members
            .iter()
            .copied()
            .filter(|id| self.members[id.0].is_primary_key())
            .collect();

        if identity.is_empty() && nodes[index].parent.is_none() && nodes.len() > 1 {
            return Err(Error::invalid_mapping(format!(
                "inheritance root `{}` declares no primary key",
                nodes[index].def.name
            )));
        }

        Ok(identity)
    }

    fn version_member(&self, node: &Node) -> Result<Option<MemberId>> {
        let mut versions = node
            .data_members
            .iter()
            .copied()
            .filter(|id| self.members[id.0].is_version());

        let version = versions.next();

        if versions.next().is_some() {
            return Err(Error::invalid_mapping(format!(
                "`{}` declares more than one version member",
                node.def.name
            )));
        }

        Ok(version)
    }
}
