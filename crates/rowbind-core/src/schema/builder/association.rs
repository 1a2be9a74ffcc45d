use super::{Builder, PendingAssociation};
use crate::schema::decl::AssociationKind;
use crate::schema::{
    AssociationId, AssociationKeys, MemberId, MetaAssociation, MetaType, Name, ResolvedKeys,
};
use crate::{Error, Result};

use tracing::warn;

impl Builder<'_> {
    /// Resolves the keys of every association and pairs associations with
    /// their reverse side.
    pub(super) fn resolve_associations(
        &mut self,
        types: &[MetaType],
    ) -> Result<Vec<MetaAssociation>> {
        let pending = std::mem::take(&mut self.pending);

        let mut associations = pending
            .iter()
            .map(|pending| self.resolve_association(types, pending))
            .collect::<Result<Vec<_>>>()?;

        self.pair_associations(types, &pending, &mut associations)?;

        for association in &associations {
            self.members[association.this_member.0].nullable = association.is_nullable;
        }

        Ok(associations)
    }

    fn resolve_association(
        &self,
        types: &[MetaType],
        pending: &PendingAssociation,
    ) -> Result<MetaAssociation> {
        let def = &pending.def;
        let this = &types[pending.this_type.0];
        let other_id = self
            .types_by_type_id
            .get(&def.other.type_id)
            .copied()
            .ok_or_else(|| {
                Error::invalid_mapping(format!(
                    "association `{}::{}` references `{}`, which was never mapped",
                    this.name, def.name, def.other.type_name
                ))
            })?;
        let other = &types[other_id.0];
        let is_foreign_key = def.kind == AssociationKind::BelongsTo;

        let keys = match self.resolve_keys(this, other, pending)? {
            AssociationKeys::Unresolved(reason) if self.config.strict_associations => {
                return Err(Error::invalid_mapping(reason));
            }
            AssociationKeys::Unresolved(reason) => {
                warn!(
                    association = %format!("{}::{}", this.name, def.name),
                    %reason,
                    "Association keys could not be resolved"
                );
                AssociationKeys::Unresolved(reason)
            }
            keys => keys,
        };

        let is_nullable = def.nullable.unwrap_or_else(|| match &keys {
            AssociationKeys::Resolved(keys) if is_foreign_key => {
                keys.this_key.iter().any(|id| self.members[id.0].nullable)
            }
            _ => def.kind != AssociationKind::HasMany,
        });

        Ok(MetaAssociation {
            id: pending.id,
            this_member: pending.this_member,
            this_type: this.id,
            other_type: other.id,
            other_member: None,
            is_many: def.kind == AssociationKind::HasMany,
            is_foreign_key,
            is_unique: def.unique,
            is_nullable,
            delete_rule: def.delete_rule.clone(),
            delete_on_null: def.delete_on_null,
            keys,
        })
    }

    /// Declared keys that do not name members are errors. Keys left to
    /// convention that cannot be inferred are recorded as unresolved.
    fn resolve_keys(
        &self,
        this: &MetaType,
        other: &MetaType,
        pending: &PendingAssociation,
    ) -> Result<AssociationKeys> {
        let def = &pending.def;
        let full_name = format!("{}::{}", this.name, def.name);
        let is_foreign_key = def.kind == AssociationKind::BelongsTo;

        // The side holding the foreign key defaults to a member named after
        // the referenced type; the referenced side defaults to its identity.
        let this_key = match &def.this_key {
            Some(names) => self.lookup_key(this, names, &full_name)?,
            None if is_foreign_key => match self.convention_key(this, other) {
                Some(key) => key,
                None => {
                    return Ok(AssociationKeys::Unresolved(format!(
                        "association `{full_name}` declares no this_key and `{}` has no member named `{}`",
                        this.name,
                        Name::new(&other.name).foreign_key()
                    )))
                }
            },
            None if this.identity_members.is_empty() => {
                return Ok(AssociationKeys::Unresolved(format!(
                    "association `{full_name}` declares no this_key and `{}` has no identity",
                    this.name
                )))
            }
            None => this.identity_members.clone(),
        };

        let other_key = match &def.other_key {
            Some(names) => self.lookup_key(other, names, &full_name)?,
            None if !is_foreign_key => match self.convention_key(other, this) {
                Some(key) => key,
                None => {
                    return Ok(AssociationKeys::Unresolved(format!(
                        "association `{full_name}` declares no other_key and `{}` has no member named `{}`",
                        other.name,
                        Name::new(&this.name).foreign_key()
                    )))
                }
            },
            None if other.identity_members.is_empty() => {
                return Ok(AssociationKeys::Unresolved(format!(
                    "association `{full_name}` declares no other_key and `{}` has no identity",
                    other.name
                )))
            }
            None => other.identity_members.clone(),
        };

        if this_key.len() != other_key.len() {
            return Err(Error::invalid_mapping(format!(
                "association `{full_name}` has {} this_key members but {} other_key members",
                this_key.len(),
                other_key.len()
            )));
        }

        for (a, b) in this_key.iter().zip(&other_key) {
            let a = &self.members[a.0];
            let b = &self.members[b.0];

            let a_ty = a.member_ty().map(|ty| ty.non_nullable());
            let b_ty = b.member_ty().map(|ty| ty.non_nullable());

            if a_ty != b_ty {
                return Err(Error::invalid_mapping(format!(
                    "association `{full_name}` joins `{}` and `{}`, which have different types",
                    a.name, b.name
                )));
            }
        }

        Ok(AssociationKeys::Resolved(ResolvedKeys {
            this_key_is_primary_key: same_members(&this_key, &this.identity_members),
            other_key_is_primary_key: same_members(&other_key, &other.identity_members),
            this_key,
            other_key,
        }))
    }

    fn lookup_key(
        &self,
        ty: &MetaType,
        names: &[String],
        association: &str,
    ) -> Result<Vec<MemberId>> {
        if names.is_empty() {
            return Err(Error::invalid_mapping(format!(
                "association `{association}` declares an empty key"
            )));
        }

        names
            .iter()
            .map(|name| {
                ty.data_members
                    .iter()
                    .copied()
                    .find(|id| {
                        let member = &self.members[id.0];
                        member.scalar().is_some()
                            && member.is_persistent()
                            && (member.name == *name || member.mapped_name() == name.as_str())
                    })
                    .ok_or_else(|| {
                        Error::invalid_mapping(format!(
                            "association `{association}` names key member `{name}`, which is not a column of `{}`",
                            ty.name
                        ))
                    })
            })
            .collect()
    }

    /// The conventional foreign key on `ty` referencing the single identity
    /// member of `referenced`.
    fn convention_key(&self, ty: &MetaType, referenced: &MetaType) -> Option<Vec<MemberId>> {
        if referenced.identity_members.len() != 1 {
            return None;
        }

        let expected = Name::new(&Name::new(&referenced.name).foreign_key());

        ty.data_members
            .iter()
            .copied()
            .find(|id| {
                let member = &self.members[id.0];
                member.scalar().is_some()
                    && member.is_persistent()
                    && (expected.matches(&member.name) || expected.matches(member.mapped_name()))
            })
            .map(|id| vec![id])
    }

    fn pair_associations(
        &self,
        types: &[MetaType],
        pending: &[PendingAssociation],
        associations: &mut [MetaAssociation],
    ) -> Result<()> {
        let mut pairs = Vec::with_capacity(associations.len());

        for (association, pending) in associations.iter().zip(pending) {
            let this = &types[association.this_type.0];
            let other = &types[association.other_type.0];

            let pair = match &pending.def.pair {
                Some(name) => Some(self.declared_pair(types, associations, association, name)?),
                None => self.inferred_pair(types, associations, association),
            };

            if let Some(pair) = pair {
                if associations[pair.0].is_foreign_key && association.is_foreign_key {
                    return Err(Error::invalid_mapping(format!(
                        "`{}::{}` and `{}::{}` both hold the foreign key",
                        this.name,
                        pending.def.name,
                        other.name,
                        self.members[associations[pair.0].this_member.0].name
                    )));
                }
            }

            pairs.push(pair.map(|pair| associations[pair.0].this_member));
        }

        for (association, pair) in associations.iter_mut().zip(pairs) {
            association.other_member = pair;
        }

        Ok(())
    }

    fn declared_pair(
        &self,
        types: &[MetaType],
        associations: &[MetaAssociation],
        association: &MetaAssociation,
        name: &str,
    ) -> Result<AssociationId> {
        let this = &types[association.this_type.0];
        let other = &types[association.other_type.0];

        let member = other
            .data_members
            .iter()
            .map(|id| &self.members[id.0])
            .find(|member| member.name == name)
            .ok_or_else(|| {
                Error::invalid_mapping(format!(
                    "association on `{}` pairs with `{}::{name}`, which does not exist",
                    this.name, other.name
                ))
            })?;

        let Some(pair) = member.association() else {
            return Err(Error::invalid_mapping(format!(
                "association on `{}` pairs with `{}::{name}`, which is not an association",
                this.name, other.name
            )));
        };

        let paired = &associations[pair.0];
        if types[paired.other_type.0].inheritance.root != this.inheritance.root {
            return Err(Error::invalid_mapping(format!(
                "`{}::{name}` does not reference `{}` and cannot pair with its association",
                other.name, this.name
            )));
        }

        Ok(pair)
    }

    /// The unique association on the other type whose keys mirror this one.
    fn inferred_pair(
        &self,
        types: &[MetaType],
        associations: &[MetaAssociation],
        association: &MetaAssociation,
    ) -> Option<AssociationId> {
        let keys = association.keys().ok()?;
        let this_root = types[association.this_type.0].inheritance.root;

        let mut candidates = types[association.other_type.0]
            .associations
            .iter()
            .copied()
            .filter(|id| *id != association.id)
            .filter(|id| {
                let candidate = &associations[id.0];
                types[candidate.other_type.0].inheritance.root == this_root
                    && candidate.keys().is_ok_and(|other| {
                        other.this_key == keys.other_key && other.other_key == keys.this_key
                    })
            });

        let pair = candidates.next()?;
        candidates.next().is_none().then_some(pair)
    }
}

fn same_members(a: &[MemberId], b: &[MemberId]) -> bool {
    let mut a = a.to_vec();
    let mut b = b.to_vec();
    a.sort();
    b.sort();
    !a.is_empty() && a == b
}
