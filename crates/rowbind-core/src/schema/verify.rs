use super::{MemberId, MetaModel};
use crate::{Error, Result};

use std::collections::HashSet;

struct Verify<'a> {
    model: &'a MetaModel,
}

pub(super) fn verify(model: &MetaModel) -> Result<()> {
    Verify { model }.verify()
}

impl Verify<'_> {
    fn verify(&self) -> Result<()> {
        debug_assert!(self.verify_ids_match_positions());

        self.verify_has_tables()?;
        self.verify_ordinals_are_unique();
        self.verify_persistent_members_are_data_members();
        self.verify_hierarchies_share_discriminator()?;
        self.verify_tables_map_roots();
        Ok(())
    }

    fn verify_ids_match_positions(&self) -> bool {
        for (index, ty) in self.model.types.iter().enumerate() {
            assert_eq!(ty.id.0, index);
        }

        for (index, member) in self.model.members.iter().enumerate() {
            assert_eq!(member.id.0, index);
        }

        for (index, association) in self.model.associations.iter().enumerate() {
            assert_eq!(association.id.0, index);
        }

        true
    }

    fn verify_has_tables(&self) -> Result<()> {
        if self.model.tables.is_empty() {
            return Err(Error::invalid_mapping(format!(
                "model for `{}` has no tables",
                self.model.entry.name()
            )));
        }

        Ok(())
    }

    fn verify_ordinals_are_unique(&self) {
        for ty in &self.model.types {
            for (position, id) in ty.data_members.iter().enumerate() {
                assert_eq!(
                    self.model.member(*id).ordinal,
                    position,
                    "member ordinals of `{}` are out of order",
                    ty.name
                );
            }
        }
    }

    fn verify_persistent_members_are_data_members(&self) {
        for ty in &self.model.types {
            let data: HashSet<MemberId> = ty.data_members.iter().copied().collect();

            for id in &ty.persistent_data_members {
                assert!(data.contains(id));
            }

            for id in ty.identity_members.iter().chain(&ty.version_member) {
                assert!(ty.persistent_data_members.contains(id));
            }
        }
    }

    fn verify_hierarchies_share_discriminator(&self) -> Result<()> {
        for ty in &self.model.types {
            let root = self.model.meta_type(ty.inheritance.root);

            if ty.discriminator != root.discriminator {
                return Err(Error::invalid_mapping(format!(
                    "`{}` and its hierarchy root `{}` disagree on the discriminator",
                    ty.name, root.name
                )));
            }

            if ty.table != root.table {
                return Err(Error::invalid_mapping(format!(
                    "`{}` is not stored in the table of its hierarchy root `{}`",
                    ty.name, root.name
                )));
            }
        }

        Ok(())
    }

    fn verify_tables_map_roots(&self) {
        for table in &self.model.tables {
            assert!(self.model.meta_type(table.row_type).is_inheritance_root());
        }
    }
}
