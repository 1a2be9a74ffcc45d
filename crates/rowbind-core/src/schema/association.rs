use super::{MemberId, MetaModel, MetaType, MetaTypeId};
use crate::{Error, Result};

use std::fmt;

/// One side of a relationship between two mapped types.
#[derive(Debug)]
pub struct MetaAssociation {
    /// Uniquely identifies the association within the model
    pub id: AssociationId,

    /// The association member on the declaring type
    pub this_member: MemberId,

    pub this_type: MetaTypeId,

    pub other_type: MetaTypeId,

    /// The association on the other type that is the reverse of this one
    pub other_member: Option<MemberId>,

    /// True if this side refers to many rows of the other type.
    pub is_many: bool,

    /// True if this side holds the foreign key.
    pub is_foreign_key: bool,

    pub is_unique: bool,

    pub is_nullable: bool,

    pub delete_rule: Option<String>,

    pub delete_on_null: bool,

    pub keys: AssociationKeys,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct AssociationId(pub usize);

/// The key members joining the two sides.
#[derive(Debug, Clone)]
pub enum AssociationKeys {
    Resolved(ResolvedKeys),

    /// The keys could not be inferred. The model still builds; using the keys
    /// fails with the recorded reason.
    Unresolved(String),
}

#[derive(Debug, Clone)]
pub struct ResolvedKeys {
    pub this_key: Vec<MemberId>,
    pub other_key: Vec<MemberId>,

    /// True if `this_key` is the identity of this type.
    pub this_key_is_primary_key: bool,

    /// True if `other_key` is the identity of the other type.
    pub other_key_is_primary_key: bool,
}

impl MetaAssociation {
    pub fn this_type<'a>(&self, model: &'a MetaModel) -> &'a MetaType {
        model.meta_type(self.this_type)
    }

    pub fn other_type<'a>(&self, model: &'a MetaModel) -> &'a MetaType {
        model.meta_type(self.other_type)
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self.keys, AssociationKeys::Resolved(_))
    }

    /// The resolved keys, or an invalid mapping error describing why they
    /// could not be resolved.
    pub fn keys(&self) -> Result<&ResolvedKeys> {
        match &self.keys {
            AssociationKeys::Resolved(keys) => Ok(keys),
            AssociationKeys::Unresolved(reason) => Err(Error::invalid_mapping(reason.clone())),
        }
    }

    pub fn this_key(&self) -> Result<&[MemberId]> {
        Ok(&self.keys()?.this_key)
    }

    pub fn other_key(&self) -> Result<&[MemberId]> {
        Ok(&self.keys()?.other_key)
    }
}

impl fmt::Debug for AssociationId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "AssociationId({})", self.0)
    }
}
