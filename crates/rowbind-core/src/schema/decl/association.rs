use super::EntityRef;
use crate::schema::Entity;

use std::marker::PhantomData;

/// A member of `T` relating it to another entity.
///
/// Keys not declared explicitly are resolved by convention when the model
/// is built: the referenced side defaults to its identity members, the
/// referencing side to a member named after the referenced entity, such as
/// `customer_id` for `Customer`.
pub struct AssociationDecl<T> {
    def: AssociationDef,
    _p: PhantomData<fn(&T)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AssociationKind {
    /// This side holds the foreign key.
    BelongsTo,
    HasOne,
    HasMany,
}

pub(crate) struct AssociationDef {
    pub(crate) name: String,
    pub(crate) kind: AssociationKind,
    pub(crate) other: EntityRef,
    pub(crate) this_key: Option<Vec<String>>,
    pub(crate) other_key: Option<Vec<String>>,
    pub(crate) unique: bool,
    pub(crate) nullable: Option<bool>,
    pub(crate) delete_rule: Option<String>,
    pub(crate) delete_on_null: bool,
    pub(crate) pair: Option<String>,
    pub(crate) deferred: bool,
}

impl<T: 'static> AssociationDecl<T> {
    /// `T` references one `O` through a foreign key stored on `T`.
    pub fn belongs_to<O: Entity>(name: &str) -> Self {
        Self::new::<O>(name, AssociationKind::BelongsTo)
    }

    /// At most one `O` references `T`.
    pub fn has_one<O: Entity>(name: &str) -> Self {
        Self::new::<O>(name, AssociationKind::HasOne)
    }

    /// Any number of `O` reference `T`.
    pub fn has_many<O: Entity>(name: &str) -> Self {
        Self::new::<O>(name, AssociationKind::HasMany)
    }

    fn new<O: Entity>(name: &str, kind: AssociationKind) -> Self {
        Self {
            def: AssociationDef {
                name: name.to_string(),
                kind,
                other: EntityRef::of::<O>(),
                this_key: None,
                other_key: None,
                unique: false,
                nullable: None,
                delete_rule: None,
                delete_on_null: false,
                pair: None,
                deferred: true,
            },
            _p: PhantomData,
        }
    }

    /// Members of `T` forming this side of the key.
    pub fn this_key(mut self, members: &[&str]) -> Self {
        self.def.this_key = Some(members.iter().map(|m| m.to_string()).collect());
        self
    }

    /// Members of the other entity forming its side of the key.
    pub fn other_key(mut self, members: &[&str]) -> Self {
        self.def.other_key = Some(members.iter().map(|m| m.to_string()).collect());
        self
    }

    /// The key is unique: a one-to-one relationship.
    pub fn unique(mut self) -> Self {
        self.def.unique = true;
        self
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.def.nullable = Some(nullable);
        self
    }

    /// The rule applied to referencing rows when the referenced row is
    /// deleted, e.g. `"CASCADE"`.
    pub fn delete_rule(mut self, rule: &str) -> Self {
        self.def.delete_rule = Some(rule.to_string());
        self
    }

    /// Delete this row when the association is set to null.
    pub fn delete_on_null(mut self) -> Self {
        self.def.delete_on_null = true;
        self
    }

    /// Names the association on the other entity that is the reverse of
    /// this one.
    pub fn pair(mut self, other_member: &str) -> Self {
        self.def.pair = Some(other_member.to_string());
        self
    }

    /// Loads the associated rows together with this one.
    pub fn eager(mut self) -> Self {
        self.def.deferred = false;
        self
    }

    pub(crate) fn into_def(self) -> AssociationDef {
        self.def
    }
}
