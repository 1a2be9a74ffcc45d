use super::{AssociationId, MetaAccessor, MetaModel, MetaType, MetaTypeId};
use crate::stmt::{Type, Value};
use crate::{Error, Result};

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A member of a mapped type: either a scalar column or one side of an
/// association.
#[derive(Debug)]
pub struct MetaDataMember {
    /// Uniquely identifies the member within the model
    pub id: MemberId,

    /// The member name as declared
    pub name: String,

    /// Position of the member within every type that carries it
    pub ordinal: usize,

    /// The type that declares the member. Members declared on a base type
    /// are shared by its derived types.
    pub declaring_type: MetaTypeId,

    /// True if the member can hold null.
    pub nullable: bool,

    /// True if the value is loaded on first access rather than with the row.
    pub deferred: bool,

    pub ty: MemberTy,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemberId(pub usize);

#[derive(Debug)]
pub enum MemberTy {
    Scalar(ScalarMember),
    Association(AssociationId),
}

#[derive(Debug)]
pub struct ScalarMember {
    /// The declared member type
    pub ty: Type,

    /// The column the member maps to
    pub column_name: String,

    pub accessor: Arc<dyn MetaAccessor>,

    /// Accessor for the backing storage field, if one was declared
    pub storage_accessor: Option<Arc<dyn MetaAccessor>>,

    /// Values are converted to this type before reaching the database
    pub convert_to: Option<Type>,

    pub db_type: Option<String>,

    /// Set when the database computes the column
    pub expression: Option<String>,

    pub primary_key: bool,
    pub db_generated: bool,
    pub version: bool,
    pub discriminator: bool,

    /// False for transient members, which have no column
    pub persistent: bool,

    pub update_check: UpdateCheck,
    pub auto_sync: AutoSync,
}

/// When a member takes part in optimistic concurrency checks on update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UpdateCheck {
    #[default]
    Always,
    Never,
    WhenChanged,
}

/// When a member's value is read back from the database after a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoSync {
    Never,
    OnInsert,
    OnUpdate,
    Always,
}

impl MetaDataMember {
    pub fn id(&self) -> MemberId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The column name for scalar members, the member name otherwise.
    pub fn mapped_name(&self) -> &str {
        match &self.ty {
            MemberTy::Scalar(scalar) => &scalar.column_name,
            MemberTy::Association(_) => &self.name,
        }
    }

    pub fn declaring_type<'a>(&self, model: &'a MetaModel) -> &'a MetaType {
        model.meta_type(self.declaring_type)
    }

    pub fn scalar(&self) -> Option<&ScalarMember> {
        match &self.ty {
            MemberTy::Scalar(scalar) => Some(scalar),
            MemberTy::Association(_) => None,
        }
    }

    pub fn association(&self) -> Option<AssociationId> {
        match self.ty {
            MemberTy::Association(id) => Some(id),
            MemberTy::Scalar(_) => None,
        }
    }

    /// The declared type, for scalar members.
    pub fn member_ty(&self) -> Option<&Type> {
        self.scalar().map(|scalar| &scalar.ty)
    }

    pub fn accessor(&self) -> Option<&Arc<dyn MetaAccessor>> {
        self.scalar().map(|scalar| &scalar.accessor)
    }

    /// The accessor values are loaded and saved through: the storage accessor
    /// when one was declared, the member accessor otherwise.
    pub fn storage_accessor(&self) -> Option<&Arc<dyn MetaAccessor>> {
        let scalar = self.scalar()?;
        let storage = scalar.storage_accessor.as_ref();
        Some(storage.unwrap_or(&scalar.accessor))
    }

    pub fn is_association(&self) -> bool {
        matches!(self.ty, MemberTy::Association(_))
    }

    /// True for columns and associations; false for transient members.
    pub fn is_persistent(&self) -> bool {
        self.scalar().map(|scalar| scalar.persistent).unwrap_or(true)
    }

    pub fn is_primary_key(&self) -> bool {
        self.scalar().is_some_and(|scalar| scalar.primary_key)
    }

    pub fn is_db_generated(&self) -> bool {
        self.scalar().is_some_and(|scalar| scalar.db_generated)
    }

    pub fn is_version(&self) -> bool {
        self.scalar().is_some_and(|scalar| scalar.version)
    }

    pub fn is_discriminator(&self) -> bool {
        self.scalar().is_some_and(|scalar| scalar.discriminator)
    }

    pub fn update_check(&self) -> UpdateCheck {
        self.scalar()
            .map(|scalar| scalar.update_check)
            .unwrap_or(UpdateCheck::Never)
    }

    pub fn auto_sync(&self) -> AutoSync {
        self.scalar()
            .map(|scalar| scalar.auto_sync)
            .unwrap_or(AutoSync::Never)
    }

    /// Reads the member from `instance` and converts it for the database.
    pub fn get_value_for_database(&self, instance: &dyn Any) -> Result<Value> {
        let scalar = self.scalar_or_err()?;
        let accessor = scalar.storage_accessor.as_ref().unwrap_or(&scalar.accessor);
        self.convert_value_for_database(accessor.get_boxed_value(instance)?)
    }

    /// Converts a member value to the type the database expects: the
    /// declared conversion target if there is one, the member type
    /// otherwise. Null is rejected unless the member accepts it.
    pub fn convert_value_for_database(&self, value: Value) -> Result<Value> {
        let scalar = self.scalar_or_err()?;

        if value.is_null() {
            if self.nullable {
                return Ok(value);
            }
            return Err(Error::type_conversion(value, scalar.ty.to_string()));
        }

        scalar.convert_to.as_ref().unwrap_or(&scalar.ty).cast(value)
    }

    /// Writes a value read from the database into the member of `instance`.
    pub fn set_value_from_database(&self, instance: &mut dyn Any, value: Value) -> Result<()> {
        let scalar = self.scalar_or_err()?;
        let accessor = scalar.storage_accessor.as_ref().unwrap_or(&scalar.accessor);
        accessor.set_boxed_value(instance, value)
    }

    fn scalar_or_err(&self) -> Result<&ScalarMember> {
        self.scalar().ok_or_else(|| {
            Error::argument_invalid(format!(
                "member `{}` is an association and has no column value",
                self.name
            ))
        })
    }
}

impl AutoSync {
    /// The default for a member with the given flags.
    pub(crate) fn infer(db_generated: bool, version: bool, expression: bool) -> Self {
        if version {
            AutoSync::Always
        } else if db_generated {
            AutoSync::OnInsert
        } else if expression {
            AutoSync::Always
        } else {
            AutoSync::Never
        }
    }
}

impl fmt::Debug for MemberId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "MemberId({})", self.0)
    }
}
