use rowbind_core::schema::{AutoSync, MetaDataMember, MetaTable, MetaType};
use rowbind_core::stmt::Value;
use rowbind_core::{Database, Entity, Error, MappingSource, MetaModel, Result};

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::trace;

/// Typed access to the model of database `D`.
///
/// Moves values between entity instances and the column values a database
/// layer binds as parameters or reads from result rows.
pub struct Context<D> {
    model: Arc<MetaModel>,
    _p: PhantomData<fn() -> D>,
}

impl<D: Database> Context<D> {
    /// Uses the process-wide mapping source.
    pub fn new() -> Result<Self> {
        Self::with_source(crate::mapping_source())
    }

    pub fn with_source(source: &dyn MappingSource) -> Result<Self> {
        let model = source.get_model(Some(&D::entry_type()))?;

        Ok(Self {
            model,
            _p: PhantomData,
        })
    }

    pub fn model(&self) -> &Arc<MetaModel> {
        &self.model
    }

    pub fn table<T: Entity>(&self) -> Result<&MetaTable> {
        Ok(self.meta_type::<T>()?.table(&self.model))
    }

    pub fn meta_type<T: Entity>(&self) -> Result<&MetaType> {
        self.model.get_meta_type::<T>().ok_or_else(|| {
            Error::argument_invalid(format!(
                "`{}` is not mapped by `{}`",
                std::any::type_name::<T>(),
                self.model.entry_type().name()
            ))
        })
    }

    /// Column values to insert for `row`, in ordinal order. Columns the
    /// database generates or computes are left out.
    pub fn insert_values<T: Entity>(&self, row: &T) -> Result<Vec<(&str, Value)>> {
        self.column_values(row, |member| {
            let scalar = member.scalar();
            !member.is_db_generated() && scalar.is_some_and(|scalar| scalar.expression.is_none())
        })
    }

    /// Column values to write when updating `row`, in ordinal order. Identity,
    /// generated and computed columns are left out.
    pub fn update_values<T: Entity>(&self, row: &T) -> Result<Vec<(&str, Value)>> {
        self.column_values(row, |member| {
            let scalar = member.scalar();
            !member.is_primary_key()
                && !member.is_db_generated()
                && !member.is_version()
                && scalar.is_some_and(|scalar| scalar.expression.is_none())
        })
    }

    /// The identity values of `row`, in key order.
    pub fn identity<T: Entity>(&self, row: &T) -> Result<Vec<Value>> {
        self.meta_type::<T>()?
            .identity_members(&self.model)
            .map(|member| member.get_value_for_database(row))
            .collect()
    }

    /// Materializes a `T` from column values, matched by column name.
    pub fn load<'a, T: Entity + Default>(
        &self,
        columns: impl IntoIterator<Item = (&'a str, Value)>,
    ) -> Result<T> {
        let ty = self.meta_type::<T>()?;
        let mut row = T::default();

        for (column, value) in columns {
            let member = self.column(ty, column)?;
            trace!(column, member = member.name(), "Loading column");
            member.set_value_from_database(&mut row, value)?;
        }

        Ok(row)
    }

    /// Applies values read back after a write to the members that sync on
    /// it. Columns that do not sync for the operation are ignored.
    pub fn sync<'a, T: Entity>(
        &self,
        row: &mut T,
        inserted: bool,
        columns: impl IntoIterator<Item = (&'a str, Value)>,
    ) -> Result<()> {
        let ty = self.meta_type::<T>()?;

        for (column, value) in columns {
            let member = self.column(ty, column)?;

            let syncs = match member.auto_sync() {
                AutoSync::Always => true,
                AutoSync::OnInsert => inserted,
                AutoSync::OnUpdate => !inserted,
                AutoSync::Never => false,
            };

            if syncs {
                member.set_value_from_database(row, value)?;
            }
        }

        Ok(())
    }

    fn column<'m>(&'m self, ty: &'m MetaType, column: &str) -> Result<&'m MetaDataMember> {
        ty.persistent_data_members(&self.model)
            .find(|member| {
                !member.is_association() && member.mapped_name() == column
            })
            .ok_or_else(|| {
                Error::argument_invalid(format!("`{}` has no column `{column}`", ty.name))
            })
    }

    fn column_values<'m, T: Entity>(
        &'m self,
        row: &T,
        include: impl Fn(&MetaDataMember) -> bool,
    ) -> Result<Vec<(&'m str, Value)>> {
        self.meta_type::<T>()?
            .persistent_data_members(&self.model)
            .filter(|member| !member.is_association() && include(member))
            .map(|member| {
                let value = member.get_value_for_database(row)?;
                Ok((member.mapped_name(), value))
            })
            .collect()
    }
}

impl<D> Clone for Context<D> {
    fn clone(&self) -> Self {
        Self {
            model: self.model.clone(),
            _p: PhantomData,
        }
    }
}

impl<D> fmt::Debug for Context<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("entry", self.model.entry_type())
            .finish()
    }
}
