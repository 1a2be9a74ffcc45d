use crate::schema::accessor::{FieldAccessor, MetaAccessor};
use crate::schema::{AutoSync, UpdateCheck};
use crate::stmt::{Primitive, Type};

use std::marker::PhantomData;
use std::sync::Arc;

/// A scalar member of `T` mapped to a column.
pub struct ColumnDecl<T> {
    def: ColumnDef,
    _p: PhantomData<fn(&T)>,
}

pub(crate) struct ColumnDef {
    pub(crate) name: String,
    pub(crate) column_name: Option<String>,
    pub(crate) accessor: Arc<dyn MetaAccessor>,
    pub(crate) storage: Option<Arc<dyn MetaAccessor>>,
    pub(crate) primary_key: bool,
    pub(crate) db_generated: bool,
    pub(crate) version: bool,
    pub(crate) discriminator: bool,
    pub(crate) nullable: bool,
    pub(crate) db_type: Option<String>,
    pub(crate) convert_to: Option<Type>,
    pub(crate) expression: Option<String>,
    pub(crate) update_check: UpdateCheck,
    pub(crate) auto_sync: Option<AutoSync>,
    pub(crate) deferred: bool,
    pub(crate) persistent: bool,
}

impl<T: 'static> ColumnDecl<T> {
    /// Declares member `name`, read with `get` and written with `set`. The
    /// member type, and whether it accepts null, follow from `V`.
    pub fn new<V: Primitive>(name: &str, get: fn(&T) -> V, set: fn(&mut T, V)) -> Self {
        Self {
            def: ColumnDef {
                name: name.to_string(),
                column_name: None,
                accessor: Arc::new(FieldAccessor::new(get, set)),
                storage: None,
                primary_key: false,
                db_generated: false,
                version: false,
                discriminator: false,
                nullable: V::NULLABLE,
                db_type: None,
                convert_to: None,
                expression: None,
                update_check: UpdateCheck::Always,
                auto_sync: None,
                deferred: false,
                persistent: true,
            },
            _p: PhantomData,
        }
    }

    /// The column name, when it differs from the member name.
    pub fn column_name(mut self, name: &str) -> Self {
        self.def.column_name = Some(name.to_string());
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.def.primary_key = true;
        self
    }

    /// The database assigns this column's value on insert.
    pub fn db_generated(mut self) -> Self {
        self.def.db_generated = true;
        self
    }

    /// The column carries the row version used for optimistic concurrency.
    pub fn version(mut self) -> Self {
        self.def.version = true;
        self
    }

    /// The column selects the concrete type of each row in an inheritance
    /// hierarchy.
    pub fn discriminator(mut self) -> Self {
        self.def.discriminator = true;
        self
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.def.nullable = nullable;
        self
    }

    /// The column's database type, e.g. `"NVARCHAR(40) NOT NULL"`.
    pub fn db_type(mut self, db_type: &str) -> Self {
        self.def.db_type = Some(db_type.to_string());
        self
    }

    /// Values are converted to `ty` before they are sent to the database.
    pub fn convert_to(mut self, ty: Type) -> Self {
        self.def.convert_to = Some(ty);
        self
    }

    /// The column is computed by the database from `expression`.
    pub fn expression(mut self, expression: &str) -> Self {
        self.def.expression = Some(expression.to_string());
        self
    }

    pub fn update_check(mut self, update_check: UpdateCheck) -> Self {
        self.def.update_check = update_check;
        self
    }

    /// Overrides when the column is read back after a write. Without an
    /// override this follows from the other flags.
    pub fn auto_sync(mut self, auto_sync: AutoSync) -> Self {
        self.def.auto_sync = Some(auto_sync);
        self
    }

    /// The value is loaded on first access rather than with the row.
    pub fn deferred(mut self) -> Self {
        self.def.deferred = true;
        self
    }

    /// The member is described but never read from or written to a column.
    pub fn transient(mut self) -> Self {
        self.def.persistent = false;
        self
    }

    /// Reads and writes the column through a separate storage field,
    /// bypassing the public member.
    pub fn storage<S: Primitive>(mut self, get: fn(&T) -> S, set: fn(&mut T, S)) -> Self {
        self.def.storage = Some(Arc::new(FieldAccessor::new(get, set)));
        self
    }

    pub(crate) fn into_def(self) -> ColumnDef {
        self.def
    }
}
