use super::{Entity, EntityRef};
use crate::schema::EntryType;

/// The entry point of a mapping: a marker type that lists the tables of a
/// model.
///
/// ```
/// # use rowbind_core::schema::{ColumnDecl, Database, DatabaseDecl, Entity, EntityDecl};
/// struct Customer {
///     id: i64,
/// }
///
/// impl Entity for Customer {
///     fn mapping() -> EntityDecl<Self> {
///         EntityDecl::new().column(
///             ColumnDecl::new("id", |c: &Customer| c.id, |c, v| c.id = v).primary_key(),
///         )
///     }
/// }
///
/// struct Shop;
///
/// impl Database for Shop {
///     fn declare(db: &mut DatabaseDecl) {
///         db.name("shop").table::<Customer>();
///     }
/// }
/// ```
pub trait Database: 'static {
    fn declare(db: &mut DatabaseDecl);

    fn entry_type() -> EntryType
    where
        Self: Sized,
    {
        EntryType::of::<Self>()
    }
}

#[derive(Debug, Default)]
pub struct DatabaseDecl {
    pub(crate) name: Option<String>,
    pub(crate) tables: Vec<TableDef>,
}

#[derive(Debug)]
pub(crate) struct TableDef {
    pub(crate) entity: EntityRef,
    pub(crate) name: Option<String>,
}

impl DatabaseDecl {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Sets the database name. Defaults to the entry type's name.
    pub fn name(&mut self, name: &str) -> &mut Self {
        self.name = Some(name.to_string());
        self
    }

    /// Maps `T`, and through its associations everything reachable from it.
    pub fn table<T: Entity>(&mut self) -> &mut Self {
        self.tables.push(TableDef {
            entity: EntityRef::of::<T>(),
            name: None,
        });
        self
    }

    /// Like [`DatabaseDecl::table`], overriding the table name the entity
    /// declares.
    pub fn table_named<T: Entity>(&mut self, name: &str) -> &mut Self {
        self.tables.push(TableDef {
            entity: EntityRef::of::<T>(),
            name: Some(name.to_string()),
        });
        self
    }
}
