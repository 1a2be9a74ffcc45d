use super::{MetaModel, MetaType, MetaTypeId};

use std::fmt;

/// A table and the hierarchy root whose rows it stores.
#[derive(Debug)]
pub struct MetaTable {
    /// Uniquely identifies the table within the model
    pub id: TableId,

    /// The table name, including any configured prefix
    pub name: String,

    pub row_type: MetaTypeId,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableId(pub usize);

impl MetaTable {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn row_type<'a>(&self, model: &'a MetaModel) -> &'a MetaType {
        model.meta_type(self.row_type)
    }
}

impl fmt::Debug for TableId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "TableId({})", self.0)
    }
}
