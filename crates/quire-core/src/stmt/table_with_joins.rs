use super::*;

#[derive(Debug, Clone, PartialEq)]
pub struct TableWithJoins {
    /// Identify a table
    pub table: TableFactor,

    /// Joins to apply
    pub joins: Vec<Join>,
}

/// A table and the alias it is referenced by in the statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableFactor {
    pub name: String,
    pub alias: String,
}

impl TableFactor {
    pub fn new(name: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: alias.into(),
        }
    }
}

impl From<TableFactor> for TableWithJoins {
    fn from(value: TableFactor) -> Self {
        Self {
            table: value,
            joins: vec![],
        }
    }
}
