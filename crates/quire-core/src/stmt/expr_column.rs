use super::Expr;

/// A reference to a column of one of the tables in the statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExprColumn {
    /// The table the column belongs to.
    pub table: TableRef,

    /// The column name
    pub column: String,
}

/// Identifies the table a column is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableRef {
    /// The main table of whichever row the expression is evaluated against.
    /// Used by computed field expressions before they are bound to a query.
    This,

    /// A table aliased in the statement's `FROM` or `JOIN` clauses.
    Alias(String),
}

impl TableRef {
    pub fn is_this(&self) -> bool {
        matches!(self, Self::This)
    }
}

impl Expr {
    /// A column of the table aliased `table`.
    pub fn column(table: impl Into<String>, column: impl Into<String>) -> Self {
        ExprColumn {
            table: TableRef::Alias(table.into()),
            column: column.into(),
        }
        .into()
    }

    /// A column of the current row's main table. See [`Expr::bind_this`].
    pub fn this_column(column: impl Into<String>) -> Self {
        ExprColumn {
            table: TableRef::This,
            column: column.into(),
        }
        .into()
    }

    pub fn is_column(&self) -> bool {
        matches!(self, Self::Column(_))
    }
}

impl From<ExprColumn> for Expr {
    fn from(value: ExprColumn) -> Self {
        Self::Column(value)
    }
}
