use super::Expr;

/// The projection part of a SQL query.
#[derive(Debug, Clone, PartialEq)]
pub enum Returning {
    /// `SELECT 1`, used by existence subqueries
    One,

    /// `SELECT COUNT(*)`
    Count,

    /// Named expressions
    Items(Vec<SelectItem>),
}

/// An aliased expression in the select list.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectItem {
    pub expr: Expr,
    pub alias: String,
}

impl SelectItem {
    pub fn new(expr: impl Into<Expr>, alias: impl Into<String>) -> Self {
        Self {
            expr: expr.into(),
            alias: alias.into(),
        }
    }
}

impl Returning {
    pub fn as_items(&self) -> Option<&[SelectItem]> {
        match self {
            Self::Items(items) => Some(items),
            _ => None,
        }
    }
}
