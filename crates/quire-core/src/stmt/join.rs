use super::{Expr, TableFactor};

#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    /// The table to join
    pub table: TableFactor,

    /// The join condition
    pub constraint: JoinOp,
}

#[derive(Debug, Clone, PartialEq)]
pub enum JoinOp {
    Left(Expr),
    Inner(Expr),
}

impl Join {
    pub fn left(table: TableFactor, on: Expr) -> Self {
        Self {
            table,
            constraint: JoinOp::Left(on),
        }
    }

    pub fn inner(table: TableFactor, on: Expr) -> Self {
        Self {
            table,
            constraint: JoinOp::Inner(on),
        }
    }
}
