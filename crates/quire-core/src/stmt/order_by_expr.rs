use super::{Direction, Expr};

#[derive(Debug, Clone, PartialEq)]
pub struct OrderByExpr {
    /// The expression
    pub expr: Expr,

    /// Ascending or descending
    pub order: Option<Direction>,
}

impl OrderByExpr {
    pub fn asc(expr: impl Into<Expr>) -> Self {
        Self {
            expr: expr.into(),
            order: Some(Direction::Asc),
        }
    }

    pub fn desc(expr: impl Into<Expr>) -> Self {
        Self {
            expr: expr.into(),
            order: Some(Direction::Desc),
        }
    }

    /// Flips the direction by which the query is ordered.
    pub fn reverse(&mut self) {
        self.order = match self.order {
            Some(Direction::Desc) => Some(Direction::Asc),
            _ => Some(Direction::Desc),
        }
    }
}
