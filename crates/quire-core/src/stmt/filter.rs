use super::Expr;

/// The `WHERE` clause of a statement. `None` matches every row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    pub expr: Option<Expr>,
}

impl Filter {
    pub fn new(expr: impl Into<Option<Expr>>) -> Self {
        Self { expr: expr.into() }
    }

    pub fn is_empty(&self) -> bool {
        self.expr.is_none()
    }

    /// ANDs `filter` into the existing condition.
    pub fn add_filter(&mut self, filter: impl Into<Filter>) {
        let Some(expr) = filter.into().expr else {
            return;
        };

        self.expr = Some(match self.expr.take() {
            Some(existing) => Expr::and(existing, expr),
            None => expr,
        });
    }
}

impl From<Expr> for Filter {
    fn from(value: Expr) -> Self {
        Self { expr: Some(value) }
    }
}

impl From<Option<Expr>> for Filter {
    fn from(value: Option<Expr>) -> Self {
        Self { expr: value }
    }
}
