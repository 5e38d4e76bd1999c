use super::Expr;

/// Evaluates to the first operand that is not null.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprCoalesce {
    pub operands: Vec<Expr>,
}

impl Expr {
    pub fn coalesce(operands: impl IntoIterator<Item = impl Into<Self>>) -> Self {
        ExprCoalesce {
            operands: operands.into_iter().map(Into::into).collect(),
        }
        .into()
    }
}

impl From<ExprCoalesce> for Expr {
    fn from(value: ExprCoalesce) -> Self {
        Self::Coalesce(value)
    }
}
