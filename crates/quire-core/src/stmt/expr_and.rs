use super::*;

#[derive(Debug, Clone, PartialEq)]
pub struct ExprAnd {
    pub operands: Vec<Expr>,
}

impl Expr {
    pub fn and(lhs: impl Into<Self>, rhs: impl Into<Self>) -> Self {
        let mut lhs = lhs.into();
        let rhs = rhs.into();

        match (&mut lhs, rhs) {
            (expr, rhs) if expr.is_true() => rhs,
            (_, expr) if expr.is_true() => lhs,
            (Self::And(lhs_and), Self::And(rhs_and)) => {
                lhs_and.operands.extend(rhs_and.operands);
                lhs
            }
            (Self::And(lhs_and), rhs) => {
                lhs_and.operands.push(rhs);
                lhs
            }
            (_, rhs) => ExprAnd {
                operands: vec![lhs, rhs],
            }
            .into(),
        }
    }

    /// ANDs `operands`; the empty conjunction is `true`.
    pub fn and_from_vec(mut operands: Vec<Self>) -> Self {
        match operands.len() {
            0 => true.into(),
            1 => operands.remove(0),
            _ => ExprAnd { operands }.into(),
        }
    }

    /// ANDs the given conditions together. `None` means "no condition" and
    /// is returned when there are no operands.
    pub fn and_all(operands: impl IntoIterator<Item = Self>) -> Option<Self> {
        let operands: Vec<_> = operands.into_iter().collect();

        if operands.is_empty() {
            None
        } else {
            Some(Self::and_from_vec(operands))
        }
    }
}

impl From<ExprAnd> for Expr {
    fn from(value: ExprAnd) -> Self {
        Self::And(value)
    }
}
