use super::*;

#[derive(Debug, Clone, PartialEq)]
pub struct ExprOr {
    pub operands: Vec<Expr>,
}

impl Expr {
    pub fn or(lhs: impl Into<Self>, rhs: impl Into<Self>) -> Self {
        let mut lhs = lhs.into();
        let rhs = rhs.into();

        match (&mut lhs, rhs) {
            (Self::Or(lhs_or), Self::Or(rhs_or)) => {
                lhs_or.operands.extend(rhs_or.operands);
                lhs
            }
            (Self::Or(lhs_or), rhs) => {
                lhs_or.operands.push(rhs);
                lhs
            }
            (_, rhs) => ExprOr {
                operands: vec![lhs, rhs],
            }
            .into(),
        }
    }

    /// ORs the given conditions together. `None` means "no condition" and
    /// is returned when there are no operands.
    pub fn or_all(operands: impl IntoIterator<Item = Self>) -> Option<Self> {
        let mut operands: Vec<_> = operands.into_iter().collect();

        match operands.len() {
            0 => None,
            1 => Some(operands.remove(0)),
            _ => Some(ExprOr { operands }.into()),
        }
    }
}

impl From<ExprOr> for Expr {
    fn from(value: ExprOr) -> Self {
        Self::Or(value)
    }
}
