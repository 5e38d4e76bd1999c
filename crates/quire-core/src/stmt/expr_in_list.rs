use super::*;

#[derive(Debug, Clone, PartialEq)]
pub struct ExprInList {
    pub expr: Box<Expr>,
    pub list: Vec<Expr>,

    /// When `true`, this is a `NOT IN` check.
    pub negate: bool,
}

impl Expr {
    pub fn in_list(lhs: impl Into<Self>, list: impl IntoIterator<Item = impl Into<Self>>) -> Self {
        ExprInList {
            expr: Box::new(lhs.into()),
            list: list.into_iter().map(Into::into).collect(),
            negate: false,
        }
        .into()
    }

    pub fn not_in_list(
        lhs: impl Into<Self>,
        list: impl IntoIterator<Item = impl Into<Self>>,
    ) -> Self {
        ExprInList {
            expr: Box::new(lhs.into()),
            list: list.into_iter().map(Into::into).collect(),
            negate: true,
        }
        .into()
    }
}

impl From<ExprInList> for Expr {
    fn from(value: ExprInList) -> Self {
        Self::InList(value)
    }
}
