use super::*;

/// Array-valued column tests.
///
/// # Examples
///
/// ```text
/// overlaps(tags, ["a", "b"])      // tags shares at least one element
/// contains(tags, ["a", "b"])      // tags holds every element
/// contained_by(tags, ["a", "b"])  // every element of tags is listed
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ExprArray {
    pub lhs: Box<Expr>,
    pub op: ArrayOp,

    /// Always a list of values.
    pub rhs: Vec<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayOp {
    Overlaps,
    Contains,
    ContainedBy,
}

impl Expr {
    pub fn array(lhs: impl Into<Self>, op: ArrayOp, rhs: Vec<Value>) -> Self {
        ExprArray {
            lhs: Box::new(lhs.into()),
            op,
            rhs,
        }
        .into()
    }
}

impl From<ExprArray> for Expr {
    fn from(value: ExprArray) -> Self {
        Self::Array(value)
    }
}
