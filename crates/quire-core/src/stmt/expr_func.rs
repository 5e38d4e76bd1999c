use super::Expr;

/// A scalar function call, e.g. `lower(title)` or `length(body)`.
///
/// The function name is emitted verbatim; only use names the target
/// database understands.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprFunc {
    pub name: String,
    pub args: Vec<Expr>,
}

impl Expr {
    pub fn func(name: impl Into<String>, args: impl IntoIterator<Item = impl Into<Self>>) -> Self {
        ExprFunc {
            name: name.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
        .into()
    }
}

impl From<ExprFunc> for Expr {
    fn from(value: ExprFunc) -> Self {
        Self::Func(value)
    }
}
