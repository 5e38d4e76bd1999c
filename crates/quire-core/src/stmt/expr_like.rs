use super::*;

/// Tests if the string expression matches `pattern`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprLike {
    pub expr: Box<Expr>,
    pub pattern: Box<Expr>,

    /// Match regardless of letter case.
    pub case_insensitive: bool,

    /// When `true`, this is a `NOT LIKE` check.
    pub negate: bool,

    /// Escape character used by the pattern, if any.
    pub escape: Option<char>,
}

impl Expr {
    pub fn like(expr: impl Into<Self>, pattern: impl Into<Self>) -> Self {
        ExprLike {
            expr: Box::new(expr.into()),
            pattern: Box::new(pattern.into()),
            case_insensitive: false,
            negate: false,
            escape: None,
        }
        .into()
    }

    pub fn ilike(expr: impl Into<Self>, pattern: impl Into<Self>) -> Self {
        ExprLike {
            expr: Box::new(expr.into()),
            pattern: Box::new(pattern.into()),
            case_insensitive: true,
            negate: false,
            escape: None,
        }
        .into()
    }
}

impl ExprLike {
    /// Escapes `%`, `_` and the escape character itself so `value` matches
    /// literally inside a pattern using `\` as the escape character.
    pub fn escape_literal(value: &str) -> String {
        let mut escaped = String::with_capacity(value.len());

        for ch in value.chars() {
            if matches!(ch, '%' | '_' | '\\') {
                escaped.push('\\');
            }
            escaped.push(ch);
        }

        escaped
    }
}

impl From<ExprLike> for Expr {
    fn from(value: ExprLike) -> Self {
        Self::Like(value)
    }
}
