use super::*;
use std::fmt;

#[derive(Clone, PartialEq)]
pub enum Expr {
    /// AND a set of boolean expressions
    And(ExprAnd),

    /// Array overlap / containment test
    Array(ExprArray),

    /// Binary expression
    BinaryOp(ExprBinaryOp),

    /// First non-null operand
    Coalesce(ExprCoalesce),

    /// References a column of a table in the statement
    Column(ExprColumn),

    /// Whether a subquery returns any rows
    Exists(ExprExists),

    /// Scalar function call
    Func(ExprFunc),

    /// In list
    InList(ExprInList),

    /// Whether an expression is (or is not) null. This is different from a
    /// binary expression because of how databases treat null comparisons.
    IsNull(ExprIsNull),

    /// Pattern match
    Like(ExprLike),

    /// Negates a boolean expression
    Not(ExprNot),

    /// OR a set of boolean expressions
    Or(ExprOr),

    /// Evaluates to a constant value
    Value(Value),
}

impl Expr {
    /// Returns true if the expression is the `true` boolean expression
    pub fn is_true(&self) -> bool {
        matches!(self, Self::Value(Value::Bool(true)))
    }

    /// Rewrites every [`TableRef::This`] column reference to point at `alias`.
    ///
    /// Computed expressions are declared against "the current row" and are
    /// bound to a concrete table alias when a query uses them.
    pub fn bind_this(&mut self, alias: &str) {
        struct BindThis<'a>(&'a str);

        impl VisitMut for BindThis<'_> {
            fn visit_expr_column_mut(&mut self, i: &mut ExprColumn) {
                if i.table.is_this() {
                    i.table = TableRef::Alias(self.0.to_string());
                }
            }
        }

        BindThis(alias).visit_expr_mut(self);
    }

    /// Returns a copy of the expression bound to `alias`. See [`Expr::bind_this`].
    pub fn bound_to(&self, alias: &str) -> Self {
        let mut bound = self.clone();
        bound.bind_this(alias);
        bound
    }
}

impl Default for Expr {
    fn default() -> Self {
        Self::Value(Value::default())
    }
}

// === Conversions ===

impl From<bool> for Expr {
    fn from(value: bool) -> Self {
        Self::Value(Value::from(value))
    }
}

impl From<i64> for Expr {
    fn from(value: i64) -> Self {
        Self::Value(value.into())
    }
}

impl From<String> for Expr {
    fn from(value: String) -> Self {
        Self::Value(value.into())
    }
}

impl From<&str> for Expr {
    fn from(value: &str) -> Self {
        Self::Value(value.into())
    }
}

impl From<Value> for Expr {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And(e) => e.fmt(f),
            Self::Array(e) => e.fmt(f),
            Self::BinaryOp(e) => e.fmt(f),
            Self::Coalesce(e) => e.fmt(f),
            Self::Column(e) => e.fmt(f),
            Self::Exists(e) => e.fmt(f),
            Self::Func(e) => e.fmt(f),
            Self::InList(e) => e.fmt(f),
            Self::IsNull(e) => e.fmt(f),
            Self::Like(e) => e.fmt(f),
            Self::Not(e) => e.fmt(f),
            Self::Or(e) => e.fmt(f),
            Self::Value(e) => e.fmt(f),
        }
    }
}
