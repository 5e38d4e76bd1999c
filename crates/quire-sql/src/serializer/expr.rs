use super::{Comma, Delimited, Formatter, Ident, Params, ToSql};

use quire_core::stmt::{self, ArrayOp, TableRef};

impl ToSql for &stmt::Expr {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        use stmt::Expr::*;

        match self {
            And(expr) if expr.operands.is_empty() => fmt!(f, "TRUE"),
            And(expr) => {
                fmt!(f, Delimited(expr.operands.iter().map(Operand), " AND "));
            }
            Array(expr) => expr.to_sql(f),
            BinaryOp(expr) if expr.op.is_arithmetic() => {
                fmt!(f, "(" Operand(&expr.lhs) " " expr.op " " Operand(&expr.rhs) ")");
            }
            BinaryOp(expr) => {
                fmt!(f, Operand(&expr.lhs) " " expr.op " " Operand(&expr.rhs));
            }
            Coalesce(expr) => {
                fmt!(f, "COALESCE(" Comma(&expr.operands) ")");
            }
            Column(expr) => match &expr.table {
                TableRef::Alias(alias) => fmt!(f, Ident(alias) "." Ident(&expr.column)),
                TableRef::This => fmt!(f, Ident(&expr.column)),
            },
            Exists(expr) => {
                let not = if expr.negated { "NOT " } else { "" };

                f.depth += 1;
                fmt!(f, not "EXISTS (" expr.subquery ")");
                f.depth -= 1;
            }
            Func(expr) => {
                fmt!(f, expr.name "(" Comma(&expr.args) ")");
            }
            InList(expr) if expr.list.is_empty() => {
                // Nothing is in an empty list
                fmt!(f, if expr.negate { "TRUE" } else { "FALSE" });
            }
            InList(expr) => {
                let not = if expr.negate { " NOT" } else { "" };
                fmt!(f, Operand(&expr.expr) not " IN (" Comma(&expr.list) ")");
            }
            IsNull(expr) => {
                if expr.negate {
                    fmt!(f, Operand(&expr.expr) " IS NOT NULL");
                } else {
                    fmt!(f, Operand(&expr.expr) " IS NULL");
                }
            }
            Like(expr) => expr.to_sql(f),
            Not(expr) => {
                fmt!(f, "NOT (" expr.expr ")");
            }
            Or(expr) if expr.operands.is_empty() => fmt!(f, "FALSE"),
            Or(expr) => {
                fmt!(f, Delimited(expr.operands.iter().map(Operand), " OR "));
            }
            Value(expr) => expr.to_sql(f),
        }
    }
}

/// Parenthesizes boolean groups used as an operand.
struct Operand<'a>(&'a stmt::Expr);

impl ToSql for Operand<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        match self.0 {
            stmt::Expr::And(e) if e.operands.len() > 1 => fmt!(f, "(" self.0 ")"),
            stmt::Expr::Or(e) if e.operands.len() > 1 => fmt!(f, "(" self.0 ")"),
            expr => expr.to_sql(f),
        }
    }
}

impl ToSql for stmt::BinaryOp {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        use stmt::BinaryOp::*;

        f.dst.push_str(match self {
            Eq => "=",
            Ne => "<>",
            Gt => ">",
            Ge => ">=",
            Lt => "<",
            Le => "<=",
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
        })
    }
}

impl ToSql for &stmt::ExprLike {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let not = if self.negate { "NOT " } else { "" };

        if !self.case_insensitive {
            fmt!(f, Operand(&self.expr) " " not "LIKE " Operand(&self.pattern));
        } else if f.serializer.is_postgresql() {
            fmt!(f, Operand(&self.expr) " " not "ILIKE " Operand(&self.pattern));
        } else {
            fmt!(f, "LOWER(" self.expr ") " not "LIKE LOWER(" self.pattern ")");
        }

        match self.escape {
            // MySQL treats the backslash as an escape inside string literals
            Some('\\') if f.serializer.is_mysql() => fmt!(f, " ESCAPE '\\\\'"),
            Some('\'') => fmt!(f, " ESCAPE ''''"),
            Some(ch) => {
                let escape = format!(" ESCAPE '{ch}'");
                fmt!(f, escape.as_str());
            }
            None => {}
        }
    }
}

impl ToSql for &stmt::ExprArray {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let lhs = Operand(&self.lhs);
        let rhs = Comma(&self.rhs);

        if f.serializer.is_postgresql() {
            let op = match self.op {
                ArrayOp::Overlaps => " && ",
                ArrayOp::Contains => " @> ",
                ArrayOp::ContainedBy => " <@ ",
            };
            fmt!(f, lhs op "ARRAY[" rhs "]");
        } else if f.serializer.is_mysql() {
            match self.op {
                ArrayOp::Overlaps => fmt!(f, "JSON_OVERLAPS(" lhs ", JSON_ARRAY(" rhs "))"),
                ArrayOp::Contains => fmt!(f, "JSON_CONTAINS(" lhs ", JSON_ARRAY(" rhs "))"),
                ArrayOp::ContainedBy => fmt!(f, "JSON_CONTAINS(JSON_ARRAY(" rhs "), " lhs ")"),
            }
        } else {
            // SQLite stores arrays as JSON text
            match self.op {
                ArrayOp::Overlaps if self.rhs.is_empty() => fmt!(f, "FALSE"),
                ArrayOp::Overlaps => fmt!(
                    f,
                    "EXISTS (SELECT 1 FROM json_each(" lhs ") AS je WHERE je.value IN (" rhs "))"
                ),
                ArrayOp::Contains if self.rhs.is_empty() => fmt!(f, "TRUE"),
                ArrayOp::Contains => fmt!(
                    f,
                    "NOT EXISTS (SELECT 1 FROM json_each(json_array(" rhs ")) AS je \
                     WHERE je.value NOT IN (SELECT value FROM json_each(" lhs ")))"
                ),
                ArrayOp::ContainedBy if self.rhs.is_empty() => {
                    fmt!(f, "NOT EXISTS (SELECT 1 FROM json_each(" lhs "))")
                }
                ArrayOp::ContainedBy => fmt!(
                    f,
                    "NOT EXISTS (SELECT 1 FROM json_each(" lhs ") AS je WHERE je.value NOT IN (" rhs "))"
                ),
            }
        }
    }
}
