use super::{Comma, Formatter, Ident, Params, ToSql};

use quire_core::stmt;

impl ToSql for &stmt::Select {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, "SELECT " self.returning " FROM " self.source);

        if let Some(expr) = &self.filter.expr {
            fmt!(f, " WHERE " expr);
        }

        if !self.order_by.is_empty() {
            fmt!(f, " ORDER BY " Comma(&self.order_by));
        }

        fmt!(f, self.limit);
    }
}

impl ToSql for &stmt::Returning {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        match self {
            stmt::Returning::One => fmt!(f, "1"),
            stmt::Returning::Count => fmt!(f, "COUNT(*)"),
            stmt::Returning::Items(items) => fmt!(f, Comma(items)),
        }
    }
}

impl ToSql for &stmt::SelectItem {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, self.expr " AS " Ident(&self.alias));
    }
}

impl ToSql for &stmt::TableWithJoins {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, self.table);

        for join in &self.joins {
            match &join.constraint {
                stmt::JoinOp::Left(on) => fmt!(f, " LEFT JOIN " join.table " ON " on),
                stmt::JoinOp::Inner(on) => fmt!(f, " INNER JOIN " join.table " ON " on),
            }
        }
    }
}

impl ToSql for &stmt::TableFactor {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, Ident(&self.name) " AS " Ident(&self.alias));
    }
}

impl ToSql for &stmt::OrderByExpr {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, self.expr);

        match self.order {
            Some(stmt::Direction::Asc) => fmt!(f, " ASC"),
            Some(stmt::Direction::Desc) => fmt!(f, " DESC"),
            None => {}
        }
    }
}

impl ToSql for stmt::Limit {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        match (self.limit, self.offset) {
            (None, None) => {}
            (Some(limit), None) => fmt!(f, " LIMIT " limit),
            (Some(limit), Some(offset)) => fmt!(f, " LIMIT " limit " OFFSET " offset),
            (None, Some(offset)) => {
                // Only PostgreSQL accepts OFFSET on its own
                if f.serializer.is_sqlite() {
                    fmt!(f, " LIMIT -1");
                } else if f.serializer.is_mysql() {
                    fmt!(f, " LIMIT " u64::MAX);
                }
                fmt!(f, " OFFSET " offset);
            }
        }
    }
}
