use super::{Comma, Formatter, Params, ToSql};

use quire_core::stmt;

impl ToSql for &stmt::Value {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        use stmt::Value::*;

        match self {
            Null => fmt!(f, "NULL"),
            Bool(true) => fmt!(f, "TRUE"),
            Bool(false) => fmt!(f, "FALSE"),
            List(values) => fmt!(f, "(" Comma(values) ")"),
            value => {
                let placeholder = f.params.push(value);
                fmt!(f, placeholder)
            }
        }
    }
}
