use quire_core::stmt::{ArrayOp, Expr, ExprLike, Value};

use serde_json::Value as Json;

/// Compiles one field operator against a resolved reference.
///
/// Returns `None` for unknown operators and for payloads an operator does not
/// accept, e.g. `in` with a non-array value.
pub(crate) fn compile(lhs: &Expr, op: &str, value: &Json) -> Option<Expr> {
    let lhs = lhs.clone();

    Some(match op {
        "eq" if value.is_null() => Expr::is_null(lhs),
        "ne" if value.is_null() => Expr::is_not_null(lhs),
        "eq" => Expr::eq(lhs, operand(value)),
        "ne" => Expr::ne(lhs, operand(value)),
        "gt" => Expr::gt(lhs, comparable(value)?),
        "gte" => Expr::ge(lhs, comparable(value)?),
        "lt" => Expr::lt(lhs, comparable(value)?),
        "lte" => Expr::le(lhs, comparable(value)?),
        "in" => Expr::in_list(lhs, value.as_array()?.iter().map(operand)),
        "notIn" => Expr::not_in_list(lhs, value.as_array()?.iter().map(operand)),
        "like" => pattern(lhs, value.as_str()?.to_string(), false, false, None),
        "ilike" => pattern(lhs, value.as_str()?.to_string(), true, false, None),
        "notLike" => pattern(lhs, value.as_str()?.to_string(), false, true, None),
        "notIlike" => pattern(lhs, value.as_str()?.to_string(), true, true, None),
        "contains" => {
            let escaped = ExprLike::escape_literal(value.as_str()?);
            pattern(lhs, format!("%{escaped}%"), true, false, Some('\\'))
        }
        "startsWith" => {
            let escaped = ExprLike::escape_literal(value.as_str()?);
            pattern(lhs, format!("{escaped}%"), true, false, Some('\\'))
        }
        "endsWith" => {
            let escaped = ExprLike::escape_literal(value.as_str()?);
            pattern(lhs, format!("%{escaped}"), true, false, Some('\\'))
        }
        "isNull" => match value.as_bool()? {
            true => Expr::is_null(lhs),
            false => Expr::is_not_null(lhs),
        },
        "isNotNull" => match value.as_bool()? {
            true => Expr::is_not_null(lhs),
            false => Expr::is_null(lhs),
        },
        "arrayOverlaps" => Expr::array(lhs, ArrayOp::Overlaps, elements(value)?),
        "arrayContains" => Expr::array(lhs, ArrayOp::Contains, elements(value)?),
        "arrayContained" => Expr::array(lhs, ArrayOp::ContainedBy, elements(value)?),
        _ => return None,
    })
}

/// A filter value as a bound operand. Structured values are bound as JSON.
pub(crate) fn operand(value: &Json) -> Expr {
    match value {
        Json::Array(_) | Json::Object(_) => Expr::Value(Value::Json(value.clone())),
        value => Expr::Value(Value::from_json(value)),
    }
}

/// Ordering comparisons against null never match; they are ignored.
fn comparable(value: &Json) -> Option<Expr> {
    match value {
        Json::Null | Json::Array(_) | Json::Object(_) => None,
        value => Some(operand(value)),
    }
}

fn elements(value: &Json) -> Option<Vec<Value>> {
    Some(value.as_array()?.iter().map(Value::from_json).collect())
}

fn pattern(
    lhs: Expr,
    pattern: String,
    case_insensitive: bool,
    negate: bool,
    escape: Option<char>,
) -> Expr {
    ExprLike {
        expr: Box::new(lhs),
        pattern: Box::new(pattern.into()),
        case_insensitive,
        negate,
        escape,
    }
    .into()
}
