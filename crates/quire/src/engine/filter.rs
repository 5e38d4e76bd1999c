use super::{locale, operator, relation, Scope};

use quire_core::{stmt::Expr, Error, Result};

use serde_json::{Map, Value as Json};

/// Relation quantifier keys.
pub(crate) const QUANTIFIERS: [&str; 5] = ["some", "none", "every", "is", "isNot"];

/// Compiles a filter tree into a condition. `None` matches every row.
pub(crate) fn compile(scope: &Scope<'_>, filter: &Json) -> Result<Option<Expr>> {
    match filter {
        Json::Null => Ok(None),
        Json::Object(map) => compile_object(scope, map),
        _ => Err(Error::invalid_filter(format!(
            "expected an object, found `{filter}`"
        ))),
    }
}

fn compile_object(scope: &Scope<'_>, map: &Map<String, Json>) -> Result<Option<Expr>> {
    let mut operands = vec![];

    for (key, value) in map {
        let expr = match key.as_str() {
            "AND" => compile_group(scope, key, value)?.and_then(Expr::and_all),
            "OR" => compile_group(scope, key, value)?.and_then(Expr::or_all),
            "NOT" => compile_not(scope, value)?,
            _ => compile_key(scope, key, value)?,
        };

        operands.extend(expr);
    }

    Ok(Expr::and_all(operands))
}

/// Compiles the children of an `AND`/`OR` group, dropping those without a
/// condition. `None` when no child has one.
fn compile_group(scope: &Scope<'_>, key: &str, value: &Json) -> Result<Option<Vec<Expr>>> {
    let Some(children) = value.as_array() else {
        return Err(Error::invalid_filter(format!(
            "`{key}` expects an array of filters"
        )));
    };

    let mut operands = vec![];
    for child in children {
        operands.extend(compile(scope, child)?);
    }

    Ok(if operands.is_empty() {
        None
    } else {
        Some(operands)
    })
}

fn compile_not(scope: &Scope<'_>, value: &Json) -> Result<Option<Expr>> {
    if !value.is_object() {
        return Err(Error::invalid_filter("`NOT` expects a filter object"));
    }

    Ok(compile(scope, value)?.map(Expr::not))
}

/// Declared fields win over declared relations. Undeclared keys are
/// diagnosed from the value's shape.
fn compile_key(scope: &Scope<'_>, key: &str, value: &Json) -> Result<Option<Expr>> {
    let collection = scope.collection;

    if let Some(field) = collection.field(key).filter(|field| !field.is_relation()) {
        let lhs = locale::resolve_field(scope, field)?;
        return Ok(compile_field(&lhs, value));
    }

    if let Some(relation) = collection.relation(key) {
        return relation::compile(scope, relation, value);
    }

    if is_quantifier_map(value) {
        Err(Error::unknown_relation(&collection.name, key))
    } else {
        Err(Error::field_not_found(&collection.name, key))
    }
}

fn compile_field(lhs: &Expr, value: &Json) -> Option<Expr> {
    match value {
        Json::Object(operators) => Expr::and_all(
            operators
                .iter()
                .filter_map(|(op, value)| operator::compile(lhs, op, value)),
        ),
        Json::Null => Some(Expr::is_null(lhs.clone())),
        value => Some(Expr::eq(lhs.clone(), operator::operand(value))),
    }
}

pub(crate) fn is_quantifier_map(value: &Json) -> bool {
    value.as_object().is_some_and(|map| {
        !map.is_empty() && map.keys().all(|key| QUANTIFIERS.contains(&key.as_str()))
    })
}
