use super::Scope;

use quire_core::{
    schema::{Field, FieldLocation},
    stmt::Expr,
    Error, Result,
};

/// Resolves a field name to an expression usable in conditions and ordering.
pub(crate) fn resolve(scope: &Scope<'_>, name: &str) -> Result<Expr> {
    let collection = scope.collection;

    let Some(field) = collection.field(name) else {
        return Err(Error::field_not_found(&collection.name, name));
    };

    resolve_field(scope, field)
}

pub(crate) fn resolve_field(scope: &Scope<'_>, field: &Field) -> Result<Expr> {
    let collection = scope.collection;

    match &field.location {
        FieldLocation::Main { column } => Ok(scope.column(column)),
        FieldLocation::Translation { column } => localized(scope, column).ok_or_else(|| {
            Error::invalid_schema(format!(
                "localized field `{}.{}` has no translation table",
                collection.name, field.name
            ))
        }),
        FieldLocation::Virtual { expr: Some(expr) } => Ok(expr.bound_to(&scope.alias())),
        FieldLocation::Virtual { expr: None } => {
            Err(Error::non_queryable_field(&collection.name, &field.name))
        }
        FieldLocation::Relation => Err(Error::invalid_filter(format!(
            "relation `{}.{}` cannot be used as a value; filter it with a quantifier",
            collection.name, field.name
        ))),
    }
}

/// `COALESCE(current, fallback)` when a fallback join exists, otherwise the
/// current-locale column.
pub(crate) fn localized(scope: &Scope<'_>, column: &str) -> Option<Expr> {
    let current = Expr::column(scope.translation_alias()?, column);
    scope.mark_translations_used();

    if !scope.cx.is_localized() {
        return Some(current);
    }

    Some(match scope.fallback_alias() {
        Some(fallback) => Expr::coalesce([current, Expr::column(fallback, column)]),
        None => current,
    })
}
