use super::{locale, Scope};

use quire_core::{
    query::{OrderBy, TableHandle},
    stmt::OrderByExpr,
};

pub(crate) fn compile(scope: &Scope<'_>, order_by: &OrderBy) -> Vec<OrderByExpr> {
    match order_by {
        OrderBy::Fields(fields) => fields
            .iter()
            .filter_map(|(name, direction)| {
                let expr = match locale::resolve(scope, name) {
                    Ok(expr) => expr,
                    Err(err) => {
                        tracing::debug!(field = %name, %err, "skipping unresolved order field");
                        return None;
                    }
                };

                Some(OrderByExpr {
                    expr,
                    order: Some(*direction),
                })
            })
            .collect(),
        OrderBy::Raw(f) => f(&table_handle(scope)),
    }
}

pub(crate) fn table_handle(scope: &Scope<'_>) -> TableHandle {
    TableHandle {
        alias: scope.alias(),
        translation: scope.translation_alias(),
        fallback: scope.fallback_alias(),
    }
}
