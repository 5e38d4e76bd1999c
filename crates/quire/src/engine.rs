mod cx;
pub use cx::Cx;
pub(crate) use cx::Scope;

mod filter;
mod locale;

mod merge;
pub use merge::{merge_locales, LocaleMerge};

mod operator;
mod order_by;

mod projection;
pub use projection::{Projection, ReadField};
pub(crate) use projection::{CURRENT_PREFIX, FALLBACK_PREFIX};

mod relation;

use quire_core::{
    query::{Columns, FindOptions, OrderBy},
    schema::Collection,
    stmt::{Expr, Join, OrderByExpr, Returning, Select, SelectItem, TableWithJoins},
    Result,
};

use serde_json::Value as Json;

/// Compiles a filter tree against `collection`. `None` matches every row.
pub fn compile_where(filter: &Json, collection: &Collection, cx: &Cx<'_>) -> Result<Option<Expr>> {
    let scope = Scope::root(cx, collection);
    filter::compile(&scope, filter)
}

/// Compiles ordering terms. Fields that cannot be resolved are skipped.
pub fn compile_order_by(order_by: &OrderBy, collection: &Collection, cx: &Cx<'_>) -> Vec<OrderByExpr> {
    let scope = Scope::root(cx, collection);
    order_by::compile(&scope, order_by)
}

/// Compiles the select list and the read plan used to rebuild records.
pub fn compile_projection(
    columns: Option<&Columns>,
    collection: &Collection,
    cx: &Cx<'_>,
) -> Projection {
    let scope = Scope::root(cx, collection);
    projection::compile(&scope, columns)
}

/// A compiled read.
#[derive(Debug, Clone, PartialEq)]
pub struct Compiled {
    /// The `WHERE` condition; `None` matches every row
    pub filter: Option<Expr>,

    pub order_by: Vec<OrderByExpr>,

    pub projection: Projection,

    /// The statement, ready for serialization
    pub select: Select,
}

/// Additions made to a read when it loads related records for a batch of
/// parents.
#[derive(Debug, Default)]
pub(crate) struct Extend {
    /// ANDed with the request's filter
    pub(crate) filter: Option<Expr>,

    /// Joined after the main table
    pub(crate) joins: Vec<Join>,

    /// Selected in addition to the projection
    pub(crate) items: Vec<SelectItem>,
}

/// Compiles a full read of `collection`.
pub fn compile(cx: &Cx<'_>, collection: &Collection, options: &FindOptions) -> Result<Compiled> {
    compile_extended(cx, collection, options, Extend::default())
}

pub(crate) fn compile_extended(
    cx: &Cx<'_>,
    collection: &Collection,
    options: &FindOptions,
    extend: Extend,
) -> Result<Compiled> {
    let scope = Scope::root(cx, collection);

    let filter = match options.effective_filter() {
        Some(filter) => filter::compile(&scope, &filter)?,
        None => None,
    };

    tracing::trace!(collection = %collection.name, condition = ?filter, "compiled where");

    let order_by = options
        .order_by
        .as_ref()
        .map(|order_by| order_by::compile(&scope, order_by))
        .unwrap_or_default();

    let projection = projection::compile(&scope, options.columns.as_ref());

    let mut select = Select::new(source(&scope, extend.joins), filter.clone());
    select.add_filter(extend.filter);

    let mut items = projection.items.clone();
    items.extend(extend.items);

    select.returning = Returning::Items(items);
    select.order_by = order_by.clone();
    select.limit.limit = options.limit;
    select.limit.offset = options.offset;

    Ok(Compiled {
        filter,
        order_by,
        projection,
        select,
    })
}

/// Compiles `SELECT COUNT(*)` over the rows matching the request's filter.
/// Ordering, projection and paging are ignored.
pub(crate) fn compile_count(
    cx: &Cx<'_>,
    collection: &Collection,
    options: &FindOptions,
) -> Result<Select> {
    let scope = Scope::root(cx, collection);

    let filter = match options.effective_filter() {
        Some(filter) => filter::compile(&scope, &filter)?,
        None => None,
    };

    let joins = if scope.translations_used() {
        scope.translation_joins()
    } else {
        vec![]
    };

    let mut select = Select::new(
        TableWithJoins {
            table: scope.table(),
            joins,
        },
        filter,
    );
    select.returning = Returning::Count;

    Ok(select)
}

/// The main table with its translation joins. Joined whenever the collection
/// is localized so raw ordering can reference them.
fn source(scope: &Scope<'_>, extra: Vec<Join>) -> TableWithJoins {
    let mut joins = scope.translation_joins();
    joins.extend(extra);

    TableWithJoins {
        table: scope.table(),
        joins,
    }
}
