use super::{Expr, Filter, Limit, OrderByExpr, Returning, TableFactor, TableWithJoins};

#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    /// The projection part of a SQL query.
    pub returning: Returning,

    /// The `FROM` part of a SQL query: the main table with its joins.
    pub source: TableWithJoins,

    /// Query filter
    pub filter: Filter,

    /// Ordering terms, applied in order
    pub order_by: Vec<OrderByExpr>,

    /// `LIMIT` / `OFFSET`
    pub limit: Limit,
}

impl Select {
    pub fn new(source: impl Into<TableWithJoins>, filter: impl Into<Filter>) -> Self {
        Self {
            returning: Returning::One,
            source: source.into(),
            filter: filter.into(),
            order_by: vec![],
            limit: Limit::default(),
        }
    }

    pub fn add_filter(&mut self, filter: impl Into<Filter>) {
        self.filter.add_filter(filter);
    }

    /// Alias of the table in the `FROM` clause.
    pub fn alias(&self) -> &str {
        &self.source.table.alias
    }
}

impl From<TableFactor> for Select {
    fn from(value: TableFactor) -> Self {
        Self::new(value, None::<Expr>)
    }
}
