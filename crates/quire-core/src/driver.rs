mod capability;
pub use capability::{Capability, SqlFlavor};

use crate::{async_trait, stmt::Value, Result};

use indexmap::IndexMap;
use std::fmt::Debug;

/// A row returned by a driver, keyed by the select list aliases.
pub type Row = IndexMap<String, Value>;

#[async_trait]
pub trait Driver: Debug + Send + Sync + 'static {
    /// Describes the driver's capability, which picks the SQL dialect.
    fn capability(&self) -> &Capability;

    /// Runs a statement that returns rows.
    async fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>>;

    /// Runs a statement that does not return rows, returning the number of
    /// rows affected.
    async fn execute(&self, sql: &str, params: &[Value]) -> Result<u64>;
}
