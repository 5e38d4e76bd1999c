mod value;
pub(crate) use value::Value;

use quire_core::{
    async_trait,
    driver::{Capability, Driver, Row},
    err, stmt, Error, Result,
};
use rusqlite::{types::Value as SqlValue, Connection};
use std::{
    path::Path,
    sync::{Mutex, MutexGuard},
};
use url::Url;

/// SQLite driver. Statements run on a single connection, one at a time.
#[derive(Debug)]
pub struct Sqlite {
    connection: Mutex<Connection>,
}

impl Sqlite {
    /// Opens a database from a connection URL: `sqlite::memory:` or
    /// `sqlite:<path>`.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url_str = url.into();
        let url = Url::parse(&url_str).map_err(Error::driver)?;

        if url.scheme() != "sqlite" {
            return Err(err!(
                "connection URL does not have a `sqlite` scheme; url={url_str}"
            ));
        }

        if url.path() == ":memory:" {
            Self::in_memory()
        } else {
            Self::open(url.path())
        }
    }

    /// Create an in-memory SQLite database
    pub fn in_memory() -> Result<Self> {
        let connection = Connection::open_in_memory().map_err(Error::driver)?;
        Self::from_connection(connection)
    }

    /// Open a SQLite database at the specified file path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(path).map_err(Error::driver)?;
        Self::from_connection(connection)
    }

    fn from_connection(connection: Connection) -> Result<Self> {
        // `LIKE` ignores ASCII case unless told otherwise; case-insensitive
        // patterns are rendered with `LOWER` on both sides.
        connection
            .pragma_update(None, "case_sensitive_like", true)
            .map_err(Error::driver)?;

        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    /// Runs one or more `;`-separated statements without parameters. Used to
    /// create tables and load fixtures.
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        self.lock()?.execute_batch(sql).map_err(Error::driver)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.connection
            .lock()
            .map_err(|_| err!("sqlite connection lock poisoned"))
    }
}

#[async_trait]
impl Driver for Sqlite {
    fn capability(&self) -> &Capability {
        &Capability::SQLITE
    }

    async fn query(&self, sql: &str, params: &[stmt::Value]) -> Result<Vec<Row>> {
        tracing::trace!(sql, params = params.len(), "sqlite query");

        let connection = self.lock()?;
        let mut stmt = connection.prepare_cached(sql).map_err(Error::driver)?;

        let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let params = params.iter().cloned().map(Value::from).collect::<Vec<_>>();

        let mut rows = stmt
            .query(rusqlite::params_from_iter(params.iter()))
            .map_err(Error::driver)?;

        let mut ret = vec![];

        loop {
            match rows.next() {
                Ok(Some(row)) => {
                    let mut record = Row::with_capacity(names.len());

                    for (index, name) in names.iter().enumerate() {
                        let value: SqlValue = row.get(index).map_err(Error::driver)?;
                        record.insert(name.clone(), Value::from_sql(value).into_inner());
                    }

                    ret.push(record);
                }
                Ok(None) => break,
                Err(err) => return Err(Error::driver(err)),
            }
        }

        Ok(ret)
    }

    async fn execute(&self, sql: &str, params: &[stmt::Value]) -> Result<u64> {
        tracing::trace!(sql, params = params.len(), "sqlite execute");

        let connection = self.lock()?;
        let mut stmt = connection.prepare_cached(sql).map_err(Error::driver)?;
        let params = params.iter().cloned().map(Value::from).collect::<Vec<_>>();

        let count = stmt
            .execute(rusqlite::params_from_iter(params.iter()))
            .map_err(Error::driver)?;

        Ok(count as u64)
    }
}
