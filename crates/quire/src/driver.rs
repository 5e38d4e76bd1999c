use crate::Result;

pub use quire_core::driver::{Capability, Driver, Row, SqlFlavor};
use quire_core::{async_trait, stmt::Value};

use url::Url;

/// Built-in drivers, picked by connection URL scheme.
#[derive(Debug)]
pub(crate) enum Connection {
    #[cfg(feature = "sqlite")]
    Sqlite(quire_driver_sqlite::Sqlite),
}

impl Connection {
    pub(crate) fn connect(url: &str) -> Result<Self> {
        let url = Url::parse(url).map_err(anyhow::Error::from)?;

        match url.scheme() {
            "sqlite" => Self::connect_sqlite(&url),
            scheme => Err(anyhow::anyhow!("unsupported database; scheme={scheme}; url={url}").into()),
        }
    }

    #[cfg(feature = "sqlite")]
    fn connect_sqlite(url: &Url) -> Result<Self> {
        let driver = quire_driver_sqlite::Sqlite::new(url.as_str())?;
        Ok(Self::Sqlite(driver))
    }

    #[cfg(not(feature = "sqlite"))]
    fn connect_sqlite(_url: &Url) -> Result<Self> {
        Err(anyhow::anyhow!("`sqlite` feature not enabled").into())
    }
}

macro_rules! match_db {
    ($self:expr, $driver:pat => $e:expr) => {
        match *$self {
            #[cfg(feature = "sqlite")]
            Connection::Sqlite($driver) => $e,
        }
    };
}

#[async_trait]
impl Driver for Connection {
    fn capability(&self) -> &Capability {
        match_db!(self, ref driver => driver.capability())
    }

    async fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>> {
        match_db!(self, ref driver => driver.query(sql, params).await)
    }

    async fn execute(&self, sql: &str, params: &[Value]) -> Result<u64> {
        match_db!(self, ref driver => driver.execute(sql, params).await)
    }
}
