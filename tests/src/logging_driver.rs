use quire_core::{
    async_trait,
    driver::{Capability, Driver, Row},
    stmt::Value,
    Result,
};
use std::sync::{Arc, Mutex};

/// A driver wrapper that records every statement it runs.
#[derive(Debug)]
pub struct LoggingDriver {
    inner: Box<dyn Driver>,

    /// Shared with the test so it can inspect statements after the fact
    ops_log: Arc<Mutex<Vec<DriverOp>>>,
}

/// One statement as rendered by the serializer.
#[derive(Debug, Clone)]
pub struct DriverOp {
    pub sql: String,
    pub params: Vec<Value>,
}

impl LoggingDriver {
    pub fn new(driver: Box<dyn Driver>) -> Self {
        Self {
            inner: driver,
            ops_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn ops_log_handle(&self) -> Arc<Mutex<Vec<DriverOp>>> {
        self.ops_log.clone()
    }

    fn log(&self, sql: &str, params: &[Value]) {
        self.ops_log.lock().unwrap().push(DriverOp {
            sql: sql.to_string(),
            params: params.to_vec(),
        });
    }
}

#[async_trait]
impl Driver for LoggingDriver {
    fn capability(&self) -> &Capability {
        self.inner.capability()
    }

    async fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>> {
        self.log(sql, params);
        self.inner.query(sql, params).await
    }

    async fn execute(&self, sql: &str, params: &[Value]) -> Result<u64> {
        self.log(sql, params);
        self.inner.execute(sql, params).await
    }
}
