mod config;
pub use config::Config;

pub mod db;
pub use db::Db;

pub mod driver;

mod engine;
pub use engine::{
    compile, compile_order_by, compile_projection, compile_where, merge_locales, Compiled, Cx,
    LocaleMerge, Projection, ReadField,
};

pub use quire_core::{
    query::{self, Columns, FindOptions, OrderBy, TableHandle, With},
    schema::{self, Schema, Shape},
    stmt, Error, Result,
};

/// A record handed to callers.
pub type Record = serde_json::Map<String, serde_json::Value>;
