use super::{Db, Shared};
use crate::{driver::Connection, Config, Result};

use quire_core::{driver::Driver, err, schema, Schema};
use quire_sql::Serializer;

use std::sync::Arc;

#[derive(Debug, Default)]
pub struct Builder {
    schema: Option<SchemaSource>,
    config: Config,
}

#[derive(Debug)]
enum SchemaSource {
    Built(Arc<Schema>),

    /// Built with the configured strictness when the `Db` is built
    Pending(schema::Builder),
}

impl Builder {
    /// Uses an already built schema.
    pub fn schema(&mut self, schema: impl Into<Arc<Schema>>) -> &mut Self {
        self.schema = Some(SchemaSource::Built(schema.into()));
        self
    }

    /// Builds the schema when the `Db` is built, applying
    /// [`Config::strict_relations`].
    pub fn schema_builder(&mut self, builder: schema::Builder) -> &mut Self {
        self.schema = Some(SchemaSource::Pending(builder));
        self
    }

    pub fn config(&mut self, config: Config) -> &mut Self {
        self.config = config;
        self
    }

    /// Connects with a built-in driver picked by the URL scheme, e.g.
    /// `sqlite::memory:`.
    pub async fn connect(&mut self, url: &str) -> Result<Db> {
        self.build(Connection::connect(url)?)
    }

    pub fn build(&mut self, driver: impl Driver) -> Result<Db> {
        let schema = match self.schema.take() {
            Some(SchemaSource::Built(schema)) => schema,
            Some(SchemaSource::Pending(mut builder)) => Arc::new(
                builder
                    .strict_relations(self.config.strict_relations)
                    .build()?,
            ),
            None => return Err(err!("no schema given to `Db::builder()`")),
        };

        let serializer = Serializer::for_capability(driver.capability());

        tracing::debug!(
            collections = schema.collections().count(),
            flavor = ?serializer.flavor(),
            "database ready"
        );

        Ok(Db {
            shared: Arc::new(Shared {
                schema,
                driver: Arc::new(driver),
                serializer,
                config: self.config.clone(),
            }),
        })
    }
}
