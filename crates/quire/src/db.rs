mod builder;
pub use builder::Builder;

mod read;
use read::Loaded;

mod with;
use with::Link;

use crate::{
    engine::{self, Compiled, Cx, Extend, LocaleMerge},
    Config, FindOptions, Record,
};

use quire_core::{
    driver::Driver,
    schema::{Collection, CollectionId},
    stmt::{Select, SelectItem, Value},
    Error, Result, Schema,
};
use quire_sql::Serializer;

use std::{future::Future, pin::Pin, sync::Arc};

/// Handle to a database and the schema describing it.
///
/// Cloning is cheap; clones share the driver.
#[derive(Debug, Clone)]
pub struct Db {
    shared: Arc<Shared>,
}

#[derive(Debug)]
struct Shared {
    schema: Arc<Schema>,
    driver: Arc<dyn Driver>,
    serializer: Serializer,
    config: Config,
}

type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

impl Db {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.shared.schema
    }

    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    pub fn driver(&self) -> &dyn Driver {
        &*self.shared.driver
    }

    /// Compilation context for a request: its locales over the configured
    /// defaults.
    pub fn cx(&self, options: &FindOptions) -> Cx<'_> {
        Cx::new(&self.shared.schema, &self.shared.config).locales(
            options.locale.as_deref(),
            options.locale_fallback.as_deref(),
        )
    }

    /// Compiles a read without running it.
    pub fn compile(&self, collection: &str, options: &FindOptions) -> Result<Compiled> {
        let collection = self.collection(collection)?;
        engine::compile(&self.cx(options), collection, options)
    }

    /// Returns every record of `collection` matching the request, with its
    /// `with` relations attached.
    pub async fn find_many(&self, collection: &str, options: FindOptions) -> Result<Vec<Record>> {
        let id = self.collection(collection)?.id;
        let loaded = self.load(id, options, Extend::default(), 0).await?;
        Ok(loaded.into_iter().map(|loaded| loaded.record).collect())
    }

    /// Returns the first matching record.
    pub async fn find_first(
        &self,
        collection: &str,
        mut options: FindOptions,
    ) -> Result<Option<Record>> {
        options.limit = Some(1);
        Ok(self.find_many(collection, options).await?.into_iter().next())
    }

    /// Counts the records matching the request's filter.
    pub async fn count(&self, collection: &str, options: FindOptions) -> Result<u64> {
        let select = {
            let collection = self.collection(collection)?;
            engine::compile_count(&self.cx(&options), collection, &options)?
        };

        let rows = self.query(&select).await?;

        let count = rows
            .into_iter()
            .next()
            .and_then(|row| row.into_values().next())
            .unwrap_or_default();

        match count {
            Value::I64(count) => Ok(count.max(0) as u64),
            value => Err(Error::from_args(format_args!(
                "expected an integer count; value={value:?}"
            ))),
        }
    }

    fn collection(&self, name: &str) -> Result<&Collection> {
        self.shared
            .schema
            .collection_by_name(name)
            .ok_or_else(|| Error::invalid_filter(format!("unknown collection `{name}`")))
    }

    /// Reads records of `target` and, recursively, their `with` relations.
    fn load(
        &self,
        target: CollectionId,
        options: FindOptions,
        mut extend: Extend,
        depth: usize,
    ) -> BoxFuture<Result<Vec<Loaded>>> {
        let db = self.clone();

        Box::pin(async move {
            let max = db.shared.config.max_relation_depth;
            if depth > max {
                return Err(Error::recursion_limit("with", max));
            }

            let collection = db.shared.schema.collection(target);

            let links = match &options.with {
                Some(with) => with
                    .0
                    .iter()
                    .filter_map(|(name, sub)| Link::new(&db, collection, name, sub).transpose())
                    .collect::<Result<Vec<_>>>()?,
                None => vec![],
            };

            for item in links.iter().flat_map(Link::parent_items) {
                push_unique(&mut extend.items, item);
            }

            let (compiled, merge) = {
                let cx = db.cx(&options);
                let compiled = engine::compile_extended(&cx, collection, &options, extend)?;
                let merge = LocaleMerge::for_collection(collection, db.shared.config.max_merge_depth);
                (compiled, merge)
            };

            let rows = db.query(&compiled.select).await?;

            let mut loaded = rows
                .into_iter()
                .map(|row| read::record(row, &compiled.projection.plan, &merge))
                .collect::<Vec<_>>();

            if !links.is_empty() {
                with::load(&db, &links, &options, &mut loaded, depth).await?;
            }

            Ok(loaded)
        })
    }

    async fn query(&self, select: &Select) -> Result<Vec<quire_core::driver::Row>> {
        let mut params = Vec::<Value>::new();
        let sql = self.shared.serializer.serialize(select, &mut params);

        tracing::debug!(%sql, params = params.len(), "executing query");

        self.shared.driver.query(&sql, &params).await
    }
}

fn push_unique(items: &mut Vec<SelectItem>, item: SelectItem) {
    if !items.iter().any(|existing| existing.alias == item.alias) {
        items.push(item);
    }
}
