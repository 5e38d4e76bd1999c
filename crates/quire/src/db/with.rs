use super::{
    read::{Loaded, KEY_PREFIX, LINK_PREFIX},
    Db,
};
use crate::{engine::Extend, FindOptions, OrderBy, Record};

use quire_core::{
    schema::{Collection, CollectionId, Relation, RelationKind},
    stmt::{Expr, Join, SelectItem, TableFactor, Value},
    Error, Result,
};

use indexmap::IndexMap;
use serde_json::Value as Json;
use tokio::task::JoinSet;

/// Alias of the main table in a read. Related reads are separate statements,
/// so their main table is always at depth zero.
const ROOT: &str = "t0";

/// Alias of the junction table joined into many-to-many reads.
const JUNCTION: &str = "j0";

/// How the records of one `with` entry hang off their parents.
#[derive(Debug)]
pub(super) struct Link<'a> {
    /// `with` key the records are attached under
    name: &'a str,

    relation: &'a Relation,

    /// Parent columns identifying the related records
    parent_columns: Vec<String>,

    /// Child expressions matched against `parent_columns`, in order
    child_keys: Vec<Expr>,

    /// Junction join for many-to-many relations
    join: Option<Join>,

    /// Junction and polymorphic constraints on the related rows
    filter: Option<Expr>,

    options: &'a FindOptions,
}

impl<'a> Link<'a> {
    /// `None` when the relation's join configuration is incomplete.
    pub(super) fn new(
        db: &'a Db,
        collection: &'a Collection,
        name: &'a str,
        options: &'a FindOptions,
    ) -> Result<Option<Self>> {
        let schema = db.schema();

        let Some(relation) = collection.relation(name) else {
            return Err(Error::unknown_relation(&collection.name, name));
        };

        if !relation.is_complete() {
            tracing::warn!(
                collection = %collection.name,
                relation = %relation.name,
                "not loading relation with incomplete join configuration"
            );
            return Ok(None);
        }

        let target = relation.target(schema);
        let mut filter = vec![];

        let (parent_columns, child_keys, join) = match &relation.kind {
            RelationKind::ToOne(to_one) => {
                let keys = &to_one.keys;
                (keys.source.clone(), child_columns(&keys.target), None)
            }
            RelationKind::ToMany(to_many) => {
                let keys = &to_many.keys;
                (keys.source.clone(), child_columns(&keys.target), None)
            }
            RelationKind::ManyToMany(m2m) => {
                let junction = schema.collection(m2m.through);

                let on = Expr::eq(
                    Expr::column(JUNCTION, &m2m.target_key),
                    Expr::column(ROOT, target.primary_key_column()),
                );

                if let Some(deleted_at) = junction.soft_delete_column() {
                    filter.push(Expr::is_null(Expr::column(JUNCTION, deleted_at)));
                }

                (
                    vec![collection.primary_key_column().to_string()],
                    vec![Expr::column(JUNCTION, &m2m.source_key)],
                    Some(Join::inner(TableFactor::new(&junction.table, JUNCTION), on)),
                )
            }
        };

        if let Some(discriminator) = relation.discriminator() {
            filter.push(Expr::eq(
                Expr::column(ROOT, &discriminator.column),
                discriminator.value.clone(),
            ));
        }

        if let Some(deleted_at) = target.soft_delete_column() {
            filter.push(Expr::is_null(Expr::column(ROOT, deleted_at)));
        }

        Ok(Some(Self {
            name,
            relation,
            parent_columns,
            child_keys,
            join,
            filter: Expr::and_all(filter),
            options,
        }))
    }

    /// Parent selections needed to attach the related records.
    pub(super) fn parent_items(&self) -> impl Iterator<Item = SelectItem> + '_ {
        self.parent_columns
            .iter()
            .map(|column| SelectItem::new(Expr::column(ROOT, column), key_alias(column)))
    }

    /// Key of the related records belonging to `parent`. `None` when a key
    /// column is null.
    fn parent_key(&self, parent: &Loaded) -> Option<String> {
        let values = self
            .parent_columns
            .iter()
            .map(|column| match parent.keys.get(&key_alias(column)) {
                Some(Value::Null) | None => None,
                Some(value) => Some(value.clone()),
            })
            .collect::<Option<Vec<_>>>()?;

        Some(tuple_key(&values))
    }

    /// Links whose related records can be fetched by the same statement.
    fn group_key(&self) -> String {
        let order = match &self.options.order_by {
            // Raw orderings cannot be compared
            Some(OrderBy::Raw(_)) => format!("raw:{}", self.name),
            order_by => format!("{order_by:?}"),
        };

        // The statement is built from the first link's options, so every
        // option it reads must be part of the key.
        format!(
            "{}|{:?}|{:?}|{:?}|{:?}|{:?}|{:?}|{:?}|{order}",
            self.relation.target.0,
            self.child_keys,
            self.join,
            self.filter,
            self.options.effective_filter(),
            self.options.locale_fallback,
            self.options.columns,
            self.options.with,
        )
    }
}

/// A statement fetching the related records of one or more links.
struct Group<'a> {
    target: CollectionId,
    links: Vec<&'a Link<'a>>,
}

/// Loads every `with` entry of `options` and attaches the related records to
/// `parents`.
pub(super) async fn load(
    db: &Db,
    links: &[Link<'_>],
    options: &FindOptions,
    parents: &mut [Loaded],
    depth: usize,
) -> Result<()> {
    let mut groups: IndexMap<String, Group<'_>> = IndexMap::new();

    for link in links {
        groups
            .entry(link.group_key())
            .or_insert_with(|| Group {
                target: link.relation.target,
                links: vec![],
            })
            .links
            .push(link);
    }

    let mut tasks = JoinSet::new();

    for (index, group) in groups.values().enumerate() {
        let Some((child_options, extend)) = group.statement(options, parents) else {
            continue;
        };

        let db = db.clone();
        let target = group.target;

        tasks.spawn(async move { (index, db.load(target, child_options, extend, depth + 1).await) });
    }

    let mut results = IndexMap::new();

    while let Some(joined) = tasks.join_next().await {
        let (index, children) = joined.map_err(anyhow::Error::from)?;
        results.insert(index, children?);
    }

    for (index, group) in groups.values().enumerate() {
        let children = results.swap_remove(&index).unwrap_or_default();
        let by_key = index_children(children);

        for link in &group.links {
            attach(link, parents, &by_key);
        }
    }

    Ok(())
}

impl Group<'_> {
    /// The related read for every parent key of every link in the group.
    /// `None` when no parent has a key.
    fn statement(&self, parent: &FindOptions, parents: &[Loaded]) -> Option<(FindOptions, Extend)> {
        let first = self.links.first()?;

        let mut keys = IndexMap::new();
        for link in &self.links {
            for loaded in parents {
                let values = link
                    .parent_columns
                    .iter()
                    .map(|column| loaded.keys.get(&key_alias(column)).cloned())
                    .collect::<Option<Vec<_>>>();

                if let Some(values) = values.filter(|values| !values.iter().any(Value::is_null)) {
                    keys.entry(tuple_key(&values)).or_insert(values);
                }
            }
        }

        if keys.is_empty() {
            return None;
        }

        let condition = match &first.child_keys[..] {
            [key] => Expr::in_list(key.clone(), keys.into_values().flatten()),
            child_keys => Expr::or_all(
                keys.into_values()
                    .map(|values| {
                        Expr::and_from_vec(
                            child_keys
                                .iter()
                                .zip(values)
                                .map(|(key, value)| Expr::eq(key.clone(), value))
                                .collect(),
                        )
                    })
                    .collect::<Vec<_>>(),
            )?,
        };

        let mut options = first.options.clone();

        // Paging applies per parent once the rows are grouped
        options.limit = None;
        options.offset = None;

        options.locale = parent.locale.clone();
        if options.locale_fallback.is_none() {
            options.locale_fallback = parent.locale_fallback.clone();
        }

        let extend = Extend {
            filter: Expr::and_all([condition].into_iter().chain(first.filter.clone())),
            joins: first.join.clone().into_iter().collect(),
            items: first
                .child_keys
                .iter()
                .enumerate()
                .map(|(i, key)| SelectItem::new(key.clone(), format!("{LINK_PREFIX}{i}")))
                .collect(),
        };

        Some((options, extend))
    }
}

fn index_children(children: Vec<Loaded>) -> IndexMap<String, Vec<Record>> {
    let mut by_key: IndexMap<String, Vec<Record>> = IndexMap::new();

    for child in children {
        let values = (0..)
            .map_while(|i| child.keys.get(&format!("{LINK_PREFIX}{i}")).cloned())
            .collect::<Vec<_>>();

        by_key
            .entry(tuple_key(&values))
            .or_default()
            .push(child.record);
    }

    by_key
}

fn attach(link: &Link<'_>, parents: &mut [Loaded], by_key: &IndexMap<String, Vec<Record>>) {
    let offset = link.options.offset.unwrap_or(0) as usize;
    let limit = link.options.limit.map_or(usize::MAX, |limit| limit as usize);

    for parent in parents {
        let related = link
            .parent_key(parent)
            .and_then(|key| by_key.get(&key))
            .map(|records| {
                records
                    .iter()
                    .skip(offset)
                    .take(limit)
                    .cloned()
                    .map(Json::Object)
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        let value = if link.relation.is_to_one() {
            related.into_iter().next().unwrap_or(Json::Null)
        } else {
            Json::Array(related)
        };

        parent.record.insert(link.name.to_string(), value);
    }
}

fn child_columns(columns: &[String]) -> Vec<Expr> {
    columns
        .iter()
        .map(|column| Expr::column(ROOT, column))
        .collect()
}

fn key_alias(column: &str) -> String {
    format!("{KEY_PREFIX}{column}")
}

/// Keys compare by their JSON rendering.
fn tuple_key(values: &[Value]) -> String {
    Json::Array(values.iter().map(Value::to_json).collect()).to_string()
}
