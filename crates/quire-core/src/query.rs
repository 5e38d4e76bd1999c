//! Query request types.
//!
//! A request is usually deserialized from the caller's JSON:
//!
//! ```
//! use quire_core::query::FindOptions;
//! use serde_json::json;
//!
//! let options: FindOptions = serde_json::from_value(json!({
//!     "where": { "views": { "gt": 10 } },
//!     "orderBy": { "title": "asc" },
//!     "columns": { "title": true },
//!     "with": { "author": true },
//!     "locale": "de",
//!     "localeFallback": "en",
//!     "limit": 20,
//! }))
//! .unwrap();
//!
//! assert_eq!(options.locale.as_deref(), Some("de"));
//! ```

use crate::stmt::{Direction, Expr, OrderByExpr};

use indexmap::IndexMap;
use serde::{de, Deserialize, Deserializer};
use serde_json::Value as Json;
use std::{fmt, sync::Arc};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FindOptions {
    /// Filter tree
    #[serde(rename = "where")]
    pub filter: Option<Json>,

    pub order_by: Option<OrderBy>,

    /// Projection. See [`Columns`].
    pub columns: Option<Columns>,

    /// Relations to load alongside each record
    pub with: Option<With>,

    /// Locale to read localized fields in. Defaults to the configured
    /// default locale.
    pub locale: Option<String>,

    /// Locale consulted when `locale` has no value for a field
    pub locale_fallback: Option<String>,

    pub limit: Option<u64>,

    pub offset: Option<u64>,

    /// Access-control filter fragment, ANDed with `filter`. Set by the
    /// authorization layer, never read from the request body.
    #[serde(skip)]
    pub access: Option<Json>,
}

impl FindOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: Json) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn order_by(mut self, order_by: impl Into<OrderBy>) -> Self {
        self.order_by = Some(order_by.into());
        self
    }

    pub fn columns(mut self, columns: impl Into<Columns>) -> Self {
        self.columns = Some(columns.into());
        self
    }

    pub fn with(mut self, relation: impl Into<String>, options: FindOptions) -> Self {
        self.with
            .get_or_insert_with(With::default)
            .0
            .insert(relation.into(), options);
        self
    }

    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn locale_fallback(mut self, locale: impl Into<String>) -> Self {
        self.locale_fallback = Some(locale.into());
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn access(mut self, access: Json) -> Self {
        self.access = Some(access);
        self
    }

    /// The caller's filter ANDed with the access-control fragment.
    pub fn effective_filter(&self) -> Option<Json> {
        match (&self.filter, &self.access) {
            (Some(filter), Some(access)) => {
                Some(serde_json::json!({ "AND": [filter, access] }))
            }
            (Some(filter), None) => Some(filter.clone()),
            (None, Some(access)) => Some(access.clone()),
            (None, None) => None,
        }
    }
}

/// Ordering of the result set.
#[derive(Clone)]
pub enum OrderBy {
    /// Named fields, applied in order
    Fields(Vec<(String, Direction)>),

    /// Caller-built ordering terms. Bypasses field resolution.
    Raw(RawOrderBy),
}

pub type RawOrderBy = Arc<dyn Fn(&TableHandle) -> Vec<OrderByExpr> + Send + Sync>;

impl OrderBy {
    pub fn raw(f: impl Fn(&TableHandle) -> Vec<OrderByExpr> + Send + Sync + 'static) -> Self {
        Self::Raw(Arc::new(f))
    }
}

impl fmt::Debug for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fields(fields) => f.debug_tuple("Fields").field(fields).finish(),
            Self::Raw(_) => f.write_str("Raw(..)"),
        }
    }
}

impl<S: Into<String>> FromIterator<(S, Direction)> for OrderBy {
    fn from_iter<T: IntoIterator<Item = (S, Direction)>>(iter: T) -> Self {
        Self::Fields(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl<S: Into<String>, const N: usize> From<[(S, Direction); N]> for OrderBy {
    fn from(value: [(S, Direction); N]) -> Self {
        value.into_iter().collect()
    }
}

/// Accepts `{"views": "desc", "title": "asc"}` or the list form
/// `[{"views": "desc"}, {"title": "asc"}]`.
impl<'de> Deserialize<'de> for OrderBy {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Map(IndexMap<String, Direction>),
            List(Vec<IndexMap<String, Direction>>),
        }

        let fields = match Repr::deserialize(deserializer)? {
            Repr::Map(map) => map.into_iter().collect(),
            Repr::List(list) => list.into_iter().flatten().collect(),
        };

        Ok(Self::Fields(fields))
    }
}

/// Field selection.
///
/// Any `true` entry switches to inclusion mode: only the listed fields are
/// returned. Otherwise every field except the `false` entries is returned.
/// The primary key is always returned.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Columns(pub IndexMap<String, bool>);

impl Columns {
    pub fn is_inclusion(&self) -> bool {
        self.0.values().any(|include| *include)
    }

    /// Whether `field` is part of the selection.
    pub fn includes(&self, field: &str) -> bool {
        if self.is_inclusion() {
            self.0.get(field).copied().unwrap_or(false)
        } else {
            self.0.get(field).copied().unwrap_or(true)
        }
    }
}

impl<S: Into<String>, const N: usize> From<[(S, bool); N]> for Columns {
    fn from(value: [(S, bool); N]) -> Self {
        Self(value.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Relations to load, each with its own options. `locale` and
/// `localeFallback` are inherited from the parent request.
#[derive(Debug, Clone, Default)]
pub struct With(pub IndexMap<String, FindOptions>);

/// Accepts `{"author": true, "posts": {"where": ..., "limit": 5}}`. `false`
/// entries are dropped.
impl<'de> Deserialize<'de> for With {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Entry {
            Flag(bool),
            Options(Box<FindOptions>),
        }

        let entries = IndexMap::<String, Entry>::deserialize(deserializer)?;
        let mut with = IndexMap::new();

        for (relation, entry) in entries {
            match entry {
                Entry::Flag(true) => {
                    with.insert(relation, FindOptions::default());
                }
                Entry::Flag(false) => {}
                Entry::Options(options) => {
                    if options.locale.is_some() {
                        return Err(de::Error::custom(format!(
                            "`with.{relation}` cannot set its own locale"
                        )));
                    }
                    with.insert(relation, *options);
                }
            }
        }

        Ok(Self(with))
    }
}

/// Table aliases of the main query, handed to raw ordering callbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableHandle {
    /// Alias of the main table
    pub alias: String,

    /// Alias of the current-locale translation join, when joined
    pub translation: Option<String>,

    /// Alias of the fallback-locale translation join, when joined
    pub fallback: Option<String>,
}

impl TableHandle {
    /// A column of the main table.
    pub fn column(&self, column: impl Into<String>) -> Expr {
        Expr::column(&self.alias, column)
    }

    /// A column of the current-locale translation row.
    pub fn translation_column(&self, column: impl Into<String>) -> Option<Expr> {
        self.translation
            .as_ref()
            .map(|alias| Expr::column(alias, column))
    }

    /// A column of the fallback-locale translation row.
    pub fn fallback_column(&self, column: impl Into<String>) -> Option<Expr> {
        self.fallback
            .as_ref()
            .map(|alias| Expr::column(alias, column))
    }
}
