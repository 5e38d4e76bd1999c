use crate::Config;

use quire_core::{
    schema::{Collection, Schema},
    stmt::{Expr, Join, TableFactor},
    Error, Result,
};

use std::cell::Cell;

/// Compilation context shared by every compiler for one request.
#[derive(Debug, Clone)]
pub struct Cx<'a> {
    schema: &'a Schema,
    config: &'a Config,

    /// Locale localized fields are read in
    locale: String,

    /// Second locale consulted when `locale` has no value
    fallback: Option<String>,

    /// When false, localized fields read the current-locale column only
    use_localization: bool,
}

impl<'a> Cx<'a> {
    /// A context reading the configured default and fallback locales.
    pub fn new(schema: &'a Schema, config: &'a Config) -> Self {
        Self {
            schema,
            config,
            locale: config.default_locale.clone(),
            fallback: config.fallback_locale.clone(),
            use_localization: true,
        }
    }

    /// Overrides the locales. `None` keeps the configured value.
    pub fn locales(mut self, locale: Option<&str>, fallback: Option<&str>) -> Self {
        if let Some(locale) = locale {
            self.locale = locale.to_string();
        }

        if let Some(fallback) = fallback {
            self.fallback = Some(fallback.to_string());
        }

        self
    }

    pub fn use_localization(mut self, enabled: bool) -> Self {
        self.use_localization = enabled;
        self
    }

    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    pub fn config(&self) -> &'a Config {
        self.config
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// The fallback locale, when it is in effect and differs from the
    /// current locale.
    pub fn fallback_locale(&self) -> Option<&str> {
        self.fallback
            .as_deref()
            .filter(|fallback| self.use_localization && *fallback != self.locale)
    }

    pub fn is_localized(&self) -> bool {
        self.use_localization
    }
}

/// One table of a statement: the collection it reads and its nesting depth.
///
/// Aliases derive from the depth so nested subqueries never collide: the main
/// table is `t{depth}` and its translation joins `t{depth}_i18n` and
/// `t{depth}_i18n_fb`.
#[derive(Debug)]
pub(crate) struct Scope<'a> {
    pub(crate) cx: &'a Cx<'a>,
    pub(crate) collection: &'a Collection,
    pub(crate) depth: usize,

    /// Set when an expression referenced the translation joins
    translations_used: Cell<bool>,
}

impl<'a> Scope<'a> {
    pub(crate) fn root(cx: &'a Cx<'a>, collection: &'a Collection) -> Self {
        Self {
            cx,
            collection,
            depth: 0,
            translations_used: Cell::new(false),
        }
    }

    /// Scope of a related collection one level down.
    pub(crate) fn child(&self, collection: &'a Collection, what: &str) -> Result<Self> {
        let depth = self.depth + 1;
        let limit = self.cx.config.max_relation_depth;

        if depth > limit {
            return Err(Error::recursion_limit(what, limit));
        }

        Ok(Self {
            cx: self.cx,
            collection,
            depth,
            translations_used: Cell::new(false),
        })
    }

    pub(crate) fn alias(&self) -> String {
        format!("t{}", self.depth)
    }

    /// Alias of the junction table for many-to-many subqueries at this depth.
    pub(crate) fn junction_alias(&self) -> String {
        format!("j{}", self.depth)
    }

    /// Alias of the current-locale translation join, if the collection is
    /// localized.
    pub(crate) fn translation_alias(&self) -> Option<String> {
        self.collection
            .translations
            .as_ref()
            .map(|_| format!("t{}_i18n", self.depth))
    }

    /// Alias of the fallback-locale translation join, if one is made.
    pub(crate) fn fallback_alias(&self) -> Option<String> {
        self.cx.fallback_locale()?;
        self.collection
            .translations
            .as_ref()
            .map(|_| format!("t{}_i18n_fb", self.depth))
    }

    pub(crate) fn table(&self) -> TableFactor {
        TableFactor::new(&self.collection.table, self.alias())
    }

    pub(crate) fn column(&self, column: &str) -> Expr {
        Expr::column(self.alias(), column)
    }

    pub(crate) fn mark_translations_used(&self) {
        self.translations_used.set(true);
    }

    pub(crate) fn translations_used(&self) -> bool {
        self.translations_used.get()
    }

    /// `LEFT JOIN`s of the translation table for the current and fallback
    /// locales.
    pub(crate) fn translation_joins(&self) -> Vec<Join> {
        let Some(translations) = &self.collection.translations else {
            return vec![];
        };

        let pk = self.column(self.collection.primary_key_column());

        let join = |alias: String, locale: &str| {
            let on = Expr::and(
                Expr::eq(
                    Expr::column(&alias, &translations.parent_column),
                    pk.clone(),
                ),
                Expr::eq(Expr::column(&alias, &translations.locale_column), locale),
            );
            Join::left(TableFactor::new(&translations.table, alias), on)
        };

        let mut joins = vec![];

        if let Some(alias) = self.translation_alias() {
            joins.push(join(alias, self.cx.locale()));
        }

        if let (Some(alias), Some(fallback)) = (self.fallback_alias(), self.cx.fallback_locale()) {
            joins.push(join(alias, fallback));
        }

        joins
    }
}
