use super::{Field, FieldLocation, Relation};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Uniquely identifies a collection within the schema.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollectionId(pub usize);

#[derive(Debug, Clone)]
pub struct Collection {
    /// Uniquely identifies the collection within the schema
    pub id: CollectionId,

    /// Name used by callers, e.g. `posts`
    pub name: String,

    /// Main table holding non-localized columns
    pub table: String,

    /// Name of the primary key field
    pub primary_key: String,

    /// Fields in declaration order, including relation fields
    pub fields: IndexMap<String, Field>,

    /// Declared relations
    pub relations: IndexMap<String, Relation>,

    /// Per-locale table holding localized columns. Set when at least one
    /// field is localized.
    pub translations: Option<TranslationTable>,

    /// Field used as the record's display title
    pub title: Option<String>,

    pub options: CollectionOptions,
}

/// Auxiliary table holding one row per (record, locale).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationTable {
    pub table: String,

    /// Column referencing the main table's primary key
    pub parent_column: String,

    /// Column holding the locale code
    pub locale_column: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionOptions {
    /// Adds `createdAt` and `updatedAt` fields
    pub timestamps: bool,

    /// Adds a `deletedAt` field; rows with a value are excluded from
    /// relation filters
    pub soft_delete: bool,
}

impl CollectionOptions {
    pub const CREATED_AT: &'static str = "createdAt";
    pub const UPDATED_AT: &'static str = "updatedAt";
    pub const DELETED_AT: &'static str = "deletedAt";
}

impl TranslationTable {
    pub fn for_table(table: &str) -> Self {
        Self {
            table: format!("{table}_i18n"),
            parent_column: "parent_id".to_string(),
            locale_column: "locale".to_string(),
        }
    }
}

impl Collection {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    pub fn relation(&self, name: &str) -> Option<&Relation> {
        self.relations.get(name)
    }

    pub fn primary_key_field(&self) -> &Field {
        &self.fields[&self.primary_key]
    }

    /// Storage column of the primary key.
    pub fn primary_key_column(&self) -> &str {
        match &self.primary_key_field().location {
            FieldLocation::Main { column } => column,
            location => panic!(
                "primary key must be stored in the main table; collection={}; location={location:?}",
                self.name
            ),
        }
    }

    /// Fields whose values live in the translation table.
    pub fn localized_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.values().filter(|field| field.is_localized())
    }

    pub fn is_localized(&self, name: &str) -> bool {
        self.field(name).is_some_and(|field| field.is_localized())
    }

    /// Fields computed rather than stored.
    pub fn virtual_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.values().filter(|field| field.is_virtual())
    }

    /// Column marking soft-deleted rows, when soft delete is enabled.
    pub fn soft_delete_column(&self) -> Option<&str> {
        if !self.options.soft_delete {
            return None;
        }

        self.field(CollectionOptions::DELETED_AT)
            .and_then(|field| field.column())
    }
}
