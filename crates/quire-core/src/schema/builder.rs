use super::{
    Collection, CollectionId, CollectionOptions, Discriminator, Field, FieldLocation, JoinKeys,
    ManyToMany, Relation, RelationKind, Schema, Shape, Structure, ToMany, ToOne,
    TranslationTable,
};
use crate::{stmt, Error, Result};

use heck::ToSnakeCase;
use indexmap::IndexMap;

/// Builds a [`Schema`] from collection definitions.
///
/// Relations name their targets; names are resolved to [`CollectionId`]s and
/// default join keys are derived when [`Builder::build`] runs.
///
/// ```
/// use quire_core::Schema;
///
/// let mut builder = Schema::builder();
/// builder
///     .collection("authors", |c| {
///         c.field("name");
///         c.has_many("posts", "posts");
///     })
///     .collection("posts", |c| {
///         c.localized("title");
///         c.field("views");
///         c.belongs_to("author", "authors");
///     });
///
/// let schema = builder.build().unwrap();
/// assert!(schema.collection_by_name("posts").unwrap().is_localized("title"));
/// ```
#[derive(Debug, Default, Clone)]
pub struct Builder {
    collections: Vec<CollectionBuilder>,

    /// Fail the build on incomplete relation join configurations instead of
    /// logging a warning
    strict_relations: bool,
}

#[derive(Debug, Clone)]
pub struct CollectionBuilder {
    name: String,
    table: Option<String>,
    primary_key: String,
    fields: IndexMap<String, FieldBuilder>,
    relations: IndexMap<String, RelationBuilder>,
    translations: Option<TranslationTable>,
    title: Option<String>,
    options: CollectionOptions,
}

#[derive(Debug, Clone)]
pub struct FieldBuilder {
    name: String,
    kind: FieldKind,
    column: Option<String>,
    overlay_column: Option<String>,
}

#[derive(Debug, Clone)]
enum FieldKind {
    Main,
    Localized,
    Virtual(Option<stmt::Expr>),
    Structured(Shape),
}

#[derive(Debug, Clone)]
pub struct RelationBuilder {
    name: String,
    target: String,
    kind: RelationBuilderKind,
    keys: Option<JoinKeys>,
    pair: Option<String>,
    discriminator: Option<Discriminator>,
    source_key: Option<String>,
    target_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
enum RelationBuilderKind {
    BelongsTo,
    HasOne,
    HasMany,
    ManyToMany { through: String },
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strict_relations(&mut self, strict: bool) -> &mut Self {
        self.strict_relations = strict;
        self
    }

    /// Declares a collection.
    pub fn collection(
        &mut self,
        name: impl Into<String>,
        f: impl FnOnce(&mut CollectionBuilder),
    ) -> &mut Self {
        let mut collection = CollectionBuilder::new(name.into());
        f(&mut collection);
        self.collections.push(collection);
        self
    }

    pub fn build(&self) -> Result<Schema> {
        let mut lookup = IndexMap::new();

        for (index, collection) in self.collections.iter().enumerate() {
            if lookup
                .insert(collection.name.clone(), CollectionId(index))
                .is_some()
            {
                return Err(Error::invalid_schema(format!(
                    "collection `{}` is declared more than once",
                    collection.name
                )));
            }
        }

        let mut collections = self
            .collections
            .iter()
            .enumerate()
            .map(|(index, collection)| collection.build_stub(CollectionId(index)))
            .collect::<Result<Vec<_>>>()?;

        // Relations are built in two passes: `ToOne` relations first, so
        // inverse relations can derive their keys from them.
        let mut resolve = ResolveRelations {
            builders: &self.collections,
            lookup: &lookup,
            collections: &mut collections,
        };
        resolve.resolve()?;

        let schema = Schema {
            collections,
            lookup,
        };

        schema.verify(self.strict_relations)?;

        Ok(schema)
    }
}

impl CollectionBuilder {
    fn new(name: String) -> Self {
        Self {
            name,
            table: None,
            primary_key: "id".to_string(),
            fields: IndexMap::new(),
            relations: IndexMap::new(),
            translations: None,
            title: None,
            options: CollectionOptions::default(),
        }
    }

    /// Main table name. Defaults to the snake-cased collection name.
    pub fn table(&mut self, name: impl Into<String>) -> &mut Self {
        self.table = Some(name.into());
        self
    }

    /// Primary key field. Defaults to `id`, created if not declared.
    pub fn primary_key(&mut self, field: impl Into<String>) -> &mut Self {
        self.primary_key = field.into();
        self
    }

    /// A field stored in the main table.
    pub fn field(&mut self, name: impl Into<String>) -> &mut FieldBuilder {
        self.push_field(name.into(), FieldKind::Main)
    }

    /// A field stored per locale in the translation table.
    pub fn localized(&mut self, name: impl Into<String>) -> &mut FieldBuilder {
        self.push_field(name.into(), FieldKind::Localized)
    }

    /// A computed field. Without an expression the field is opaque: it is
    /// returned as null by queries and cannot be filtered or sorted on.
    pub fn virtual_field(
        &mut self,
        name: impl Into<String>,
        expr: impl Into<Option<stmt::Expr>>,
    ) -> &mut FieldBuilder {
        self.push_field(name.into(), FieldKind::Virtual(expr.into()))
    }

    /// A structured main-table field with localized leaves described by
    /// `shape`.
    pub fn structured(&mut self, name: impl Into<String>, shape: Shape) -> &mut FieldBuilder {
        self.push_field(name.into(), FieldKind::Structured(shape))
    }

    /// Field used as the display title.
    pub fn title(&mut self, field: impl Into<String>) -> &mut Self {
        self.title = Some(field.into());
        self
    }

    pub fn timestamps(&mut self) -> &mut Self {
        self.options.timestamps = true;
        self
    }

    pub fn soft_delete(&mut self) -> &mut Self {
        self.options.soft_delete = true;
        self
    }

    /// Overrides the translation table layout.
    pub fn translations(
        &mut self,
        table: impl Into<String>,
        parent_column: impl Into<String>,
        locale_column: impl Into<String>,
    ) -> &mut Self {
        self.translations = Some(TranslationTable {
            table: table.into(),
            parent_column: parent_column.into(),
            locale_column: locale_column.into(),
        });
        self
    }

    /// A to-one relation whose foreign key lives on this collection.
    ///
    /// Keys default to `<name>_id` referencing the target's primary key.
    pub fn belongs_to(
        &mut self,
        name: impl Into<String>,
        target: impl Into<String>,
    ) -> &mut RelationBuilder {
        self.push_relation(name.into(), target.into(), RelationBuilderKind::BelongsTo)
    }

    /// A to-one relation whose foreign key lives on the target.
    ///
    /// Keys default to the reverse of the target's `belongs_to` pointing back
    /// at this collection.
    pub fn has_one(
        &mut self,
        name: impl Into<String>,
        target: impl Into<String>,
    ) -> &mut RelationBuilder {
        self.push_relation(name.into(), target.into(), RelationBuilderKind::HasOne)
    }

    /// A to-many relation. Keys default like [`CollectionBuilder::has_one`].
    pub fn has_many(
        &mut self,
        name: impl Into<String>,
        target: impl Into<String>,
    ) -> &mut RelationBuilder {
        self.push_relation(name.into(), target.into(), RelationBuilderKind::HasMany)
    }

    /// A many-to-many relation through the junction collection `through`.
    ///
    /// The junction columns must be set with
    /// [`RelationBuilder::source_key`] and [`RelationBuilder::target_key`].
    pub fn many_to_many(
        &mut self,
        name: impl Into<String>,
        target: impl Into<String>,
        through: impl Into<String>,
    ) -> &mut RelationBuilder {
        self.push_relation(
            name.into(),
            target.into(),
            RelationBuilderKind::ManyToMany {
                through: through.into(),
            },
        )
    }

    fn push_field(&mut self, name: String, kind: FieldKind) -> &mut FieldBuilder {
        let field = FieldBuilder {
            name: name.clone(),
            kind,
            column: None,
            overlay_column: None,
        };
        self.fields.insert(name.clone(), field);
        &mut self.fields[&name]
    }

    fn push_relation(
        &mut self,
        name: String,
        target: String,
        kind: RelationBuilderKind,
    ) -> &mut RelationBuilder {
        let relation = RelationBuilder {
            name: name.clone(),
            target,
            kind,
            keys: None,
            pair: None,
            discriminator: None,
            source_key: None,
            target_key: None,
        };
        self.relations.insert(name.clone(), relation);
        &mut self.relations[&name]
    }

    fn table_name(&self) -> String {
        self.table
            .clone()
            .unwrap_or_else(|| self.name.to_snake_case())
    }

    fn primary_key_column(&self) -> String {
        self.fields
            .get(&self.primary_key)
            .map(FieldBuilder::storage_column)
            .unwrap_or_else(|| self.primary_key.to_snake_case())
    }

    /// Builds the collection without relations.
    fn build_stub(&self, id: CollectionId) -> Result<Collection> {
        let table = self.table_name();
        let mut fields = IndexMap::new();

        if !self.fields.contains_key(&self.primary_key) {
            fields.insert(
                self.primary_key.clone(),
                Field {
                    name: self.primary_key.clone(),
                    location: FieldLocation::Main {
                        column: self.primary_key.to_snake_case(),
                    },
                    structure: None,
                },
            );
        }

        for field in self.fields.values() {
            fields.insert(field.name.clone(), field.build());
        }

        let mut implicit = vec![];
        if self.options.timestamps {
            implicit.push(CollectionOptions::CREATED_AT);
            implicit.push(CollectionOptions::UPDATED_AT);
        }
        if self.options.soft_delete {
            implicit.push(CollectionOptions::DELETED_AT);
        }

        for name in implicit {
            fields.entry(name.to_string()).or_insert_with(|| Field {
                name: name.to_string(),
                location: FieldLocation::Main {
                    column: name.to_snake_case(),
                },
                structure: None,
            });
        }

        for relation in self.relations.keys() {
            if fields.contains_key(relation) {
                return Err(Error::invalid_schema(format!(
                    "relation `{}.{relation}` has the same name as a field",
                    self.name
                )));
            }

            fields.insert(
                relation.clone(),
                Field {
                    name: relation.clone(),
                    location: FieldLocation::Relation,
                    structure: None,
                },
            );
        }

        let needs_translations = fields
            .values()
            .any(|field| field.is_localized() || field.is_structured());

        let translations = match &self.translations {
            Some(translations) => Some(translations.clone()),
            None if needs_translations => Some(TranslationTable::for_table(&table)),
            None => None,
        };

        Ok(Collection {
            id,
            name: self.name.clone(),
            table,
            primary_key: self.primary_key.clone(),
            fields,
            relations: IndexMap::new(),
            translations,
            title: self.title.clone(),
            options: self.options,
        })
    }
}

impl FieldBuilder {
    /// Storage column. Defaults to the snake-cased field name.
    pub fn column(&mut self, column: impl Into<String>) -> &mut Self {
        self.column = Some(column.into());
        self
    }

    /// Translation table column holding a structured field's localized
    /// overlay. Defaults to the storage column.
    pub fn overlay_column(&mut self, column: impl Into<String>) -> &mut Self {
        self.overlay_column = Some(column.into());
        self
    }

    fn storage_column(&self) -> String {
        self.column
            .clone()
            .unwrap_or_else(|| self.name.to_snake_case())
    }

    fn build(&self) -> Field {
        let column = self.storage_column();

        let (location, structure) = match &self.kind {
            FieldKind::Main => (FieldLocation::Main { column }, None),
            FieldKind::Localized => (FieldLocation::Translation { column }, None),
            FieldKind::Virtual(expr) => (FieldLocation::Virtual { expr: expr.clone() }, None),
            FieldKind::Structured(shape) => {
                let overlay_column = self.overlay_column.clone().unwrap_or(column.clone());
                (
                    FieldLocation::Main { column },
                    Some(Structure {
                        overlay_column,
                        shape: shape.clone(),
                    }),
                )
            }
        };

        Field {
            name: self.name.clone(),
            location,
            structure,
        }
    }
}

impl RelationBuilder {
    /// Explicit join columns: `source` on the declaring collection, `target`
    /// on the related one. Composite keys list several columns.
    pub fn keys(
        &mut self,
        source: impl IntoIterator<Item = impl Into<String>>,
        target: impl IntoIterator<Item = impl Into<String>>,
    ) -> &mut Self {
        self.keys = Some(JoinKeys::new(source, target));
        self
    }

    /// The target's `belongs_to` relation this relation is the inverse of.
    pub fn pair(&mut self, relation: impl Into<String>) -> &mut Self {
        self.pair = Some(relation.into());
        self
    }

    /// Polymorphic constraint: only target rows where `column = value`.
    pub fn discriminator(
        &mut self,
        column: impl Into<String>,
        value: impl Into<stmt::Value>,
    ) -> &mut Self {
        self.discriminator = Some(Discriminator {
            column: column.into(),
            value: value.into(),
        });
        self
    }

    /// Junction column referencing the declaring collection.
    pub fn source_key(&mut self, column: impl Into<String>) -> &mut Self {
        self.source_key = Some(column.into());
        self
    }

    /// Junction column referencing the target collection.
    pub fn target_key(&mut self, column: impl Into<String>) -> &mut Self {
        self.target_key = Some(column.into());
        self
    }
}

struct ResolveRelations<'a> {
    builders: &'a [CollectionBuilder],
    lookup: &'a IndexMap<String, CollectionId>,
    collections: &'a mut Vec<Collection>,
}

impl ResolveRelations<'_> {
    fn resolve(&mut self) -> Result<()> {
        // belongs_to first
        for (index, builder) in self.builders.iter().enumerate() {
            for relation in builder.relations.values() {
                if relation.kind != RelationBuilderKind::BelongsTo {
                    continue;
                }

                let target = self.target_id(builder, &relation.target)?;
                let keys = relation.keys.clone().unwrap_or_else(|| {
                    JoinKeys::new(
                        [format!("{}_id", relation.name.to_snake_case())],
                        [self.builders[target.0].primary_key_column()],
                    )
                });

                self.insert(
                    index,
                    Relation {
                        name: relation.name.clone(),
                        target,
                        kind: RelationKind::ToOne(ToOne {
                            keys,
                            discriminator: relation.discriminator.clone(),
                        }),
                    },
                );
            }
        }

        for (index, builder) in self.builders.iter().enumerate() {
            for relation in builder.relations.values() {
                let target = self.target_id(builder, &relation.target)?;

                let kind = match &relation.kind {
                    RelationBuilderKind::BelongsTo => continue,
                    RelationBuilderKind::HasOne => {
                        let (keys, _) = self.inverse_keys(index, target, relation);
                        RelationKind::ToOne(ToOne {
                            keys,
                            discriminator: relation.discriminator.clone(),
                        })
                    }
                    RelationBuilderKind::HasMany => {
                        let (keys, pair) = self.inverse_keys(index, target, relation);
                        RelationKind::ToMany(ToMany {
                            keys,
                            pair,
                            discriminator: relation.discriminator.clone(),
                        })
                    }
                    RelationBuilderKind::ManyToMany { through } => {
                        RelationKind::ManyToMany(ManyToMany {
                            through: self.target_id(builder, through)?,
                            source_key: relation.source_key.clone().unwrap_or_default(),
                            target_key: relation.target_key.clone().unwrap_or_default(),
                        })
                    }
                };

                self.insert(
                    index,
                    Relation {
                        name: relation.name.clone(),
                        target,
                        kind,
                    },
                );
            }
        }

        // Restore declaration order
        for (index, builder) in self.builders.iter().enumerate() {
            let relations = &mut self.collections[index].relations;
            relations.sort_by_cached_key(|name, _| builder.relations.get_index_of(name));
        }

        Ok(())
    }

    fn target_id(&self, builder: &CollectionBuilder, name: &str) -> Result<CollectionId> {
        self.lookup.get(name).copied().ok_or_else(|| {
            Error::invalid_schema(format!(
                "collection `{}` references unknown collection `{name}`",
                builder.name
            ))
        })
    }

    fn insert(&mut self, index: usize, relation: Relation) {
        self.collections[index]
            .relations
            .insert(relation.name.clone(), relation);
    }

    /// Keys for `has_one`/`has_many`: explicit, or reversed from the paired
    /// `belongs_to` on the target. Incomplete (empty) when neither resolves.
    fn inverse_keys(
        &self,
        source: usize,
        target: CollectionId,
        relation: &RelationBuilder,
    ) -> (JoinKeys, Option<String>) {
        if let Some(keys) = &relation.keys {
            return (keys.clone(), relation.pair.clone());
        }

        let target_relations = &self.collections[target.0].relations;

        let pair = match &relation.pair {
            Some(pair) => target_relations.get(pair),
            None => {
                let declared = &self.builders[target.0].relations;
                let mut candidates = target_relations.values().filter(|r| {
                    r.target == CollectionId(source)
                        && declared
                            .get(&r.name)
                            .is_some_and(|b| b.kind == RelationBuilderKind::BelongsTo)
                });
                match (candidates.next(), candidates.next()) {
                    (Some(only), None) => Some(only),
                    _ => None,
                }
            }
        };

        match pair {
            Some(Relation {
                name,
                kind: RelationKind::ToOne(to_one),
                ..
            }) => (to_one.keys.reversed(), Some(name.clone())),
            _ => (JoinKeys::default(), relation.pair.clone()),
        }
    }
}
