mod builder;
pub use builder::{Builder, CollectionBuilder, FieldBuilder, RelationBuilder};

mod collection;
pub use collection::{Collection, CollectionId, CollectionOptions, TranslationTable};

mod field;
pub use field::{Field, FieldLocation, Structure};

mod relation;
pub use relation::{
    Discriminator, JoinKeys, ManyToMany, Relation, RelationKind, ToMany, ToOne,
};

mod shape;
pub use shape::Shape;

mod verify;

use indexmap::IndexMap;

/// Registry of every collection known to the application.
///
/// Built once at startup by [`Builder`] and read-only afterwards. Relations
/// reference their targets by [`CollectionId`], resolved while building.
#[derive(Debug, Default)]
pub struct Schema {
    collections: Vec<Collection>,
    lookup: IndexMap<String, CollectionId>,
}

impl Schema {
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Get a collection by ID
    #[track_caller]
    pub fn collection(&self, id: impl Into<CollectionId>) -> &Collection {
        let id = id.into();
        self.collections
            .get(id.0)
            .unwrap_or_else(|| panic!("invalid collection ID; id={id:?}"))
    }

    pub fn collection_by_name(&self, name: &str) -> Option<&Collection> {
        self.lookup.get(name).map(|id| self.collection(*id))
    }

    pub fn collections(&self) -> impl Iterator<Item = &Collection> {
        self.collections.iter()
    }
}
