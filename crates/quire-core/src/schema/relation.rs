use super::{Collection, CollectionId, Schema};
use crate::stmt::Value;

#[derive(Debug, Clone)]
pub struct Relation {
    /// The relation name, also the name of its field
    pub name: String,

    /// Related collection, resolved when the schema is built
    pub target: CollectionId,

    pub kind: RelationKind,
}

#[derive(Debug, Clone)]
pub enum RelationKind {
    /// At most one related record
    ToOne(ToOne),

    /// Any number of related records holding a key back to this one
    ToMany(ToMany),

    /// Any number of related records linked through a junction collection
    ManyToMany(ManyToMany),
}

/// Column pairs joining two tables.
///
/// `source[i]` on the declaring collection's table equals `target[i]` on the
/// related collection's table. Composite keys list more than one pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JoinKeys {
    pub source: Vec<String>,
    pub target: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ToOne {
    pub keys: JoinKeys,

    /// Restricts a polymorphic target to one record type
    pub discriminator: Option<Discriminator>,
}

#[derive(Debug, Clone)]
pub struct ToMany {
    pub keys: JoinKeys,

    /// The `ToOne` relation on the target the keys were derived from
    pub pair: Option<String>,

    /// Restricts a polymorphic target to rows pointing at this collection
    pub discriminator: Option<Discriminator>,
}

#[derive(Debug, Clone)]
pub struct ManyToMany {
    /// Junction collection
    pub through: CollectionId,

    /// Junction column referencing this collection's primary key
    pub source_key: String,

    /// Junction column referencing the target's primary key
    pub target_key: String,
}

/// A `column = value` constraint on the target table.
#[derive(Debug, Clone, PartialEq)]
pub struct Discriminator {
    pub column: String,
    pub value: Value,
}

impl JoinKeys {
    pub fn new(
        source: impl IntoIterator<Item = impl Into<String>>,
        target: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            source: source.into_iter().map(Into::into).collect(),
            target: target.into_iter().map(Into::into).collect(),
        }
    }

    /// Both sides name at least one column and pair up one-to-one.
    pub fn is_complete(&self) -> bool {
        !self.source.is_empty() && self.source.len() == self.target.len()
    }

    /// The same keys seen from the related collection.
    pub fn reversed(&self) -> Self {
        Self {
            source: self.target.clone(),
            target: self.source.clone(),
        }
    }

    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.source
            .iter()
            .zip(self.target.iter())
            .map(|(source, target)| (source.as_str(), target.as_str()))
    }
}

impl Relation {
    pub fn target<'a>(&self, schema: &'a Schema) -> &'a Collection {
        schema.collection(self.target)
    }

    pub fn is_to_one(&self) -> bool {
        matches!(self.kind, RelationKind::ToOne(_))
    }

    /// Whether the join configuration is usable. Incomplete relations are
    /// ignored by filters.
    pub fn is_complete(&self) -> bool {
        match &self.kind {
            RelationKind::ToOne(to_one) => to_one.keys.is_complete(),
            RelationKind::ToMany(to_many) => to_many.keys.is_complete(),
            RelationKind::ManyToMany(m2m) => {
                !m2m.source_key.is_empty() && !m2m.target_key.is_empty()
            }
        }
    }

    pub fn discriminator(&self) -> Option<&Discriminator> {
        match &self.kind {
            RelationKind::ToOne(to_one) => to_one.discriminator.as_ref(),
            RelationKind::ToMany(to_many) => to_many.discriminator.as_ref(),
            RelationKind::ManyToMany(_) => None,
        }
    }
}
