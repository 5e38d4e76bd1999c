use super::{Collection, FieldLocation, Relation, RelationKind, Schema};
use crate::{Error, Result};

struct Verify<'a> {
    schema: &'a Schema,
    strict_relations: bool,
}

impl Schema {
    pub(super) fn verify(&self, strict_relations: bool) -> Result<()> {
        Verify {
            schema: self,
            strict_relations,
        }
        .verify()
    }
}

impl Verify<'_> {
    fn verify(&self) -> Result<()> {
        for collection in self.schema.collections() {
            self.verify_primary_key(collection)?;
            self.verify_title(collection)?;

            for relation in collection.relations.values() {
                self.verify_relation(collection, relation)?;
            }
        }

        Ok(())
    }

    fn verify_primary_key(&self, collection: &Collection) -> Result<()> {
        match collection.field(&collection.primary_key).map(|f| &f.location) {
            Some(FieldLocation::Main { .. }) => Ok(()),
            _ => Err(Error::invalid_schema(format!(
                "primary key `{}.{}` must be stored in the main table",
                collection.name, collection.primary_key
            ))),
        }
    }

    fn verify_title(&self, collection: &Collection) -> Result<()> {
        let Some(title) = &collection.title else {
            return Ok(());
        };

        match collection.field(title) {
            Some(field) if !field.is_relation() => Ok(()),
            Some(_) => Err(Error::invalid_schema(format!(
                "title `{}.{title}` cannot be a relation",
                collection.name
            ))),
            None => Err(Error::invalid_schema(format!(
                "title `{}.{title}` is not a field",
                collection.name
            ))),
        }
    }

    /// Incomplete join configurations are reported here. Outside strict mode
    /// they stay in the schema and compile to no condition.
    fn verify_relation(&self, collection: &Collection, relation: &Relation) -> Result<()> {
        if relation.is_complete() {
            return self.verify_junction(collection, relation);
        }

        let reason = match &relation.kind {
            RelationKind::ToOne(_) => "has no usable join keys",
            RelationKind::ToMany(_) => {
                "has no join keys and no unique paired `belongs_to` on the target"
            }
            RelationKind::ManyToMany(_) => "is missing its junction `source_key` or `target_key`",
        };

        if self.strict_relations {
            return Err(Error::invalid_schema(format!(
                "relation `{}.{}` {reason}",
                collection.name, relation.name
            )));
        }

        tracing::warn!(
            collection = %collection.name,
            relation = %relation.name,
            "relation {reason}; filters on it will be ignored"
        );

        Ok(())
    }

    fn verify_junction(&self, collection: &Collection, relation: &Relation) -> Result<()> {
        let RelationKind::ManyToMany(m2m) = &relation.kind else {
            return Ok(());
        };

        if m2m.through == collection.id && m2m.through == relation.target {
            return Err(Error::invalid_schema(format!(
                "relation `{}.{}` cannot use its own collection as the junction",
                collection.name, relation.name
            )));
        }

        Ok(())
    }
}
