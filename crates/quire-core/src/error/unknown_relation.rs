use super::Error;

/// Error when a relation filter names a relation the collection does not
/// declare.
#[derive(Debug)]
pub(super) struct UnknownRelation {
    collection: Box<str>,
    relation: Box<str>,
}

impl std::error::Error for UnknownRelation {}

impl core::fmt::Display for UnknownRelation {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "relation `{}` not found on collection `{}`",
            self.relation, self.collection
        )
    }
}

impl Error {
    /// Creates an unknown relation error.
    pub fn unknown_relation(collection: impl Into<String>, relation: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnknownRelation(UnknownRelation {
            collection: collection.into().into(),
            relation: relation.into().into(),
        }))
    }

    /// Returns `true` if this error is an unknown relation error.
    pub fn is_unknown_relation(&self) -> bool {
        self.any_kind(|kind| matches!(kind, super::ErrorKind::UnknownRelation(_)))
    }
}
