use super::Error;

/// Error when a filter or ordering references a name that is neither a
/// field nor a relation of the collection.
#[derive(Debug)]
pub(super) struct FieldNotFound {
    collection: Box<str>,
    field: Box<str>,
}

impl std::error::Error for FieldNotFound {}

impl core::fmt::Display for FieldNotFound {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "field `{}` not found on collection `{}`",
            self.field, self.collection
        )
    }
}

impl Error {
    /// Creates a field-not-found error.
    pub fn field_not_found(collection: impl Into<String>, field: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::FieldNotFound(FieldNotFound {
            collection: collection.into().into(),
            field: field.into().into(),
        }))
    }

    /// Returns `true` if this error is a field-not-found error.
    pub fn is_field_not_found(&self) -> bool {
        self.any_kind(|kind| matches!(kind, super::ErrorKind::FieldNotFound(_)))
    }
}
