use super::Error;

/// Error when a query filters or sorts by a virtual field that has no
/// computed expression.
///
/// Such fields are populated after the read (for example by hooks) and have
/// nothing the database can evaluate.
#[derive(Debug)]
pub(super) struct NonQueryableField {
    collection: Box<str>,
    field: Box<str>,
}

impl std::error::Error for NonQueryableField {}

impl core::fmt::Display for NonQueryableField {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "field `{}.{}` is not queryable: it is a virtual field without a computed \
             expression; define it with an expression to filter or sort by it",
            self.collection, self.field
        )
    }
}

impl Error {
    /// Creates a non-queryable field error.
    pub fn non_queryable_field(collection: impl Into<String>, field: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::NonQueryableField(NonQueryableField {
            collection: collection.into().into(),
            field: field.into().into(),
        }))
    }

    /// Returns `true` if this error is a non-queryable field error.
    pub fn is_non_queryable_field(&self) -> bool {
        self.any_kind(|kind| matches!(kind, super::ErrorKind::NonQueryableField(_)))
    }
}
