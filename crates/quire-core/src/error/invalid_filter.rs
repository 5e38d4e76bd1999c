use super::Error;

/// Error when a filter tree is structurally malformed, for example an `AND`
/// group whose value is not an array.
#[derive(Debug)]
pub(super) struct InvalidFilter {
    message: Box<str>,
}

impl std::error::Error for InvalidFilter {}

impl core::fmt::Display for InvalidFilter {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid filter: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid filter error.
    pub fn invalid_filter(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidFilter(InvalidFilter {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid filter error.
    pub fn is_invalid_filter(&self) -> bool {
        self.any_kind(|kind| matches!(kind, super::ErrorKind::InvalidFilter(_)))
    }
}
