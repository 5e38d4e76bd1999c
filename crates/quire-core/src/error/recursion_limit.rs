use super::Error;

/// Error when a nested structure exceeds its depth budget.
#[derive(Debug)]
pub(super) struct RecursionLimit {
    what: Box<str>,
    limit: usize,
}

impl std::error::Error for RecursionLimit {}

impl core::fmt::Display for RecursionLimit {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "{} exceeds the maximum nesting depth of {}",
            self.what, self.limit
        )
    }
}

impl Error {
    /// Creates a recursion limit error.
    pub fn recursion_limit(what: impl Into<String>, limit: usize) -> Error {
        Error::from(super::ErrorKind::RecursionLimit(RecursionLimit {
            what: what.into().into(),
            limit,
        }))
    }

    /// Returns `true` if this error is a recursion limit error.
    pub fn is_recursion_limit(&self) -> bool {
        self.any_kind(|kind| matches!(kind, super::ErrorKind::RecursionLimit(_)))
    }
}
