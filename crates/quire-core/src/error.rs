mod adhoc;
mod driver;
mod field_not_found;
mod invalid_filter;
mod invalid_schema;
mod non_queryable_field;
mod recursion_limit;
mod unknown_relation;

use adhoc::AdhocError;
use driver::DriverError;
use field_not_found::FieldNotFound;
use invalid_filter::InvalidFilter;
use invalid_schema::InvalidSchema;
use non_queryable_field::NonQueryableField;
use recursion_limit::RecursionLimit;
use unknown_relation::UnknownRelation;

use std::{fmt, sync::Arc};

/// Returns early with an ad-hoc error built from format arguments.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::err!($($arg)*))
    };
}

/// Builds an ad-hoc error from format arguments.
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {
        $crate::Error::from_args(format_args!($($arg)*))
    };
}

/// An error raised while building a schema, compiling a request, or running
/// it.
///
/// The error is a single pointer. Each kind has a constructor and an `is_*`
/// predicate; predicates look through any context added with
/// [`Error::context`].
#[derive(Clone)]
pub struct Error {
    inner: Arc<ErrorInner>,
}

#[derive(Debug)]
struct ErrorInner {
    kind: ErrorKind,

    /// The error this one wraps
    cause: Option<Error>,
}

#[derive(Debug)]
enum ErrorKind {
    Anyhow(anyhow::Error),
    Adhoc(AdhocError),
    Driver(DriverError),
    FieldNotFound(FieldNotFound),
    InvalidFilter(InvalidFilter),
    InvalidSchema(InvalidSchema),
    NonQueryableField(NonQueryableField),
    RecursionLimit(RecursionLimit),
    UnknownRelation(UnknownRelation),
}

impl Error {
    /// Wraps the error with a message saying what was being done. The
    /// message is displayed first.
    #[cold]
    pub fn context(self, message: impl fmt::Display) -> Error {
        Error {
            inner: Arc::new(ErrorInner {
                kind: ErrorKind::Adhoc(AdhocError::new(message.to_string())),
                cause: Some(self),
            }),
        }
    }

    /// Creates an ad-hoc error from format arguments. Prefer the `err!` and
    /// `bail!` macros.
    pub fn from_args(args: fmt::Arguments<'_>) -> Error {
        Error::from(ErrorKind::Adhoc(AdhocError::new(args.to_string())))
    }

    /// Returns `true` if the error was caused by the caller's request rather
    /// than by the schema or the database.
    pub fn is_validation(&self) -> bool {
        self.any_kind(|kind| {
            matches!(
                kind,
                ErrorKind::NonQueryableField(_)
                    | ErrorKind::FieldNotFound(_)
                    | ErrorKind::UnknownRelation(_)
                    | ErrorKind::InvalidFilter(_)
                    | ErrorKind::RecursionLimit(_)
            )
        })
    }

    /// This error followed by every error it wraps.
    fn chain(&self) -> impl Iterator<Item = &Error> {
        std::iter::successors(Some(self), |err| err.inner.cause.as_ref())
    }

    fn any_kind(&self, f: impl Fn(&ErrorKind) -> bool) -> bool {
        self.chain().any(|err| f(&err.inner.kind))
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        if let Some(cause) = &self.inner.cause {
            return Some(cause);
        }

        match &self.inner.kind {
            ErrorKind::Driver(err) => Some(err),
            ErrorKind::Anyhow(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.chain().enumerate() {
            if i > 0 {
                f.write_str(": ")?;
            }
            fmt::Display::fmt(&err.inner.kind, f)?;
        }
        Ok(())
    }
}

/// `{:?}` prints the message; `{:#?}` prints the kinds.
impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            f.debug_list()
                .entries(self.chain().map(|err| &err.inner.kind))
                .finish()
        } else {
            fmt::Display::fmt(self, f)
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anyhow(err) => fmt::Display::fmt(err, f),
            Self::Adhoc(err) => fmt::Display::fmt(err, f),
            Self::Driver(err) => fmt::Display::fmt(err, f),
            Self::FieldNotFound(err) => fmt::Display::fmt(err, f),
            Self::InvalidFilter(err) => fmt::Display::fmt(err, f),
            Self::InvalidSchema(err) => fmt::Display::fmt(err, f),
            Self::NonQueryableField(err) => fmt::Display::fmt(err, f),
            Self::RecursionLimit(err) => fmt::Display::fmt(err, f),
            Self::UnknownRelation(err) => fmt::Display::fmt(err, f),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error {
            inner: Arc::new(ErrorInner { kind, cause: None }),
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Error {
        Error::from(ErrorKind::Anyhow(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::from(anyhow::Error::from(err))
    }
}
