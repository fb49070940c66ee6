use backtrace::Backtrace;
use parking_lot::RwLock;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;
use std::sync::Arc;

/// Error kinds for Cella operations.
///
/// Each kind names one category of failure so callers can match on
/// [`CellaError::kind`] instead of parsing messages.
///
/// # Examples
///
/// ```rust
/// use cella::errors::{CellaError, CellaResult, ErrorKind};
///
/// fn example() -> CellaResult<()> {
///     Err(CellaError::new("top level value is not an array", ErrorKind::SchemaError))
/// }
///
/// assert_eq!(example().unwrap_err().kind(), &ErrorKind::SchemaError);
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    // Load Errors
    /// The loaded data is not a JSON array at the top level
    SchemaError,
    /// A loaded entry is missing `_id`/`_collection` or carries them with the wrong shape
    ItemValidationError,

    // Write Errors
    /// An inserted id is malformed or already present in the collection
    InsertionError,
    /// Creating the store directory or writing the store file failed
    PersistenceError,

    // Lookup Errors
    /// A collection name is not acceptable
    InvalidCollectionName,

    // Query Errors
    /// A query specification could not be parsed
    FilterError,

    // IO and Encoding Errors
    /// Generic IO error
    IOError,
    /// Error encoding or decoding JSON
    EncodingError,

    // Generic/Internal Errors - used as fallback
    /// Internal error (usually indicates a bug)
    InternalError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::SchemaError => write!(f, "Schema error"),
            ErrorKind::ItemValidationError => write!(f, "Item validation error"),
            ErrorKind::InsertionError => write!(f, "Insertion error"),
            ErrorKind::PersistenceError => write!(f, "Persistence error"),
            ErrorKind::InvalidCollectionName => write!(f, "Invalid collection name"),
            ErrorKind::FilterError => write!(f, "Filter error"),
            ErrorKind::IOError => write!(f, "IO error"),
            ErrorKind::EncodingError => write!(f, "Encoding error"),
            ErrorKind::InternalError => write!(f, "Internal error"),
        }
    }
}

/// Custom Cella error type.
///
/// `CellaError` carries a message, an [`ErrorKind`], an optional cause and a
/// backtrace captured at construction. The backtrace is resolved lazily, only
/// when the error is debug-printed.
///
/// # Examples
///
/// ```rust
/// use cella::errors::{CellaError, ErrorKind};
///
/// let cause = CellaError::new("disk full", ErrorKind::IOError);
/// let err = CellaError::new_with_cause("could not write store", ErrorKind::PersistenceError, cause);
/// assert!(err.cause().is_some());
/// ```
#[derive(Clone)]
pub struct CellaError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<CellaError>>,
    backtrace: Arc<RwLock<Backtrace>>,
}

impl CellaError {
    /// Creates a new `CellaError` with the specified message and error kind.
    ///
    /// # Arguments
    ///
    /// * `message` - A description of the error
    /// * `error_kind` - The category of error
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        CellaError {
            message: message.to_string(),
            error_kind,
            cause: None,
            backtrace: Arc::new(RwLock::new(Backtrace::new_unresolved())),
        }
    }

    /// Creates a new `CellaError` that wraps the error which caused it.
    ///
    /// # Arguments
    ///
    /// * `message` - A description of the error
    /// * `error_kind` - The category of error
    /// * `cause` - The underlying error
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: CellaError) -> Self {
        CellaError {
            message: message.to_string(),
            error_kind,
            cause: Some(Box::new(cause)),
            backtrace: Arc::new(RwLock::new(Backtrace::new_unresolved())),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn cause(&self) -> Option<&CellaError> {
        self.cause.as_deref()
    }
}

impl Display for CellaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for CellaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // print error message with stack trace followed by cause
        match &self.cause {
            Some(cause) => write!(f, "{}: {}\nCaused by: {:?}", self.error_kind, self.message, cause),
            None => {
                let mut backtrace = self.backtrace.write();
                backtrace.resolve();
                write!(f, "{}: {}\n{:?}", self.error_kind, self.message, *backtrace)
            }
        }
    }
}

impl Error for CellaError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// A result type alias for Cella operations.
pub type CellaResult<T> = Result<T, CellaError>;

// From trait implementations for automatic error conversion
impl From<std::io::Error> for CellaError {
    fn from(err: std::io::Error) -> Self {
        CellaError::new(&format!("IO error: {}", err), ErrorKind::IOError)
    }
}

impl From<serde_json::Error> for CellaError {
    fn from(err: serde_json::Error) -> Self {
        CellaError::new(&format!("JSON error: {}", err), ErrorKind::EncodingError)
    }
}

impl From<String> for CellaError {
    fn from(msg: String) -> Self {
        CellaError::new(&msg, ErrorKind::InternalError)
    }
}

impl From<&str> for CellaError {
    fn from(msg: &str) -> Self {
        CellaError::new(msg, ErrorKind::InternalError)
    }
}
