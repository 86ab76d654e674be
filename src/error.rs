/// Crate-wide error type.
///
/// Futures carry their failure as an opaque value, so every layer (promise
/// lifecycle, buffer arithmetic, codec, transport, session) reports through
/// this single enum. Kinds that the ownership model already rules out at
/// compile time (getting a consumed future, pushing into a dropped shared
/// state) have no variant here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The promise has already delivered its result
    BadPromise,
    /// The paired future was already taken from this promise
    FutureAlreadyRetrieved,
    /// The promise was dropped without delivering a result
    BrokenPromise,
    /// Waiting for a future did not finish within the given timeout
    FutureTimeout,
    /// Fewer writable bytes remain in the buffer than requested
    BufferOverflow { requested: usize, remaining: usize },
    /// Fewer readable bytes remain in the buffer than requested
    BufferUnderflow { requested: usize, remaining: usize },
    /// A message could not be encoded
    Encode { reason: String },
    /// A message could not be decoded
    Decode { reason: String },
    /// Message content length did not match the fixed header
    Session { expected: usize, actual: usize },
    /// The peer closed the connection
    Closed,
    /// Read operation failed
    Read { reason: String },
    /// Write operation failed
    Write { reason: String },
    /// Accept operation failed
    Accept { reason: String },
    /// Host name resolution failed
    Resolve { reason: String },
    /// Connection attempt failed
    Connect { reason: String },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::BadPromise => write!(f, "Promise has already delivered its result"),
            Error::FutureAlreadyRetrieved => {
                write!(f, "Future was already retrieved from this promise")
            }
            Error::BrokenPromise => {
                write!(f, "Promise was dropped without delivering a result")
            }
            Error::FutureTimeout => {
                write!(f, "Timed out while waiting for future completion")
            }
            Error::BufferOverflow {
                requested,
                remaining,
            } => {
                write!(
                    f,
                    "Buffer overflow: requested {} bytes, {} remaining",
                    requested, remaining
                )
            }
            Error::BufferUnderflow {
                requested,
                remaining,
            } => {
                write!(
                    f,
                    "Buffer underflow: requested {} bytes, {} remaining",
                    requested, remaining
                )
            }
            Error::Encode { reason } => write!(f, "Encode error: {}", reason),
            Error::Decode { reason } => write!(f, "Decode error: {}", reason),
            Error::Session { expected, actual } => {
                write!(
                    f,
                    "Session error: expected {} bytes of remaining length, found {}",
                    expected, actual
                )
            }
            Error::Closed => write!(f, "Connection closed by peer"),
            Error::Read { reason } => write!(f, "Read operation failed: {}", reason),
            Error::Write { reason } => write!(f, "Write operation failed: {}", reason),
            Error::Accept { reason } => write!(f, "Accept operation failed: {}", reason),
            Error::Resolve { reason } => write!(f, "Host name resolution failed: {}", reason),
            Error::Connect { reason } => write!(f, "Connection attempt failed: {}", reason),
        }
    }
}

impl std::error::Error for Error {}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// The result of an asynchronous operation, as delivered through a future.
pub type Attempt<T> = std::result::Result<T, Error>;
