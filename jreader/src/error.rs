//! Error types for `jreader`.

/// Convenient type alias for `jreader` results.
pub type Result<T> = core::result::Result<T, Error>;

/// Wraps whatever I/O error the caller's `embedded_io::Read` produced.
///
/// `no_std` compatible: the underlying reader's error is erased to its
/// `embedded_io::ErrorKind`, since the reader's own error type is not
/// required to be `Clone`/`Debug`-friendly in embedded contexts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IoError {
    kind: embedded_io::ErrorKind,
}

impl IoError {
    #[must_use]
    pub(crate) fn new(kind: embedded_io::ErrorKind) -> Self {
        Self { kind }
    }

    /// The underlying `embedded_io::ErrorKind`.
    #[must_use]
    pub fn kind(&self) -> embedded_io::ErrorKind {
        self.kind
    }
}

#[cfg(any(feature = "std", feature = "display"))]
impl core::fmt::Display for IoError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "I/O error: {:?}", self.kind)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for IoError {}

/// An error produced while decoding the byte stream as UTF-8.
#[derive(Debug)]
pub enum Error {
    /// The underlying reader failed.
    Io(IoError),
    /// The byte stream is not valid UTF-8 at the given byte offset.
    InvalidUtf8 { offset: usize },
}

impl Error {
    pub(crate) fn from_embedded<E: embedded_io::Error>(e: E) -> Self {
        Error::Io(IoError::new(e.kind()))
    }
}

#[cfg(any(feature = "std", feature = "display"))]
impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Io(e) => write!(f, "{e}"),
            Error::InvalidUtf8 { offset } => {
                write!(f, "invalid UTF-8 in JSON stream at byte offset {offset}")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
