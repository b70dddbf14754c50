use std::fmt;

/// An error that can occur when processing distributable data
#[derive(Debug)]
pub struct Error(Box<ErrorKind>);

impl Error {
    pub(crate) fn new(kind: ErrorKind) -> Error {
        Error(Box::new(kind))
    }

    /// Return the specific type of error
    pub fn kind(&self) -> &ErrorKind {
        &self.0
    }

    /// Returns the byte offset at which the error occurred (if available)
    pub fn offset(&self) -> Option<usize> {
        self.0.offset()
    }
}

/// Specific type of error
#[derive(Debug)]
pub enum ErrorKind {
    /// A read or write reached past the end of the buffer
    OutOfBounds { offset: usize },

    /// The leading magic of a container did not match
    BadMagic { found: u32 },

    /// Container lengths or counts are structurally inconsistent
    MalformedContainer { offset: usize },

    /// Malformed `{...}` escape markup in message text
    UnknownEscapeToken { offset: usize },

    /// An archive path that cannot be represented in a node table
    InvalidPath { path: String },

    /// Signing or encryption was attempted without the required keys
    KeysUnavailable,

    /// RSA signing failed
    Rsa(rsa::Error),

    /// RSA key material could not be decoded
    Pkcs1(rsa::pkcs1::Error),

    /// A message attribute blob was not 16 hex-encoded bytes
    #[cfg(feature = "json")]
    InvalidAttributes { index: usize },

    /// An error occurred reading or writing the interchange document
    #[cfg(feature = "json")]
    Json(serde_json::Error),
}

impl ErrorKind {
    pub fn offset(&self) -> Option<usize> {
        match *self {
            ErrorKind::OutOfBounds { offset } => Some(offset),
            ErrorKind::MalformedContainer { offset } => Some(offset),
            ErrorKind::UnknownEscapeToken { offset } => Some(offset),
            _ => None,
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self.0 {
            ErrorKind::Rsa(ref err) => Some(err),
            ErrorKind::Pkcs1(ref err) => Some(err),
            #[cfg(feature = "json")]
            ErrorKind::Json(ref err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self.0 {
            ErrorKind::OutOfBounds { offset } => {
                write!(f, "read or write out of bounds (offset: {})", offset)
            }
            ErrorKind::BadMagic { found } => {
                write!(f, "unexpected leading magic (found: {:#010X})", found)
            }
            ErrorKind::MalformedContainer { offset } => {
                write!(f, "malformed container structure (offset: {})", offset)
            }
            ErrorKind::UnknownEscapeToken { offset } => {
                write!(f, "malformed escape token in message text (offset: {})", offset)
            }
            ErrorKind::InvalidPath { ref path } => write!(f, "invalid archive path: {}", path),
            ErrorKind::KeysUnavailable => write!(f, "rsa-aes keys not configured"),
            ErrorKind::Rsa(ref err) => write!(f, "rsa signing failed: {}", err),
            ErrorKind::Pkcs1(ref err) => write!(f, "rsa key decoding failed: {}", err),
            #[cfg(feature = "json")]
            ErrorKind::InvalidAttributes { index } => {
                write!(f, "attributes of message {} are not 16 hex-encoded bytes", index)
            }
            #[cfg(feature = "json")]
            ErrorKind::Json(ref err) => write!(f, "interchange document error: {}", err),
        }
    }
}

impl From<rsa::Error> for Error {
    fn from(error: rsa::Error) -> Self {
        Error::new(ErrorKind::Rsa(error))
    }
}

impl From<rsa::pkcs1::Error> for Error {
    fn from(error: rsa::pkcs1::Error) -> Self {
        Error::new(ErrorKind::Pkcs1(error))
    }
}

#[cfg(feature = "json")]
impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::new(ErrorKind::Json(error))
    }
}
