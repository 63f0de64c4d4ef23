use crate::deflate::DeflateError;
use crate::payload::PayloadError;
use std::{io, path::PathBuf};

/// A save container error
#[derive(thiserror::Error, Debug)]
#[error(transparent)]
pub struct SavError(#[from] Box<SavErrorKind>);

impl SavError {
    pub(crate) fn new(kind: SavErrorKind) -> SavError {
        SavError(Box::new(kind))
    }

    pub(crate) fn invalid_argument(msg: impl Into<String>) -> SavError {
        SavError::new(SavErrorKind::InvalidArgument { msg: msg.into() })
    }

    /// Return the specific type of error
    pub fn kind(&self) -> &SavErrorKind {
        &self.0
    }

    /// Consume the error and return the specific type of error
    pub fn into_kind(self) -> SavErrorKind {
        *self.0
    }
}

impl From<SavErrorKind> for SavError {
    fn from(err: SavErrorKind) -> Self {
        SavError::new(err)
    }
}

/// Specific type of error
#[derive(thiserror::Error, Debug)]
pub enum SavErrorKind {
    #[error("invalid argument: {msg}")]
    InvalidArgument { msg: String },

    #[error("save file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("refusing to overwrite existing file: {}", .path.display())]
    AlreadyExists { path: PathBuf },

    #[error("incorrect zlib header: expected 78 9c but found {:02x} {:02x}", .found[0], .found[1])]
    InvalidFormat { found: [u8; 2] },

    #[error("unsupported magic number: {magic:#010x}")]
    UnsupportedFormat { magic: i32 },

    #[error("unable to inflate payload: {msg}")]
    Inflate { msg: String },

    #[error("unable to compress payload: {msg}")]
    Deflate { msg: String },

    #[error("header declared {declared} decompressed bytes but payload inflated to {actual}")]
    LengthMismatch { declared: i32, actual: usize },

    #[error("payload inflates past the {limit} byte limit")]
    PayloadTooLarge { limit: usize },

    #[error("payload codec failed: {0}")]
    Payload(#[source] PayloadError),

    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl From<DeflateError> for SavErrorKind {
    fn from(x: DeflateError) -> Self {
        match x {
            DeflateError::BadData { msg } => SavErrorKind::Inflate { msg },
            DeflateError::Compress { msg } => SavErrorKind::Deflate { msg },
            DeflateError::LimitExceeded { limit } => SavErrorKind::PayloadTooLarge { limit },
        }
    }
}

impl From<DeflateError> for SavError {
    fn from(value: DeflateError) -> Self {
        SavError::from(SavErrorKind::from(value))
    }
}

impl From<io::Error> for SavError {
    fn from(value: io::Error) -> Self {
        SavError::from(SavErrorKind::from(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_of_error_test() {
        assert_eq!(std::mem::size_of::<SavError>(), 8);
    }

    #[test]
    fn error_messages() {
        let err = SavError::from(SavErrorKind::InvalidFormat { found: [0x78, 0x01] });
        assert_eq!(
            err.to_string(),
            "incorrect zlib header: expected 78 9c but found 78 01"
        );

        let err = SavError::from(SavErrorKind::UnsupportedFormat { magic: 0x4132_3334 });
        assert_eq!(err.to_string(), "unsupported magic number: 0x41323334");
    }

    #[test]
    fn io_errors_keep_their_kind() {
        let err = SavError::from(io::Error::from(io::ErrorKind::UnexpectedEof));
        match err.into_kind() {
            SavErrorKind::Io(e) => assert_eq!(e.kind(), io::ErrorKind::UnexpectedEof),
            x => panic!("unexpected error kind: {:?}", x),
        }
    }
}
