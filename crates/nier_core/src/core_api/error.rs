use std::error::Error;
use std::fmt;

use crate::error::{CodecError, ErrorKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreErrorCode {
    Parse,
    Checksum,
    InvalidEdit,
    OutOfRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreError {
    pub code: CoreErrorCode,
    pub message: String,
}

impl CoreError {
    pub fn new(code: CoreErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Wrap a codec failure, keeping its field path and offset in the message.
    pub fn from_codec(context: &str, err: CodecError) -> Self {
        let code = match (&err, err.kind()) {
            (CodecError::SlotOutOfRange { .. }, _) => CoreErrorCode::OutOfRange,
            (_, ErrorKind::ChecksumMismatch) => CoreErrorCode::Checksum,
            (_, ErrorKind::MalformedInput | ErrorKind::UnknownEnumCode) => CoreErrorCode::Parse,
            (_, ErrorKind::InvalidMutation | ErrorKind::BitDiffAmbiguity) => {
                CoreErrorCode::InvalidEdit
            }
        };
        Self::new(code, format!("{context}: {err}"))
    }
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl Error for CoreError {}
