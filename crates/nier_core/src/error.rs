/// Broad failure classes surfaced to callers that do not care which field broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MalformedInput,
    ChecksumMismatch,
    UnknownEnumCode,
    InvalidMutation,
    BitDiffAmbiguity,
}

/// Every decode failure names the dotted field path and the absolute byte offset
/// where it happened. Nested codecs report relative locations; enclosing records
/// re-locate them with [`CodecError::at`] as the error bubbles up.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CodecError {
    #[error("{field} @ 0x{offset:X}: needed {needed} bytes, {available} available")]
    Truncated {
        field: String,
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("{field} @ 0x{offset:X}: expected {expected} bytes, got {actual}")]
    LayoutMismatch {
        field: String,
        offset: usize,
        expected: usize,
        actual: usize,
    },

    #[error("{field} @ 0x{offset:X}: invalid UTF-8 string")]
    InvalidString { field: String, offset: usize },

    #[error("{field} @ 0x{offset:X}: incorrect stored checksum={stored} - calculated={computed}")]
    ChecksumMismatch {
        field: String,
        offset: usize,
        stored: u32,
        computed: u32,
    },

    #[error("{field} @ 0x{offset:X}: unknown {domain} code {code}")]
    UnknownEnumCode {
        field: String,
        offset: usize,
        domain: &'static str,
        code: String,
    },

    #[error("cannot set {field}: {reason}")]
    InvalidMutation { field: String, reason: String },

    #[error("no field named {0:?}")]
    UnknownField(String),

    #[error("slot index {index} out of range (bundle has {count} slots)")]
    SlotOutOfRange { index: usize, count: usize },

    #[error("a=0x{a:02X} and b=0x{b:02X} differ by {bits} bits, expected exactly 1")]
    BitDiffAmbiguity { a: u8, b: u8, bits: u32 },
}

pub type Result<T, E = CodecError> = std::result::Result<T, E>;

impl CodecError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Truncated { .. } | Self::LayoutMismatch { .. } | Self::InvalidString { .. } => {
                ErrorKind::MalformedInput
            }
            Self::ChecksumMismatch { .. } => ErrorKind::ChecksumMismatch,
            Self::UnknownEnumCode { .. } => ErrorKind::UnknownEnumCode,
            Self::InvalidMutation { .. } | Self::UnknownField(_) | Self::SlotOutOfRange { .. } => {
                ErrorKind::InvalidMutation
            }
            Self::BitDiffAmbiguity { .. } => ErrorKind::BitDiffAmbiguity,
        }
    }

    pub fn invalid_mutation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidMutation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Prefix the field path with `prefix` and shift the offset by `base`.
    pub fn at(mut self, prefix: &str, base: usize) -> Self {
        match &mut self {
            Self::Truncated { field, offset, .. }
            | Self::LayoutMismatch { field, offset, .. }
            | Self::InvalidString { field, offset }
            | Self::ChecksumMismatch { field, offset, .. }
            | Self::UnknownEnumCode { field, offset, .. } => {
                *field = join_path(prefix, field);
                *offset += base;
            }
            Self::InvalidMutation { field, .. } => *field = join_path(prefix, field),
            Self::UnknownField(_) | Self::SlotOutOfRange { .. } | Self::BitDiffAmbiguity { .. } => {}
        }
        self
    }

    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Truncated { field, .. }
            | Self::LayoutMismatch { field, .. }
            | Self::InvalidString { field, .. }
            | Self::ChecksumMismatch { field, .. }
            | Self::UnknownEnumCode { field, .. }
            | Self::InvalidMutation { field, .. } => Some(field),
            Self::UnknownField(name) => Some(name),
            Self::SlotOutOfRange { .. } | Self::BitDiffAmbiguity { .. } => None,
        }
    }

    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::Truncated { offset, .. }
            | Self::LayoutMismatch { offset, .. }
            | Self::InvalidString { offset, .. }
            | Self::ChecksumMismatch { offset, .. }
            | Self::UnknownEnumCode { offset, .. } => Some(*offset),
            _ => None,
        }
    }
}

fn join_path(prefix: &str, field: &str) -> String {
    match (prefix.is_empty(), field.is_empty()) {
        (true, _) => field.to_string(),
        (false, true) => prefix.to_string(),
        (false, false) => format!("{prefix}.{field}"),
    }
}
