use std::io;
use thiserror::Error;

/// Malformed archive bytes.  Always fatal to the decode in progress.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("Invalid magic: expected \"FCA\", found {found:02x?}")]
    InvalidMagic { found: Vec<u8> },
    #[error("Missing version byte after magic")]
    MissingVersion,
    #[error("Unsupported version: {0}")]
    UnsupportedVersion(u8),
    /// 1..=3 bytes where a record's `total_size` field should start.
    #[error("Truncated size field in record {record}")]
    TruncatedSize { record: usize },
    #[error("Truncated header in record {record}")]
    TruncatedHeader { record: usize },
    #[error("Truncated content in record {record}: expected {expected} bytes, got {actual}")]
    TruncatedContent { record: usize, expected: u64, actual: u64 },
    #[error("Negative content size in record {record}: total_size {total_size} < 2 + header_size {header_size}")]
    NegativeSize { record: usize, total_size: u32, header_size: u16 },
}

#[derive(Error, Debug)]
pub enum FcaError {
    #[error("Input error: {0}")]
    Input(String),
    #[error("Format error: {0}")]
    Format(#[from] FormatError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl FcaError {
    pub(crate) fn input(msg: impl Into<String>) -> Self {
        FcaError::Input(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, FcaError>;
