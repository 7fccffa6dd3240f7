//! Error types for PCK reading and extraction.

use thiserror::Error;

use crate::pck::ArchiveVersion;

/// Result type alias using the crate [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Broad failure class of an [`Error`].
///
/// Archive open treats every class as fatal. During extraction only
/// [`ErrorKind::Compression`] is isolated to the entry that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or unsupported archive structure.
    Format,
    /// zlib stream could not be inflated.
    Compression,
    /// Underlying container unreadable or too short.
    Io,
}

/// Errors that can occur while reading a PCK archive.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error from a local container.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A positioned read extends past the end of its container.
    #[error("read of {length} bytes at offset {offset:#x} exceeds container length {total:#x}")]
    OutOfBounds { offset: u64, length: u64, total: u64 },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Remote server rejected or could not serve a request.
    #[error("remote source: {0}")]
    Remote(String),

    /// The trailing version field holds an unknown value.
    #[error("unknown version {0}")]
    UnknownVersion(u32),

    /// Extended (two-file) mode requested for a version without support for it.
    #[error("unsupported extended/version combination: {0} archives cannot be extended")]
    UnsupportedExtended(ArchiveVersion),

    /// A FAT record's obfuscated size pair failed its self-check.
    #[error("size mismatch in FAT record {index}: {size} != {size_check}")]
    SizeMismatch { index: u32, size: u32, size_check: u32 },

    /// A FAT record did not expand to the fixed layout size.
    #[error("FAT record {index} is {actual} bytes, expected {expected}")]
    InvalidRecordLength {
        index: u32,
        expected: usize,
        actual: usize,
    },

    /// zlib decompression failed.
    #[error("decompression failed: {0}")]
    Decompression(String),
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Io(_) | Error::OutOfBounds { .. } | Error::Http(_) | Error::Remote(_) => {
                ErrorKind::Io
            }
            Error::UnknownVersion(_)
            | Error::UnsupportedExtended(_)
            | Error::SizeMismatch { .. }
            | Error::InvalidRecordLength { .. } => ErrorKind::Format,
            Error::Decompression(_) => ErrorKind::Compression,
        }
    }
}
