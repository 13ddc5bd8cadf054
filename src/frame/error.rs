//! Frame encoding and parsing errors.
//!
//! Any parse error means the byte stream is desynchronized: the transport
//! treats all of them as fatal.

use thiserror::Error;

/// Errors that can occur while serializing or parsing a frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    /// Command line is not a known STOMP verb.
    #[error("invalid command: {0:?}")]
    InvalidCommand(String),

    /// Header line without a `:` separator.
    #[error("malformed header line: {0:?}")]
    MalformedHeader(String),

    /// Undefined escape sequence in a header.
    #[error("invalid escape sequence \\{0} in header")]
    InvalidEscape(char),

    /// Command or header bytes are not valid UTF-8.
    #[error("frame head is not valid UTF-8")]
    InvalidUtf8,

    /// `content-length` is not a non-negative integer.
    #[error("invalid content-length: {0:?}")]
    InvalidContentLength(String),

    /// Byte after a length-delimited body is not the NUL terminator.
    #[error("missing frame terminator after {content_length}-byte body, found 0x{found:02x}")]
    MissingTerminator {
        /// Declared body length.
        content_length: usize,
        /// Byte found where NUL was expected.
        found: u8,
    },

    /// Declared `content-length` disagrees with the actual body.
    #[error("content-length mismatch: header says {declared}, body has {actual} bytes")]
    ContentLengthMismatch {
        /// Value of the `content-length` header.
        declared: usize,
        /// Actual body length.
        actual: usize,
    },

    /// Header cannot be represented in the negotiated version.
    #[error("header {0:?} cannot be encoded without escaping")]
    UnencodableHeader(String),
}
