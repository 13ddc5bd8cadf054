//! STOMP frame model and codec.
//!
//! A [`Frame`] is one protocol message: a [`Command`], ordered [`Headers`]
//! and an opaque body. [`FrameCodec`] turns frames into wire bytes and
//! parses wire bytes back, one frame at a time.
//!
//! ```text
//! COMMAND\n
//! key:value\n
//! ...\n
//! \n
//! <body>\0
//! ```

mod codec;
mod command;
mod error;
mod headers;

use std::fmt;

pub use codec::*;
pub use command::Command;
pub use error::FrameError;
pub use headers::Headers;

use crate::core::CONTENT_LENGTH_HEADER;

/// A single STOMP frame.
///
/// Equality is structural: same command, same header mapping, same body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    command: Command,
    headers: Headers,
    body: Vec<u8>,
}

impl Frame {
    /// Create a frame with no headers and an empty body.
    pub fn new(command: Command) -> Self {
        Self {
            command,
            headers: Headers::new(),
            body: Vec::new(),
        }
    }

    /// Create a frame from its parts.
    pub fn from_parts(command: Command, headers: Headers, body: impl Into<Vec<u8>>) -> Self {
        Self {
            command,
            headers,
            body: body.into(),
        }
    }

    /// Add or replace a header.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key, value);
        self
    }

    /// Replace the body.
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Replace the body and declare its length in `content-length`.
    pub fn with_binary_body(self, body: impl Into<Vec<u8>>) -> Self {
        let body = body.into();
        let len = body.len();
        self.with_body(body)
            .with_header(CONTENT_LENGTH_HEADER, len.to_string())
    }

    /// The frame's command.
    pub fn command(&self) -> Command {
        self.command
    }

    /// All headers.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Look up a single header.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key)
    }

    /// The body bytes.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Declared body length, if a `content-length` header is present.
    pub fn content_length(&self) -> Result<Option<usize>, FrameError> {
        self.header(CONTENT_LENGTH_HEADER)
            .map(parse_content_length)
            .transpose()
    }
}

pub(crate) fn parse_content_length(value: &str) -> Result<usize, FrameError> {
    let trimmed = value.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FrameError::InvalidContentLength(value.to_string()));
    }
    trimmed
        .parse()
        .map_err(|_| FrameError::InvalidContentLength(value.to_string()))
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{", self.command)?;
        for (i, (k, v)) in self.headers.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{k}: {v}")?;
        }
        write!(f, "}} Body ({} bytes)", self.body.len())
    }
}
