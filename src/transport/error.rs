//! Transport layer error types.
//!
//! Every error except [`TransportError::Encode`] and
//! [`TransportError::Timeout`] releases the socket before it is returned.

use std::io;

use thiserror::Error;

use crate::frame::FrameError;

/// Transport layer errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// No socket attached, or the socket reports it is not connected.
    #[error("not connected")]
    NotConnected,

    /// Peer closed the stream (zero-byte read).
    #[error("connection closed by peer")]
    ConnectionClosed,

    /// I/O error (poll, read or write).
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    /// Received bytes do not form a valid frame; the stream is desynchronized.
    #[error("protocol error: {0}")]
    Protocol(FrameError),

    /// Outgoing frame cannot be serialized. Nothing was written.
    #[error("cannot encode frame: {0}")]
    Encode(FrameError),

    /// No data became readable within the receive timeout.
    #[error("timed out waiting for data")]
    Timeout,
}

impl TransportError {
    /// Whether this is a connection failure (not connected, peer close, I/O).
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            TransportError::NotConnected | TransportError::ConnectionClosed | TransportError::Io(_)
        )
    }

    /// Whether the transport released its socket because of this error.
    pub fn is_fatal(&self) -> bool {
        self.is_connection_error() || matches!(self, TransportError::Protocol(_))
    }
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;
