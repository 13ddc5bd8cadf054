//! Transport configuration and builder.

use std::time::Duration;

use super::connection::FrameTransport;
use super::socket::StompSocket;
use crate::core::{
    DEFAULT_READ_CHUNK_SIZE, DEFAULT_RECEIVE_TIMEOUT, DEFAULT_RECV_BUFFER_CAPACITY, Version,
};

/// Tunables of a [`FrameTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    /// Maximum bytes requested per socket read.
    pub read_chunk_size: usize,
    /// Initial receive buffer capacity.
    pub recv_buffer_capacity: usize,
    /// How long `receive` waits for readability (`None` blocks).
    pub receive_timeout: Option<Duration>,
    /// Protocol version used for header encoding.
    pub version: Version,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            read_chunk_size: DEFAULT_READ_CHUNK_SIZE,
            recv_buffer_capacity: DEFAULT_RECV_BUFFER_CAPACITY,
            receive_timeout: DEFAULT_RECEIVE_TIMEOUT,
            version: Version::default(),
        }
    }
}

/// Builder for creating frame transports with custom options.
#[derive(Debug, Clone, Default)]
pub struct FrameTransportBuilder {
    config: TransportConfig,
}

impl FrameTransportBuilder {
    /// Create a builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum read size (at least one byte).
    pub fn read_chunk_size(mut self, size: usize) -> Self {
        self.config.read_chunk_size = size.max(1);
        self
    }

    /// Set the initial receive buffer capacity.
    pub fn recv_buffer_capacity(mut self, capacity: usize) -> Self {
        self.config.recv_buffer_capacity = capacity;
        self
    }

    /// Set the readability timeout applied by `receive`.
    pub fn receive_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.receive_timeout = timeout;
        self
    }

    /// Set the protocol version.
    pub fn version(mut self, version: Version) -> Self {
        self.config.version = version;
        self
    }

    /// The configuration built so far.
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Create a transport for `host:port` with no socket attached.
    pub fn build<S: StompSocket>(self, host: impl Into<String>, port: u16) -> FrameTransport<S> {
        FrameTransport::with_config(host, port, self.config)
    }
}
