//! Synchronous frame transport over a [`StompSocket`].
//!
//! The transport is either *usable* (socket attached and connected) or
//! *released* (no socket). Every fatal error moves it to released before the
//! error is returned; only the owner can attach a new socket.

use std::time::Duration;

use bytes::{Buf, BytesMut};
use tracing::{debug, trace};

use super::config::TransportConfig;
use super::error::{TransportError, TransportResult};
use super::poll;
use super::socket::StompSocket;
use crate::core::Version;
use crate::frame::{Frame, FrameCodec};

/// Sends and receives STOMP frames over one socket.
///
/// Bytes read from the socket accumulate in an internal buffer and are
/// drained one frame per [`receive`](Self::receive) call, so a single read
/// carrying several frames serves several calls without touching the socket.
#[derive(Debug)]
pub struct FrameTransport<S> {
    host: String,
    port: u16,
    socket: Option<S>,
    buffer: BytesMut,
    codec: FrameCodec,
    config: TransportConfig,
}

impl<S: StompSocket> FrameTransport<S> {
    /// Create a transport for `host:port` with default options.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self::with_config(host, port, TransportConfig::default())
    }

    /// Create a transport with the given configuration.
    pub fn with_config(host: impl Into<String>, port: u16, config: TransportConfig) -> Self {
        Self {
            host: host.into(),
            port,
            socket: None,
            buffer: BytesMut::with_capacity(config.recv_buffer_capacity),
            codec: FrameCodec::new(config.version),
            config,
        }
    }

    /// Broker host this transport was created for.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Broker port this transport was created for.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Active configuration.
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Protocol version used for header encoding.
    pub fn version(&self) -> Version {
        self.codec.version()
    }

    /// Switch protocol version, e.g. after the CONNECTED frame.
    pub fn set_version(&mut self, version: Version) {
        self.config.version = version;
        self.codec = FrameCodec::new(version);
    }

    /// Attach a connected socket, returning the previous one.
    ///
    /// Buffered bytes from an earlier stream are discarded.
    pub fn attach(&mut self, socket: S) -> Option<S> {
        debug!(host = %self.host, port = self.port, "socket attached");
        self.buffer.clear();
        self.socket.replace(socket)
    }

    /// Detach and return the socket, discarding buffered bytes.
    pub fn release(&mut self) -> Option<S> {
        self.buffer.clear();
        self.socket.take()
    }

    /// Whether a socket is attached.
    pub fn is_attached(&self) -> bool {
        self.socket.is_some()
    }

    /// Whether a socket is attached and reports itself connected.
    pub fn connected(&self) -> bool {
        self.socket.as_ref().is_some_and(|s| s.is_connected())
    }

    /// Bytes read from the socket but not yet returned as frames.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// Serialize `frame` and write it in full.
    ///
    /// Fails with [`TransportError::NotConnected`] without touching the
    /// socket if the transport is not connected. A write failure releases
    /// the socket.
    pub fn send(&mut self, frame: &Frame) -> TransportResult<()> {
        if !self.connected() {
            return Err(TransportError::NotConnected);
        }
        let data = self.codec.serialize(frame).map_err(TransportError::Encode)?;
        let socket = self.socket.as_mut().ok_or(TransportError::NotConnected)?;
        if let Err(e) = socket.send_all(&data) {
            self.release_after("write failed");
            return Err(e.into());
        }
        debug!(command = %frame.command(), bytes = data.len(), "sent frame");
        Ok(())
    }

    /// Return the next frame, reading from the socket only when the buffer
    /// holds no complete frame.
    pub fn receive(&mut self) -> TransportResult<Frame> {
        loop {
            if let Some(frame) = self.take_buffered_frame()? {
                debug!(command = %frame.command(), buffered = self.buffer.len(), "received frame");
                return Ok(frame);
            }
            self.ensure_connected()?;
            if !self.poll(self.config.receive_timeout)? {
                return Err(TransportError::Timeout);
            }
            self.read_chunk()?;
        }
    }

    /// Whether [`receive`](Self::receive) can make progress within `timeout`.
    ///
    /// Returns `true` at once if a complete frame is already buffered.
    pub fn can_read(&mut self, timeout: Option<Duration>) -> TransportResult<bool> {
        self.ensure_connected()?;
        if self.has_buffered_frame()? {
            return Ok(true);
        }
        self.poll(timeout)
    }

    fn take_buffered_frame(&mut self) -> TransportResult<Option<Frame>> {
        match self.codec.parse_one(&self.buffer) {
            Ok(Some((frame, consumed))) => {
                self.buffer.advance(consumed);
                Ok(Some(frame))
            }
            Ok(None) => {
                // Heartbeats carry nothing; drop them so an idle stream
                // does not pile them up.
                let heartbeats = self.codec.leading_heartbeats(&self.buffer);
                if heartbeats > 0 {
                    trace!(heartbeats, "discarded heartbeats");
                    self.buffer.advance(heartbeats);
                }
                Ok(None)
            }
            Err(e) => {
                self.release_after("malformed frame");
                Err(TransportError::Protocol(e))
            }
        }
    }

    fn has_buffered_frame(&mut self) -> TransportResult<bool> {
        match self.codec.parse_one(&self.buffer) {
            Ok(found) => Ok(found.is_some()),
            Err(e) => {
                self.release_after("malformed frame");
                Err(TransportError::Protocol(e))
            }
        }
    }

    fn ensure_connected(&mut self) -> TransportResult<()> {
        if self.connected() {
            return Ok(());
        }
        self.release_after("not connected");
        Err(TransportError::NotConnected)
    }

    fn poll(&mut self, timeout: Option<Duration>) -> TransportResult<bool> {
        let socket = self.socket.as_mut().ok_or(TransportError::NotConnected)?;
        match poll::wait_readable(socket, timeout) {
            Ok(readable) => Ok(readable),
            Err(e) => {
                self.release_after("readability poll failed");
                Err(e.into())
            }
        }
    }

    fn read_chunk(&mut self) -> TransportResult<()> {
        let socket = self.socket.as_mut().ok_or(TransportError::NotConnected)?;
        let start = self.buffer.len();
        self.buffer.resize(start + self.config.read_chunk_size.max(1), 0);
        let read = socket.read_available(&mut self.buffer[start..]);
        match read {
            Ok(0) => {
                self.release_after("peer closed connection");
                Err(TransportError::ConnectionClosed)
            }
            Ok(n) => {
                self.buffer.truncate(start + n);
                trace!(bytes = n, buffered = self.buffer.len(), "read from socket");
                Ok(())
            }
            Err(e) => {
                self.release_after("read failed");
                Err(e.into())
            }
        }
    }

    fn release_after(&mut self, reason: &str) {
        if self.socket.is_some() {
            debug!(host = %self.host, port = self.port, reason, "releasing socket");
        }
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;
    use crate::core::CONTENT_LENGTH_HEADER;
    use crate::frame::Command;
    use crate::transport::FrameTransportBuilder;
    use crate::transport::mock::MockSocket;

    const HOST: &str = "fakeHost";
    const PORT: u16 = 61613;

    fn encode(frame: &Frame) -> Vec<u8> {
        FrameCodec::default().serialize(frame).unwrap()
    }

    fn message(body: &[u8]) -> Frame {
        Frame::new(Command::Message)
            .with_header("x", "y")
            .with_body(body.to_vec())
    }

    fn transport_with(incoming: &[u8]) -> (FrameTransport<MockSocket>, MockSocket) {
        let socket = MockSocket::new(incoming);
        let mut transport = FrameTransport::new(HOST, PORT);
        transport.attach(socket.clone());
        (transport, socket)
    }

    fn assert_released(transport: &mut FrameTransport<MockSocket>, socket: &MockSocket) {
        let reads = socket.read_calls();
        let err = transport.receive().unwrap_err();
        assert!(err.is_connection_error());
        assert!(!transport.is_attached());
        assert_eq!(socket.read_calls(), reads);
    }

    #[test]
    fn test_send() {
        let frame = Frame::new(Command::Message);
        let (mut transport, socket) = transport_with(b"");

        transport.send(&frame).unwrap();
        assert_eq!(socket.writes(), vec![encode(&frame)]);
    }

    #[test]
    fn test_send_not_connected_raises() {
        let (mut transport, socket) = transport_with(b"");
        socket.set_connected(false);

        let err = transport.send(&Frame::new(Command::Message)).unwrap_err();
        assert!(matches!(err, TransportError::NotConnected));
        assert!(socket.writes().is_empty());
    }

    #[test]
    fn test_send_without_socket() {
        let mut transport: FrameTransport<MockSocket> = FrameTransport::new(HOST, PORT);
        let err = transport.send(&Frame::new(Command::Send)).unwrap_err();
        assert!(err.is_connection_error());
    }

    #[test]
    fn test_send_encode_error_keeps_socket() {
        let (mut transport, socket) = transport_with(b"");
        let bad = message(b"abc").with_header(CONTENT_LENGTH_HEADER, "7");

        let err = transport.send(&bad).unwrap_err();
        assert!(matches!(err, TransportError::Encode(_)));
        assert!(!err.is_fatal());
        assert!(transport.is_attached());
        assert!(socket.writes().is_empty());
    }

    #[test]
    fn test_send_write_failure_releases() {
        let (mut transport, socket) = transport_with(b"");
        socket.fail_writes(io::ErrorKind::BrokenPipe);

        let err = transport.send(&message(b"boo")).unwrap_err();
        assert!(matches!(err, TransportError::Io(ref e) if e.kind() == io::ErrorKind::BrokenPipe));
        assert!(!transport.is_attached());
    }

    #[test]
    fn test_receive() {
        let frame = message(b"testing 1 2 3");
        let (mut transport, socket) = transport_with(&encode(&frame));

        assert_eq!(transport.receive().unwrap(), frame);
        assert_eq!(socket.read_calls(), 1);

        let err = transport.receive().unwrap_err();
        assert!(matches!(err, TransportError::ConnectionClosed));
        assert!(!transport.is_attached());
        assert_released(&mut transport, &socket);
    }

    #[test]
    fn test_receive_not_connected_raises_and_removes_socket() {
        let (mut transport, socket) = transport_with(b"Hi");
        socket.set_connected(false);

        let err = transport.receive().unwrap_err();
        assert!(matches!(err, TransportError::NotConnected));
        assert!(!transport.is_attached());
        assert_eq!(socket.read_calls(), 0);
    }

    #[test]
    fn test_receive_multiple_frames_extra_newlines() {
        let frame = message(b"testing 1 2 3");
        let mut wire = b"\n\n".to_vec();
        wire.extend(encode(&frame));
        wire.push(b'\n');
        wire.extend(encode(&frame));
        wire.push(b'\n');
        let (mut transport, socket) = transport_with(&wire);

        assert_eq!(transport.receive().unwrap(), frame);
        assert_eq!(transport.receive().unwrap(), frame);
        assert_eq!(socket.read_calls(), 1);

        assert!(transport.receive().unwrap_err().is_connection_error());
        assert!(!transport.is_attached());
    }

    #[test]
    fn test_receive_binary() {
        let body = hex::decode("f0000a09").unwrap();
        let frame = Frame::new(Command::Message).with_binary_body(body);
        let (mut transport, socket) = transport_with(&encode(&frame));

        assert_eq!(transport.receive().unwrap(), frame);
        assert_eq!(socket.read_calls(), 1);

        assert!(transport.receive().unwrap_err().is_connection_error());
        assert!(!transport.is_attached());
    }

    #[test]
    fn test_receive_multiple_frames_per_read() {
        let mut wire = encode(&message(b"boo"));
        wire.extend(encode(&message(b"hoo")));
        let (mut transport, socket) = transport_with(&wire);

        let frame = transport.receive().unwrap();
        assert_eq!(frame.command(), Command::Message);
        assert_eq!(frame.header("x"), Some("y"));
        assert_eq!(frame.body(), b"boo");
        assert_eq!(socket.read_calls(), 1);

        let frame = transport.receive().unwrap();
        assert_eq!(frame.body(), b"hoo");
        assert_eq!(socket.read_calls(), 1);
        assert_eq!(transport.buffered_len(), 0);

        assert!(transport.receive().unwrap_err().is_connection_error());
        assert!(!transport.is_attached());
    }

    #[test]
    fn test_receive_reassembles_split_frame() {
        let frame = message(b"a body longer than one read");
        let wire = encode(&frame);
        let socket = MockSocket::new(&wire);
        let mut transport = FrameTransportBuilder::new().read_chunk_size(3).build(HOST, PORT);
        transport.attach(socket.clone());

        assert_eq!(transport.receive().unwrap(), frame);
        assert_eq!(socket.read_calls(), wire.len().div_ceil(3));
    }

    #[test]
    fn test_receive_protocol_error_releases() {
        let (mut transport, socket) = transport_with(b"BOGUS\n\n\0");

        let err = transport.receive().unwrap_err();
        assert!(matches!(err, TransportError::Protocol(_)));
        assert!(err.is_fatal());
        assert_released(&mut transport, &socket);
    }

    #[test]
    fn test_receive_read_error_releases() {
        let (mut transport, socket) = transport_with(b"");
        socket.fail_reads(io::ErrorKind::ConnectionReset);

        let err = transport.receive().unwrap_err();
        assert!(matches!(err, TransportError::Io(_)));
        assert_released(&mut transport, &socket);
    }

    #[test]
    fn test_receive_timeout_keeps_socket() {
        let socket = MockSocket::new(b"");
        socket.script_wait(Ok(false));
        let mut transport = FrameTransportBuilder::new()
            .receive_timeout(Some(Duration::from_millis(10)))
            .build(HOST, PORT);
        transport.attach(socket.clone());

        assert!(matches!(transport.receive(), Err(TransportError::Timeout)));
        assert!(transport.is_attached());
        assert_eq!(socket.read_calls(), 0);
    }

    #[test]
    fn test_heartbeats_are_discarded() {
        let socket = MockSocket::new(&[b'\n'; 5000]);
        for _ in 0..5 {
            socket.script_wait(Ok(true));
        }
        socket.script_wait(Ok(false));
        let mut transport = FrameTransportBuilder::new()
            .read_chunk_size(1000)
            .receive_timeout(Some(Duration::from_millis(10)))
            .build(HOST, PORT);
        transport.attach(socket.clone());

        assert!(matches!(transport.receive(), Err(TransportError::Timeout)));
        assert_eq!(socket.read_calls(), 5);
        assert_eq!(transport.buffered_len(), 0);
        assert!(transport.is_attached());
    }

    #[test]
    fn test_heartbeats_before_split_frame() {
        let frame = message(b"boo");
        let mut wire = b"\r\n\n".to_vec();
        wire.extend(encode(&frame));
        let socket = MockSocket::new(&wire);
        let mut transport = FrameTransportBuilder::new().read_chunk_size(4).build(HOST, PORT);
        transport.attach(socket.clone());

        assert_eq!(transport.receive().unwrap(), frame);
        assert_eq!(transport.buffered_len(), 0);
    }

    #[test]
    fn test_zero_read_chunk_size_still_reads() {
        let frame = message(b"boo");
        let socket = MockSocket::new(&encode(&frame));
        let config = TransportConfig {
            read_chunk_size: 0,
            ..TransportConfig::default()
        };
        let mut transport = FrameTransport::with_config(HOST, PORT, config);
        transport.attach(socket.clone());

        assert_eq!(transport.receive().unwrap(), frame);
        assert!(transport.is_attached());
        assert_eq!(socket.read_calls(), encode(&frame).len());
    }

    #[test]
    fn test_partial_frame_then_close() {
        let wire = encode(&message(b"boo"));
        let (mut transport, _socket) = transport_with(&wire[..wire.len() - 1]);

        assert!(matches!(transport.receive(), Err(TransportError::ConnectionClosed)));
        assert_eq!(transport.buffered_len(), 0);
    }

    #[test]
    fn test_can_read_buffered_frame_skips_poll() {
        let mut wire = encode(&message(b"boo"));
        wire.extend(encode(&message(b"hoo")));
        let (mut transport, socket) = transport_with(&wire);

        transport.receive().unwrap();
        let waits = socket.wait_calls();
        assert!(transport.can_read(Some(Duration::ZERO)).unwrap());
        assert_eq!(socket.wait_calls(), waits);
    }

    #[test]
    fn test_can_read_retries_interrupt_once() {
        let (mut transport, socket) = transport_with(b"test");
        socket.script_wait(Err(io::Error::from(io::ErrorKind::Interrupted)));

        assert!(transport.can_read(None).unwrap());
        assert_eq!(socket.wait_calls(), 2);
        assert!(transport.is_attached());
    }

    #[test]
    fn test_can_read_other_failure_propagates() {
        let (mut transport, socket) = transport_with(b"test");
        socket.script_wait(Err(io::Error::from(io::ErrorKind::InvalidInput)));

        let err = transport.can_read(None).unwrap_err();
        assert!(err.is_connection_error());
        assert_eq!(socket.wait_calls(), 1);
        assert!(!transport.is_attached());
    }

    #[test]
    fn test_can_read_not_connected() {
        let (mut transport, socket) = transport_with(b"test");
        socket.set_connected(false);

        assert!(matches!(
            transport.can_read(None),
            Err(TransportError::NotConnected)
        ));
        assert_eq!(socket.wait_calls(), 0);
        assert!(!transport.is_attached());
    }

    #[test]
    fn test_attach_and_release() {
        let (mut transport, _) = transport_with(b"MESSAGE\n");
        assert_eq!(transport.host(), HOST);
        assert_eq!(transport.port(), PORT);

        assert!(transport.can_read(Some(Duration::ZERO)).unwrap());
        transport.read_chunk().unwrap();
        assert!(transport.buffered_len() > 0);

        let replacement = MockSocket::new(b"");
        assert!(transport.attach(replacement).is_some());
        assert_eq!(transport.buffered_len(), 0);

        assert!(transport.release().is_some());
        assert!(!transport.connected());
        assert!(transport.release().is_none());
    }

    #[test]
    fn test_set_version() {
        let mut transport: FrameTransport<MockSocket> = FrameTransport::new(HOST, PORT);
        assert_eq!(transport.version(), Version::V1_2);
        transport.set_version(Version::V1_0);
        assert_eq!(transport.version(), Version::V1_0);
        assert_eq!(transport.config().version, Version::V1_0);
    }
}
