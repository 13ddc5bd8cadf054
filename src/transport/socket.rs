//! Byte-stream endpoint consumed by the transport.
//!
//! Establishing the connection is the owner's job; the transport only needs
//! to ask whether the stream is connected, read what is available, write
//! everything, and wait for readability.

use std::io::{self, Read, Write};
use std::net::TcpStream;
use std::time::Duration;

/// A connected byte stream a [`FrameTransport`](super::FrameTransport) can drive.
pub trait StompSocket {
    /// Whether the stream is still connected to its peer.
    fn is_connected(&self) -> bool;

    /// Read at most `buf.len()` bytes. Returns 0 on orderly close.
    fn read_available(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Write all of `data`, retrying partial writes, or fail.
    fn send_all(&mut self, data: &[u8]) -> io::Result<()>;

    /// Block until the stream is readable or `timeout` elapses.
    ///
    /// `None` waits indefinitely. Returns `Ok(false)` on timeout. A wait cut
    /// short by a signal MUST be reported as [`io::ErrorKind::Interrupted`]
    /// and not retried here; the caller owns the retry policy.
    fn wait_readable(&mut self, timeout: Option<Duration>) -> io::Result<bool>;
}

impl StompSocket for TcpStream {
    fn is_connected(&self) -> bool {
        self.peer_addr().is_ok()
    }

    fn read_available(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Read::read(self, buf)
    }

    fn send_all(&mut self, data: &[u8]) -> io::Result<()> {
        Write::write_all(self, data)?;
        Write::flush(self)
    }

    /// Probes with a one-byte `peek` under a temporary read timeout.
    ///
    /// A zero timeout switches the stream to non-blocking for the probe,
    /// since std rejects a zero read timeout.
    fn wait_readable(&mut self, timeout: Option<Duration>) -> io::Result<bool> {
        let mut probe = [0u8; 1];
        let peeked = match timeout {
            Some(t) if t.is_zero() => {
                self.set_nonblocking(true)?;
                let peeked = self.peek(&mut probe);
                self.set_nonblocking(false)?;
                peeked
            }
            t => {
                let previous = self.read_timeout()?;
                self.set_read_timeout(t)?;
                let peeked = self.peek(&mut probe);
                self.set_read_timeout(previous)?;
                peeked
            }
        };
        match peeked {
            // Ok(0) is end of stream, which a read reports right away.
            Ok(_) => Ok(true),
            Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) => {
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }
}
