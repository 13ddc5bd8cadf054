//! # stomp-transport
//!
//! Synchronous STOMP frame transport over a byte-stream socket.
//!
//! The crate turns a TCP byte stream into discrete STOMP frames and back:
//!
//! - **Framing**: command line, escaped headers, NUL-terminated or
//!   `content-length`-delimited binary bodies
//! - **Buffering**: one socket read may carry several frames, a partial
//!   frame, or only heartbeats; each `receive` returns exactly one frame
//! - **Fail-fast state**: any fatal error releases the socket for good
//! - **Bounded EINTR retry**: an interrupted readability wait is retried
//!   once, never more
//!
//! Sessions (subscriptions, acks, transactions) and connection setup are
//! left to the caller.
//!
//! ## Modules
//!
//! - [`core`]: Protocol constants and versions
//! - [`frame`]: Frame model and codec
//! - [`transport`]: Socket seam, readability polling and the transport
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::net::TcpStream;
//!
//! use stomp_transport::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut transport = FrameTransport::new("localhost", DEFAULT_PORT);
//! transport.attach(TcpStream::connect(("localhost", DEFAULT_PORT))?);
//!
//! transport.send(
//!     &Frame::new(Command::Connect)
//!         .with_header(ACCEPT_VERSION_HEADER, "1.2")
//!         .with_header(HOST_HEADER, "localhost"),
//! )?;
//! let connected = transport.receive()?;
//! assert_eq!(connected.command(), Command::Connected);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod core;
pub mod frame;
pub mod transport;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::core::*;
    pub use crate::frame::{Command, Frame, FrameCodec, FrameError, Headers};
    pub use crate::transport::{
        FrameTransport, FrameTransportBuilder, StompSocket, TransportConfig, TransportError,
        TransportResult,
    };
}

// Re-export commonly used items at crate root
pub use crate::core::Version;
pub use frame::{Command, Frame, FrameCodec, FrameError, Headers};
pub use transport::{FrameTransport, FrameTransportBuilder, StompSocket, TransportError};
