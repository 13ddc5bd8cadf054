//! Frame transport over a byte-stream socket.
//!
//! This module provides:
//!
//! - **Socket seam**: [`StompSocket`], implemented for [`std::net::TcpStream`]
//! - **Readability polling**: [`wait_readable`] with a single EINTR retry
//! - **Transport state machine**: [`FrameTransport`] with `send`, `receive`
//!   and `can_read`
//! - **Configuration**: [`TransportConfig`] and [`FrameTransportBuilder`]
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │       Session (CONNECT, SUBSCRIBE...)   │
//! ├─────────────────────────────────────────┤
//! │         FrameTransport                  │  ← This module
//! │   buffer, poll, send/receive, release   │
//! ├─────────────────────────────────────────┤
//! │         FrameCodec                      │
//! ├─────────────────────────────────────────┤
//! │         StompSocket (TCP)               │
//! └─────────────────────────────────────────┘
//! ```

mod config;
mod connection;
mod error;
#[cfg(test)]
mod mock;
mod poll;
mod socket;

pub use config::{FrameTransportBuilder, TransportConfig};
pub use connection::FrameTransport;
pub use error::*;
pub use poll::wait_readable;
pub use socket::StompSocket;
