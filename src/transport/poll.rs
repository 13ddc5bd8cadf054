//! Readability polling with a bounded EINTR retry.
//!
//! A wait interrupted by a signal is retried once with whatever is left of
//! the timeout. A second interruption is returned to the caller like any
//! other failure.

use std::io;
use std::time::{Duration, Instant};

use tracing::warn;

use super::socket::StompSocket;
use crate::core::MAX_POLL_INTERRUPT_RETRIES;

/// Wait until `socket` is readable or `timeout` elapses.
pub fn wait_readable<S: StompSocket + ?Sized>(
    socket: &mut S,
    timeout: Option<Duration>,
) -> io::Result<bool> {
    let started = Instant::now();
    let mut remaining = timeout;
    let mut retries = 0;
    loop {
        match socket.wait_readable(remaining) {
            Err(e)
                if e.kind() == io::ErrorKind::Interrupted
                    && retries < MAX_POLL_INTERRUPT_RETRIES =>
            {
                retries += 1;
                remaining = timeout.map(|t| t.saturating_sub(started.elapsed()));
                warn!(?remaining, "readability wait interrupted, retrying");
            }
            result => return result,
        }
    }
}
