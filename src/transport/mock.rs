//! Scripted in-memory socket for transport tests.
//!
//! Clones share state, so a test can keep a handle and inspect call counts
//! after the transport has taken (or dropped) its own copy.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;
use std::time::Duration;

use super::socket::StompSocket;

#[derive(Debug, Default)]
struct MockState {
    connected: bool,
    incoming: VecDeque<u8>,
    reads: usize,
    writes: Vec<Vec<u8>>,
    waits: Vec<Option<Duration>>,
    wait_script: VecDeque<io::Result<bool>>,
    read_error: Option<io::ErrorKind>,
    write_error: Option<io::ErrorKind>,
}

#[derive(Debug, Clone)]
pub(crate) struct MockSocket {
    state: Rc<RefCell<MockState>>,
}

impl MockSocket {
    /// Connected socket that will yield `incoming`, then end of stream.
    pub(crate) fn new(incoming: &[u8]) -> Self {
        let state = MockState {
            connected: true,
            incoming: incoming.iter().copied().collect(),
            ..MockState::default()
        };
        Self {
            state: Rc::new(RefCell::new(state)),
        }
    }

    pub(crate) fn set_connected(&self, connected: bool) {
        self.state.borrow_mut().connected = connected;
    }

    /// Queue the result of the next `wait_readable` call. Unscripted waits
    /// report readable.
    pub(crate) fn script_wait(&self, result: io::Result<bool>) {
        self.state.borrow_mut().wait_script.push_back(result);
    }

    pub(crate) fn fail_reads(&self, kind: io::ErrorKind) {
        self.state.borrow_mut().read_error = Some(kind);
    }

    pub(crate) fn fail_writes(&self, kind: io::ErrorKind) {
        self.state.borrow_mut().write_error = Some(kind);
    }

    pub(crate) fn read_calls(&self) -> usize {
        self.state.borrow().reads
    }

    pub(crate) fn writes(&self) -> Vec<Vec<u8>> {
        self.state.borrow().writes.clone()
    }

    pub(crate) fn wait_calls(&self) -> usize {
        self.state.borrow().waits.len()
    }

    pub(crate) fn wait_timeouts(&self) -> Vec<Option<Duration>> {
        self.state.borrow().waits.clone()
    }
}

impl StompSocket for MockSocket {
    fn is_connected(&self) -> bool {
        self.state.borrow().connected
    }

    fn read_available(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut state = self.state.borrow_mut();
        state.reads += 1;
        if let Some(kind) = state.read_error {
            return Err(io::Error::from(kind));
        }
        let n = buf.len().min(state.incoming.len());
        for (slot, byte) in buf.iter_mut().zip(state.incoming.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }

    fn send_all(&mut self, data: &[u8]) -> io::Result<()> {
        let mut state = self.state.borrow_mut();
        if let Some(kind) = state.write_error {
            return Err(io::Error::from(kind));
        }
        state.writes.push(data.to_vec());
        Ok(())
    }

    fn wait_readable(&mut self, timeout: Option<Duration>) -> io::Result<bool> {
        let mut state = self.state.borrow_mut();
        state.waits.push(timeout);
        state.wait_script.pop_front().unwrap_or(Ok(true))
    }
}
