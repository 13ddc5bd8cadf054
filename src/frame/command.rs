//! STOMP frame commands.

use std::fmt;
use std::str::FromStr;

use super::error::FrameError;

/// Protocol verb on the first line of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    // Client frames
    /// Open a session.
    Connect,
    /// Open a session (1.1+ alias of CONNECT).
    Stomp,
    /// Send a message to a destination.
    Send,
    /// Register interest in a destination.
    Subscribe,
    /// Cancel a subscription.
    Unsubscribe,
    /// Acknowledge consumption of a message.
    Ack,
    /// Reject a message (1.1+).
    Nack,
    /// Start a transaction.
    Begin,
    /// Commit a transaction.
    Commit,
    /// Roll back a transaction.
    Abort,
    /// Close the session.
    Disconnect,

    // Server frames
    /// Session accepted.
    Connected,
    /// Message delivered to a subscription.
    Message,
    /// Receipt for a client frame.
    Receipt,
    /// Broker-side error.
    Error,
}

impl Command {
    /// All commands in wire order of the STOMP 1.2 document.
    pub const ALL: [Command; 15] = [
        Command::Connect,
        Command::Stomp,
        Command::Send,
        Command::Subscribe,
        Command::Unsubscribe,
        Command::Ack,
        Command::Nack,
        Command::Begin,
        Command::Commit,
        Command::Abort,
        Command::Disconnect,
        Command::Connected,
        Command::Message,
        Command::Receipt,
        Command::Error,
    ];

    /// Wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Command::Connect => "CONNECT",
            Command::Stomp => "STOMP",
            Command::Send => "SEND",
            Command::Subscribe => "SUBSCRIBE",
            Command::Unsubscribe => "UNSUBSCRIBE",
            Command::Ack => "ACK",
            Command::Nack => "NACK",
            Command::Begin => "BEGIN",
            Command::Commit => "COMMIT",
            Command::Abort => "ABORT",
            Command::Disconnect => "DISCONNECT",
            Command::Connected => "CONNECTED",
            Command::Message => "MESSAGE",
            Command::Receipt => "RECEIPT",
            Command::Error => "ERROR",
        }
    }

    /// Whether header escaping is suppressed for this command.
    ///
    /// CONNECT and CONNECTED frames are exchanged before a version has
    /// been negotiated, so their headers are always sent verbatim.
    pub fn is_handshake(self) -> bool {
        matches!(self, Command::Connect | Command::Stomp | Command::Connected)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Command {
    type Err = FrameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Command::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| FrameError::InvalidCommand(s.to_string()))
    }
}
