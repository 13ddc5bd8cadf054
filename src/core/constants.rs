//! STOMP wire constants and transport defaults.
//!
//! Byte values and header names are fixed by the STOMP protocol and MUST NOT
//! be changed. The defaults at the bottom are tunable through
//! [`FrameTransportBuilder`](crate::transport::FrameTransportBuilder).

use std::time::Duration;

// =============================================================================
// FRAME DELIMITERS
// =============================================================================

/// Line feed, terminates the command line and every header line.
pub const LINE_FEED: u8 = b'\n';

/// Carriage return, allowed before [`LINE_FEED`] since STOMP 1.2.
pub const CARRIAGE_RETURN: u8 = b'\r';

/// NUL byte terminating every frame.
pub const FRAME_TERMINATOR: u8 = 0x00;

/// Separator between a header key and its value.
pub const HEADER_SEPARATOR: u8 = b':';

/// Escape character for header keys and values (STOMP 1.1+).
pub const ESCAPE_CHAR: char = '\\';

// =============================================================================
// HEADER NAMES
// =============================================================================

/// Octet count of the body; authoritative when present.
pub const CONTENT_LENGTH_HEADER: &str = "content-length";

/// MIME type of the body.
pub const CONTENT_TYPE_HEADER: &str = "content-type";

/// Destination of a SEND or SUBSCRIBE frame.
pub const DESTINATION_HEADER: &str = "destination";

/// Versions accepted by the client (CONNECT).
pub const ACCEPT_VERSION_HEADER: &str = "accept-version";

/// Version chosen by the broker (CONNECTED).
pub const VERSION_HEADER: &str = "version";

/// Virtual host name (CONNECT, required since 1.1).
pub const HOST_HEADER: &str = "host";

/// Heart-beat negotiation header.
pub const HEART_BEAT_HEADER: &str = "heart-beat";

/// Receipt request header.
pub const RECEIPT_HEADER: &str = "receipt";

/// Receipt confirmation header (RECEIPT).
pub const RECEIPT_ID_HEADER: &str = "receipt-id";

/// Short error description (ERROR).
pub const MESSAGE_HEADER: &str = "message";

// =============================================================================
// TRANSPORT DEFAULTS
// =============================================================================

/// Well-known STOMP port.
pub const DEFAULT_PORT: u16 = 61613;

/// Upper bound on bytes requested from the socket per read.
pub const DEFAULT_READ_CHUNK_SIZE: usize = 4096;

/// Initial capacity of the receive buffer.
pub const DEFAULT_RECV_BUFFER_CAPACITY: usize = 8 * 1024;

/// Readability wait applied by `receive` (`None` blocks indefinitely).
pub const DEFAULT_RECEIVE_TIMEOUT: Option<Duration> = None;

/// How many times an interrupted readability wait is retried.
pub const MAX_POLL_INTERRUPT_RETRIES: u32 = 1;
