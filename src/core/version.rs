//! STOMP protocol versions.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Protocol version spoken on a transport.
///
/// The version only affects header encoding: 1.0 sends headers verbatim,
/// 1.1 introduces escaping, and 1.2 adds `\r` escaping plus CRLF line endings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Version {
    /// STOMP 1.0.
    V1_0,
    /// STOMP 1.1.
    V1_1,
    /// STOMP 1.2.
    #[default]
    V1_2,
}

impl Version {
    /// All versions, oldest first.
    pub const ALL: [Version; 3] = [Version::V1_0, Version::V1_1, Version::V1_2];

    /// Version string as used in `accept-version` and `version` headers.
    pub fn as_str(self) -> &'static str {
        match self {
            Version::V1_0 => "1.0",
            Version::V1_1 => "1.1",
            Version::V1_2 => "1.2",
        }
    }

    /// Whether header keys and values are escaped on the wire.
    pub fn escapes_headers(self) -> bool {
        self >= Version::V1_1
    }

    /// Whether `\r\n` is accepted as a line ending.
    pub fn allows_crlf(self) -> bool {
        self >= Version::V1_2
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized version string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported STOMP version: {0:?}")]
pub struct UnsupportedVersion(pub String);

impl FromStr for Version {
    type Err = UnsupportedVersion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1.0" => Ok(Version::V1_0),
            "1.1" => Ok(Version::V1_1),
            "1.2" => Ok(Version::V1_2),
            other => Err(UnsupportedVersion(other.to_string())),
        }
    }
}
