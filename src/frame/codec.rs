//! Frame serialization and incremental parsing.

use std::borrow::Cow;

use super::command::Command;
use super::error::FrameError;
use super::headers::Headers;
use super::{Frame, parse_content_length};
use crate::core::{
    CARRIAGE_RETURN, CONTENT_LENGTH_HEADER, ESCAPE_CHAR, FRAME_TERMINATOR, HEADER_SEPARATOR,
    LINE_FEED, Version,
};

/// Converts frames to and from wire bytes for one protocol version.
///
/// The codec is stateless apart from the version: [`FrameCodec::parse_one`]
/// never consumes its input, it reports how many bytes the parsed frame
/// occupied and leaves discarding them to the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameCodec {
    version: Version,
}

impl FrameCodec {
    /// Create a codec for the given version.
    pub fn new(version: Version) -> Self {
        Self { version }
    }

    /// Version this codec speaks.
    pub fn version(&self) -> Version {
        self.version
    }

    /// Serialize a frame to wire bytes.
    ///
    /// If the body contains a NUL byte and the frame declares no
    /// `content-length`, one is appended after the frame's own headers so the
    /// body cannot be mistaken for the terminator. Bodies without NUL are
    /// written as they are.
    pub fn serialize(&self, frame: &Frame) -> Result<Vec<u8>, FrameError> {
        let body = frame.body();
        let declared = frame.content_length()?;
        if let Some(declared) = declared
            && declared != body.len()
        {
            return Err(FrameError::ContentLengthMismatch {
                declared,
                actual: body.len(),
            });
        }

        let command = frame.command();
        let escape = self.escapes(command);

        let mut out = Vec::with_capacity(64 + body.len());
        out.extend_from_slice(command.as_str().as_bytes());
        out.push(LINE_FEED);
        for (key, value) in frame.headers().iter() {
            self.write_header(&mut out, key, value, escape)?;
        }
        if declared.is_none() && body.contains(&FRAME_TERMINATOR) {
            self.write_header(&mut out, CONTENT_LENGTH_HEADER, &body.len().to_string(), false)?;
        }
        out.push(LINE_FEED);
        out.extend_from_slice(body);
        out.push(FRAME_TERMINATOR);
        Ok(out)
    }

    /// Parse the first complete frame in `buf`.
    ///
    /// Leading end-of-line bytes (heartbeats) are skipped. Returns
    /// `Ok(Some((frame, consumed)))` where `consumed` counts the skipped
    /// heartbeats and the frame up to and including its terminator, or
    /// `Ok(None)` if `buf` does not yet hold a complete frame.
    pub fn parse_one(&self, buf: &[u8]) -> Result<Option<(Frame, usize)>, FrameError> {
        let pos = self.skip_eols(buf, 0);

        let Some((line, mut pos)) = self.next_line(buf, pos) else {
            return Ok(None);
        };
        let command: Command = utf8(line)?.parse()?;
        let escape = self.escapes(command);

        let mut headers = Headers::new();
        let body_start = loop {
            let Some((line, next)) = self.next_line(buf, pos) else {
                return Ok(None);
            };
            pos = next;
            if line.is_empty() {
                break pos;
            }
            let line = utf8(line)?;
            let (key, value) = line
                .split_once(HEADER_SEPARATOR as char)
                .ok_or_else(|| FrameError::MalformedHeader(line.to_string()))?;
            // Repeated keys: the first occurrence wins.
            if escape {
                headers.insert_if_absent(self.unescape(key)?, self.unescape(value)?);
            } else {
                headers.insert_if_absent(key, value);
            }
        };

        let (body_end, consumed) = match headers.get(CONTENT_LENGTH_HEADER) {
            Some(value) => {
                let len = parse_content_length(value)?;
                let end = body_start
                    .checked_add(len)
                    .ok_or_else(|| FrameError::InvalidContentLength(value.to_string()))?;
                let Some(&found) = buf.get(end) else {
                    return Ok(None);
                };
                if found != FRAME_TERMINATOR {
                    return Err(FrameError::MissingTerminator {
                        content_length: len,
                        found,
                    });
                }
                (end, end + 1)
            }
            None => match buf[body_start..].iter().position(|&b| b == FRAME_TERMINATOR) {
                Some(offset) => (body_start + offset, body_start + offset + 1),
                None => return Ok(None),
            },
        };

        let frame = Frame::from_parts(command, headers, &buf[body_start..body_end]);
        Ok(Some((frame, consumed)))
    }

    /// Number of heartbeat EOL bytes at the start of `buf`.
    ///
    /// A trailing `\r` without its `\n` is not counted.
    pub fn leading_heartbeats(&self, buf: &[u8]) -> usize {
        self.skip_eols(buf, 0)
    }

    fn escapes(&self, command: Command) -> bool {
        self.version.escapes_headers() && !command.is_handshake()
    }

    fn skip_eols(&self, buf: &[u8], mut pos: usize) -> usize {
        loop {
            match buf.get(pos..) {
                Some([LINE_FEED, ..]) => pos += 1,
                Some([CARRIAGE_RETURN, LINE_FEED, ..]) if self.version.allows_crlf() => pos += 2,
                _ => return pos,
            }
        }
    }

    /// Next `\n`-terminated line starting at `pos`, without its line ending.
    fn next_line<'a>(&self, buf: &'a [u8], pos: usize) -> Option<(&'a [u8], usize)> {
        let len = buf.get(pos..)?.iter().position(|&b| b == LINE_FEED)?;
        let mut line = &buf[pos..pos + len];
        if self.version.allows_crlf()
            && let Some((&CARRIAGE_RETURN, rest)) = line.split_last()
        {
            line = rest;
        }
        Some((line, pos + len + 1))
    }

    fn write_header(
        &self,
        out: &mut Vec<u8>,
        key: &str,
        value: &str,
        escape: bool,
    ) -> Result<(), FrameError> {
        if escape {
            out.extend_from_slice(self.escape(key).as_bytes());
            out.push(HEADER_SEPARATOR);
            out.extend_from_slice(self.escape(value).as_bytes());
        } else {
            if key.contains(HEADER_SEPARATOR as char)
                || key.contains(LINE_FEED as char)
                || value.contains(LINE_FEED as char)
            {
                return Err(FrameError::UnencodableHeader(key.to_string()));
            }
            out.extend_from_slice(key.as_bytes());
            out.push(HEADER_SEPARATOR);
            out.extend_from_slice(value.as_bytes());
        }
        out.push(LINE_FEED);
        Ok(())
    }

    fn escape<'a>(&self, s: &'a str) -> Cow<'a, str> {
        let crlf = self.version.allows_crlf();
        let needs = |c: char| matches!(c, '\\' | '\n' | ':') || (crlf && c == '\r');
        if !s.contains(needs) {
            return Cow::Borrowed(s);
        }
        let mut out = String::with_capacity(s.len() + 4);
        for c in s.chars() {
            match c {
                '\\' => out.push_str("\\\\"),
                '\n' => out.push_str("\\n"),
                ':' => out.push_str("\\c"),
                '\r' if crlf => out.push_str("\\r"),
                c => out.push(c),
            }
        }
        Cow::Owned(out)
    }

    fn unescape(&self, s: &str) -> Result<String, FrameError> {
        let mut out = String::with_capacity(s.len());
        let mut chars = s.chars();
        while let Some(c) = chars.next() {
            if c != ESCAPE_CHAR {
                out.push(c);
                continue;
            }
            match chars.next() {
                Some('\\') => out.push('\\'),
                Some('n') => out.push('\n'),
                Some('c') => out.push(':'),
                Some('r') if self.version.allows_crlf() => out.push('\r'),
                Some(other) => return Err(FrameError::InvalidEscape(other)),
                None => return Err(FrameError::InvalidEscape(ESCAPE_CHAR)),
            }
        }
        Ok(out)
    }
}

fn utf8(bytes: &[u8]) -> Result<&str, FrameError> {
    std::str::from_utf8(bytes).map_err(|_| FrameError::InvalidUtf8)
}
