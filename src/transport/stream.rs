//! Transport over an arbitrary reader/writer pair.

use std::io::{Read, Write};

use netconf_proto::MESSAGE_SEPARATOR;
use regex::bytes::Regex;
use tracing::debug;

use super::framing::{FrameReader, Matched, Pattern};
use super::{Transport, TransportError};

/// NETCONF 1.0 end-of-message framing over any byte stream.
///
/// The reader and writer are owned exclusively; nothing else may touch the
/// stream once it is wrapped. Both halves are dropped on close.
pub struct StreamTransport<R, W> {
    reader: Option<FrameReader<R>>,
    writer: Option<W>,
}

impl<R: Read, W: Write> StreamTransport<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader: Some(FrameReader::new(reader)),
            writer: Some(writer),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.writer.is_none()
    }

    /// Wait for an arbitrary pattern on the incoming stream.
    pub fn wait_for<P: Pattern + ?Sized>(&mut self, pattern: &P) -> Result<Matched, TransportError> {
        self.reader
            .as_mut()
            .ok_or(TransportError::Closed)?
            .wait_for(pattern)
    }

    /// Wait for an exact byte sequence and return what preceded it.
    pub fn wait_for_bytes(&mut self, pattern: &[u8]) -> Result<Vec<u8>, TransportError> {
        Ok(self.wait_for(pattern)?.preceding)
    }

    /// Wait for a string, such as a login prompt.
    pub fn wait_for_str(&mut self, pattern: &str) -> Result<String, TransportError> {
        let preceding = self.wait_for(pattern)?.preceding;
        Ok(String::from_utf8_lossy(&preceding).into_owned())
    }

    /// Wait for a regular expression; returns the input up to and including
    /// the match, plus the capture groups.
    pub fn wait_for_regex(&mut self, pattern: &Regex) -> Result<(Vec<u8>, Vec<Option<Vec<u8>>>), TransportError> {
        let Matched {
            mut preceding,
            matched,
            groups,
        } = self.wait_for(pattern)?;
        preceding.extend_from_slice(&matched);
        Ok((preceding, groups))
    }

    fn writer(&mut self) -> Result<&mut W, TransportError> {
        self.writer.as_mut().ok_or(TransportError::Closed)
    }
}

impl<R, W> Transport for StreamTransport<R, W>
where
    R: Read + Send,
    W: Write + Send,
{
    fn send(&mut self, data: &[u8]) -> Result<(), TransportError> {
        let writer = self.writer()?;
        writer.write_all(data).map_err(TransportError::Write)?;
        writer
            .write_all(MESSAGE_SEPARATOR)
            .map_err(TransportError::Write)?;
        writer.write_all(b"\n").map_err(TransportError::Write)?;
        writer.flush().map_err(TransportError::Write)?;
        debug!(bytes = data.len(), "sent frame");
        Ok(())
    }

    fn receive(&mut self) -> Result<Vec<u8>, TransportError> {
        let frame = self.wait_for(MESSAGE_SEPARATOR)?.preceding;
        debug!(bytes = frame.len(), "received frame");
        Ok(frame)
    }

    fn close(&mut self) -> Result<(), TransportError> {
        let mut writer = self.writer.take().ok_or(TransportError::Closed)?;
        self.reader = None;
        writer.flush().map_err(TransportError::Write)
    }
}
