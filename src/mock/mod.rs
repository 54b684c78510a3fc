//! In-process stand-ins for a device's byte stream.
//!
//! A [`ScriptedReader`] replays what a device would send, one chunk per
//! read, and a [`CapturedWriter`] records what the client wrote. Together
//! they make a loopback [`MockTransport`].

use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::sync::{Arc, Mutex};

use netconf_proto::MESSAGE_SEPARATOR;

use crate::transport::StreamTransport;

/// Transport over scripted device output.
pub type MockTransport = StreamTransport<ScriptedReader, CapturedWriter>;

/// Build a mock transport and a handle to everything it writes.
pub fn mock_transport(reader: ScriptedReader) -> (MockTransport, CapturedWriter) {
    let writer = CapturedWriter::default();
    (StreamTransport::new(reader, writer.clone()), writer)
}

/// Append the end-of-message delimiter and newline a device sends.
pub fn frame(payload: &str) -> Vec<u8> {
    let mut framed = payload.as_bytes().to_vec();
    framed.extend_from_slice(MESSAGE_SEPARATOR);
    framed.push(b'\n');
    framed
}

/// Reader that yields pre-recorded chunks, one per `read` call.
#[derive(Debug, Default)]
pub struct ScriptedReader {
    chunks: VecDeque<Vec<u8>>,
    error: Option<io::ErrorKind>,
    interrupt: bool,
}

impl ScriptedReader {
    pub fn new<I, B>(chunks: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: AsRef<[u8]>,
    {
        Self {
            chunks: chunks
                .into_iter()
                .map(|c| c.as_ref().to_vec())
                .filter(|c| !c.is_empty())
                .collect(),
            error: None,
            interrupt: false,
        }
    }

    /// Split `data` into reads of at most `size` bytes.
    pub fn chunked(data: &[u8], size: usize) -> Self {
        Self::new(data.chunks(size.max(1)))
    }

    /// Fail with `kind` once the script is exhausted instead of reporting
    /// end of stream.
    pub fn fail_with(mut self, kind: io::ErrorKind) -> Self {
        self.error = Some(kind);
        self
    }

    /// Report `Interrupted` on the first read.
    pub fn interrupt_first(mut self) -> Self {
        self.interrupt = true;
        self
    }
}

impl Read for ScriptedReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.interrupt {
            self.interrupt = false;
            return Err(io::Error::new(io::ErrorKind::Interrupted, "scripted interrupt"));
        }

        let Some(mut chunk) = self.chunks.pop_front() else {
            return match self.error {
                Some(kind) => Err(io::Error::new(kind, "scripted failure")),
                None => Ok(0),
            };
        };

        let n = chunk.len().min(buf.len());
        buf[..n].copy_from_slice(&chunk[..n]);
        if n < chunk.len() {
            self.chunks.push_front(chunk.split_off(n));
        }
        Ok(n)
    }
}

/// Writer whose output stays readable through its clones.
#[derive(Debug, Clone, Default)]
pub struct CapturedWriter(Arc<Mutex<Vec<u8>>>);

impl CapturedWriter {
    /// Everything written so far.
    pub fn contents(&self) -> Vec<u8> {
        self.0.lock().map(|buf| buf.clone()).unwrap_or_default()
    }

    pub fn contents_string(&self) -> String {
        String::from_utf8_lossy(&self.contents()).into_owned()
    }

    /// Return and clear the captured bytes.
    pub fn take(&self) -> Vec<u8> {
        self.0
            .lock()
            .map(|mut buf| std::mem::take(&mut *buf))
            .unwrap_or_default()
    }
}

impl Write for CapturedWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        let mut buf = self
            .0
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "capture buffer poisoned"))?;
        buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Writer that rejects every write, like a pipe whose peer went away.
#[derive(Debug, Clone, Copy)]
pub struct FailingWriter(io::ErrorKind);

impl FailingWriter {
    pub fn new(kind: io::ErrorKind) -> Self {
        Self(kind)
    }
}

impl Write for FailingWriter {
    fn write(&mut self, _data: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(self.0, "scripted write failure"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Err(io::Error::new(self.0, "scripted flush failure"))
    }
}
