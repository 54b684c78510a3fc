//! Transport Layer
//!
//! Turns a raw bidirectional byte stream into discrete NETCONF messages.
//! Provides:
//! - Transport trait: framed send/receive plus the hello exchange
//! - StreamTransport: any reader/writer pair (pipes, sockets, test streams)
//! - SshTransport: the `netconf` subsystem of an `ssh` child process

pub mod framing;
pub mod ssh;
pub mod stream;

use std::io;

use netconf_proto::{CodecError, HelloMessage};

pub use framing::{FrameReader, Matched, Pattern, READ_CHUNK_SIZE};
pub use ssh::{SshConfig, SshTransport};
pub use stream::StreamTransport;

/// Framed message transport.
///
/// All operations block. Implementations must propagate every read and
/// write failure.
pub trait Transport: Send {
    /// Write one message followed by the end-of-message delimiter.
    fn send(&mut self, data: &[u8]) -> Result<(), TransportError>;

    /// Read until the next end-of-message delimiter and return the bytes
    /// preceding it.
    fn receive(&mut self) -> Result<Vec<u8>, TransportError>;

    /// Release the underlying stream. Later calls fail with
    /// [`TransportError::Closed`].
    fn close(&mut self) -> Result<(), TransportError>;

    /// Encode and send a hello message.
    fn send_hello(&mut self, hello: &HelloMessage) -> Result<(), TransportError> {
        let xml = hello.to_xml()?;
        self.send(xml.as_bytes())
    }

    /// Receive and decode a hello message.
    fn receive_hello(&mut self) -> Result<HelloMessage, TransportError> {
        let frame = self.receive()?;
        Ok(HelloMessage::from_xml(&frame)?)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&mut self, data: &[u8]) -> Result<(), TransportError> {
        (**self).send(data)
    }

    fn receive(&mut self) -> Result<Vec<u8>, TransportError> {
        (**self).receive()
    }

    fn close(&mut self) -> Result<(), TransportError> {
        (**self).close()
    }

    fn send_hello(&mut self, hello: &HelloMessage) -> Result<(), TransportError> {
        (**self).send_hello(hello)
    }

    fn receive_hello(&mut self) -> Result<HelloMessage, TransportError> {
        (**self).receive_hello()
    }
}

/// Transport errors
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Read failed: {0}")]
    Read(#[source] io::Error),

    #[error("Write failed: {0}")]
    Write(#[source] io::Error),

    #[error("End of stream after {buffered} buffered bytes without finding the expected delimiter")]
    NotFound { buffered: usize },

    #[error("Transport is closed")]
    Closed,

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("SSH error: {0}")]
    Ssh(String),
}
