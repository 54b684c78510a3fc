//! NETCONF Client
//!
//! A blocking client for the NETCONF 1.0 protocol: the hello handshake,
//! end-of-message framing over a byte stream, correlated RPC execution and
//! classification of device errors. The byte stream usually comes from the
//! `netconf` subsystem of an SSH connection.

pub mod client;
pub mod config;
pub mod error;
pub mod mock;
pub mod session;
pub mod transport;

pub use netconf_proto as proto;
pub use netconf_proto::{HelloMessage, RpcError, RpcMethod, RpcReply};

pub use client::Client;
pub use config::{ClientConfig, ConfigError};
pub use error::{FailureKind, HandshakeStage, NetconfError};
pub use session::{Session, SessionConfig};
pub use transport::{SshConfig, SshTransport, StreamTransport, Transport, TransportError};
