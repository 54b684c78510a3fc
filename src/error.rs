//! Client error taxonomy and exit code mapping.

use std::fmt;
use std::io;

use netconf_proto::{CodecError, RpcError, RpcReply};

use crate::config::ConfigError;
use crate::transport::TransportError;

/// Step of the hello exchange that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeStage {
    ReceiveHello,
    SendHello,
}

impl fmt::Display for HandshakeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReceiveHello => write!(f, "receiving the server hello"),
            Self::SendHello => write!(f, "sending the client hello"),
        }
    }
}

/// NETCONF client errors
#[derive(Debug, thiserror::Error)]
pub enum NetconfError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Handshake failed while {stage}: {source}")]
    Handshake {
        stage: HandshakeStage,
        #[source]
        source: TransportError,
    },

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// The device answered with a qualifying `<rpc-error>`. The full reply
    /// keeps any further errors.
    #[error("{error}")]
    Rpc { error: RpcError, reply: Box<RpcReply> },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Rendering or writing fetched data failed.
    #[error("Output error: {0}")]
    Output(#[source] io::Error),
}

/// Failure kind for exit code mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Unusable configuration (exit code 2)
    Config = 2,
    /// Stream or SSH failures (exit code 20)
    Transport = 20,
    /// Hello exchange failures (exit code 21)
    Handshake = 21,
    /// Malformed messages (exit code 30)
    Codec = 30,
    /// Device reported an error (exit code 40)
    Rpc = 40,
    /// Result could not be written out (exit code 50)
    Output = 50,
}

impl NetconfError {
    /// Map error to failure kind for exit code
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            NetconfError::Transport(_) => FailureKind::Transport,
            NetconfError::Handshake { .. } => FailureKind::Handshake,
            NetconfError::Codec(_) => FailureKind::Codec,
            NetconfError::Rpc { .. } => FailureKind::Rpc,
            NetconfError::Config(_) => FailureKind::Config,
            NetconfError::Output(_) => FailureKind::Output,
        }
    }

    /// Get exit code for this error
    pub fn exit_code(&self) -> i32 {
        self.failure_kind() as i32
    }

    /// The device error, for [`NetconfError::Rpc`].
    pub fn rpc_error(&self) -> Option<&RpcError> {
        match self {
            NetconfError::Rpc { error, .. } => Some(error),
            _ => None,
        }
    }

    /// The reply that carried the device error, for [`NetconfError::Rpc`].
    pub fn reply(&self) -> Option<&RpcReply> {
        match self {
            NetconfError::Rpc { reply, .. } => Some(reply),
            _ => None,
        }
    }
}
