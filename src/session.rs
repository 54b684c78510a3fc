//! NETCONF Session
//!
//! Performs the hello exchange over a [`Transport`] and runs one request at
//! a time against the device.

use netconf_proto::hello::capabilities;
use netconf_proto::{HelloMessage, RpcMessage, RpcMethod, RpcReply};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{HandshakeStage, NetconfError};
use crate::transport::Transport;

/// Session configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Capabilities advertised in the client hello
    pub capabilities: Vec<String>,
    /// Treat warning-severity `<rpc-error>`s as failures
    pub err_on_warnings: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            capabilities: vec![capabilities::BASE_1_0.to_string()],
            err_on_warnings: false,
        }
    }
}

/// An established NETCONF session.
///
/// Owns its transport for its whole life. Requests are strictly sequential;
/// replies are assumed to arrive in request order.
pub struct Session<T: Transport> {
    id: Option<u32>,
    server_capabilities: Vec<String>,
    transport: T,
    err_on_warnings: bool,
}

impl<T: Transport> Session<T> {
    /// Handshake with the default client capabilities.
    pub fn open(transport: T) -> Result<Self, NetconfError> {
        Self::open_with(transport, &SessionConfig::default())
    }

    /// Receive the server hello, then answer with our own.
    ///
    /// The transport is not closed on failure; it is dropped with the
    /// error.
    pub fn open_with(mut transport: T, config: &SessionConfig) -> Result<Self, NetconfError> {
        let server_hello = transport
            .receive_hello()
            .map_err(|source| NetconfError::Handshake {
                stage: HandshakeStage::ReceiveHello,
                source,
            })?;
        debug!(
            session_id = ?server_hello.session_id,
            capabilities = server_hello.capabilities.len(),
            "received server hello"
        );

        let id = server_hello.session_id;
        if id.is_none() {
            warn!("server hello carries no session-id");
        }
        if !server_hello.has_capability(capabilities::BASE_1_0) {
            warn!(session_id = ?id, "server does not advertise base:1.0");
        }

        let client_hello = HelloMessage::new(config.capabilities.iter().cloned());
        transport
            .send_hello(&client_hello)
            .map_err(|source| NetconfError::Handshake {
                stage: HandshakeStage::SendHello,
                source,
            })?;

        info!(session_id = ?id, "netconf session established");
        Ok(Self {
            id,
            server_capabilities: server_hello.capabilities,
            transport,
            err_on_warnings: config.err_on_warnings,
        })
    }

    /// Session id assigned by the server, if its hello carried one.
    pub fn id(&self) -> Option<u32> {
        self.id
    }

    pub fn server_capabilities(&self) -> &[String] {
        &self.server_capabilities
    }

    pub fn has_capability(&self, uri: &str) -> bool {
        self.server_capabilities.iter().any(|c| c == uri)
    }

    pub fn err_on_warnings(&self) -> bool {
        self.err_on_warnings
    }

    pub fn set_err_on_warnings(&mut self, enabled: bool) {
        self.err_on_warnings = enabled;
    }

    /// Send one `<rpc>` holding `methods` and wait for its reply.
    ///
    /// A reply carrying an `<rpc-error>` of severity `"error"` (or of any
    /// severity when warnings are failures) is returned as
    /// [`NetconfError::Rpc`], with the first such error and the whole reply.
    pub fn exec<I>(&mut self, methods: I) -> Result<RpcReply, NetconfError>
    where
        I: IntoIterator<Item = RpcMethod>,
    {
        let message = RpcMessage::new(methods)?;
        let request = message.to_xml()?;
        debug!(
            session_id = ?self.id,
            message_id = %message.message_id,
            methods = message.methods.len(),
            "sending rpc"
        );

        self.transport.send(&request)?;
        let frame = self.transport.receive()?;
        let reply = RpcReply::parse(&frame)?;

        if let Some(ref echoed) = reply.message_id {
            if *echoed != message.message_id {
                warn!(sent = %message.message_id, received = %echoed, "rpc-reply message-id mismatch");
            }
        }

        if let Some(error) = reply.first_failure(self.err_on_warnings).cloned() {
            return Err(NetconfError::Rpc {
                error,
                reply: Box::new(reply),
            });
        }

        for warning in reply.warnings() {
            warn!(tag = %warning.tag, message = %warning.message, "device reported warning");
        }
        Ok(reply)
    }

    /// Close the session and its transport.
    pub fn close(mut self) -> Result<(), NetconfError> {
        debug!(session_id = ?self.id, "closing session");
        self.transport.close()?;
        Ok(())
    }
}
