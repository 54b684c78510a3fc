//! NETCONF Client
//!
//! Binds a [`Session`] to a transport and exposes named operations.

use netconf_proto::{ops, RpcMethod, RpcReply};
use tracing::info;

use crate::error::NetconfError;
use crate::session::{Session, SessionConfig};
use crate::transport::{SshConfig, SshTransport, Transport};

/// High-level NETCONF client.
pub struct Client<T: Transport = SshTransport> {
    session: Session<T>,
}

impl Client<SshTransport> {
    /// Open the NETCONF subsystem on `ssh` and run the handshake.
    pub fn connect(ssh: &SshConfig, session: &SessionConfig) -> Result<Self, NetconfError> {
        info!(host = %ssh.host, port = ssh.port, "connecting");
        let transport = SshTransport::connect(ssh)?;
        Self::from_transport(transport, session)
    }
}

impl<T: Transport> Client<T> {
    /// Run the handshake over an already established byte stream.
    pub fn from_transport(transport: T, config: &SessionConfig) -> Result<Self, NetconfError> {
        let session = Session::open_with(transport, config)?;
        Ok(Self { session })
    }

    /// Fetch the whole `datastore` and return the reply payload.
    pub fn get_config(&mut self, datastore: &str) -> Result<Vec<u8>, NetconfError> {
        let reply = self.session.exec([ops::get_config(datastore)])?;
        Ok(reply.data.into_bytes())
    }

    pub fn lock(&mut self, target: &str) -> Result<RpcReply, NetconfError> {
        self.session.exec([ops::lock(target)])
    }

    pub fn unlock(&mut self, target: &str) -> Result<RpcReply, NetconfError> {
        self.session.exec([ops::unlock(target)])
    }

    /// Send arbitrary operation bodies in one `<rpc>`.
    pub fn exec<I>(&mut self, methods: I) -> Result<RpcReply, NetconfError>
    where
        I: IntoIterator<Item = RpcMethod>,
    {
        self.session.exec(methods)
    }

    pub fn session(&self) -> &Session<T> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session<T> {
        &mut self.session
    }

    /// Close the session and its transport.
    pub fn close(self) -> Result<(), NetconfError> {
        self.session.close()
    }
}
