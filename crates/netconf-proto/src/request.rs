//! RPC request envelope.

use std::fmt;

use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::Writer;

use crate::error::CodecError;
use crate::message_id::new_message_id;

/// A single pre-rendered operation fragment placed inside `<rpc>`.
///
/// Bodies are copied verbatim; well-formedness is the caller's concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcMethod(String);

impl RpcMethod {
    /// Wrap an arbitrary XML fragment.
    pub fn raw(body: impl Into<String>) -> Self {
        Self(body.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for RpcMethod {
    fn from(body: String) -> Self {
        Self(body)
    }
}

impl From<&str> for RpcMethod {
    fn from(body: &str) -> Self {
        Self(body.to_string())
    }
}

impl fmt::Display for RpcMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outgoing `<rpc>` envelope.
#[derive(Debug, Clone)]
pub struct RpcMessage {
    /// Correlation id carried in the `message-id` attribute.
    pub message_id: String,
    /// Operation bodies, in order.
    pub methods: Vec<RpcMethod>,
}

impl RpcMessage {
    /// Build an envelope with a fresh message id.
    ///
    /// Fails if `methods` is empty.
    pub fn new<I>(methods: I) -> Result<Self, CodecError>
    where
        I: IntoIterator<Item = RpcMethod>,
    {
        let methods: Vec<RpcMethod> = methods.into_iter().collect();
        if methods.is_empty() {
            return Err(CodecError::EmptyRpc);
        }
        Ok(Self {
            message_id: new_message_id(),
            methods,
        })
    }

    /// Render `<rpc message-id="...">bodies</rpc>`.
    pub fn to_xml(&self) -> Result<Vec<u8>, CodecError> {
        let mut writer = Writer::new(Vec::new());

        let mut start = BytesStart::new("rpc");
        start.push_attribute(("message-id", self.message_id.as_str()));
        writer
            .write_event(Event::Start(start))
            .map_err(CodecError::xml)?;

        for method in &self.methods {
            writer.get_mut().extend_from_slice(method.as_str().as_bytes());
        }

        writer
            .write_event(Event::End(BytesEnd::new("rpc")))
            .map_err(CodecError::xml)?;

        Ok(writer.into_inner())
    }
}
