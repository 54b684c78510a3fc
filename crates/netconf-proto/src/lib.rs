//! NETCONF Protocol Types
//!
//! Defines the XML envelopes exchanged between a NETCONF client and a
//! device: the hello handshake, outgoing `rpc` requests and incoming
//! `rpc-reply` messages. This crate performs no I/O.

pub mod error;
pub mod hello;
pub mod message_id;
pub mod ops;
pub mod reply;
pub mod request;

pub use error::CodecError;
pub use hello::HelloMessage;
pub use message_id::new_message_id;
pub use reply::{RpcError, RpcReply};
pub use request::{RpcMessage, RpcMethod};

/// NETCONF base namespace.
pub const BASE_NAMESPACE: &str = "urn:ietf:params:xml:ns:netconf:base:1.0";

/// End-of-message delimiter used by NETCONF 1.0 framing.
pub const MESSAGE_SEPARATOR: &[u8] = b"]]>]]>";
