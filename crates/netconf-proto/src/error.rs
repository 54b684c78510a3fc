//! Error types for the NETCONF codec.

/// Errors raised while encoding or decoding NETCONF messages.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The XML layer rejected the document.
    #[error("XML error: {0}")]
    Xml(String),

    /// The frame is not valid UTF-8.
    #[error("Invalid UTF-8 in message: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// The document root is not the element we expected.
    #[error("Unexpected root element <{found}>, expected <{expected}>")]
    UnexpectedRoot { expected: &'static str, found: String },

    /// A required element is absent.
    #[error("Missing <{0}> element")]
    MissingElement(&'static str),

    /// The document ended before its root element was closed.
    #[error("Truncated message: <{0}> was never closed")]
    Truncated(&'static str),

    /// An `rpc` envelope needs at least one method body.
    #[error("RPC message has no methods")]
    EmptyRpc,

    /// A hello message could not be mapped to or from XML.
    #[error("Malformed hello: {0}")]
    Hello(String),
}

impl CodecError {
    pub(crate) fn xml(err: impl std::fmt::Display) -> Self {
        Self::Xml(err.to_string())
    }
}
