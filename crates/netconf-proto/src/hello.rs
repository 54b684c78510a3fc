//! Hello handshake message.
//!
//! Both peers send exactly one `<hello>` when a session starts. The server's
//! hello also carries the session identifier it assigned.

use serde::{Deserialize, Serialize};

use crate::error::CodecError;

/// Well-known capability URNs.
pub mod capabilities {
    pub const BASE_1_0: &str = "urn:ietf:params:xml:ns:netconf:base:1.0";
    pub const BASE_1_1: &str = "urn:ietf:params:xml:ns:netconf:base:1.1";
    pub const WRITABLE_RUNNING: &str = "urn:ietf:params:xml:ns:netconf:capability:writable-running:1.0";
    pub const CANDIDATE: &str = "urn:ietf:params:xml:ns:netconf:capability:candidate:1.0";
    pub const CONFIRMED_COMMIT: &str = "urn:ietf:params:xml:ns:netconf:capability:confirmed-commit:1.0";
    pub const ROLLBACK_ON_ERROR: &str = "urn:ietf:params:xml:ns:netconf:capability:rollback-on-error:1.0";
    pub const VALIDATE: &str = "urn:ietf:params:xml:ns:netconf:capability:validate:1.0";
    pub const STARTUP: &str = "urn:ietf:params:xml:ns:netconf:capability:startup:1.0";
}

/// A `<hello>` message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HelloMessage {
    /// Advertised capability URNs, in document order.
    pub capabilities: Vec<String>,
    /// Session identifier; only the server sends one.
    pub session_id: Option<u32>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename = "hello")]
struct HelloDocument {
    capabilities: CapabilityList,
    #[serde(
        rename = "session-id",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    session_id: Option<u32>,
}

#[derive(Serialize, Deserialize)]
struct CapabilityList {
    #[serde(default)]
    capability: Vec<String>,
}

impl HelloMessage {
    /// Hello advertising the given capabilities, without a session id.
    pub fn new<I, S>(capabilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            capabilities: capabilities.into_iter().map(Into::into).collect(),
            session_id: None,
        }
    }

    /// Check whether a capability URN was advertised.
    pub fn has_capability(&self, uri: &str) -> bool {
        self.capabilities.iter().any(|c| c == uri)
    }

    /// Render the hello as XML.
    pub fn to_xml(&self) -> Result<String, CodecError> {
        let document = HelloDocument {
            capabilities: CapabilityList {
                capability: self.capabilities.clone(),
            },
            session_id: self.session_id,
        };
        quick_xml::se::to_string(&document).map_err(|e| CodecError::Hello(e.to_string()))
    }

    /// Parse a received hello frame.
    ///
    /// Unknown elements, attributes, comments and the XML declaration are
    /// ignored. Capability text is trimmed.
    pub fn from_xml(raw: &[u8]) -> Result<Self, CodecError> {
        let text = std::str::from_utf8(raw)?;
        let document: HelloDocument =
            quick_xml::de::from_str(text).map_err(|e| CodecError::Hello(e.to_string()))?;

        Ok(Self {
            capabilities: document
                .capabilities
                .capability
                .into_iter()
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect(),
            session_id: document.session_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEVICE_HELLO: &str = r#"<!-- user admin, class super-user -->
<hello xmlns="urn:ietf:params:xml:ns:netconf:base:1.0">
  <capabilities>
    <capability>urn:ietf:params:xml:ns:netconf:base:1.0</capability>
    <capability>urn:ietf:params:xml:ns:netconf:capability:candidate:1.0</capability>
    <capability>http://xml.juniper.net/netconf/junos/1.0</capability>
  </capabilities>
  <session-id>4711</session-id>
</hello>
"#;

    #[test]
    fn test_parse_device_hello() {
        let hello = HelloMessage::from_xml(DEVICE_HELLO.as_bytes()).unwrap();
        assert_eq!(hello.session_id, Some(4711));
        assert_eq!(hello.capabilities.len(), 3);
        assert_eq!(hello.capabilities[0], capabilities::BASE_1_0);
        assert!(hello.has_capability(capabilities::CANDIDATE));
        assert!(!hello.has_capability(capabilities::STARTUP));
    }

    #[test]
    fn test_client_hello_has_no_session_id() {
        let xml = HelloMessage::new([capabilities::BASE_1_0]).to_xml().unwrap();
        assert!(xml.starts_with("<hello>"));
        assert!(xml.contains(
            "<capabilities><capability>urn:ietf:params:xml:ns:netconf:base:1.0</capability></capabilities>"
        ));
        assert!(!xml.contains("session-id"));
    }

    #[test]
    fn test_round_trip_with_session_id() {
        let hello = HelloMessage {
            capabilities: vec![
                capabilities::BASE_1_0.to_string(),
                capabilities::VALIDATE.to_string(),
            ],
            session_id: Some(19313),
        };
        let xml = hello.to_xml().unwrap();
        assert_eq!(HelloMessage::from_xml(xml.as_bytes()).unwrap(), hello);
    }

    #[test]
    fn test_unknown_elements_between_capabilities() {
        let raw = b"<hello><capabilities>\
            <capability>a</capability><!-- x --><foo/>\
            <capability>b</capability><bar>text</bar>\
            </capabilities><session-id>1</session-id><extra/></hello>";
        let hello = HelloMessage::from_xml(raw).unwrap();
        assert_eq!(hello.capabilities, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(hello.session_id, Some(1));
    }

    #[test]
    fn test_missing_capabilities_is_malformed() {
        let err = HelloMessage::from_xml(b"<hello><session-id>1</session-id></hello>").unwrap_err();
        assert!(matches!(err, CodecError::Hello(_)));
    }

    #[test]
    fn test_invalid_utf8_rejected() {
        let err = HelloMessage::from_xml(&[0x3c, 0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, CodecError::Utf8(_)));
    }
}
