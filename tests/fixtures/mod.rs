//! Device transcripts shared by the integration tests.

#![allow(dead_code)]

use netconf_client::mock::{frame, mock_transport, CapturedWriter, MockTransport, ScriptedReader};

/// Hello sent by a Junos SRX, including the login banner comment.
pub const DEVICE_HELLO: &str = r#"<!-- user bbennett, class j-super-user -->
<hello>
  <capabilities>
    <capability>urn:ietf:params:xml:ns:netconf:base:1.0</capability>
    <capability>urn:ietf:params:xml:ns:netconf:capability:candidate:1.0</capability>
    <capability>urn:ietf:params:xml:ns:netconf:capability:confirmed-commit:1.0</capability>
    <capability>urn:ietf:params:xml:ns:netconf:capability:validate:1.0</capability>
    <capability>urn:ietf:params:xml:ns:netconf:capability:url:1.0?protocol=http,ftp,file</capability>
    <capability>http://xml.juniper.net/netconf/junos/1.0</capability>
    <capability>http://xml.juniper.net/dmi/system/1.0</capability>
  </capabilities>
  <session-id>19313</session-id>
</hello>
"#;

pub const DEVICE_SESSION_ID: u32 = 19313;
pub const DEVICE_CAPABILITY_COUNT: usize = 7;

pub const OK_REPLY: &str = "<rpc-reply><ok/></rpc-reply>";

/// A reply with one rpc-error of the given severity.
pub fn error_reply(severity: &str, message: &str) -> String {
    format!(
        "<rpc-reply><rpc-error>\
         <error-type>application</error-type>\
         <error-tag>operation-failed</error-tag>\
         <error-severity>{}</error-severity>\
         <error-message>{}</error-message>\
         </rpc-error></rpc-reply>",
        severity, message
    )
}

/// The device's side of a session: its hello, then one frame per reply.
pub fn device_script(replies: &[&str]) -> Vec<u8> {
    let mut script = frame(DEVICE_HELLO);
    for reply in replies {
        script.extend_from_slice(&frame(reply));
    }
    script
}

/// Mock transport replaying `device_script(replies)` in reads of `chunk` bytes.
pub fn device(replies: &[&str], chunk: usize) -> (MockTransport, CapturedWriter) {
    mock_transport(ScriptedReader::chunked(&device_script(replies), chunk))
}

/// Split captured client output into frames.
pub fn sent_frames(out: &CapturedWriter) -> Vec<String> {
    out.contents_string()
        .split("]]>]]>\n")
        .filter(|f| !f.is_empty())
        .map(str::to_string)
        .collect()
}
