//! Client Façade Tests

mod fixtures;

use fixtures::{device, error_reply, sent_frames, OK_REPLY};
use netconf_client::{Client, SessionConfig};

#[test]
fn test_get_config_returns_payload() {
    let (transport, out) = device(&["<rpc-reply><data>X</data></rpc-reply>"], 4096);
    let mut client = Client::from_transport(transport, &SessionConfig::default()).unwrap();

    let config = client.get_config("running").unwrap();
    let text = String::from_utf8(config).unwrap();
    assert!(text.contains("<data>X</data>"));

    let frames = sent_frames(&out);
    assert!(frames[1].contains("<get-config><source><running/></source></get-config>"));

    client.close().unwrap();
}

#[test]
fn test_get_config_with_reply_split_into_small_reads() {
    let reply = format!(
        "<rpc-reply message-id=\"1\"><data><configuration>{}</configuration></data></rpc-reply>",
        "<interfaces/>".repeat(1000)
    );
    let (transport, _) = device(&[reply.as_str()], 7);
    let mut client = Client::from_transport(transport, &SessionConfig::default()).unwrap();

    let config = client.get_config("candidate").unwrap();
    assert!(config.starts_with(b"<data><configuration><interfaces/>"));
    assert!(config.ends_with(b"</configuration></data>"));
}

#[test]
fn test_get_config_error_propagates() {
    let reply = error_reply("error", "permission denied");
    let (transport, _) = device(&[reply.as_str()], 4096);
    let mut client = Client::from_transport(transport, &SessionConfig::default()).unwrap();

    let err = client.get_config("running").unwrap_err();
    assert_eq!(err.rpc_error().unwrap().message, "permission denied");
    assert_eq!(err.exit_code(), 40);
}

#[test]
fn test_lock_edit_unlock_sequence() {
    let (transport, out) = device(&[OK_REPLY, OK_REPLY], 4096);
    let mut client = Client::from_transport(transport, &SessionConfig::default()).unwrap();

    assert!(client.lock("candidate").unwrap().ok);
    assert!(client.unlock("candidate").unwrap().ok);

    let frames = sent_frames(&out);
    assert_eq!(frames.len(), 3);
    assert!(frames[1].contains("<lock><target><candidate/></target></lock>"));
    assert!(frames[2].contains("<unlock><target><candidate/></target></unlock>"));
}

#[test]
fn test_session_details_exposed() {
    let (transport, _) = device(&[], 4096);
    let client = Client::from_transport(transport, &SessionConfig::default()).unwrap();

    assert_eq!(client.session().id(), Some(19313));
    assert_eq!(client.session().server_capabilities().len(), 7);
}
