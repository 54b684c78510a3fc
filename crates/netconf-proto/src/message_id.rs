//! RPC correlation identifiers.

use rand::RngCore;

/// Generate a fresh `message-id`: 16 random bytes laid out as a version 4
/// UUID, rendered as lowercase 8-4-4-4-12 hex groups.
///
/// Ids only tag requests; collisions are not guarded against.
pub fn new_message_id() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes[6] = (bytes[6] & 0x0f) | 0x40;
    bytes[8] = (bytes[8] & 0x3f) | 0x80;

    format!(
        "{}-{}-{}-{}-{}",
        hex::encode(&bytes[0..4]),
        hex::encode(&bytes[4..6]),
        hex::encode(&bytes[6..8]),
        hex::encode(&bytes[8..10]),
        hex::encode(&bytes[10..16]),
    )
}
