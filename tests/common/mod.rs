#![allow(dead_code)]

/// A complete file: `MThd` with the given fields, then one `MTrk` per entry
/// of `tracks`, each holding the given raw event bytes.
pub fn smf(format: u16, division: u16, tracks: &[Vec<u8>]) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"MThd");
    bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x06]);
    bytes.extend_from_slice(&format.to_be_bytes());
    bytes.extend_from_slice(&(tracks.len() as u16).to_be_bytes());
    bytes.extend_from_slice(&division.to_be_bytes());
    for track in tracks {
        bytes.extend_from_slice(&track_chunk(track));
    }
    bytes
}

/// `MTrk`, big-endian length, then `events`
pub fn track_chunk(events: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"MTrk");
    bytes.extend_from_slice(&(events.len() as u32).to_be_bytes());
    bytes.extend_from_slice(events);
    bytes
}

/// Delta time zero end of track
pub const END_OF_TRACK: [u8; 4] = [0x00, 0xFF, 0x2F, 0x00];
