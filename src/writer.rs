#![doc = r#"
Writing Standard MIDI Files

Tracks are written with running status: a channel message whose status
equals the one before it is written without its status byte. System
exclusive and meta events always write their status and break the run.

Every track is written with exactly one end of track event, at its end.
Tracks are repaired on the fly; the [`MidiFile`] itself is never changed.
"#]
use tracing::debug;

use crate::{
    FileError,
    file::{
        FormatType, MidiFile, MidiTrack, TrackMessage,
        chunk::{HEADER_TAG, Header, TRACK_TAG, write_chunk},
        meta::Charset,
        vlq::{encode_length, encode_vlq},
    },
    message::{MidiMessage, SYSEX_END, SYSEX_START, SysExData, encode_into},
};

/// Knobs for writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WriteOptions {
    charset: Charset,
}

impl WriteOptions {
    /// Latin-1 text
    pub fn new() -> Self {
        Self::default()
    }

    /// How meta event text is encoded
    pub fn charset(mut self, charset: Charset) -> Self {
        self.charset = charset;
        self
    }
}

/// Encodes the events of `track`, the payload of its `MTrk` chunk.
pub fn write_track(track: &MidiTrack, options: WriteOptions) -> Result<Vec<u8>, FileError> {
    let mut track = track.clone();
    track.fix_end_of_track();

    let mut out = Vec::new();
    let mut running_status = 0u8;
    for event in track.iter() {
        encode_vlq(event.delta_time(), &mut out)?;
        match event.message() {
            TrackMessage::Midi(MidiMessage::SysEx { data }) | TrackMessage::SysEx(data) => {
                write_sysex(data, &mut out)?;
                running_status = 0;
            }
            TrackMessage::Midi(message) => {
                if message.is_realtime() {
                    return Err(FileError::RealtimeInFile(message.message_type()));
                }
                let start = out.len();
                encode_into(message, &mut out);
                let status = out[start];
                if status == running_status {
                    out.remove(start);
                }
                running_status = if status < 0xF0 { status } else { 0 };
            }
            TrackMessage::Meta(meta) => {
                meta.encode_into(&mut out, options.charset)?;
                running_status = 0;
            }
        }
    }
    Ok(out)
}

fn write_sysex(data: &SysExData, out: &mut Vec<u8>) -> Result<(), FileError> {
    out.push(SYSEX_START);
    encode_length(data.len() + 1, out)?;
    out.extend_from_slice(data.as_slice());
    out.push(SYSEX_END);
    Ok(())
}

/// Encodes a complete file: the `MThd` chunk followed by one `MTrk` chunk
/// per track.
pub fn write_file(file: &MidiFile, options: WriteOptions) -> Result<Vec<u8>, FileError> {
    let tracks = file.tracks();
    if file.format_type() == FormatType::SingleMultiChannel && tracks.len() != 1 {
        return Err(FileError::Format0TrackCount(tracks.len()));
    }
    let num_tracks =
        u16::try_from(tracks.len()).map_err(|_| FileError::TooManyTracks(tracks.len()))?;
    let header = Header::new(file.format_type(), num_tracks, file.ticks_per_beat())?;

    let mut out = Vec::new();
    write_chunk(&mut out, HEADER_TAG, &header.to_bytes());
    for (index, track) in tracks.iter().enumerate() {
        let payload = write_track(track, options)?;
        debug!("track {index}: {} events in {} bytes", track.len(), payload.len());
        write_chunk(&mut out, TRACK_TAG, &payload);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Channel,
        file::{TrackEvent, meta::MetaMessage},
        message::MessageType,
    };
    use pretty_assertions::assert_eq;

    fn track(events: Vec<TrackEvent>) -> MidiTrack {
        MidiTrack::from(events)
    }

    #[test]
    fn running_status_compression() {
        let track = track(vec![
            TrackEvent::new(0, MidiMessage::note_on(Channel::One, 60, 100).unwrap()),
            TrackEvent::new(10, MidiMessage::note_on(Channel::One, 60, 0).unwrap()),
            TrackEvent::new(0, MidiMessage::note_on(Channel::Two, 60, 0).unwrap()),
        ]);
        assert_eq!(
            write_track(&track, WriteOptions::default()).unwrap(),
            vec![
                0x00, 0x90, 60, 100, //
                0x0A, 60, 0, //
                0x00, 0x91, 60, 0, //
                0x00, 0xFF, 0x2F, 0x00,
            ]
        );
    }

    #[test]
    fn meta_and_sysex_break_the_run() {
        let note = || MidiMessage::note_off(Channel::One, 1, 2).unwrap();
        let track = track(vec![
            TrackEvent::new(0, note()),
            TrackEvent::new(0, MetaMessage::Marker("A".to_owned())),
            TrackEvent::new(0, note()),
            TrackEvent::new(0, MidiMessage::sysex([0x7D]).unwrap()),
            TrackEvent::new(0, note()),
            TrackEvent::new(4, MetaMessage::EndOfTrack),
        ]);
        assert_eq!(
            write_track(&track, WriteOptions::default()).unwrap(),
            vec![
                0x00, 0x80, 1, 2, //
                0x00, 0xFF, 0x06, 0x01, b'A', //
                0x00, 0x80, 1, 2, //
                0x00, 0xF0, 0x02, 0x7D, 0xF7, //
                0x00, 0x80, 1, 2, //
                0x04, 0xFF, 0x2F, 0x00,
            ]
        );
    }

    #[test]
    fn realtime_is_rejected() {
        let track = track(vec![TrackEvent::new(0, MidiMessage::Clock)]);
        assert_eq!(
            write_track(&track, WriteOptions::default()),
            Err(FileError::RealtimeInFile(MessageType::Clock))
        );
    }

    #[test]
    fn format_0_needs_one_track() {
        let file = MidiFile::new(FormatType::SingleMultiChannel, 96).unwrap();
        assert_eq!(
            write_file(&file, WriteOptions::default()),
            Err(FileError::Format0TrackCount(0))
        );
    }

    #[test]
    fn oversized_delta_time() {
        let track = track(vec![TrackEvent::new(
            0x1000_0000,
            MidiMessage::note_on(Channel::One, 1, 1).unwrap(),
        )]);
        assert_eq!(
            write_track(&track, WriteOptions::default()),
            Err(FileError::DeltaTimeOverflow(0x1000_0000))
        );
    }

    #[test]
    fn header_chunk() {
        let mut file = MidiFile::new(FormatType::Simultaneous, 480).unwrap();
        file.add_track(None);
        let bytes = write_file(&file, WriteOptions::default()).unwrap();
        assert_eq!(
            bytes,
            b"MThd\x00\x00\x00\x06\x00\x01\x00\x01\x01\xE0MTrk\x00\x00\x00\x04\x00\xFF\x2F\x00"
        );
    }
}
