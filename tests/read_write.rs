mod common;

use common::{END_OF_TRACK, smf, track_chunk};
use midiwire::prelude::*;
use pretty_assertions::assert_eq;

fn note_on(delta: u32, channel: Channel, key: u8) -> TrackEvent {
    TrackEvent::new(delta, MidiMessage::note_on(channel, key, 100).unwrap())
}

#[test]
fn not_a_midi_file() {
    let mut bytes = smf(1, 480, &[END_OF_TRACK.to_vec()]);
    bytes[..4].copy_from_slice(b"XXXX");
    let err = MidiFile::parse(&bytes).unwrap_err();
    assert!(err.is_malformed_header());
    assert_eq!(
        err.file_error(),
        Some(&FileError::MalformedHeader(HeaderError::NotAMidiFile(*b"XXXX")))
    );
    assert!(MidiFile::parse(b"MTh").unwrap_err().is_malformed_header());
}

#[test]
fn track_past_the_end_of_the_data() {
    let mut bytes = smf(0, 96, &[vec![0x00, 0x90, 0x3C, 0x40]]);
    // claim 100 bytes, provide 4
    let length_at = bytes.len() - 8;
    bytes[length_at..length_at + 4].copy_from_slice(&100u32.to_be_bytes());
    let err = MidiFile::parse(&bytes).unwrap_err();
    assert!(err.is_malformed_track());
    assert_eq!(
        err.file_error(),
        Some(&FileError::MalformedTrack(TrackError::Truncated {
            declared: 100,
            available: 4
        }))
    );
    assert_eq!(err.position(), 22);
}

#[test]
fn wrong_chunk_where_a_track_belongs() {
    let mut bytes = smf(1, 96, &[END_OF_TRACK.to_vec()]);
    bytes[14..18].copy_from_slice(b"XFIH");
    let err = MidiFile::parse(&bytes).unwrap_err();
    assert_eq!(
        err.file_error(),
        Some(&FileError::MalformedTrack(TrackError::MissingMTrk(*b"XFIH")))
    );
}

#[test]
fn fewer_tracks_than_declared() {
    let mut bytes = smf(1, 96, &[END_OF_TRACK.to_vec()]);
    // header says two tracks
    bytes[11] = 2;
    let err = MidiFile::parse(&bytes).unwrap_err();
    assert!(err.is_malformed_track());
    assert_eq!(
        err.file_error(),
        Some(&FileError::MalformedTrack(TrackError::MissingTrack {
            expected: 2,
            found: 1
        }))
    );
}

#[test]
fn event_overrunning_its_chunk() {
    let bytes = smf(0, 96, &[vec![0x00, 0x90, 0x3C]]);
    let err = MidiFile::parse(&bytes).unwrap_err();
    assert_eq!(
        err.file_error(),
        Some(&FileError::MalformedTrack(TrackError::EventOverrun))
    );
}

#[test]
fn one_beat_at_default_tempo_is_half_a_second() {
    let bytes = smf(0, 480, &[vec![0x83, 0x60, 0x90, 0x3C, 0x40]]);
    let file = MidiFile::parse(&bytes).unwrap();
    assert_eq!(file.tracks()[0].events()[0].delta_time(), 480);
    assert_eq!(file.length(), Ok(0.5));
}

#[test]
fn merged_track_of_a_format_1_file() {
    // A at 0 and B at 10 in the first track, C at 5 in the second
    let first = [vec![0x00, 0x90, 0x01, 0x64, 0x0A, 0x02, 0x64], END_OF_TRACK.to_vec()].concat();
    let second = [vec![0x05, 0x90, 0x03, 0x64], END_OF_TRACK.to_vec()].concat();
    let file = MidiFile::parse(&smf(1, 96, &[first, second])).unwrap();

    let merged = file.merged_track().unwrap();
    assert_eq!(
        merged.events(),
        &[
            note_on(0, Channel::One, 1),
            note_on(5, Channel::One, 3),
            note_on(5, Channel::One, 2),
            TrackEvent::new(0, MetaMessage::EndOfTrack),
        ]
    );
}

#[test]
fn format_2_length_fails() {
    let bytes = smf(2, 96, &[END_OF_TRACK.to_vec(), END_OF_TRACK.to_vec()]);
    let file = MidiFile::parse(&bytes).unwrap();
    assert_eq!(file.tracks().len(), 2);
    assert_eq!(file.length(), Err(FileError::AsynchronousTracks));
}

#[test]
fn round_trip_every_event_kind() {
    let mut file = MidiFile::new(FormatType::Simultaneous, 960).unwrap();
    let tempo = file.add_track(Some("tempo"));
    tempo.push(TrackEvent::new(0, MetaMessage::SetTempo(Tempo::from_bpm(90.).unwrap())));
    tempo.push(TrackEvent::new(0, MetaMessage::KeySignature("Ebm".parse().unwrap())));
    let seven_eight = TimeSignature::new(7, 8, 24, 8).unwrap();
    tempo.push(TrackEvent::new(0, MetaMessage::TimeSignature(seven_eight)));
    tempo.push(TrackEvent::new(0, MetaMessage::SequencerSpecific(vec![0x00, 0x21, 0x09])));
    tempo.push(TrackEvent::new(
        0,
        MetaMessage::Unknown {
            type_byte: 0x60,
            data: vec![1, 2, 3],
        },
    ));

    let lead = file.add_track(Some("lead"));
    lead.push(TrackEvent::new(0, MetaMessage::ChannelPrefix(Channel::Four)));
    lead.push(TrackEvent::new(0, MetaMessage::MidiPort(2)));
    lead.push(TrackEvent::new(0, MidiMessage::program_change(Channel::Four, 81).unwrap()));
    lead.push(TrackEvent::new(0, MidiMessage::control_change(Channel::Four, 7, 100).unwrap()));
    lead.push(note_on(0, Channel::Four, 60));
    let build = |message_type, fields: &[(Attribute, i32)]| {
        MidiMessage::from_fields(message_type, fields).unwrap()
    };
    lead.push(TrackEvent::new(
        240,
        build(
            MessageType::PitchWheel,
            &[(Attribute::Channel, 3), (Attribute::Pitch, -8192)],
        ),
    ));
    lead.push(TrackEvent::new(
        240,
        build(
            MessageType::Aftertouch,
            &[(Attribute::Channel, 3), (Attribute::Value, 33)],
        ),
    ));
    lead.push(TrackEvent::new(
        0,
        build(
            MessageType::PolyTouch,
            &[
                (Attribute::Channel, 3),
                (Attribute::Note, 60),
                (Attribute::Value, 5),
            ],
        ),
    ));
    lead.push(TrackEvent::new(0, MidiMessage::sysex([0x7E, 0x7F, 0x09, 0x01]).unwrap()));
    lead.push(TrackEvent::new(0, MetaMessage::Lyrics("la".to_owned())));
    lead.push(TrackEvent::new(480, MidiMessage::note_off(Channel::Four, 60, 0).unwrap()));
    lead.push(TrackEvent::new(0, MetaMessage::EndOfTrack));

    let bytes = file.to_bytes().unwrap();
    let read_back = MidiFile::parse(&bytes).unwrap();

    assert_eq!(read_back.format_type(), FormatType::Simultaneous);
    assert_eq!(read_back.ticks_per_beat(), 960);
    assert_eq!(read_back.tracks()[1], file.tracks()[1]);
    // the tempo track gained its end of track on the way out
    let mut expected = file.tracks()[0].clone();
    expected.fix_end_of_track();
    assert_eq!(read_back.tracks()[0], expected);
    assert_eq!(read_back.tracks()[0].name(), Some("tempo"));

    let mut sink = Vec::new();
    read_back.write(&mut sink).unwrap();
    assert_eq!(sink, bytes);
}

#[test]
fn clip_mode_reads_out_of_range_bytes() {
    let events = [
        vec![0x00, 0xB0, 0x07, 0xC8, 0x00, 0xF0, 0x02, 0x90, 0xF7],
        END_OF_TRACK.to_vec(),
    ]
    .concat();
    let bytes = smf(0, 96, &[events]);

    let strict = MidiFile::parse(&bytes).unwrap_err();
    assert_eq!(
        strict.file_error(),
        Some(&FileError::Message(MessageError::InvalidDataByte(0xC8)))
    );

    let file = MidiFile::parse_with(&bytes, ReadOptions::new().clip(true)).unwrap();
    let events = file.tracks()[0].events();
    assert_eq!(
        events[0].message(),
        &TrackMessage::Midi(MidiMessage::control_change(Channel::One, 7, 127).unwrap())
    );
    assert_eq!(
        events[1].message(),
        &TrackMessage::SysEx(SysExData::new([0x7F]).unwrap())
    );
}

#[test]
fn charsets() {
    let name = "Größe ♪";
    let mut file = MidiFile::default();
    file.add_track(Some(name));
    assert!(file.to_bytes().is_err());

    let mut sink = Vec::new();
    file.write_with(&mut sink, WriteOptions::new().charset(Charset::Utf8))
        .unwrap();
    let utf8 = MidiFile::parse_with(&sink, ReadOptions::new().charset(Charset::Utf8)).unwrap();
    assert_eq!(utf8.tracks()[0].name(), Some(name));
    let latin1 = MidiFile::parse(&sink).unwrap();
    assert_ne!(latin1.tracks()[0].name(), Some(name));
}

#[test]
fn read_from_io() {
    let bytes = smf(0, 96, &[END_OF_TRACK.to_vec()]);
    let file = MidiFile::read(std::io::Cursor::new(bytes)).unwrap();
    assert_eq!(file.tracks()[0].events(), &[TrackEvent::new(0, MetaMessage::EndOfTrack)]);
}

#[test]
fn trailing_chunk_bytes_are_not_read() {
    let mut bytes = smf(0, 96, &[END_OF_TRACK.to_vec()]);
    bytes.extend_from_slice(&track_chunk(&[0x00]));
    let file = MidiFile::parse(&bytes).unwrap();
    assert_eq!(file.tracks().len(), 1);
}
