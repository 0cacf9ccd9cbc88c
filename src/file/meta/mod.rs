#![doc = r#"
Meta events

Meta events only exist inside MIDI files. On disk they look like

```text
FF <type:u8> <length:vlq> <data:length bytes>
```

The type byte selects how `data` is decoded. Every type this crate knows
has a decoder, an encoder and a validator; anything else is kept verbatim as
[`MetaMessage::Unknown`] so it survives a read/write cycle untouched.

| type   | name               | payload                               |
|--------|--------------------|---------------------------------------|
| `0x00` | sequence_number    | u16, or empty for 0                   |
| `0x01` | text               | text                                  |
| `0x02` | copyright          | text                                  |
| `0x03` | track_name         | text                                  |
| `0x04` | instrument_name    | text                                  |
| `0x05` | lyrics             | text                                  |
| `0x06` | marker             | text                                  |
| `0x07` | cue_marker         | text                                  |
| `0x09` | device_name        | text                                  |
| `0x20` | channel_prefix     | channel 0..15                         |
| `0x21` | midi_port          | u8                                    |
| `0x2F` | end_of_track       | empty                                 |
| `0x51` | set_tempo          | u24 microseconds per quarter note     |
| `0x54` | smpte_offset       | 5 bytes                               |
| `0x58` | time_signature     | 4 bytes                               |
| `0x59` | key_signature      | signed accidentals, mode              |
| `0x7F` | sequencer_specific | raw                                   |
"#]

mod key_signature;
pub use key_signature::*;

mod smpte_offset;
pub use smpte_offset::*;

mod tempo;
pub use tempo::*;

mod time_signature;
pub use time_signature::*;

use core::fmt;

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::{
    Channel, FileError, MetaError,
    file::vlq::{decode_vlq, encode_length},
};

/// Leading byte of every meta event in a track
pub const META_STATUS: u8 = 0xFF;

/// How meta event text is turned into bytes and back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Charset {
    /// One byte per character, `U+0000..=U+00FF`
    #[default]
    Latin1,
    /// UTF-8. Invalid sequences are replaced when reading.
    Utf8,
}

impl Charset {
    /// Bytes to text. Never fails.
    pub fn decode(&self, bytes: &[u8]) -> String {
        match self {
            Self::Latin1 => bytes.iter().map(|&b| b as char).collect(),
            Self::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
        }
    }

    /// Text to bytes. Latin-1 fails on characters above `U+00FF`.
    pub fn encode(&self, text: &str) -> Result<Vec<u8>, MetaError> {
        match self {
            Self::Latin1 => text
                .chars()
                .map(|c| u8::try_from(u32::from(c)).map_err(|_| MetaError::Charset(c)))
                .collect(),
            Self::Utf8 => Ok(text.as_bytes().to_vec()),
        }
    }
}

/// Type bytes of the meta events this crate decodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
#[allow(missing_docs)]
pub enum MetaType {
    SequenceNumber = 0x00,
    Text = 0x01,
    Copyright = 0x02,
    TrackName = 0x03,
    InstrumentName = 0x04,
    Lyrics = 0x05,
    Marker = 0x06,
    CueMarker = 0x07,
    DeviceName = 0x09,
    ChannelPrefix = 0x20,
    MidiPort = 0x21,
    EndOfTrack = 0x2F,
    SetTempo = 0x51,
    SmpteOffset = 0x54,
    TimeSignature = 0x58,
    KeySignature = 0x59,
    SequencerSpecific = 0x7F,
}

impl MetaType {
    /// The canonical snake_case name
    pub const fn name(self) -> &'static str {
        match self {
            Self::SequenceNumber => "sequence_number",
            Self::Text => "text",
            Self::Copyright => "copyright",
            Self::TrackName => "track_name",
            Self::InstrumentName => "instrument_name",
            Self::Lyrics => "lyrics",
            Self::Marker => "marker",
            Self::CueMarker => "cue_marker",
            Self::DeviceName => "device_name",
            Self::ChannelPrefix => "channel_prefix",
            Self::MidiPort => "midi_port",
            Self::EndOfTrack => "end_of_track",
            Self::SetTempo => "set_tempo",
            Self::SmpteOffset => "smpte_offset",
            Self::TimeSignature => "time_signature",
            Self::KeySignature => "key_signature",
            Self::SequencerSpecific => "sequencer_specific",
        }
    }

    /// Minimum payload length, `0` for variable length types
    pub const fn min_length(self) -> usize {
        match self {
            Self::ChannelPrefix | Self::MidiPort => 1,
            Self::KeySignature => 2,
            Self::SetTempo => 3,
            Self::TimeSignature => 4,
            Self::SmpteOffset => 5,
            _ => 0,
        }
    }
}

impl fmt::Display for MetaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The decoded content of a meta event.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MetaMessage {
    /// Pattern number of a format 2 track
    SequenceNumber(u16),
    /// Free text
    Text(String),
    /// Copyright notice
    Copyright(String),
    /// Name of the track
    TrackName(String),
    /// Name of the instrument on the track
    InstrumentName(String),
    /// A syllable of lyrics
    Lyrics(String),
    /// Rehearsal letter or section name
    Marker(String),
    /// Cue for an event on stage or screen
    CueMarker(String),
    /// Name of the device the track is meant for
    DeviceName(String),
    /// Channel that subsequent meta and sysex events refer to
    ChannelPrefix(Channel),
    /// Output port of the track
    MidiPort(u8),
    /// Marks the end of a track. Exactly one, always last.
    EndOfTrack,
    /// Tempo change
    SetTempo(Tempo),
    /// Start time of the track
    SmpteOffset(SmpteOffset),
    /// Time signature change
    TimeSignature(TimeSignature),
    /// Key signature change
    KeySignature(KeySignature),
    /// Vendor data
    SequencerSpecific(Vec<u8>),
    /// Any type byte without a decoder, kept verbatim
    Unknown {
        /// The type byte
        type_byte: u8,
        /// The raw payload
        data: Vec<u8>,
    },
}

impl MetaMessage {
    /// Decodes a payload according to its type byte.
    ///
    /// Payloads shorter than their type requires fail. Trailing bytes after
    /// a fixed size payload are ignored.
    pub fn decode(type_byte: u8, data: &[u8], charset: Charset) -> Result<Self, MetaError> {
        let Ok(meta_type) = MetaType::try_from(type_byte) else {
            return Ok(Self::Unknown {
                type_byte,
                data: data.to_vec(),
            });
        };
        if data.len() < meta_type.min_length() {
            return Err(MetaError::Length {
                meta_type,
                expected: meta_type.min_length(),
                found: data.len(),
            });
        }

        use MetaType as M;
        Ok(match meta_type {
            M::SequenceNumber => match data {
                [] => Self::SequenceNumber(0),
                [hi, lo, ..] => Self::SequenceNumber(u16::from_be_bytes([*hi, *lo])),
                [_] => {
                    return Err(MetaError::Length {
                        meta_type,
                        expected: 2,
                        found: 1,
                    });
                }
            },
            M::Text => Self::Text(charset.decode(data)),
            M::Copyright => Self::Copyright(charset.decode(data)),
            M::TrackName => Self::TrackName(charset.decode(data)),
            M::InstrumentName => Self::InstrumentName(charset.decode(data)),
            M::Lyrics => Self::Lyrics(charset.decode(data)),
            M::Marker => Self::Marker(charset.decode(data)),
            M::CueMarker => Self::CueMarker(charset.decode(data)),
            M::DeviceName => Self::DeviceName(charset.decode(data)),
            M::ChannelPrefix => {
                let channel =
                    Channel::try_from(data[0]).map_err(|_| MetaError::ChannelPrefix(data[0]))?;
                Self::ChannelPrefix(channel)
            }
            M::MidiPort => Self::MidiPort(data[0]),
            M::EndOfTrack => Self::EndOfTrack,
            M::SetTempo => Self::SetTempo(Tempo::from_bytes([data[0], data[1], data[2]])),
            M::SmpteOffset => Self::SmpteOffset(SmpteOffset::parse(&data[..5])?),
            M::TimeSignature => Self::TimeSignature(TimeSignature::from_bytes([
                data[0], data[1], data[2], data[3],
            ])?),
            M::KeySignature => Self::KeySignature(KeySignature::from_bytes([data[0], data[1]])?),
            M::SequencerSpecific => Self::SequencerSpecific(data.to_vec()),
        })
    }

    /// Decodes a complete `FF type length data` event.
    ///
    /// The declared length must match the bytes that follow it exactly.
    pub fn from_bytes(bytes: &[u8], charset: Charset) -> Result<Self, FileError> {
        let [status, type_byte, rest @ ..] = bytes else {
            return Err(MetaError::DeclaredLength {
                declared: 0,
                found: 0,
            }
            .into());
        };
        if *status != META_STATUS {
            return Err(MetaError::NotMeta(*status).into());
        }
        let Some((declared, consumed)) = decode_vlq(rest)? else {
            return Err(MetaError::DeclaredLength {
                declared: 0,
                found: 0,
            }
            .into());
        };
        let data = &rest[consumed..];
        if data.len() != declared as usize {
            return Err(MetaError::DeclaredLength {
                declared: declared as usize,
                found: data.len(),
            }
            .into());
        }
        Ok(Self::decode(*type_byte, data, charset)?)
    }

    /// The type byte written to disk
    pub fn type_byte(&self) -> u8 {
        match self {
            Self::Unknown { type_byte, .. } => *type_byte,
            known => known.meta_type().map(u8::from).unwrap_or(0),
        }
    }

    /// The registry type, `None` for [`MetaMessage::Unknown`]
    pub const fn meta_type(&self) -> Option<MetaType> {
        use MetaType as M;
        Some(match self {
            Self::SequenceNumber(_) => M::SequenceNumber,
            Self::Text(_) => M::Text,
            Self::Copyright(_) => M::Copyright,
            Self::TrackName(_) => M::TrackName,
            Self::InstrumentName(_) => M::InstrumentName,
            Self::Lyrics(_) => M::Lyrics,
            Self::Marker(_) => M::Marker,
            Self::CueMarker(_) => M::CueMarker,
            Self::DeviceName(_) => M::DeviceName,
            Self::ChannelPrefix(_) => M::ChannelPrefix,
            Self::MidiPort(_) => M::MidiPort,
            Self::EndOfTrack => M::EndOfTrack,
            Self::SetTempo(_) => M::SetTempo,
            Self::SmpteOffset(_) => M::SmpteOffset,
            Self::TimeSignature(_) => M::TimeSignature,
            Self::KeySignature(_) => M::KeySignature,
            Self::SequencerSpecific(_) => M::SequencerSpecific,
            Self::Unknown { .. } => return None,
        })
    }

    /// Encodes the payload, without type byte or length.
    pub fn payload(&self, charset: Charset) -> Result<Vec<u8>, MetaError> {
        Ok(match self {
            Self::SequenceNumber(number) => number.to_be_bytes().to_vec(),
            Self::Text(text)
            | Self::Copyright(text)
            | Self::TrackName(text)
            | Self::InstrumentName(text)
            | Self::Lyrics(text)
            | Self::Marker(text)
            | Self::CueMarker(text)
            | Self::DeviceName(text) => charset.encode(text)?,
            Self::ChannelPrefix(channel) => vec![channel.index()],
            Self::MidiPort(port) => vec![*port],
            Self::EndOfTrack => Vec::new(),
            Self::SetTempo(tempo) => tempo.to_bytes().to_vec(),
            Self::SmpteOffset(offset) => {
                let bytes = offset.to_bytes();
                // the fields are public, so check them again on the way out
                SmpteOffset::parse(&bytes)?;
                bytes.to_vec()
            }
            Self::TimeSignature(signature) => signature.to_bytes().to_vec(),
            Self::KeySignature(key) => key.to_bytes().to_vec(),
            Self::SequencerSpecific(data) | Self::Unknown { data, .. } => data.clone(),
        })
    }

    /// Appends `FF type length data` to `out`.
    pub fn encode_into(&self, out: &mut Vec<u8>, charset: Charset) -> Result<(), FileError> {
        let payload = self.payload(charset)?;
        out.push(META_STATUS);
        out.push(self.type_byte());
        encode_length(payload.len(), out)?;
        out.extend_from_slice(&payload);
        Ok(())
    }

    /// Encodes `FF type length data`
    pub fn to_bytes(&self, charset: Charset) -> Result<Vec<u8>, FileError> {
        let mut out = Vec::new();
        self.encode_into(&mut out, charset)?;
        Ok(out)
    }

    /// The text of the text-family events
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(text)
            | Self::Copyright(text)
            | Self::TrackName(text)
            | Self::InstrumentName(text)
            | Self::Lyrics(text)
            | Self::Marker(text)
            | Self::CueMarker(text)
            | Self::DeviceName(text) => Some(text),
            _ => None,
        }
    }

    /// True for [`MetaMessage::EndOfTrack`]
    pub const fn is_end_of_track(&self) -> bool {
        matches!(self, Self::EndOfTrack)
    }
}
