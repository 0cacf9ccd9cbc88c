#![doc = r#"
Static tables describing every MIDI 1.0 message

Each [`MessageType`] owns exactly one [`MessageSpec`], which holds its status
byte, its length on the wire and the ordered list of [`Attribute`]s it carries.
Lookups by type, by status byte and by name are constant time.

# Layout
```text
status      type             length  attributes
0x80-0x8F   note_off         3       channel note velocity
0x90-0x9F   note_on          3       channel note velocity
0xA0-0xAF   polytouch        3       channel note value
0xB0-0xBF   control_change   3       channel control value
0xC0-0xCF   program_change   2       channel program
0xD0-0xDF   aftertouch       2       channel value
0xE0-0xEF   pitchwheel       3       channel pitch
0xF0        sysex            n       data
0xF1        quarter_frame    2       frame_type frame_value
0xF2        songpos          3       pos
0xF3        song_select      2       song
0xF6        tune_request     1
0xF8        clock            1
0xFA        start            1
0xFB        continue         1
0xFC        stop             1
0xFE        active_sensing   1
0xFF        reset            1
```
"#]
use core::{fmt, str::FromStr};

use crate::MessageError;

/// Start of a system exclusive span
pub const SYSEX_START: u8 = 0xF0;
/// End of a system exclusive span (EOX)
pub const SYSEX_END: u8 = 0xF7;

/// Lowest pitchwheel value
pub const MIN_PITCHWHEEL: i32 = -8192;
/// Highest pitchwheel value
pub const MAX_PITCHWHEEL: i32 = 8191;
/// Lowest song position
pub const MIN_SONGPOS: i32 = 0;
/// Highest song position
pub const MAX_SONGPOS: i32 = 16383;

/// Every kind of MIDI 1.0 message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(missing_docs)]
pub enum MessageType {
    NoteOff,
    NoteOn,
    PolyTouch,
    ControlChange,
    ProgramChange,
    Aftertouch,
    PitchWheel,
    SysEx,
    QuarterFrame,
    SongPosition,
    SongSelect,
    TuneRequest,
    Clock,
    Start,
    Continue,
    Stop,
    ActiveSensing,
    Reset,
}

impl MessageType {
    /// All message types, in registry order.
    pub const ALL: [MessageType; 18] = [
        MessageType::NoteOff,
        MessageType::NoteOn,
        MessageType::PolyTouch,
        MessageType::ControlChange,
        MessageType::ProgramChange,
        MessageType::Aftertouch,
        MessageType::PitchWheel,
        MessageType::SysEx,
        MessageType::QuarterFrame,
        MessageType::SongPosition,
        MessageType::SongSelect,
        MessageType::TuneRequest,
        MessageType::Clock,
        MessageType::Start,
        MessageType::Continue,
        MessageType::Stop,
        MessageType::ActiveSensing,
        MessageType::Reset,
    ];

    /// The registry entry for this type
    #[inline]
    pub const fn spec(self) -> &'static MessageSpec {
        &SPECS[self as usize]
    }

    /// The canonical snake_case name, e.g. `"note_on"`
    pub const fn name(self) -> &'static str {
        self.spec().name
    }

    /// Looks a type up by its canonical name.
    pub fn from_name(name: &str) -> Result<Self, MessageError> {
        SPECS
            .iter()
            .find(|spec| spec.name == name)
            .map(|spec| spec.message_type)
            .ok_or_else(|| MessageError::InvalidMessageType(name.to_owned()))
    }

    /// Channel voice and channel mode messages
    pub const fn is_channel(self) -> bool {
        (self as usize) < MessageType::SysEx as usize
    }

    /// System realtime messages (`0xF8..=0xFF`)
    pub const fn is_realtime(self) -> bool {
        self.spec().status >= 0xF8
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MessageType {
    type Err = MessageError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

/// A named field of a message.
///
/// Every attribute has an inclusive range of valid values and a default used
/// when a message is built without naming it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(missing_docs)]
pub enum Attribute {
    Channel,
    Note,
    Velocity,
    Value,
    Control,
    Program,
    Pitch,
    Pos,
    Song,
    FrameType,
    FrameValue,
    /// The payload of a system exclusive message. Not an integer.
    Data,
}

impl Attribute {
    /// The canonical snake_case name
    pub const fn name(self) -> &'static str {
        match self {
            Self::Channel => "channel",
            Self::Note => "note",
            Self::Velocity => "velocity",
            Self::Value => "value",
            Self::Control => "control",
            Self::Program => "program",
            Self::Pitch => "pitch",
            Self::Pos => "pos",
            Self::Song => "song",
            Self::FrameType => "frame_type",
            Self::FrameValue => "frame_value",
            Self::Data => "data",
        }
    }

    /// Smallest valid value
    pub const fn min_value(self) -> i32 {
        match self {
            Self::Pitch => MIN_PITCHWHEEL,
            Self::Pos => MIN_SONGPOS,
            _ => 0,
        }
    }

    /// Largest valid value. For [`Attribute::Data`] this bounds each byte.
    pub const fn max_value(self) -> i32 {
        match self {
            Self::Channel | Self::FrameValue => 15,
            Self::FrameType => 7,
            Self::Pitch => MAX_PITCHWHEEL,
            Self::Pos => MAX_SONGPOS,
            _ => 127,
        }
    }

    /// Value used when a message is built without this attribute
    pub const fn default_value(self) -> i32 {
        match self {
            Self::Velocity => 64,
            _ => 0,
        }
    }

    /// Validates a value against the declared range.
    pub const fn check(self, value: i32) -> Result<i32, MessageError> {
        if value < self.min_value() || value > self.max_value() {
            return Err(MessageError::OutOfRange {
                attribute: self,
                value,
            });
        }
        Ok(value)
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How many bytes a message occupies on the wire, status byte included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireLength {
    /// Exactly this many bytes
    Fixed(usize),
    /// System exclusive: the length is determined by the closing `0xF7`
    Variable,
}

/// One row of the message registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageSpec {
    /// The type described by this row
    pub message_type: MessageType,
    /// Canonical snake_case name
    pub name: &'static str,
    /// Status byte. For channel messages this is the channel 1 status; the
    /// low nibble carries the channel.
    pub status: u8,
    /// Length on the wire
    pub length: WireLength,
    /// Attributes in wire order
    pub attributes: &'static [Attribute],
}

impl MessageSpec {
    /// True if `attribute` belongs to this type
    pub fn has_attribute(&self, attribute: Attribute) -> bool {
        self.attributes.contains(&attribute)
    }

    /// The fixed wire length, or `None` for system exclusive
    pub const fn fixed_length(&self) -> Option<usize> {
        match self.length {
            WireLength::Fixed(len) => Some(len),
            WireLength::Variable => None,
        }
    }
}

const fn spec(
    message_type: MessageType,
    name: &'static str,
    status: u8,
    length: WireLength,
    attributes: &'static [Attribute],
) -> MessageSpec {
    MessageSpec {
        message_type,
        name,
        status,
        length,
        attributes,
    }
}

use Attribute as A;
use MessageType as T;
use WireLength::{Fixed, Variable};

// indexed by `MessageType as usize`
#[rustfmt::skip]
static SPECS: [MessageSpec; 18] = [
    spec(T::NoteOff, "note_off", 0x80, Fixed(3), &[A::Channel, A::Note, A::Velocity]),
    spec(T::NoteOn, "note_on", 0x90, Fixed(3), &[A::Channel, A::Note, A::Velocity]),
    spec(T::PolyTouch, "polytouch", 0xA0, Fixed(3), &[A::Channel, A::Note, A::Value]),
    spec(T::ControlChange, "control_change", 0xB0, Fixed(3), &[A::Channel, A::Control, A::Value]),
    spec(T::ProgramChange, "program_change", 0xC0, Fixed(2), &[A::Channel, A::Program]),
    spec(T::Aftertouch, "aftertouch", 0xD0, Fixed(2), &[A::Channel, A::Value]),
    spec(T::PitchWheel, "pitchwheel", 0xE0, Fixed(3), &[A::Channel, A::Pitch]),
    spec(T::SysEx, "sysex", 0xF0, Variable, &[A::Data]),
    spec(T::QuarterFrame, "quarter_frame", 0xF1, Fixed(2), &[A::FrameType, A::FrameValue]),
    spec(T::SongPosition, "songpos", 0xF2, Fixed(3), &[A::Pos]),
    spec(T::SongSelect, "song_select", 0xF3, Fixed(2), &[A::Song]),
    spec(T::TuneRequest, "tune_request", 0xF6, Fixed(1), &[]),
    spec(T::Clock, "clock", 0xF8, Fixed(1), &[]),
    spec(T::Start, "start", 0xFA, Fixed(1), &[]),
    spec(T::Continue, "continue", 0xFB, Fixed(1), &[]),
    spec(T::Stop, "stop", 0xFC, Fixed(1), &[]),
    spec(T::ActiveSensing, "active_sensing", 0xFE, Fixed(1), &[]),
    spec(T::Reset, "reset", 0xFF, Fixed(1), &[]),
];

/// Looks up the registry entry for a status byte.
///
/// Returns `None` for data bytes and for the undefined statuses
/// `0xF4`, `0xF5`, `0xF7`, `0xF9` and `0xFD`.
pub const fn spec_by_status(status: u8) -> Option<&'static MessageSpec> {
    let message_type = match status {
        0x00..=0x7F => return None,
        0x80..=0xEF => MessageType::ALL[((status >> 4) - 0x8) as usize],
        0xF0 => MessageType::SysEx,
        0xF1 => MessageType::QuarterFrame,
        0xF2 => MessageType::SongPosition,
        0xF3 => MessageType::SongSelect,
        0xF6 => MessageType::TuneRequest,
        0xF8 => MessageType::Clock,
        0xFA => MessageType::Start,
        0xFB => MessageType::Continue,
        0xFC => MessageType::Stop,
        0xFE => MessageType::ActiveSensing,
        0xFF => MessageType::Reset,
        _ => return None,
    };
    Some(message_type.spec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn registry_is_indexed_by_type() {
        for message_type in MessageType::ALL {
            assert_eq!(message_type.spec().message_type, message_type);
        }
    }

    #[test]
    fn status_lookup_covers_channel_ranges() {
        assert_eq!(spec_by_status(0x9F).unwrap().message_type, MessageType::NoteOn);
        assert_eq!(spec_by_status(0xE3).unwrap().message_type, MessageType::PitchWheel);
        assert_eq!(spec_by_status(0xF0).unwrap().length, WireLength::Variable);
        for undefined in [0x00, 0x7F, 0xF4, 0xF5, 0xF7, 0xF9, 0xFD] {
            assert!(spec_by_status(undefined).is_none(), "0x{undefined:02X}");
        }
    }

    #[test]
    fn names_round_trip() {
        for message_type in MessageType::ALL {
            assert_eq!(message_type.name().parse::<MessageType>(), Ok(message_type));
        }
        assert_eq!(
            MessageType::from_name("note_of"),
            Err(MessageError::InvalidMessageType("note_of".to_owned()))
        );
    }

    #[test]
    fn attribute_ranges() {
        assert_eq!(Attribute::Pitch.check(-8192), Ok(-8192));
        assert!(Attribute::Pitch.check(8192).is_err());
        assert_eq!(Attribute::Pos.check(16383), Ok(16383));
        assert!(Attribute::Channel.check(16).is_err());
        assert!(Attribute::FrameType.check(8).is_err());
        assert_eq!(Attribute::Velocity.default_value(), 64);
    }
}
