#![doc = r#"
Live MIDI messages

# Hierarchy
```text
         |---------|
         | Message |  time in seconds
         |---------|
              |
       |-------------|
       | MidiMessage |  semantic content, one variant per MessageType
       |-------------|
```

A [`MidiMessage`] is the validated content of one message. The same content
is stored in file tracks (with a delta time in ticks), while a [`Message`]
pairs it with a time in seconds for live use.

Messages are immutable. "Changing" a field produces a new, validated value
through [`Message::with`] or [`Message::with_time`].
"#]

mod codec;
pub use codec::*;

mod data;
pub use data::*;

mod spec;
pub use spec::*;

use crate::{Channel, DataByte, MessageError};

/// The semantic content of a MIDI 1.0 message.
///
/// Each variant carries exactly the fields its [`MessageType`] declares.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(missing_docs)]
pub enum MidiMessage {
    NoteOff {
        channel: Channel,
        note: DataByte,
        velocity: DataByte,
    },
    NoteOn {
        channel: Channel,
        note: DataByte,
        velocity: DataByte,
    },
    PolyTouch {
        channel: Channel,
        note: DataByte,
        value: DataByte,
    },
    ControlChange {
        channel: Channel,
        control: DataByte,
        value: DataByte,
    },
    ProgramChange {
        channel: Channel,
        program: DataByte,
    },
    Aftertouch {
        channel: Channel,
        value: DataByte,
    },
    PitchWheel {
        channel: Channel,
        pitch: PitchBend,
    },
    SysEx {
        data: SysExData,
    },
    QuarterFrame(QuarterFrame),
    SongPosition {
        pos: SongPosition,
    },
    SongSelect {
        song: DataByte,
    },
    TuneRequest,
    Clock,
    Start,
    Continue,
    Stop,
    ActiveSensing,
    Reset,
}

impl MidiMessage {
    /// Shorthand for a validated note on
    pub fn note_on(channel: Channel, note: u8, velocity: u8) -> Result<Self, MessageError> {
        Ok(Self::NoteOn {
            channel,
            note: DataByte::new(note)?,
            velocity: DataByte::new(velocity)?,
        })
    }

    /// Shorthand for a validated note off
    pub fn note_off(channel: Channel, note: u8, velocity: u8) -> Result<Self, MessageError> {
        Ok(Self::NoteOff {
            channel,
            note: DataByte::new(note)?,
            velocity: DataByte::new(velocity)?,
        })
    }

    /// Shorthand for a validated control change
    pub fn control_change(channel: Channel, control: u8, value: u8) -> Result<Self, MessageError> {
        Ok(Self::ControlChange {
            channel,
            control: DataByte::new(control)?,
            value: DataByte::new(value)?,
        })
    }

    /// Shorthand for a validated program change
    pub fn program_change(channel: Channel, program: u8) -> Result<Self, MessageError> {
        Ok(Self::ProgramChange {
            channel,
            program: DataByte::new(program)?,
        })
    }

    /// Shorthand for a validated system exclusive message
    pub fn sysex(data: impl Into<Vec<u8>>) -> Result<Self, MessageError> {
        Ok(Self::SysEx {
            data: SysExData::new(data)?,
        })
    }

    /// Builds a message from its type and named integer fields.
    ///
    /// Fields that are not named take their [`Attribute::default_value`].
    /// Naming a field the type does not have is an error. System exclusive
    /// payloads can not be given here; use [`MidiMessage::sysex`].
    pub fn from_fields(
        message_type: MessageType,
        fields: &[(Attribute, i32)],
    ) -> Result<Self, MessageError> {
        let spec = message_type.spec();
        for &(attribute, _) in fields {
            if !spec.has_attribute(attribute) || attribute == Attribute::Data {
                return Err(MessageError::NoSuchAttribute {
                    message_type,
                    attribute,
                });
            }
        }
        let field = |attribute: Attribute| -> Result<i32, MessageError> {
            let value = fields
                .iter()
                .rev()
                .find(|(a, _)| *a == attribute)
                .map(|(_, v)| *v)
                .unwrap_or(attribute.default_value());
            attribute.check(value)
        };
        let byte = |attribute: Attribute| -> Result<DataByte, MessageError> {
            field(attribute).map(|v| DataByte(v as u8))
        };
        let channel = || -> Result<Channel, MessageError> {
            field(Attribute::Channel).map(|v| Channel::from_status(v as u8))
        };

        use MessageType as T;
        Ok(match message_type {
            T::NoteOff => Self::NoteOff {
                channel: channel()?,
                note: byte(Attribute::Note)?,
                velocity: byte(Attribute::Velocity)?,
            },
            T::NoteOn => Self::NoteOn {
                channel: channel()?,
                note: byte(Attribute::Note)?,
                velocity: byte(Attribute::Velocity)?,
            },
            T::PolyTouch => Self::PolyTouch {
                channel: channel()?,
                note: byte(Attribute::Note)?,
                value: byte(Attribute::Value)?,
            },
            T::ControlChange => Self::ControlChange {
                channel: channel()?,
                control: byte(Attribute::Control)?,
                value: byte(Attribute::Value)?,
            },
            T::ProgramChange => Self::ProgramChange {
                channel: channel()?,
                program: byte(Attribute::Program)?,
            },
            T::Aftertouch => Self::Aftertouch {
                channel: channel()?,
                value: byte(Attribute::Value)?,
            },
            T::PitchWheel => Self::PitchWheel {
                channel: channel()?,
                pitch: PitchBend::new(field(Attribute::Pitch)?)?,
            },
            T::SysEx => Self::SysEx {
                data: SysExData::default(),
            },
            T::QuarterFrame => Self::QuarterFrame(QuarterFrame::new(
                field(Attribute::FrameType)?,
                field(Attribute::FrameValue)?,
            )?),
            T::SongPosition => Self::SongPosition {
                pos: SongPosition::new(field(Attribute::Pos)?)?,
            },
            T::SongSelect => Self::SongSelect {
                song: byte(Attribute::Song)?,
            },
            T::TuneRequest => Self::TuneRequest,
            T::Clock => Self::Clock,
            T::Start => Self::Start,
            T::Continue => Self::Continue,
            T::Stop => Self::Stop,
            T::ActiveSensing => Self::ActiveSensing,
            T::Reset => Self::Reset,
        })
    }

    /// The type of this message
    pub const fn message_type(&self) -> MessageType {
        use MessageType as T;
        match self {
            Self::NoteOff { .. } => T::NoteOff,
            Self::NoteOn { .. } => T::NoteOn,
            Self::PolyTouch { .. } => T::PolyTouch,
            Self::ControlChange { .. } => T::ControlChange,
            Self::ProgramChange { .. } => T::ProgramChange,
            Self::Aftertouch { .. } => T::Aftertouch,
            Self::PitchWheel { .. } => T::PitchWheel,
            Self::SysEx { .. } => T::SysEx,
            Self::QuarterFrame(_) => T::QuarterFrame,
            Self::SongPosition { .. } => T::SongPosition,
            Self::SongSelect { .. } => T::SongSelect,
            Self::TuneRequest => T::TuneRequest,
            Self::Clock => T::Clock,
            Self::Start => T::Start,
            Self::Continue => T::Continue,
            Self::Stop => T::Stop,
            Self::ActiveSensing => T::ActiveSensing,
            Self::Reset => T::Reset,
        }
    }

    /// The channel of a channel message
    pub const fn channel(&self) -> Option<Channel> {
        match self {
            Self::NoteOff { channel, .. }
            | Self::NoteOn { channel, .. }
            | Self::PolyTouch { channel, .. }
            | Self::ControlChange { channel, .. }
            | Self::ProgramChange { channel, .. }
            | Self::Aftertouch { channel, .. }
            | Self::PitchWheel { channel, .. } => Some(*channel),
            _ => None,
        }
    }

    /// Reads an integer attribute. `None` if the type has no such attribute.
    ///
    /// [`Attribute::Data`] is never returned here; see [`MidiMessage::sysex_data`].
    pub fn get(&self, attribute: Attribute) -> Option<i32> {
        use Attribute as A;
        let value = match (self, attribute) {
            (_, A::Channel) => return self.channel().map(|c| c.index() as i32),
            (Self::NoteOff { note, .. }, A::Note)
            | (Self::NoteOn { note, .. }, A::Note)
            | (Self::PolyTouch { note, .. }, A::Note) => note.0 as i32,
            (Self::NoteOff { velocity, .. }, A::Velocity)
            | (Self::NoteOn { velocity, .. }, A::Velocity) => velocity.0 as i32,
            (Self::PolyTouch { value, .. }, A::Value)
            | (Self::ControlChange { value, .. }, A::Value)
            | (Self::Aftertouch { value, .. }, A::Value) => value.0 as i32,
            (Self::ControlChange { control, .. }, A::Control) => control.0 as i32,
            (Self::ProgramChange { program, .. }, A::Program) => program.0 as i32,
            (Self::PitchWheel { pitch, .. }, A::Pitch) => pitch.value() as i32,
            (Self::SongPosition { pos }, A::Pos) => pos.value() as i32,
            (Self::SongSelect { song }, A::Song) => song.0 as i32,
            (Self::QuarterFrame(qf), A::FrameType) => qf.frame_type() as i32,
            (Self::QuarterFrame(qf), A::FrameValue) => qf.frame_value() as i32,
            _ => return None,
        };
        Some(value)
    }

    /// The payload of a system exclusive message
    pub fn sysex_data(&self) -> Option<&SysExData> {
        match self {
            Self::SysEx { data } => Some(data),
            _ => None,
        }
    }

    /// Returns a copy with one attribute replaced, validated like a new message.
    pub fn with(&self, attribute: Attribute, value: i32) -> Result<Self, MessageError> {
        let message_type = self.message_type();
        let spec = message_type.spec();
        if !spec.has_attribute(attribute) || attribute == Attribute::Data {
            return Err(MessageError::NoSuchAttribute {
                message_type,
                attribute,
            });
        }
        let mut fields: Vec<(Attribute, i32)> = spec
            .attributes
            .iter()
            .filter_map(|&a| self.get(a).map(|v| (a, v)))
            .collect();
        fields.push((attribute, value));
        Self::from_fields(message_type, &fields)
    }

    /// System realtime messages may interrupt anything, even a sysex span
    pub const fn is_realtime(&self) -> bool {
        self.message_type().is_realtime()
    }

    /// True for a control change, optionally of a specific controller number
    pub fn is_cc(&self, control: Option<u8>) -> bool {
        match (self, control) {
            (Self::ControlChange { .. }, None) => true,
            (Self::ControlChange { control, .. }, Some(wanted)) => control.0 == wanted,
            _ => false,
        }
    }

    /// Number of bytes on the wire, markers included for sysex
    pub fn wire_len(&self) -> usize {
        match self {
            Self::SysEx { data } => data.len() + 2,
            other => other.message_type().spec().fixed_length().unwrap_or(1),
        }
    }
}

#[doc = r#"
A validated MIDI message with a time in seconds.

Time is whatever the producer chooses (absolute or relative); the codec
only requires it to be finite and non-negative. Equality compares time too.

# Example
```rust
# use midiwire::prelude::*;
let msg = Message::from_fields(
    MessageType::NoteOn,
    &[(Attribute::Note, 60)],
    0.0,
).unwrap();

assert_eq!(msg.get(Attribute::Velocity), Some(64));
assert_eq!(msg.bytes(), vec![0x90, 60, 64]);

let louder = msg.with(Attribute::Velocity, 127).unwrap();
assert_eq!(louder.bytes(), vec![0x90, 60, 127]);
```
"#]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Message {
    message: MidiMessage,
    time: f64,
}

impl Message {
    /// Pairs content with a time in seconds
    pub fn new(message: MidiMessage, time: f64) -> Result<Self, MessageError> {
        Ok(Self {
            message,
            time: check_time(time)?,
        })
    }

    /// See [`MidiMessage::from_fields`]
    pub fn from_fields(
        message_type: MessageType,
        fields: &[(Attribute, i32)],
        time: f64,
    ) -> Result<Self, MessageError> {
        Self::new(MidiMessage::from_fields(message_type, fields)?, time)
    }

    /// Decodes one complete frame. See [`decode`].
    pub fn from_bytes(frame: &[u8], time: f64) -> Result<Self, MessageError> {
        decode(frame, time)
    }

    /// The semantic content
    pub const fn message(&self) -> &MidiMessage {
        &self.message
    }

    /// Unwraps the semantic content
    pub fn into_message(self) -> MidiMessage {
        self.message
    }

    /// Time in seconds
    pub const fn time(&self) -> f64 {
        self.time
    }

    /// The type of the message
    pub const fn message_type(&self) -> MessageType {
        self.message.message_type()
    }

    /// See [`MidiMessage::get`]
    pub fn get(&self, attribute: Attribute) -> Option<i32> {
        self.message.get(attribute)
    }

    /// Copy with one attribute replaced
    pub fn with(&self, attribute: Attribute, value: i32) -> Result<Self, MessageError> {
        Ok(Self {
            message: self.message.with(attribute, value)?,
            time: self.time,
        })
    }

    /// Copy with another time
    pub fn with_time(&self, time: f64) -> Result<Self, MessageError> {
        Ok(Self {
            message: self.message.clone(),
            time: check_time(time)?,
        })
    }

    /// See [`MidiMessage::is_realtime`]
    pub const fn is_realtime(&self) -> bool {
        self.message.is_realtime()
    }

    /// See [`MidiMessage::is_cc`]
    pub fn is_cc(&self, control: Option<u8>) -> bool {
        self.message.is_cc(control)
    }

    /// Encodes the message. See [`encode`].
    pub fn bytes(&self) -> Vec<u8> {
        encode(&self.message)
    }

    /// Number of bytes on the wire
    pub fn wire_len(&self) -> usize {
        self.message.wire_len()
    }
}

fn check_time(time: f64) -> Result<f64, MessageError> {
    if !time.is_finite() || time < 0. {
        return Err(MessageError::InvalidTime);
    }
    Ok(time)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_fill_unnamed_fields() {
        let msg = MidiMessage::from_fields(MessageType::NoteOff, &[]).unwrap();
        assert_eq!(msg, MidiMessage::note_off(Channel::One, 0, 64).unwrap());
    }

    #[test]
    fn unknown_field_is_rejected() {
        let err = MidiMessage::from_fields(MessageType::ProgramChange, &[(Attribute::Note, 1)])
            .unwrap_err();
        assert_eq!(
            err,
            MessageError::NoSuchAttribute {
                message_type: MessageType::ProgramChange,
                attribute: Attribute::Note
            }
        );
    }

    #[test]
    fn copy_with_override_revalidates() {
        let msg = Message::from_fields(
            MessageType::PitchWheel,
            &[(Attribute::Channel, 3), (Attribute::Pitch, -100)],
            1.5,
        )
        .unwrap();
        let bent = msg.with(Attribute::Pitch, 8191).unwrap();
        assert_eq!(bent.get(Attribute::Pitch), Some(8191));
        assert_eq!(bent.get(Attribute::Channel), Some(3));
        assert_eq!(bent.time(), 1.5);
        assert!(msg.with(Attribute::Pitch, 8192).is_err());
        assert!(msg.with(Attribute::Note, 1).is_err());
    }

    #[test]
    fn time_must_be_non_negative() {
        let msg = Message::new(MidiMessage::Clock, 0.).unwrap();
        assert_eq!(msg.with_time(-1.), Err(MessageError::InvalidTime));
        assert_eq!(msg.with_time(f64::NAN), Err(MessageError::InvalidTime));
    }

    #[test]
    fn equality_includes_time() {
        let a = Message::new(MidiMessage::Start, 0.).unwrap();
        let b = a.with_time(0.25).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn wire_length() {
        let msg = Message::from_bytes(&[0xF0, 0x01, 0x02, 0xF7], 0.).unwrap();
        assert_eq!(msg.wire_len(), 4);
        assert!(Message::from_bytes(&[0xB0, 0x07, 0x7F], 0.).unwrap().is_cc(Some(7)));
    }
}
