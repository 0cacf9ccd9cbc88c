use crate::{
    Channel, DataByte, MessageError,
    message::{
        Message, MessageType, MidiMessage, PitchBend, QuarterFrame, SYSEX_END, SYSEX_START,
        SongPosition, SysExData, WireLength, spec_by_status,
    },
};

/// Decodes one complete frame into a [`Message`] at `time` seconds.
///
/// The frame must hold exactly one message: a status byte followed by the
/// data bytes its type requires, or `0xF0 .. 0xF7` for system exclusive.
pub fn decode(frame: &[u8], time: f64) -> Result<Message, MessageError> {
    Message::new(decode_message(frame)?, time)
}

/// Decodes one complete frame into its semantic content.
pub fn decode_message(frame: &[u8]) -> Result<MidiMessage, MessageError> {
    let (&status, data) = frame.split_first().ok_or(MessageError::EmptyFrame)?;
    if status < 0x80 {
        return Err(MessageError::MissingStatus(status));
    }
    let spec = spec_by_status(status).ok_or(MessageError::UndefinedStatus(status))?;

    let expected = match spec.length {
        WireLength::Variable => {
            let Some((&SYSEX_END, payload)) = data.split_last() else {
                return Err(MessageError::UnterminatedSysEx);
            };
            return Ok(MidiMessage::SysEx {
                data: SysExData::new(payload)?,
            });
        }
        WireLength::Fixed(len) => len,
    };
    if frame.len() != expected {
        return Err(MessageError::InvalidLength {
            message_type: spec.message_type,
            expected,
            found: frame.len(),
        });
    }

    let mut bytes = [DataByte::default(); 2];
    for (slot, &byte) in bytes.iter_mut().zip(data) {
        *slot = DataByte::new(byte)?;
    }
    let [first, second] = bytes;
    let channel = Channel::from_status(status);

    use MessageType as T;
    Ok(match spec.message_type {
        T::NoteOff => MidiMessage::NoteOff {
            channel,
            note: first,
            velocity: second,
        },
        T::NoteOn => MidiMessage::NoteOn {
            channel,
            note: first,
            velocity: second,
        },
        T::PolyTouch => MidiMessage::PolyTouch {
            channel,
            note: first,
            value: second,
        },
        T::ControlChange => MidiMessage::ControlChange {
            channel,
            control: first,
            value: second,
        },
        T::ProgramChange => MidiMessage::ProgramChange {
            channel,
            program: first,
        },
        T::Aftertouch => MidiMessage::Aftertouch {
            channel,
            value: first,
        },
        T::PitchWheel => MidiMessage::PitchWheel {
            channel,
            pitch: PitchBend::from_wire(first, second),
        },
        T::QuarterFrame => MidiMessage::QuarterFrame(QuarterFrame::from_wire(first)),
        T::SongPosition => MidiMessage::SongPosition {
            pos: SongPosition::from_wire(first, second),
        },
        T::SongSelect => MidiMessage::SongSelect { song: first },
        T::TuneRequest => MidiMessage::TuneRequest,
        T::Clock => MidiMessage::Clock,
        T::Start => MidiMessage::Start,
        T::Continue => MidiMessage::Continue,
        T::Stop => MidiMessage::Stop,
        T::ActiveSensing => MidiMessage::ActiveSensing,
        T::Reset => MidiMessage::Reset,
        // variable length, handled above
        T::SysEx => return Err(MessageError::UnterminatedSysEx),
    })
}

/// Encodes a message into its wire bytes.
///
/// Channel messages fold the channel into the low nibble of the status
/// byte; 14-bit values are sent low 7 bits first.
pub fn encode(message: &MidiMessage) -> Vec<u8> {
    let mut out = Vec::with_capacity(message.wire_len());
    encode_into(message, &mut out);
    out
}

/// Appends the wire bytes of `message` to `out`.
pub fn encode_into(message: &MidiMessage, out: &mut Vec<u8>) {
    let status = message.message_type().spec().status
        | message.channel().map(Channel::index).unwrap_or(0);
    match message {
        MidiMessage::NoteOff { note, velocity, .. }
        | MidiMessage::NoteOn { note, velocity, .. } => {
            out.extend_from_slice(&[status, note.value(), velocity.value()])
        }
        MidiMessage::PolyTouch { note, value, .. } => {
            out.extend_from_slice(&[status, note.value(), value.value()])
        }
        MidiMessage::ControlChange { control, value, .. } => {
            out.extend_from_slice(&[status, control.value(), value.value()])
        }
        MidiMessage::ProgramChange { program, .. } => {
            out.extend_from_slice(&[status, program.value()])
        }
        MidiMessage::Aftertouch { value, .. } => out.extend_from_slice(&[status, value.value()]),
        MidiMessage::PitchWheel { pitch, .. } => {
            let [lsb, msb] = pitch.to_wire();
            out.extend_from_slice(&[status, lsb, msb])
        }
        MidiMessage::SysEx { data } => {
            out.push(SYSEX_START);
            out.extend_from_slice(data.as_slice());
            out.push(SYSEX_END);
        }
        MidiMessage::QuarterFrame(qf) => out.extend_from_slice(&[status, qf.to_wire()]),
        MidiMessage::SongPosition { pos } => {
            let [lsb, msb] = pos.to_wire();
            out.extend_from_slice(&[status, lsb, msb])
        }
        MidiMessage::SongSelect { song } => out.extend_from_slice(&[status, song.value()]),
        MidiMessage::TuneRequest
        | MidiMessage::Clock
        | MidiMessage::Start
        | MidiMessage::Continue
        | MidiMessage::Stop
        | MidiMessage::ActiveSensing
        | MidiMessage::Reset => out.push(status),
    }
}
