use crate::{
    MessageError,
    file::meta::MetaMessage,
    message::{Message, MidiMessage, SysExData},
};

/// What a track event carries.
///
/// A track holds three kinds of events: plain MIDI messages, system
/// exclusive payloads and meta events. Meta events never leave a file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrackMessage {
    /// A channel or system message. Time lives on the surrounding event.
    Midi(MidiMessage),
    /// A system exclusive payload, without the `F0`/`F7` markers
    SysEx(SysExData),
    /// A meta event
    Meta(MetaMessage),
}

impl TrackMessage {
    /// True for meta events
    pub const fn is_meta(&self) -> bool {
        matches!(self, Self::Meta(_))
    }

    /// The meta event, if this is one
    pub const fn meta(&self) -> Option<&MetaMessage> {
        match self {
            Self::Meta(meta) => Some(meta),
            _ => None,
        }
    }

    /// The content as a live message, `None` for meta events
    pub fn to_midi(&self) -> Option<MidiMessage> {
        match self {
            Self::Midi(message) => Some(message.clone()),
            Self::SysEx(data) => Some(MidiMessage::SysEx { data: data.clone() }),
            Self::Meta(_) => None,
        }
    }
}

impl From<MidiMessage> for TrackMessage {
    /// System exclusive messages become [`TrackMessage::SysEx`]
    fn from(message: MidiMessage) -> Self {
        match message {
            MidiMessage::SysEx { data } => Self::SysEx(data),
            other => Self::Midi(other),
        }
    }
}

impl From<MetaMessage> for TrackMessage {
    fn from(meta: MetaMessage) -> Self {
        Self::Meta(meta)
    }
}

/// An event in a track, timed in ticks since the previous event.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackEvent {
    delta_time: u32,
    message: TrackMessage,
}

impl TrackEvent {
    /// Create a new track event
    pub fn new(delta_time: u32, message: impl Into<TrackMessage>) -> Self {
        Self {
            delta_time,
            message: message.into(),
        }
    }

    /// Ticks since the previous event in the track
    pub const fn delta_time(&self) -> u32 {
        self.delta_time
    }

    /// The same event at another delta time
    pub fn with_delta_time(mut self, delta_time: u32) -> Self {
        self.delta_time = delta_time;
        self
    }

    /// Sets the delta time in place
    pub fn set_delta_time(&mut self, delta_time: u32) {
        self.delta_time = delta_time;
    }

    /// The content
    pub const fn message(&self) -> &TrackMessage {
        &self.message
    }

    /// Unwraps the content
    pub fn into_message(self) -> TrackMessage {
        self.message
    }

    /// True for meta events
    pub const fn is_meta(&self) -> bool {
        self.message.is_meta()
    }

    /// A live message timed at `time` seconds, `None` for meta events
    pub fn to_message(&self, time: f64) -> Option<Result<Message, MessageError>> {
        self.message.to_midi().map(|message| Message::new(message, time))
    }
}
