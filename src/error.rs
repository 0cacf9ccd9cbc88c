use thiserror::Error;

use crate::{
    file::meta::MetaType,
    message::{Attribute, MessageType},
};

/// Errors raised while decoding, encoding or constructing a live
/// [`Message`](crate::message::Message).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessageError {
    /// A frame with no bytes at all
    #[error("Message frame is empty")]
    EmptyFrame,
    /// The frame does not start with a status byte
    #[error("Message frame starts with data byte 0x{0:02X} instead of a status byte")]
    MissingStatus(u8),
    /// No message is defined for this status byte
    #[error("Undefined status byte 0x{0:02X}")]
    UndefinedStatus(u8),
    /// A byte after the status byte had its leading bit set
    #[error("Data byte 0x{0:02X} is out of range 0..127")]
    InvalidDataByte(u8),
    /// The frame is too short or too long for its status byte
    #[error("{message_type} message must be {expected} bytes long, found {found}")]
    InvalidLength {
        /// The message type identified by the status byte
        message_type: MessageType,
        /// Wire length of the message type
        expected: usize,
        /// Length of the frame
        found: usize,
    },
    /// A system exclusive frame without its trailing `0xF7`
    #[error("System exclusive frame is not terminated by 0xF7")]
    UnterminatedSysEx,
    /// An attribute value outside of its declared range
    #[error(
        "{attribute} must be in range {}..{}, got {value}",
        .attribute.min_value(),
        .attribute.max_value()
    )]
    OutOfRange {
        /// The offending attribute
        attribute: Attribute,
        /// The value that was rejected
        value: i32,
    },
    /// The attribute is not part of this message type
    #[error("{message_type} message has no attribute {attribute}")]
    NoSuchAttribute {
        /// The message type
        message_type: MessageType,
        /// The attribute that was requested
        attribute: Attribute,
    },
    /// The name does not identify any message type
    #[error("Invalid message type {0:?}")]
    InvalidMessageType(String),
    /// Message time must be a finite, non-negative number of seconds
    #[error("Message time must be finite and non-negative")]
    InvalidTime,
}

/// A key signature meta event with an impossible key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeySignatureError {
    /// More than seven sharps or flats
    #[error("Key signature can not have {0} accidentals")]
    Accidentals(i8),
    /// Mode byte that is neither major (0) nor minor (1)
    #[error("Key signature mode must be 0 or 1, got {0}")]
    Mode(u8),
    /// A key name that is not in the circle of fifths
    #[error("Unknown key {0:?}")]
    UnknownKey(String),
}

/// Errors found in an SMPTE offset meta event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SmpteError {
    /// The payload is not five bytes
    #[error("SMPTE offset must be 5 bytes, got {0}")]
    Length(usize),
    /// The two frame rate bits
    #[error("Invalid SMPTE frame rate type {0}")]
    TrackFrame(u8),
    /// Hours above 23
    #[error("Invalid SMPTE hour offset {0}")]
    HourOffset(u8),
    /// Minutes above 59
    #[error("Invalid SMPTE minute offset {0}")]
    MinuteOffset(u8),
    /// Seconds above 59
    #[error("Invalid SMPTE second offset {0}")]
    SecondOffset(u8),
    /// Subframes above 99
    #[error("Invalid SMPTE subframe {0}")]
    Subframe(u8),
}

/// Errors from the meta event registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetaError {
    /// Key signature validation
    #[error("Key signature: {0}")]
    KeySignature(#[from] KeySignatureError),
    /// SMPTE offset validation
    #[error("SMPTE offset: {0}")]
    Smpte(#[from] SmpteError),
    /// A fixed size payload that is too short
    #[error("{meta_type} meta event needs {expected} bytes, found {found}")]
    Length {
        /// The meta type
        meta_type: MetaType,
        /// Bytes required by the meta type
        expected: usize,
        /// Bytes present
        found: usize,
    },
    /// The declared length of a raw meta event differs from its payload
    #[error("Meta event declares {declared} bytes of data, but {found} follow")]
    DeclaredLength {
        /// Length in the VLQ field
        declared: usize,
        /// Bytes actually present
        found: usize,
    },
    /// The bytes are not a meta event
    #[error("Meta events start with 0xFF, found 0x{0:02X}")]
    NotMeta(u8),
    /// Tempo does not fit in 24 bits
    #[error("Tempo {0} does not fit in 24 bits")]
    Tempo(u32),
    /// Channel prefix above 15
    #[error("Channel prefix {0} is out of range 0..15")]
    ChannelPrefix(u8),
    /// Time signature denominator that is not a power of two
    #[error("Time signature denominator {0} is not a power of two")]
    TimeSignatureDenominator(u32),
    /// Text that can not be represented in the chosen charset
    #[error("Character {0:?} can not be encoded as latin-1")]
    Charset(char),
}

/// Errors found in the `MThd` chunk.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    /// The first chunk is not `MThd`
    #[error("MThd not found, found {0:?}. Probably not a MIDI file")]
    NotAMidiFile([u8; 4]),
    /// Fewer bytes than a chunk header or a six byte header payload
    #[error("Header is truncated")]
    Truncated,
    /// Format other than 0, 1 or 2
    #[error("Invalid format {0} (must be 0, 1 or 2)")]
    InvalidFormat(u16),
    /// Zero ticks per beat or SMPTE division
    #[error("Unsupported division 0x{0:04X}")]
    InvalidDivision(u16),
}

/// Errors found while reading an `MTrk` chunk.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackError {
    /// The chunk where a track was expected is not `MTrk`
    #[error("No MTrk header at start of track, found {0:?}")]
    MissingMTrk([u8; 4]),
    /// The chunk length points past the end of the data
    #[error("Track chunk declares {declared} bytes, only {available} available")]
    Truncated {
        /// Length in the chunk header
        declared: u32,
        /// Bytes actually present
        available: usize,
    },
    /// An event continues past the end of its chunk
    #[error("Event runs past the end of its track chunk")]
    EventOverrun,
    /// The file ends before all declared tracks were read
    #[error("Header declares {expected} tracks, found {found}")]
    MissingTrack {
        /// Track count in the header
        expected: u16,
        /// Tracks read
        found: u16,
    },
}

/// Errors produced by the Standard MIDI File codec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FileError {
    /// Missing or garbled `MThd`
    #[error("Malformed header: {0}")]
    MalformedHeader(#[from] HeaderError),
    /// Missing `MTrk` or truncated track chunk
    #[error("Malformed track: {0}")]
    MalformedTrack(#[from] TrackError),
    /// A data byte where a status byte was required
    #[error("Running status without a preceding status byte")]
    RunningStatus,
    /// An event longer than the configured maximum
    #[error("Event length {length} exceeds maximum length {max}")]
    OversizedEvent {
        /// Declared event length
        length: usize,
        /// Configured ceiling
        max: usize,
    },
    /// A variable length quantity with more than four bytes
    #[error("Variable length quantity is longer than four bytes")]
    VlqOverflow,
    /// A channel or system message failed to decode
    #[error("Message: {0}")]
    Message(#[from] MessageError),
    /// A meta event failed to decode or encode
    #[error("Meta event: {0}")]
    Meta(#[from] MetaError),
    /// Tracks of a format 2 file are not synchronous
    #[error("Can't merge tracks in type 2 (asynchronous) file")]
    AsynchronousTracks,
    /// Realtime messages can not be stored in a file
    #[error("Realtime message {0} is not allowed in MIDI files")]
    RealtimeInFile(MessageType),
    /// Delta time does not fit in a four byte variable length quantity
    #[error("Delta time {0} does not fit in a variable length quantity")]
    DeltaTimeOverflow(u32),
    /// Format 0 files hold exactly one track
    #[error("Type 0 file must have exactly 1 track, has {0}")]
    Format0TrackCount(usize),
    /// The header stores the track count in 16 bits
    #[error("{0} tracks do not fit in a MIDI file header")]
    TooManyTracks(usize),
    /// Ticks per beat must be in 1..=0x7FFF
    #[error("Invalid ticks per beat {0}")]
    InvalidTicksPerBeat(u16),
}

impl FileError {
    /// True for the `MThd` family of errors
    pub const fn is_malformed_header(&self) -> bool {
        matches!(self, Self::MalformedHeader(_))
    }
    /// True for the `MTrk` family of errors
    pub const fn is_malformed_track(&self) -> bool {
        matches!(self, Self::MalformedTrack(_))
    }
}

/// Errors while writing a file.
#[derive(Debug, Error)]
pub enum WriteError {
    /// The file content can not be encoded
    #[error("{0}")]
    File(#[from] FileError),
    /// The sink failed
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),
}
