use crate::{DataByte, MessageError, message::Attribute};

/// Combines two 7-bit halves, low half first as they appear on the wire.
#[inline]
pub(crate) const fn join_14_bit(lsb: DataByte, msb: DataByte) -> u16 {
    lsb.0 as u16 | ((msb.0 as u16) << 7)
}

/// Splits a 14-bit value into `[lsb, msb]`.
#[inline]
pub(crate) const fn split_14_bit(value: u16) -> [u8; 2] {
    [(value & 0x7F) as u8, ((value >> 7) & 0x7F) as u8]
}

#[doc = r#"
A pitchwheel position, centered on zero.

The logical range is `-8192..=8191`. On the wire it is sent as an
unsigned 14-bit value with `8192` as center.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "i16", into = "i16")
)]
pub struct PitchBend(i16);

impl PitchBend {
    /// No bend
    pub const CENTER: PitchBend = PitchBend(0);

    /// Validates the logical value
    pub fn new(value: i32) -> Result<Self, MessageError> {
        Attribute::Pitch.check(value).map(|value| Self(value as i16))
    }

    /// Builds the value from its two wire bytes
    pub const fn from_wire(lsb: DataByte, msb: DataByte) -> Self {
        Self(join_14_bit(lsb, msb) as i16 - 8192)
    }

    /// Returns the logical value
    pub const fn value(&self) -> i16 {
        self.0
    }

    /// Returns `[lsb, msb]`
    pub const fn to_wire(&self) -> [u8; 2] {
        split_14_bit((self.0 as i32 + 8192) as u16)
    }
}

impl TryFrom<i16> for PitchBend {
    type Error = MessageError;
    fn try_from(value: i16) -> Result<Self, Self::Error> {
        Self::new(value.into())
    }
}

impl From<PitchBend> for i16 {
    fn from(value: PitchBend) -> Self {
        value.0
    }
}

/// Song position pointer, in MIDI beats (sixteenth notes) from the start of the song.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "u16", into = "u16")
)]
pub struct SongPosition(u16);

impl SongPosition {
    /// Validates `0..=16383`
    pub fn new(value: i32) -> Result<Self, MessageError> {
        Attribute::Pos.check(value).map(|value| Self(value as u16))
    }

    /// Builds the value from its two wire bytes
    pub const fn from_wire(lsb: DataByte, msb: DataByte) -> Self {
        Self(join_14_bit(lsb, msb))
    }

    /// Returns the position
    pub const fn value(&self) -> u16 {
        self.0
    }

    /// Returns `[lsb, msb]`
    pub const fn to_wire(&self) -> [u8; 2] {
        split_14_bit(self.0)
    }
}

impl TryFrom<u16> for SongPosition {
    type Error = MessageError;
    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value.into())
    }
}

impl From<SongPosition> for u16 {
    fn from(value: SongPosition) -> Self {
        value.0
    }
}

/// One piece of an MTC quarter frame: a 3 bit piece selector and a 4 bit value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "u8", into = "u8")
)]
pub struct QuarterFrame {
    frame_type: u8,
    frame_value: u8,
}

impl QuarterFrame {
    /// `frame_type` must be `0..=7`, `frame_value` must be `0..=15`
    pub fn new(frame_type: i32, frame_value: i32) -> Result<Self, MessageError> {
        let frame_type = Attribute::FrameType.check(frame_type)?;
        let frame_value = Attribute::FrameValue.check(frame_value)?;
        Ok(Self {
            frame_type: frame_type as u8,
            frame_value: frame_value as u8,
        })
    }

    /// Splits the single data byte of the message
    pub const fn from_wire(byte: DataByte) -> Self {
        Self {
            frame_type: byte.0 >> 4,
            frame_value: byte.0 & 0x0F,
        }
    }

    /// The piece selector
    pub const fn frame_type(&self) -> u8 {
        self.frame_type
    }

    /// The piece value
    pub const fn frame_value(&self) -> u8 {
        self.frame_value
    }

    /// The single data byte of the message
    pub const fn to_wire(&self) -> u8 {
        (self.frame_type << 4) | self.frame_value
    }
}

impl TryFrom<u8> for QuarterFrame {
    type Error = MessageError;
    /// From the single data byte of the message
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        DataByte::new(value).map(Self::from_wire)
    }
}

impl From<QuarterFrame> for u8 {
    fn from(value: QuarterFrame) -> Self {
        value.to_wire()
    }
}

#[doc = r#"
The payload of a system exclusive message, without the `0xF0`/`0xF7` markers.

Every byte is a data byte (`0..=127`).
"#]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<u8>", into = "Vec<u8>")
)]
pub struct SysExData(Vec<u8>);

impl SysExData {
    /// Validates every byte
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, MessageError> {
        let bytes = bytes.into();
        if let Some(&bad) = bytes.iter().find(|&&b| b > 0x7F) {
            return Err(MessageError::InvalidDataByte(bad));
        }
        Ok(Self(bytes))
    }

    /// Clamps every byte above `0x7F` to `0x7F`
    pub fn new_clipped(bytes: impl Into<Vec<u8>>) -> Self {
        let mut bytes = bytes.into();
        bytes.iter_mut().for_each(|b| *b = (*b).min(0x7F));
        Self(bytes)
    }

    /// Returns the payload
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Number of payload bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if there is no payload
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Appends more payload, validating it
    pub fn extend_from_slice(&mut self, bytes: &[u8]) -> Result<(), MessageError> {
        if let Some(&bad) = bytes.iter().find(|&&b| b > 0x7F) {
            return Err(MessageError::InvalidDataByte(bad));
        }
        self.0.extend_from_slice(bytes);
        Ok(())
    }
}

impl TryFrom<Vec<u8>> for SysExData {
    type Error = MessageError;
    fn try_from(value: Vec<u8>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl AsRef<[u8]> for SysExData {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<SysExData> for Vec<u8> {
    fn from(value: SysExData) -> Self {
        value.0
    }
}
