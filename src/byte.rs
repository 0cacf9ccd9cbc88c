use core::fmt;

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::MessageError;

/// A byte with a leading `0` bit, the only kind of byte allowed after a status byte.
///
/// Holds `0..=127`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "u8", into = "u8")
)]
pub struct DataByte(pub(crate) u8);

impl DataByte {
    /// The largest representable data byte.
    pub const MAX: DataByte = DataByte(0x7F);

    /// Checks for correctness (leading 0 bit).
    pub const fn new(byte: u8) -> Result<Self, MessageError> {
        if byte > 0x7F {
            return Err(MessageError::InvalidDataByte(byte));
        }
        Ok(Self(byte))
    }

    /// Clamps anything above `0x7F` to `0x7F`.
    pub const fn new_clipped(byte: u8) -> Self {
        if byte > 0x7F { Self(0x7F) } else { Self(byte) }
    }

    /// Returns the inner byte
    #[inline]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for DataByte {
    type Error = MessageError;
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DataByte> for u8 {
    fn from(value: DataByte) -> Self {
        value.0
    }
}

impl fmt::Display for DataByte {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[doc = r#"
The MIDI channel a channel message is addressed to.

On the wire this is the low nibble of the status byte, so
[`Channel::One`] is `0` and [`Channel::Sixteen`] is `15`.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
#[allow(missing_docs)]
pub enum Channel {
    One = 0,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Eleven,
    Twelve,
    Thirteen,
    Fourteen,
    Fifteen,
    Sixteen,
}

impl Channel {
    /// All sixteen channels in wire order.
    pub const ALL: [Channel; 16] = [
        Channel::One,
        Channel::Two,
        Channel::Three,
        Channel::Four,
        Channel::Five,
        Channel::Six,
        Channel::Seven,
        Channel::Eight,
        Channel::Nine,
        Channel::Ten,
        Channel::Eleven,
        Channel::Twelve,
        Channel::Thirteen,
        Channel::Fourteen,
        Channel::Fifteen,
        Channel::Sixteen,
    ];

    /// Extracts the channel from the low nibble of a status byte.
    pub const fn from_status(status: u8) -> Self {
        Self::ALL[(status & 0x0F) as usize]
    }

    /// Returns the channel as its zero based wire index
    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }
}

#[test]
fn data_byte_rejects_leading_bit() {
    use pretty_assertions::assert_eq;
    assert_eq!(DataByte::new(0x7F), Ok(DataByte(0x7F)));
    assert_eq!(DataByte::new(0x80), Err(MessageError::InvalidDataByte(0x80)));
    assert_eq!(DataByte::new_clipped(0xFF), DataByte::MAX);
}

#[test]
fn channel_from_status_nibble() {
    use pretty_assertions::assert_eq;
    assert_eq!(Channel::from_status(0x9A), Channel::Eleven);
    assert_eq!(Channel::try_from(15u8).unwrap(), Channel::Sixteen);
    assert!(Channel::try_from(16u8).is_err());
}
