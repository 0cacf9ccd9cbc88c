use core::fmt;

use crate::{MetaError, file::meta::TimeSignature};

/// Microseconds per quarter note, as carried by a set tempo event.
///
/// The value fits in 24 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "u32", into = "u32")
)]
pub struct Tempo(u32);

impl Default for Tempo {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl Tempo {
    /// 500 000 µs per beat, 120 BPM. Assumed until a file says otherwise.
    pub const DEFAULT: Self = Self(500_000);
    /// Largest value the three byte payload holds
    pub const MAX: u32 = 0x00FF_FFFF;

    /// Fails above [`Tempo::MAX`]
    pub const fn new(micros_per_quarter_note: u32) -> Result<Self, MetaError> {
        if micros_per_quarter_note > Self::MAX {
            return Err(MetaError::Tempo(micros_per_quarter_note));
        }
        Ok(Self(micros_per_quarter_note))
    }

    /// From quarter notes per minute, rounded to the nearest microsecond
    pub fn from_bpm(bpm: f64) -> Result<Self, MetaError> {
        Self::new(crate::file::bpm_to_tempo(bpm, TimeSignature::default()))
    }

    /// Big-endian 24 bit payload
    pub const fn from_bytes([b0, b1, b2]: [u8; 3]) -> Self {
        Self(u32::from_be_bytes([0, b0, b1, b2]))
    }

    /// Inverse of [`Tempo::from_bytes`]
    pub const fn to_bytes(&self) -> [u8; 3] {
        let [_, b0, b1, b2] = self.0.to_be_bytes();
        [b0, b1, b2]
    }

    /// Microseconds per quarter note
    pub const fn micros_per_quarter_note(&self) -> u32 {
        self.0
    }

    /// Quarter notes per minute
    pub fn bpm(&self) -> f64 {
        crate::file::tempo_to_bpm(self.0, TimeSignature::default())
    }
}

impl TryFrom<u32> for Tempo {
    type Error = MetaError;
    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Tempo> for u32 {
    fn from(value: Tempo) -> Self {
        value.0
    }
}

impl fmt::Display for Tempo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} µs/qn", self.0)
    }
}

#[test]
fn tempo_bytes() {
    use pretty_assertions::assert_eq;
    let tempo = Tempo::from_bytes([0x07, 0xA1, 0x20]);
    assert_eq!(tempo, Tempo::DEFAULT);
    assert_eq!(tempo.bpm(), 120.);
    assert_eq!(tempo.to_bytes(), [0x07, 0xA1, 0x20]);
    assert_eq!(Tempo::new(0x0100_0000), Err(MetaError::Tempo(0x0100_0000)));
    assert_eq!(Tempo::from_bpm(60.), Tempo::new(1_000_000));
}

#[cfg(feature = "serde")]
#[test]
fn tempo_deserializes_within_24_bits() {
    assert_eq!(serde_json::from_str::<Tempo>("500000").unwrap(), Tempo::DEFAULT);
    assert!(serde_json::from_str::<Tempo>("16777216").is_err());
}
