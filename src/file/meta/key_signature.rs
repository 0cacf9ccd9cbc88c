use core::{fmt, str::FromStr};

use crate::KeySignatureError;

const MAJOR_KEYS: [&str; 15] = [
    "Cb", "Gb", "Db", "Ab", "Eb", "Bb", "F", "C", "G", "D", "A", "E", "B", "F#", "C#",
];
const MINOR_KEYS: [&str; 15] = [
    "Abm", "Ebm", "Bbm", "Fm", "Cm", "Gm", "Dm", "Am", "Em", "Bm", "F#m", "C#m", "G#m", "D#m",
    "A#m",
];

/// A key, stored the way a key signature meta event does: a count of
/// sharps (positive) or flats (negative) and a mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeySignature {
    accidentals: i8,
    minor: bool,
}

impl Default for KeySignature {
    /// C major
    fn default() -> Self {
        Self {
            accidentals: 0,
            minor: false,
        }
    }
}

impl KeySignature {
    /// `accidentals` must lie in `-7..=7`
    pub const fn new(accidentals: i8, minor: bool) -> Result<Self, KeySignatureError> {
        if accidentals < -7 || accidentals > 7 {
            return Err(KeySignatureError::Accidentals(accidentals));
        }
        Ok(Self { accidentals, minor })
    }

    /// Decodes `sf mi`. `sf` is a two's complement byte, `mi` is 0 for major
    /// and 1 for minor.
    pub const fn from_bytes([sf, mi]: [u8; 2]) -> Result<Self, KeySignatureError> {
        let minor = match mi {
            0 => false,
            1 => true,
            other => return Err(KeySignatureError::Mode(other)),
        };
        Self::new(sf as i8, minor)
    }

    /// Inverse of [`KeySignature::from_bytes`]
    pub const fn to_bytes(&self) -> [u8; 2] {
        [self.accidentals as u8, self.minor as u8]
    }

    /// Sharps if positive, flats if negative
    pub const fn accidentals(&self) -> i8 {
        self.accidentals
    }

    /// True for minor keys
    pub const fn is_minor(&self) -> bool {
        self.minor
    }

    /// `"C"`, `"F#"`, `"Bbm"` and so on
    pub const fn name(&self) -> &'static str {
        let index = (self.accidentals + 7) as usize;
        if self.minor {
            MINOR_KEYS[index]
        } else {
            MAJOR_KEYS[index]
        }
    }
}

impl fmt::Display for KeySignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for KeySignature {
    type Err = KeySignatureError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (keys, minor) = if s.ends_with('m') {
            (&MINOR_KEYS, true)
        } else {
            (&MAJOR_KEYS, false)
        };
        let index = keys
            .iter()
            .position(|key| *key == s)
            .ok_or_else(|| KeySignatureError::UnknownKey(s.to_owned()))?;
        Self::new(index as i8 - 7, minor)
    }
}
