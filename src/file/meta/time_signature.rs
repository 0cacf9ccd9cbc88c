use core::fmt;

use crate::MetaError;

/// A time signature change.
///
/// On disk the denominator is stored as a power of two, so only powers of
/// two are representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeSignature {
    numerator: u8,
    denominator_exponent: u8,
    clocks_per_click: u8,
    notated_32nd_notes_per_beat: u8,
}

impl Default for TimeSignature {
    /// 4/4, a click every quarter note, eight 32nds per beat
    fn default() -> Self {
        Self {
            numerator: 4,
            denominator_exponent: 2,
            clocks_per_click: 24,
            notated_32nd_notes_per_beat: 8,
        }
    }
}

impl TimeSignature {
    /// Fails unless `denominator` is a power of two
    pub fn new(
        numerator: u8,
        denominator: u32,
        clocks_per_click: u8,
        notated_32nd_notes_per_beat: u8,
    ) -> Result<Self, MetaError> {
        if !denominator.is_power_of_two() {
            return Err(MetaError::TimeSignatureDenominator(denominator));
        }
        Ok(Self {
            numerator,
            denominator_exponent: denominator.trailing_zeros() as u8,
            clocks_per_click,
            notated_32nd_notes_per_beat,
        })
    }

    /// `nn dd cc bb`. Denominator exponents that overflow a `u32` are
    /// rejected.
    pub fn from_bytes([nn, dd, cc, bb]: [u8; 4]) -> Result<Self, MetaError> {
        if dd >= 32 {
            return Err(MetaError::TimeSignatureDenominator(u32::MAX));
        }
        Ok(Self {
            numerator: nn,
            denominator_exponent: dd,
            clocks_per_click: cc,
            notated_32nd_notes_per_beat: bb,
        })
    }

    /// Inverse of [`TimeSignature::from_bytes`]
    pub const fn to_bytes(&self) -> [u8; 4] {
        [
            self.numerator,
            self.denominator_exponent,
            self.clocks_per_click,
            self.notated_32nd_notes_per_beat,
        ]
    }

    /// Beats per bar
    pub const fn numerator(&self) -> u8 {
        self.numerator
    }

    /// Note value of one beat
    pub const fn denominator(&self) -> u32 {
        1 << self.denominator_exponent
    }

    /// MIDI clocks per metronome click
    pub const fn clocks_per_click(&self) -> u8 {
        self.clocks_per_click
    }

    /// Thirty-second notes per 24 MIDI clocks
    pub const fn notated_32nd_notes_per_beat(&self) -> u8 {
        self.notated_32nd_notes_per_beat
    }
}

impl fmt::Display for TimeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn six_eight() {
        let sig = TimeSignature::from_bytes([6, 3, 36, 8]).unwrap();
        assert_eq!(sig.numerator(), 6);
        assert_eq!(sig.denominator(), 8);
        assert_eq!(sig.to_string(), "6/8");
        assert_eq!(TimeSignature::new(6, 8, 36, 8), Ok(sig));
    }

    #[test]
    fn denominator_must_be_power_of_two() {
        assert_eq!(
            TimeSignature::new(3, 6, 24, 8),
            Err(MetaError::TimeSignatureDenominator(6))
        );
        assert_eq!(TimeSignature::default().to_bytes(), [4, 2, 24, 8]);
    }
}
