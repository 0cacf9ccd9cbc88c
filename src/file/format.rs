use num_enum::{IntoPrimitive, TryFromPrimitive};

#[doc = r#"
The arrangement of tracks in a MIDI file, stored in the `MThd` chunk.

- Format 0: a single track holding every channel
- Format 1: several tracks played simultaneously; they share one tempo map
  and can be merged into a single time-ordered track
- Format 2: independent sequences (patterns), each with its own timing;
  these can not be merged or played back as one
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
pub enum FormatType {
    /// Format 0
    SingleMultiChannel = 0,
    /// Format 1
    Simultaneous = 1,
    /// Format 2
    SequentiallyIndependent = 2,
}

impl FormatType {
    /// True if the tracks share one timeline and may be merged
    pub const fn is_synchronous(&self) -> bool {
        !matches!(self, Self::SequentiallyIndependent)
    }
}

#[test]
fn format_from_header_word() {
    use pretty_assertions::assert_eq;
    assert_eq!(FormatType::try_from(1u16).unwrap(), FormatType::Simultaneous);
    assert!(FormatType::try_from(3u16).is_err());
    assert_eq!(u16::from(FormatType::SequentiallyIndependent), 2);
}
