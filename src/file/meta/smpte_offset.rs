#![doc = r#"
SMPTE offset, the time code at which a track starts

The payload is five bytes:

```text
0rrhhhhh  minute  second  frame  subframe
```

where `rr` selects the frame rate and `hhhhh` is the hour. Subframes are
hundredths of a frame. Files that use it normally carry it at tick zero of
the first track, before any sounding event.
"#]

use crate::SmpteError;

/// The four frame rates a SMPTE time code can run at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SmpteFps {
    /// Film
    #[default]
    TwentyFour,
    /// PAL and SECAM video
    TwentyFive,
    /// 29.97 fps, NTSC drop frame
    TwentyNine,
    /// 30 fps non-drop
    Thirty,
}

/// 30000/1001 frames per second
const DROP_FRAME: f64 = 30_000. / 1001.;

impl SmpteFps {
    /// The two rate bits of the hour byte
    pub const fn from_bits(bits: u8) -> Option<Self> {
        Some(match bits {
            0 => Self::TwentyFour,
            1 => Self::TwentyFive,
            2 => Self::TwentyNine,
            3 => Self::Thirty,
            _ => return None,
        })
    }

    /// Inverse of [`SmpteFps::from_bits`]
    pub const fn bits(&self) -> u8 {
        match self {
            Self::TwentyFour => 0,
            Self::TwentyFive => 1,
            Self::TwentyNine => 2,
            Self::Thirty => 3,
        }
    }

    /// The nominal frame count per second. Drop frame counts as 30.
    pub const fn as_division(&self) -> u8 {
        match self {
            Self::TwentyFour => 24,
            Self::TwentyFive => 25,
            Self::TwentyNine | Self::Thirty => 30,
        }
    }

    /// The real frame rate, `29.97..` for drop frame
    pub const fn as_f64(&self) -> f64 {
        match self {
            Self::TwentyFour => 24.,
            Self::TwentyFive => 25.,
            Self::TwentyNine => DROP_FRAME,
            Self::Thirty => 30.,
        }
    }
}

/// The starting position of a track in SMPTE time code.
///
/// Fields are public. [`SmpteOffset::to_bytes`] writes them as they are;
/// [`MetaMessage::payload`](super::MetaMessage::payload) validates them
/// before they reach a file.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SmpteOffset {
    /// Frame rate of the time code
    pub fps: SmpteFps,
    /// 0..=23
    pub hour: u8,
    /// 0..=59
    pub minute: u8,
    /// 0..=59
    pub second: u8,
    /// Frame within the second
    pub frame: u8,
    /// Hundredths of a frame, 0..=99
    pub subframe: u8,
}

impl SmpteOffset {
    /// Offset in microseconds, counting frames at `fps` instead of the
    /// offset's own rate.
    pub const fn as_micros_with_override(&self, fps: SmpteFps) -> f64 {
        ((((self.hour as u64 * 3600) + (self.minute as u64) * 60 + self.second as u64) * 1_000_000)
            as f64)
            + ((self.frame as u64) * 1_000_000) as f64 / fps.as_f64()
            + ((self.subframe as u32) * 10_000) as f64 / fps.as_f64()
    }

    /// Offset in microseconds
    pub const fn as_micros(&self) -> f64 {
        self.as_micros_with_override(self.fps)
    }

    /// Offset in seconds
    pub const fn as_seconds(&self) -> f64 {
        self.as_micros() / 1_000_000.
    }

    /// Parses the five byte payload.
    ///
    /// # Errors
    /// - [`SmpteError::Length`] if `data` is not five bytes long
    /// - [`SmpteError::TrackFrame`] if the rate bits are out of range
    /// - [`SmpteError::HourOffset`], [`SmpteError::MinuteOffset`],
    ///   [`SmpteError::SecondOffset`] or [`SmpteError::Subframe`] for
    ///   fields past their limits
    pub const fn parse(data: &[u8]) -> Result<Self, SmpteError> {
        if data.len() != 5 {
            return Err(SmpteError::Length(data.len()));
        }

        // 0 rr hhhhh
        let Some(fps) = SmpteFps::from_bits(data[0] >> 5) else {
            return Err(SmpteError::TrackFrame(data[0] >> 5));
        };
        let hour = data[0] & 0b0001_1111;
        if hour > 23 {
            return Err(SmpteError::HourOffset(hour));
        }
        let minute = data[1];
        if minute > 59 {
            return Err(SmpteError::MinuteOffset(minute));
        }
        let second = data[2];
        if second > 59 {
            return Err(SmpteError::SecondOffset(second));
        }
        let frame = data[3];
        let subframe = data[4];
        if subframe > 99 {
            return Err(SmpteError::Subframe(subframe));
        }
        Ok(Self {
            fps,
            hour,
            minute,
            second,
            frame,
            subframe,
        })
    }

    /// The five byte payload, unvalidated
    pub const fn to_bytes(&self) -> [u8; 5] {
        [
            (self.fps.bits() << 5) | (self.hour & 0b0001_1111),
            self.minute,
            self.second,
            self.frame,
            self.subframe,
        ]
    }
}
