#![doc = r#"
MIDI file chunks

# Overview

MIDI files are organized into chunks, each identified by a 4-character ASCII type identifier
followed by a 32-bit big-endian length field and then the chunk data. Chunks are not padded.

## Header chunk

The header chunk (identified by "MThd") must be the first chunk in a MIDI file. Its payload
is at least 6 bytes:

```text
format:u16  ntracks:u16  division:u16
```

- [`FormatType`], which identifies how tracks should be played
  (single track, simultaneous tracks, or independent tracks)
- the number of track chunks that follow
- the division, here ticks per quarter note (beat). SMPTE divisions (top bit set)
  are rejected.

## Track Chunks

Track chunks (identified by "MTrk") contain the actual MIDI events and timing information,
a sequence of delta-time prefixed [`TrackEvent`](crate::file::TrackEvent)s.

# Example Structure

```text
[Header Chunk: "MThd"]
[Track Chunk 1: "MTrk"]
[Track Chunk 2: "MTrk"]
...
[Track Chunk N: "MTrk"]
```
"#]
use crate::{FileError, HeaderError, file::FormatType};

/// Tag of the header chunk
pub const HEADER_TAG: [u8; 4] = *b"MThd";
/// Tag of a track chunk
pub const TRACK_TAG: [u8; 4] = *b"MTrk";

/// The eight bytes in front of every chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    /// Four ASCII characters
    pub tag: [u8; 4],
    /// Length of the payload in bytes
    pub length: u32,
}

impl ChunkHeader {
    /// Splits the tag from the big-endian length
    pub const fn from_bytes(bytes: [u8; 8]) -> Self {
        Self {
            tag: [bytes[0], bytes[1], bytes[2], bytes[3]],
            length: u32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
        }
    }

    /// True for `MThd`
    pub fn is_header(&self) -> bool {
        self.tag == HEADER_TAG
    }

    /// True for `MTrk`
    pub fn is_track(&self) -> bool {
        self.tag == TRACK_TAG
    }
}

/// The decoded payload of the `MThd` chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    format: FormatType,
    num_tracks: u16,
    ticks_per_beat: u16,
}

impl Header {
    /// Builds a header, validating the division
    pub fn new(
        format: FormatType,
        num_tracks: u16,
        ticks_per_beat: u16,
    ) -> Result<Self, FileError> {
        check_ticks_per_beat(ticks_per_beat)?;
        Ok(Self {
            format,
            num_tracks,
            ticks_per_beat,
        })
    }

    /// Parses the payload of an `MThd` chunk. Bytes beyond the sixth are ignored.
    pub fn parse(payload: &[u8]) -> Result<Self, HeaderError> {
        let [f0, f1, n0, n1, d0, d1, ..] = *payload else {
            return Err(HeaderError::Truncated);
        };
        let format = u16::from_be_bytes([f0, f1]);
        let format = FormatType::try_from(format).map_err(|_| HeaderError::InvalidFormat(format))?;
        let division = u16::from_be_bytes([d0, d1]);
        if division == 0 || division & 0x8000 != 0 {
            return Err(HeaderError::InvalidDivision(division));
        }
        Ok(Self {
            format,
            num_tracks: u16::from_be_bytes([n0, n1]),
            ticks_per_beat: division,
        })
    }

    /// The six byte payload
    pub fn to_bytes(&self) -> [u8; 6] {
        let [f0, f1] = u16::from(self.format).to_be_bytes();
        let [n0, n1] = self.num_tracks.to_be_bytes();
        let [d0, d1] = self.ticks_per_beat.to_be_bytes();
        [f0, f1, n0, n1, d0, d1]
    }

    /// Format of the file
    pub const fn format(&self) -> FormatType {
        self.format
    }

    /// Number of track chunks that follow
    pub const fn num_tracks(&self) -> u16 {
        self.num_tracks
    }

    /// Ticks per quarter note
    pub const fn ticks_per_beat(&self) -> u16 {
        self.ticks_per_beat
    }
}

pub(crate) fn check_ticks_per_beat(ticks_per_beat: u16) -> Result<u16, FileError> {
    if ticks_per_beat == 0 || ticks_per_beat > 0x7FFF {
        return Err(FileError::InvalidTicksPerBeat(ticks_per_beat));
    }
    Ok(ticks_per_beat)
}

/// Appends a complete chunk: tag, big-endian length and payload.
pub fn write_chunk(out: &mut Vec<u8>, tag: [u8; 4], payload: &[u8]) {
    out.extend_from_slice(&tag);
    out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    out.extend_from_slice(payload);
}
