#![doc = r#"
Reading Standard MIDI Files

The [`Reader`] walks a byte slice chunk by chunk. It reads the `MThd`
header, then exactly as many `MTrk` chunks as the header declares, and
decodes every event inside them. Any error stops reading at once and
reports the offset at which it was found.

# Leniency
Malformed files are common in the wild. [`ReadOptions::clip`] clamps data
bytes above `0x7F` instead of failing. Every other problem is fatal.

# Example
```rust
# use midiwire::prelude::*;
let bytes = [
    b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 0, 0, 1, 0, 96,
    b'M', b'T', b'r', b'k', 0, 0, 0, 8,
    0x00, 0x90, 0x3C, 0x64,
    0x60, 0xFF, 0x2F, 0x00,
];
let file = Reader::from_byte_slice(&bytes).read_file().unwrap();
assert_eq!(file.ticks_per_beat(), 96);
assert_eq!(file.tracks()[0].len(), 2);
```
"#]

mod error;
pub use error::*;

use tracing::{debug, warn};

use crate::{
    FileError, HeaderError, MessageError, TrackError,
    file::{
        FormatType, MidiFile, MidiTrack, TrackEvent, TrackMessage,
        chunk::{ChunkHeader, Header},
        meta::{Charset, META_STATUS, MetaMessage},
        vlq::decode_vlq,
    },
    message::{SYSEX_END, SYSEX_START, SysExData, decode_message, spec_by_status},
};

/// Largest event payload accepted by default, in bytes
pub const DEFAULT_MAX_EVENT_LENGTH: usize = 1_000_000;

/// Knobs for [`Reader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReadOptions {
    clip: bool,
    max_event_length: usize,
    charset: Charset,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            clip: false,
            max_event_length: DEFAULT_MAX_EVENT_LENGTH,
            charset: Charset::Latin1,
        }
    }
}

impl ReadOptions {
    /// Strict reading, [`DEFAULT_MAX_EVENT_LENGTH`], Latin-1 text
    pub fn new() -> Self {
        Self::default()
    }

    /// Clamp data bytes above `0x7F` to `0x7F` instead of failing
    pub fn clip(mut self, clip: bool) -> Self {
        self.clip = clip;
        self
    }

    /// Meta and sysex events longer than this fail with
    /// [`FileError::OversizedEvent`]
    pub fn max_event_length(mut self, max_event_length: usize) -> Self {
        self.max_event_length = max_event_length;
        self
    }

    /// How meta event text is decoded
    pub fn charset(mut self, charset: Charset) -> Self {
        self.charset = charset;
        self
    }

    /// Whether clip mode is on
    pub fn is_clipping(&self) -> bool {
        self.clip
    }
}

/// A MIDI file reader over a byte slice.
#[derive(Debug, Clone)]
pub struct Reader<'slc> {
    data: &'slc [u8],
    position: usize,
    options: ReadOptions,
}

impl<'slc> Reader<'slc> {
    /// A strict reader
    pub fn from_byte_slice(data: &'slc [u8]) -> Self {
        Self::with_options(data, ReadOptions::default())
    }

    /// A reader with `options`
    pub fn with_options(data: &'slc [u8], options: ReadOptions) -> Self {
        Self {
            data,
            position: 0,
            options,
        }
    }

    /// Offset of the next unread byte
    pub const fn buffer_position(&self) -> usize {
        self.position
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    fn read_slice(&mut self, len: usize) -> Option<&'slc [u8]> {
        let end = self.position.checked_add(len)?;
        let slice = self.data.get(self.position..end)?;
        self.position = end;
        Some(slice)
    }

    fn read_exact_size<const N: usize>(&mut self) -> Option<[u8; N]> {
        self.read_slice(N).and_then(|slice| slice.try_into().ok())
    }

    /// Reads the `MThd` chunk.
    pub fn read_header(&mut self) -> ReadResult<Header> {
        let start = self.position;
        let Some(tag) = self.read_exact_size::<4>() else {
            return Err(ReaderError::file(start, HeaderError::Truncated));
        };
        if tag != crate::file::chunk::HEADER_TAG {
            return Err(ReaderError::file(start, HeaderError::NotAMidiFile(tag)));
        }
        let Some(length) = self.read_exact_size::<4>() else {
            return Err(ReaderError::file(start, HeaderError::Truncated));
        };
        let length = u32::from_be_bytes(length) as usize;
        let payload_start = self.position;
        let Some(payload) = self.read_slice(length) else {
            return Err(ReaderError::file(payload_start, HeaderError::Truncated));
        };
        let header = Header::parse(payload).map_err(|e| ReaderError::file(payload_start, e))?;
        debug!(
            "header: format {:?}, {} tracks, {} ticks per beat",
            header.format(),
            header.num_tracks(),
            header.ticks_per_beat()
        );
        Ok(header)
    }

    /// Reads one `MTrk` chunk and decodes its events.
    pub fn read_track(&mut self) -> ReadResult<MidiTrack> {
        let start = self.position;
        let Some(chunk_header) = self.read_exact_size::<8>() else {
            return Err(ReaderError::file(
                start,
                TrackError::Truncated {
                    declared: 8,
                    available: self.remaining(),
                },
            ));
        };
        let chunk_header = ChunkHeader::from_bytes(chunk_header);
        if !chunk_header.is_track() {
            return Err(ReaderError::file(
                start,
                TrackError::MissingMTrk(chunk_header.tag),
            ));
        }
        let available = self.remaining();
        let chunk_start = self.position;
        let Some(chunk) = self.read_slice(chunk_header.length as usize) else {
            return Err(ReaderError::file(
                chunk_start,
                TrackError::Truncated {
                    declared: chunk_header.length,
                    available,
                },
            ));
        };
        debug!("track chunk of {} bytes at {start}", chunk.len());

        let mut events = TrackReader {
            chunk,
            offset: 0,
            running_status: 0,
            options: self.options,
        };
        let mut track = MidiTrack::new();
        while !events.is_done() {
            let event = events
                .read_event()
                .map_err(|e| ReaderError::file(chunk_start + events.offset, e))?;
            track.push(event);
        }
        Ok(track)
    }

    /// Reads the header and every track it declares.
    pub fn read_file(&mut self) -> ReadResult<MidiFile> {
        let header = self.read_header()?;
        let expected = header.num_tracks();
        let mut tracks = Vec::with_capacity(expected as usize);
        for found in 0..expected {
            if self.remaining() == 0 {
                return Err(ReaderError::file(
                    self.position,
                    TrackError::MissingTrack { expected, found },
                ));
            }
            tracks.push(self.read_track()?);
        }
        if header.format() == FormatType::SingleMultiChannel && tracks.len() != 1 {
            warn!("format 0 file declares {} tracks", tracks.len());
        }
        MidiFile::with_tracks(header.format(), header.ticks_per_beat(), tracks)
            .map_err(|e| ReaderError::file(self.position, e))
    }
}

/// Decodes the events of one track chunk.
struct TrackReader<'slc> {
    chunk: &'slc [u8],
    offset: usize,
    running_status: u8,
    options: ReadOptions,
}

impl<'slc> TrackReader<'slc> {
    fn is_done(&self) -> bool {
        self.offset >= self.chunk.len()
    }

    fn read_byte(&mut self) -> Result<u8, FileError> {
        let byte = *self
            .chunk
            .get(self.offset)
            .ok_or(TrackError::EventOverrun)?;
        self.offset += 1;
        Ok(byte)
    }

    fn read_bytes(&mut self, len: usize) -> Result<&'slc [u8], FileError> {
        let end = self
            .offset
            .checked_add(len)
            .filter(|end| *end <= self.chunk.len())
            .ok_or(TrackError::EventOverrun)?;
        let bytes = &self.chunk[self.offset..end];
        self.offset = end;
        Ok(bytes)
    }

    fn read_vlq(&mut self) -> Result<u32, FileError> {
        let (value, len) =
            decode_vlq(&self.chunk[self.offset..])?.ok_or(TrackError::EventOverrun)?;
        self.offset += len;
        Ok(value)
    }

    fn read_length(&mut self) -> Result<usize, FileError> {
        let length = self.read_vlq()? as usize;
        if length > self.options.max_event_length {
            return Err(FileError::OversizedEvent {
                length,
                max: self.options.max_event_length,
            });
        }
        Ok(length)
    }

    fn read_event(&mut self) -> Result<TrackEvent, FileError> {
        let delta_time = self.read_vlq()?;

        let peek = *self
            .chunk
            .get(self.offset)
            .ok_or(TrackError::EventOverrun)?;
        let running = peek < 0x80;
        let status = if running {
            if self.running_status == 0 {
                return Err(FileError::RunningStatus);
            }
            self.running_status
        } else {
            self.offset += 1;
            if peek != META_STATUS {
                self.running_status = peek;
            }
            peek
        };

        let message = match status {
            META_STATUS => {
                let type_byte = self.read_byte()?;
                let length = self.read_length()?;
                let data = self.read_bytes(length)?;
                TrackMessage::Meta(MetaMessage::decode(type_byte, data, self.options.charset)?)
            }
            SYSEX_START | SYSEX_END => {
                let length = self.read_length()?;
                let mut data = self.read_bytes(length)?;
                if let [SYSEX_START, rest @ ..] = data {
                    data = rest;
                }
                if let [rest @ .., SYSEX_END] = data {
                    data = rest;
                }
                TrackMessage::SysEx(self.sysex_data(data)?)
            }
            status => {
                let spec = spec_by_status(status).ok_or(MessageError::UndefinedStatus(status))?;
                let length = spec.fixed_length().unwrap_or(1);
                // a data byte after a single byte status belongs to no message,
                // so it goes into the frame and fails the length check
                let data_len = if running { (length - 1).max(1) } else { length - 1 };
                let mut frame = Vec::with_capacity(1 + data_len);
                frame.push(status);
                frame.extend_from_slice(self.read_bytes(data_len)?);
                self.clip_frame(&mut frame);
                TrackMessage::Midi(decode_message(&frame)?)
            }
        };
        Ok(TrackEvent::new(delta_time, message))
    }

    fn sysex_data(&self, data: &[u8]) -> Result<SysExData, MessageError> {
        if self.options.clip {
            if data.iter().any(|&b| b > 0x7F) {
                warn!("clipping system exclusive data bytes above 0x7F");
            }
            Ok(SysExData::new_clipped(data))
        } else {
            SysExData::new(data)
        }
    }

    fn clip_frame(&self, frame: &mut [u8]) {
        if !self.options.clip {
            return;
        }
        for byte in frame.iter_mut().skip(1) {
            if *byte > 0x7F {
                warn!("clipping data byte 0x{byte:02X} to 0x7F");
                *byte = 0x7F;
            }
        }
    }
}
