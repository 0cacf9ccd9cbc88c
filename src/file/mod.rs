#![doc = r#"
Standard MIDI Files

A [`MidiFile`] is a format, a resolution in ticks per beat and a list of
[`MidiTrack`]s. Reading is done by the [`Reader`](crate::reader::Reader),
writing by the [`writer`](crate::writer) functions; both are reachable
from [`MidiFile`] directly.

For formats 0 and 1 all tracks play at once. Their events can be merged
into one track ordered by absolute tick, which is what [`MidiFile::length`],
[`MidiFile::timed_events`] and [`MidiFile::play`] walk. The merged track is
computed on first use and cached until a track is changed.
"#]

pub mod chunk;
pub mod meta;
pub mod vlq;

mod event;
pub use event::*;

mod format;
pub use format::*;

mod playback;
pub use playback::*;

mod timed_event_iter;
pub use timed_event_iter::*;

mod track;
pub use track::*;

mod units;
pub use units::*;

use std::{io, sync::OnceLock};

use crate::{
    FileError, WriteError,
    file::chunk::check_ticks_per_beat,
    reader::{ReadOptions, ReadResult, Reader},
    writer::{WriteOptions, write_file},
};

/// A Standard MIDI File held in memory.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MidiFile {
    format: FormatType,
    ticks_per_beat: u16,
    tracks: Vec<MidiTrack>,
    #[cfg_attr(feature = "serde", serde(skip))]
    merged: OnceLock<MidiTrack>,
}

impl Default for MidiFile {
    /// An empty format 1 file at 480 ticks per beat
    fn default() -> Self {
        Self {
            format: FormatType::Simultaneous,
            ticks_per_beat: DEFAULT_TICKS_PER_BEAT,
            tracks: Vec::new(),
            merged: OnceLock::new(),
        }
    }
}

impl PartialEq for MidiFile {
    fn eq(&self, other: &Self) -> bool {
        self.format == other.format
            && self.ticks_per_beat == other.ticks_per_beat
            && self.tracks == other.tracks
    }
}

impl MidiFile {
    /// An empty file.
    ///
    /// Fails if `ticks_per_beat` is zero or does not fit in 15 bits.
    pub fn new(format: FormatType, ticks_per_beat: u16) -> Result<Self, FileError> {
        Self::with_tracks(format, ticks_per_beat, Vec::new())
    }

    /// A file holding `tracks`
    pub fn with_tracks(
        format: FormatType,
        ticks_per_beat: u16,
        tracks: Vec<MidiTrack>,
    ) -> Result<Self, FileError> {
        Ok(Self {
            format,
            ticks_per_beat: check_ticks_per_beat(ticks_per_beat)?,
            tracks,
            merged: OnceLock::new(),
        })
    }

    /// Parses a complete file with default [`ReadOptions`]
    pub fn parse(bytes: &[u8]) -> ReadResult<Self> {
        Self::parse_with(bytes, ReadOptions::default())
    }

    /// Parses a complete file
    pub fn parse_with(bytes: &[u8], options: ReadOptions) -> ReadResult<Self> {
        Reader::with_options(bytes, options).read_file()
    }

    /// Reads `source` to its end and parses it
    pub fn read<R: io::Read>(source: R) -> ReadResult<Self> {
        Self::read_with(source, ReadOptions::default())
    }

    /// Reads `source` to its end and parses it with `options`
    pub fn read_with<R: io::Read>(mut source: R, options: ReadOptions) -> ReadResult<Self> {
        let mut bytes = Vec::new();
        source
            .read_to_end(&mut bytes)
            .map_err(|e| crate::reader::ReaderError::io(bytes.len(), e.kind()))?;
        Self::parse_with(&bytes, options)
    }

    /// Returns the format type for the file.
    pub const fn format_type(&self) -> FormatType {
        self.format
    }

    /// Ticks per quarter note
    pub const fn ticks_per_beat(&self) -> u16 {
        self.ticks_per_beat
    }

    /// The tracks, in file order
    pub fn tracks(&self) -> &[MidiTrack] {
        &self.tracks
    }

    /// Mutable access to one track. Invalidates the merged track.
    pub fn track_mut(&mut self, index: usize) -> Option<&mut MidiTrack> {
        self.invalidate_merged_track();
        self.tracks.get_mut(index)
    }

    /// Mutable access to the track list. Invalidates the merged track.
    pub fn tracks_mut(&mut self) -> &mut Vec<MidiTrack> {
        self.invalidate_merged_track();
        &mut self.tracks
    }

    /// Appends an empty track, named if `name` is given, and returns it.
    pub fn add_track(&mut self, name: Option<&str>) -> &mut MidiTrack {
        let mut track = MidiTrack::new();
        if let Some(name) = name {
            track.set_name(name);
        }
        self.tracks_mut().push(track);
        let last = self.tracks.len() - 1;
        &mut self.tracks[last]
    }

    /// Drops the cached merged track.
    ///
    /// Every method here that hands out mutable tracks calls this. Call it
    /// again after editing a track through a reference kept from before.
    pub fn invalidate_merged_track(&mut self) {
        self.merged.take();
    }

    /// All tracks interleaved by absolute tick.
    ///
    /// Fails for format 2 files, whose tracks do not play together.
    pub fn merged_track(&self) -> Result<&MidiTrack, FileError> {
        if !self.format.is_synchronous() {
            return Err(FileError::AsynchronousTracks);
        }
        Ok(self.merged.get_or_init(|| merge_tracks(&self.tracks)))
    }

    /// Events of the merged track with their delta times in seconds
    pub fn timed_events(&self) -> Result<TimedEvents<'_>, FileError> {
        let merged = self.merged_track()?;
        Ok(TimedEvents::new(self.ticks_per_beat, merged.events()))
    }

    /// Playing time in seconds, honouring every tempo change
    pub fn length(&self) -> Result<f64, FileError> {
        Ok(self.timed_events()?.map(|timed| timed.delta).sum())
    }

    /// Plays the file in real time on the [`SystemClock`], skipping meta
    /// events
    pub fn play(&self) -> Result<Playback<'_, SystemClock>, FileError> {
        self.play_with(SystemClock::default(), false)
    }

    /// Plays the file against `clock`, yielding meta events too if
    /// `include_meta` is set
    pub fn play_with<C: Clock>(
        &self,
        clock: C,
        include_meta: bool,
    ) -> Result<Playback<'_, C>, FileError> {
        Ok(Playback::new(self.timed_events()?, clock, include_meta))
    }

    /// Encodes the file with default [`WriteOptions`]
    pub fn to_bytes(&self) -> Result<Vec<u8>, FileError> {
        write_file(self, WriteOptions::default())
    }

    /// Encodes the file into `sink`
    pub fn write<W: io::Write>(&self, sink: W) -> Result<(), WriteError> {
        self.write_with(sink, WriteOptions::default())
    }

    /// Encodes the file into `sink` with `options`
    pub fn write_with<W: io::Write>(
        &self,
        mut sink: W,
        options: WriteOptions,
    ) -> Result<(), WriteError> {
        let bytes = write_file(self, options)?;
        sink.write_all(&bytes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Channel, file::meta::MetaMessage, message::MidiMessage};
    use pretty_assertions::assert_eq;

    fn note(delta: u32) -> TrackEvent {
        TrackEvent::new(delta, MidiMessage::note_on(Channel::One, 60, 64).unwrap())
    }

    #[test]
    fn single_event_at_one_beat_lasts_half_a_second() {
        let track = MidiTrack::from(vec![note(480)]);
        let file = MidiFile::with_tracks(FormatType::SingleMultiChannel, 480, vec![track]).unwrap();
        assert_eq!(file.length(), Ok(0.5));
    }

    #[test]
    fn merged_track_follows_mutation() {
        let mut file = MidiFile::default();
        file.add_track(Some("a")).push(note(10));
        assert_eq!(file.merged_track().unwrap().len(), 3);

        file.track_mut(0).unwrap().push(note(10));
        assert_eq!(file.merged_track().unwrap().len(), 4);

        file.add_track(None).push(note(5));
        let merged = file.merged_track().unwrap();
        assert_eq!(merged.len(), 5);
        assert_eq!(merged.name(), Some("a"));
        assert_eq!(merged.events()[1], note(5));
    }

    #[test]
    fn format_2_does_not_merge() {
        let file = MidiFile::new(FormatType::SequentiallyIndependent, 96).unwrap();
        assert_eq!(file.merged_track(), Err(FileError::AsynchronousTracks));
        assert_eq!(file.length(), Err(FileError::AsynchronousTracks));
    }

    #[test]
    fn ticks_per_beat_is_checked() {
        assert_eq!(
            MidiFile::new(FormatType::Simultaneous, 0),
            Err(FileError::InvalidTicksPerBeat(0))
        );
        assert_eq!(
            MidiFile::new(FormatType::Simultaneous, 0x8000),
            Err(FileError::InvalidTicksPerBeat(0x8000))
        );
    }

    #[test]
    fn tempo_changes_shorten_the_file() {
        let mut file = MidiFile::default();
        let track = file.add_track(None);
        track.push(TrackEvent::new(
            0,
            MetaMessage::SetTempo(meta::Tempo::new(250_000).unwrap()),
        ));
        track.push(note(960));
        assert_eq!(file.length(), Ok(0.5));
    }
}
