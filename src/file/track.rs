use crate::file::{TrackEvent, TrackMessage, meta::MetaMessage};

/// An ordered list of [`TrackEvent`]s.
///
/// A well formed track ends with exactly one end of track meta event. The
/// track does not enforce this while it is being edited; the writer repairs
/// it with [`MidiTrack::fix_end_of_track`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MidiTrack {
    events: Vec<TrackEvent>,
}

impl MidiTrack {
    /// An empty track
    pub fn new() -> Self {
        Self::default()
    }

    /// The events, in order
    pub fn events(&self) -> &[TrackEvent] {
        &self.events
    }

    /// Mutable access to the events
    pub fn events_mut(&mut self) -> &mut Vec<TrackEvent> {
        &mut self.events
    }

    /// Appends an event
    pub fn push(&mut self, event: TrackEvent) {
        self.events.push(event);
    }

    /// Number of events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True if the track has no events
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Iterates over the events
    pub fn iter(&self) -> core::slice::Iter<'_, TrackEvent> {
        self.events.iter()
    }

    /// The text of the first track name event, if any
    pub fn name(&self) -> Option<&str> {
        self.events.iter().find_map(|event| match event.message() {
            TrackMessage::Meta(MetaMessage::TrackName(name)) => Some(name.as_str()),
            _ => None,
        })
    }

    /// Renames the track.
    ///
    /// Rewrites the first track name event, or inserts one at the start of
    /// the track if there is none.
    pub fn set_name(&mut self, name: impl Into<String>) {
        let name = MetaMessage::TrackName(name.into());
        let existing = self.events.iter_mut().find(|event| {
            matches!(
                event.message(),
                TrackMessage::Meta(MetaMessage::TrackName(_))
            )
        });
        match existing {
            Some(event) => *event = TrackEvent::new(event.delta_time(), name),
            None => self.events.insert(0, TrackEvent::new(0, name)),
        }
    }

    /// Total ticks from the start of the track to its last event
    pub fn duration_ticks(&self) -> u64 {
        self.events
            .iter()
            .map(|event| u64::from(event.delta_time()))
            .sum()
    }

    /// Each event with its absolute tick, counted from the start of the track.
    pub fn absolute_ticks(&self) -> impl Iterator<Item = (u64, &TrackEvent)> + '_ {
        self.events.iter().scan(0u64, |tick, event| {
            *tick += u64::from(event.delta_time());
            Some((*tick, event))
        })
    }

    /// Builds a track from messages at absolute ticks.
    ///
    /// The ticks must not decrease. Gaps wider than a `u32` saturate.
    pub fn from_absolute_ticks(events: impl IntoIterator<Item = (u64, TrackMessage)>) -> Self {
        let mut previous = 0u64;
        let events = events
            .into_iter()
            .map(|(tick, message)| {
                let delta = u32::try_from(tick.saturating_sub(previous)).unwrap_or(u32::MAX);
                previous = previous.max(tick);
                TrackEvent::new(delta, message)
            })
            .collect();
        Self { events }
    }

    /// Removes every end of track event and appends a single one.
    ///
    /// The delta time of a removed end of track event is added to the event
    /// after it, so no other event moves. Whatever is left over goes to the
    /// new end of track.
    pub fn fix_end_of_track(&mut self) {
        let mut carried = 0u32;
        self.events.retain_mut(|event| {
            let delta = event.delta_time();
            if matches!(event.message(), TrackMessage::Meta(MetaMessage::EndOfTrack)) {
                carried = carried.saturating_add(delta);
                false
            } else {
                event.set_delta_time(delta.saturating_add(carried));
                carried = 0;
                true
            }
        });
        self.events
            .push(TrackEvent::new(carried, MetaMessage::EndOfTrack));
    }

    /// True if the last event, and only the last, is an end of track
    pub fn has_valid_end(&self) -> bool {
        let ends = self
            .events
            .iter()
            .filter(|event| matches!(event.message(), TrackMessage::Meta(MetaMessage::EndOfTrack)))
            .count();
        ends == 1
            && self
                .events
                .last()
                .is_some_and(|event| {
                    matches!(event.message(), TrackMessage::Meta(MetaMessage::EndOfTrack))
                })
    }
}

impl From<Vec<TrackEvent>> for MidiTrack {
    fn from(events: Vec<TrackEvent>) -> Self {
        Self { events }
    }
}

impl FromIterator<TrackEvent> for MidiTrack {
    fn from_iter<T: IntoIterator<Item = TrackEvent>>(iter: T) -> Self {
        Self {
            events: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for MidiTrack {
    type Item = TrackEvent;
    type IntoIter = std::vec::IntoIter<TrackEvent>;
    fn into_iter(self) -> Self::IntoIter {
        self.events.into_iter()
    }
}

impl<'a> IntoIterator for &'a MidiTrack {
    type Item = &'a TrackEvent;
    type IntoIter = core::slice::Iter<'a, TrackEvent>;
    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

/// Interleaves `tracks` into one track ordered by absolute tick.
///
/// Events at the same tick keep the order of their tracks, then their order
/// within the track. The result ends with a single end of track.
pub fn merge_tracks(tracks: &[MidiTrack]) -> MidiTrack {
    let mut events: Vec<(u64, &TrackEvent)> =
        tracks.iter().flat_map(MidiTrack::absolute_ticks).collect();
    // stable, so ties stay in track order
    events.sort_by_key(|(tick, _)| *tick);

    let mut merged = MidiTrack::from_absolute_ticks(
        events
            .into_iter()
            .map(|(tick, event)| (tick, event.message().clone())),
    );
    merged.fix_end_of_track();
    merged
}
