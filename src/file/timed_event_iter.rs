use core::slice;

use crate::file::{
    TrackEvent, TrackMessage,
    meta::{MetaMessage, Tempo},
    units::tick_to_second,
};

/// A track event with the seconds elapsed since the event before it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedEvent<'a> {
    /// Seconds since the previous event
    pub delta: f64,
    /// The event itself
    pub event: &'a TrackEvent,
}

/// An iterator returned from [`MidiFile::timed_events`](crate::file::MidiFile::timed_events).
///
/// Walks a merged track converting delta ticks to seconds. The tempo starts
/// at [`Tempo::DEFAULT`]. A set tempo event is timed with the tempo in force
/// before it and only affects the events after it.
#[derive(Debug, Clone)]
pub struct TimedEvents<'a> {
    ticks_per_beat: u16,
    tempo: Tempo,
    events: slice::Iter<'a, TrackEvent>,
}

impl<'a> TimedEvents<'a> {
    pub(crate) fn new(ticks_per_beat: u16, events: &'a [TrackEvent]) -> Self {
        Self {
            ticks_per_beat,
            tempo: Tempo::DEFAULT,
            events: events.iter(),
        }
    }

    /// The tempo that will time the next event
    pub fn tempo(&self) -> Tempo {
        self.tempo
    }
}

impl<'a> Iterator for TimedEvents<'a> {
    type Item = TimedEvent<'a>;
    fn next(&mut self) -> Option<Self::Item> {
        let event = self.events.next()?;
        let delta = match event.delta_time() {
            0 => 0.,
            ticks => tick_to_second(u64::from(ticks), self.ticks_per_beat, self.tempo),
        };
        if let TrackMessage::Meta(MetaMessage::SetTempo(tempo)) = event.message() {
            self.tempo = *tempo;
        }
        Some(TimedEvent { delta, event })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.events.size_hint()
    }
}

impl ExactSizeIterator for TimedEvents<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Channel, message::MidiMessage};
    use pretty_assertions::assert_eq;

    fn note_on(delta: u32) -> TrackEvent {
        TrackEvent::new(delta, MidiMessage::note_on(Channel::One, 60, 100).unwrap())
    }

    fn tempo(delta: u32, micros: u32) -> TrackEvent {
        TrackEvent::new(delta, MetaMessage::SetTempo(Tempo::new(micros).unwrap()))
    }

    fn deltas(events: &[TrackEvent]) -> Vec<f64> {
        TimedEvents::new(480, events).map(|timed| timed.delta).collect()
    }

    #[test]
    fn default_tempo() {
        let events = [note_on(0), note_on(480), note_on(240)];
        assert_eq!(deltas(&events), vec![0., 0.5, 0.25]);
    }

    #[test]
    fn tempo_applies_after_its_event() {
        let events = [
            note_on(480),
            tempo(480, 1_000_000),
            note_on(480),
            tempo(0, 250_000),
            note_on(960),
        ];
        assert_eq!(deltas(&events), vec![0.5, 0.5, 1., 0., 0.5]);
    }

    #[test]
    fn reports_current_tempo() {
        let events = [tempo(0, 600_000)];
        let mut iter = TimedEvents::new(96, &events);
        assert_eq!(iter.len(), 1);
        assert_eq!(iter.tempo(), Tempo::DEFAULT);
        iter.next();
        assert_eq!(iter.tempo(), Tempo::new(600_000).unwrap());
    }
}
