#![doc = r#"
Real time playback of a merged track

[`Playback`] is an iterator that sleeps until each event is due before
yielding it. Pacing compares the accumulated event time with a [`Clock`],
so late events are yielded immediately and the schedule never drifts.
Playback starts when the first event is pulled. Stop pulling to stop
playing; nothing needs to be torn down.
"#]
use std::time::{Duration, Instant};

use tracing::trace;

use crate::file::{TimedEvent, TimedEvents};

/// A monotonic time source that can suspend the caller.
pub trait Clock {
    /// Seconds since an arbitrary, fixed origin
    fn now(&mut self) -> f64;
    /// Suspends for `seconds`
    fn sleep(&mut self, seconds: f64);
}

/// [`Instant`] and [`std::thread::sleep`]
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now(&mut self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
    fn sleep(&mut self, seconds: f64) {
        std::thread::sleep(Duration::from_secs_f64(seconds));
    }
}

/// An iterator returned from [`MidiFile::play`](crate::file::MidiFile::play).
#[derive(Debug)]
pub struct Playback<'a, C> {
    events: TimedEvents<'a>,
    clock: C,
    include_meta: bool,
    start: Option<f64>,
    input_time: f64,
}

impl<'a, C: Clock> Playback<'a, C> {
    pub(crate) fn new(events: TimedEvents<'a>, clock: C, include_meta: bool) -> Self {
        Self {
            events,
            clock,
            include_meta,
            start: None,
            input_time: 0.,
        }
    }

    /// The clock driving playback
    pub fn clock(&self) -> &C {
        &self.clock
    }
}

impl<'a, C: Clock> Iterator for Playback<'a, C> {
    type Item = TimedEvent<'a>;
    fn next(&mut self) -> Option<Self::Item> {
        let start = match self.start {
            Some(start) => start,
            None => *self.start.insert(self.clock.now()),
        };
        loop {
            let timed = self.events.next()?;
            self.input_time += timed.delta;

            let playback_time = self.clock.now() - start;
            let wait = self.input_time - playback_time;
            if wait > 0. {
                trace!("sleeping {wait:.6}s");
                self.clock.sleep(wait);
            }

            if timed.event.is_meta() && !self.include_meta {
                continue;
            }
            return Some(timed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Channel,
        file::{TrackEvent, meta::MetaMessage},
        message::MidiMessage,
    };
    use pretty_assertions::assert_eq;

    /// Time only moves when slept, plus a fixed cost per reading.
    #[derive(Default)]
    struct ManualClock {
        now: f64,
        cost: f64,
        sleeps: Vec<f64>,
    }

    impl Clock for ManualClock {
        fn now(&mut self) -> f64 {
            self.now += self.cost;
            self.now
        }
        fn sleep(&mut self, seconds: f64) {
            self.sleeps.push(seconds);
            self.now += seconds;
        }
    }

    fn events() -> Vec<TrackEvent> {
        vec![
            TrackEvent::new(0, MetaMessage::TrackName("x".to_owned())),
            TrackEvent::new(0, MidiMessage::note_on(Channel::One, 60, 100).unwrap()),
            TrackEvent::new(480, MidiMessage::note_off(Channel::One, 60, 0).unwrap()),
            TrackEvent::new(960, MetaMessage::EndOfTrack),
        ]
    }

    #[test]
    fn sleeps_until_each_event_is_due() {
        let events = events();
        let mut playback =
            Playback::new(TimedEvents::new(480, &events), ManualClock::default(), false);
        let yielded: Vec<f64> = playback.by_ref().map(|timed| timed.delta).collect();
        assert_eq!(yielded, vec![0., 0.5]);
        // the trailing end of track is still waited for
        assert_eq!(playback.clock().sleeps, vec![0.5, 1.0]);
    }

    #[test]
    fn late_events_do_not_sleep() {
        let events = events();
        let clock = ManualClock {
            cost: 2.,
            ..Default::default()
        };
        let mut playback = Playback::new(TimedEvents::new(480, &events), clock, true);
        assert_eq!(playback.by_ref().count(), 4);
        assert!(playback.clock().sleeps.is_empty());
    }
}
