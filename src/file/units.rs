#![doc = r#"
Conversions between ticks, beats, seconds and tempo

A tick lasts `tempo / ticks_per_beat` microseconds, where tempo is the
current set tempo in microseconds per quarter note. Until a file sets one,
the tempo is [`Tempo::DEFAULT`] (120 BPM).
"#]
use crate::file::meta::{Tempo, TimeSignature};

/// Resolution used by [`MidiFile::default`](crate::file::MidiFile)
pub const DEFAULT_TICKS_PER_BEAT: u16 = 480;

/// Duration of `tick` ticks in seconds
pub fn tick_to_second(tick: u64, ticks_per_beat: u16, tempo: Tempo) -> f64 {
    (tick as f64 * tempo.micros_per_quarter_note() as f64)
        / (1_000_000. * ticks_per_beat as f64)
}

/// Number of ticks closest to `second` seconds. Ties round to even.
pub fn second_to_tick(second: f64, ticks_per_beat: u16, tempo: Tempo) -> u64 {
    let ticks = second * 1_000_000. * ticks_per_beat as f64;
    (ticks / tempo.micros_per_quarter_note() as f64).round_ties_even() as u64
}

/// Microseconds per quarter note for `bpm` beats per minute, a beat being
/// one `1/denominator` note of the time signature
pub fn bpm_to_tempo(bpm: f64, time_signature: TimeSignature) -> u32 {
    (60_000_000. / bpm * quarters_per_beat(time_signature)).round_ties_even() as u32
}

/// Beats of the time signature per minute at `tempo` microseconds per
/// quarter note
pub fn tempo_to_bpm(tempo: u32, time_signature: TimeSignature) -> f64 {
    60_000_000. / tempo as f64 * quarters_per_beat(time_signature)
}

/// Beats in `tick` ticks, a beat being one `1/denominator` note of the
/// time signature
pub fn tick_to_beat(tick: u64, ticks_per_beat: u16, time_signature: TimeSignature) -> f64 {
    tick as f64 / ticks_per_signature_beat(ticks_per_beat, time_signature)
}

/// Ticks closest to `beat` beats of the time signature
pub fn beat_to_tick(beat: f64, ticks_per_beat: u16, time_signature: TimeSignature) -> u64 {
    (beat * ticks_per_signature_beat(ticks_per_beat, time_signature)).round_ties_even() as u64
}

fn ticks_per_signature_beat(ticks_per_beat: u16, time_signature: TimeSignature) -> f64 {
    4. * ticks_per_beat as f64 / time_signature.denominator() as f64
}

fn quarters_per_beat(time_signature: TimeSignature) -> f64 {
    time_signature.denominator() as f64 / 4.
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn half_a_second_per_beat_at_default_tempo() {
        assert_eq!(tick_to_second(480, 480, Tempo::DEFAULT), 0.5);
        assert_eq!(tick_to_second(0, 480, Tempo::DEFAULT), 0.);
        assert_eq!(second_to_tick(0.5, 480, Tempo::DEFAULT), 480);
        assert_eq!(second_to_tick(1.0, 96, Tempo::new(250_000).unwrap()), 384);
    }

    #[test]
    fn bpm() {
        let four_four = TimeSignature::default();
        assert_eq!(bpm_to_tempo(120., four_four), 500_000);
        assert_eq!(bpm_to_tempo(140., four_four), 428_571);
        assert_eq!(tempo_to_bpm(500_000, four_four), 120.);
    }

    #[test]
    fn bpm_counts_beats_of_the_denominator() {
        let six_eight = TimeSignature::new(6, 8, 36, 8).unwrap();
        let two_two = TimeSignature::new(2, 2, 48, 8).unwrap();
        assert_eq!(bpm_to_tempo(120., six_eight), 1_000_000);
        assert_eq!(tempo_to_bpm(1_000_000, six_eight), 120.);
        assert_eq!(bpm_to_tempo(60., two_two), 500_000);
        assert_eq!(tempo_to_bpm(500_000, two_two), 60.);
    }

    #[test]
    fn ties_round_to_even() {
        let one_second = Tempo::new(1_000_000).unwrap();
        assert_eq!(second_to_tick(2.5, 1, one_second), 2);
        assert_eq!(second_to_tick(3.5, 1, one_second), 4);
        let four_four = TimeSignature::default();
        assert_eq!(beat_to_tick(0.5, 1, four_four), 0);
        assert_eq!(beat_to_tick(1.5, 1, four_four), 2);
    }

    #[test]
    fn beats_follow_the_denominator() {
        let four_four = TimeSignature::default();
        let six_eight = TimeSignature::new(6, 8, 36, 8).unwrap();
        assert_eq!(tick_to_beat(960, 480, four_four), 2.);
        assert_eq!(tick_to_beat(960, 480, six_eight), 4.);
        assert_eq!(beat_to_tick(1.5, 480, four_four), 720);
        assert_eq!(beat_to_tick(3., 480, six_eight), 720);
    }
}
