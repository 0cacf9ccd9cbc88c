#![doc = r#"
Splits a raw MIDI byte stream into message frames

The [`Tokenizer`] is the only stateful part of live decoding. It never fails:
real cables produce transient garbage, so anything that can not start or
continue a frame is dropped and the state machine resyncs on the next status
byte. Validation of the frames themselves happens in
[`decode`](crate::message::decode).

# Rules
- Data bytes (`0x00..=0x7F`) extend the open frame. With no open frame they
  start a new one under running status, or are discarded if there is none.
- System realtime bytes (`0xF8..=0xFF`) are emitted as their own frame the
  moment they arrive and leave all other state untouched, so they may sit in
  the middle of a channel message or a system exclusive span.
- `0xF0` opens a system exclusive span which `0xF7` closes. A lone `0xF7`
  is ignored.
- Channel statuses become the running status. System common statuses clear it.
- Undefined statuses (`0xF4`, `0xF5`) drop the open frame and running status.
"#]
use std::collections::VecDeque;

use tracing::trace;

use crate::message::{SYSEX_END, SYSEX_START, WireLength, spec_by_status};

/// A persistent byte-to-frame state machine. See the [module docs](self).
#[derive(Debug, Clone, Default)]
pub struct Tokenizer {
    /// Status of the frame being built, or the running status. `0` if none.
    status: u8,
    bytes: Vec<u8>,
    expected_len: usize,
    frames: VecDeque<Vec<u8>>,
}

impl Tokenizer {
    /// An empty tokenizer
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds many bytes, in order
    pub fn feed(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.feed_byte(byte);
        }
    }

    /// Feeds a single byte
    pub fn feed_byte(&mut self, byte: u8) {
        if byte <= 0x7F {
            self.feed_data_byte(byte);
        } else {
            self.feed_status_byte(byte);
        }
    }

    fn feed_data_byte(&mut self, byte: u8) {
        match self.status {
            0 => trace!("discarding stray data byte 0x{byte:02X}"),
            SYSEX_START => self.bytes.push(byte),
            status => {
                if self.bytes.is_empty() {
                    // running status
                    self.bytes.push(status);
                }
                self.bytes.push(byte);
                if self.bytes.len() == self.expected_len {
                    self.frames.push_back(core::mem::take(&mut self.bytes));
                    if status >= 0xF0 {
                        self.status = 0;
                    }
                }
            }
        }
    }

    fn feed_status_byte(&mut self, status: u8) {
        if status >= 0xF8 {
            if spec_by_status(status).is_some() {
                self.frames.push_back(vec![status]);
            } else {
                trace!("ignoring undefined realtime byte 0x{status:02X}");
            }
            return;
        }

        if status == SYSEX_END {
            if self.status == SYSEX_START {
                let mut frame = core::mem::take(&mut self.bytes);
                frame.push(SYSEX_END);
                self.frames.push_back(frame);
                self.status = 0;
            } else {
                trace!("ignoring end of exclusive outside of a sysex span");
            }
            return;
        }

        if self.status == SYSEX_START {
            trace!(
                "sysex span of {} bytes abandoned by status 0x{status:02X}",
                self.bytes.len()
            );
        }
        self.bytes.clear();

        match spec_by_status(status).map(|spec| spec.length) {
            Some(WireLength::Fixed(1)) => {
                self.frames.push_back(vec![status]);
                self.status = 0;
            }
            Some(WireLength::Fixed(len)) => {
                self.status = status;
                self.expected_len = len;
                self.bytes.push(status);
            }
            Some(WireLength::Variable) => {
                self.status = SYSEX_START;
                self.bytes.push(status);
            }
            None => {
                trace!("resetting on undefined status 0x{status:02X}");
                self.status = 0;
            }
        }
    }

    /// Number of complete frames waiting to be drained
    pub fn pending_count(&self) -> usize {
        self.frames.len()
    }

    /// Removes and returns the oldest complete frame
    pub fn pop_frame(&mut self) -> Option<Vec<u8>> {
        self.frames.pop_front()
    }

    /// Removes and returns every complete frame, oldest first
    pub fn drain(&mut self) -> Vec<Vec<u8>> {
        self.frames.drain(..).collect()
    }

    /// The running status, or `0` when data bytes would be discarded
    pub fn running_status(&self) -> u8 {
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tokenize(bytes: &[u8]) -> Vec<Vec<u8>> {
        let mut tokenizer = Tokenizer::new();
        tokenizer.feed(bytes);
        tokenizer.drain()
    }

    #[test]
    fn channel_messages() {
        assert_eq!(
            tokenize(&[0x90, 0x3C, 0x40, 0xC1, 0x05]),
            vec![vec![0x90, 0x3C, 0x40], vec![0xC1, 0x05]]
        );
    }

    #[test]
    fn running_status_repeats_last_channel_status() {
        assert_eq!(
            tokenize(&[0x90, 0x3C, 0x40, 0x3E, 0x40, 0x40, 0x00]),
            vec![
                vec![0x90, 0x3C, 0x40],
                vec![0x90, 0x3E, 0x40],
                vec![0x90, 0x40, 0x00]
            ]
        );
    }

    #[test]
    fn system_common_clears_running_status() {
        assert_eq!(
            tokenize(&[0xF3, 0x01, 0x02, 0x03]),
            vec![vec![0xF3, 0x01]]
        );
        assert_eq!(tokenize(&[0x90, 0x3C, 0x40, 0xF6, 0x3E, 0x40]), vec![
            vec![0x90, 0x3C, 0x40],
            vec![0xF6]
        ]);
    }

    #[test]
    fn stray_data_before_first_status_is_dropped() {
        assert_eq!(tokenize(&[0x01, 0x02, 0xFA, 0x03]), vec![vec![0xFA]]);
    }

    #[test]
    fn realtime_inside_sysex() {
        assert_eq!(
            tokenize(&[0xF0, 0x01, 0xF8, 0x02, 0xF7]),
            vec![vec![0xF8], vec![0xF0, 0x01, 0x02, 0xF7]]
        );
    }

    #[test]
    fn realtime_inside_channel_message() {
        assert_eq!(
            tokenize(&[0x90, 0x3C, 0xFE, 0x40]),
            vec![vec![0xFE], vec![0x90, 0x3C, 0x40]]
        );
    }

    #[test]
    fn lone_end_of_exclusive_keeps_partial_frame() {
        assert_eq!(tokenize(&[0xB0, 0x07, 0xF7, 0x7F]), vec![vec![0xB0, 0x07, 0x7F]]);
    }

    #[test]
    fn undefined_status_resets() {
        assert_eq!(tokenize(&[0x90, 0x3C, 0xF4, 0x40, 0x41]), Vec::<Vec<u8>>::new());
        assert_eq!(tokenize(&[0x90, 0xF9, 0x3C, 0x40]), vec![vec![0x90, 0x3C, 0x40]]);
    }

    #[test]
    fn new_status_abandons_sysex() {
        assert_eq!(
            tokenize(&[0xF0, 0x01, 0x80, 0x3C, 0x00, 0xF7]),
            vec![vec![0x80, 0x3C, 0x00]]
        );
    }

    #[test]
    fn frames_span_feed_calls() {
        let mut tokenizer = Tokenizer::new();
        tokenizer.feed(&[0xF0, 0x7D]);
        tokenizer.feed_byte(0x10);
        assert_eq!(tokenizer.pending_count(), 0);
        tokenizer.feed(&[0x11, 0xF7, 0xE0]);
        assert_eq!(tokenizer.pending_count(), 1);
        assert_eq!(tokenizer.running_status(), 0xE0);
        tokenizer.feed(&[0x00, 0x40]);
        assert_eq!(tokenizer.pop_frame(), Some(vec![0xF0, 0x7D, 0x10, 0x11, 0xF7]));
        assert_eq!(tokenizer.pop_frame(), Some(vec![0xE0, 0x00, 0x40]));
        assert_eq!(tokenizer.pop_frame(), None);
    }
}
