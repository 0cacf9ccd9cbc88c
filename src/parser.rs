#![doc = r#"
Feed bytes in, pop [`Message`]s out

[`Parser`] is everything a port or driver backend needs: it owns a
[`Tokenizer`] and decodes each complete frame as soon as it appears.

# Example
```rust
# use midiwire::prelude::*;
let mut parser = Parser::new();
parser.feed(&[0xF0, 0x7E, 0xF8, 0x09, 0xF7]);

let clock = parser.pop_message().unwrap();
assert_eq!(clock.message_type(), MessageType::Clock);

let sysex = parser.pop_message().unwrap();
assert_eq!(sysex.bytes(), vec![0xF0, 0x7E, 0x09, 0xF7]);
assert!(parser.pop_message().is_none());
```
"#]
use std::collections::VecDeque;

use tracing::warn;

use crate::{message::Message, tokenizer::Tokenizer};

/// A MIDI byte stream parser.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    tokenizer: Tokenizer,
    messages: VecDeque<Message>,
}

impl Parser {
    /// An empty parser
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds many bytes. Complete messages become available immediately.
    pub fn feed(&mut self, bytes: &[u8]) {
        self.tokenizer.feed(bytes);
        self.decode_frames();
    }

    /// Feeds one byte
    pub fn feed_byte(&mut self, byte: u8) {
        self.tokenizer.feed_byte(byte);
        self.decode_frames();
    }

    fn decode_frames(&mut self) {
        while let Some(frame) = self.tokenizer.pop_frame() {
            match Message::from_bytes(&frame, 0.) {
                Ok(message) => self.messages.push_back(message),
                Err(e) => warn!("dropping undecodable frame {frame:02X?}: {e}"),
            }
        }
    }

    /// The oldest parsed message, if any
    pub fn pop_message(&mut self) -> Option<Message> {
        self.messages.pop_front()
    }

    /// Number of messages ready to be popped
    pub fn pending_count(&self) -> usize {
        self.messages.len()
    }
}

impl Iterator for Parser {
    type Item = Message;
    fn next(&mut self) -> Option<Self::Item> {
        self.pop_message()
    }
}

/// Parses every message in `bytes`.
pub fn parse_all(bytes: &[u8]) -> Vec<Message> {
    let mut parser = Parser::new();
    parser.feed(bytes);
    parser.collect()
}

/// Parses the first message in `bytes`, ignoring the rest.
pub fn parse(bytes: &[u8]) -> Option<Message> {
    let mut parser = Parser::new();
    parser.feed(bytes);
    parser.pop_message()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{Attribute, MessageType, MidiMessage, encode};
    use crate::Channel;
    use pretty_assertions::assert_eq;

    #[test]
    fn running_status_stream_reproduces_messages() {
        let first = MidiMessage::note_on(Channel::Two, 60, 90).unwrap();
        let second = MidiMessage::note_on(Channel::Two, 64, 80).unwrap();
        let mut stream = encode(&first);
        // second status byte omitted
        stream.extend_from_slice(&encode(&second)[1..]);
        assert_eq!(stream.len(), 5);

        let parsed = parse_all(&stream);
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].message(), &first);
        assert_eq!(parsed[1].message(), &second);
    }

    #[test]
    fn byte_at_a_time() {
        let mut parser = Parser::new();
        for byte in [0xB3, 0x40, 0x7F] {
            assert_eq!(parser.pending_count(), 0);
            parser.feed_byte(byte);
        }
        let msg = parser.pop_message().unwrap();
        assert_eq!(msg.message_type(), MessageType::ControlChange);
        assert_eq!(msg.get(Attribute::Channel), Some(3));
        assert_eq!(msg.get(Attribute::Control), Some(0x40));
    }

    #[test]
    fn parse_takes_first_message() {
        let msg = parse(&[0x00, 0xF2, 0x01, 0x02, 0xFC]).unwrap();
        assert_eq!(msg.get(Attribute::Pos), Some(0x01 | (0x02 << 7)));
        assert!(parse(&[0x01, 0x02]).is_none());
    }
}
