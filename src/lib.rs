#![doc = r#"
MIDI 1.0 wire protocol and Standard MIDI File (SMF) codec.

# Live byte streams

A [`Parser`](crate::parser::Parser) turns arbitrary bytes, as they come off a
cable or a driver callback, into validated [`Message`](crate::message::Message)s.
It tolerates running status, stray data bytes and realtime bytes interleaved
anywhere, including in the middle of a system exclusive span.

```rust
# use midiwire::prelude::*;
let mut parser = Parser::new();
// note on, then a second note on using running status
parser.feed(&[0x90, 0x3C, 0x40, 0x3E, 0x40]);

assert_eq!(parser.pending_count(), 2);
let first = parser.pop_message().unwrap();
assert_eq!(first.message_type(), MessageType::NoteOn);
assert_eq!(first.get(Attribute::Note), Some(0x3C));
```

# Standard MIDI Files

[`MidiFile`](crate::file::MidiFile) reads and writes the chunked container,
including VLQ delta times, running status compression, meta events and
system exclusive events.

```rust
# use midiwire::prelude::*;
let mut file = MidiFile::new(FormatType::Simultaneous, 480).unwrap();
let track = file.add_track(Some("piano"));
let note = MidiMessage::note_on(Channel::One, 60, 100).unwrap();
track.push(TrackEvent::new(480, TrackMessage::Midi(note)));

let bytes = file.to_bytes().unwrap();
let read_back = MidiFile::parse(&bytes).unwrap();
assert_eq!(read_back.length().unwrap(), 0.5);
```
"#]

mod byte;
pub use byte::*;

mod error;
pub use error::*;

pub mod file;
pub mod message;
pub mod parser;
pub mod reader;
pub mod tokenizer;
pub mod writer;

pub mod prelude {
    #![doc = r#"
    Common re-exports
    "#]
    pub use crate::{
        byte::*,
        error::*,
        file::{meta::*, *},
        message::*,
        parser::*,
        reader::{ReadOptions, ReadResult, Reader, ReaderError, ReaderErrorKind},
        tokenizer::Tokenizer,
        writer::WriteOptions,
    };
}
