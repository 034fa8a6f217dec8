#![warn(missing_docs)]
#![no_std]
#![doc = r#"
Read, edit and write Standard MIDI Files.

`midiscore` decodes an SMF byte stream into an editable model of tracks, notes,
control changes and pitch bends, all positioned in ticks. A [`Header`](crate::timeline::Header)
holds the tempo and time signature maps and converts between ticks, seconds and measures.
The model encodes back into an SMF stream.

# Example
```rust
use midiscore::prelude::*;

let mut midi = MidiFile::new();
midi.header_mut().set_tempo(60.);

let track = midi.add_track();
track.name = "lead".into();
track.add_note(Note::new(60, 0, 480));
track.add_note(Note::new(64, 480, 480));

let bytes = midi.to_bytes();
let parsed = MidiFile::parse(&bytes).unwrap();

assert_eq!(parsed.tracks().len(), 1);
assert_eq!(parsed.header().ticks_to_seconds(480), 1.);
assert_eq!(parsed.duration(), 2.);
```
"#]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod error;
pub use error::*;

pub mod file;
pub mod message;
pub mod pitch;
pub mod reader;
pub mod timeline;
pub mod track;
pub mod writer;

#[doc = r#"
Common re-exports
"#]
pub mod prelude {
    pub use crate::{
        error::*,
        file::{FormatType, MidiFile, json::*},
        message::{
            ChannelVoiceMessage, KeySignature, MetaMessage, Tempo, TextKind, Ticked,
            TimeSignature, TrackMessage, VoiceEvent,
        },
        pitch::{Key, Octave, Pitch},
        reader::{ReadResult, Reader, ReaderError, ReaderErrorKind},
        timeline::{
            DEFAULT_BPM, DEFAULT_PPQ, Header, KeySignatureEvent, MetaEvent, RawMetaEvent,
            TempoEvent, TimeSignatureEvent,
        },
        track::{
            ControlChange, ControlChanges, Instrument, Note, PERCUSSION_CHANNEL, PitchBend, Track,
        },
        writer::{EncodeOptions, Writer},
    };
}
