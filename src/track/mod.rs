#![doc = r#"
The editable content of one logical track

A [`Track`] holds one instrument on one channel: its notes, control changes
and pitch bends, each list kept in tick order. Positions are ticks; use the
file's [`Header`](crate::timeline::Header) to convert them.
"#]

mod control_change;
pub use control_change::*;

mod instrument;
pub use instrument::*;

mod note;
pub use note::*;

mod pitch_bend;
pub use pitch_bend::*;

use crate::timeline::{Header, insert};
use alloc::{string::String, vec::Vec};

/// The channel General MIDI reserves for percussion
pub const PERCUSSION_CHANNEL: u8 = 9;

#[doc = r#"
One instrument on one channel

# Example
```rust
# use midiscore::prelude::*;
let mut track = Track::default();
track.add_note(Note::new(64, 480, 480));
track.add_note(Note::new(60, 0, 480));
track.add_cc(ControlChange::new(64, 0, 1.));

assert_eq!(track.notes[0].midi, 60);
assert_eq!(track.duration_ticks(), 960);
assert_eq!(track.duration(&Header::new(480)), 1.);
assert!(!track.is_percussion());
```
"#]
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Track {
    /// The track name
    pub name: String,
    /// The channel every event of the track is sent on, `0..=15`
    pub channel: u8,
    /// The program of the track
    pub instrument: Instrument,
    /// Notes, in ascending start tick order
    pub notes: Vec<Note>,
    /// Control changes by controller number
    pub control_changes: ControlChanges,
    /// Pitch bends, in tick order
    pub pitch_bends: Vec<PitchBend>,
    /// Where the decoded track ended, if it came from a file
    pub end_of_track_ticks: Option<u32>,
}

impl Track {
    /// An empty track on `channel`
    pub fn on_channel(channel: u8) -> Self {
        Self {
            channel: channel & 0x0F,
            ..Default::default()
        }
    }

    /// True if the track plays on the percussion channel
    pub const fn is_percussion(&self) -> bool {
        self.channel == PERCUSSION_CHANNEL
    }

    /// Add a note, after any note starting at the same tick
    pub fn add_note(&mut self, note: Note) -> &mut Self {
        insert(&mut self.notes, note, |n| n.ticks);
        self
    }

    /// Add a control change
    pub fn add_cc(&mut self, cc: ControlChange) -> &mut Self {
        self.control_changes.insert(cc);
        self
    }

    /// Add a pitch bend, after any bend at the same tick
    pub fn add_pitch_bend(&mut self, bend: PitchBend) -> &mut Self {
        insert(&mut self.pitch_bends, bend, |b| b.ticks);
        self
    }

    /// The name of the instrument as it sounds on this track's channel
    pub fn instrument_name(&self) -> Option<&'static str> {
        self.instrument.name(self.is_percussion())
    }

    /// The instrument family as it sounds on this track's channel
    pub fn instrument_family(&self) -> &'static str {
        self.instrument.family(self.is_percussion())
    }

    /// The tick at which the last note ends, or 0 without notes
    pub fn duration_ticks(&self) -> u32 {
        self.notes.iter().map(Note::end_ticks).max().unwrap_or(0)
    }

    /// The time in seconds at which the last note ends
    pub fn duration(&self, header: &Header) -> f64 {
        header.ticks_to_seconds(self.duration_ticks())
    }
}
