use crate::{
    NameError,
    pitch::{Key, Octave, Pitch},
    timeline::Header,
};
use alloc::string::String;

#[doc = r#"
A sounding note: a paired note on and note off.

Position and length are stored in ticks. Times in seconds and measures are
derived through the [`Header`] of the file that owns the note, which every
time-based accessor takes as an argument.

Velocities are normalized to `0.0..=1.0`.

# Example
```rust
# use midiscore::prelude::*;
let header = Header::new(480);
let mut note = Note::new(60, 480, 240);

assert_eq!(note.name(), "C4");
assert_eq!(note.time(&header), 0.5);
assert_eq!(note.duration(&header), 0.25);

note.set_name("A4").unwrap();
note.set_time(&header, 1.);
assert_eq!(note.midi, 69);
assert_eq!(note.ticks, 960);
assert_eq!(note.duration_ticks, 240);
```
"#]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Note {
    /// The note number, `0..=127`
    pub midi: u8,
    /// Position of the note on
    pub ticks: u32,
    /// Ticks between the note on and the note off
    pub duration_ticks: u32,
    /// Note on velocity
    pub velocity: f64,
    /// Note off velocity
    pub note_off_velocity: f64,
}

impl Note {
    /// A note at full velocity with a note off velocity of 0
    pub const fn new(midi: u8, ticks: u32, duration_ticks: u32) -> Self {
        Self {
            midi,
            ticks,
            duration_ticks,
            velocity: 1.,
            note_off_velocity: 0.,
        }
    }

    /// A note positioned in seconds, converted to ticks with `header`
    pub fn at_seconds(header: &Header, midi: u8, time: f64, duration: f64) -> Self {
        let ticks = header.seconds_to_ticks(time);
        let end = header.seconds_to_ticks(time + duration);
        Self::new(midi, ticks, end.saturating_sub(ticks))
    }

    /// Replace the note on velocity
    pub const fn with_velocity(mut self, velocity: f64) -> Self {
        self.velocity = velocity;
        self
    }

    /// Position of the note off
    pub const fn end_ticks(&self) -> u32 {
        self.ticks.saturating_add(self.duration_ticks)
    }

    /// Start time in seconds
    pub fn time(&self, header: &Header) -> f64 {
        header.ticks_to_seconds(self.ticks)
    }

    /// Move the note to start at `seconds`, keeping its length in ticks
    pub fn set_time(&mut self, header: &Header, seconds: f64) {
        self.ticks = header.seconds_to_ticks(seconds);
    }

    /// Length in seconds
    pub fn duration(&self, header: &Header) -> f64 {
        header.ticks_to_seconds(self.end_ticks()) - header.ticks_to_seconds(self.ticks)
    }

    /// Make the note last `seconds`
    pub fn set_duration(&mut self, header: &Header, seconds: f64) {
        let end = header.seconds_to_ticks(self.time(header) + seconds);
        self.duration_ticks = end.saturating_sub(self.ticks);
    }

    /// Start position in measures, following time signature changes
    pub fn bars(&self, header: &Header) -> f64 {
        header.ticks_to_measures(self.ticks)
    }

    /// The note number as a [`Pitch`]
    pub const fn to_pitch(&self) -> Pitch {
        Pitch::from_midi(self.midi)
    }

    /// Scientific pitch notation, e.g. `"C#4"`
    pub fn name(&self) -> String {
        self.to_pitch().name()
    }

    /// Set the note number from scientific pitch notation
    pub fn set_name(&mut self, name: &str) -> Result<(), NameError> {
        self.midi = name.parse::<Pitch>()?.midi();
        Ok(())
    }

    /// The octave of the note
    pub const fn octave(&self) -> Octave {
        self.to_pitch().octave()
    }

    /// Move the note to `octave`, keeping its pitch class
    pub fn set_octave(&mut self, octave: Octave) -> Result<(), NameError> {
        self.midi = in_range((octave.value() as i32 + 1) * 12 + self.pitch().semitone() as i32)?;
        Ok(())
    }

    /// The pitch class of the note
    pub const fn pitch(&self) -> Key {
        self.to_pitch().key()
    }

    /// Change the pitch class, keeping the octave
    pub fn set_pitch(&mut self, key: Key) -> Result<(), NameError> {
        self.midi = in_range((self.octave().value() as i32 + 1) * 12 + key.semitone() as i32)?;
        Ok(())
    }
}

fn in_range(midi: i32) -> Result<u8, NameError> {
    u8::try_from(midi)
        .ok()
        .filter(|m| *m <= 127)
        .ok_or(NameError::OutOfRange(midi))
}
