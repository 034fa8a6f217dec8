#![doc = r#"
Rusty representation of a [`MidiFile`]

A [`MidiFile`] owns one [`Header`] and its [`Track`]s. It is built either
empty, by decoding a complete SMF buffer with [`MidiFile::parse`], or from
the exported document with [`MidiFile::from_json`].
"#]

/// Contains the [`MidiFileBuilder`](builder::MidiFileBuilder) and the
/// chunk level parsing types.
pub mod builder;
pub use builder::FormatType;

mod encode;

pub mod json;

mod timing;
pub use timing::*;

use crate::{
    JsonError,
    file::{builder::MidiFileBuilder, json::MidiJson},
    reader::{ReadResult, Reader, ReaderError},
    timeline::Header,
    track::Track,
    writer::EncodeOptions,
};
use alloc::{string::String, vec::Vec};

#[doc = r#"
A decoded, editable Standard MIDI File

# Example
```rust
# use midiscore::prelude::*;
let mut midi = MidiFile::new();
midi.set_name("song");
midi.add_track().add_note(Note::new(67, 0, 960));

let copy = MidiFile::parse(&midi.to_bytes()).unwrap();
assert_eq!(copy.name(), "song");
assert_eq!(copy.duration_ticks(), 960);
assert_eq!(copy.duration(), 1.);
```
"#]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MidiFile {
    header: Header,
    tracks: Vec<Track>,
}

impl MidiFile {
    /// An empty file at the default resolution
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_parts(header: Header, tracks: Vec<Track>) -> Self {
        Self { header, tracks }
    }

    /// Parse a complete SMF buffer.
    ///
    /// Chunks are read until the header's track count is reached. Bytes after
    /// the last announced track are ignored.
    ///
    /// # Errors
    /// Any malformed input aborts the decode; no partial file is returned.
    pub fn parse(bytes: &[u8]) -> ReadResult<Self> {
        let mut reader = Reader::from_byte_slice(bytes);
        let mut builder = MidiFileBuilder::default();

        while !builder.is_complete() {
            let offset = reader.buffer_position();
            let chunk = reader.read_chunk()?;
            if matches!(chunk, builder::chunk::ChunkEvent::Eof) {
                break;
            }
            builder.handle_chunk(offset, chunk)?;
        }

        #[cfg(feature = "tracing")]
        if builder.is_complete() && !reader.is_at_end() {
            tracing::warn!(
                "Ignoring {} bytes after the last track chunk",
                reader.remaining()
            );
        }

        builder
            .build()
            .map_err(|kind| ReaderError::new(reader.buffer_position(), kind))
    }

    /// Encode the file with the default [`EncodeOptions`]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_bytes_with(EncodeOptions::default())
    }

    /// Encode the file.
    ///
    /// Encoding never fails: out of range values are clamped.
    pub fn to_bytes_with(&self, options: EncodeOptions) -> Vec<u8> {
        encode::encode(self, options)
    }

    /// The name of the file, stored as the conductor track's name
    pub fn name(&self) -> &str {
        &self.header.name
    }

    /// Rename the file
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.header.name = name.into();
    }

    /// The timing information
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Mutable timing information
    pub fn header_mut(&mut self) -> &mut Header {
        &mut self.header
    }

    /// The tracks, in file order
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// The track list, to add, remove or reorder tracks
    pub fn tracks_mut(&mut self) -> &mut Vec<Track> {
        &mut self.tracks
    }

    /// Append an empty track and return it
    pub fn add_track(&mut self) -> &mut Track {
        self.tracks.push(Track::default());
        let last = self.tracks.len() - 1;
        &mut self.tracks[last]
    }

    /// The tick at which the last note of any track ends
    pub fn duration_ticks(&self) -> u32 {
        self.tracks
            .iter()
            .map(Track::duration_ticks)
            .max()
            .unwrap_or(0)
    }

    /// [`Self::duration_ticks`] in seconds
    pub fn duration(&self) -> f64 {
        self.header.ticks_to_seconds(self.duration_ticks())
    }

    /// Export the file as a plain document
    pub fn to_json(&self) -> MidiJson {
        MidiJson::from(self)
    }

    /// Rebuild a file from an exported document
    ///
    /// # Errors
    /// If a tempo, time signature, key signature or meta type in the document is not valid.
    pub fn from_json(json: &MidiJson) -> Result<Self, JsonError> {
        json.to_midi_file()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::Note;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_file() {
        let midi = MidiFile::new();
        assert_eq!(midi.header().ppq(), 480);
        assert!(midi.tracks().is_empty());
        assert_eq!(midi.duration_ticks(), 0);
        assert_eq!(midi.duration(), 0.);
    }

    #[test]
    fn duration_is_the_longest_track() {
        let mut midi = MidiFile::new();
        midi.add_track().add_note(Note::new(60, 0, 480));
        midi.add_track().add_note(Note::new(60, 960, 960));
        assert_eq!(midi.duration_ticks(), 1920);
        assert_eq!(midi.duration(), 2.);
    }

    #[test]
    fn empty_input_is_truncated() {
        let err = MidiFile::parse(&[]).unwrap_err();
        assert!(err.is_out_of_bounds());
        assert_eq!(err.position(), 0);
    }
}
