mod format;
pub use format::*;

pub mod chunk;

mod split;
pub use split::*;

mod track;
pub use track::*;

use super::MidiFile;
use crate::{
    ChunkError,
    file::builder::chunk::{ChunkEvent, RawHeaderChunk},
    message::{Ticked, TrackMessage},
    reader::{ReadResult, ReaderError, ReaderErrorKind},
    timeline::Header,
    track::Track,
    writer::{HEADER_CHUNK, TRACK_CHUNK},
};
use alloc::vec::Vec;

/// A builder used to create a new [`MidiFile`] from its chunks.
#[derive(Default)]
pub struct MidiFileBuilder {
    header: Option<RawHeaderChunk>,
    chunks: Vec<Vec<Ticked<TrackMessage>>>,
}

impl MidiFileBuilder {
    /// Handles a chunk of a midi file that starts at byte `offset`.
    ///
    /// The first chunk must be the header, every later one a track.
    pub fn handle_chunk(&mut self, offset: usize, chunk: ChunkEvent<'_>) -> ReadResult<()> {
        use ChunkEvent::*;
        let found = match chunk {
            Header(h) if self.header.is_none() => {
                self.header = Some(h);
                return Ok(());
            }
            Track(t) if self.header.is_some() => {
                self.chunks.push(t.events()?);
                return Ok(());
            }
            Eof => return Ok(()),
            Header(_) => HEADER_CHUNK,
            Track(_) => TRACK_CHUNK,
            Unknown(id) => id,
        };
        Err(ReaderError::new(
            offset,
            ReaderErrorKind::chunk(ChunkError::Unexpected {
                expected: self.expected_chunk(),
                found,
            }),
        ))
    }

    fn expected_chunk(&self) -> [u8; 4] {
        if self.header.is_some() {
            TRACK_CHUNK
        } else {
            HEADER_CHUNK
        }
    }

    /// True once the header and every track chunk it announces were handled
    pub fn is_complete(&self) -> bool {
        self.header
            .is_some_and(|h| self.chunks.len() >= h.num_tracks() as usize)
    }

    /// Attempts to finish the midifile from the provided chunks.
    ///
    /// The conductor information comes from the first track. In a format 1
    /// file the first track is dropped if it has no notes.
    pub fn build(self) -> Result<MidiFile, ReaderErrorKind> {
        let Some(raw_header) = self.header else {
            return Err(ReaderErrorKind::OutOfBounds);
        };

        #[cfg(feature = "tracing")]
        if self.chunks.len() < raw_header.num_tracks() as usize {
            tracing::warn!(
                "Header announces {} tracks, found {}",
                raw_header.num_tracks(),
                self.chunks.len()
            );
        }

        let split = split_tracks(self.chunks);
        let header = Header::from_track_events(
            raw_header.ticks_per_quarter_note(),
            split.first().map(Vec::as_slice).unwrap_or_default(),
        );
        let mut tracks: Vec<Track> = split
            .iter()
            .map(|events| TrackBuilder::from_events(events))
            .collect();

        if raw_header.format_type() == FormatType::Simultaneous
            && tracks.first().is_some_and(|t| t.duration_ticks() == 0)
        {
            tracks.remove(0);
        }

        Ok(MidiFile::from_parts(header, tracks))
    }
}
