#![doc = r#"
Contains types for MIDI file chunks

# Overview

MIDI files are organized into chunks, each identified by a 4-character ASCII type identifier
followed by a 32-bit big-endian length field and then the chunk data.

## [`RawHeaderChunk`]

The header chunk (identified by "MThd") must be the first chunk in a MIDI file. It holds:

- the [`FormatType`](crate::file::FormatType), which identifies how the tracks relate
  (one multi-channel track, simultaneous tracks, or independent sequences)
- the number of track chunks that follow
- the time division, which must be a number of ticks per quarter note

The header chunk declares a length of at least 6 bytes; anything after the first 6 is skipped.

## [`RawTrackChunk`]

Track chunks (identified by "MTrk") contain a stream of `<delta-time> <event>` pairs.
[`RawTrackChunk::events`] decodes them into events positioned at their absolute tick.

Any other chunk identifier is rejected.

# Example Structure

```text
[Header Chunk: "MThd"]
[Track Chunk 1: "MTrk"]
[Track Chunk 2: "MTrk"]
...
[Track Chunk N: "MTrk"]
```
"#]

mod header;
pub use header::*;

mod track;
pub use track::*;

use crate::{
    reader::{ReadResult, Reader},
    writer::{HEADER_CHUNK, TRACK_CHUNK},
};

/// One chunk read from the file
#[derive(Debug, Clone)]
pub enum ChunkEvent<'slc> {
    /// An `MThd` chunk
    Header(RawHeaderChunk),
    /// An `MTrk` chunk, not decoded yet
    Track(RawTrackChunk<'slc>),
    /// A chunk with any other identifier
    Unknown([u8; 4]),
    /// No bytes are left
    Eof,
}

impl<'slc> Reader<'slc> {
    /// Read the next chunk's identifier and length, and split its body off.
    ///
    /// # Errors
    /// - [`OutOfBounds`](crate::reader::ReaderErrorKind::OutOfBounds) if the chunk
    ///   framing or its declared body is cut short
    /// - header content errors from [`RawHeaderChunk`]
    pub fn read_chunk(&mut self) -> ReadResult<ChunkEvent<'slc>> {
        if self.is_at_end() {
            return Ok(ChunkEvent::Eof);
        }
        let id: [u8; 4] = self.read_exact_size()?;
        let len = self.read_u32()?;

        match id {
            HEADER_CHUNK => {
                let mut body = self.sub_reader(len as usize)?;
                RawHeaderChunk::read(&mut body, len).map(ChunkEvent::Header)
            }
            TRACK_CHUNK => Ok(ChunkEvent::Track(RawTrackChunk::new(
                self.sub_reader(len as usize)?,
            ))),
            id => Ok(ChunkEvent::Unknown(id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::FormatType;
    use pretty_assertions::assert_eq;

    #[test]
    fn reads_chunks_in_order() {
        let bytes = [
            b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 1, 0, 1, 0, 96, //
            b'M', b'T', b'r', b'k', 0, 0, 0, 4, 0x00, 0xFF, 0x2F, 0x00, //
            b'X', b'F', b'I', b'H', 0, 0, 0, 0,
        ];
        let mut reader = Reader::from_byte_slice(&bytes);

        let ChunkEvent::Header(header) = reader.read_chunk().unwrap() else {
            panic!("expected a header chunk");
        };
        assert_eq!(header.format_type(), FormatType::Simultaneous);
        assert_eq!(header.num_tracks(), 1);
        assert_eq!(header.ticks_per_quarter_note(), 96);

        let ChunkEvent::Track(track) = reader.read_chunk().unwrap() else {
            panic!("expected a track chunk");
        };
        assert_eq!(track.len(), 4);

        assert_eq!(reader.buffer_position(), 26);
        assert!(matches!(
            reader.read_chunk().unwrap(),
            ChunkEvent::Unknown([b'X', b'F', b'I', b'H'])
        ));
        assert!(matches!(reader.read_chunk().unwrap(), ChunkEvent::Eof));
    }

    #[test]
    fn truncated_chunk_body() {
        let bytes = [b'M', b'T', b'r', b'k', 0, 0, 0, 9, 0x00, 0xFF];
        let err = Reader::from_byte_slice(&bytes).read_chunk().unwrap_err();
        assert!(err.is_out_of_bounds());
        assert_eq!(err.position(), 8);
    }
}
