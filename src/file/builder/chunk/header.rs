use crate::{
    HeaderError,
    file::{FormatType, Timing},
    reader::{ReadResult, Reader, ReaderErrorKind},
};

#[doc = r#"
The content of an `MThd` chunk

```text
<format: u16> <track count: u16> <division: u16>
```
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawHeaderChunk {
    format: FormatType,
    num_tracks: u16,
    timing: Timing,
}

impl RawHeaderChunk {
    /// Decode a header chunk body of `len` bytes
    pub(crate) fn read(reader: &mut Reader<'_>, len: u32) -> ReadResult<Self> {
        if len < 6 {
            return Err(reader.err(ReaderErrorKind::header(HeaderError::Length(len))));
        }
        let format = reader.read_u16()?;
        let format = FormatType::try_from(format)
            .map_err(|_| reader.err(ReaderErrorKind::header(HeaderError::InvalidFormat(format))))?;
        let num_tracks = reader.read_u16()?;
        let timing = Timing::read(reader)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "Header chunk: format {}, {num_tracks} tracks, {} ticks per quarter note",
            u16::from(format),
            timing.ticks_per_quarter_note()
        );

        Ok(Self {
            format,
            num_tracks,
            timing,
        })
    }

    /// How the tracks of the file relate to each other
    pub const fn format_type(&self) -> FormatType {
        self.format
    }

    /// The number of track chunks the header announces
    pub const fn num_tracks(&self) -> u16 {
        self.num_tracks
    }

    /// The time division
    pub const fn ticks_per_quarter_note(&self) -> u16 {
        self.timing.ticks_per_quarter_note()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ParseError, reader::ReaderError};
    use pretty_assertions::assert_eq;

    fn read(body: &[u8]) -> Result<RawHeaderChunk, ReaderError> {
        let mut reader = Reader::from_byte_slice(body);
        RawHeaderChunk::read(&mut reader, body.len() as u32)
    }

    #[test]
    fn extra_bytes_are_ignored() {
        let header = read(&[0, 0, 0, 1, 0x01, 0xE0, 0xAA, 0xBB]).unwrap();
        assert_eq!(header.format_type(), FormatType::SingleMultiChannel);
        assert_eq!(header.ticks_per_quarter_note(), 480);
    }

    #[test]
    fn short_header() {
        let err = read(&[0, 0, 0, 1]).unwrap_err();
        assert_eq!(
            err.parse_error(),
            Some(&ParseError::Header(HeaderError::Length(4)))
        );
    }

    #[test]
    fn invalid_format() {
        let err = read(&[0, 3, 0, 1, 0, 96]).unwrap_err();
        assert_eq!(
            err.parse_error(),
            Some(&ParseError::Header(HeaderError::InvalidFormat(3)))
        );
    }

    #[test]
    fn smpte_division() {
        let err = read(&[0, 1, 0, 1, 0xE7, 0x28]).unwrap_err();
        assert_eq!(
            err.parse_error(),
            Some(&ParseError::Header(HeaderError::UnsupportedDivision(0xE728)))
        );
    }
}
