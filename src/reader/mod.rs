#![doc = r#"
Forward-only decoding of MIDI bytes

[`Reader`] walks a borrowed byte slice once. Every read advances the same
position counter; there is no seeking backwards. Reading past the end of the
slice yields [`ReaderErrorKind::OutOfBounds`].

Track events are decoded with [`Reader::read_track_event`], which carries the
running status between calls.
"#]

mod error;
pub use error::*;

mod event;

#[doc = r#"
A sequential reader over a byte slice.

Multi-byte integers are big-endian, as everywhere in a Standard MIDI File.

# Example
```rust
# use midiscore::reader::Reader;
let mut reader = Reader::from_byte_slice(&[0x00, 0x60, 0x81, 0x00]);
assert_eq!(reader.read_u16().unwrap(), 0x60);
assert_eq!(reader.read_varlen().unwrap(), 128);
assert!(reader.is_at_end());
```
"#]
#[derive(Debug, Clone)]
pub struct Reader<'slc> {
    data: &'slc [u8],
    position: usize,
    /// absolute offset of `data[0]` in the outermost buffer
    offset: usize,
}

impl<'slc> Reader<'slc> {
    /// Create a reader positioned at the start of `data`
    pub const fn from_byte_slice(data: &'slc [u8]) -> Self {
        Self {
            data,
            position: 0,
            offset: 0,
        }
    }

    /// The absolute byte offset of the next read.
    pub const fn buffer_position(&self) -> usize {
        self.offset + self.position
    }

    /// Bytes left to read
    pub const fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// True if every byte has been consumed
    pub const fn is_at_end(&self) -> bool {
        self.position >= self.data.len()
    }

    pub(crate) fn err(&self, kind: ReaderErrorKind) -> ReaderError {
        ReaderError::new(self.buffer_position(), kind)
    }

    /// Returns the next byte without consuming it
    pub fn peek_u8(&self) -> ReadResult<u8> {
        self.data
            .get(self.position)
            .copied()
            .ok_or_else(|| ReaderError::oob(self.buffer_position()))
    }

    /// Read `len` bytes
    pub fn read_bytes(&mut self, len: usize) -> ReadResult<&'slc [u8]> {
        let end = self
            .position
            .checked_add(len)
            .filter(|end| *end <= self.data.len())
            .ok_or_else(|| ReaderError::oob(self.buffer_position()))?;
        let bytes = &self.data[self.position..end];
        self.position = end;
        Ok(bytes)
    }

    /// Read exactly `N` bytes into an array
    pub fn read_exact_size<const N: usize>(&mut self) -> ReadResult<[u8; N]> {
        let bytes = self.read_bytes(N)?;
        let mut out = [0; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    /// Read one unsigned byte
    pub fn read_u8(&mut self) -> ReadResult<u8> {
        let byte = self.peek_u8()?;
        self.position += 1;
        Ok(byte)
    }

    /// Read one byte as a two's complement value
    pub fn read_i8(&mut self) -> ReadResult<i8> {
        self.read_u8().map(|b| b as i8)
    }

    /// Read a big-endian `u16`
    pub fn read_u16(&mut self) -> ReadResult<u16> {
        self.read_exact_size().map(u16::from_be_bytes)
    }

    /// Read a big-endian `u32`
    pub fn read_u32(&mut self) -> ReadResult<u32> {
        self.read_exact_size().map(u32::from_be_bytes)
    }

    /// Read a 24-bit big-endian value, as used by the tempo meta event
    pub fn read_u24(&mut self) -> ReadResult<u32> {
        let [a, b, c] = self.read_exact_size()?;
        Ok(u32::from_be_bytes([0, a, b, c]))
    }

    /// Read a variable length quantity.
    ///
    /// Big-endian base 128; the high bit of each byte flags that another byte
    /// follows. At most 4 bytes are accepted (values up to `0x0FFF_FFFF`).
    pub fn read_varlen(&mut self) -> ReadResult<u32> {
        let mut value: u32 = 0;
        for _ in 0..4 {
            let byte = self.read_u8()?;
            value = (value << 7) | (byte & 0x7F) as u32;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(self.err(ReaderErrorKind::event(crate::EventError::VarLenOverflow)))
    }

    /// Split off the next `len` bytes as their own reader.
    ///
    /// Positions reported by the child stay absolute.
    pub fn sub_reader(&mut self, len: usize) -> ReadResult<Reader<'slc>> {
        let offset = self.buffer_position();
        let data = self.read_bytes(len)?;
        Ok(Reader {
            data,
            position: 0,
            offset,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EventError, ParseError};
    use pretty_assertions::assert_eq;

    #[test]
    fn reads_big_endian() {
        let mut reader = Reader::from_byte_slice(&[0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE, 0xFF]);
        assert_eq!(reader.read_u16().unwrap(), 0x1234);
        assert_eq!(reader.read_u32().unwrap(), 0x5678_9ABC);
        assert_eq!(reader.read_u8().unwrap(), 0xDE);
        assert_eq!(reader.read_i8().unwrap(), -1);
        assert!(reader.is_at_end());
    }

    #[test]
    fn varlen_examples() {
        let cases: &[(&[u8], u32)] = &[
            (&[0x00], 0),
            (&[0x40], 0x40),
            (&[0x7F], 0x7F),
            (&[0x81, 0x00], 0x80),
            (&[0xC0, 0x00], 0x2000),
            (&[0xFF, 0x7F], 0x3FFF),
            (&[0x81, 0x80, 0x00], 0x4000),
            (&[0xFF, 0xFF, 0x7F], 0x1F_FFFF),
            (&[0x81, 0x80, 0x80, 0x00], 0x20_0000),
            (&[0xFF, 0xFF, 0xFF, 0x7F], 0x0FFF_FFFF),
        ];
        for (bytes, expected) in cases {
            let mut reader = Reader::from_byte_slice(bytes);
            assert_eq!(reader.read_varlen().unwrap(), *expected);
            assert!(reader.is_at_end());
        }
    }

    #[test]
    fn truncated_varlen() {
        let mut reader = Reader::from_byte_slice(&[0x81, 0x80]);
        let err = reader.read_varlen().unwrap_err();
        assert!(err.is_out_of_bounds());
        assert_eq!(err.position(), 2);
    }

    #[test]
    fn overlong_varlen() {
        let mut reader = Reader::from_byte_slice(&[0x80, 0x80, 0x80, 0x80, 0x00]);
        let err = reader.read_varlen().unwrap_err();
        assert_eq!(
            err.parse_error(),
            Some(&ParseError::Event(EventError::VarLenOverflow))
        );
    }

    #[test]
    fn sub_reader_keeps_absolute_positions() {
        let mut reader = Reader::from_byte_slice(&[1, 2, 3, 4, 5]);
        reader.read_u8().unwrap();
        let mut child = reader.sub_reader(2).unwrap();
        assert_eq!(reader.buffer_position(), 3);
        assert_eq!(child.read_u16().unwrap(), 0x0203);
        let err = child.read_u8().unwrap_err();
        assert_eq!(err.position(), 3);
    }

    #[test]
    fn read_bytes_past_end() {
        let mut reader = Reader::from_byte_slice(&[1, 2]);
        assert!(reader.read_bytes(3).unwrap_err().is_out_of_bounds());
        // a failed read does not advance
        assert_eq!(reader.read_bytes(2).unwrap(), &[1, 2]);
    }
}
