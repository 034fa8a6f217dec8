use crate::{
    HeaderError,
    reader::{ReadResult, Reader, ReaderErrorKind},
};

/// The header timing type.
///
/// Only a tick rate per quarter note is supported. A division with its top
/// bit set counts SMPTE frames instead and is rejected when reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    inner: [u8; 2],
}

impl Timing {
    /// The tickrate per quarter note defines what a "quarter note" means.
    ///
    /// The leading bit of the u16 is disregarded, so 1-32767
    pub const fn new_ticks_per_quarter_note(tpqn: u16) -> Self {
        Self {
            inner: (tpqn & 0x7FFF).to_be_bytes(),
        }
    }

    pub(crate) fn read(reader: &mut Reader<'_>) -> ReadResult<Self> {
        let bytes: [u8; 2] = reader.read_exact_size()?;
        match bytes[0] >> 7 {
            0 => Ok(Self { inner: bytes }),
            _ => Err(reader.err(ReaderErrorKind::header(HeaderError::UnsupportedDivision(
                u16::from_be_bytes(bytes),
            )))),
        }
    }

    /// Returns the ticks per quarter note for the file.
    pub const fn ticks_per_quarter_note(&self) -> u16 {
        u16::from_be_bytes(self.inner)
    }
}

#[test]
fn top_bit_is_masked() {
    assert_eq!(
        Timing::new_ticks_per_quarter_note(0x81E0).ticks_per_quarter_note(),
        480
    );
}
