use alloc::string::String;
use thiserror::Error;

/// Everything that can be wrong with the bytes of a MIDI file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Chunk framing errors
    #[error("Chunk: {0}")]
    Chunk(#[from] ChunkError),
    /// `MThd` content errors
    #[error("Header: {0}")]
    Header(#[from] HeaderError),
    /// Meta event payload errors
    #[error("Meta event: {0}")]
    Meta(#[from] MetaError),
    /// Track event errors
    #[error("Event: {0}")]
    Event(#[from] EventError),
}

/// Errors in the chunk layout of the file
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChunkError {
    /// A chunk had a different identifier than the one required at this point.
    ///
    /// The first chunk must be `MThd`, every following one `MTrk`.
    #[error("Expected chunk {:?}, found {:?}", expected, found)]
    Unexpected {
        /// The required ASCII identifier
        expected: [u8; 4],
        /// What the file contained instead
        found: [u8; 4],
    },
}

/// Errors in the `MThd` chunk.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    /// The header chunk is shorter than its 6 fixed bytes
    #[error("Header length must be at least 6, got {0}")]
    Length(u32),
    /// The format word is not 0, 1 or 2
    #[error("Invalid format {0}")]
    InvalidFormat(u16),
    /// The division has its top bit set (SMPTE frames), which is not supported
    #[error("SMPTE time division {0:#06X} is not supported")]
    UnsupportedDivision(u16),
}

/// Errors in the payload of a meta event
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetaError {
    /// A fixed-shape meta event declared a different length than its shape requires
    #[error("Meta event {kind:#04X} must have length {expected}, declared {found}")]
    Length {
        /// the meta type byte
        kind: u8,
        /// the length the event type requires
        expected: u32,
        /// the declared length
        found: u32,
    },
    /// A time signature denominator power too large to represent
    #[error("Time signature denominator 2^{0} is out of range")]
    Denominator(u8),
}

/// Errors decoding a single track event
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    /// A status byte that is neither a channel event, sysex nor meta event
    #[error("Unrecognized status byte {0:#04X}")]
    Unrecognized(u8),
    /// A data byte appeared before any status byte could be reused
    #[error("Running status data byte {0:#04X} without a previous status")]
    RunningStatusWithoutStatus(u8),
    /// A variable length quantity longer than 4 bytes
    #[error("Variable length quantity exceeds 4 bytes")]
    VarLenOverflow,
}

/// Errors looking up a pitch or instrument by name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    /// Not scientific pitch notation, e.g. `"C#4"`
    #[error("{0:?} is not a pitch name")]
    Pitch(String),
    /// The pitch name is valid but lies outside `0..=127`
    #[error("Pitch {0} is outside the MIDI note range")]
    OutOfRange(i32),
    /// Not a General MIDI program name
    #[error("{0:?} is not a General MIDI instrument")]
    Instrument(String),
}

/// Errors rebuilding a file from an exported document
#[derive(Debug, Clone, PartialEq, Error)]
pub enum JsonError {
    /// A tempo that is not a positive, finite number
    #[error("Tempo {bpm} at tick {ticks} must be positive")]
    Tempo {
        /// position of the tempo
        ticks: u32,
        /// the rejected tempo
        bpm: f64,
    },
    /// A time signature with a zero or oversized part
    #[error("Time signature {}/{} at tick {ticks} is not valid", .time_signature[0], .time_signature[1])]
    TimeSignature {
        /// position of the time signature
        ticks: u32,
        /// `[numerator, denominator]`
        time_signature: [u16; 2],
    },
    /// A key name outside the circle of fifths, or a scale other than major or minor
    #[error("Unknown key signature {key:?} {scale:?}")]
    KeySignature {
        /// the key name
        key: String,
        /// the scale name
        scale: String,
    },
    /// A meta type name that is not a text meta event
    #[error("Unknown meta type {0:?}")]
    MetaType(String),
}
