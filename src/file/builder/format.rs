use num_enum::{IntoPrimitive, TryFromPrimitive};

#[doc = r#"
The format word of the `MThd` chunk
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u16)]
pub enum FormatType {
    /// Format 0: a single track holding every channel
    SingleMultiChannel = 0,
    /// Format 1: tracks played together, the first one holding the tempo map
    Simultaneous = 1,
    /// Format 2: independent single-track sequences
    SequentiallyIndependent = 2,
}

impl FormatType {
    /// The format for a file with `num_chunks` track chunks
    pub const fn for_track_count(num_chunks: usize) -> Self {
        if num_chunks > 1 {
            Self::Simultaneous
        } else {
            Self::SingleMultiChannel
        }
    }
}
