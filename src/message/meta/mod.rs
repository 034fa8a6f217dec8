#![doc = r#"
Meta events: `FF <type> <length> <payload>`

Tempo, time signature, key signature and end-of-track are decoded. Sequence
number, channel prefix and SMPTE offset only have their length checked and
keep their raw bytes, like any other unknown type. Text events keep their
payload as a string.
"#]

mod tempo;
pub use tempo::*;

use alloc::{string::String, vec::Vec};
use num_enum::{IntoPrimitive, TryFromPrimitive};

/// `FF 00`
pub const SEQUENCE_NUMBER: u8 = 0x00;
/// `FF 03`
pub const TRACK_NAME: u8 = 0x03;
/// `FF 2F`
pub const END_OF_TRACK: u8 = 0x2F;
/// `FF 20`
pub const CHANNEL_PREFIX: u8 = 0x20;
/// `FF 51`
pub const SET_TEMPO: u8 = 0x51;
/// `FF 54`
pub const SMPTE_OFFSET: u8 = 0x54;
/// `FF 58`
pub const TIME_SIGNATURE: u8 = 0x58;
/// `FF 59`
pub const KEY_SIGNATURE: u8 = 0x59;

/// The payload length a meta type must declare, if it has a fixed shape
pub(crate) const fn fixed_length(kind: u8) -> Option<u32> {
    match kind {
        SEQUENCE_NUMBER => Some(2),
        CHANNEL_PREFIX => Some(1),
        END_OF_TRACK => Some(0),
        SET_TEMPO => Some(3),
        SMPTE_OFFSET => Some(5),
        TIME_SIGNATURE => Some(4),
        KEY_SIGNATURE => Some(2),
        _ => None,
    }
}

#[doc = r#"
Text-carrying meta types other than the track name
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
#[allow(missing_docs)]
pub enum TextKind {
    Text = 0x01,
    Copyright = 0x02,
    InstrumentName = 0x04,
    Lyrics = 0x05,
    Marker = 0x06,
    CuePoint = 0x07,
    ProgramName = 0x08,
    DeviceName = 0x09,
}

impl TextKind {
    const NAMES: [(TextKind, &'static str); 8] = [
        (TextKind::Text, "text"),
        (TextKind::Copyright, "copyrightNotice"),
        (TextKind::InstrumentName, "instrumentName"),
        (TextKind::Lyrics, "lyrics"),
        (TextKind::Marker, "marker"),
        (TextKind::CuePoint, "cuePoint"),
        (TextKind::ProgramName, "programName"),
        (TextKind::DeviceName, "deviceName"),
    ];

    /// The name used in the exported document, e.g. `"lyrics"`
    pub fn name(&self) -> &'static str {
        Self::NAMES
            .iter()
            .find(|(kind, _)| kind == self)
            .map(|(_, name)| *name)
            .unwrap_or("text")
    }

    /// Look a kind up by its exported name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::NAMES
            .iter()
            .find(|(_, n)| *n == name)
            .map(|(kind, _)| *kind)
    }
}

#[doc = r#"
The payload of `FF 58 04 nn dd cc bb`.

`denominator` is the actual note value (`2^dd`), not the stored power.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeSignature {
    /// Beats per measure
    pub numerator: u8,
    /// Beat unit, a power of two
    pub denominator: u16,
    /// MIDI clocks per metronome click
    pub clocks_per_click: u8,
    /// Notated 32nd notes per MIDI quarter note
    pub thirty_seconds_per_quarter: u8,
}

impl TimeSignature {
    /// A time signature with the usual metronome values (24 clocks, 8 32nds)
    pub const fn new(numerator: u8, denominator: u16) -> Self {
        Self {
            numerator,
            denominator,
            clocks_per_click: 24,
            thirty_seconds_per_quarter: 8,
        }
    }

    /// `log2(denominator)`, rounded down
    pub const fn denominator_power(&self) -> u8 {
        let den = if self.denominator == 0 {
            1
        } else {
            self.denominator
        };
        (u16::BITS - 1 - den.leading_zeros()) as u8
    }

    pub(crate) const fn to_bytes(self) -> [u8; 4] {
        [
            self.numerator,
            self.denominator_power(),
            self.clocks_per_click,
            self.thirty_seconds_per_quarter,
        ]
    }
}

/// Key names by number of sharps, from 7 flats to 7 sharps
pub const KEY_NAMES: [&str; 15] = [
    "Cb", "Gb", "Db", "Ab", "Eb", "Bb", "F", "C", "G", "D", "A", "E", "B", "F#", "C#",
];

#[doc = r#"
The payload of `FF 59 02 sf mi`
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeySignature {
    /// Negative for flats, positive for sharps
    pub sharps_flats: i8,
    /// Minor rather than major
    pub minor: bool,
}

impl KeySignature {
    /// The key name, e.g. `"Eb"`, if `sharps_flats` is within `-7..=7`
    pub fn key_name(&self) -> Option<&'static str> {
        let index = self.sharps_flats as i16 + 7;
        usize::try_from(index)
            .ok()
            .and_then(|i| KEY_NAMES.get(i))
            .copied()
    }

    /// Build from a key name and scale
    pub fn from_name(key: &str, minor: bool) -> Option<Self> {
        let index = KEY_NAMES.iter().position(|k| *k == key)?;
        Some(Self {
            sharps_flats: index as i8 - 7,
            minor,
        })
    }

    /// `"major"` or `"minor"`
    pub const fn scale(&self) -> &'static str {
        if self.minor { "minor" } else { "major" }
    }

    pub(crate) const fn to_bytes(self) -> [u8; 2] {
        [self.sharps_flats as u8, self.minor as u8]
    }
}

#[doc = r#"
A decoded meta event
"#]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MetaMessage {
    /// `FF 03`: sequence or track name.
    ///
    /// Encoded as Latin-1: chars above `U+00FF` are truncated to their low byte.
    TrackName(String),
    /// Any other text event
    Text {
        /// which text meta type
        kind: TextKind,
        /// the payload, one char per byte (Latin-1, see [`MetaMessage::TrackName`])
        text: String,
    },
    /// `FF 51`
    Tempo(Tempo),
    /// `FF 58`
    TimeSignature(TimeSignature),
    /// `FF 59`
    KeySignature(KeySignature),
    /// `FF 2F`
    EndOfTrack,
    /// A meta type without a dedicated variant
    Unknown {
        /// the meta type byte
        kind: u8,
        /// the raw payload
        data: Vec<u8>,
    },
}

impl MetaMessage {
    /// The meta type byte
    pub fn kind(&self) -> u8 {
        match self {
            Self::TrackName(_) => TRACK_NAME,
            Self::Text { kind, .. } => (*kind).into(),
            Self::Tempo(_) => SET_TEMPO,
            Self::TimeSignature(_) => TIME_SIGNATURE,
            Self::KeySignature(_) => KEY_SIGNATURE,
            Self::EndOfTrack => END_OF_TRACK,
            Self::Unknown { kind, .. } => *kind,
        }
    }

    /// The serialized payload, without the type and length prefix
    pub fn payload(&self) -> Vec<u8> {
        match self {
            Self::TrackName(text) | Self::Text { text, .. } => text_to_bytes(text),
            Self::Tempo(tempo) => tempo.to_bytes().to_vec(),
            Self::TimeSignature(ts) => ts.to_bytes().to_vec(),
            Self::KeySignature(ks) => ks.to_bytes().to_vec(),
            Self::EndOfTrack => Vec::new(),
            Self::Unknown { data, .. } => data.clone(),
        }
    }
}

/// Text payloads are read one char per byte, so any byte sequence survives a round trip.
pub(crate) fn text_from_bytes(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Latin-1 encoding; a char above `U+00FF` keeps only its low byte.
pub(crate) fn text_to_bytes(text: &str) -> Vec<u8> {
    text.chars().map(|c| c as u8).collect()
}
