use core::fmt;

/// Microseconds per minute
const MICROS_PER_MINUTE: f64 = 60_000_000.;

#[doc = r#"
The payload of a set-tempo meta event (`FF 51 03`): microseconds per quarter note.

The value is stored as it appears in the file; beats per minute are derived.

# Example
```rust
# use midiscore::prelude::*;
let tempo = Tempo::from_bpm(120.);
assert_eq!(tempo.micros_per_quarter_note(), 500_000);
assert_eq!(tempo.bpm(), 120.);
```
"#]
#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Clone, Copy, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tempo(u32);

impl Tempo {
    /// The largest value the 3 byte payload can hold
    pub const MAX_MICROS: u32 = 0x00FF_FFFF;

    /// Create a tempo from microseconds per quarter note.
    ///
    /// Clamped to `1..=0xFFFFFF`.
    pub const fn from_micros(micros_per_quarter_note: u32) -> Self {
        let micros = if micros_per_quarter_note == 0 {
            1
        } else if micros_per_quarter_note > Self::MAX_MICROS {
            Self::MAX_MICROS
        } else {
            micros_per_quarter_note
        };
        Self(micros)
    }

    /// Create a tempo from beats per minute, as `floor(60_000_000 / bpm)`.
    pub fn from_bpm(bpm: f64) -> Self {
        let micros = MICROS_PER_MINUTE / bpm;
        // float to int casts saturate, and NaN becomes 0
        Self::from_micros(micros as u32)
    }

    /// Microseconds per quarter note
    pub const fn micros_per_quarter_note(&self) -> u32 {
        self.0
    }

    /// Quarter notes per minute
    pub fn bpm(&self) -> f64 {
        MICROS_PER_MINUTE / self.0 as f64
    }

    pub(crate) const fn to_bytes(self) -> [u8; 3] {
        let [_, a, b, c] = self.0.to_be_bytes();
        [a, b, c]
    }
}

impl fmt::Display for Tempo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} bpm", self.bpm())
    }
}

#[test]
fn tempo_clamps() {
    assert_eq!(Tempo::from_micros(0).micros_per_quarter_note(), 1);
    assert_eq!(Tempo::from_bpm(0.).micros_per_quarter_note(), Tempo::MAX_MICROS);
    assert_eq!(Tempo::from_bpm(f64::NAN).micros_per_quarter_note(), 1);
}

#[test]
fn tempo_floors() {
    // 60_000_000 / 70 = 857142.857...
    assert_eq!(Tempo::from_bpm(70.).micros_per_quarter_note(), 857_142);
    assert_eq!(Tempo::from_micros(0x07A120).to_bytes(), [0x07, 0xA1, 0x20]);
}
