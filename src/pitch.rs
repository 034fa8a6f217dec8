#![doc = r#"
Scientific pitch notation for MIDI note numbers

A MIDI note number is a [`Key`] (pitch class) in an [`Octave`]. Note `60` is
`C4`, note `0` is `C-1` and note `127` is `G9`.
"#]

use crate::NameError;
use alloc::string::{String, ToString};
use core::{fmt, str::FromStr};

#[doc = r#"
A MIDI note number, `0..=127`

# Example
```rust
# use midiscore::prelude::*;
let pitch: Pitch = "Eb4".parse().unwrap();

assert_eq!(pitch.midi(), 63);
assert_eq!(pitch.key(), Key::DSharp);
assert_eq!(pitch.octave(), Octave::new(4));
assert_eq!(pitch.to_string(), "D#4");
```
"#]
#[derive(Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pitch(u8);

impl Pitch {
    /// Create a pitch from a note number, clamped to 127
    pub const fn from_midi(midi: u8) -> Self {
        Self(if midi > 127 { 127 } else { midi })
    }

    /// Create a pitch from a key and octave
    ///
    /// # Panics
    /// if the resulting note number is above 127 (`G#9` and higher).
    pub const fn new(key: Key, octave: Octave) -> Self {
        let midi = (octave.value() + 1) as u8 * 12 + key.semitone();
        if midi > 127 {
            panic!("pitch is above G9");
        }
        Self(midi)
    }

    /// The note number
    pub const fn midi(&self) -> u8 {
        self.0
    }

    /// The pitch class
    #[inline]
    pub const fn key(&self) -> Key {
        Key::from_semitone(self.0)
    }

    /// The octave, where middle C starts octave 4
    #[inline]
    pub const fn octave(&self) -> Octave {
        Octave((self.0 / 12) as i8 - 1)
    }

    /// The name in scientific pitch notation, spelled with sharps
    pub fn name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.key(), self.octave())
    }
}

impl FromStr for Pitch {
    type Err = NameError;

    /// Parse a letter, an optional accidental (`#`, `x`, `b` or `bb`) and an octave.
    /// The letter is case insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || NameError::Pitch(s.to_string());
        let (semitone, rest) = parse_pitch_class(s).ok_or_else(invalid)?;
        let octave: i32 = rest.parse().map_err(|_| invalid())?;
        let midi = octave
            .checked_add(1)
            .and_then(|o| o.checked_mul(12))
            .and_then(|o| o.checked_add(semitone))
            .ok_or_else(invalid)?;
        u8::try_from(midi)
            .ok()
            .filter(|m| *m <= 127)
            .map(Self)
            .ok_or(NameError::OutOfRange(midi))
    }
}

/// Split a leading pitch class off `s`, returning its semitone offset from C.
///
/// The offset can fall outside `0..12`, e.g. `Cb` is `-1` and `B#` is `12`.
fn parse_pitch_class(s: &str) -> Option<(i32, &str)> {
    let mut chars = s.chars();
    let letter = match chars.next()?.to_ascii_lowercase() {
        'c' => 0,
        'd' => 2,
        'e' => 4,
        'f' => 5,
        'g' => 7,
        'a' => 9,
        'b' => 11,
        _ => return None,
    };
    let rest = chars.as_str();
    let (accidental, rest) = if let Some(rest) = rest.strip_prefix("bb") {
        (-2, rest)
    } else if let Some(rest) = rest.strip_prefix('b') {
        (-1, rest)
    } else if let Some(rest) = rest.strip_prefix('#') {
        (1, rest)
    } else if let Some(rest) = rest.strip_prefix(['x', 'X']) {
        (2, rest)
    } else {
        (0, rest)
    };
    Some((letter + accidental, rest))
}

#[allow(missing_docs)]
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[doc = r#"
A pitch class

# Example
```rust
# use midiscore::prelude::*;
let key = Key::FSharp;
let pitch = key.with_octave(Octave::new(4));

assert_eq!(pitch.midi(), 66);
assert_eq!("Gb".parse::<Key>().unwrap(), key);
```
"#]
pub enum Key {
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
    B,
}

impl Key {
    /// Returns an array beginning with [`Key::C`] to [`Key::B`]
    pub fn all() -> [Key; 12] {
        use Key::*;
        [C, CSharp, D, DSharp, E, F, FSharp, G, GSharp, A, ASharp, B]
    }

    /// Returns true if the key is a black key
    #[inline]
    pub const fn is_sharp(&self) -> bool {
        use Key::*;
        matches!(self, CSharp | DSharp | FSharp | GSharp | ASharp)
    }

    /// The pitch class of a note number (or any semitone count from C)
    pub const fn from_semitone(semitone: u8) -> Self {
        use Key::*;
        match semitone % 12 {
            0 => C,
            1 => CSharp,
            2 => D,
            3 => DSharp,
            4 => E,
            5 => F,
            6 => FSharp,
            7 => G,
            8 => GSharp,
            9 => A,
            10 => ASharp,
            _ => B,
        }
    }

    /// Semitones above C
    pub const fn semitone(&self) -> u8 {
        *self as u8
    }

    /// The name, spelled with a sharp for black keys
    pub const fn name(&self) -> &'static str {
        use Key::*;
        match self {
            C => "C",
            CSharp => "C#",
            D => "D",
            DSharp => "D#",
            E => "E",
            F => "F",
            FSharp => "F#",
            G => "G",
            GSharp => "G#",
            A => "A",
            ASharp => "A#",
            B => "B",
        }
    }

    /// Create a [`Pitch`] given this key and a provided [`Octave`]
    pub const fn with_octave(self, octave: Octave) -> Pitch {
        Pitch::new(self, octave)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Key {
    type Err = NameError;

    /// Any spelling is accepted: `"Db"`, `"C#"` and `"Bx"` are all `Key::CSharp`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match parse_pitch_class(s) {
            Some((semitone, "")) => Ok(Self::from_semitone(semitone.rem_euclid(12) as u8)),
            _ => Err(NameError::Pitch(s.to_string())),
        }
    }
}

#[doc = r#"
Identifies the octave of a [`Pitch`]. Values range from -1 to 9.

# Example

```rust
# use midiscore::prelude::*;
let octave = Octave::new(12); // clamps to 9

assert_eq!(octave.value(), 9);
assert_eq!(octave.with_key(Key::C).midi(), 120);
```
"#]
#[derive(PartialEq, Eq, Debug, Clone, Copy, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Octave(i8);

impl Octave {
    /// Should be a value between [-1, 9]. Clamps between these two values.
    pub const fn new(mut octave: i8) -> Self {
        if octave < -1 {
            octave = -1
        } else if octave > 9 {
            octave = 9;
        }
        Self(octave)
    }

    /// The octave, from `[-1,9]`
    pub const fn value(&self) -> i8 {
        self.0
    }

    /// Create a [`Pitch`] given this octave and a provided [`Key`]
    pub const fn with_key(self, key: Key) -> Pitch {
        Pitch::new(key, self)
    }
}

impl fmt::Display for Octave {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn names() {
        assert_eq!(Pitch::from_midi(60).name(), "C4");
        assert_eq!(Pitch::from_midi(0).name(), "C-1");
        assert_eq!(Pitch::from_midi(127).name(), "G9");
        assert_eq!(Pitch::from_midi(70).name(), "A#4");
    }

    #[test]
    fn parse_accidentals() {
        let parse = |s: &str| s.parse::<Pitch>().map(|p| p.midi());
        assert_eq!(parse("C4"), Ok(60));
        assert_eq!(parse("c4"), Ok(60));
        assert_eq!(parse("C#4"), Ok(61));
        assert_eq!(parse("Db4"), Ok(61));
        assert_eq!(parse("Cx4"), Ok(62));
        assert_eq!(parse("Ebb4"), Ok(62));
        assert_eq!(parse("Cb4"), Ok(59));
        assert_eq!(parse("B#3"), Ok(60));
        assert_eq!(parse("Bb-1"), Ok(10));
        assert_eq!(parse("A-1"), Ok(9));
    }

    #[test]
    fn parse_failures() {
        assert_eq!(
            "H4".parse::<Pitch>(),
            Err(NameError::Pitch("H4".to_string()))
        );
        assert_eq!(
            "C".parse::<Pitch>(),
            Err(NameError::Pitch("C".to_string()))
        );
        assert_eq!("G#9".parse::<Pitch>(), Err(NameError::OutOfRange(128)));
        assert_eq!("Cb-1".parse::<Pitch>(), Err(NameError::OutOfRange(-1)));
    }

    #[test]
    fn key_spellings() {
        assert_eq!("Db".parse::<Key>(), Ok(Key::CSharp));
        assert_eq!("B#".parse::<Key>(), Ok(Key::C));
        assert_eq!("Cb".parse::<Key>(), Ok(Key::B));
        assert!("C4".parse::<Key>().is_err());
    }

    #[test]
    fn key_octave_pairs() {
        for midi in 0..128 {
            let pitch = Pitch::from_midi(midi);
            assert_eq!(Pitch::new(pitch.key(), pitch.octave()), pitch);
            assert_eq!(pitch.name().parse::<Pitch>(), Ok(pitch));
        }
    }
}
