use crate::NameError;
use alloc::string::ToString;

/// General MIDI program names, indexed by program number
pub const INSTRUMENT_NAMES: [&str; 128] = [
    "acoustic grand piano",
    "bright acoustic piano",
    "electric grand piano",
    "honky-tonk piano",
    "electric piano 1",
    "electric piano 2",
    "harpsichord",
    "clavi",
    "celesta",
    "glockenspiel",
    "music box",
    "vibraphone",
    "marimba",
    "xylophone",
    "tubular bells",
    "dulcimer",
    "drawbar organ",
    "percussive organ",
    "rock organ",
    "church organ",
    "reed organ",
    "accordion",
    "harmonica",
    "tango accordion",
    "acoustic guitar (nylon)",
    "acoustic guitar (steel)",
    "electric guitar (jazz)",
    "electric guitar (clean)",
    "electric guitar (muted)",
    "overdriven guitar",
    "distortion guitar",
    "guitar harmonics",
    "acoustic bass",
    "electric bass (finger)",
    "electric bass (pick)",
    "fretless bass",
    "slap bass 1",
    "slap bass 2",
    "synth bass 1",
    "synth bass 2",
    "violin",
    "viola",
    "cello",
    "contrabass",
    "tremolo strings",
    "pizzicato strings",
    "orchestral harp",
    "timpani",
    "string ensemble 1",
    "string ensemble 2",
    "synthstrings 1",
    "synthstrings 2",
    "choir aahs",
    "voice oohs",
    "synth voice",
    "orchestra hit",
    "trumpet",
    "trombone",
    "tuba",
    "muted trumpet",
    "french horn",
    "brass section",
    "synthbrass 1",
    "synthbrass 2",
    "soprano sax",
    "alto sax",
    "tenor sax",
    "baritone sax",
    "oboe",
    "english horn",
    "bassoon",
    "clarinet",
    "piccolo",
    "flute",
    "recorder",
    "pan flute",
    "blown bottle",
    "shakuhachi",
    "whistle",
    "ocarina",
    "lead 1 (square)",
    "lead 2 (sawtooth)",
    "lead 3 (calliope)",
    "lead 4 (chiff)",
    "lead 5 (charang)",
    "lead 6 (voice)",
    "lead 7 (fifths)",
    "lead 8 (bass + lead)",
    "pad 1 (new age)",
    "pad 2 (warm)",
    "pad 3 (polysynth)",
    "pad 4 (choir)",
    "pad 5 (bowed)",
    "pad 6 (metallic)",
    "pad 7 (halo)",
    "pad 8 (sweep)",
    "fx 1 (rain)",
    "fx 2 (soundtrack)",
    "fx 3 (crystal)",
    "fx 4 (atmosphere)",
    "fx 5 (brightness)",
    "fx 6 (goblins)",
    "fx 7 (echoes)",
    "fx 8 (sci-fi)",
    "sitar",
    "banjo",
    "shamisen",
    "koto",
    "kalimba",
    "bag pipe",
    "fiddle",
    "shanai",
    "tinkle bell",
    "agogo",
    "steel drums",
    "woodblock",
    "taiko drum",
    "melodic tom",
    "synth drum",
    "reverse cymbal",
    "guitar fret noise",
    "breath noise",
    "seashore",
    "bird tweet",
    "telephone ring",
    "helicopter",
    "applause",
    "gunshot",
];

/// General MIDI instrument families, one per 8 programs
pub const INSTRUMENT_FAMILIES: [&str; 16] = [
    "piano",
    "chromatic percussion",
    "organ",
    "guitar",
    "bass",
    "strings",
    "ensemble",
    "brass",
    "reed",
    "pipe",
    "synth lead",
    "synth pad",
    "synth effects",
    "ethnic",
    "percussive",
    "sound effects",
];

/// Drum kits selected by program number on the percussion channel
pub const DRUM_KIT_NAMES: [(u8, &str); 9] = [
    (0, "standard kit"),
    (8, "room kit"),
    (16, "power kit"),
    (24, "electronic kit"),
    (25, "tr-808 kit"),
    (32, "jazz kit"),
    (40, "brush kit"),
    (48, "orchestra kit"),
    (56, "sound fx kit"),
];

/// The family of every percussion-channel track
pub const DRUM_FAMILY: &str = "drums";

#[doc = r#"
The program a track plays.

Whether the program is read as a melodic instrument or a drum kit depends
on the owning track's channel, so the name lookups take that as an argument.

# Example
```rust
# use midiscore::prelude::*;
let mut instrument = Instrument::new(25);
assert_eq!(instrument.name(false), Some("acoustic guitar (steel)"));
assert_eq!(instrument.family(false), "guitar");
assert_eq!(instrument.name(true), Some("tr-808 kit"));
assert_eq!(instrument.family(true), "drums");

instrument.set_name("violin").unwrap();
assert_eq!(instrument.number, 40);
```
"#]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Instrument {
    /// Program number, `0..=127`
    pub number: u8,
}

impl Instrument {
    /// An instrument with the given program number (masked to 7 bits)
    pub const fn new(number: u8) -> Self {
        Self {
            number: number & 0x7F,
        }
    }

    /// Look up a General MIDI program by name
    pub fn from_name(name: &str) -> Option<Self> {
        INSTRUMENT_NAMES
            .iter()
            .position(|n| *n == name)
            .map(|number| Self::new(number as u8))
    }

    /// The General MIDI name, or the drum kit name on the percussion channel.
    ///
    /// Only some programs name a drum kit.
    pub fn name(&self, percussion: bool) -> Option<&'static str> {
        if percussion {
            DRUM_KIT_NAMES
                .iter()
                .find(|(number, _)| *number == self.number)
                .map(|(_, name)| *name)
        } else {
            INSTRUMENT_NAMES.get(self.number as usize).copied()
        }
    }

    /// Switch to the General MIDI program called `name`
    pub fn set_name(&mut self, name: &str) -> Result<(), NameError> {
        *self = Self::from_name(name).ok_or_else(|| NameError::Instrument(name.to_string()))?;
        Ok(())
    }

    /// The General MIDI family, e.g. `"piano"`
    pub fn family(&self, percussion: bool) -> &'static str {
        if percussion {
            DRUM_FAMILY
        } else {
            INSTRUMENT_FAMILIES[(self.number as usize / 8) % INSTRUMENT_FAMILIES.len()]
        }
    }
}

#[test]
fn families_follow_program_blocks() {
    assert_eq!(Instrument::new(0).family(false), "piano");
    assert_eq!(Instrument::new(7).family(false), "piano");
    assert_eq!(Instrument::new(8).family(false), "chromatic percussion");
    assert_eq!(Instrument::new(127).family(false), "sound effects");
    assert_eq!(Instrument::new(127).name(false), Some("gunshot"));
}

#[test]
fn unknown_names() {
    let mut instrument = Instrument::new(3);
    assert_eq!(
        instrument.set_name("kazoo"),
        Err(NameError::Instrument("kazoo".to_string()))
    );
    assert_eq!(instrument.number, 3);
    assert_eq!(instrument.name(true), None);
}
