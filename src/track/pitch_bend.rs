use crate::{message::VoiceEvent, timeline::Header};

const CENTER: f64 = VoiceEvent::PITCH_BEND_CENTER as f64;

#[doc = r#"
A pitch bend, normalized so that `0.0` is no bend and the extremes are `-1.0`
and just below `1.0`

# Example
```rust
# use midiscore::prelude::*;
let bend = PitchBend::from_raw(0, 0x3000);
assert_eq!(bend.value, 0.5);
assert_eq!(bend.to_raw(), 0x3000);
assert_eq!(PitchBend::new(0, 1.).to_raw(), 0x3FFF);
```
"#]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PitchBend {
    /// Position of the bend
    pub ticks: u32,
    /// The bend amount, `-1.0..=1.0`
    pub value: f64,
}

impl PitchBend {
    /// Create a pitch bend
    pub const fn new(ticks: u32, value: f64) -> Self {
        Self { ticks, value }
    }

    /// Normalize a 14-bit pitch bend value
    pub fn from_raw(ticks: u32, raw: u16) -> Self {
        Self::new(ticks, (raw as f64 - CENTER) / CENTER)
    }

    /// The 14-bit value, clamped to `0..=0x3FFF`
    pub fn to_raw(&self) -> u16 {
        let scaled = self.value * CENTER;
        // float to int casts truncate toward zero, floor needs the adjustment below 0
        let mut floor = scaled as i64;
        if (floor as f64) > scaled {
            floor -= 1;
        }
        (floor + CENTER as i64).clamp(0, 0x3FFF) as u16
    }

    /// Position in seconds
    pub fn time(&self, header: &Header) -> f64 {
        header.ticks_to_seconds(self.ticks)
    }

    /// Move the bend to `seconds`
    pub fn set_time(&mut self, header: &Header, seconds: f64) {
        self.ticks = header.seconds_to_ticks(seconds);
    }
}

#[test]
fn raw_values() {
    assert_eq!(PitchBend::from_raw(0, 8192).value, 0.);
    assert_eq!(PitchBend::from_raw(0, 0).value, -1.);
    assert_eq!(PitchBend::from_raw(0, 0).to_raw(), 0);
    assert_eq!(PitchBend::from_raw(0, 0x3FFF).to_raw(), 0x3FFF);
    assert_eq!(PitchBend::new(0, -0.00001).to_raw(), 8191);
    assert_eq!(PitchBend::new(0, -2.).to_raw(), 0);
    assert_eq!(PitchBend::new(0, 0.).to_raw(), 8192);
}

#[test]
fn every_raw_value_survives() {
    for raw in 0..=0x3FFF {
        assert_eq!(PitchBend::from_raw(0, raw).to_raw(), raw);
    }
}
