use crate::timeline::{Header, insert};
use alloc::{collections::BTreeMap, vec::Vec};

/// Names of the commonly used controllers
pub const CONTROLLER_NAMES: [(u8, &str); 13] = [
    (1, "modulationWheel"),
    (2, "breath"),
    (4, "footController"),
    (5, "portamentoTime"),
    (7, "volume"),
    (8, "balance"),
    (10, "pan"),
    (64, "sustain"),
    (65, "portamento"),
    (66, "sostenuto"),
    (67, "softPedal"),
    (68, "legatoFootswitch"),
    (84, "portamentoControl"),
];

/// The controller number called `name`, e.g. `64` for `"sustain"`
pub fn controller_number(name: &str) -> Option<u8> {
    CONTROLLER_NAMES
        .iter()
        .find(|(_, n)| *n == name)
        .map(|(number, _)| *number)
}

/// The name of a controller number, if it has one
pub fn controller_name(number: u8) -> Option<&'static str> {
    CONTROLLER_NAMES
        .iter()
        .find(|(n, _)| *n == number)
        .map(|(_, name)| *name)
}

#[doc = r#"
A controller value change, normalized to `0.0..=1.0`
"#]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControlChange {
    /// Controller number, `0..=127`
    pub number: u8,
    /// Position of the change
    pub ticks: u32,
    /// The new value
    pub value: f64,
}

impl ControlChange {
    /// Create a control change
    pub const fn new(number: u8, ticks: u32, value: f64) -> Self {
        Self {
            number,
            ticks,
            value,
        }
    }

    /// The controller name, if the number has one
    pub fn name(&self) -> Option<&'static str> {
        controller_name(self.number)
    }

    /// Position in seconds
    pub fn time(&self, header: &Header) -> f64 {
        header.ticks_to_seconds(self.ticks)
    }

    /// Move the change to `seconds`
    pub fn set_time(&mut self, header: &Header, seconds: f64) {
        self.ticks = header.seconds_to_ticks(seconds);
    }
}

#[doc = r#"
The control changes of a track, one tick-ordered list per controller number

# Example
```rust
# use midiscore::prelude::*;
let mut ccs = ControlChanges::default();
ccs.insert(ControlChange::new(64, 960, 0.));
ccs.insert(ControlChange::new(64, 0, 1.));
ccs.insert(ControlChange::new(7, 0, 0.5));

let sustain = ccs.by_name("sustain");
assert_eq!(sustain.len(), 2);
assert_eq!(sustain[0].ticks, 0);
assert_eq!(ccs.by_number(7)[0].name(), Some("volume"));
assert!(ccs.by_number(10).is_empty());
```
"#]
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControlChanges(BTreeMap<u8, Vec<ControlChange>>);

impl ControlChanges {
    /// Add a change, after any change of the same controller at the same tick
    pub fn insert(&mut self, cc: ControlChange) {
        insert(self.0.entry(cc.number).or_default(), cc, |c| c.ticks);
    }

    /// The changes of one controller, in tick order
    pub fn by_number(&self, number: u8) -> &[ControlChange] {
        self.0.get(&number).map(Vec::as_slice).unwrap_or_default()
    }

    /// The changes of a named controller, see [`CONTROLLER_NAMES`]
    pub fn by_name(&self, name: &str) -> &[ControlChange] {
        controller_number(name)
            .map(|number| self.by_number(number))
            .unwrap_or_default()
    }

    /// Mutable access to the changes of one controller.
    ///
    /// Edits that change `ticks` must keep the list sorted.
    pub fn by_number_mut(&mut self, number: u8) -> Option<&mut Vec<ControlChange>> {
        self.0.get_mut(&number)
    }

    /// Every controller with at least one change, by ascending number
    pub fn iter(&self) -> impl Iterator<Item = (u8, &[ControlChange])> {
        self.0
            .iter()
            .filter(|(_, ccs)| !ccs.is_empty())
            .map(|(number, ccs)| (*number, ccs.as_slice()))
    }

    /// True if no controller has a change
    pub fn is_empty(&self) -> bool {
        self.0.values().all(Vec::is_empty)
    }

    /// Position of the last change
    pub fn last_ticks(&self) -> Option<u32> {
        self.0.values().filter_map(|ccs| ccs.last()).map(|cc| cc.ticks).max()
    }
}

#[test]
fn names_and_numbers() {
    assert_eq!(controller_number("sustain"), Some(64));
    assert_eq!(controller_number("sustainPedal"), None);
    assert_eq!(controller_name(84), Some("portamentoControl"));
    assert_eq!(controller_name(3), None);
}

#[test]
fn equal_ticks_keep_insertion_order() {
    let mut ccs = ControlChanges::default();
    ccs.insert(ControlChange::new(1, 10, 0.1));
    ccs.insert(ControlChange::new(1, 10, 0.2));
    ccs.insert(ControlChange::new(1, 5, 0.3));
    let values: Vec<f64> = ccs.by_name("modulationWheel").iter().map(|cc| cc.value).collect();
    assert_eq!(values, alloc::vec![0.3, 0.1, 0.2]);
    assert_eq!(ccs.last_ticks(), Some(10));
    assert!(!ccs.is_empty());
}

#[test]
fn control_change_time() {
    let header = Header::new(480);
    let mut cc = ControlChange::new(7, 960, 1.);
    assert_eq!(cc.time(&header), 1.);
    cc.set_time(&header, 0.25);
    assert_eq!(cc.ticks, 240);
}
