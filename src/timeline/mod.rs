#![doc = r#"
The tempo and time signature map of a file

A [`Header`] converts between three coordinates:

- ticks, the file's lossless integer time unit,
- seconds, through the tempo map,
- measures, through the time signature map.

Both maps are kept sorted by tick, and each event caches a derived value
(`time` for tempos, `measures` for time signatures). Every mutator on
[`Header`] recomputes those values before returning, so a conversion never
reads a stale cache.
"#]

mod search;
pub use search::*;

use crate::message::{KeySignature, MetaMessage, TextKind, Ticked, TrackMessage};
use alloc::{string::String, vec::Vec};

/// Ticks per quarter note of a new, empty file
pub const DEFAULT_PPQ: u16 = 480;
/// Tempo assumed before the first tempo event
pub const DEFAULT_BPM: f64 = 120.;
/// Quarter notes per measure assumed before the first time signature (4/4)
const DEFAULT_QUARTERS_PER_MEASURE: f64 = 4.;

#[doc = r#"
A tempo change
"#]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TempoEvent {
    /// Position of the change
    pub ticks: u32,
    /// Quarter notes per minute from this position on
    pub bpm: f64,
    time: f64,
}

impl TempoEvent {
    /// Create a tempo change.
    ///
    /// # Panics
    /// if `bpm` is not a positive, finite number.
    pub fn new(ticks: u32, bpm: f64) -> Self {
        assert!(
            bpm.is_finite() && bpm > 0.,
            "tempo must be positive and finite, got {bpm}"
        );
        Self {
            ticks,
            bpm,
            time: 0.,
        }
    }

    /// The position of the change in seconds
    pub fn time(&self) -> f64 {
        self.time
    }

    fn seconds_per_beat(&self) -> f64 {
        60. / self.bpm
    }
}

#[doc = r#"
A time signature change
"#]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSignatureEvent {
    /// Position of the change
    pub ticks: u32,
    /// Beats per measure
    pub numerator: u8,
    /// Beat unit
    pub denominator: u16,
    measures: f64,
}

impl TimeSignatureEvent {
    /// Create a time signature change.
    ///
    /// # Panics
    /// if the numerator or denominator is zero.
    pub fn new(ticks: u32, numerator: u8, denominator: u16) -> Self {
        assert!(
            numerator > 0 && denominator > 0,
            "time signature {numerator}/{denominator} is not valid"
        );
        Self {
            ticks,
            numerator,
            denominator,
            measures: 0.,
        }
    }

    /// `[numerator, denominator]`
    pub fn time_signature(&self) -> [u16; 2] {
        [self.numerator as u16, self.denominator]
    }

    /// The position of the change in measures
    pub fn measures(&self) -> f64 {
        self.measures
    }

    /// Length of one measure in quarter notes
    pub fn quarters_per_measure(&self) -> f64 {
        self.numerator as f64 * 4. / self.denominator as f64
    }
}

#[doc = r#"
A key signature change
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeySignatureEvent {
    /// Position of the change
    pub ticks: u32,
    /// The key
    pub key_signature: KeySignature,
}

#[doc = r#"
A text meta event kept from the conductor track (copyright, markers, lyrics...)
"#]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaEvent {
    /// Position of the event
    pub ticks: u32,
    /// The meta type
    pub kind: TextKind,
    /// The text
    pub text: String,
}

#[doc = r#"
A conductor-track meta event with no dedicated field, kept as its raw payload
(sequence number, SMPTE offset, sequencer specific data...)
"#]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMetaEvent {
    /// Position of the event
    pub ticks: u32,
    /// The meta type byte
    pub kind: u8,
    /// The payload, without the type and length prefix
    pub data: Vec<u8>,
}

#[doc = r#"
The file-wide timing information: resolution, tempo map, time signature map,
plus the name and the remaining conductor-track metadata.

# Example
```rust
# use midiscore::prelude::*;
let mut header = Header::new(480);
header.add_tempo(0, 120.);
header.add_tempo(960, 60.);

assert_eq!(header.ticks_to_seconds(480), 0.5);
assert_eq!(header.ticks_to_seconds(960), 1.);
assert_eq!(header.ticks_to_seconds(1440), 2.);
assert_eq!(header.seconds_to_ticks(2.), 1440);
```
"#]
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    ppq: u16,
    tempos: Vec<TempoEvent>,
    time_signatures: Vec<TimeSignatureEvent>,
    /// Key signatures, in file order
    pub key_signatures: Vec<KeySignatureEvent>,
    /// Other text meta events of the conductor track
    pub meta: Vec<MetaEvent>,
    /// Non-text meta events of the conductor track, re-encoded as read
    pub raw_meta: Vec<RawMetaEvent>,
    /// The name of the file, the conductor track's name
    pub name: String,
}

impl Default for Header {
    fn default() -> Self {
        Self::new(DEFAULT_PPQ)
    }
}

impl Header {
    /// An empty header. The tick resolution cannot change afterwards.
    ///
    /// A resolution of 0 is treated as 1.
    pub fn new(ppq: u16) -> Self {
        Self {
            ppq: ppq.clamp(1, 0x7FFF),
            tempos: Vec::new(),
            time_signatures: Vec::new(),
            key_signatures: Vec::new(),
            meta: Vec::new(),
            raw_meta: Vec::new(),
            name: String::new(),
        }
    }

    /// Collect the timing and metadata of a conductor track
    pub(crate) fn from_track_events(ppq: u16, events: &[Ticked<TrackMessage>]) -> Self {
        let mut header = Self::new(ppq);
        for event in events {
            let TrackMessage::Meta(meta) = event.event() else {
                continue;
            };
            let ticks = event.accumulated_ticks();
            match meta {
                MetaMessage::Tempo(tempo) => header.tempos.push(TempoEvent {
                    ticks,
                    bpm: tempo.bpm(),
                    time: 0.,
                }),
                MetaMessage::TimeSignature(ts) if ts.numerator > 0 => {
                    header
                        .time_signatures
                        .push(TimeSignatureEvent::new(ticks, ts.numerator, ts.denominator))
                }
                MetaMessage::KeySignature(key_signature) => {
                    header.key_signatures.push(KeySignatureEvent {
                        ticks,
                        key_signature: *key_signature,
                    })
                }
                MetaMessage::TrackName(name) => header.name = name.clone(),
                MetaMessage::Text { kind, text } => header.meta.push(MetaEvent {
                    ticks,
                    kind: *kind,
                    text: text.clone(),
                }),
                MetaMessage::Unknown { kind, data } => header.raw_meta.push(RawMetaEvent {
                    ticks,
                    kind: *kind,
                    data: data.clone(),
                }),
                MetaMessage::TimeSignature(_) | MetaMessage::EndOfTrack => {}
            }
        }
        header.update();
        header
    }

    /// Ticks per quarter note
    pub fn ppq(&self) -> u16 {
        self.ppq
    }

    /// The tempo map, sorted by tick
    pub fn tempos(&self) -> &[TempoEvent] {
        &self.tempos
    }

    /// The time signature map, sorted by tick
    pub fn time_signatures(&self) -> &[TimeSignatureEvent] {
        &self.time_signatures
    }

    /// Add a tempo change.
    ///
    /// # Panics
    /// if `bpm` is not a positive, finite number.
    pub fn add_tempo(&mut self, ticks: u32, bpm: f64) {
        self.edit_tempos(|tempos| tempos.push(TempoEvent::new(ticks, bpm)));
    }

    /// Replace the whole tempo map with one tempo from tick 0.
    ///
    /// Ticks of existing events are unchanged; their times in seconds are rescaled.
    pub fn set_tempo(&mut self, bpm: f64) {
        self.edit_tempos(|tempos| {
            tempos.clear();
            tempos.push(TempoEvent::new(0, bpm));
        });
    }

    /// Add a time signature change.
    ///
    /// # Panics
    /// if the numerator or denominator is zero.
    pub fn add_time_signature(&mut self, ticks: u32, numerator: u8, denominator: u16) {
        self.edit_time_signatures(|sigs| {
            sigs.push(TimeSignatureEvent::new(ticks, numerator, denominator))
        });
    }

    /// Edit the tempo map in place, then re-sort it and recompute every tempo's time.
    pub fn edit_tempos<R>(&mut self, edit: impl FnOnce(&mut Vec<TempoEvent>) -> R) -> R {
        let out = edit(&mut self.tempos);
        self.update();
        out
    }

    /// Edit the time signature map in place, then re-sort it and recompute measures.
    pub fn edit_time_signatures<R>(
        &mut self,
        edit: impl FnOnce(&mut Vec<TimeSignatureEvent>) -> R,
    ) -> R {
        let out = edit(&mut self.time_signatures);
        self.update();
        out
    }

    #[doc = r#"
Sort both maps by tick and recompute the derived `time` and `measures` values.

Time is piecewise linear in ticks, with each tempo as the slope of its
segment; the segment before the first tempo runs at 120 bpm. Measures are
accumulated the same way from each time signature's measure length, with 4/4
before the first one. The mutators call this already; calling it again is a no-op.
"#]
    pub fn update(&mut self) {
        let ppq = self.ppq as f64;

        self.tempos.sort_by_key(|t| t.ticks);
        let mut current_time = 0.;
        let mut last_event_beats = 0.;
        let mut seconds_per_beat = 60. / DEFAULT_BPM;
        for tempo in &mut self.tempos {
            let beats = tempo.ticks as f64 / ppq - last_event_beats;
            current_time += seconds_per_beat * beats;
            tempo.time = current_time;
            last_event_beats += beats;
            seconds_per_beat = tempo.seconds_per_beat();
        }

        self.time_signatures.sort_by_key(|t| t.ticks);
        let mut measures = 0.;
        let mut last_ticks = 0;
        let mut quarters_per_measure = DEFAULT_QUARTERS_PER_MEASURE;
        for sig in &mut self.time_signatures {
            let elapsed_beats = (sig.ticks - last_ticks) as f64 / ppq;
            measures += elapsed_beats / quarters_per_measure;
            sig.measures = measures;
            last_ticks = sig.ticks;
            quarters_per_measure = sig.quarters_per_measure();
        }
    }

    /// Convert a tick position into seconds
    pub fn ticks_to_seconds(&self, ticks: u32) -> f64 {
        let ppq = self.ppq as f64;
        match search(&self.tempos, ticks as f64, |t| t.ticks as f64) {
            Some(index) => {
                let tempo = &self.tempos[index];
                let elapsed_beats = (ticks - tempo.ticks) as f64 / ppq;
                tempo.time + tempo.seconds_per_beat() * elapsed_beats
            }
            None => (60. / DEFAULT_BPM) * (ticks as f64 / ppq),
        }
    }

    /// Convert seconds into the nearest tick position.
    ///
    /// Negative times map to tick 0.
    pub fn seconds_to_ticks(&self, seconds: f64) -> u32 {
        let ppq = self.ppq as f64;
        let ticks = match search(&self.tempos, seconds, |t| t.time) {
            Some(index) => {
                let tempo = &self.tempos[index];
                let elapsed_beats = (seconds - tempo.time) / tempo.seconds_per_beat();
                tempo.ticks as f64 + elapsed_beats * ppq
            }
            None => seconds / (60. / DEFAULT_BPM) * ppq,
        };
        round_ticks(ticks)
    }

    /// Convert a tick position into measures (fractional, from 0)
    pub fn ticks_to_measures(&self, ticks: u32) -> f64 {
        let ppq = self.ppq as f64;
        match search(&self.time_signatures, ticks as f64, |t| t.ticks as f64) {
            Some(index) => {
                let sig = &self.time_signatures[index];
                let elapsed_beats = (ticks - sig.ticks) as f64 / ppq;
                sig.measures + elapsed_beats / sig.quarters_per_measure()
            }
            None => ticks as f64 / ppq / DEFAULT_QUARTERS_PER_MEASURE,
        }
    }
}

/// Round half up, saturating into the tick range
pub(crate) fn round_ticks(ticks: f64) -> u32 {
    // float to int casts saturate, and NaN becomes 0
    (ticks + 0.5) as u32
}
