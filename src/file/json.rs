#![doc = r#"
The exported document form of a [`MidiFile`]

Every position is in ticks; derived times are not part of the document.
With the `serde` feature the types serialize with camelCase field names:

```text
{
  header: { name, ppq, meta: [{ type, text, ticks }], tempos: [{ ticks, bpm }],
            timeSignatures: [{ ticks, timeSignature: [num, den] }],
            keySignatures: [{ ticks, key, scale }] },
  tracks: [{ name, channel, instrument: { number, name, family },
             notes: [{ midi, ticks, durationTicks, velocity, noteOffVelocity }],
             controlChanges: { <number>: [{ number, ticks, value }] },
             pitchBends: [{ ticks, value }], endOfTrackTicks? }]
}
```

Exporting a file rebuilt from a document yields the same document.
"#]

use super::MidiFile;
use crate::{
    JsonError,
    message::{KeySignature, TextKind},
    timeline::{Header, KeySignatureEvent, MetaEvent},
    track::{ControlChange, Instrument, Note, PitchBend, Track},
};
use alloc::{
    collections::BTreeMap,
    string::{String, ToString},
    vec::Vec,
};

/// A whole file
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct MidiJson {
    /// Timing and metadata
    pub header: HeaderJson,
    /// The tracks, in file order
    pub tracks: Vec<TrackJson>,
}

/// The [`Header`] of a file
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
#[allow(missing_docs)]
pub struct HeaderJson {
    pub name: String,
    pub ppq: u16,
    pub meta: Vec<MetaJson>,
    pub tempos: Vec<TempoJson>,
    pub time_signatures: Vec<TimeSignatureJson>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub key_signatures: Vec<KeySignatureJson>,
}

/// A text meta event
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct MetaJson {
    /// The meta type name, e.g. `"marker"`
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: String,
    /// The text
    pub text: String,
    /// Position
    pub ticks: u32,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct TempoJson {
    pub ticks: u32,
    pub bpm: f64,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct TimeSignatureJson {
    pub ticks: u32,
    /// `[numerator, denominator]`
    pub time_signature: [u16; 2],
}

#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct KeySignatureJson {
    pub ticks: u32,
    /// e.g. `"Eb"`
    pub key: String,
    /// `"major"` or `"minor"`
    pub scale: String,
}

/// One [`Track`]
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
#[allow(missing_docs)]
pub struct TrackJson {
    pub name: String,
    pub channel: u8,
    pub instrument: InstrumentJson,
    pub notes: Vec<NoteJson>,
    pub control_changes: BTreeMap<u8, Vec<ControlChangeJson>>,
    pub pitch_bends: Vec<PitchBendJson>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub end_of_track_ticks: Option<u32>,
}

/// The program of a track. Only `number` is read back; the names follow from it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
#[allow(missing_docs)]
pub struct InstrumentJson {
    pub number: u8,
    pub name: String,
    pub family: String,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct NoteJson {
    pub midi: u8,
    pub ticks: u32,
    pub duration_ticks: u32,
    pub velocity: f64,
    pub note_off_velocity: f64,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct ControlChangeJson {
    pub number: u8,
    pub ticks: u32,
    pub value: f64,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct PitchBendJson {
    pub ticks: u32,
    pub value: f64,
}

impl From<&Header> for HeaderJson {
    fn from(header: &Header) -> Self {
        Self {
            name: header.name.clone(),
            ppq: header.ppq(),
            meta: header
                .meta
                .iter()
                .map(|m| MetaJson {
                    kind: m.kind.name().to_string(),
                    text: m.text.clone(),
                    ticks: m.ticks,
                })
                .collect(),
            tempos: header
                .tempos()
                .iter()
                .map(|t| TempoJson {
                    ticks: t.ticks,
                    bpm: t.bpm,
                })
                .collect(),
            time_signatures: header
                .time_signatures()
                .iter()
                .map(|t| TimeSignatureJson {
                    ticks: t.ticks,
                    time_signature: t.time_signature(),
                })
                .collect(),
            key_signatures: header
                .key_signatures
                .iter()
                .map(|k| KeySignatureJson {
                    ticks: k.ticks,
                    key: k.key_signature.key_name().unwrap_or_default().to_string(),
                    scale: k.key_signature.scale().to_string(),
                })
                .collect(),
        }
    }
}

impl HeaderJson {
    /// Rebuild the [`Header`], validating every tempo and signature
    pub fn to_header(&self) -> Result<Header, JsonError> {
        let mut header = Header::new(self.ppq);
        header.name = self.name.clone();

        for meta in &self.meta {
            let kind =
                TextKind::from_name(&meta.kind).ok_or_else(|| JsonError::MetaType(meta.kind.clone()))?;
            header.meta.push(MetaEvent {
                ticks: meta.ticks,
                kind,
                text: meta.text.clone(),
            });
        }

        for key in &self.key_signatures {
            let minor = match key.scale.as_str() {
                "major" => Some(false),
                "minor" => Some(true),
                _ => None,
            };
            let key_signature = minor
                .and_then(|minor| KeySignature::from_name(&key.key, minor))
                .ok_or_else(|| JsonError::KeySignature {
                    key: key.key.clone(),
                    scale: key.scale.clone(),
                })?;
            header.key_signatures.push(KeySignatureEvent {
                ticks: key.ticks,
                key_signature,
            });
        }

        for tempo in &self.tempos {
            if !(tempo.bpm.is_finite() && tempo.bpm > 0.) {
                return Err(JsonError::Tempo {
                    ticks: tempo.ticks,
                    bpm: tempo.bpm,
                });
            }
        }
        let mut time_signatures = Vec::with_capacity(self.time_signatures.len());
        for ts in &self.time_signatures {
            let [numerator, denominator] = ts.time_signature;
            match u8::try_from(numerator) {
                Ok(numerator) if numerator > 0 && denominator > 0 => {
                    time_signatures.push((ts.ticks, numerator, denominator))
                }
                _ => {
                    return Err(JsonError::TimeSignature {
                        ticks: ts.ticks,
                        time_signature: ts.time_signature,
                    });
                }
            }
        }

        for tempo in &self.tempos {
            header.add_tempo(tempo.ticks, tempo.bpm);
        }
        for (ticks, numerator, denominator) in time_signatures {
            header.add_time_signature(ticks, numerator, denominator);
        }
        Ok(header)
    }
}

impl From<&Track> for TrackJson {
    fn from(track: &Track) -> Self {
        Self {
            name: track.name.clone(),
            channel: track.channel,
            instrument: InstrumentJson {
                number: track.instrument.number,
                name: track.instrument_name().unwrap_or_default().to_string(),
                family: track.instrument_family().to_string(),
            },
            notes: track
                .notes
                .iter()
                .map(|n| NoteJson {
                    midi: n.midi,
                    ticks: n.ticks,
                    duration_ticks: n.duration_ticks,
                    velocity: n.velocity,
                    note_off_velocity: n.note_off_velocity,
                })
                .collect(),
            control_changes: track
                .control_changes
                .iter()
                .map(|(number, changes)| {
                    let changes: Vec<ControlChangeJson> = changes
                        .iter()
                        .map(|cc| ControlChangeJson {
                            number: cc.number,
                            ticks: cc.ticks,
                            value: cc.value,
                        })
                        .collect();
                    (number, changes)
                })
                .collect(),
            pitch_bends: track
                .pitch_bends
                .iter()
                .map(|b| PitchBendJson {
                    ticks: b.ticks,
                    value: b.value,
                })
                .collect(),
            end_of_track_ticks: track.end_of_track_ticks,
        }
    }
}

impl From<&TrackJson> for Track {
    fn from(json: &TrackJson) -> Self {
        let mut track = Track::on_channel(json.channel);
        track.name = json.name.clone();
        track.instrument = Instrument::new(json.instrument.number);
        track.end_of_track_ticks = json.end_of_track_ticks;
        for n in &json.notes {
            track.add_note(Note {
                midi: n.midi,
                ticks: n.ticks,
                duration_ticks: n.duration_ticks,
                velocity: n.velocity,
                note_off_velocity: n.note_off_velocity,
            });
        }
        for (number, changes) in &json.control_changes {
            for cc in changes {
                track.add_cc(ControlChange::new(*number, cc.ticks, cc.value));
            }
        }
        for bend in &json.pitch_bends {
            track.add_pitch_bend(PitchBend::new(bend.ticks, bend.value));
        }
        track
    }
}

impl From<&MidiFile> for MidiJson {
    fn from(file: &MidiFile) -> Self {
        Self {
            header: file.header().into(),
            tracks: file.tracks().iter().map(TrackJson::from).collect(),
        }
    }
}

impl MidiJson {
    /// Rebuild the [`MidiFile`]
    pub fn to_midi_file(&self) -> Result<MidiFile, JsonError> {
        let header = self.header.to_header()?;
        let tracks = self.tracks.iter().map(Track::from).collect();
        Ok(MidiFile::from_parts(header, tracks))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use pretty_assertions::assert_eq;

    fn sample() -> MidiFile {
        let mut midi = MidiFile::new();
        midi.set_name("etude");
        let header = midi.header_mut();
        header.add_tempo(0, 90.);
        header.add_tempo(1920, 140.);
        header.add_time_signature(0, 3, 4);
        header.key_signatures.push(KeySignatureEvent {
            ticks: 0,
            key_signature: KeySignature {
                sharps_flats: 2,
                minor: true,
            },
        });
        header.meta.push(MetaEvent {
            ticks: 480,
            kind: TextKind::Marker,
            text: "B".to_string(),
        });

        let track = midi.add_track();
        track.name = "piano".to_string();
        track.channel = 9;
        track.instrument = Instrument::new(0);
        track
            .add_note(Note::new(36, 0, 120).with_velocity(0.5))
            .add_cc(ControlChange::new(64, 0, 1.))
            .add_pitch_bend(PitchBend::new(60, -0.25));
        track.end_of_track_ticks = Some(1920);
        midi
    }

    #[test]
    fn export() {
        let json = sample().to_json();
        assert_eq!(json.header.tempos, vec![
            TempoJson { ticks: 0, bpm: 90. },
            TempoJson {
                ticks: 1920,
                bpm: 140.
            },
        ]);
        assert_eq!(json.header.time_signatures[0].time_signature, [3, 4]);
        assert_eq!(json.header.key_signatures, vec![KeySignatureJson {
            ticks: 0,
            key: "D".to_string(),
            scale: "minor".to_string(),
        }]);
        assert_eq!(json.header.meta[0].kind, "marker");

        let track = &json.tracks[0];
        assert_eq!(track.instrument, InstrumentJson {
            number: 0,
            name: "standard kit".to_string(),
            family: "drums".to_string(),
        });
        assert_eq!(track.control_changes[&64u8], vec![ControlChangeJson {
            number: 64,
            ticks: 0,
            value: 1.
        }]);
        assert_eq!(track.notes[0].velocity, 0.5);
        assert_eq!(track.end_of_track_ticks, Some(1920));
    }

    #[test]
    fn import_reproduces_the_document() {
        let midi = sample();
        let json = midi.to_json();
        let rebuilt = MidiFile::from_json(&json).unwrap();
        assert_eq!(rebuilt, midi);
        assert_eq!(rebuilt.to_json(), json);
        assert_eq!(rebuilt.header().tempos()[1].time(), midi.header().tempos()[1].time());
    }

    #[test]
    fn invalid_documents() {
        let mut json = sample().to_json();
        json.header.tempos[0].bpm = 0.;
        assert_eq!(
            MidiFile::from_json(&json),
            Err(JsonError::Tempo { ticks: 0, bpm: 0. })
        );

        let mut json = sample().to_json();
        json.header.time_signatures[0].time_signature = [300, 4];
        assert!(matches!(
            MidiFile::from_json(&json),
            Err(JsonError::TimeSignature { ticks: 0, .. })
        ));

        let mut json = sample().to_json();
        json.header.key_signatures[0].key = "H".to_string();
        assert!(matches!(
            MidiFile::from_json(&json),
            Err(JsonError::KeySignature { .. })
        ));

        let mut json = sample().to_json();
        json.header.meta[0].kind = "tempo".to_string();
        assert_eq!(
            MidiFile::from_json(&json),
            Err(JsonError::MetaType("tempo".to_string()))
        );
    }
}
