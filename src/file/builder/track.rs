use crate::{
    message::{MetaMessage, Ticked, TrackMessage, VoiceEvent},
    track::{ControlChange, Instrument, Note, PitchBend, Track},
};
use alloc::{collections::BTreeMap, string::String, vec::Vec};

#[derive(Debug, Clone, Copy)]
struct PendingNote {
    ticks: u32,
    note: u8,
    velocity: u8,
}

#[doc = r#"
Folds the decoded events of one logical track into a [`Track`].

Note ons and note offs are collected while events are pushed and paired in
[`TrackBuilder::build`]: every note on, in file order, takes the first
remaining note off with the same note number at or after its tick. A note on
with no such note off is dropped.

The channel of the track is the channel of its first note on, or of its
first channel event if it has no notes.

# Example
```rust
# use midiscore::prelude::*;
# use midiscore::file::builder::TrackBuilder;
let on = |ticks, note| -> Ticked<TrackMessage> { Ticked::new(ticks, ChannelVoiceMessage::new(2, VoiceEvent::NoteOn { note, velocity: 127 }).into()) };
let off = |ticks, note| -> Ticked<TrackMessage> { Ticked::new(ticks, ChannelVoiceMessage::new(2, VoiceEvent::NoteOff { note, velocity: 0 }).into()) };

let track = TrackBuilder::from_events(&[on(0, 60), on(10, 60), off(100, 60)]);

assert_eq!(track.channel, 2);
assert_eq!(track.notes.len(), 1);
assert_eq!(track.notes[0].ticks, 0);
assert_eq!(track.notes[0].duration_ticks, 100);
```
"#]
#[derive(Debug, Default)]
pub struct TrackBuilder {
    name: Option<String>,
    program: Option<u8>,
    note_channel: Option<u8>,
    first_channel: Option<u8>,
    end_of_track: Option<u32>,
    note_ons: Vec<PendingNote>,
    note_offs: BTreeMap<u8, Vec<PendingNote>>,
    control_changes: Vec<ControlChange>,
    pitch_bends: Vec<PitchBend>,
}

impl TrackBuilder {
    /// Build a track from a tick-ordered event list
    pub fn from_events(events: &[Ticked<TrackMessage>]) -> Track {
        let mut builder = Self::default();
        for event in events {
            builder.push(event);
        }
        builder.build()
    }

    /// Take one event into account
    pub fn push(&mut self, event: &Ticked<TrackMessage>) {
        let ticks = event.accumulated_ticks();
        match event.event() {
            TrackMessage::ChannelVoice(cv) => {
                self.first_channel.get_or_insert(cv.channel());
                match *cv.event() {
                    VoiceEvent::NoteOn { note, velocity } => {
                        self.note_channel.get_or_insert(cv.channel());
                        self.note_ons.push(PendingNote {
                            ticks,
                            note,
                            velocity,
                        });
                    }
                    VoiceEvent::NoteOff { note, velocity } => {
                        self.note_offs.entry(note).or_default().push(PendingNote {
                            ticks,
                            note,
                            velocity,
                        })
                    }
                    VoiceEvent::ControlChange { controller, value } => self
                        .control_changes
                        .push(ControlChange::new(controller, ticks, value as f64 / 127.)),
                    VoiceEvent::ProgramChange { program } => {
                        self.program.get_or_insert(program);
                    }
                    VoiceEvent::PitchBend { value } => {
                        self.pitch_bends.push(PitchBend::from_raw(ticks, value))
                    }
                    VoiceEvent::Aftertouch { .. } | VoiceEvent::ChannelPressure { .. } => {}
                }
            }
            TrackMessage::Meta(MetaMessage::TrackName(name)) if self.name.is_none() => {
                self.name = Some(name.clone());
            }
            TrackMessage::Meta(MetaMessage::EndOfTrack) => {
                self.end_of_track.get_or_insert(ticks);
            }
            _ => {}
        }
    }

    /// Pair the notes and finish the track
    pub fn build(mut self) -> Track {
        let mut track = Track {
            name: self.name.take().unwrap_or_default(),
            channel: self.note_channel.or(self.first_channel).unwrap_or(0),
            instrument: Instrument::new(self.program.unwrap_or(0)),
            end_of_track_ticks: self.end_of_track,
            ..Default::default()
        };

        let mut dropped = 0usize;
        for on in &self.note_ons {
            let offs = self.note_offs.get_mut(&on.note);
            let matched = offs.and_then(|offs| {
                let index = offs.iter().position(|off| off.ticks >= on.ticks)?;
                Some(offs.remove(index))
            });
            match matched {
                Some(off) => {
                    track.add_note(Note {
                        midi: on.note,
                        ticks: on.ticks,
                        duration_ticks: off.ticks - on.ticks,
                        velocity: on.velocity as f64 / 127.,
                        note_off_velocity: off.velocity as f64 / 127.,
                    });
                }
                None => dropped += 1,
            }
        }
        if dropped > 0 {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                "Dropped {dropped} note ons without a matching note off on track {:?}",
                track.name
            );
        }

        for cc in self.control_changes {
            track.add_cc(cc);
        }
        for bend in self.pitch_bends {
            track.add_pitch_bend(bend);
        }
        track
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::ChannelVoiceMessage;
    use alloc::{string::ToString, vec};
    use pretty_assertions::assert_eq;

    fn voice(ticks: u32, channel: u8, event: VoiceEvent) -> Ticked<TrackMessage> {
        Ticked::new(ticks, ChannelVoiceMessage::new(channel, event).into())
    }

    fn on(ticks: u32, note: u8) -> Ticked<TrackMessage> {
        voice(ticks, 0, VoiceEvent::NoteOn { note, velocity: 127 })
    }

    fn off(ticks: u32, note: u8) -> Ticked<TrackMessage> {
        voice(ticks, 0, VoiceEvent::NoteOff { note, velocity: 0 })
    }

    #[test]
    fn overlapping_same_pitch() {
        let track = TrackBuilder::from_events(&[on(0, 60), on(10, 60), off(100, 60)]);
        assert_eq!(track.notes, vec![Note::new(60, 0, 100)]);
    }

    #[test]
    fn note_offs_before_the_note_on_are_skipped() {
        let track = TrackBuilder::from_events(&[
            off(0, 64),
            on(5, 64),
            off(20, 64),
            on(30, 64),
            off(30, 64),
        ]);
        assert_eq!(
            track.notes,
            vec![Note::new(64, 5, 15), Note::new(64, 30, 0)]
        );
    }

    #[test]
    fn interleaved_pitches() {
        let track = TrackBuilder::from_events(&[
            on(0, 60),
            on(0, 64),
            on(0, 67),
            off(480, 64),
            off(480, 60),
            off(960, 67),
        ]);
        let notes: Vec<(u8, u32)> = track.notes.iter().map(|n| (n.midi, n.duration_ticks)).collect();
        assert_eq!(notes, vec![(60, 480), (64, 480), (67, 960)]);
    }

    #[test]
    fn velocities_are_normalized() {
        let track = TrackBuilder::from_events(&[
            voice(0, 3, VoiceEvent::NoteOn {
                note: 72,
                velocity: 127,
            }),
            voice(10, 3, VoiceEvent::NoteOff {
                note: 72,
                velocity: 127,
            }),
        ]);
        assert_eq!(track.notes[0].velocity, 1.);
        assert_eq!(track.notes[0].note_off_velocity, 1.);
        assert_eq!(track.channel, 3);
    }

    #[test]
    fn metadata() {
        let track = TrackBuilder::from_events(&[
            Ticked::new(0, MetaMessage::TrackName("bass".to_string()).into()),
            Ticked::new(0, MetaMessage::TrackName("ignored".to_string()).into()),
            voice(0, 5, VoiceEvent::ControlChange {
                controller: 7,
                value: 127,
            }),
            voice(0, 5, VoiceEvent::ProgramChange { program: 33 }),
            voice(0, 5, VoiceEvent::ProgramChange { program: 34 }),
            voice(12, 5, VoiceEvent::PitchBend { value: 0 }),
            voice(6, 5, VoiceEvent::ControlChange {
                controller: 64,
                value: 0,
            }),
            Ticked::new(1000, MetaMessage::EndOfTrack.into()),
        ]);
        assert_eq!(track.name, "bass");
        assert_eq!(track.channel, 5);
        assert_eq!(track.instrument, Instrument::new(33));
        assert_eq!(track.control_changes.by_name("volume")[0].value, 1.);
        assert_eq!(track.control_changes.by_name("sustain")[0].ticks, 6);
        assert_eq!(track.pitch_bends, vec![PitchBend::new(12, -1.)]);
        assert_eq!(track.end_of_track_ticks, Some(1000));
        assert!(track.notes.is_empty());
    }

    #[test]
    fn empty_track() {
        let track = TrackBuilder::from_events(&[]);
        assert_eq!(track, Track::default());
    }
}
