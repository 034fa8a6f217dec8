use super::{FormatType, MidiFile};
use crate::{
    message::{
        ChannelVoiceMessage, MetaMessage, Tempo, Ticked, TimeSignature, TrackEvent, TrackMessage,
        VoiceEvent,
    },
    timeline::Header,
    track::Track,
    writer::{EncodeOptions, Writer},
};
use alloc::vec::Vec;

/// `floor(value * 127)`, clamped to the 7-bit range
fn to_7bit(value: f64) -> u8 {
    // truncation equals floor once negatives are clamped away; NaN casts to 0
    (value * 127.).clamp(0., 127.) as u8
}

/// The conductor track: name, key signatures, other metas, tempos and time signatures
fn conductor_events(header: &Header) -> Vec<Ticked<TrackMessage>> {
    let mut events = Vec::with_capacity(
        1 + header.key_signatures.len()
            + header.meta.len()
            + header.raw_meta.len()
            + header.tempos().len()
            + header.time_signatures().len(),
    );
    events.push(Ticked::new(
        0,
        MetaMessage::TrackName(header.name.clone()).into(),
    ));
    for ks in &header.key_signatures {
        events.push(Ticked::new(
            ks.ticks,
            MetaMessage::KeySignature(ks.key_signature).into(),
        ));
    }
    for meta in &header.meta {
        events.push(Ticked::new(
            meta.ticks,
            MetaMessage::Text {
                kind: meta.kind,
                text: meta.text.clone(),
            }
            .into(),
        ));
    }
    for raw in &header.raw_meta {
        events.push(Ticked::new(
            raw.ticks,
            MetaMessage::Unknown {
                kind: raw.kind,
                data: raw.data.clone(),
            }
            .into(),
        ));
    }
    for tempo in header.tempos() {
        events.push(Ticked::new(
            tempo.ticks,
            MetaMessage::Tempo(Tempo::from_bpm(tempo.bpm)).into(),
        ));
    }
    for ts in header.time_signatures() {
        events.push(Ticked::new(
            ts.ticks,
            MetaMessage::TimeSignature(TimeSignature::new(ts.numerator, ts.denominator)).into(),
        ));
    }
    events
}

fn track_events(track: &Track) -> Vec<Ticked<TrackMessage>> {
    let channel = track.channel & 0x0F;
    let voice = |ticks: u32, event: VoiceEvent| -> Ticked<TrackMessage> {
        Ticked::new(ticks, ChannelVoiceMessage::new(channel, event).into())
    };

    let mut events = Vec::with_capacity(2 + track.notes.len() * 2 + track.pitch_bends.len());
    events.push(Ticked::new(
        0,
        MetaMessage::TrackName(track.name.clone()).into(),
    ));
    events.push(voice(0, VoiceEvent::ProgramChange {
        program: track.instrument.number & 0x7F,
    }));

    for note in &track.notes {
        let midi = note.midi & 0x7F;
        events.push(voice(note.ticks, VoiceEvent::NoteOn {
            note: midi,
            velocity: to_7bit(note.velocity),
        }));
        events.push(voice(note.end_ticks(), VoiceEvent::NoteOff {
            note: midi,
            velocity: to_7bit(note.note_off_velocity),
        }));
    }
    for (number, changes) in track.control_changes.iter() {
        for cc in changes {
            events.push(voice(cc.ticks, VoiceEvent::ControlChange {
                controller: number & 0x7F,
                value: to_7bit(cc.value),
            }));
        }
    }
    for bend in &track.pitch_bends {
        events.push(voice(bend.ticks, VoiceEvent::PitchBend {
            value: bend.to_raw(),
        }));
    }
    events
}

/// Sort by tick (keeping insertion order on ties), convert to delta times and
/// close the track with an end of track event.
fn into_track_events(
    mut events: Vec<Ticked<TrackMessage>>,
    end_of_track: Option<u32>,
) -> Vec<TrackEvent> {
    events.sort_by_key(Ticked::accumulated_ticks);

    let mut previous = 0u32;
    let mut out = Vec::with_capacity(events.len() + 1);
    for event in events {
        let ticks = event.accumulated_ticks();
        out.push(TrackEvent::new(
            ticks.saturating_sub(previous),
            event.into_event(),
        ));
        previous = ticks;
    }
    let end = end_of_track.map_or(previous, |end| end.max(previous));
    out.push(TrackEvent::new(end - previous, MetaMessage::EndOfTrack.into()));
    out
}

pub(super) fn encode(file: &MidiFile, options: EncodeOptions) -> Vec<u8> {
    let header = file.header();
    let mut chunks = Vec::with_capacity(file.tracks().len() + 1);
    chunks.push(into_track_events(conductor_events(header), None));
    for track in file.tracks() {
        chunks.push(into_track_events(
            track_events(track),
            track.end_of_track_ticks,
        ));
    }

    let format = FormatType::for_track_count(chunks.len());
    let num_tracks = u16::try_from(chunks.len()).unwrap_or(u16::MAX);

    #[cfg(feature = "tracing")]
    tracing::debug!(
        "Encoding {} track chunks as format {}",
        num_tracks,
        u16::from(format)
    );

    let mut writer = Writer::with_options(options);
    writer.write_header_chunk(format.into(), num_tracks, header.ppq());
    for chunk in &chunks {
        writer.write_track_chunk(chunk);
    }
    writer.into_bytes()
}
