use midiscore::prelude::*;
use pretty_assertions::assert_eq;

fn song() -> MidiFile {
    let mut midi = MidiFile::new();
    midi.set_name("round trip");

    let header = midi.header_mut();
    header.add_tempo(0, 120.);
    header.add_tempo(1920, 60.);
    header.add_time_signature(0, 4, 4);
    header.add_time_signature(3840, 3, 8);
    header.key_signatures.push(KeySignatureEvent {
        ticks: 0,
        key_signature: KeySignature::from_name("A", true).unwrap(),
    });
    header.meta.push(MetaEvent {
        ticks: 1920,
        kind: TextKind::Marker,
        text: "chorus".to_string(),
    });

    let piano = midi.add_track();
    piano.name = "piano".to_string();
    for (i, midi_note) in [60, 64, 67, 72].into_iter().enumerate() {
        piano.add_note(Note::new(midi_note, i as u32 * 480, 480));
    }
    piano.add_note(Note::new(48, 0, 1920));
    piano.add_cc(ControlChange::new(64, 0, 1.));
    piano.add_cc(ControlChange::new(64, 1920, 0.));

    let bass = midi.add_track();
    *bass = Track::on_channel(1);
    bass.name = "bass".to_string();
    bass.instrument.set_name("electric bass (finger)").unwrap();
    bass.add_note(Note::new(36, 0, 960))
        .add_note(Note::new(36, 960, 960))
        .add_pitch_bend(PitchBend::new(480, 0.5))
        .add_pitch_bend(PitchBend::new(960, -1.));
    midi
}

fn without_end_of_track(mut track: Track) -> Track {
    track.end_of_track_ticks = None;
    track
}

#[test]
fn decode_of_encode_is_identity() {
    let midi = song();
    let bytes = midi.to_bytes();
    let parsed = MidiFile::parse(&bytes).unwrap();

    assert_eq!(parsed.header(), midi.header());
    assert_eq!(parsed.name(), "round trip");
    let tracks: Vec<Track> = parsed
        .tracks()
        .iter()
        .cloned()
        .map(without_end_of_track)
        .collect();
    assert_eq!(tracks, midi.tracks());
    assert_eq!(parsed.tracks()[0].end_of_track_ticks, Some(1920));
    assert_eq!(parsed.tracks()[1].end_of_track_ticks, Some(1920));

    // a decoded file encodes to the same bytes
    assert_eq!(parsed.to_bytes(), bytes);
}

#[test]
fn velocities_are_quantized_to_seven_bits() {
    let mut midi = MidiFile::new();
    midi.add_track()
        .add_note(Note::new(60, 0, 10).with_velocity(0.5))
        .add_cc(ControlChange::new(7, 0, 0.999));
    let parsed = MidiFile::parse(&midi.to_bytes()).unwrap();
    let track = &parsed.tracks()[0];
    assert_eq!(track.notes[0].velocity, 63. / 127.);
    assert_eq!(track.control_changes.by_number(7)[0].value, 126. / 127.);
}

#[test]
fn encoded_layout() {
    let mut midi = MidiFile::new();
    midi.header_mut().set_tempo(120.);
    let track = midi.add_track();
    track.name = "a".to_string();
    track.instrument = Instrument::new(5);
    track.add_note(Note::new(60, 0, 96));

    let mut expected = vec![
        b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 1, 0, 2, 0x01, 0xE0, //
        b'M', b'T', b'r', b'k', 0, 0, 0, 15, //
        0x00, 0xFF, 0x03, 0x00, //
        0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20, //
        0x00, 0xFF, 0x2F, 0x00, //
        b'M', b'T', b'r', b'k', 0, 0, 0, 20, //
        0x00, 0xFF, 0x03, 0x01, b'a', //
        0x00, 0xC0, 0x05, // the program change precedes the note at the same tick
        0x00, 0x90, 60, 127, //
        0x60, 0x80, 60, 0, //
        0x00, 0xFF, 0x2F, 0x00,
    ];
    assert_eq!(midi.to_bytes(), expected);

    let compact = midi.to_bytes_with(EncodeOptions {
        running_status: true,
        note_off_as_note_on: true,
    });
    let track_start = expected.len() - 28;
    expected[track_start + 7] = 19;
    // the note off becomes a note on with velocity 0 and reuses its status
    expected.splice(track_start + 8 + 12..track_start + 8 + 16, [0x60, 60, 0]);
    assert_eq!(compact, expected);
    assert_eq!(
        MidiFile::parse(&compact).unwrap(),
        MidiFile::parse(&midi.to_bytes()).unwrap()
    );
}

#[test]
fn empty_file() {
    let bytes = MidiFile::new().to_bytes();
    assert_eq!(bytes.len(), 14 + 8 + 8);
    assert_eq!(bytes[9], 0, "a single chunk is format 0");

    let parsed = MidiFile::parse(&bytes).unwrap();
    assert_eq!(parsed.tracks().len(), 1);
    assert!(parsed.tracks()[0].notes.is_empty());
    assert_eq!(parsed.duration(), 0.);
}

#[test]
fn end_of_track_position_survives() {
    let mut midi = MidiFile::new();
    let track = midi.add_track();
    track.add_note(Note::new(60, 0, 480));
    track.end_of_track_ticks = Some(1920);

    let parsed = MidiFile::parse(&midi.to_bytes()).unwrap();
    assert_eq!(parsed.tracks()[0].end_of_track_ticks, Some(1920));
    assert_eq!(parsed.duration_ticks(), 480);
}

#[test]
fn json_round_trip_of_a_decoded_file() {
    let parsed = MidiFile::parse(&song().to_bytes()).unwrap();
    let json = parsed.to_json();

    assert_eq!(json.header.name, "round trip");
    assert_eq!(json.tracks[1].instrument.name, "electric bass (finger)");
    assert_eq!(json.tracks[1].instrument.family, "bass");
    assert_eq!(json.tracks[0].control_changes[&64u8].len(), 2);

    let rebuilt = MidiFile::from_json(&json).unwrap();
    assert_eq!(rebuilt, parsed);
    assert_eq!(rebuilt.to_json(), json);
}

#[test]
fn seconds_and_measures() {
    let midi = song();
    let header = midi.header();
    assert_eq!(header.ticks_to_seconds(960), 1.);
    assert_eq!(header.ticks_to_seconds(1920), 2.);
    assert_eq!(header.ticks_to_seconds(2880), 4.);
    assert_eq!(header.seconds_to_ticks(4.), 2880);

    assert_eq!(header.ticks_to_measures(1920), 1.);
    assert_eq!(header.ticks_to_measures(3840), 2.);
    assert_eq!(header.ticks_to_measures(4560), 3.);

    let bass = &midi.tracks()[1];
    assert_eq!(bass.notes[1].time(header), 1.);
    assert_eq!(bass.duration(header), 2.);
}

#[test]
fn unknown_conductor_metas_survive() {
    let mut midi = MidiFile::new();
    midi.header_mut().raw_meta.push(RawMetaEvent {
        ticks: 0,
        kind: 0x54,
        data: vec![0x60, 0x00, 0x03, 0x00, 0x00],
    });
    midi.add_track().add_note(Note::new(60, 0, 480));

    let bytes = midi.to_bytes();
    let smpte: &[u8] = &[0xFF, 0x54, 0x05, 0x60, 0x00, 0x03, 0x00, 0x00];
    assert!(bytes.windows(smpte.len()).any(|w| w == smpte));

    let parsed = MidiFile::parse(&bytes).unwrap();
    assert_eq!(parsed.header().raw_meta, midi.header().raw_meta);
    assert_eq!(parsed.to_bytes(), bytes);
}
