use super::{ReadResult, Reader, ReaderErrorKind};
use crate::{
    EventError, MetaError,
    message::{
        self, ChannelVoiceMessage, KeySignature, MetaMessage, Tempo, TextKind, TimeSignature,
        TrackEvent, TrackMessage, VoiceEvent, VoiceKind,
    },
};

impl<'slc> Reader<'slc> {
    #[doc = r#"
Read one `<delta-time> <event>` pair.

`running_status` holds the last channel status byte. When the byte after the
delta time has its high bit clear it is the first data byte of a channel event
that reuses that status, and it is not consumed as a status byte.

# Errors
- [`ReaderErrorKind::OutOfBounds`] if the event is cut short
- [`EventError`] for system status bytes other than `F0`, `F7` and `FF`, or a
  data byte with no running status to reuse
- [`MetaError`] when a fixed-shape meta event declares the wrong length
"#]
    pub fn read_track_event(&mut self, running_status: &mut Option<u8>) -> ReadResult<TrackEvent> {
        let delta_ticks = self.read_varlen()?;

        let byte = self.peek_u8()?;
        let status = if byte & 0x80 == 0 {
            running_status.ok_or_else(|| {
                self.err(ReaderErrorKind::event(
                    EventError::RunningStatusWithoutStatus(byte),
                ))
            })?
        } else {
            self.read_u8()?;
            byte
        };

        let message = match status {
            0xFF => TrackMessage::Meta(self.read_meta()?),
            0xF0 | 0xF7 => {
                let len = self.read_varlen()?;
                let data = self.read_bytes(len as usize)?.to_vec();
                #[cfg(feature = "tracing")]
                tracing::trace!("Keeping opaque {status:#04X} payload ({len} bytes)");
                if status == 0xF0 {
                    TrackMessage::SystemExclusive(data)
                } else {
                    TrackMessage::Escape(data)
                }
            }
            0xF1..=0xFE => {
                return Err(self.err(ReaderErrorKind::event(EventError::Unrecognized(status))));
            }
            _ => {
                *running_status = Some(status);
                TrackMessage::ChannelVoice(self.read_channel_event(status)?)
            }
        };

        Ok(TrackEvent::new(delta_ticks, message))
    }

    fn read_channel_event(&mut self, status: u8) -> ReadResult<ChannelVoiceMessage> {
        let kind = VoiceKind::try_from(status >> 4)
            .map_err(|_| self.err(ReaderErrorKind::event(EventError::Unrecognized(status))))?;
        let data1 = self.read_u8()?;
        let data2 = if kind.data_len() == 2 {
            self.read_u8()?
        } else {
            0
        };
        Ok(ChannelVoiceMessage::new(
            status & 0x0F,
            VoiceEvent::from_data(kind, data1, data2),
        ))
    }

    /// Reads the remainder of a meta event after its `FF` status byte.
    fn read_meta(&mut self) -> ReadResult<MetaMessage> {
        let kind = self.read_u8()?;
        let len = self.read_varlen()?;
        if let Some(expected) = message::fixed_length(kind)
            && expected != len
        {
            return Err(self.err(ReaderErrorKind::meta(MetaError::Length {
                kind,
                expected,
                found: len,
            })));
        }

        let mut payload = self.sub_reader(len as usize)?;
        let meta = match kind {
            message::TRACK_NAME => {
                MetaMessage::TrackName(message::text_from_bytes(payload.read_bytes(len as usize)?))
            }
            message::END_OF_TRACK => MetaMessage::EndOfTrack,
            message::SET_TEMPO => MetaMessage::Tempo(Tempo::from_micros(payload.read_u24()?)),
            message::TIME_SIGNATURE => {
                let numerator = payload.read_u8()?;
                let power = payload.read_u8()?;
                let denominator = 1u16.checked_shl(power as u32).ok_or_else(|| {
                    payload.err(ReaderErrorKind::meta(MetaError::Denominator(power)))
                })?;
                MetaMessage::TimeSignature(TimeSignature {
                    numerator,
                    denominator,
                    clocks_per_click: payload.read_u8()?,
                    thirty_seconds_per_quarter: payload.read_u8()?,
                })
            }
            message::KEY_SIGNATURE => MetaMessage::KeySignature(KeySignature {
                sharps_flats: payload.read_i8()?,
                minor: payload.read_u8()? != 0,
            }),
            other => {
                let data = payload.read_bytes(len as usize)?;
                match TextKind::try_from(other) {
                    Ok(text_kind) => MetaMessage::Text {
                        kind: text_kind,
                        text: message::text_from_bytes(data),
                    },
                    Err(_) => {
                        #[cfg(feature = "tracing")]
                        tracing::trace!("Keeping unknown meta event {other:#04X} ({len} bytes)");
                        MetaMessage::Unknown {
                            kind: other,
                            data: data.to_vec(),
                        }
                    }
                }
            }
        };
        Ok(meta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ParseError, reader::ReaderError};
    use alloc::{string::ToString, vec, vec::Vec};
    use pretty_assertions::assert_eq;

    fn read_all(bytes: &[u8]) -> Result<Vec<TrackEvent>, ReaderError> {
        let mut reader = Reader::from_byte_slice(bytes);
        let mut running = None;
        let mut events = Vec::new();
        while !reader.is_at_end() {
            events.push(reader.read_track_event(&mut running)?);
        }
        Ok(events)
    }

    fn voice(channel: u8, event: VoiceEvent) -> TrackMessage {
        TrackMessage::ChannelVoice(ChannelVoiceMessage::new(channel, event))
    }

    #[test]
    fn running_status() {
        let events = read_all(&[
            0x00, 0x92, 0x3C, 0x64, // note on, channel 3
            0x60, 0x40, 0x50, // running status
            0x10, 0x3C, 0x00, // running status, velocity 0
        ])
        .unwrap();

        assert_eq!(
            events,
            vec![
                TrackEvent::new(
                    0,
                    voice(
                        2,
                        VoiceEvent::NoteOn {
                            note: 0x3C,
                            velocity: 0x64
                        }
                    )
                ),
                TrackEvent::new(
                    0x60,
                    voice(
                        2,
                        VoiceEvent::NoteOn {
                            note: 0x40,
                            velocity: 0x50
                        }
                    )
                ),
                TrackEvent::new(
                    0x10,
                    voice(
                        2,
                        VoiceEvent::NoteOff {
                            note: 0x3C,
                            velocity: 0
                        }
                    )
                ),
            ]
        );
    }

    #[test]
    fn running_status_survives_meta_events() {
        let events = read_all(&[
            0x00, 0xC1, 0x05, // program change
            0x00, 0xFF, 0x01, 0x02, b'h', b'i', // text
            0x00, 0x07, // running program change
        ])
        .unwrap();
        assert_eq!(
            events[2].message(),
            &voice(1, VoiceEvent::ProgramChange { program: 7 })
        );
    }

    #[test]
    fn data_byte_without_status() {
        let err = read_all(&[0x00, 0x3C, 0x40]).unwrap_err();
        assert_eq!(
            err.parse_error(),
            Some(&ParseError::Event(EventError::RunningStatusWithoutStatus(
                0x3C
            )))
        );
        assert_eq!(err.position(), 1);
    }

    #[test]
    fn system_common_is_unrecognized() {
        let err = read_all(&[0x00, 0xF2, 0x00, 0x00]).unwrap_err();
        assert_eq!(
            err.parse_error(),
            Some(&ParseError::Event(EventError::Unrecognized(0xF2)))
        );
    }

    #[test]
    fn meta_events() {
        let events = read_all(&[
            0x00, 0xFF, 0x03, 0x04, b'l', b'e', b'a', b'd', // track name
            0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20, // 120 bpm
            0x00, 0xFF, 0x58, 0x04, 0x06, 0x03, 0x24, 0x08, // 6/8
            0x00, 0xFF, 0x59, 0x02, 0xFD, 0x01, // Eb minor
            0x00, 0xFF, 0x05, 0x03, b'l', b'a', b'h', // lyric
            0x00, 0xFF, 0x7F, 0x02, 0x00, 0x41, // sequencer specific
            0x00, 0xFF, 0x2F, 0x00,
        ])
        .unwrap();
        let metas: Vec<_> = events
            .into_iter()
            .map(|e| match e.message() {
                TrackMessage::Meta(m) => m.clone(),
                other => panic!("{other:?}"),
            })
            .collect();

        assert_eq!(
            metas,
            vec![
                MetaMessage::TrackName("lead".to_string()),
                MetaMessage::Tempo(Tempo::from_micros(500_000)),
                MetaMessage::TimeSignature(TimeSignature {
                    numerator: 6,
                    denominator: 8,
                    clocks_per_click: 0x24,
                    thirty_seconds_per_quarter: 8
                }),
                MetaMessage::KeySignature(KeySignature {
                    sharps_flats: -3,
                    minor: true
                }),
                MetaMessage::Text {
                    kind: TextKind::Lyrics,
                    text: "lah".to_string()
                },
                MetaMessage::Unknown {
                    kind: 0x7F,
                    data: vec![0x00, 0x41]
                },
                MetaMessage::EndOfTrack,
            ]
        );
    }

    #[test]
    fn malformed_time_signature() {
        let err = read_all(&[0x00, 0xFF, 0x58, 0x03, 0x04, 0x02, 0x18]).unwrap_err();
        assert_eq!(
            err.parse_error(),
            Some(&ParseError::Meta(MetaError::Length {
                kind: 0x58,
                expected: 4,
                found: 3
            }))
        );
    }

    #[test]
    fn malformed_tempo() {
        let err = read_all(&[0x00, 0xFF, 0x51, 0x02, 0x07, 0xA1]).unwrap_err();
        assert!(matches!(
            err.parse_error(),
            Some(ParseError::Meta(MetaError::Length { kind: 0x51, .. }))
        ));
    }

    #[test]
    fn malformed_fixed_length_metas() {
        for (bytes, kind, expected, found) in [
            (&[0x00, 0xFF, 0x00, 0x01, 0x07][..], 0x00, 2, 1),
            (&[0x00, 0xFF, 0x20, 0x02, 0x00, 0x01][..], 0x20, 1, 2),
            (&[0x00, 0xFF, 0x54, 0x03, 0x60, 0x00, 0x03][..], 0x54, 5, 3),
        ] {
            let err = read_all(bytes).unwrap_err();
            assert_eq!(
                err.parse_error(),
                Some(&ParseError::Meta(MetaError::Length {
                    kind,
                    expected,
                    found
                }))
            );
        }
    }

    #[test]
    fn well_formed_smpte_offset_is_kept_raw() {
        let events = read_all(&[0x00, 0xFF, 0x54, 0x05, 0x60, 0x00, 0x03, 0x00, 0x00]).unwrap();
        assert_eq!(
            events[0].message(),
            &TrackMessage::Meta(MetaMessage::Unknown {
                kind: 0x54,
                data: vec![0x60, 0x00, 0x03, 0x00, 0x00]
            })
        );
    }

    #[test]
    fn huge_denominator() {
        let err = read_all(&[0x00, 0xFF, 0x58, 0x04, 0x04, 0x20, 0x18, 0x08]).unwrap_err();
        assert_eq!(
            err.parse_error(),
            Some(&ParseError::Meta(MetaError::Denominator(0x20)))
        );
    }

    #[test]
    fn sysex_is_opaque() {
        let events = read_all(&[0x00, 0xF0, 0x03, 0x43, 0x12, 0xF7, 0x00, 0xF7, 0x01, 0x01]).unwrap();
        assert_eq!(
            events[0].message(),
            &TrackMessage::SystemExclusive(vec![0x43, 0x12, 0xF7])
        );
        assert_eq!(events[1].message(), &TrackMessage::Escape(vec![0x01]));
    }

    #[test]
    fn pitch_bend_value() {
        let events = read_all(&[0x00, 0xE0, 0x7F, 0x7F, 0x00, 0xE0, 0x00, 0x40]).unwrap();
        assert_eq!(
            events[0].message(),
            &voice(0, VoiceEvent::PitchBend { value: 0x3FFF })
        );
        assert_eq!(
            events[1].message(),
            &voice(0, VoiceEvent::PitchBend { value: 8192 })
        );
    }

    #[test]
    fn truncated_event() {
        let err = read_all(&[0x00, 0x90, 0x3C]).unwrap_err();
        assert!(err.is_out_of_bounds());
        assert_eq!(err.position(), 3);

        let err = read_all(&[0x00, 0xFF, 0x01, 0x05, b'a']).unwrap_err();
        assert!(err.is_out_of_bounds());
    }
}
