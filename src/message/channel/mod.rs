use num_enum::{IntoPrimitive, TryFromPrimitive};

#[doc = r#"
The high nibble of a channel event's status byte
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum VoiceKind {
    /// `0x8_`
    NoteOff = 0x8,
    /// `0x9_`
    NoteOn = 0x9,
    /// `0xA_` polyphonic key pressure
    Aftertouch = 0xA,
    /// `0xB_`
    ControlChange = 0xB,
    /// `0xC_`
    ProgramChange = 0xC,
    /// `0xD_` channel pressure
    ChannelPressure = 0xD,
    /// `0xE_`
    PitchBend = 0xE,
}

impl VoiceKind {
    /// Number of data bytes that follow the status byte
    pub const fn data_len(&self) -> usize {
        match self {
            Self::ProgramChange | Self::ChannelPressure => 1,
            _ => 2,
        }
    }
}

#[doc = r#"
The payload of a channel voice message.

Data values are raw 7-bit MIDI values. A pitch bend is the 14-bit value
`lsb + (msb << 7)`, where `8192` means no bend.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(missing_docs)]
pub enum VoiceEvent {
    NoteOff { note: u8, velocity: u8 },
    NoteOn { note: u8, velocity: u8 },
    Aftertouch { note: u8, pressure: u8 },
    ControlChange { controller: u8, value: u8 },
    ProgramChange { program: u8 },
    ChannelPressure { pressure: u8 },
    PitchBend { value: u16 },
}

impl VoiceEvent {
    /// The neutral pitch bend value
    pub const PITCH_BEND_CENTER: u16 = 0x2000;

    /// Which status nibble this event is written with
    pub const fn kind(&self) -> VoiceKind {
        match self {
            Self::NoteOff { .. } => VoiceKind::NoteOff,
            Self::NoteOn { .. } => VoiceKind::NoteOn,
            Self::Aftertouch { .. } => VoiceKind::Aftertouch,
            Self::ControlChange { .. } => VoiceKind::ControlChange,
            Self::ProgramChange { .. } => VoiceKind::ProgramChange,
            Self::ChannelPressure { .. } => VoiceKind::ChannelPressure,
            Self::PitchBend { .. } => VoiceKind::PitchBend,
        }
    }

    /// Build an event from its kind and data bytes.
    ///
    /// A note on with velocity 0 becomes a note off.
    pub const fn from_data(kind: VoiceKind, data1: u8, data2: u8) -> Self {
        match kind {
            VoiceKind::NoteOff => Self::NoteOff {
                note: data1,
                velocity: data2,
            },
            VoiceKind::NoteOn if data2 == 0 => Self::NoteOff {
                note: data1,
                velocity: 0,
            },
            VoiceKind::NoteOn => Self::NoteOn {
                note: data1,
                velocity: data2,
            },
            VoiceKind::Aftertouch => Self::Aftertouch {
                note: data1,
                pressure: data2,
            },
            VoiceKind::ControlChange => Self::ControlChange {
                controller: data1,
                value: data2,
            },
            VoiceKind::ProgramChange => Self::ProgramChange { program: data1 },
            VoiceKind::ChannelPressure => Self::ChannelPressure { pressure: data1 },
            VoiceKind::PitchBend => Self::PitchBend {
                value: data1 as u16 + ((data2 as u16) << 7),
            },
        }
    }

    /// The data bytes, masked to 7 bits. Only the first [`VoiceKind::data_len`] are meaningful.
    pub const fn data(&self) -> [u8; 2] {
        let [a, b] = match *self {
            Self::NoteOff { note, velocity } | Self::NoteOn { note, velocity } => [note, velocity],
            Self::Aftertouch { note, pressure } => [note, pressure],
            Self::ControlChange { controller, value } => [controller, value],
            Self::ProgramChange { program } => [program, 0],
            Self::ChannelPressure { pressure } => [pressure, 0],
            Self::PitchBend { value } => {
                let value = if value > 0x3FFF { 0x3FFF } else { value };
                [(value & 0x7F) as u8, (value >> 7) as u8]
            }
        };
        [a & 0x7F, b & 0x7F]
    }
}

#[doc = r#"
A voice message addressed to one of the 16 channels (`0..=15`)
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelVoiceMessage {
    channel: u8,
    event: VoiceEvent,
}

impl ChannelVoiceMessage {
    /// Create a new message. The channel is masked to its low nibble.
    pub const fn new(channel: u8, event: VoiceEvent) -> Self {
        Self {
            channel: channel & 0x0F,
            event,
        }
    }
    /// The channel, `0..=15`
    pub const fn channel(&self) -> u8 {
        self.channel
    }
    /// The event
    pub const fn event(&self) -> &VoiceEvent {
        &self.event
    }
    /// The status byte this message is written with
    pub fn status(&self) -> u8 {
        (u8::from(self.event.kind()) << 4) | self.channel
    }
}

#[test]
fn note_on_without_velocity_is_note_off() {
    assert_eq!(
        VoiceEvent::from_data(VoiceKind::NoteOn, 60, 0),
        VoiceEvent::NoteOff {
            note: 60,
            velocity: 0
        }
    );
}

#[test]
fn pitch_bend_data_round_trip() {
    let bend = VoiceEvent::from_data(VoiceKind::PitchBend, 0x00, 0x40);
    assert_eq!(bend, VoiceEvent::PitchBend { value: 8192 });
    assert_eq!(bend.data(), [0x00, 0x40]);

    let max = VoiceEvent::PitchBend { value: u16::MAX };
    assert_eq!(max.data(), [0x7F, 0x7F]);
}

#[test]
fn status_byte() {
    let msg = ChannelVoiceMessage::new(9, VoiceEvent::ProgramChange { program: 3 });
    assert_eq!(msg.status(), 0xC9);
    assert_eq!(VoiceKind::try_from(0xC).unwrap(), VoiceKind::ProgramChange);
    assert!(VoiceKind::try_from(0x7).is_err());
}
