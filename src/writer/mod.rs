#![doc = r#"
Serialization of track events and chunks

[`Writer`] is the inverse of [`Reader`](crate::reader::Reader): it appends
big-endian integers, variable length quantities, events and chunk framing to
a byte buffer. Writing never fails; values that do not fit their field are
clamped or masked.
"#]

use crate::message::{TrackEvent, TrackMessage, VoiceEvent};
use alloc::vec::Vec;

/// `MThd`
pub const HEADER_CHUNK: [u8; 4] = *b"MThd";
/// `MTrk`
pub const TRACK_CHUNK: [u8; 4] = *b"MTrk";

/// The largest value a 4 byte variable length quantity can hold
pub const MAX_VARLEN: u32 = 0x0FFF_FFFF;

#[doc = r#"
Options for the bytes produced when encoding.

Both options default to off: every channel event carries its status byte, and
note offs are written as `8n` events.
"#]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncodeOptions {
    /// Omit a channel status byte equal to the previous one
    pub running_status: bool,
    /// Write note offs as note ons with velocity 0
    pub note_off_as_note_on: bool,
}

#[doc = r#"
An append-only MIDI byte buffer

# Example
```rust
# use midiscore::writer::Writer;
let mut writer = Writer::default();
writer.write_varlen(0x2000);
assert_eq!(writer.into_bytes(), [0xC0, 0x00]);
```
"#]
#[derive(Debug, Default)]
pub struct Writer {
    buf: Vec<u8>,
    options: EncodeOptions,
    running_status: Option<u8>,
}

impl Writer {
    /// Create an empty writer using `options` for channel events
    pub fn with_options(options: EncodeOptions) -> Self {
        Self {
            buf: Vec::new(),
            options,
            running_status: None,
        }
    }

    /// The bytes written so far
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consume the writer, returning its bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Append one byte
    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    /// Append a big-endian `u16`
    pub fn write_u16(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    /// Append a big-endian `u32`
    pub fn write_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    /// Append raw bytes
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Append a variable length quantity. Values above [`MAX_VARLEN`] are clamped.
    pub fn write_varlen(&mut self, value: u32) {
        let mut value = value.min(MAX_VARLEN);
        let mut bytes = [0u8; 4];
        let mut start = 3;
        bytes[3] = (value & 0x7F) as u8;
        value >>= 7;
        while value > 0 {
            start -= 1;
            bytes[start] = (value & 0x7F) as u8 | 0x80;
            value >>= 7;
        }
        self.buf.extend_from_slice(&bytes[start..]);
    }

    /// Append `<delta-time> <event>`
    pub fn write_event(&mut self, event: &TrackEvent) {
        self.write_varlen(event.delta_ticks());
        match event.message() {
            TrackMessage::ChannelVoice(cv) => {
                let event = match *cv.event() {
                    VoiceEvent::NoteOff { note, .. } if self.options.note_off_as_note_on => {
                        VoiceEvent::NoteOn { note, velocity: 0 }
                    }
                    other => other,
                };
                let status = (u8::from(event.kind()) << 4) | cv.channel();
                if !(self.options.running_status && self.running_status == Some(status)) {
                    self.write_u8(status);
                }
                self.running_status = Some(status);
                let data = event.data();
                self.write_bytes(&data[..event.kind().data_len()]);
            }
            TrackMessage::SystemExclusive(data) => self.write_sysex(0xF0, data),
            TrackMessage::Escape(data) => self.write_sysex(0xF7, data),
            TrackMessage::Meta(meta) => {
                self.running_status = None;
                let payload = meta.payload();
                self.write_u8(0xFF);
                self.write_u8(meta.kind());
                self.write_varlen(payload.len() as u32);
                self.write_bytes(&payload);
            }
        }
    }

    fn write_sysex(&mut self, status: u8, data: &[u8]) {
        self.running_status = None;
        self.write_u8(status);
        self.write_varlen(data.len() as u32);
        self.write_bytes(data);
    }

    /// Append a chunk: 4 byte id, big-endian length, body
    pub fn write_chunk(&mut self, id: [u8; 4], body: &[u8]) {
        self.write_bytes(&id);
        self.write_u32(body.len() as u32);
        self.write_bytes(body);
    }

    /// Append an `MThd` chunk
    pub fn write_header_chunk(&mut self, format: u16, num_tracks: u16, ticks_per_quarter_note: u16) {
        let mut body = [0u8; 6];
        body[..2].copy_from_slice(&format.to_be_bytes());
        body[2..4].copy_from_slice(&num_tracks.to_be_bytes());
        body[4..].copy_from_slice(&(ticks_per_quarter_note & 0x7FFF).to_be_bytes());
        self.write_chunk(HEADER_CHUNK, &body);
    }

    /// Serialize `events` and append them as an `MTrk` chunk.
    ///
    /// The events are written as given; the caller supplies the end-of-track event.
    pub fn write_track_chunk<'a>(&mut self, events: impl IntoIterator<Item = &'a TrackEvent>) {
        let mut body = Writer::with_options(self.options);
        for event in events {
            body.write_event(event);
        }
        self.write_chunk(TRACK_CHUNK, &body.buf);
    }
}
