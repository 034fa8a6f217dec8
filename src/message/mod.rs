#![doc = r#"
The events found inside a track chunk

# Hierarchy
```text
                       |--------------|
                       | TrackMessage |
                       |--------------|
                   /          |            \
|-----------------------|  |--------|  |-------------|
| Channel Voice Message |  | SysEx  |  | MetaMessage |
|-----------------------|  |--------|  |-------------|
```

A decoded event is only kept until the file builder has folded it into the
[`Header`](crate::timeline::Header) or a [`Track`](crate::track::Track).
"#]

mod channel;
pub use channel::*;

mod meta;
pub use meta::*;
pub(crate) use meta::{fixed_length, text_from_bytes};

use alloc::vec::Vec;

#[doc = r#"
Any event that may appear in an `MTrk` chunk
"#]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrackMessage {
    /// A note, controller, program or bend message for one channel
    ChannelVoice(ChannelVoiceMessage),
    /// `F0` system exclusive payload, stored opaque (without the leading `F0`)
    SystemExclusive(Vec<u8>),
    /// `F7` escape payload, stored opaque
    Escape(Vec<u8>),
    /// A meta event
    Meta(MetaMessage),
}

impl TrackMessage {
    /// Returns the channel if this is a channel message
    pub fn channel(&self) -> Option<u8> {
        match self {
            Self::ChannelVoice(cv) => Some(cv.channel()),
            _ => None,
        }
    }
}

impl From<ChannelVoiceMessage> for TrackMessage {
    fn from(value: ChannelVoiceMessage) -> Self {
        Self::ChannelVoice(value)
    }
}

impl From<MetaMessage> for TrackMessage {
    fn from(value: MetaMessage) -> Self {
        Self::Meta(value)
    }
}

#[doc = r#"
A [`TrackMessage`] with the delta time that precedes it in the byte stream
"#]
#[derive(Debug, Clone, PartialEq)]
pub struct TrackEvent {
    delta_ticks: u32,
    message: TrackMessage,
}

impl TrackEvent {
    /// Create a new track event
    pub const fn new(delta_ticks: u32, message: TrackMessage) -> Self {
        Self {
            delta_ticks,
            message,
        }
    }
    /// Ticks since the previous event of the track
    pub const fn delta_ticks(&self) -> u32 {
        self.delta_ticks
    }
    /// The message
    pub const fn message(&self) -> &TrackMessage {
        &self.message
    }
    /// Drop the delta time
    pub fn into_message(self) -> TrackMessage {
        self.message
    }
}

#[doc = r#"
An event paired with its absolute tick position in the track.

During decoding the position is the sum of all delta times so far.
"#]
#[derive(Debug, Clone, PartialEq)]
pub struct Ticked<T> {
    ticks: u32,
    event: T,
}

impl<T> Ticked<T> {
    /// Pair an event with an absolute tick
    pub const fn new(ticks: u32, event: T) -> Self {
        Self { ticks, event }
    }
    /// The absolute tick of the event
    pub const fn accumulated_ticks(&self) -> u32 {
        self.ticks
    }
    /// A reference to the event
    pub const fn event(&self) -> &T {
        &self.event
    }
    /// Drop the tick position
    pub fn into_event(self) -> T {
        self.event
    }
}
