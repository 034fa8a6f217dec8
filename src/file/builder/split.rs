use crate::message::{Ticked, TrackMessage, VoiceEvent};
use alloc::{collections::BTreeMap, vec::Vec};

#[doc = r#"
Redistribute the events of every track chunk so that each resulting track
plays one program on one channel.

Within a chunk, every channel event is routed by the pair
`(current program of its channel, channel)`, where a channel's current
program starts at 0 and follows its program changes. The first pair seen
keeps the chunk's own slot, each new pair opens the next slot. Events
without a channel stay in the chunk's own slot.

A chunk without any events produces no track.
"#]
pub fn split_tracks(
    chunks: impl IntoIterator<Item = Vec<Ticked<TrackMessage>>>,
) -> Vec<Vec<Ticked<TrackMessage>>> {
    let mut tracks: Vec<Vec<Ticked<TrackMessage>>> = Vec::new();

    for chunk in chunks {
        let default_track = tracks.len();
        let mut slots: BTreeMap<(u8, u8), usize> = BTreeMap::new();
        let mut current_program = [0u8; 16];

        for event in chunk {
            let target = match event.event() {
                TrackMessage::ChannelVoice(cv) => {
                    let channel = cv.channel();
                    if let VoiceEvent::ProgramChange { program } = cv.event() {
                        current_program[channel as usize] = *program;
                    }
                    let next = default_track + slots.len();
                    *slots
                        .entry((current_program[channel as usize], channel))
                        .or_insert(next)
                }
                _ => default_track,
            };
            while tracks.len() <= target {
                tracks.push(Vec::new());
            }
            tracks[target].push(event);
        }

        #[cfg(feature = "tracing")]
        if slots.len() > 1 {
            tracing::debug!(
                "Split track chunk into {} tracks by program and channel",
                slots.len()
            );
        }
    }
    tracks
}
