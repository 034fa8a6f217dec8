use crate::{
    message::{MetaMessage, Ticked, TrackMessage},
    reader::{ReadResult, Reader},
};
use alloc::vec::Vec;

#[doc = r#"
The undecoded body of an `MTrk` chunk
"#]
#[derive(Debug, Clone)]
pub struct RawTrackChunk<'slc> {
    body: Reader<'slc>,
}

impl<'slc> RawTrackChunk<'slc> {
    pub(crate) const fn new(body: Reader<'slc>) -> Self {
        Self { body }
    }

    /// Length of the chunk body in bytes
    pub const fn len(&self) -> usize {
        self.body.remaining()
    }

    /// True if the chunk has no body
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[doc = r#"
Decode every event of the chunk, stamping each with its absolute tick.

Decoding stops after the end-of-track event; bytes after it are ignored.
Running status is reset at the start of every chunk.
"#]
    pub fn events(&self) -> ReadResult<Vec<Ticked<TrackMessage>>> {
        let mut reader = self.body.clone();
        let mut running_status = None;
        let mut ticks: u32 = 0;
        let mut events = Vec::new();

        while !reader.is_at_end() {
            let event = reader.read_track_event(&mut running_status)?;
            ticks = ticks.saturating_add(event.delta_ticks());
            let end = matches!(event.message(), TrackMessage::Meta(MetaMessage::EndOfTrack));
            events.push(Ticked::new(ticks, event.into_message()));
            if end {
                break;
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!("Track chunk: {} events over {ticks} ticks", events.len());

        Ok(events)
    }
}
