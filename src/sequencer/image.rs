use crate::{
    composition::model::ImageContent,
    runtime::{
        effects::SequencerCtx,
        host::{AssetEvent, AssetTicket, Change, HostCommand},
    },
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
/// Load status of a single asset.
pub enum AssetStatus {
    /// Nothing to load (empty source).
    Unset,
    /// Preload issued, no answer yet.
    Loading,
    /// Decoded and displayable.
    Ready,
    /// Failed; the element shows an unavailable state.
    Failed,
}

/// Tracks the preload of one still image.
#[derive(Clone, Debug)]
pub struct ImageTracker {
    src: String,
    status: AssetStatus,
}

impl ImageTracker {
    pub fn new(content: &ImageContent) -> Self {
        Self {
            src: content.src.clone(),
            status: AssetStatus::Unset,
        }
    }

    pub fn status(&self) -> AssetStatus {
        self.status
    }

    pub(crate) fn start(&mut self, ctx: &mut SequencerCtx<'_>) {
        if self.src.is_empty() {
            return;
        }
        self.status = AssetStatus::Loading;
        let ticket = ctx.ticket(0, 0);
        ctx.command(HostCommand::Preload {
            ticket,
            src: self.src.clone(),
        });
    }

    pub(crate) fn on_asset(
        &mut self,
        ticket: AssetTicket,
        event: AssetEvent,
        ctx: &mut SequencerCtx<'_>,
    ) {
        if ticket.slot != 0 || self.status != AssetStatus::Loading {
            return;
        }
        match event {
            AssetEvent::Ready => {
                self.status = AssetStatus::Ready;
                ctx.record(Change::ImageReady);
            }
            AssetEvent::Failed => {
                tracing::warn!(element = ctx.element_id, src = %self.src, "image failed to load");
                self.status = AssetStatus::Failed;
                ctx.record(Change::ImageFailed);
            }
            AssetEvent::Ended | AssetEvent::PlayBlocked => {}
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sequencer/image.rs"]
mod tests;
