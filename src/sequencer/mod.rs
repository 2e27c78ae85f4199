//! Per-element runtime state machines.
//!
//! Each time-based element gets exactly one sequencer. Sequencers are driven only by the
//! stimuli the registry routes to them (start, content sync, timer expiry, asset events,
//! user interaction) and report their effects through a [`SequencerCtx`].

pub mod audio;
pub mod image;
pub mod playlist;
pub mod slideshow;

use crate::{
    composition::model::ElementKind,
    runtime::{
        effects::SequencerCtx,
        host::{AssetEvent, AssetTicket, Change, HostCommand},
        timers::FiredTimer,
    },
};

pub use audio::{AudioController, AudioState};
pub use image::{AssetStatus, ImageTracker};
pub use playlist::{PlaybackPhase, PlaylistSequencer};
pub use slideshow::SlideshowSequencer;

#[derive(Clone, Debug)]
/// Runtime state of one element.
pub enum Sequencer {
    Image(ImageTracker),
    Slideshow(SlideshowSequencer),
    Playlist(PlaylistSequencer),
    Audio(AudioController),
}

impl Sequencer {
    /// Build the sequencer for an element; `None` for element types without runtime state.
    pub fn for_element(kind: &ElementKind) -> Option<Self> {
        match kind {
            ElementKind::Image(c) => Some(Self::Image(ImageTracker::new(c))),
            ElementKind::Slideshow(c) => Some(Self::Slideshow(SlideshowSequencer::new(c))),
            ElementKind::Video(c) => Some(Self::Playlist(PlaylistSequencer::new(c))),
            ElementKind::Audio(c) => Some(Self::Audio(AudioController::new(c))),
            ElementKind::Ticker(_) | ElementKind::Text(_) => None,
        }
    }

    pub fn start(&mut self, ctx: &mut SequencerCtx<'_>) {
        match self {
            Self::Image(s) => s.start(ctx),
            Self::Slideshow(s) => s.start(ctx),
            Self::Playlist(s) => s.start(ctx),
            Self::Audio(s) => s.start(ctx),
        }
    }

    /// Apply a content change that kept the element's identity.
    pub fn sync(&mut self, kind: &ElementKind, ctx: &mut SequencerCtx<'_>) {
        match (self, kind) {
            (Self::Slideshow(s), ElementKind::Slideshow(c)) => s.sync(c, ctx),
            (Self::Playlist(s), ElementKind::Video(c)) => s.sync(c, ctx),
            (Self::Audio(s), ElementKind::Audio(c)) => s.sync(c, ctx),
            (Self::Image(_), ElementKind::Image(_)) => {}
            (this, kind) => tracing::debug!(
                element = ctx.element_id,
                sequencer = this.kind_name(),
                content = %kind.element_type(),
                "ignoring sync with mismatched content"
            ),
        }
    }

    pub fn on_timer(&mut self, fired: FiredTimer, ctx: &mut SequencerCtx<'_>) {
        match self {
            Self::Slideshow(s) => s.on_timer(fired, ctx),
            Self::Playlist(s) => s.on_timer(fired, ctx),
            Self::Image(_) | Self::Audio(_) => {}
        }
    }

    pub fn on_asset(&mut self, ticket: AssetTicket, event: AssetEvent, ctx: &mut SequencerCtx<'_>) {
        match self {
            Self::Image(s) => s.on_asset(ticket, event, ctx),
            Self::Slideshow(s) => s.on_asset(ticket, event, ctx),
            Self::Playlist(s) => s.on_asset(ticket, event, ctx),
            Self::Audio(s) => s.on_asset(ticket, event, ctx),
        }
    }

    pub fn on_user_interaction(&mut self, ctx: &mut SequencerCtx<'_>) {
        if let Self::Audio(s) = self {
            s.on_user_interaction(ctx);
        }
    }

    /// Cancel every pending timer and release host resources. The instance must not receive
    /// further stimuli afterwards.
    pub fn dispose(&mut self, ctx: &mut SequencerCtx<'_>) {
        let cancelled = ctx.cancel_all();
        match self {
            Self::Slideshow(s) => s.forget_timer(),
            Self::Playlist(s) => s.forget_timer(),
            Self::Image(_) | Self::Audio(_) => {}
        }
        let instance = ctx.instance;
        ctx.command(HostCommand::Release { instance });
        tracing::debug!(
            element = ctx.element_id,
            instance = %ctx.instance,
            cancelled,
            "sequencer disposed"
        );
        ctx.record(Change::Disposed);
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Image(_) => "image",
            Self::Slideshow(_) => "slideshow",
            Self::Playlist(_) => "playlist",
            Self::Audio(_) => "audio",
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sequencer/harness.rs"]
pub(crate) mod test_harness;
