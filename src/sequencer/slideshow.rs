use std::{collections::BTreeSet, time::Duration};

use crate::{
    composition::model::{SlideTransition, SlideshowContent},
    runtime::{
        effects::SequencerCtx,
        host::{AssetEvent, AssetTicket, Change, HostCommand},
        timers::{FiredTimer, TimerId, TimerKind},
    },
};

/// Cycles through a slideshow's images on per-slide timers.
///
/// All images are preloaded up front and may finish in any order. The current index only
/// moves on timer expiry; loads never move it.
#[derive(Clone, Debug)]
pub struct SlideshowSequencer {
    srcs: Vec<String>,
    durations: Vec<f64>,
    auto_play: bool,
    transition: SlideTransition,
    index: usize,
    loaded: BTreeSet<usize>,
    failed: BTreeSet<usize>,
    last_shown: Option<usize>,
    timer: Option<TimerId>,
}

impl SlideshowSequencer {
    pub fn new(content: &SlideshowContent) -> Self {
        Self {
            srcs: content.images.iter().map(|s| s.src.clone()).collect(),
            durations: content.images.iter().map(|s| s.duration).collect(),
            auto_play: content.auto_play,
            transition: content.transition,
            index: 0,
            loaded: BTreeSet::new(),
            failed: BTreeSet::new(),
            last_shown: None,
            timer: None,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.srcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.srcs.is_empty()
    }

    pub fn is_loaded(&self, index: usize) -> bool {
        self.loaded.contains(&index)
    }

    pub fn transition(&self) -> SlideTransition {
        self.transition
    }

    /// Index of the image currently on screen: the current one once it is loaded, else the
    /// last image that was on screen.
    pub fn shown(&self) -> Option<usize> {
        if self.is_loaded(self.index) {
            Some(self.index)
        } else {
            self.last_shown
        }
    }

    /// A placeholder covers the element until the first image has loaded.
    pub fn placeholder(&self) -> bool {
        !self.is_loaded(0)
    }

    pub fn is_advancing(&self) -> bool {
        self.timer.is_some()
    }

    fn should_advance(&self) -> bool {
        self.auto_play && self.srcs.len() >= 2
    }

    pub(crate) fn start(&mut self, ctx: &mut SequencerCtx<'_>) {
        for (slot, src) in self.srcs.iter().enumerate() {
            if src.is_empty() {
                continue;
            }
            let ticket = ctx.ticket(slot, 0);
            ctx.command(HostCommand::Preload {
                ticket,
                src: src.clone(),
            });
        }
        if self.should_advance() {
            self.arm(ctx);
        }
    }

    pub(crate) fn sync(&mut self, content: &SlideshowContent, ctx: &mut SequencerCtx<'_>) {
        self.durations = content.images.iter().map(|s| s.duration).collect();
        self.auto_play = content.auto_play;
        self.transition = content.transition;
        match (self.should_advance(), self.timer) {
            (true, None) => self.arm(ctx),
            (false, Some(id)) => {
                ctx.cancel(id);
                self.timer = None;
            }
            _ => {}
        }
    }

    pub(crate) fn on_timer(&mut self, fired: FiredTimer, ctx: &mut SequencerCtx<'_>) {
        if self.timer != Some(fired.id) || fired.kind != TimerKind::SlideAdvance {
            return;
        }
        self.timer = None;
        let from = self.index;
        self.index = (self.index + 1) % self.srcs.len();
        if self.is_loaded(self.index) {
            self.last_shown = Some(self.index);
        }
        ctx.record(Change::SlideAdvanced {
            from,
            to: self.index,
        });
        if self.should_advance() {
            self.arm(ctx);
        }
    }

    pub(crate) fn on_asset(
        &mut self,
        ticket: AssetTicket,
        event: AssetEvent,
        ctx: &mut SequencerCtx<'_>,
    ) {
        let slot = ticket.slot;
        if slot >= self.srcs.len() || self.loaded.contains(&slot) || self.failed.contains(&slot) {
            return;
        }
        match event {
            AssetEvent::Ready => {
                self.loaded.insert(slot);
                if slot == self.index {
                    self.last_shown = Some(slot);
                }
                ctx.record(Change::SlideLoaded { index: slot });
            }
            AssetEvent::Failed => {
                tracing::warn!(
                    element = ctx.element_id,
                    index = slot,
                    src = %self.srcs[slot],
                    "slide failed to load"
                );
                self.failed.insert(slot);
                ctx.record(Change::SlideFailed { index: slot });
            }
            AssetEvent::Ended | AssetEvent::PlayBlocked => {}
        }
    }

    pub(crate) fn forget_timer(&mut self) {
        self.timer = None;
    }

    fn arm(&mut self, ctx: &mut SequencerCtx<'_>) {
        let seconds = slide_seconds(
            self.durations.get(self.index).copied(),
            ctx.config.default_slide_seconds,
        );
        let after = Duration::try_from_secs_f64(seconds).unwrap_or(Duration::MAX);
        self.timer = Some(ctx.schedule(TimerKind::SlideAdvance, after));
    }
}

/// On-screen time of a slide; unset, non-positive and non-finite durations use `default`.
pub fn slide_seconds(duration: Option<f64>, default: f64) -> f64 {
    match duration {
        Some(d) if d.is_finite() && d > 0.0 => d,
        _ => default,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sequencer/slideshow.rs"]
mod tests;
