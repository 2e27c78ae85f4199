use crate::{
    composition::model::VideoContent,
    runtime::{
        effects::SequencerCtx,
        host::{AssetEvent, AssetTicket, Change, HostCommand, MediaKind},
        timers::{FiredTimer, TimerId, TimerKind},
    },
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
/// Playback phase of the current playlist item.
pub enum PlaybackPhase {
    /// Empty playlist; nothing to play.
    Idle,
    /// Waiting for the host to load the current item.
    Loading,
    /// The current item is on screen.
    Playing,
    /// The current item failed; a skip may be pending.
    Errored,
    /// Reached the end without looping. Terminal.
    Stalled,
}

/// Plays a video playlist, advancing on natural end and skipping failed items.
///
/// Every load bumps an attempt counter carried in the asset ticket, so callbacks for an item
/// that is no longer current are recognised and ignored.
#[derive(Clone, Debug)]
pub struct PlaylistSequencer {
    sources: Vec<String>,
    auto_play: bool,
    looping: bool,
    muted: bool,
    index: usize,
    attempt: u32,
    phase: PlaybackPhase,
    muted_fallback: bool,
    skip_timer: Option<TimerId>,
}

impl PlaylistSequencer {
    pub fn new(content: &VideoContent) -> Self {
        Self {
            sources: content.playlist().into_iter().map(str::to_string).collect(),
            auto_play: content.auto_play,
            looping: content.looping,
            muted: content.muted,
            index: 0,
            attempt: 0,
            phase: PlaybackPhase::Idle,
            muted_fallback: false,
            skip_timer: None,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.phase
    }

    pub fn current_src(&self) -> Option<&str> {
        self.sources.get(self.index).map(String::as_str)
    }

    /// Whether the host should loop the current item by itself.
    pub fn native_loop(&self) -> bool {
        self.looping && self.sources.len() == 1
    }

    /// Effective mute state, including the muted autoplay fallback.
    pub fn is_muted(&self) -> bool {
        self.muted || self.muted_fallback
    }

    pub fn auto_play(&self) -> bool {
        self.auto_play
    }

    pub fn skip_pending(&self) -> bool {
        self.skip_timer.is_some()
    }

    /// Where playback goes after the current item, or `None` when it stops for good.
    fn next_index(&self) -> Option<usize> {
        let len = self.sources.len();
        if len == 0 {
            None
        } else if self.index + 1 < len {
            Some(self.index + 1)
        } else if self.looping {
            Some(0)
        } else {
            None
        }
    }

    pub(crate) fn start(&mut self, ctx: &mut SequencerCtx<'_>) {
        if !self.sources.is_empty() {
            self.load(0, ctx);
        }
    }

    pub(crate) fn sync(&mut self, content: &VideoContent, ctx: &mut SequencerCtx<'_>) {
        self.auto_play = content.auto_play;
        self.looping = content.looping;
        self.muted = content.muted;
        if self.phase == PlaybackPhase::Errored && self.skip_timer.is_none() {
            self.arm_skip(ctx);
        }
    }

    pub(crate) fn on_timer(&mut self, fired: FiredTimer, ctx: &mut SequencerCtx<'_>) {
        if self.skip_timer != Some(fired.id) || fired.kind != TimerKind::ErrorSkip {
            return;
        }
        self.skip_timer = None;
        if let Some(next) = self.next_index() {
            self.advance(next, ctx);
        }
    }

    pub(crate) fn on_asset(
        &mut self,
        ticket: AssetTicket,
        event: AssetEvent,
        ctx: &mut SequencerCtx<'_>,
    ) {
        if ticket.slot != self.index || ticket.attempt != self.attempt {
            tracing::debug!(
                element = ctx.element_id,
                slot = ticket.slot,
                attempt = ticket.attempt,
                ?event,
                "ignoring callback for a previous playlist item"
            );
            return;
        }
        match (event, self.phase) {
            (AssetEvent::Ready, PlaybackPhase::Loading) => {
                self.phase = PlaybackPhase::Playing;
                if self.auto_play {
                    ctx.command(HostCommand::Play {
                        ticket,
                        muted: self.is_muted(),
                    });
                }
                ctx.record(Change::ItemPlaying { index: self.index });
            }
            (AssetEvent::Failed, PlaybackPhase::Loading | PlaybackPhase::Playing) => {
                tracing::warn!(
                    element = ctx.element_id,
                    index = self.index,
                    src = self.current_src().unwrap_or_default(),
                    "playlist item failed"
                );
                self.phase = PlaybackPhase::Errored;
                ctx.record(Change::ItemFailed { index: self.index });
                self.arm_skip(ctx);
            }
            (AssetEvent::Ended, PlaybackPhase::Playing) => match self.next_index() {
                Some(next) => self.advance(next, ctx),
                None => {
                    self.phase = PlaybackPhase::Stalled;
                    ctx.record(Change::PlaylistStalled { index: self.index });
                }
            },
            (AssetEvent::PlayBlocked, PlaybackPhase::Playing) => {
                if self.is_muted() {
                    tracing::debug!(
                        element = ctx.element_id,
                        "muted playback blocked; waiting"
                    );
                    return;
                }
                self.muted_fallback = true;
                ctx.command(HostCommand::Play {
                    ticket,
                    muted: true,
                });
                ctx.record(Change::MutedFallback { index: self.index });
            }
            (event, phase) => tracing::debug!(
                element = ctx.element_id,
                ?event,
                ?phase,
                "ignoring asset event in this phase"
            ),
        }
    }

    pub(crate) fn forget_timer(&mut self) {
        self.skip_timer = None;
    }

    fn arm_skip(&mut self, ctx: &mut SequencerCtx<'_>) {
        if self.next_index().is_none() {
            return;
        }
        let delay = ctx.config.error_skip_delay();
        self.skip_timer = Some(ctx.schedule(TimerKind::ErrorSkip, delay));
    }

    fn advance(&mut self, to: usize, ctx: &mut SequencerCtx<'_>) {
        if let Some(id) = self.skip_timer.take() {
            ctx.cancel(id);
        }
        let from = self.index;
        ctx.record(Change::PlaylistAdvanced { from, to });
        self.load(to, ctx);
    }

    fn load(&mut self, index: usize, ctx: &mut SequencerCtx<'_>) {
        let Some(src) = self.sources.get(index).cloned() else {
            return;
        };
        self.index = index;
        self.attempt += 1;
        self.phase = PlaybackPhase::Loading;
        self.muted_fallback = false;
        let ticket = ctx.ticket(index, self.attempt);
        ctx.command(HostCommand::LoadMedia {
            ticket,
            kind: MediaKind::Video,
            src,
            looping: self.native_loop(),
            muted: self.muted,
        });
        ctx.record(Change::ItemLoading { index });
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sequencer/playlist.rs"]
mod tests;
