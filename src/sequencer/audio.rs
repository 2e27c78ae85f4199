use crate::{
    composition::model::AudioContent,
    runtime::{
        effects::SequencerCtx,
        host::{AssetEvent, AssetTicket, Change, HostCommand, MediaKind},
    },
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
/// Lifecycle of a background audio source.
pub enum AudioState {
    /// No source.
    Idle,
    Loading,
    /// Loaded, not playing (autoplay off or playback ended).
    Ready,
    Playing,
    /// Autoplay was blocked; waiting for a user interaction.
    Deferred,
    /// Load failed. Logged only.
    Failed,
}

/// Owns one long-lived audio source per audio element.
#[derive(Clone, Debug)]
pub struct AudioController {
    src: String,
    auto_play: bool,
    looping: bool,
    volume: f64,
    state: AudioState,
}

impl AudioController {
    pub fn new(content: &AudioContent) -> Self {
        Self {
            src: content.src.clone(),
            auto_play: content.auto_play,
            looping: content.looping,
            volume: content.volume,
            state: AudioState::Idle,
        }
    }

    pub fn state(&self) -> AudioState {
        self.state
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn looping(&self) -> bool {
        self.looping
    }

    pub(crate) fn start(&mut self, ctx: &mut SequencerCtx<'_>) {
        if self.src.is_empty() {
            return;
        }
        self.state = AudioState::Loading;
        let ticket = ctx.ticket(0, 0);
        ctx.command(HostCommand::LoadMedia {
            ticket,
            kind: MediaKind::Audio,
            src: self.src.clone(),
            looping: self.looping,
            muted: false,
        });
        ctx.command(HostCommand::SetVolume {
            ticket,
            volume: self.volume,
        });
    }

    pub(crate) fn sync(&mut self, content: &AudioContent, ctx: &mut SequencerCtx<'_>) {
        let autoplay_enabled = content.auto_play && !self.auto_play;
        self.auto_play = content.auto_play;
        if self.state == AudioState::Idle {
            self.looping = content.looping;
            self.volume = content.volume;
            return;
        }
        let ticket = ctx.ticket(0, 0);
        if content.looping != self.looping {
            self.looping = content.looping;
            ctx.command(HostCommand::SetLoop {
                ticket,
                looping: self.looping,
            });
        }
        if content.volume != self.volume {
            self.volume = content.volume;
            ctx.command(HostCommand::SetVolume {
                ticket,
                volume: self.volume,
            });
            ctx.record(Change::VolumeChanged);
        }
        if autoplay_enabled && self.state == AudioState::Ready {
            self.play(ticket, ctx);
        }
    }

    pub(crate) fn on_asset(
        &mut self,
        ticket: AssetTicket,
        event: AssetEvent,
        ctx: &mut SequencerCtx<'_>,
    ) {
        match (event, self.state) {
            (AssetEvent::Ready, AudioState::Loading) => {
                self.state = AudioState::Ready;
                ctx.record(Change::AudioReady);
                if self.auto_play {
                    self.play(ticket, ctx);
                }
            }
            (AssetEvent::Failed, AudioState::Loading | AudioState::Ready | AudioState::Playing) => {
                tracing::warn!(element = ctx.element_id, src = %self.src, "background audio failed");
                self.state = AudioState::Failed;
                ctx.record(Change::AudioFailed);
            }
            (AssetEvent::PlayBlocked, AudioState::Playing) => {
                tracing::info!(
                    element = ctx.element_id,
                    "audio autoplay blocked; waiting for user interaction"
                );
                self.state = AudioState::Deferred;
                ctx.record(Change::AudioDeferred);
            }
            (AssetEvent::Ended, AudioState::Playing) => self.state = AudioState::Ready,
            _ => {}
        }
    }

    pub(crate) fn on_user_interaction(&mut self, ctx: &mut SequencerCtx<'_>) {
        if self.state == AudioState::Deferred {
            let ticket = ctx.ticket(0, 0);
            self.play(ticket, ctx);
        }
    }

    fn play(&mut self, ticket: AssetTicket, ctx: &mut SequencerCtx<'_>) {
        self.state = AudioState::Playing;
        ctx.command(HostCommand::Play {
            ticket,
            muted: false,
        });
        ctx.record(Change::AudioPlaying);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sequencer/audio.rs"]
mod tests;
