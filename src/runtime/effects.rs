use std::time::Duration;

use crate::{
    foundation::config::EngineConfig,
    runtime::{
        clock::TimePoint,
        host::{AssetTicket, Change, HostCommand, InstanceId, Transition},
        timers::{TimerId, TimerKind, TimerQueue},
    },
};

/// Side effects produced by sequencers and collected by the registry.
#[derive(Debug, Default)]
pub struct Effects {
    pub timers: TimerQueue,
    pub commands: Vec<HostCommand>,
    pub transitions: Vec<Transition>,
}

/// Everything a sequencer may touch while handling one stimulus.
///
/// A context is bound to a single sequencer instance, so timers, commands and transitions
/// it produces are attributed to that instance.
pub struct SequencerCtx<'a> {
    pub now: TimePoint,
    pub instance: InstanceId,
    pub element_id: &'a str,
    pub config: &'a EngineConfig,
    effects: &'a mut Effects,
}

impl<'a> SequencerCtx<'a> {
    pub fn new(
        now: TimePoint,
        instance: InstanceId,
        element_id: &'a str,
        config: &'a EngineConfig,
        effects: &'a mut Effects,
    ) -> Self {
        Self {
            now,
            instance,
            element_id,
            config,
            effects,
        }
    }

    pub fn ticket(&self, slot: usize, attempt: u32) -> AssetTicket {
        AssetTicket {
            instance: self.instance,
            slot,
            attempt,
        }
    }

    pub fn schedule(&mut self, kind: TimerKind, after: Duration) -> TimerId {
        self.effects
            .timers
            .schedule(self.instance, kind, self.now, after)
    }

    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.effects.timers.cancel(id)
    }

    /// Cancel every timer this instance armed.
    pub fn cancel_all(&mut self) -> usize {
        self.effects.timers.cancel_owner(self.instance)
    }

    pub fn command(&mut self, command: HostCommand) {
        self.effects.commands.push(command);
    }

    pub fn record(&mut self, change: Change) {
        tracing::debug!(
            element = self.element_id,
            instance = %self.instance,
            at_ms = self.now.as_millis(),
            ?change,
            "sequencer transition"
        );
        self.effects.transitions.push(Transition {
            element_id: self.element_id.to_string(),
            instance: self.instance,
            at: self.now,
            change,
        });
    }
}
