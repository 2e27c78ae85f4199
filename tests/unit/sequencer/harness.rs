use crate::{
    foundation::config::EngineConfig,
    runtime::{
        clock::TimePoint,
        effects::{Effects, SequencerCtx},
        host::{AssetTicket, Change, HostCommand, InstanceId},
        timers::FiredTimer,
    },
};

/// Stand-in for the registry: one instance, one timeline.
pub(crate) struct Harness {
    pub config: EngineConfig,
    pub effects: Effects,
    pub now: TimePoint,
    pub instance: InstanceId,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            effects: Effects::default(),
            now: TimePoint::ZERO,
            instance: InstanceId(7),
        }
    }

    pub fn ctx(&mut self) -> SequencerCtx<'_> {
        SequencerCtx::new(
            self.now,
            self.instance,
            "el",
            &self.config,
            &mut self.effects,
        )
    }

    pub fn ticket(&self, slot: usize, attempt: u32) -> AssetTicket {
        AssetTicket {
            instance: self.instance,
            slot,
            attempt,
        }
    }

    /// Fire every timer due up to `until` in order, then park the clock at `until`.
    pub fn run_until(
        &mut self,
        until: TimePoint,
        mut on_timer: impl FnMut(FiredTimer, &mut SequencerCtx<'_>),
    ) {
        while let Some(fired) = self.effects.timers.pop_due(until) {
            self.now = fired.due;
            let mut ctx = self.ctx();
            on_timer(fired, &mut ctx);
        }
        self.now = until;
    }

    pub fn commands(&mut self) -> Vec<HostCommand> {
        std::mem::take(&mut self.effects.commands)
    }

    pub fn changes(&mut self) -> Vec<Change> {
        std::mem::take(&mut self.effects.transitions)
            .into_iter()
            .map(|t| t.change)
            .collect()
    }
}
