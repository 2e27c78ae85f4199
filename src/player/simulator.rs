use std::{
    collections::{BTreeMap, HashSet},
    time::Duration,
};

use crate::{
    player::engine::DisplayEngine,
    runtime::{
        clock::{Clock, ManualClock, TimePoint},
        host::{AssetEvent, AssetTicket, HostCommand, InstanceId, MediaKind, Transition},
    },
};

/// Default length of every simulated video.
pub const DEFAULT_VIDEO_SECONDS: f64 = 10.0;

#[derive(Clone, Debug)]
/// Behaviour of the fake host.
pub struct SimulatorOptions {
    /// Sources that fail to load; everything else loads instantly.
    pub fail: HashSet<String>,
    /// Length of every video before it reports its natural end.
    pub video_seconds: f64,
    /// Refuse unmuted playback, as browsers do without a user gesture.
    pub block_autoplay: bool,
}

impl Default for SimulatorOptions {
    fn default() -> Self {
        Self {
            fail: HashSet::new(),
            video_seconds: DEFAULT_VIDEO_SECONDS,
            block_autoplay: false,
        }
    }
}

#[derive(Clone, Debug)]
struct Loaded {
    kind: MediaKind,
    looping: bool,
}

/// Auto-responding stand-in for a real media host.
#[derive(Debug)]
pub struct HostSimulator {
    options: SimulatorOptions,
    loaded: BTreeMap<AssetKey, Loaded>,
    // Keyed by (due, sequence) so equal deadlines keep submission order.
    pending: BTreeMap<(TimePoint, u64), (AssetTicket, AssetEvent)>,
    seq: u64,
}

type AssetKey = (InstanceId, usize, u32);

fn key(ticket: AssetTicket) -> AssetKey {
    (ticket.instance, ticket.slot, ticket.attempt)
}

impl HostSimulator {
    pub fn new(options: SimulatorOptions) -> Self {
        Self {
            options,
            loaded: BTreeMap::new(),
            pending: BTreeMap::new(),
            seq: 0,
        }
    }

    pub fn handle(&mut self, commands: Vec<HostCommand>, now: TimePoint) {
        for command in commands {
            match command {
                HostCommand::Preload { ticket, src } => {
                    self.answer_load(ticket, &src, now);
                }
                HostCommand::LoadMedia {
                    ticket,
                    kind,
                    src,
                    looping,
                    ..
                } => {
                    self.loaded.retain(|k, _| k.0 != ticket.instance);
                    if self.answer_load(ticket, &src, now) {
                        self.loaded.insert(key(ticket), Loaded { kind, looping });
                    }
                }
                HostCommand::Play { ticket, muted } => self.play(ticket, muted, now),
                HostCommand::SetVolume { .. } => {}
                HostCommand::SetLoop { ticket, looping } => {
                    if let Some(loaded) = self.loaded.get_mut(&key(ticket)) {
                        loaded.looping = looping;
                    }
                }
                HostCommand::Release { instance } => {
                    self.loaded.retain(|k, _| k.0 != instance);
                    self.pending.retain(|_, (t, _)| t.instance != instance);
                }
            }
        }
    }

    /// Pop every event due at or before `now`, earliest first.
    pub fn due_events(&mut self, now: TimePoint) -> Vec<(AssetTicket, AssetEvent)> {
        let later = self.pending.split_off(&(TimePoint(now.0.saturating_add(1)), 0));
        let due = std::mem::replace(&mut self.pending, later);
        due.into_values().collect()
    }

    pub fn next_event_at(&self) -> Option<TimePoint> {
        self.pending.keys().next().map(|(t, _)| *t)
    }

    fn answer_load(&mut self, ticket: AssetTicket, src: &str, now: TimePoint) -> bool {
        let ok = !self.options.fail.contains(src);
        let event = if ok {
            AssetEvent::Ready
        } else {
            AssetEvent::Failed
        };
        self.push(now, ticket, event);
        ok
    }

    fn play(&mut self, ticket: AssetTicket, muted: bool, now: TimePoint) {
        let Some(loaded) = self.loaded.get(&key(ticket)).cloned() else {
            return;
        };
        if self.options.block_autoplay && !muted {
            self.push(now, ticket, AssetEvent::PlayBlocked);
            return;
        }
        if loaded.kind == MediaKind::Video && !loaded.looping {
            let length = Duration::try_from_secs_f64(self.options.video_seconds)
                .unwrap_or(Duration::ZERO)
                .max(Duration::from_millis(1));
            self.push(now.after(length), ticket, AssetEvent::Ended);
        }
    }

    fn push(&mut self, at: TimePoint, ticket: AssetTicket, event: AssetEvent) {
        self.pending.insert((at, self.seq), (ticket, event));
        self.seq += 1;
    }
}

/// A display engine wired to a [`HostSimulator`] on a manual clock.
#[derive(Debug)]
pub struct Simulation {
    pub engine: DisplayEngine<ManualClock>,
    pub host: HostSimulator,
    clock: ManualClock,
}

impl Simulation {
    /// `clock` must be the same clock the engine was built with.
    pub fn new(engine: DisplayEngine<ManualClock>, clock: ManualClock, host: HostSimulator) -> Self {
        Self {
            engine,
            host,
            clock,
        }
    }

    /// Advance to `until` in steps of `step`, settling the engine and host at every step.
    ///
    /// Within a step, timers and host events are processed at their own time points, so the
    /// result does not depend on the step size.
    pub fn run_until(&mut self, until: TimePoint, step: Duration) -> Vec<Transition> {
        let mut out = self.settle();
        let step = step.max(Duration::from_millis(1));
        let mut t = self.clock.now();
        while t < until {
            let target = t.after(step).min(until);
            while let Some(at) = self.next_wakeup().filter(|at| *at <= target) {
                self.clock.set(at.max(t));
                out.extend(self.settle());
            }
            self.clock.set(target);
            out.extend(self.settle());
            t = target;
        }
        out
    }

    fn next_wakeup(&mut self) -> Option<TimePoint> {
        match (self.engine.next_deadline(), self.host.next_event_at()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Exchange commands and events at the current time until both sides are quiet.
    fn settle(&mut self) -> Vec<Transition> {
        let mut out = Vec::new();
        loop {
            out.extend(self.engine.tick());
            let now = self.clock.now();
            let commands = self.engine.take_commands();
            let idle = commands.is_empty();
            self.host.handle(commands, now);
            let events = self.host.due_events(now);
            if idle && events.is_empty() {
                break;
            }
            for (ticket, event) in events {
                self.engine.handle_asset_event(ticket, event);
            }
        }
        out.extend(self.engine.take_transitions());
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/player/simulator.rs"]
mod tests;
