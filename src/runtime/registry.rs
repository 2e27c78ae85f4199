use std::collections::{BTreeMap, HashMap, HashSet};

use crate::{
    composition::model::Element,
    foundation::config::EngineConfig,
    runtime::{
        clock::TimePoint,
        effects::{Effects, SequencerCtx},
        host::{AssetEvent, AssetTicket, HostCommand, InstanceId, Transition},
        signature::{ContentSignature, signature_of},
    },
    sequencer::Sequencer,
};

#[derive(Debug)]
struct Entry {
    instance: InstanceId,
    signature: ContentSignature,
    sequencer: Sequencer,
}

/// One sequencer per time-based element, keyed by element id.
///
/// The registry is the only thing that routes stimuli to sequencers. Timers and asset events
/// are resolved through the owning [`InstanceId`], so anything addressed to a disposed
/// instance finds no owner and is dropped.
#[derive(Debug)]
pub struct SequencerRegistry {
    config: EngineConfig,
    entries: BTreeMap<String, Entry>,
    owners: HashMap<InstanceId, String>,
    next_instance: u64,
    effects: Effects,
}

impl SequencerRegistry {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            entries: BTreeMap::new(),
            owners: HashMap::new(),
            next_instance: 1,
            effects: Effects::default(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn pending_timers(&self) -> usize {
        self.effects.timers.len()
    }

    /// Discard all runtime state and start fresh sequencers for `elements`.
    pub fn replace_all(&mut self, elements: &[Element], now: TimePoint) {
        self.dispose_all(now);
        for element in elements {
            self.create(element, now);
        }
    }

    /// Bring the registry in line with a new snapshot, keeping sequencers whose element kept
    /// its identity.
    pub fn reconcile(&mut self, elements: &[Element], now: TimePoint) {
        let live: HashSet<&str> = elements.iter().map(|e| e.id.as_str()).collect();
        let gone: Vec<String> = self
            .entries
            .keys()
            .filter(|id| !live.contains(id.as_str()))
            .cloned()
            .collect();
        for id in gone {
            self.dispose(&id, now);
        }

        for element in elements {
            let current = self.entries.get(&element.id).map(|e| e.signature);
            match (current, signature_of(element)) {
                (Some(old), Some(new)) if old == new => self.sync(element, now),
                (Some(_), _) => {
                    self.dispose(&element.id, now);
                    self.create(element, now);
                }
                (None, _) => self.create(element, now),
            }
        }
    }

    pub fn dispose_all(&mut self, now: TimePoint) {
        let ids: Vec<String> = self.entries.keys().cloned().collect();
        for id in ids {
            self.dispose(&id, now);
        }
    }

    /// Sequencer driving `element`, if one exists for its current identity.
    pub fn sequencer_for(&self, element: &Element) -> Option<&Sequencer> {
        let entry = self.entries.get(&element.id)?;
        (Some(entry.signature) == signature_of(element)).then_some(&entry.sequencer)
    }

    pub fn instance_of(&self, element_id: &str) -> Option<InstanceId> {
        self.entries.get(element_id).map(|e| e.instance)
    }

    /// Run every timer due at or before `now`, each at its own deadline.
    pub fn fire_due(&mut self, now: TimePoint) -> usize {
        let mut fired_count = 0;
        while let Some(fired) = self.effects.timers.pop_due(now) {
            let Self {
                config,
                entries,
                owners,
                effects,
                ..
            } = self;
            let Some(id) = owners.get(&fired.owner) else {
                continue;
            };
            let Some(entry) = entries.get_mut(id) else {
                continue;
            };
            let mut ctx = SequencerCtx::new(fired.due, entry.instance, id, config, effects);
            entry.sequencer.on_timer(fired, &mut ctx);
            fired_count += 1;
        }
        fired_count
    }

    /// Route a host callback. Returns `false` when the issuing instance no longer exists.
    pub fn deliver(&mut self, ticket: AssetTicket, event: AssetEvent, now: TimePoint) -> bool {
        let Self {
            config,
            entries,
            owners,
            effects,
            ..
        } = self;
        let Some((id, entry)) = owners
            .get(&ticket.instance)
            .and_then(|id| entries.get_mut(id).map(|e| (id, e)))
        else {
            tracing::debug!(instance = %ticket.instance, ?event, "dropping event for disposed sequencer");
            return false;
        };
        let mut ctx = SequencerCtx::new(now, entry.instance, id, config, effects);
        entry.sequencer.on_asset(ticket, event, &mut ctx);
        true
    }

    pub fn user_interaction(&mut self, now: TimePoint) {
        let Self {
            config,
            entries,
            effects,
            ..
        } = self;
        for (id, entry) in entries.iter_mut() {
            let mut ctx = SequencerCtx::new(now, entry.instance, id, config, effects);
            entry.sequencer.on_user_interaction(&mut ctx);
        }
    }

    pub fn next_deadline(&mut self) -> Option<TimePoint> {
        self.effects.timers.next_deadline()
    }

    pub fn drain_commands(&mut self) -> Vec<HostCommand> {
        std::mem::take(&mut self.effects.commands)
    }

    pub fn drain_transitions(&mut self) -> Vec<Transition> {
        std::mem::take(&mut self.effects.transitions)
    }

    fn create(&mut self, element: &Element, now: TimePoint) {
        let (Some(signature), Some(mut sequencer)) =
            (signature_of(element), Sequencer::for_element(&element.kind))
        else {
            return;
        };
        let instance = InstanceId(self.next_instance);
        self.next_instance += 1;

        let mut ctx = SequencerCtx::new(
            now,
            instance,
            &element.id,
            &self.config,
            &mut self.effects,
        );
        sequencer.start(&mut ctx);
        tracing::debug!(
            element = %element.id,
            %instance,
            sequencer = sequencer.kind_name(),
            "sequencer started"
        );

        self.owners.insert(instance, element.id.clone());
        self.entries.insert(
            element.id.clone(),
            Entry {
                instance,
                signature,
                sequencer,
            },
        );
    }

    fn sync(&mut self, element: &Element, now: TimePoint) {
        let Self {
            config,
            entries,
            effects,
            ..
        } = self;
        if let Some(entry) = entries.get_mut(&element.id) {
            let mut ctx = SequencerCtx::new(now, entry.instance, &element.id, config, effects);
            entry.sequencer.sync(&element.kind, &mut ctx);
        }
    }

    fn dispose(&mut self, id: &str, now: TimePoint) {
        let Some(mut entry) = self.entries.remove(id) else {
            return;
        };
        self.owners.remove(&entry.instance);
        let mut ctx = SequencerCtx::new(now, entry.instance, id, &self.config, &mut self.effects);
        entry.sequencer.dispose(&mut ctx);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/runtime/registry.rs"]
mod tests;
