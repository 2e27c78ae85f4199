use std::collections::HashSet;

use crate::{
    compose::composer::{Composer, Frame},
    composition::model::{Element, Project},
    foundation::{
        config::EngineConfig,
        core::Canvas,
        error::{SignageError, SignageResult},
    },
    layout::mapper::ScaleMode,
    publish::code::PublishCode,
    repository::ProjectRepository,
    runtime::{
        clock::{Clock, TimePoint},
        host::{AssetEvent, AssetTicket, HostCommand, Transition},
        registry::SequencerRegistry,
    },
};

pub const MSG_NO_DISPLAY_ID: &str = "No display ID provided";
pub const MSG_NOT_FOUND: &str = "Display not found or not published";
pub const MSG_LOAD_FAILED: &str = "Failed to load display";

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
/// What an unattended display is currently showing.
pub enum DisplayStatus {
    /// Nothing loaded yet.
    Loading,
    /// A project is loaded and playing.
    Ready,
    /// The project could not be shown; `message` is meant for the screen.
    Unavailable { message: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// How a display addresses its project.
pub enum DisplayKey {
    Id(String),
    /// Public publish code; case-insensitive.
    Code(String),
}

/// Drives one display: owns the current element snapshot, the sequencer registry and the
/// clock every timer is measured against.
///
/// The engine is single-threaded and passive. A host loop calls [`DisplayEngine::tick`]
/// when [`DisplayEngine::next_deadline`] passes, forwards host callbacks through
/// [`DisplayEngine::handle_asset_event`], executes [`DisplayEngine::take_commands`] and
/// paints [`DisplayEngine::frame`].
#[derive(Debug)]
pub struct DisplayEngine<C: Clock> {
    clock: C,
    scale_mode: ScaleMode,
    status: DisplayStatus,
    canvas: Option<Canvas>,
    elements: Vec<Element>,
    registry: SequencerRegistry,
}

impl<C: Clock> DisplayEngine<C> {
    pub fn new(clock: C, config: EngineConfig) -> Self {
        Self {
            clock,
            scale_mode: config.scale_mode,
            status: DisplayStatus::Loading,
            canvas: None,
            elements: Vec::new(),
            registry: SequencerRegistry::new(config),
        }
    }

    pub fn status(&self) -> &DisplayStatus {
        &self.status
    }

    pub fn now(&self) -> TimePoint {
        self.clock.now()
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn registry(&self) -> &SequencerRegistry {
        &self.registry
    }

    pub fn scale_mode(&self) -> ScaleMode {
        self.scale_mode
    }

    pub fn set_scale_mode(&mut self, mode: ScaleMode) -> SignageResult<()> {
        mode.validate()?;
        self.scale_mode = mode;
        Ok(())
    }

    /// Validate and start playing `project`, replacing whatever was loaded.
    #[tracing::instrument(skip(self, project), fields(project = %project.id))]
    pub fn load_project(&mut self, project: &Project) -> SignageResult<()> {
        project.validate()?;
        self.canvas = Some(project.canvas());
        self.replace_elements(project.elements.clone())?;
        self.status = DisplayStatus::Ready;
        tracing::info!(
            elements = self.elements.len(),
            sequencers = self.registry.len(),
            "project loaded"
        );
        Ok(())
    }

    /// Resolve `key` through the public repository views and load the project.
    ///
    /// Failures never propagate: they become [`DisplayStatus::Unavailable`].
    pub fn load_from_repository<R>(&mut self, repo: &R, key: &DisplayKey) -> &DisplayStatus
    where
        R: ProjectRepository + ?Sized,
    {
        let fetched = match key {
            DisplayKey::Id(id) if id.trim().is_empty() => {
                return self.unavailable(MSG_NO_DISPLAY_ID);
            }
            DisplayKey::Code(code) if code.trim().is_empty() => {
                return self.unavailable(MSG_NO_DISPLAY_ID);
            }
            DisplayKey::Id(id) => repo.fetch_published(id),
            DisplayKey::Code(code) => match PublishCode::parse(code) {
                Ok(code) => repo.fetch_by_code(code.as_str()),
                Err(_) => Ok(None),
            },
        };
        match fetched {
            Ok(Some(project)) => {
                if let Err(e) = self.load_project(&project) {
                    tracing::warn!(error = %e, "published project failed validation");
                    return self.unavailable(MSG_LOAD_FAILED);
                }
                &self.status
            }
            Ok(None) => self.unavailable(MSG_NOT_FOUND),
            Err(e) => {
                tracing::warn!(error = %e, "display load failed");
                self.unavailable(MSG_LOAD_FAILED)
            }
        }
    }

    /// Swap in a new element list. All runtime state is discarded and rebuilt.
    pub fn replace_elements(&mut self, elements: Vec<Element>) -> SignageResult<()> {
        validate_elements(&elements)?;
        let now = self.clock.now();
        self.registry.replace_all(&elements, now);
        self.elements = elements;
        Ok(())
    }

    /// Apply an edited element list, keeping runtime state of elements whose sources did not
    /// change.
    pub fn update_elements(&mut self, elements: Vec<Element>) -> SignageResult<()> {
        validate_elements(&elements)?;
        let now = self.clock.now();
        self.registry.reconcile(&elements, now);
        self.elements = elements;
        Ok(())
    }

    /// Fire due timers and return every transition recorded since the last call.
    pub fn tick(&mut self) -> Vec<Transition> {
        let now = self.clock.now();
        self.registry.fire_due(now);
        self.registry.drain_transitions()
    }

    /// Returns `false` if the event was addressed to a disposed sequencer.
    pub fn handle_asset_event(&mut self, ticket: AssetTicket, event: AssetEvent) -> bool {
        let now = self.clock.now();
        self.registry.deliver(ticket, event, now)
    }

    pub fn notify_user_interaction(&mut self) {
        let now = self.clock.now();
        self.registry.user_interaction(now);
    }

    pub fn take_commands(&mut self) -> Vec<HostCommand> {
        self.registry.drain_commands()
    }

    pub fn take_transitions(&mut self) -> Vec<Transition> {
        self.registry.drain_transitions()
    }

    pub fn next_deadline(&mut self) -> Option<TimePoint> {
        self.registry.next_deadline()
    }

    /// Compose the current frame.
    pub fn frame(&self) -> SignageResult<Frame> {
        let canvas = self
            .canvas
            .ok_or_else(|| SignageError::domain("no project loaded"))?;
        Composer::compose_frame(&self.elements, canvas, self.scale_mode, &self.registry)
    }

    /// Dispose every sequencer and return to [`DisplayStatus::Loading`].
    pub fn unload(&mut self) {
        let now = self.clock.now();
        self.registry.dispose_all(now);
        self.elements.clear();
        self.canvas = None;
        self.status = DisplayStatus::Loading;
    }

    fn unavailable(&mut self, message: &str) -> &DisplayStatus {
        self.unload();
        self.status = DisplayStatus::Unavailable {
            message: message.to_string(),
        };
        &self.status
    }
}

fn validate_elements(elements: &[Element]) -> SignageResult<()> {
    let mut seen = HashSet::with_capacity(elements.len());
    for element in elements {
        element.validate()?;
        if !seen.insert(element.id.as_str()) {
            return Err(SignageError::domain(format!(
                "duplicate element id '{}'",
                element.id
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/player/engine.rs"]
mod tests;
