//! Project persistence as seen by the engine.
//!
//! The engine never owns storage. Callers supply a [`ProjectRepository`]; this crate ships
//! [`memory::InMemoryProjectRepository`] for tests, the CLI and single-process hosts.

pub mod memory;

use chrono::{DateTime, Utc};

use crate::{
    composition::model::{Element, Project},
    foundation::error::SignageResult,
};

/// Opaque owner identity used to scope private project access.
pub type OwnerId = str;

#[derive(Clone, Debug, Default, PartialEq)]
/// Partial project update. `None` leaves a field untouched.
pub struct ProjectUpdate {
    pub name: Option<String>,
    pub ratio: Option<String>,
    pub canvas_width: Option<u32>,
    pub canvas_height: Option<u32>,
    pub elements: Option<Vec<Element>>,
    pub is_published: Option<bool>,
    /// `Some(None)` clears the code.
    pub publish_code: Option<Option<String>>,
    pub published_at: Option<Option<DateTime<Utc>>>,
}

impl ProjectUpdate {
    /// Apply to `project` and bump its modification time.
    pub fn apply_to(self, project: &mut Project, now: DateTime<Utc>) {
        if let Some(v) = self.name {
            project.name = v;
        }
        if let Some(v) = self.ratio {
            project.ratio = v;
        }
        if let Some(v) = self.canvas_width {
            project.canvas_width = v;
        }
        if let Some(v) = self.canvas_height {
            project.canvas_height = v;
        }
        if let Some(v) = self.elements {
            project.elements = v;
        }
        if let Some(v) = self.is_published {
            project.is_published = v;
        }
        if let Some(v) = self.publish_code {
            project.publish_code = v;
        }
        if let Some(v) = self.published_at {
            project.published_at = v;
        }
        project.updated_at = now;
    }
}

/// Storage collaborator for projects.
///
/// Implementations must reject an update that assigns a publish code already held by a
/// different project with [`crate::SignageError::Conflict`].
pub trait ProjectRepository {
    /// All projects of `owner`, most recently updated first.
    fn list_by_owner(&self, owner: &OwnerId) -> SignageResult<Vec<Project>>;

    /// Owner-scoped fetch.
    fn fetch(&self, owner: &OwnerId, id: &str) -> SignageResult<Option<Project>>;

    /// Public fetch by id; only published projects are visible.
    fn fetch_published(&self, id: &str) -> SignageResult<Option<Project>>;

    /// Public fetch by publish code, case-insensitive; only published projects are visible.
    fn fetch_by_code(&self, code: &str) -> SignageResult<Option<Project>>;

    fn create(&self, owner: &OwnerId, project: Project) -> SignageResult<Project>;

    fn update(&self, owner: &OwnerId, id: &str, update: ProjectUpdate) -> SignageResult<Project>;

    fn delete(&self, owner: &OwnerId, id: &str) -> SignageResult<()>;

    fn is_publish_code_taken(&self, code: &str) -> SignageResult<bool>;
}
