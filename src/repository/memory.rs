use std::collections::HashMap;

use chrono::Utc;
use parking_lot::RwLock;

use crate::{
    composition::model::Project,
    foundation::error::{SignageError, SignageResult},
    repository::{OwnerId, ProjectRepository, ProjectUpdate},
};

#[derive(Debug, Clone)]
struct Row {
    owner: String,
    project: Project,
}

/// Process-local repository backed by a `RwLock<HashMap>`.
#[derive(Debug, Default)]
pub struct InMemoryProjectRepository {
    rows: RwLock<HashMap<String, Row>>,
}

impl InMemoryProjectRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }
}

fn same_code(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

impl ProjectRepository for InMemoryProjectRepository {
    fn list_by_owner(&self, owner: &OwnerId) -> SignageResult<Vec<Project>> {
        let rows = self.rows.read();
        let mut out: Vec<Project> = rows
            .values()
            .filter(|r| r.owner == owner)
            .map(|r| r.project.clone())
            .collect();
        out.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(out)
    }

    fn fetch(&self, owner: &OwnerId, id: &str) -> SignageResult<Option<Project>> {
        Ok(self
            .rows
            .read()
            .get(id)
            .filter(|r| r.owner == owner)
            .map(|r| r.project.clone()))
    }

    fn fetch_published(&self, id: &str) -> SignageResult<Option<Project>> {
        Ok(self
            .rows
            .read()
            .get(id)
            .filter(|r| r.project.is_published)
            .map(|r| r.project.clone()))
    }

    fn fetch_by_code(&self, code: &str) -> SignageResult<Option<Project>> {
        Ok(self
            .rows
            .read()
            .values()
            .find(|r| {
                r.project.is_published
                    && r.project
                        .publish_code
                        .as_deref()
                        .is_some_and(|c| same_code(c, code))
            })
            .map(|r| r.project.clone()))
    }

    fn create(&self, owner: &OwnerId, project: Project) -> SignageResult<Project> {
        let mut rows = self.rows.write();
        if rows.contains_key(&project.id) {
            return Err(SignageError::conflict(format!(
                "project '{}' already exists",
                project.id
            )));
        }
        rows.insert(
            project.id.clone(),
            Row {
                owner: owner.to_string(),
                project: project.clone(),
            },
        );
        Ok(project)
    }

    fn update(&self, owner: &OwnerId, id: &str, update: ProjectUpdate) -> SignageResult<Project> {
        let mut rows = self.rows.write();
        if let Some(Some(code)) = &update.publish_code {
            let taken = rows.values().any(|r| {
                r.project.id != id
                    && r.project
                        .publish_code
                        .as_deref()
                        .is_some_and(|c| same_code(c, code))
            });
            if taken {
                return Err(SignageError::conflict(format!(
                    "publish code '{code}' is already in use"
                )));
            }
        }
        let row = rows
            .get_mut(id)
            .filter(|r| r.owner == owner)
            .ok_or_else(|| SignageError::not_found(format!("project '{id}'")))?;
        update.apply_to(&mut row.project, Utc::now());
        Ok(row.project.clone())
    }

    fn delete(&self, owner: &OwnerId, id: &str) -> SignageResult<()> {
        let mut rows = self.rows.write();
        if !rows.get(id).is_some_and(|r| r.owner == owner) {
            return Err(SignageError::not_found(format!("project '{id}'")));
        }
        rows.remove(id);
        Ok(())
    }

    fn is_publish_code_taken(&self, code: &str) -> SignageResult<bool> {
        Ok(self.rows.read().values().any(|r| {
            r.project
                .publish_code
                .as_deref()
                .is_some_and(|c| same_code(c, code))
        }))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/repository/memory.rs"]
mod tests;
