use chrono::Utc;
use rand::Rng;

use crate::{
    composition::model::Project,
    foundation::error::{SignageError, SignageResult},
    repository::{OwnerId, ProjectRepository, ProjectUpdate},
};

/// Characters a publish code is drawn from. `0`/`O` and `1`/`I` are left out so codes can
/// be read off a screen and typed without ambiguity.
pub const PUBLISH_CODE_ALPHABET: &[u8; 32] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
pub const PUBLISH_CODE_LEN: usize = 6;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
/// A six character public display code, stored uppercase.
pub struct PublishCode(String);

impl PublishCode {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let code = (0..PUBLISH_CODE_LEN)
            .map(|_| char::from(PUBLISH_CODE_ALPHABET[rng.gen_range(0..PUBLISH_CODE_ALPHABET.len())]))
            .collect();
        Self(code)
    }

    /// Parse user input, ignoring case and surrounding whitespace.
    pub fn parse(s: &str) -> SignageResult<Self> {
        let code = s.trim().to_ascii_uppercase();
        if code.len() != PUBLISH_CODE_LEN {
            return Err(SignageError::validation(format!(
                "publish code must be {PUBLISH_CODE_LEN} characters (got {})",
                code.len()
            )));
        }
        if let Some(bad) = code.bytes().find(|b| !PUBLISH_CODE_ALPHABET.contains(b)) {
            return Err(SignageError::validation(format!(
                "publish code contains invalid character '{}'",
                char::from(bad)
            )));
        }
        Ok(Self(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PublishCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for PublishCode {
    type Err = SignageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Publish a project, keeping its code if it already has one.
///
/// A fresh code is checked against the repository before it is written; if another writer
/// claims it between the check and the write, the write's conflict counts as a collision
/// and another code is drawn.
#[tracing::instrument(skip(repo, rng))]
pub fn publish_project<P, R>(
    repo: &P,
    owner: &OwnerId,
    project_id: &str,
    rng: &mut R,
    max_attempts: u32,
) -> SignageResult<Project>
where
    P: ProjectRepository + ?Sized,
    R: Rng + ?Sized,
{
    let project = repo
        .fetch(owner, project_id)?
        .ok_or_else(|| SignageError::not_found(format!("project '{project_id}'")))?;

    if let Some(existing) = project.publish_code {
        let published = repo.update(
            owner,
            project_id,
            ProjectUpdate {
                is_published: Some(true),
                published_at: Some(Some(Utc::now())),
                ..ProjectUpdate::default()
            },
        )?;
        tracing::info!(code = %existing, "project republished");
        return Ok(published);
    }

    for _ in 0..max_attempts {
        let code = PublishCode::generate(rng);
        if repo.is_publish_code_taken(code.as_str())? {
            tracing::debug!(%code, "publish code collision");
            continue;
        }
        let update = ProjectUpdate {
            is_published: Some(true),
            publish_code: Some(Some(code.to_string())),
            published_at: Some(Some(Utc::now())),
            ..ProjectUpdate::default()
        };
        match repo.update(owner, project_id, update) {
            Ok(published) => {
                tracing::info!(%code, "project published");
                return Ok(published);
            }
            Err(e) if e.is_conflict() => {
                tracing::debug!(%code, "publish code claimed concurrently");
            }
            Err(e) => return Err(e),
        }
    }
    Err(SignageError::PublishCodeExhausted {
        attempts: max_attempts,
    })
}

/// Hide a project from displays. The code is kept so republishing restores the same URL.
#[tracing::instrument(skip(repo))]
pub fn unpublish_project<P>(repo: &P, owner: &OwnerId, project_id: &str) -> SignageResult<Project>
where
    P: ProjectRepository + ?Sized,
{
    let project = repo.update(
        owner,
        project_id,
        ProjectUpdate {
            is_published: Some(false),
            ..ProjectUpdate::default()
        },
    )?;
    tracing::info!("project unpublished");
    Ok(project)
}

#[cfg(test)]
#[path = "../../tests/unit/publish/code.rs"]
mod tests;
