use std::cell::{Cell, RefCell};

use super::*;
use crate::{
    foundation::core::ASPECT_RATIOS,
    repository::memory::InMemoryProjectRepository,
};
use rand::{SeedableRng, rngs::StdRng};

/// Repository whose code checks report the first `collisions` queries as taken.
struct CollidingRepo {
    project: Project,
    collisions: u32,
    queried: RefCell<Vec<String>>,
    conflicts_on_update: Cell<u32>,
}

impl CollidingRepo {
    fn new(collisions: u32) -> Self {
        Self {
            project: Project::new("Lobby", &ASPECT_RATIOS[0]),
            collisions,
            queried: RefCell::new(Vec::new()),
            conflicts_on_update: Cell::new(0),
        }
    }
}

impl ProjectRepository for CollidingRepo {
    fn list_by_owner(&self, _owner: &OwnerId) -> SignageResult<Vec<Project>> {
        Ok(vec![self.project.clone()])
    }

    fn fetch(&self, _owner: &OwnerId, _id: &str) -> SignageResult<Option<Project>> {
        Ok(Some(self.project.clone()))
    }

    fn fetch_published(&self, _id: &str) -> SignageResult<Option<Project>> {
        Ok(None)
    }

    fn fetch_by_code(&self, _code: &str) -> SignageResult<Option<Project>> {
        Ok(None)
    }

    fn create(&self, _owner: &OwnerId, project: Project) -> SignageResult<Project> {
        Ok(project)
    }

    fn update(&self, _owner: &OwnerId, _id: &str, update: ProjectUpdate) -> SignageResult<Project> {
        let pending = self.conflicts_on_update.get();
        if pending > 0 {
            self.conflicts_on_update.set(pending - 1);
            return Err(SignageError::conflict("raced"));
        }
        let mut project = self.project.clone();
        update.apply_to(&mut project, Utc::now());
        Ok(project)
    }

    fn delete(&self, _owner: &OwnerId, _id: &str) -> SignageResult<()> {
        Ok(())
    }

    fn is_publish_code_taken(&self, code: &str) -> SignageResult<bool> {
        let mut queried = self.queried.borrow_mut();
        queried.push(code.to_string());
        Ok(queried.len() as u32 <= self.collisions)
    }
}

#[test]
fn generated_codes_use_the_unambiguous_alphabet() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..200 {
        let code = PublishCode::generate(&mut rng);
        assert_eq!(code.as_str().len(), PUBLISH_CODE_LEN);
        assert!(
            code.as_str()
                .bytes()
                .all(|b| PUBLISH_CODE_ALPHABET.contains(&b))
        );
        assert!(!code.as_str().contains(&['0', 'O', '1', 'I'][..]));
    }
}

#[test]
fn parse_normalises_case_and_rejects_ambiguous_characters() {
    assert_eq!(PublishCode::parse(" abc234 ").unwrap().as_str(), "ABC234");
    assert!(PublishCode::parse("ABC23").is_err());
    assert!(PublishCode::parse("ABC230").is_err());
    assert!("ABCDEI".parse::<PublishCode>().is_err());
}

#[test]
fn ten_collisions_exhaust_the_generator() {
    let repo = CollidingRepo::new(10);
    let mut rng = StdRng::seed_from_u64(1);
    let err = publish_project(&repo, "alice", "p", &mut rng, 10).unwrap_err();
    assert!(matches!(
        err,
        SignageError::PublishCodeExhausted { attempts: 10 }
    ));
    assert_eq!(repo.queried.borrow().len(), 10);
}

#[test]
fn fewer_collisions_yield_the_first_free_code() {
    let repo = CollidingRepo::new(9);
    let mut rng = StdRng::seed_from_u64(1);
    let published = publish_project(&repo, "alice", "p", &mut rng, 10).unwrap();
    let queried = repo.queried.borrow();
    assert_eq!(queried.len(), 10);
    assert_eq!(published.publish_code.as_deref(), queried.last().map(String::as_str));
    assert!(published.is_published);
    assert!(published.published_at.is_some());
}

#[test]
fn write_conflicts_count_as_collisions() {
    let repo = CollidingRepo::new(0);
    repo.conflicts_on_update.set(2);
    let mut rng = StdRng::seed_from_u64(3);
    let published = publish_project(&repo, "alice", "p", &mut rng, 10).unwrap();
    let queried = repo.queried.borrow();
    assert_eq!(queried.len(), 3);
    assert_eq!(published.publish_code.as_deref(), queried.last().map(String::as_str));
}

#[test]
fn republishing_keeps_the_existing_code() {
    let repo = InMemoryProjectRepository::new();
    let project = repo
        .create("alice", Project::new("Lobby", &ASPECT_RATIOS[0]))
        .unwrap();
    let mut rng = StdRng::seed_from_u64(11);

    let first = publish_project(&repo, "alice", &project.id, &mut rng, 10).unwrap();
    let code = first.publish_code.clone().unwrap();

    let hidden = unpublish_project(&repo, "alice", &project.id).unwrap();
    assert!(!hidden.is_published);
    assert!(repo.fetch_by_code(&code).unwrap().is_none());

    let again = publish_project(&repo, "alice", &project.id, &mut rng, 10).unwrap();
    assert_eq!(again.publish_code.as_deref(), Some(code.as_str()));
    assert!(repo.fetch_by_code(&code.to_lowercase()).unwrap().is_some());
}

#[test]
fn publishing_a_missing_project_is_not_found() {
    let repo = InMemoryProjectRepository::new();
    let mut rng = StdRng::seed_from_u64(0);
    assert!(matches!(
        publish_project(&repo, "alice", "nope", &mut rng, 10),
        Err(SignageError::NotFound(_))
    ));
}
