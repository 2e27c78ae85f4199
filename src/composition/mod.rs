//! Project documents and the edit operations the authoring tool performs on them.

pub mod edit;
pub mod model;
