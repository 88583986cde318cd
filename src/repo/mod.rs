//! Git repository inspection.

pub mod git;

pub use git::{inspect_repository, RepoContext};
