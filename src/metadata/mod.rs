//! Remote metadata sources

pub mod github;

pub use github::{GitHubClient, License, Repository, RepositoryLicense, User};
