//! Backend abstraction layer
//!
//! This module provides trait-based abstractions over the version-control
//! backend, allowing for multiple implementations including a hosting API,
//! a local repository and an in-memory mock for testing.
//!
//! # Overview
//!
//! Two capabilities are consumed by the rest of the crate:
//!
//! - [RefStore]: branch lookup, commit lookup and reference creation
//! - [RepositoryReader]: manifest versions and pull-request branches
//!
//! The concrete implementations include:
//!
//! - [github::GitHubBackend]: the GitHub REST API, using `reqwest`
//! - [repository::Git2Backend]: a repository on disk, using the `git2` crate
//! - [mock::MockBackend]: an in-memory backend that records every call
//!
//! Both traits are implemented by every backend and are bound to a single
//! repository when the backend is constructed.

pub mod github;
pub mod mock;
pub mod repository;

pub use github::GitHubBackend;
pub use mock::{BackendCall, MockBackend};
pub use repository::Git2Backend;

use crate::domain::SemanticVersion;
use crate::error::{Result, VersionBranchError};
use regex::Regex;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// A commit as reported by the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRef {
    /// Full commit hash
    pub sha: String,
}

impl CommitRef {
    pub fn new(sha: impl Into<String>) -> Self {
        CommitRef { sha: sha.into() }
    }
}

/// Base and head branch names recorded on a pull request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestBranches {
    pub base_branch: String,
    pub head_branch: String,
}

/// Repository coordinates on the hosting service (`owner/repo`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSlug {
    pub owner: String,
    pub repo: String,
}

impl RepoSlug {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        RepoSlug {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Parse an `owner/repo` string such as `GITHUB_REPOSITORY`
    pub fn parse(full_name: &str) -> Result<Self> {
        let re = Regex::new(r"^([A-Za-z0-9_.-]+)/([A-Za-z0-9_.-]+)$")
            .map_err(|e| VersionBranchError::config(e.to_string()))?;

        let caps = re.captures(full_name.trim()).ok_or_else(|| {
            VersionBranchError::invalid_input(format!(
                "Invalid repository '{}': expected owner/repo",
                full_name
            ))
        })?;

        Ok(RepoSlug::new(&caps[1], &caps[2]))
    }
}

impl FromStr for RepoSlug {
    type Err = VersionBranchError;

    fn from_str(s: &str) -> Result<Self> {
        RepoSlug::parse(s)
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Reference primitives against the version-control backend
///
/// ## Not Found
///
/// A missing branch is reported as a [VersionBranchError::Backend] carrying
/// the well-known not-found status, so callers branch on
/// [VersionBranchError::is_not_found] rather than on backend-specific errors.
///
/// ## Implementations
///
/// - [GitHubBackend](github::GitHubBackend)
/// - [Git2Backend](repository::Git2Backend)
/// - [MockBackend](mock::MockBackend)
pub trait RefStore: Send + Sync {
    /// Look up a branch by name and return the commit it points at
    ///
    /// # Arguments
    /// * `branch` - Plain branch name (e.g., "main"), without any `refs/heads/` prefix
    ///
    /// # Returns
    /// * `Ok(CommitRef)` - The branch exists
    /// * `Err` - Not found (see [VersionBranchError::is_not_found]) or any other failure
    fn get_ref(&self, branch: &str) -> Result<CommitRef>;

    /// Fetch the commit currently at the head of `branch`
    fn get_commit(&self, branch: &str) -> Result<CommitRef>;

    /// Create a new branch reference pointing at `sha`
    ///
    /// Fails if the reference already exists.
    fn create_ref(&self, branch: &str, sha: &str) -> Result<()>;
}

/// Read-only repository metadata
pub trait RepositoryReader: Send + Sync {
    /// Read the manifest's `version` field on `branch`
    ///
    /// # Returns
    /// * `Ok(SemanticVersion)` - The parsed version
    /// * `Err` - Transport failure, missing manifest, or a version that is not valid semver
    fn fetch_manifest_version(&self, branch: &str) -> Result<SemanticVersion>;

    /// Read the base and head branch names of pull request `number`
    fn fetch_pull_request(&self, number: u64) -> Result<PullRequestBranches>;
}

/// The subset of a package manifest this crate reads
#[derive(Debug, Deserialize)]
pub(crate) struct Manifest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<serde_json::Value>,
}

/// Decode a JSON manifest and parse its `version` field.
///
/// `origin` names where the manifest came from and is only used in errors.
pub(crate) fn parse_manifest_version(body: &str, origin: &str) -> Result<SemanticVersion> {
    let manifest: Manifest = serde_json::from_str(body).map_err(|e| {
        VersionBranchError::invalid_input(format!("Manifest {} is not valid JSON: {}", origin, e))
    })?;

    let version = match manifest.version {
        Some(serde_json::Value::String(v)) => v,
        Some(other) => other.to_string(),
        None => {
            return Err(VersionBranchError::invalid_input(format!(
                "Manifest {} has no version field",
                origin
            )))
        }
    };

    tracing::debug!(origin, name = ?manifest.name, %version, "manifest read");

    SemanticVersion::parse(&version)
        .map_err(|_| VersionBranchError::invalid_version(version, format!("read from {}", origin)))
}
