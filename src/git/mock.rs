use crate::domain::SemanticVersion;
use crate::error::{Result, VersionBranchError};
use crate::git::{
    parse_manifest_version, CommitRef, PullRequestBranches, RefStore, RepositoryReader,
};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A call made against the mock backend, in the order it was made
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    GetRef(String),
    GetCommit(String),
    CreateRef { branch: String, sha: String },
    FetchManifest(String),
    FetchPullRequest(u64),
}

impl BackendCall {
    pub fn is_mutation(&self) -> bool {
        matches!(self, BackendCall::CreateRef { .. })
    }
}

#[derive(Default)]
struct MockState {
    branches: HashMap<String, String>,
    manifests: HashMap<String, String>,
    pull_requests: HashMap<u64, PullRequestBranches>,
    lookup_failures: HashMap<String, u16>,
    calls: Vec<BackendCall>,
}

/// In-memory backend for testing without a hosting service or repository
#[derive(Default)]
pub struct MockBackend {
    state: Mutex<MockState>,
}

impl MockBackend {
    /// Create a new empty mock backend
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a branch whose head is `sha`
    pub fn with_branch(self, name: impl Into<String>, sha: impl Into<String>) -> Self {
        self.state().branches.insert(name.into(), sha.into());
        self
    }

    /// Set the manifest `version` read from `branch`
    pub fn with_manifest_version(self, branch: impl Into<String>, version: &str) -> Self {
        let body = serde_json::json!({ "name": "mock", "version": version }).to_string();
        self.state().manifests.insert(branch.into(), body);
        self
    }

    /// Set the raw manifest body read from `branch`
    pub fn with_manifest_body(self, branch: impl Into<String>, body: impl Into<String>) -> Self {
        self.state().manifests.insert(branch.into(), body.into());
        self
    }

    /// Register a pull request
    pub fn with_pull_request(self, number: u64, base: &str, head: &str) -> Self {
        self.state().pull_requests.insert(
            number,
            PullRequestBranches {
                base_branch: base.to_string(),
                head_branch: head.to_string(),
            },
        );
        self
    }

    /// Make ref lookups of `branch` fail with `status`
    pub fn with_lookup_failure(self, branch: impl Into<String>, status: u16) -> Self {
        self.state().lookup_failures.insert(branch.into(), status);
        self
    }

    /// Head commit of `branch`, if it exists
    pub fn branch_sha(&self, branch: &str) -> Option<String> {
        self.state().branches.get(branch).cloned()
    }

    /// Every call made so far
    pub fn calls(&self) -> Vec<BackendCall> {
        self.state().calls.clone()
    }

    /// Number of mutating calls made so far
    pub fn mutation_count(&self) -> usize {
        self.state().calls.iter().filter(|c| c.is_mutation()).count()
    }

    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }
}

impl RefStore for MockBackend {
    fn get_ref(&self, branch: &str) -> Result<CommitRef> {
        let mut state = self.state();
        state.calls.push(BackendCall::GetRef(branch.to_string()));

        if let Some(status) = state.lookup_failures.get(branch) {
            return Err(VersionBranchError::backend(
                Some(*status),
                format!("lookup of heads/{} failed", branch),
            ));
        }

        state
            .branches
            .get(branch)
            .map(CommitRef::new)
            .ok_or_else(|| VersionBranchError::not_found(format!("heads/{}", branch)))
    }

    fn get_commit(&self, branch: &str) -> Result<CommitRef> {
        let mut state = self.state();
        state.calls.push(BackendCall::GetCommit(branch.to_string()));

        state
            .branches
            .get(branch)
            .map(CommitRef::new)
            .ok_or_else(|| {
                VersionBranchError::not_found(format!("No commit found for SHA: {}", branch))
            })
    }

    fn create_ref(&self, branch: &str, sha: &str) -> Result<()> {
        let mut state = self.state();
        state.calls.push(BackendCall::CreateRef {
            branch: branch.to_string(),
            sha: sha.to_string(),
        });

        if state.branches.contains_key(branch) {
            return Err(VersionBranchError::backend(
                Some(422),
                "Reference already exists",
            ));
        }

        state.branches.insert(branch.to_string(), sha.to_string());
        Ok(())
    }
}

impl RepositoryReader for MockBackend {
    fn fetch_manifest_version(&self, branch: &str) -> Result<SemanticVersion> {
        let body = {
            let mut state = self.state();
            state.calls.push(BackendCall::FetchManifest(branch.to_string()));
            state.manifests.get(branch).cloned()
        };

        match body {
            Some(body) => parse_manifest_version(&body, branch),
            None => Err(VersionBranchError::not_found(format!(
                "no manifest on branch {}",
                branch
            ))),
        }
    }

    fn fetch_pull_request(&self, number: u64) -> Result<PullRequestBranches> {
        let mut state = self.state();
        state.calls.push(BackendCall::FetchPullRequest(number));

        state
            .pull_requests
            .get(&number)
            .cloned()
            .ok_or_else(|| VersionBranchError::not_found(format!("pull request #{}", number)))
    }
}
