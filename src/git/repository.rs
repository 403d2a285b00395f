use crate::domain::branch::full_ref;
use crate::domain::SemanticVersion;
use crate::error::{Result, VersionBranchError};
use crate::git::{
    parse_manifest_version, CommitRef, PullRequestBranches, RefStore, RepositoryReader,
};
use git2::{ErrorCode, Oid, Repository as Git2Repo};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Backend over the `refs/heads/*` namespace of a repository on disk
///
/// `git2::Repository` is `Send` but not `Sync`, so it is held behind a mutex.
pub struct Git2Backend {
    repo: Mutex<Git2Repo>,
    manifest_path: PathBuf,
}

/// Map a git2 error onto the backend error model
fn backend_error(err: git2::Error, what: &str) -> VersionBranchError {
    match err.code() {
        ErrorCode::NotFound => {
            VersionBranchError::not_found(format!("{}: {}", what, err.message()))
        }
        ErrorCode::Exists => {
            VersionBranchError::backend(Some(422), format!("{}: {}", what, err.message()))
        }
        _ => VersionBranchError::Git(err),
    }
}

impl Git2Backend {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P, manifest_path: impl Into<PathBuf>) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;
        Ok(Self::from_git2(repo, manifest_path))
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo, manifest_path: impl Into<PathBuf>) -> Self {
        Git2Backend {
            repo: Mutex::new(repo),
            manifest_path: manifest_path.into(),
        }
    }

    fn repo(&self) -> MutexGuard<'_, Git2Repo> {
        self.repo.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn head_oid(repo: &Git2Repo, branch: &str) -> Result<Oid> {
        let what = format!("heads/{}", branch);
        let reference = repo
            .find_reference(&full_ref(branch))
            .map_err(|e| backend_error(e, &what))?;
        let commit = reference
            .peel_to_commit()
            .map_err(|e| backend_error(e, &what))?;
        Ok(commit.id())
    }
}

impl RefStore for Git2Backend {
    fn get_ref(&self, branch: &str) -> Result<CommitRef> {
        let repo = self.repo();
        let oid = Self::head_oid(&repo, branch)?;
        Ok(CommitRef::new(oid.to_string()))
    }

    fn get_commit(&self, branch: &str) -> Result<CommitRef> {
        let repo = self.repo();
        let object = repo
            .revparse_single(&full_ref(branch))
            .map_err(|e| backend_error(e, &full_ref(branch)))?;
        let commit = object
            .peel_to_commit()
            .map_err(|e| backend_error(e, &full_ref(branch)))?;
        Ok(CommitRef::new(commit.id().to_string()))
    }

    fn create_ref(&self, branch: &str, sha: &str) -> Result<()> {
        let repo = self.repo();
        let oid = Oid::from_str(sha).map_err(|e| {
            VersionBranchError::backend(None, format!("Invalid sha '{}': {}", sha, e))
        })?;
        let full = full_ref(branch);

        repo.reference(&full, oid, false, &format!("version-branch: create {}", branch))
            .map_err(|e| backend_error(e, &full))?;
        Ok(())
    }
}

impl RepositoryReader for Git2Backend {
    fn fetch_manifest_version(&self, branch: &str) -> Result<SemanticVersion> {
        let repo = self.repo();
        let origin = format!("{}@{}", self.manifest_path.display(), branch);

        let oid = Self::head_oid(&repo, branch)?;
        let tree = repo.find_commit(oid)?.tree()?;
        let entry = tree
            .get_path(&self.manifest_path)
            .map_err(|e| backend_error(e, &origin))?;
        let blob = entry
            .to_object(&repo)?
            .peel_to_blob()
            .map_err(|e| backend_error(e, &origin))?;

        let body = std::str::from_utf8(blob.content()).map_err(|e| {
            VersionBranchError::invalid_input(format!("Manifest {} is not UTF-8: {}", origin, e))
        })?;
        parse_manifest_version(body, &origin)
    }

    fn fetch_pull_request(&self, number: u64) -> Result<PullRequestBranches> {
        Err(VersionBranchError::invalid_input(format!(
            "Pull request #{} cannot be looked up in a local repository; use the github backend",
            number
        )))
    }
}
