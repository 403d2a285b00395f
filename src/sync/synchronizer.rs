use crate::error::{Result, VersionBranchError};
use crate::git::{CommitRef, RefStore};
use tracing::{info, warn};

/// A base branch confirmed to exist in the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseBranch {
    pub name: String,
    pub commit: CommitRef,
}

/// What a synchronization did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    pub base_branch: String,
    pub head_branch: String,
    /// Commit at the head of the base branch; a created branch points here
    pub base_commit: CommitRef,
    pub branch_already_existed: bool,
}

/// Ensures a head branch exists, creating it from the base branch if absent.
///
/// Existing branches are never moved, overwritten or deleted. Branch identity
/// is by name only.
pub struct BranchSynchronizer<'a, S: RefStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: RefStore + ?Sized> BranchSynchronizer<'a, S> {
    pub fn new(store: &'a S) -> Self {
        BranchSynchronizer { store }
    }

    /// Resolve the base branch, failing with `BaseBranchNotFound` when the
    /// backend reports it missing
    pub fn locate_base(&self, base_branch: &str) -> Result<BaseBranch> {
        match self.store.get_ref(base_branch) {
            Ok(commit) => Ok(BaseBranch {
                name: base_branch.to_string(),
                commit,
            }),
            Err(e) if e.is_not_found() => {
                Err(VersionBranchError::BaseBranchNotFound(base_branch.to_string()))
            }
            Err(e) => {
                warn!(
                    error = %e,
                    "unknown error occurred when attempting to get ref: heads/{}",
                    base_branch
                );
                Err(e)
            }
        }
    }

    /// Ensure `head_branch` exists, starting from a located base branch
    pub fn sync_from(&self, base: &BaseBranch, head_branch: &str) -> Result<SyncOutcome> {
        let base_commit = self.store.get_commit(&base.name)?;
        info!(sha = %base_commit.sha, base_branch = %base.name, "base branch head commit");

        let branch_already_existed = match self.store.get_ref(head_branch) {
            Ok(_) => true,
            Err(e) if e.is_not_found() => false,
            Err(e) => {
                warn!(
                    error = %e,
                    "unknown error occurred when attempting to get ref: heads/{}",
                    head_branch
                );
                return Err(e);
            }
        };

        if branch_already_existed {
            info!("branch: {}, already exists.", head_branch);
        } else {
            self.store.create_ref(head_branch, &base_commit.sha)?;
            info!("branch: {}, created.", head_branch);
        }

        Ok(SyncOutcome {
            base_branch: base.name.clone(),
            head_branch: head_branch.to_string(),
            base_commit,
            branch_already_existed,
        })
    }

    /// Ensure `head_branch` exists, pointing at the current head of `base_branch`
    /// if it has to be created
    pub fn sync(&self, base_branch: &str, head_branch: &str) -> Result<SyncOutcome> {
        let base = self.locate_base(base_branch)?;
        self.sync_from(&base, head_branch)
    }
}
