//! Main workflow orchestration logic
//!
//! Provides the two mutually exclusive top-level operations: bump mode, which
//! derives a new version and ensures its branch exists, and lookup mode,
//! which reports the versions on both sides of an existing pull request.
//! Both are independent of clap so they can be driven programmatically.

use tracing::info;

use crate::domain::bump::parse_explicit_version;
use crate::domain::{resolve, BranchNamer, BumpRequest, ReleaseLevel};
use crate::error::{Result, VersionBranchError};
use crate::git::{RefStore, RepositoryReader};
use crate::report::{BranchSyncResult, LookupResult, Outputs};
use crate::sync::BranchSynchronizer;

/// Raw caller inputs. Empty strings count as absent.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WorkflowInputs {
    pub base_branch: String,
    pub version_level: String,
    pub name_prefix: String,
    pub pre_id: String,
    pub custom_version: String,
    pub pr_number: String,
}

/// Arguments for bump mode
#[derive(Debug, Clone, PartialEq)]
pub struct BumpWorkflowArgs {
    pub base_branch: String,
    pub version_level: String,
    pub name_prefix: String,
    pub pre_id: Option<String>,
    pub custom_version: Option<String>,
}

/// Which operation a run performs
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowMode {
    Bump(BumpWorkflowArgs),
    Lookup { pr_number: u64 },
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Parse a pull-request number; empty, non-numeric and zero select bump mode
pub fn parse_pr_number(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok().filter(|n| *n > 0)
}

impl WorkflowInputs {
    /// Select the operation: lookup when a pull-request number is supplied,
    /// bump otherwise
    pub fn mode(&self) -> WorkflowMode {
        match parse_pr_number(&self.pr_number) {
            Some(pr_number) => {
                info!("pull request number: {}, found.", pr_number);
                WorkflowMode::Lookup { pr_number }
            }
            None => {
                info!("pull request number not provided.");
                WorkflowMode::Bump(BumpWorkflowArgs {
                    base_branch: self.base_branch.trim().to_string(),
                    version_level: self.version_level.trim().to_string(),
                    name_prefix: self.name_prefix.clone(),
                    pre_id: non_empty(&self.pre_id),
                    custom_version: non_empty(&self.custom_version),
                })
            }
        }
    }
}

/// Bump mode
///
/// 1. Validate inputs (base branch, level or custom version)
/// 2. Confirm the base branch exists
/// 3. Read the base branch's manifest version
/// 4. Resolve the new version and derive the head branch name
/// 5. Create the head branch from the base branch's head commit unless it exists
pub fn run_bump_workflow<R, M>(
    args: &BumpWorkflowArgs,
    refs: &R,
    reader: &M,
) -> Result<BranchSyncResult>
where
    R: RefStore + ?Sized,
    M: RepositoryReader + ?Sized,
{
    info!(
        base_branch = %args.base_branch,
        version_level = %args.version_level,
        name_prefix = %args.name_prefix,
        pre_id = args.pre_id.as_deref().unwrap_or(""),
        custom_version = args.custom_version.as_deref().unwrap_or(""),
        "inputs"
    );

    if args.base_branch.is_empty() {
        return Err(VersionBranchError::invalid_input("Must provide base branch."));
    }
    if args.custom_version.is_none() {
        args.version_level.parse::<ReleaseLevel>()?;
    }

    let explicit_version = args
        .custom_version
        .as_deref()
        .map(parse_explicit_version)
        .transpose()?;

    let synchronizer = BranchSynchronizer::new(refs);
    let base = synchronizer.locate_base(&args.base_branch)?;

    let base_version = reader.fetch_manifest_version(&args.base_branch)?;
    let request = BumpRequest::new(base_version.clone(), args.version_level.as_str())
        .with_prerelease_id(args.pre_id.as_deref())
        .with_explicit_version(explicit_version);

    let head_version = resolve(&request)?;
    let head_branch = BranchNamer::new(args.name_prefix.as_str()).name(&head_version.version);
    info!("Creating a reference: heads/{}", head_branch);

    let outcome = synchronizer.sync_from(&base, &head_branch)?;

    Ok(BranchSyncResult {
        base_branch: outcome.base_branch,
        base_version,
        head_branch: outcome.head_branch,
        head_version,
        branch_already_existed: outcome.branch_already_existed,
    })
}

/// Lookup mode: read both sides of a pull request without any mutation
pub fn run_lookup_workflow<M>(pr_number: u64, reader: &M) -> Result<LookupResult>
where
    M: RepositoryReader + ?Sized,
{
    let pull = reader.fetch_pull_request(pr_number)?;
    info!(
        base_branch = %pull.base_branch,
        head_branch = %pull.head_branch,
        "pull request branches"
    );

    let base_version = reader.fetch_manifest_version(&pull.base_branch)?;
    let head_version = reader.fetch_manifest_version(&pull.head_branch)?;
    let is_prerelease = head_version.is_prerelease();

    Ok(LookupResult {
        base_branch: pull.base_branch,
        base_version,
        head_branch: pull.head_branch,
        head_version,
        is_prerelease,
    })
}

/// Run whichever operation `inputs` select and return its outputs
pub fn run_workflow<R, M>(inputs: &WorkflowInputs, refs: &R, reader: &M) -> Result<Outputs>
where
    R: RefStore + ?Sized,
    M: RepositoryReader + ?Sized,
{
    match inputs.mode() {
        WorkflowMode::Bump(args) => Ok(run_bump_workflow(&args, refs, reader)?.outputs()),
        WorkflowMode::Lookup { pr_number } => Ok(run_lookup_workflow(pr_number, reader)?.outputs()),
    }
}
