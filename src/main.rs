use anyhow::{anyhow, Result};
use clap::Parser;
use std::env;
use std::path::PathBuf;

use version_branch::cli::orchestration::{parse_pr_number, run_workflow, WorkflowInputs};
use version_branch::config;
use version_branch::git::{Git2Backend, GitHubBackend, RepoSlug};
use version_branch::report;
use version_branch::ui;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum BackendKind {
    /// GitHub REST API
    Github,
    /// Repository on disk
    Local,
}

// Inputs also come from the GitHub Actions environment (INPUT_<NAME>).
#[derive(clap::Parser)]
#[command(
    name = "version-branch",
    version,
    about = "Compute the next semantic version and create a branch named after it"
)]
struct Args {
    #[arg(
        long,
        env = "INPUT_BASE-BRANCH",
        default_value = "",
        help = "Branch whose manifest version is bumped",
    )]
    base_branch: String,

    #[arg(
        long,
        env = "INPUT_VERSION-LEVEL",
        default_value = "",
        help = "major, minor, patch or prerelease",
    )]
    version_level: String,

    #[arg(long, env = "INPUT_NAME-PREFIX", help = "Prefix of the new branch name")]
    name_prefix: Option<String>,

    #[arg(
        long,
        env = "INPUT_PRE-ID",
        default_value = "",
        help = "Prerelease identifier (e.g. beta)",
    )]
    pre_id: String,

    #[arg(
        long,
        env = "INPUT_CUSTOM-VERSION",
        default_value = "",
        help = "Explicit version overriding the level",
    )]
    custom_version: String,

    #[arg(
        long,
        env = "INPUT_PR-NUMBER",
        default_value = "",
        help = "Pull request to read versions from instead of bumping",
    )]
    pr_number: String,

    #[arg(
        long,
        env = "INPUT_GITHUB-TOKEN",
        hide_env_values = true,
        help = "GitHub token (falls back to GITHUB_TOKEN)",
    )]
    github_token: Option<String>,

    #[arg(long, env = "GITHUB_REPOSITORY", help = "Repository as owner/repo")]
    repository: Option<String>,

    #[arg(
        long,
        value_enum,
        default_value_t = BackendKind::Github,
        help = "Backend holding the branches",
    )]
    backend: BackendKind,

    #[arg(long, default_value = ".", help = "Repository path for the local backend")]
    repo_path: PathBuf,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,
}

fn main() {
    ui::init_logging();
    let args = Args::parse();

    if let Err(e) = run(args) {
        tracing::error!(error = ?e, "version-branch failed");
        ui::display_error(&e.to_string());
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = config::load_config(args.config.as_deref())?;

    let inputs = WorkflowInputs {
        base_branch: args.base_branch,
        version_level: args.version_level,
        name_prefix: args
            .name_prefix
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| config.name_prefix.clone()),
        pre_id: args.pre_id,
        custom_version: args.custom_version,
        pr_number: args.pr_number,
    };

    let status = match parse_pr_number(&inputs.pr_number) {
        Some(number) => format!("Reading versions of pull request #{}", number),
        None => format!("Syncing branch from {}", inputs.base_branch.trim()),
    };
    ui::display_status(&status);

    let outputs = match args.backend {
        BackendKind::Github => {
            let repository = args
                .repository
                .filter(|r| !r.is_empty())
                .ok_or_else(|| anyhow!("Must provide --repository or set GITHUB_REPOSITORY"))?;
            let repo = RepoSlug::parse(&repository)?;
            let token = args
                .github_token
                .filter(|t| !t.is_empty())
                .or_else(|| env::var("GITHUB_TOKEN").ok());

            let backend = GitHubBackend::new(&config, repo, token.as_deref())?;
            run_workflow(&inputs, &backend, &backend)?
        }
        BackendKind::Local => {
            let backend = Git2Backend::open(&args.repo_path, config.manifest_path.as_str())?;
            run_workflow(&inputs, &backend, &backend)?
        }
    };

    report::write_outputs(&outputs)?;
    ui::display_success("Outputs reported");
    Ok(())
}
