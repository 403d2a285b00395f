//! Results handed to the reporting sink as flat `name=value` outputs.

use crate::domain::{ResolvedVersion, SemanticVersion};
use crate::error::Result;
use std::env;
use std::fs::OpenOptions;
use std::io::{self, Write};

/// Environment variable naming the GitHub Actions output file
pub const OUTPUT_FILE_ENV: &str = "GITHUB_OUTPUT";

/// Result of bump mode
#[derive(Debug, Clone, PartialEq)]
pub struct BranchSyncResult {
    pub base_branch: String,
    pub base_version: SemanticVersion,
    pub head_branch: String,
    pub head_version: ResolvedVersion,
    pub branch_already_existed: bool,
}

/// Result of lookup mode
#[derive(Debug, Clone, PartialEq)]
pub struct LookupResult {
    pub base_branch: String,
    pub base_version: SemanticVersion,
    pub head_branch: String,
    pub head_version: SemanticVersion,
    pub is_prerelease: bool,
}

/// Ordered output mapping
pub type Outputs = Vec<(&'static str, String)>;

fn flag(value: bool) -> String {
    if value { "true" } else { "false" }.to_string()
}

impl BranchSyncResult {
    pub fn outputs(&self) -> Outputs {
        let head = &self.head_version;
        vec![
            ("base-branch", self.base_branch.clone()),
            ("base-version", self.base_version.to_string()),
            ("head-branch", self.head_branch.clone()),
            ("head-version", head.version.to_string()),
            ("is-new-branch", flag(!self.branch_already_existed)),
            ("is-prerelease", flag(head.is_prerelease)),
            ("major", head.version.major().to_string()),
            ("minor", head.version.minor().to_string()),
            ("patch", head.version.patch().to_string()),
            ("pre-id", head.prerelease_id.clone()),
            ("pre-inc", head.prerelease_increment.clone()),
        ]
    }
}

impl LookupResult {
    pub fn outputs(&self) -> Outputs {
        vec![
            ("base-branch", self.base_branch.clone()),
            ("base-version", self.base_version.to_string()),
            ("head-branch", self.head_branch.clone()),
            ("head-version", self.head_version.to_string()),
            ("is-prerelease", flag(self.is_prerelease)),
        ]
    }
}

/// Write outputs as `name=value` lines
pub fn write_outputs_to<W: Write>(outputs: &Outputs, mut writer: W) -> Result<()> {
    for (name, value) in outputs {
        writeln!(writer, "{}={}", name, value)?;
    }
    writer.flush()?;
    Ok(())
}

/// Append outputs to the file named by `GITHUB_OUTPUT`, or print them to
/// stdout when it is unset
pub fn write_outputs(outputs: &Outputs) -> Result<()> {
    match env::var_os(OUTPUT_FILE_ENV).filter(|p| !p.is_empty()) {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            write_outputs_to(outputs, file)
        }
        None => write_outputs_to(outputs, io::stdout().lock()),
    }
}
