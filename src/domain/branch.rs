use crate::domain::version::SemanticVersion;

/// Derives branch names from versions using a fixed prefix
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BranchNamer {
    pub prefix: String,
}

impl BranchNamer {
    /// Create a namer; the prefix is used verbatim, including the empty string
    pub fn new(prefix: impl Into<String>) -> Self {
        BranchNamer {
            prefix: prefix.into(),
        }
    }

    /// Name of the branch for `version` (e.g., "release-1.2.3-beta.4")
    pub fn name(&self, version: &SemanticVersion) -> String {
        branch_name(&self.prefix, version)
    }
}

/// Concatenate `prefix` and the canonical rendering of `version`
pub fn branch_name(prefix: &str, version: &SemanticVersion) -> String {
    format!("{}{}", prefix, version)
}

/// Ref path used for lookups, which must omit the leading `refs/`
pub fn lookup_ref(branch: &str) -> String {
    format!("heads/{}", branch)
}

/// Full ref path used when creating references
pub fn full_ref(branch: &str) -> String {
    format!("refs/heads/{}", branch)
}
