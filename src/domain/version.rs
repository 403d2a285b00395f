use crate::error::{Result, VersionBranchError};
use semver::{BuildMetadata, Prerelease, Version};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Semantic version as read from a manifest or supplied by the caller.
///
/// Equality and ordering follow semver precedence: build metadata is carried
/// and rendered but never compared.
#[derive(Debug, Clone)]
pub struct SemanticVersion(Version);

impl SemanticVersion {
    /// Create a release version with no prerelease or build metadata
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        SemanticVersion(Version::new(major, minor, patch))
    }

    pub(crate) fn with_prerelease(major: u64, minor: u64, patch: u64, pre: Prerelease) -> Self {
        SemanticVersion(Version {
            major,
            minor,
            patch,
            pre,
            build: BuildMetadata::EMPTY,
        })
    }

    /// Parse a version string (e.g., "1.2.3", "v2.0.0-beta.3", "1.0.0+build.5")
    ///
    /// Surrounding whitespace and a single leading `v`/`V` are accepted, the
    /// rest must be strict semver.
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        let clean = trimmed.strip_prefix(['v', 'V']).unwrap_or(trimmed);

        Version::parse(clean)
            .map(SemanticVersion)
            .map_err(|e| VersionBranchError::invalid_version(text, e.to_string()))
    }

    pub fn major(&self) -> u64 {
        self.0.major
    }

    pub fn minor(&self) -> u64 {
        self.0.minor
    }

    pub fn patch(&self) -> u64 {
        self.0.patch
    }

    pub fn prerelease(&self) -> &Prerelease {
        &self.0.pre
    }

    /// True when the prerelease component sequence is non-empty
    pub fn is_prerelease(&self) -> bool {
        !self.0.pre.is_empty()
    }
}

impl From<Version> for SemanticVersion {
    fn from(version: Version) -> Self {
        SemanticVersion(version)
    }
}

impl FromStr for SemanticVersion {
    type Err = VersionBranchError;

    fn from_str(s: &str) -> Result<Self> {
        SemanticVersion::parse(s)
    }
}

impl PartialEq for SemanticVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SemanticVersion {}

impl PartialOrd for SemanticVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SemanticVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.0.major, self.0.minor, self.0.patch)
            .cmp(&(other.0.major, other.0.minor, other.0.patch))
            .then_with(|| self.0.pre.cmp(&other.0.pre))
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Version level requested by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseLevel {
    Major,
    Minor,
    Patch,
    Prerelease,
}

impl ReleaseLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReleaseLevel::Major => "major",
            ReleaseLevel::Minor => "minor",
            ReleaseLevel::Patch => "patch",
            ReleaseLevel::Prerelease => "prerelease",
        }
    }
}

impl FromStr for ReleaseLevel {
    type Err = VersionBranchError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "major" => Ok(ReleaseLevel::Major),
            "minor" => Ok(ReleaseLevel::Minor),
            "patch" => Ok(ReleaseLevel::Patch),
            "prerelease" => Ok(ReleaseLevel::Prerelease),
            other => Err(VersionBranchError::InvalidMode(other.to_string())),
        }
    }
}

impl fmt::Display for ReleaseLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_parse() {
        let v = SemanticVersion::parse("1.2.3").unwrap();
        assert_eq!(v.major(), 1);
        assert_eq!(v.minor(), 2);
        assert_eq!(v.patch(), 3);
        assert!(!v.is_prerelease());
    }

    #[test]
    fn test_version_parse_with_v_prefix() {
        assert_eq!(SemanticVersion::parse("v1.2.3").unwrap(), SemanticVersion::new(1, 2, 3));
        assert_eq!(SemanticVersion::parse("V1.2.3").unwrap(), SemanticVersion::new(1, 2, 3));
        assert_eq!(SemanticVersion::parse(" 1.2.3 ").unwrap(), SemanticVersion::new(1, 2, 3));
    }

    #[test]
    fn test_version_parse_prerelease() {
        let v = SemanticVersion::parse("2.0.0-beta.3").unwrap();
        assert!(v.is_prerelease());
        assert_eq!(v.prerelease().as_str(), "beta.3");
        assert_eq!(v.to_string(), "2.0.0-beta.3");
    }

    #[test]
    fn test_version_parse_invalid() {
        for text in ["1.2", "1.2.3.4", "", "latest", "01.2.3", "1.2.3-", "vv1.2.3"] {
            let err = SemanticVersion::parse(text).unwrap_err();
            assert!(err.is_invalid_input(), "{text:?} should be rejected");
        }
    }

    #[test]
    fn test_prerelease_sorts_lower_than_release() {
        let pre = SemanticVersion::parse("1.0.0-alpha").unwrap();
        let release = SemanticVersion::new(1, 0, 0);
        assert!(pre < release);
    }

    #[test]
    fn test_prerelease_precedence_chain() {
        let chain = [
            "1.0.0-alpha",
            "1.0.0-alpha.1",
            "1.0.0-alpha.beta",
            "1.0.0-beta",
            "1.0.0-beta.2",
            "1.0.0-beta.11",
            "1.0.0-rc.1",
            "1.0.0",
        ];
        let parsed: Vec<SemanticVersion> = chain
            .iter()
            .map(|s| SemanticVersion::parse(s).unwrap())
            .collect();

        for pair in parsed.windows(2) {
            assert!(pair[0] < pair[1], "{} should sort before {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_build_metadata_ignored_for_comparison() {
        let a = SemanticVersion::parse("1.0.0+build.1").unwrap();
        let b = SemanticVersion::parse("1.0.0+build.2").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "1.0.0+build.1");
    }

    #[test]
    fn test_release_level_parse() {
        assert_eq!("major".parse::<ReleaseLevel>().unwrap(), ReleaseLevel::Major);
        assert_eq!("minor".parse::<ReleaseLevel>().unwrap(), ReleaseLevel::Minor);
        assert_eq!("patch".parse::<ReleaseLevel>().unwrap(), ReleaseLevel::Patch);
        assert_eq!(
            "prerelease".parse::<ReleaseLevel>().unwrap(),
            ReleaseLevel::Prerelease
        );
    }

    #[test]
    fn test_release_level_parse_invalid() {
        for text in ["", "Major", "premajor", "build"] {
            let err = text.parse::<ReleaseLevel>().unwrap_err();
            assert!(matches!(err, VersionBranchError::InvalidMode(_)));
        }
    }

    #[test]
    fn test_release_level_display() {
        assert_eq!(ReleaseLevel::Prerelease.to_string(), "prerelease");
    }
}
