//! Version resolution: base version + requested level (or explicit override)
//! to the next version.

use crate::domain::prerelease::{self, PrereleaseComponent};
use crate::domain::version::{ReleaseLevel, SemanticVersion};
use crate::error::{Result, VersionBranchError};
use semver::Prerelease;
use std::fmt;
use tracing::{info, warn};

/// Inputs for a single version resolution
#[derive(Debug, Clone, PartialEq)]
pub struct BumpRequest {
    pub base_version: SemanticVersion,
    /// Level as supplied by the caller. Only parsed when no explicit version is set.
    pub mode: String,
    pub prerelease_id: Option<String>,
    pub explicit_version: Option<SemanticVersion>,
}

impl BumpRequest {
    /// Create a request bumping `base_version` by `mode`
    pub fn new(base_version: SemanticVersion, mode: impl Into<String>) -> Self {
        BumpRequest {
            base_version,
            mode: mode.into(),
            prerelease_id: None,
            explicit_version: None,
        }
    }

    /// Set the prerelease identifier; an empty string means none
    pub fn with_prerelease_id(mut self, id: Option<&str>) -> Self {
        self.prerelease_id = id.filter(|s| !s.is_empty()).map(str::to_string);
        self
    }

    /// Set an explicit version that overrides the level
    pub fn with_explicit_version(mut self, version: Option<SemanticVersion>) -> Self {
        self.explicit_version = version;
        self
    }

    /// Parse and set an explicit version; an empty string means none
    pub fn with_explicit_version_str(self, text: Option<&str>) -> Result<Self> {
        let version = text
            .filter(|s| !s.trim().is_empty())
            .map(parse_explicit_version)
            .transpose()?;
        Ok(self.with_explicit_version(version))
    }
}

/// Parse a caller-supplied override version
pub fn parse_explicit_version(text: &str) -> Result<SemanticVersion> {
    SemanticVersion::parse(text).map_err(|_| {
        VersionBranchError::invalid_version(text, "custom version is not valid semver")
    })
}

/// Outcome of a resolution. Never mutated after it is produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedVersion {
    pub version: SemanticVersion,
    pub is_prerelease: bool,
    /// Leading prerelease components joined with `.`, empty when there are none
    pub prerelease_id: String,
    /// Final prerelease component, empty when not a prerelease
    pub prerelease_increment: String,
}

impl ResolvedVersion {
    /// Describe an already computed version
    pub fn from_version(version: SemanticVersion) -> Self {
        let components = prerelease::components(version.prerelease());
        let (prerelease_id, prerelease_increment) = prerelease::split_identifier(&components);

        ResolvedVersion {
            is_prerelease: !components.is_empty(),
            version,
            prerelease_id,
            prerelease_increment,
        }
    }
}

/// Concrete increment applied to the base version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseType {
    Major,
    Minor,
    Patch,
    PreMajor,
    PreMinor,
    PrePatch,
    Prerelease,
}

impl ReleaseType {
    /// Map a requested level to a release type; a prerelease identifier turns
    /// major/minor/patch into their "pre" variants
    pub fn for_level(level: ReleaseLevel, has_prerelease_id: bool) -> Self {
        match (level, has_prerelease_id) {
            (ReleaseLevel::Prerelease, _) => ReleaseType::Prerelease,
            (ReleaseLevel::Major, true) => ReleaseType::PreMajor,
            (ReleaseLevel::Major, false) => ReleaseType::Major,
            (ReleaseLevel::Minor, true) => ReleaseType::PreMinor,
            (ReleaseLevel::Minor, false) => ReleaseType::Minor,
            (ReleaseLevel::Patch, true) => ReleaseType::PrePatch,
            (ReleaseLevel::Patch, false) => ReleaseType::Patch,
        }
    }

    /// Apply this increment to `base`
    pub fn apply(
        self,
        base: &SemanticVersion,
        identifier: Option<&str>,
    ) -> Result<SemanticVersion> {
        let (major, minor, patch) = (base.major(), base.minor(), base.patch());

        let bumped = match self {
            ReleaseType::Major | ReleaseType::PreMajor => (checked_inc(major, "major")?, 0, 0),
            ReleaseType::Minor | ReleaseType::PreMinor => {
                (major, checked_inc(minor, "minor")?, 0)
            }
            ReleaseType::Patch | ReleaseType::PrePatch => {
                (major, minor, checked_inc(patch, "patch")?)
            }
            ReleaseType::Prerelease => {
                if base.is_prerelease() {
                    (major, minor, patch)
                } else {
                    (major, minor, checked_inc(patch, "patch")?)
                }
            }
        };

        let pre = match self {
            ReleaseType::Major | ReleaseType::Minor | ReleaseType::Patch => Prerelease::EMPTY,
            ReleaseType::PreMajor | ReleaseType::PreMinor | ReleaseType::PrePatch => {
                prerelease::to_prerelease(&prerelease::increment(&[], identifier)?)?
            }
            ReleaseType::Prerelease => {
                let current: Vec<PrereleaseComponent> =
                    prerelease::components(base.prerelease());
                prerelease::to_prerelease(&prerelease::increment(&current, identifier)?)?
            }
        };

        Ok(SemanticVersion::with_prerelease(bumped.0, bumped.1, bumped.2, pre))
    }
}

fn checked_inc(value: u64, field: &str) -> Result<u64> {
    value.checked_add(1).ok_or_else(|| {
        VersionBranchError::invalid_input(format!(
            "{} version {} cannot be incremented",
            field, value
        ))
    })
}

impl fmt::Display for ReleaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReleaseType::Major => "major",
            ReleaseType::Minor => "minor",
            ReleaseType::Patch => "patch",
            ReleaseType::PreMajor => "premajor",
            ReleaseType::PreMinor => "preminor",
            ReleaseType::PrePatch => "prepatch",
            ReleaseType::Prerelease => "prerelease",
        };
        f.write_str(name)
    }
}

/// Compute the resulting version for a bump request.
///
/// An explicit version wins over the level without any arithmetic, even when
/// the level is not recognized. Otherwise the level must be one of
/// major/minor/patch/prerelease.
pub fn resolve(request: &BumpRequest) -> Result<ResolvedVersion> {
    if let Some(explicit) = &request.explicit_version {
        warn!(
            custom_version = %explicit,
            version_level = %request.mode,
            "custom version overrides version-level"
        );
        return Ok(ResolvedVersion::from_version(explicit.clone()));
    }

    let level: ReleaseLevel = request.mode.parse()?;
    let release_type = ReleaseType::for_level(level, request.prerelease_id.is_some());
    info!(%release_type, "release type");

    let version = release_type.apply(&request.base_version, request.prerelease_id.as_deref())?;
    info!(base_version = %request.base_version, new_version = %version, "new version");

    Ok(ResolvedVersion::from_version(version))
}
