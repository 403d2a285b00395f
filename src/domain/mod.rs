//! Domain logic - pure versioning and naming rules independent of any backend

pub mod branch;
pub mod bump;
pub mod prerelease;
pub mod version;

pub use branch::{branch_name, BranchNamer};
pub use bump::{resolve, BumpRequest, ReleaseType, ResolvedVersion};
pub use prerelease::PrereleaseComponent;
pub use version::{ReleaseLevel, SemanticVersion};
