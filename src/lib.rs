pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod report;
pub mod sync;
pub mod ui;

pub use error::{Result, VersionBranchError};
