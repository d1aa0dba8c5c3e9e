//! High-level operations.
//!
//! This module contains the implementation of debber commands.

pub mod changelog;
pub mod deb_build;
pub mod inspect;

pub use changelog::{
    changelog_path, write_changelog, write_changelog_at, ChangelogResult, ChangelogUpdate,
};
pub use deb_build::{build_deb, BuiltArtifact, DebOptions};
pub use inspect::{extract, inspect, read_control, PackageReport};
