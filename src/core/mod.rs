//! Core data structures for debber.
//!
//! This module contains the types every operation is built on:
//! - Package metadata and architecture designators
//! - Binary artifacts (one per resolved architecture)
//! - Build parameters
//! - The error taxonomy

pub mod architecture;
pub mod artifact;
pub mod build_params;
pub mod errors;
pub mod package;

pub use architecture::{resolve_arches, Architecture, ArchitectureParseError};
pub use artifact::{
    get_artifacts, BinaryArtifact, CONTROL_ARCHIVE_NAME, DATA_ARCHIVE_NAME, DEBIAN_BINARY_NAME,
    DEBIAN_BINARY_VERSION,
};
pub use build_params::BuildParams;
pub use errors::{Error, IoResultExt, Result};
pub use package::Package;
