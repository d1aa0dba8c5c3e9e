//! debber - build Debian binary packages without dpkg tooling
//!
//! This crate provides the core library functionality for debber:
//! the package and architecture model, the inner and outer archive codecs,
//! `.deb` assembly, and `debian/changelog` maintenance.

pub mod archive;
pub mod core;
pub mod ops;
pub mod templates;
pub mod util;

pub use crate::core::{
    architecture::Architecture, artifact::BinaryArtifact, build_params::BuildParams,
    errors::Error, errors::Result, package::Package,
};
