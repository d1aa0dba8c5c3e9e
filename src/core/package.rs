//! Package - the metadata every build and changelog entry is derived from.

use crate::core::architecture::{resolve_arches, Architecture};
use crate::core::errors::{Error, Result};

/// File extension of binary packages.
pub const DEB_EXTENSION: &str = "deb";

/// Description of a Debian package.
///
/// Fields are public so callers can adjust the model before a build; derived
/// values such as [`Package::filename`] are computed on every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    /// Package name
    pub name: String,

    /// Package version (not validated against Debian version rules)
    pub version: String,

    /// Maintainer, e.g. `Jane Doe <jane@example.com>`
    pub maintainer: String,

    /// Multi-line description; the first line is the synopsis
    pub description: String,

    /// Architecture designator: a concrete arch, `all`, `any`, or a comma list
    pub architecture: String,

    /// Distribution written into changelog headers
    pub status: String,

    /// Archive section
    pub section: String,

    /// Priority
    pub priority: String,

    /// `Depends` field of the control file
    pub depends: Option<String>,
}

impl Package {
    /// Create a package with default designator `any`.
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        maintainer: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Package {
            name: name.into(),
            version: version.into(),
            maintainer: maintainer.into(),
            description: description.into(),
            architecture: Architecture::Any.as_str().to_string(),
            status: "unstable".to_string(),
            section: "devel".to_string(),
            priority: "extra".to_string(),
            depends: None,
        }
    }

    /// Set the architecture designator.
    pub fn with_architecture(mut self, designator: impl Into<String>) -> Self {
        self.architecture = designator.into();
        self
    }

    /// Set the `Depends` field.
    pub fn with_depends(mut self, depends: impl Into<String>) -> Self {
        self.depends = Some(depends.into());
        self
    }

    /// Check the fields every build needs.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::config("package name must not be empty"));
        }
        if self.version.trim().is_empty() {
            return Err(Error::config(format!(
                "package `{}` has an empty version",
                self.name
            )));
        }
        Ok(())
    }

    /// Resolve the designator into concrete architectures.
    pub fn get_arches(&self) -> Result<Vec<Architecture>> {
        Ok(resolve_arches(&self.architecture)?)
    }

    /// Canonical file name for the current designator,
    /// `{name}_{version}_{architecture}.deb`.
    pub fn filename(&self) -> String {
        self.filename_with(&self.architecture, DEB_EXTENSION)
    }

    /// Canonical file name for one resolved architecture.
    pub fn filename_for(&self, arch: Architecture) -> String {
        self.filename_with(arch.as_str(), DEB_EXTENSION)
    }

    fn filename_with(&self, architecture: &str, ext: &str) -> String {
        format!("{}_{}_{}.{}", self.name, self.version, architecture, ext)
    }
}

impl std::fmt::Display for Package {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.name, self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn testpkg() -> Package {
        Package::new("testpkg", "0.0.2", "me", "Dummy package for doing nothing\n")
    }

    #[test]
    fn test_new_defaults() {
        let pkg = testpkg();
        assert_eq!(pkg.architecture, "any");
        assert_eq!(pkg.status, "unstable");
        assert!(pkg.depends.is_none());
    }

    #[test]
    fn test_with_depends() {
        let pkg = testpkg().with_depends("libc6 (>= 2.31)");
        assert_eq!(pkg.depends.as_deref(), Some("libc6 (>= 2.31)"));
        assert_eq!(pkg.filename(), "testpkg_0.0.2_any.deb");
    }

    #[test]
    fn test_filename_tracks_field_changes() {
        let mut pkg = testpkg().with_architecture("amd64");
        assert_eq!(pkg.filename(), "testpkg_0.0.2_amd64.deb");

        pkg.version = "0.0.3".to_string();
        pkg.architecture = "all".to_string();
        assert_eq!(pkg.filename(), "testpkg_0.0.3_all.deb");
        assert_eq!(pkg.filename_for(Architecture::Armhf), "testpkg_0.0.3_armhf.deb");
    }

    #[test]
    fn test_get_arches() {
        let pkg = testpkg().with_architecture("all");
        assert_eq!(pkg.get_arches().unwrap(), vec![Architecture::All]);

        let pkg = testpkg().with_architecture("sparc9000");
        assert!(pkg.get_arches().unwrap_err().is_config());
    }

    #[test]
    fn test_validate() {
        assert!(testpkg().validate().is_ok());

        let mut pkg = testpkg();
        pkg.name = String::new();
        assert!(pkg.validate().unwrap_err().is_config());

        let mut pkg = testpkg();
        pkg.version = " ".to_string();
        assert!(pkg.validate().unwrap_err().is_config());
    }
}
