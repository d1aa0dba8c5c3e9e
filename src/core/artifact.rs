//! Binary artifacts - one `.deb` per package and resolved architecture.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::core::architecture::Architecture;
use crate::core::errors::Result;
use crate::core::package::Package;

/// Content of the `debian-binary` member.
pub const DEBIAN_BINARY_VERSION: &str = "2.0";

/// Member name of the version marker.
pub const DEBIAN_BINARY_NAME: &str = "debian-binary";

/// Member and scratch file name of the control archive.
pub const CONTROL_ARCHIVE_NAME: &str = "control.tar.gz";

/// Member and scratch file name of the data archive.
pub const DATA_ARCHIVE_NAME: &str = "data.tar.gz";

/// Architecture-specific build information.
///
/// Borrows its [`Package`]; an artifact lives for one build invocation.
#[derive(Debug, Clone)]
pub struct BinaryArtifact<'a> {
    /// The package being built
    pub package: &'a Package,

    /// Resolved architecture
    pub architecture: Architecture,

    /// Content of the `debian-binary` member (without the newline)
    pub debian_binary_version: String,

    /// File name of the control archive in the temp directory
    pub control_archive: String,

    /// File name of the data archive in the temp directory
    pub data_archive: String,

    /// Staged files: source path -> in-archive path
    pub mapped_files: BTreeMap<PathBuf, String>,
}

impl<'a> BinaryArtifact<'a> {
    /// Create an artifact with default member names.
    pub fn new(package: &'a Package, architecture: Architecture) -> Self {
        BinaryArtifact {
            package,
            architecture,
            debian_binary_version: DEBIAN_BINARY_VERSION.to_string(),
            control_archive: CONTROL_ARCHIVE_NAME.to_string(),
            data_archive: DATA_ARCHIVE_NAME.to_string(),
            mapped_files: BTreeMap::new(),
        }
    }

    /// Add a staged file.
    pub fn with_file(mut self, source: impl Into<PathBuf>, archive_path: impl Into<String>) -> Self {
        self.mapped_files.insert(source.into(), archive_path.into());
        self
    }

    /// Output file name, e.g. `foo_1.0_amd64.deb`.
    pub fn filename(&self) -> String {
        self.package.filename_for(self.architecture)
    }
}

/// Create one artifact per resolved architecture, in resolution order.
///
/// Fails without producing anything if the designator can't be parsed.
pub fn get_artifacts(package: &Package) -> Result<Vec<BinaryArtifact<'_>>> {
    let arches = package.get_arches()?;
    Ok(arches
        .into_iter()
        .map(|arch| BinaryArtifact::new(package, arch))
        .collect())
}
