//! Implementation of `debber contents`.

use std::io::Read;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;

use crate::archive::{self, MemberInfo};
use crate::core::{IoResultExt, Result, CONTROL_ARCHIVE_NAME, DATA_ARCHIVE_NAME, DEBIAN_BINARY_NAME};

/// Member names of a well-formed package, in order.
pub const EXPECTED_MEMBERS: [&str; 3] = [DEBIAN_BINARY_NAME, CONTROL_ARCHIVE_NAME, DATA_ARCHIVE_NAME];

/// Summary of an existing package file.
#[derive(Debug, Clone)]
pub struct PackageReport {
    /// Members in archive order
    pub members: Vec<MemberInfo>,
    /// Whether the members are exactly the expected three, in order
    pub well_formed: bool,
    /// Text of the `control` file, if the control archive has one
    pub control: Option<String>,
}

/// Describe the package at `path`.
pub fn inspect(path: &Path) -> Result<PackageReport> {
    let members = archive::members(path)?;
    let well_formed = members.len() == EXPECTED_MEMBERS.len()
        && members
            .iter()
            .zip(EXPECTED_MEMBERS)
            .all(|(m, expected)| m.name == expected);

    let control = if well_formed { read_control(path)? } else { None };

    Ok(PackageReport {
        members,
        well_formed,
        control,
    })
}

/// Extract every member of the package into `out_dir`.
pub fn extract(path: &Path, out_dir: &Path) -> Result<Vec<PathBuf>> {
    let files = archive::extract_all(path, out_dir)?;
    tracing::info!("Extracted {} members into {}", files.len(), out_dir.display());
    Ok(files)
}

/// Read the `control` file out of the package's control archive.
pub fn read_control(path: &Path) -> Result<Option<String>> {
    let Some(bytes) = archive::read_member(path, CONTROL_ARCHIVE_NAME)? else {
        return Ok(None);
    };

    let mut tar = tar::Archive::new(GzDecoder::new(bytes.as_slice()));
    for entry in tar.entries().with_path("reading control archive", path)? {
        let mut entry = entry.with_path("reading control archive", path)?;
        let name = entry
            .path()
            .with_path("reading control archive", path)?
            .to_string_lossy()
            .trim_start_matches("./")
            .to_string();

        if name == "control" {
            let mut text = String::new();
            entry
                .read_to_string(&mut text)
                .with_path("reading control file", path)?;
            return Ok(Some(text));
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BinaryArtifact, BuildParams, Package};
    use crate::ops::deb_build::build_control_archive;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_inspect_assembled_package() {
        let tmp = TempDir::new().unwrap();
        let build = BuildParams::rooted_at(tmp.path());
        build.init().unwrap();

        let pkg = Package::new("hello", "1.0", "me", "Says hello").with_architecture("arm64");
        let artifact = BinaryArtifact::new(&pkg, crate::core::Architecture::Arm64);
        build_control_archive(&artifact, &build).unwrap();
        fs::write(build.tmp_dir.join(DATA_ARCHIVE_NAME), b"").unwrap();
        let path = archive::assemble(&artifact, &build).unwrap();

        let report = inspect(&path).unwrap();
        assert!(report.well_formed);
        assert_eq!(report.members.len(), 3);
        assert!(report.control.unwrap().contains("Architecture: arm64\n"));
    }

    #[test]
    fn test_inspect_foreign_archive() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("other.a");
        {
            let file = fs::File::create(&path).unwrap();
            let mut builder = ar::Builder::new(file);
            archive::deb::write_bytes(&mut builder, "data.tar.gz", b"x").unwrap();
        }

        let report = inspect(&path).unwrap();
        assert!(!report.well_formed);
        assert!(report.control.is_none());
    }

    #[test]
    fn test_extract() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("pkg.deb");
        {
            let file = fs::File::create(&path).unwrap();
            let mut builder = ar::Builder::new(file);
            archive::deb::write_bytes(&mut builder, "debian-binary", b"2.0\n").unwrap();
        }

        let out = tmp.path().join("out");
        let files = extract(&path, &out).unwrap();
        assert_eq!(files, vec![out.join("debian-binary")]);
        assert_eq!(fs::read(out.join("debian-binary")).unwrap(), b"2.0\n");
    }
}
