//! Implementation of `debber deb`.
//!
//! For each resolved architecture, in order: build `control.tar.gz` and
//! `data.tar.gz` in the temp directory, assemble the `.deb` in the
//! destination directory, then optionally remove the intermediate archives.
//! Architectures are built one at a time because the intermediate names are
//! shared. The first error aborts the whole build.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use crate::archive::{self, targz, GeneratedFile};
use crate::core::{
    get_artifacts, Architecture, BinaryArtifact, BuildParams, IoResultExt, Package, Result,
};
use crate::templates::{self, TemplateData};

/// Maintainer scripts picked up from `debian/` when present.
pub const MAINTAINER_SCRIPTS: &[&str] = &["preinst", "postinst", "prerm", "postrm"];

/// Other control-archive files picked up from `debian/` when present.
pub const CONTROL_EXTRAS: &[&str] = &["conffiles"];

/// Options for building binary packages.
#[derive(Debug, Clone, Default)]
pub struct DebOptions {
    /// Files to install: source path -> in-archive path
    pub mapped_files: BTreeMap<PathBuf, String>,
}

impl DebOptions {
    /// Add a staged file.
    pub fn with_file(mut self, source: impl Into<PathBuf>, archive_path: impl Into<String>) -> Self {
        self.mapped_files.insert(source.into(), archive_path.into());
        self
    }
}

/// A package written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltArtifact {
    /// Architecture the package was built for
    pub architecture: Architecture,
    /// Path of the `.deb`
    pub path: PathBuf,
    /// Size in bytes
    pub size: u64,
}

/// Build one `.deb` per resolved architecture.
///
/// The package and its designator are checked before anything touches the
/// filesystem.
pub fn build_deb(pkg: &Package, build: &BuildParams, opts: &DebOptions) -> Result<Vec<BuiltArtifact>> {
    pkg.validate()?;
    let mut artifacts = get_artifacts(pkg)?;
    for artifact in &mut artifacts {
        artifact.mapped_files.extend(opts.mapped_files.clone());
    }

    build.init()?;

    let arch_names: Vec<&str> = artifacts.iter().map(|a| a.architecture.as_str()).collect();
    tracing::info!("Building {} for {}", pkg, arch_names.join(", "));

    let mut built = Vec::with_capacity(artifacts.len());
    for artifact in &artifacts {
        build_control_archive(artifact, build)?;
        build_data_archive(artifact, build)?;

        let path = archive::assemble(artifact, build)?;
        let size = fs::metadata(&path)
            .with_path("reading package metadata", &path)?
            .len();

        if build.rm_temp {
            remove_temp(artifact, build);
        }

        built.push(BuiltArtifact {
            architecture: artifact.architecture,
            path,
            size,
        });
    }

    Ok(built)
}

/// Build the control archive for `artifact` in the temp directory.
///
/// Holds the generated `control` file plus any maintainer scripts and
/// `conffiles` found in `debian/`.
pub fn build_control_archive(artifact: &BinaryArtifact<'_>, build: &BuildParams) -> Result<PathBuf> {
    let data = TemplateData::new(artifact.package).with_architecture(artifact.architecture);
    let control = templates::render("control", templates::CONTROL, &data)?;

    let mut generated = vec![GeneratedFile::new("control", control)];

    let debian_dir = build.debian_dir();
    for (names, mode) in [(MAINTAINER_SCRIPTS, 0o755), (CONTROL_EXTRAS, 0o644)] {
        for name in names {
            let path = debian_dir.join(name);
            if !path.is_file() {
                continue;
            }
            let contents = fs::read(&path).with_path("reading control file", &path)?;
            tracing::debug!("Including {}", path.display());
            generated.push(GeneratedFile {
                name: name.to_string(),
                contents,
                mode,
            });
        }
    }

    targz::build_from_bytes(&generated, &build.tmp_dir.join(&artifact.control_archive))
}

/// Build the data archive for `artifact` in the temp directory.
pub fn build_data_archive(artifact: &BinaryArtifact<'_>, build: &BuildParams) -> Result<PathBuf> {
    if artifact.mapped_files.is_empty() {
        tracing::warn!("No files mapped for {}, data archive will be empty", artifact.filename());
    }
    targz::build(&artifact.mapped_files, &build.tmp_dir.join(&artifact.data_archive))
}

fn remove_temp(artifact: &BinaryArtifact<'_>, build: &BuildParams) {
    for name in [&artifact.control_archive, &artifact.data_archive] {
        let path = build.tmp_dir.join(name);
        if let Err(e) = fs::remove_file(&path) {
            tracing::warn!("Failed to remove {}: {}", path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CONTROL_ARCHIVE_NAME, DATA_ARCHIVE_NAME};
    use crate::ops::inspect::read_control;
    use tempfile::TempDir;

    fn setup() -> (TempDir, BuildParams, PathBuf) {
        let tmp = TempDir::new().unwrap();
        let build = BuildParams::rooted_at(tmp.path());
        let bin = tmp.path().join("hello");
        fs::write(&bin, "#!/bin/sh\necho hello\n").unwrap();
        (tmp, build, bin)
    }

    #[test]
    fn test_build_single_arch() {
        let (_tmp, build, bin) = setup();
        let pkg = Package::new("hello", "1.0", "me", "Says hello").with_architecture("amd64");
        let opts = DebOptions::default().with_file(&bin, "/usr/bin/hello");

        let built = build_deb(&pkg, &build, &opts).unwrap();

        assert_eq!(built.len(), 1);
        assert_eq!(built[0].architecture, Architecture::Amd64);
        assert_eq!(built[0].path, build.dest_dir.join("hello_1.0_amd64.deb"));

        let names: Vec<String> = archive::members(&built[0].path)
            .unwrap()
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, vec!["debian-binary", "control.tar.gz", "data.tar.gz"]);

        let control = read_control(&built[0].path).unwrap().unwrap();
        assert!(control.contains("Package: hello\n"));
        assert!(control.contains("Architecture: amd64\n"));
    }

    #[test]
    fn test_depends_lands_in_control_file() {
        let (_tmp, build, bin) = setup();
        let pkg = Package::new("hello", "1.0", "me", "Says hello")
            .with_architecture("arm64")
            .with_depends("libc6 (>= 2.31)");
        let opts = DebOptions::default().with_file(&bin, "usr/bin/hello");

        let built = build_deb(&pkg, &build, &opts).unwrap();

        let control = read_control(&built[0].path).unwrap().unwrap();
        assert!(control.contains("Architecture: arm64\nMaintainer: me\n"));
        assert!(control.contains("Depends: libc6 (>= 2.31)\n"));
    }

    #[test]
    fn test_build_any_produces_one_file_per_arch() {
        let (_tmp, build, bin) = setup();
        let pkg = Package::new("hello", "1.0", "me", "Says hello");
        let opts = DebOptions::default().with_file(&bin, "usr/bin/hello");

        let built = build_deb(&pkg, &build, &opts).unwrap();

        let files: Vec<String> = built
            .iter()
            .map(|b| b.path.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(
            files,
            vec!["hello_1.0_i386.deb", "hello_1.0_armhf.deb", "hello_1.0_amd64.deb"]
        );
        for b in &built {
            let control = read_control(&b.path).unwrap().unwrap();
            assert!(control.contains(&format!("Architecture: {}\n", b.architecture)));
        }
    }

    #[test]
    fn test_unknown_arch_fails_before_io() {
        let (_tmp, build, bin) = setup();
        let pkg = Package::new("hello", "1.0", "me", "Says hello").with_architecture("sparc9000");
        let opts = DebOptions::default().with_file(&bin, "usr/bin/hello");

        let err = build_deb(&pkg, &build, &opts).unwrap_err();

        assert!(err.is_config());
        assert!(!build.dest_dir.exists());
        assert!(!build.tmp_dir.exists());
    }

    #[test]
    fn test_rm_temp_removes_intermediate_archives() {
        let (_tmp, mut build, bin) = setup();
        let pkg = Package::new("hello", "1.0", "me", "Says hello").with_architecture("all");
        let opts = DebOptions::default().with_file(&bin, "usr/bin/hello");

        build_deb(&pkg, &build, &opts).unwrap();
        assert!(!build.tmp_dir.join(CONTROL_ARCHIVE_NAME).exists());
        assert!(!build.tmp_dir.join(DATA_ARCHIVE_NAME).exists());

        build.rm_temp = false;
        build_deb(&pkg, &build, &opts).unwrap();
        assert!(build.tmp_dir.join(CONTROL_ARCHIVE_NAME).exists());
        assert!(build.tmp_dir.join(DATA_ARCHIVE_NAME).exists());
    }

    #[test]
    fn test_maintainer_scripts_are_included() {
        let (_tmp, mut build, bin) = setup();
        build.rm_temp = false;
        fs::create_dir_all(build.debian_dir()).unwrap();
        fs::write(build.debian_dir().join("postinst"), "#!/bin/sh\nexit 0\n").unwrap();

        let pkg = Package::new("hello", "1.0", "me", "Says hello").with_architecture("all");
        let opts = DebOptions::default().with_file(&bin, "usr/bin/hello");
        build_deb(&pkg, &build, &opts).unwrap();

        let file = fs::File::open(build.tmp_dir.join(CONTROL_ARCHIVE_NAME)).unwrap();
        let mut tar = tar::Archive::new(flate2::read::GzDecoder::new(file));
        let mut entries = Vec::new();
        for entry in tar.entries().unwrap() {
            let entry = entry.unwrap();
            entries.push((
                entry.path().unwrap().to_string_lossy().to_string(),
                entry.header().mode().unwrap(),
            ));
        }

        assert!(entries.contains(&("control".to_string(), 0o644)));
        assert!(entries.contains(&("postinst".to_string(), 0o755)));
    }

    #[test]
    fn test_missing_staged_file_leaves_no_package() {
        let (tmp, build, _bin) = setup();
        let pkg = Package::new("hello", "1.0", "me", "Says hello").with_architecture("amd64");
        let opts = DebOptions::default().with_file(tmp.path().join("nope"), "usr/bin/nope");

        assert!(build_deb(&pkg, &build, &opts).unwrap_err().is_io());
        assert!(!build.dest_dir.join("hello_1.0_amd64.deb").exists());
    }
}
