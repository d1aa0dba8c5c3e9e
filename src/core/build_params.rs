//! Per-invocation build settings.

use std::fs;
use std::path::{Path, PathBuf};

use crate::core::architecture::Architecture;
use crate::core::errors::{IoResultExt, Result};

/// Default scratch directory for intermediate archives.
pub const DEFAULT_TMP_DIR: &str = "_out/tmp";

/// Default destination directory for built packages.
pub const DEFAULT_DEST_DIR: &str = "_out";

/// Default resources directory (the one holding `debian/`).
pub const DEFAULT_RESOURCES_DIR: &str = ".";

/// Filesystem locations and cleanup policy for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildParams {
    /// Scratch space for intermediate archives
    pub tmp_dir: PathBuf,

    /// Where finished packages are written
    pub dest_dir: PathBuf,

    /// Directory holding the `debian/` metadata directory
    pub resources_dir: PathBuf,

    /// Remove intermediate archives after a successful build
    pub rm_temp: bool,
}

impl Default for BuildParams {
    fn default() -> Self {
        BuildParams {
            tmp_dir: PathBuf::from(DEFAULT_TMP_DIR),
            dest_dir: PathBuf::from(DEFAULT_DEST_DIR),
            resources_dir: PathBuf::from(DEFAULT_RESOURCES_DIR),
            rm_temp: true,
        }
    }
}

impl BuildParams {
    /// Create build params with default locations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create build params rooted at `root`: `root/_out`, `root/_out/tmp`,
    /// resources in `root`.
    pub fn rooted_at(root: &Path) -> Self {
        BuildParams {
            tmp_dir: root.join(DEFAULT_TMP_DIR),
            dest_dir: root.join(DEFAULT_DEST_DIR),
            resources_dir: root.to_path_buf(),
            ..Default::default()
        }
    }

    /// The `debian/` metadata directory.
    pub fn debian_dir(&self) -> PathBuf {
        self.resources_dir.join("debian")
    }

    /// Scratch directory scoped to one architecture.
    ///
    /// Builds that share `tmp_dir` must run one at a time, since the inner
    /// archive names are fixed. Concurrent callers should use this instead.
    pub fn arch_tmp_dir(&self, arch: Architecture) -> PathBuf {
        self.tmp_dir.join(arch.as_str())
    }

    /// Create the temp and destination directories.
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.tmp_dir).with_path("creating temp directory", &self.tmp_dir)?;
        fs::create_dir_all(&self.dest_dir)
            .with_path("creating destination directory", &self.dest_dir)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let build = BuildParams::new();
        assert_eq!(build.tmp_dir, PathBuf::from("_out/tmp"));
        assert_eq!(build.dest_dir, PathBuf::from("_out"));
        assert_eq!(build.debian_dir(), PathBuf::from("./debian"));
        assert!(build.rm_temp);
    }

    #[test]
    fn test_init_creates_dirs() {
        let tmp = TempDir::new().unwrap();
        let build = BuildParams::rooted_at(tmp.path());

        build.init().unwrap();

        assert!(tmp.path().join("_out").is_dir());
        assert!(tmp.path().join("_out/tmp").is_dir());
    }

    #[test]
    fn test_init_fails_when_path_is_a_file() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("_out");
        fs::write(&blocker, "not a directory").unwrap();

        let build = BuildParams::rooted_at(tmp.path());
        assert!(build.init().unwrap_err().is_io());
    }

    #[test]
    fn test_arch_tmp_dir() {
        let build = BuildParams::new();
        assert_eq!(
            build.arch_tmp_dir(Architecture::Amd64),
            PathBuf::from("_out/tmp/amd64")
        );
    }
}
