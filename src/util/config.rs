//! Configuration file support for debber.
//!
//! Two locations are read:
//! - Global: `~/.debber/config.toml` - user-wide defaults (e.g. maintainer)
//! - Project: `debber.toml` in the working directory
//!
//! Project config takes precedence over global config, and command-line
//! flags take precedence over both.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::{BuildParams, Package};

/// File name of the project config.
pub const PROJECT_CONFIG_NAME: &str = "debber.toml";

/// debber configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Package metadata defaults
    pub package: PackageConfig,

    /// Build locations and cleanup
    pub build: BuildConfig,
}

/// Package metadata defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageConfig {
    pub maintainer: Option<String>,
    pub description: Option<String>,
    /// Architecture designator (`amd64`, `all`, `any`, `amd64,arm64`, ...)
    pub architecture: Option<String>,
    pub status: Option<String>,
    pub section: Option<String>,
    pub priority: Option<String>,
    pub depends: Option<String>,
}

/// Build-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Scratch directory for intermediate archives
    pub tmp_dir: Option<PathBuf>,

    /// Destination directory for packages
    pub dest_dir: Option<PathBuf>,

    /// Directory holding `debian/`
    pub resources_dir: Option<PathBuf>,

    /// Remove intermediate archives after a successful build
    pub rm_temp: Option<bool>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if the file doesn't exist
    /// or can't be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        let pkg = other.package;
        merge_opt(&mut self.package.maintainer, pkg.maintainer);
        merge_opt(&mut self.package.description, pkg.description);
        merge_opt(&mut self.package.architecture, pkg.architecture);
        merge_opt(&mut self.package.status, pkg.status);
        merge_opt(&mut self.package.section, pkg.section);
        merge_opt(&mut self.package.priority, pkg.priority);
        merge_opt(&mut self.package.depends, pkg.depends);

        let build = other.build;
        merge_opt(&mut self.build.tmp_dir, build.tmp_dir);
        merge_opt(&mut self.build.dest_dir, build.dest_dir);
        merge_opt(&mut self.build.resources_dir, build.resources_dir);
        merge_opt(&mut self.build.rm_temp, build.rm_temp);
    }

    /// Fill package fields from configured defaults.
    pub fn apply_to_package(&self, pkg: &mut Package) {
        let cfg = &self.package;
        if let Some(maintainer) = &cfg.maintainer {
            pkg.maintainer = maintainer.clone();
        }
        if let Some(description) = &cfg.description {
            pkg.description = description.clone();
        }
        if let Some(architecture) = &cfg.architecture {
            pkg.architecture = architecture.clone();
        }
        if let Some(status) = &cfg.status {
            pkg.status = status.clone();
        }
        if let Some(section) = &cfg.section {
            pkg.section = section.clone();
        }
        if let Some(priority) = &cfg.priority {
            pkg.priority = priority.clone();
        }
        if cfg.depends.is_some() {
            pkg.depends = cfg.depends.clone();
        }
    }

    /// Build params from configured locations, defaults elsewhere.
    pub fn build_params(&self) -> BuildParams {
        let mut build = BuildParams::default();
        if let Some(dir) = &self.build.tmp_dir {
            build.tmp_dir = dir.clone();
        }
        if let Some(dir) = &self.build.dest_dir {
            build.dest_dir = dir.clone();
        }
        if let Some(dir) = &self.build.resources_dir {
            build.resources_dir = dir.clone();
        }
        if let Some(rm_temp) = self.build.rm_temp {
            build.rm_temp = rm_temp;
        }
        build
    }
}

fn merge_opt<T>(slot: &mut Option<T>, other: Option<T>) {
    if other.is_some() {
        *slot = other;
    }
}

/// Get the global debber config directory (~/.debber).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".debber"))
}

/// Get the global config path (~/.debber/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (`debber.toml` in `project_root`).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(PROJECT_CONFIG_NAME)
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (debber.toml)
/// 2. Global config (~/.debber/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge(Config::load_or_default(global_path));
    }

    config.merge(Config::load_or_default(project_path));

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_config_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("debber.toml");
        std::fs::write(
            &path,
            r#"
[package]
maintainer = "Jane <jane@example.com>"
architecture = "amd64,arm64"

[build]
dest_dir = "dist"
rm_temp = false
"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(
            config.package.maintainer.as_deref(),
            Some("Jane <jane@example.com>")
        );
        assert_eq!(config.build.dest_dir, Some(PathBuf::from("dist")));
        assert_eq!(config.build.rm_temp, Some(false));
        assert!(config.build.tmp_dir.is_none());
    }

    #[test]
    fn test_project_overrides_global() {
        let tmp = TempDir::new().unwrap();
        let global = tmp.path().join("global.toml");
        let project = tmp.path().join("debber.toml");
        std::fs::write(&global, "[package]\nmaintainer = \"Global\"\nsection = \"utils\"\n").unwrap();
        std::fs::write(&project, "[package]\nmaintainer = \"Project\"\n").unwrap();

        let config = load_config(Some(&global), &project);
        assert_eq!(config.package.maintainer.as_deref(), Some("Project"));
        assert_eq!(config.package.section.as_deref(), Some("utils"));
    }

    #[test]
    fn test_invalid_file_falls_back_to_default() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("debber.toml");
        std::fs::write(&path, "[package\n").unwrap();

        assert!(Config::load(&path).is_err());
        assert_eq!(Config::load_or_default(&path), Config::default());
    }

    #[test]
    fn test_apply_to_package_and_build_params() {
        let mut config = Config::default();
        config.package.architecture = Some("all".to_string());
        config.package.depends = Some("libc6".to_string());
        config.build.dest_dir = Some(PathBuf::from("dist"));
        config.build.rm_temp = Some(false);

        let mut pkg = Package::new("foo", "1.0", "me", "Foo");
        config.apply_to_package(&mut pkg);
        assert_eq!(pkg.architecture, "all");
        assert_eq!(pkg.depends.as_deref(), Some("libc6"));
        assert_eq!(pkg.maintainer, "me");

        let build = config.build_params();
        assert_eq!(build.dest_dir, PathBuf::from("dist"));
        assert_eq!(build.tmp_dir, PathBuf::from("_out/tmp"));
        assert!(!build.rm_temp);
    }
}
