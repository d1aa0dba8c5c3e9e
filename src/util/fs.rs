//! Filesystem utilities for staging package contents.

use std::collections::BTreeMap;
use std::io;
use std::path::{Component, Path, PathBuf};

use glob::glob;
use walkdir::WalkDir;

use crate::core::{Error, Result};

/// Parse a `SRC=DEST` file mapping.
pub fn parse_file_mapping(spec: &str) -> Result<(PathBuf, String)> {
    match spec.split_once('=') {
        Some((src, dest)) if !src.is_empty() && !dest.is_empty() => {
            Ok((PathBuf::from(src), dest.to_string()))
        }
        _ => Err(Error::config(format!(
            "invalid file mapping `{}`, expected SRC=DEST",
            spec
        ))),
    }
}

/// Map every file matching `pattern` (relative to `base`) under `dest_dir`.
///
/// Each match keeps its path relative to the literal directory prefix of the
/// pattern, so `build/bin/*` mapped to `usr/bin` stages `build/bin/foo` as
/// `usr/bin/foo`.
pub fn glob_mapping(base: &Path, pattern: &str, dest_dir: &str) -> Result<BTreeMap<PathBuf, String>> {
    let full_pattern = base.join(pattern);
    let pattern_str = full_pattern.to_string_lossy();
    let root = base.join(literal_prefix(pattern));

    let entries = glob(&pattern_str)
        .map_err(|e| Error::config(format!("invalid glob pattern `{}`: {}", pattern, e)))?;

    let mut mapping = BTreeMap::new();
    for entry in entries {
        match entry {
            Ok(path) => {
                if path.is_file() {
                    let relative = pathdiff::diff_paths(&path, &root).unwrap_or_else(|| path.clone());
                    mapping.insert(path, join_archive_path(dest_dir, &relative));
                }
            }
            Err(e) => {
                tracing::warn!("glob error: {}", e);
            }
        }
    }

    if mapping.is_empty() {
        tracing::warn!("pattern `{}` matched no files", pattern);
    }

    Ok(mapping)
}

/// Map every file below `src_dir` under `dest_dir`, keeping relative paths.
pub fn dir_mapping(src_dir: &Path, dest_dir: &str) -> Result<BTreeMap<PathBuf, String>> {
    let mut mapping = BTreeMap::new();

    for entry in WalkDir::new(src_dir).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(src_dir).to_path_buf();
            Error::io("walking staged directory", path, io::Error::from(e))
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry.path().strip_prefix(src_dir).unwrap_or(entry.path());
        mapping.insert(entry.path().to_path_buf(), join_archive_path(dest_dir, relative));
    }

    Ok(mapping)
}

/// The leading components of a glob pattern that contain no wildcards.
fn literal_prefix(pattern: &str) -> PathBuf {
    let mut prefix = PathBuf::new();
    for component in Path::new(pattern).components() {
        let text = component.as_os_str().to_string_lossy();
        if text.contains(['*', '?', '[']) {
            break;
        }
        prefix.push(component);
    }
    if prefix.as_os_str() == pattern {
        // No wildcard at all: the pattern names a single file.
        prefix.pop();
    }
    prefix
}

fn join_archive_path(dest_dir: &str, relative: &Path) -> String {
    let mut out = dest_dir.trim_end_matches('/').to_string();
    for component in relative.components() {
        if let Component::Normal(part) = component {
            out.push('/');
            out.push_str(&part.to_string_lossy());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_file_mapping() {
        let (src, dest) = parse_file_mapping("target/release/foo=/usr/bin/foo").unwrap();
        assert_eq!(src, PathBuf::from("target/release/foo"));
        assert_eq!(dest, "/usr/bin/foo");

        assert!(parse_file_mapping("nodest").unwrap_err().is_config());
        assert!(parse_file_mapping("=/usr/bin/foo").unwrap_err().is_config());
    }

    #[test]
    fn test_glob_mapping() {
        let tmp = TempDir::new().unwrap();
        let bin = tmp.path().join("build/bin");
        fs::create_dir_all(&bin).unwrap();
        fs::write(bin.join("foo"), "foo").unwrap();
        fs::write(bin.join("bar"), "bar").unwrap();

        let mapping = glob_mapping(tmp.path(), "build/bin/*", "/usr/bin").unwrap();

        let dests: Vec<&str> = mapping.values().map(String::as_str).collect();
        assert_eq!(dests, vec!["/usr/bin/bar", "/usr/bin/foo"]);
    }

    #[test]
    fn test_glob_mapping_single_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("README"), "hi").unwrap();

        let mapping = glob_mapping(tmp.path(), "README", "usr/share/doc/foo").unwrap();
        assert_eq!(
            mapping.get(&tmp.path().join("README")).map(String::as_str),
            Some("usr/share/doc/foo/README")
        );
    }

    #[test]
    fn test_dir_mapping() {
        let tmp = TempDir::new().unwrap();
        let share = tmp.path().join("share");
        fs::create_dir_all(share.join("icons")).unwrap();
        fs::write(share.join("icons/foo.png"), "png").unwrap();
        fs::write(share.join("foo.desktop"), "desktop").unwrap();

        let mapping = dir_mapping(&share, "/usr/share/foo/").unwrap();

        let dests: Vec<&str> = mapping.values().map(String::as_str).collect();
        assert_eq!(
            dests,
            vec!["/usr/share/foo/foo.desktop", "/usr/share/foo/icons/foo.png"]
        );
    }
}
