//! Implementation of `debber changelog`.
//!
//! The changelog is `debian/changelog` under the resources directory. Whether
//! it exists decides what happens:
//! - absent: the initial template is rendered and written as a new file
//! - present: one entry is rendered and appended; earlier bytes are untouched
//!
//! Any other error while checking for the file is fatal. A single writer per
//! changelog is assumed; nothing is locked.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset, Local};

use crate::core::{BuildParams, Error, IoResultExt, Package, Result};
use crate::templates::{self, TemplateData};

/// File name of the changelog inside `debian/`.
pub const CHANGELOG_FILE: &str = "changelog";

/// What a changelog update did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangelogUpdate {
    /// No changelog existed; a new one was created.
    Created,
    /// An entry was appended to an existing changelog.
    Appended,
}

impl std::fmt::Display for ChangelogUpdate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChangelogUpdate::Created => write!(f, "Created"),
            ChangelogUpdate::Appended => write!(f, "Appended"),
        }
    }
}

/// Result of a changelog update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogResult {
    /// Path of the changelog
    pub path: PathBuf,
    /// Which transition happened
    pub update: ChangelogUpdate,
}

/// Path of the changelog for the given build params.
pub fn changelog_path(build: &BuildParams) -> PathBuf {
    build.debian_dir().join(CHANGELOG_FILE)
}

/// Add `entry` to the changelog, timestamped now.
pub fn write_changelog(pkg: &Package, build: &BuildParams, entry: &str) -> Result<ChangelogResult> {
    let now = Local::now().fixed_offset();
    write_changelog_at(pkg, build, entry, &now)
}

/// Add `entry` to the changelog with an explicit timestamp.
pub fn write_changelog_at(
    pkg: &Package,
    build: &BuildParams,
    entry: &str,
    timestamp: &DateTime<FixedOffset>,
) -> Result<ChangelogResult> {
    if entry.trim().is_empty() {
        return Err(Error::config("changelog entry must not be empty (use --entry)"));
    }
    pkg.validate()?;

    let debian_dir = build.debian_dir();
    fs::create_dir_all(&debian_dir).with_path("creating debian directory", &debian_dir)?;

    let path = debian_dir.join(CHANGELOG_FILE);
    let data = TemplateData::new(pkg)
        .with_entry(entry)
        .with_timestamp(timestamp);

    let update = match fs::metadata(&path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            let text = templates::render("changelog", templates::CHANGELOG_INITIAL, &data)?;
            create(&path, &text)?;
            ChangelogUpdate::Created
        }
        Err(e) => return Err(Error::io("checking existing changelog", &path, e)),
        Ok(_) => {
            let text =
                templates::render("changelog entry", templates::CHANGELOG_ADDITIONAL_ENTRY, &data)?;
            append(&path, &text)?;
            ChangelogUpdate::Appended
        }
    };

    tracing::info!("{} changelog entry for {} in {}", update, pkg, path.display());
    Ok(ChangelogResult { path, update })
}

fn create(path: &Path, text: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .with_path("creating changelog", path)?;
    file.write_all(text.as_bytes())
        .with_path("writing changelog", path)?;
    file.sync_all().with_path("closing changelog", path)
}

fn append(path: &Path, text: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .append(true)
        .open(path)
        .with_path("opening changelog for append", path)?;
    file.write_all(text.as_bytes())
        .with_path("appending to changelog", path)?;
    file.sync_all().with_path("closing changelog", path)
}
