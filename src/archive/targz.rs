//! Gzip-compressed tar archives for the control and data members.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::{File, Metadata};
use std::io;
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use tar::{EntryType, Header};

use crate::core::{IoResultExt, Result};

/// A file whose content is generated in memory rather than staged on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// In-archive path
    pub name: String,

    /// File content
    pub contents: Vec<u8>,

    /// Unix permission bits
    pub mode: u32,
}

impl GeneratedFile {
    /// A regular `0644` file.
    pub fn new(name: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        GeneratedFile {
            name: name.into(),
            contents: contents.into(),
            mode: 0o644,
        }
    }
}

/// Build an archive from staged files.
pub fn build(file_map: &BTreeMap<PathBuf, String>, destination: &Path) -> Result<PathBuf> {
    build_with(file_map, &[], destination)
}

/// Build an archive from in-memory files only.
pub fn build_from_bytes(generated: &[GeneratedFile], destination: &Path) -> Result<PathBuf> {
    build_with(&BTreeMap::new(), generated, destination)
}

/// Build an archive from staged files plus generated ones.
///
/// Parent directory entries are emitted for every in-archive path, before
/// any file. Every entry gets the same fixed header: mtime 0, root
/// ownership, and for staged files permissions normalized from the
/// executable bit.
pub fn build_with(
    file_map: &BTreeMap<PathBuf, String>,
    generated: &[GeneratedFile],
    destination: &Path,
) -> Result<PathBuf> {
    let file = File::create(destination).with_path("creating archive", destination)?;
    let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));

    let names: Vec<String> = file_map
        .values()
        .map(|p| normalize_archive_path(p))
        .chain(generated.iter().map(|g| normalize_archive_path(&g.name)))
        .collect();

    for dir in parent_dirs(&names) {
        let mut header = fixed_header(EntryType::Directory, 0o755, 0);
        builder
            .append_data(&mut header, &dir, io::empty())
            .with_path("writing directory entry", destination)?;
    }

    for (source, archive_path) in file_map {
        let name = normalize_archive_path(archive_path);
        let staged = File::open(source).with_path("opening staged file", source)?;
        let metadata = staged
            .metadata()
            .with_path("reading staged file metadata", source)?;
        let mut header = fixed_header(EntryType::Regular, staged_mode(&metadata), metadata.len());
        builder
            .append_data(&mut header, &name, staged)
            .with_path("adding staged file", source)?;
        tracing::debug!("Added {} as {}", source.display(), name);
    }

    for entry in generated {
        let name = normalize_archive_path(&entry.name);
        let mut header = fixed_header(EntryType::Regular, entry.mode, entry.contents.len() as u64);
        builder
            .append_data(&mut header, &name, entry.contents.as_slice())
            .with_path("adding generated file", destination)?;
        tracing::debug!("Added generated {}", name);
    }

    let encoder = builder
        .into_inner()
        .with_path("finishing tar stream", destination)?;
    let file = encoder
        .finish()
        .with_path("finishing gzip stream", destination)?;
    file.sync_all().with_path("closing archive", destination)?;

    tracing::debug!("Built {}", destination.display());
    Ok(destination.to_path_buf())
}

/// Strip leading `/` and `./` from an in-archive path.
pub fn normalize_archive_path(path: &str) -> String {
    let mut trimmed = path;
    loop {
        if let Some(rest) = trimmed.strip_prefix("./") {
            trimmed = rest;
        } else if let Some(rest) = trimmed.strip_prefix('/') {
            trimmed = rest;
        } else {
            break;
        }
    }
    trimmed.to_string()
}

/// Every ancestor directory of the given paths, parents first.
fn parent_dirs(names: &[String]) -> BTreeSet<String> {
    let mut dirs = BTreeSet::new();
    for name in names {
        let mut end = 0;
        while let Some(pos) = name[end..].find('/') {
            end += pos + 1;
            dirs.insert(name[..end].to_string());
        }
    }
    dirs
}

/// `0755` for executables, `0644` for everything else.
fn staged_mode(metadata: &Metadata) -> u32 {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if metadata.permissions().mode() & 0o111 != 0 {
            return 0o755;
        }
    }
    #[cfg(not(unix))]
    let _ = metadata;
    0o644
}

fn fixed_header(entry_type: EntryType, mode: u32, size: u64) -> Header {
    let mut header = Header::new_gnu();
    header.set_entry_type(entry_type);
    header.set_mode(mode);
    header.set_size(size);
    header.set_mtime(0);
    header.set_uid(0);
    header.set_gid(0);
    header
}
