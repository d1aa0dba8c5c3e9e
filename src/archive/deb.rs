//! The outer `.deb` container.
//!
//! A binary package is an `ar` archive with exactly three members, in this
//! order: `debian-binary`, `control.tar.gz`, `data.tar.gz`. Installers read
//! `debian-binary` first to identify the format, so the order is fixed.
//!
//! The package is written to a temporary file in the destination directory
//! and renamed into place once every member is written and the file is
//! synced. A failed assembly leaves no file at the destination path.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::core::{
    BinaryArtifact, BuildParams, Error, IoResultExt, Result, CONTROL_ARCHIVE_NAME,
    DATA_ARCHIVE_NAME, DEBIAN_BINARY_NAME,
};

/// Mode recorded for every member.
const MEMBER_MODE: u32 = 0o100644;

/// Permissions of the finished package file.
const PACKAGE_FILE_MODE: u32 = 0o644;

/// Name and declared size of one member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberInfo {
    /// Member name
    pub name: String,
    /// Declared size in bytes
    pub size: u64,
}

/// Assemble the package for `artifact`, reading inner archives from
/// `build.tmp_dir` and writing to `build.dest_dir`.
pub fn assemble(artifact: &BinaryArtifact<'_>, build: &BuildParams) -> Result<PathBuf> {
    assemble_in(artifact, &build.tmp_dir, &build.dest_dir)
}

/// Assemble the package for `artifact` using explicit directories.
pub fn assemble_in(
    artifact: &BinaryArtifact<'_>,
    scratch_dir: &Path,
    dest_dir: &Path,
) -> Result<PathBuf> {
    let destination = dest_dir.join(artifact.filename());
    let control = scratch_dir.join(&artifact.control_archive);
    let data = scratch_dir.join(&artifact.data_archive);

    let mut partial = tempfile::Builder::new()
        .prefix(".debber-")
        .suffix(".partial")
        .tempfile_in(dest_dir)
        .with_path("creating package file", dest_dir)?;

    {
        let mut writer = BufWriter::new(partial.as_file_mut());
        let mut builder = ar::Builder::new(&mut writer);

        let marker = format!("{}\n", artifact.debian_binary_version);
        write_bytes(&mut builder, DEBIAN_BINARY_NAME, marker.as_bytes())
            .with_path("writing debian-binary into .deb", &destination)?;
        write_from_file(&mut builder, CONTROL_ARCHIVE_NAME, &control)
            .with_path("writing control archive into .deb", &control)?;
        write_from_file(&mut builder, DATA_ARCHIVE_NAME, &data)
            .with_path("writing data archive into .deb", &data)?;

        builder
            .into_inner()
            .with_path("closing .deb archive", &destination)?;
        writer.flush().with_path("closing .deb archive", &destination)?;
    }

    partial
        .as_file()
        .sync_all()
        .with_path("closing .deb archive", &destination)?;

    // Temp files are created owner-only; packages are meant to be published.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        partial
            .as_file()
            .set_permissions(fs::Permissions::from_mode(PACKAGE_FILE_MODE))
            .with_path("setting package permissions", &destination)?;
    }
    partial
        .persist(&destination)
        .map_err(|e| Error::io("moving package into place", &destination, e.error))?;

    tracing::info!("Wrote {}", destination.display());
    Ok(destination)
}

/// Write an in-memory member.
pub fn write_bytes<W: Write>(builder: &mut ar::Builder<W>, name: &str, bytes: &[u8]) -> io::Result<()> {
    builder.append(&member_header(name, bytes.len() as u64), bytes)?;
    tracing::debug!("Wrote member {} ({} bytes)", name, bytes.len());
    Ok(())
}

/// Write a member whose content is the file at `path`.
///
/// The size is taken from the file's metadata before the header is written.
pub fn write_from_file<W: Write>(
    builder: &mut ar::Builder<W>,
    name: &str,
    path: &Path,
) -> io::Result<()> {
    let mut file = File::open(path)?;
    let size = file.metadata()?.len();
    builder.append(&member_header(name, size), &mut file)?;
    tracing::debug!("Wrote member {} ({} bytes)", name, size);
    Ok(())
}

fn member_header(name: &str, size: u64) -> ar::Header {
    let mut header = ar::Header::new(name.as_bytes().to_vec(), size);
    header.set_mtime(0);
    header.set_uid(0);
    header.set_gid(0);
    header.set_mode(MEMBER_MODE);
    header
}

fn open_archive(path: &Path) -> Result<ar::Archive<BufReader<File>>> {
    let file = File::open(path).with_path("opening package", path)?;
    Ok(ar::Archive::new(BufReader::new(file)))
}

fn member_name(header: &ar::Header) -> String {
    String::from_utf8_lossy(header.identifier()).into_owned()
}

/// List the members of a package, in archive order.
pub fn members(path: &Path) -> Result<Vec<MemberInfo>> {
    let mut archive = open_archive(path)?;
    let mut out = Vec::new();

    while let Some(entry) = archive.next_entry() {
        let entry = entry.with_path("reading package member", path)?;
        out.push(MemberInfo {
            name: member_name(entry.header()),
            size: entry.header().size(),
        });
    }

    Ok(out)
}

/// Read the content of one member.
pub fn read_member(path: &Path, name: &str) -> Result<Option<Vec<u8>>> {
    let mut archive = open_archive(path)?;

    while let Some(entry) = archive.next_entry() {
        let mut entry = entry.with_path("reading package member", path)?;
        if member_name(entry.header()) == name {
            let mut data = Vec::new();
            io::copy(&mut entry, &mut data).with_path("reading package member", path)?;
            return Ok(Some(data));
        }
    }

    Ok(None)
}

/// Extract every member into `out_dir`, returning the written paths in
/// archive order. Stops at the first error.
pub fn extract_all(path: &Path, out_dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir).with_path("creating extraction directory", out_dir)?;

    let mut archive = open_archive(path)?;
    let mut filenames = Vec::new();

    while let Some(entry) = archive.next_entry() {
        let mut entry = entry.with_path("reading package member", path)?;
        let name = member_name(entry.header());

        if name.is_empty() || name.contains('/') || name == "." || name == ".." {
            return Err(Error::io(
                format!("extracting member `{}`", name),
                path,
                io::Error::new(io::ErrorKind::InvalidData, "member name escapes output directory"),
            ));
        }

        let out_path = out_dir.join(&name);
        let mut out = File::create(&out_path).with_path("creating extracted member", &out_path)?;
        io::copy(&mut entry, &mut out).with_path("writing extracted member", &out_path)?;
        out.sync_all().with_path("closing extracted member", &out_path)?;

        filenames.push(out_path);
    }

    Ok(filenames)
}
