//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use debber::util::Config;
use debber::{BuildParams, Package};

/// debber - build Debian binary packages without dpkg tooling
#[derive(Parser)]
#[command(name = "debber")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build binary packages (.deb), one per architecture
    Deb(DebArgs),

    /// Create debian/changelog or append an entry to it
    Changelog(ChangelogArgs),

    /// List or extract the members of a .deb
    Contents(ContentsArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Package metadata shared by `deb` and `changelog`.
#[derive(Args)]
pub struct PackageArgs {
    /// Package name
    #[arg(long)]
    pub name: String,

    /// Package version
    #[arg(long = "version", id = "pkg_version", value_name = "VERSION")]
    pub version: String,

    /// Maintainer, e.g. "Jane Doe <jane@example.com>"
    #[arg(long, env = "DEBBER_MAINTAINER")]
    pub maintainer: Option<String>,

    /// Package description; the first line is the synopsis
    #[arg(long)]
    pub description: Option<String>,

    /// Architectures [any, all, i386, amd64, armhf, arm64, ...], comma separated
    #[arg(long)]
    pub arch: Option<String>,

    /// Value of the control file's Depends field
    #[arg(long)]
    pub depends: Option<String>,
}

impl PackageArgs {
    /// Build the package model: defaults, then config, then flags.
    pub fn to_package(&self, config: &Config) -> Package {
        let mut pkg = Package::new(self.name.clone(), self.version.clone(), "", "");
        config.apply_to_package(&mut pkg);

        if let Some(maintainer) = &self.maintainer {
            pkg.maintainer = maintainer.clone();
        }
        if let Some(description) = &self.description {
            pkg.description = description.clone();
        }
        if let Some(arch) = &self.arch {
            pkg.architecture = arch.clone();
        }
        if self.depends.is_some() {
            pkg.depends = self.depends.clone();
        }
        pkg
    }
}

#[derive(Args)]
pub struct DebArgs {
    #[command(flatten)]
    pub package: PackageArgs,

    /// Stage a file: SRC=DEST (DEST is the install path)
    #[arg(long = "file", value_name = "SRC=DEST")]
    pub files: Vec<String>,

    /// Stage files matching a glob: PATTERN=DESTDIR
    #[arg(long = "glob", value_name = "PATTERN=DESTDIR")]
    pub globs: Vec<String>,

    /// Stage a directory tree: SRCDIR=DESTDIR
    #[arg(long = "dir", value_name = "SRCDIR=DESTDIR")]
    pub dirs: Vec<String>,

    /// Scratch directory for intermediate archives
    #[arg(long)]
    pub tmp_dir: Option<PathBuf>,

    /// Output directory for packages
    #[arg(long)]
    pub dest_dir: Option<PathBuf>,

    /// Directory holding debian/ (maintainer scripts, conffiles)
    #[arg(long)]
    pub resources_dir: Option<PathBuf>,

    /// Keep intermediate archives
    #[arg(long)]
    pub keep_temp: bool,
}

impl DebArgs {
    /// Apply location flags on top of configured build params.
    pub fn apply_to_build(&self, build: &mut BuildParams) {
        if let Some(dir) = &self.tmp_dir {
            build.tmp_dir = dir.clone();
        }
        if let Some(dir) = &self.dest_dir {
            build.dest_dir = dir.clone();
        }
        if let Some(dir) = &self.resources_dir {
            build.resources_dir = dir.clone();
        }
        if self.keep_temp {
            build.rm_temp = false;
        }
    }
}

#[derive(Args)]
pub struct ChangelogArgs {
    #[command(flatten)]
    pub package: PackageArgs,

    /// Changelog entry text
    #[arg(long)]
    pub entry: Option<String>,

    /// Directory holding debian/
    #[arg(long)]
    pub resources_dir: Option<PathBuf>,
}

#[derive(Args)]
pub struct ContentsArgs {
    /// Package file to read
    pub file: PathBuf,

    /// Extract all members into this directory
    #[arg(long)]
    pub extract: Option<PathBuf>,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}
