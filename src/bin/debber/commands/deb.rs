//! `debber deb` command

use anyhow::{Context, Result};

use debber::ops::{build_deb, DebOptions};
use debber::util::fs::{dir_mapping, glob_mapping, parse_file_mapping};

use crate::cli::DebArgs;
use crate::commands::current_config;

pub fn execute(args: DebArgs) -> Result<()> {
    let cwd = std::env::current_dir().context("failed to get current directory")?;
    let config = current_config(&cwd);

    let pkg = args.package.to_package(&config);
    let mut build = config.build_params();
    args.apply_to_build(&mut build);

    let mut opts = DebOptions::default();
    for spec in &args.files {
        let (source, dest) = parse_file_mapping(spec)?;
        opts.mapped_files.insert(source, dest);
    }
    for spec in &args.globs {
        let (pattern, dest_dir) = parse_file_mapping(spec)?;
        let pattern = pattern.to_string_lossy();
        opts.mapped_files.extend(glob_mapping(&cwd, &pattern, &dest_dir)?);
    }
    for spec in &args.dirs {
        let (src_dir, dest_dir) = parse_file_mapping(spec)?;
        opts.mapped_files.extend(dir_mapping(&src_dir, &dest_dir)?);
    }

    tracing::debug!(
        "building {} {} for `{}` with {} staged files",
        pkg.name,
        pkg.version,
        pkg.architecture,
        opts.mapped_files.len()
    );

    let built = build_deb(&pkg, &build, &opts)?;

    for artifact in &built {
        eprintln!(
            "    Finished `{}` -> {} ({} bytes)",
            artifact.architecture,
            artifact.path.display(),
            artifact.size
        );
    }

    Ok(())
}
