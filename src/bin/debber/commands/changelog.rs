//! `debber changelog` command

use anyhow::{Context, Result};

use debber::ops::write_changelog;

use crate::cli::ChangelogArgs;
use crate::commands::current_config;

pub fn execute(args: ChangelogArgs) -> Result<()> {
    let cwd = std::env::current_dir().context("failed to get current directory")?;
    let config = current_config(&cwd);

    let pkg = args.package.to_package(&config);
    let mut build = config.build_params();
    if let Some(dir) = &args.resources_dir {
        build.resources_dir = dir.clone();
    }

    let entry = args.entry.unwrap_or_default();
    let result = write_changelog(&pkg, &build, &entry)?;

    eprintln!("     {} {}", result.update, result.path.display());

    Ok(())
}
