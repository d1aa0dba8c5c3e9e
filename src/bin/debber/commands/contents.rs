//! `debber contents` command
//!
//! Lists the members of a package and prints its control file.

use anyhow::Result;

use debber::ops::{extract, inspect};

use crate::cli::ContentsArgs;

pub fn execute(args: ContentsArgs) -> Result<()> {
    let report = inspect(&args.file)?;

    for member in &report.members {
        println!("{:<16} {:>10}", member.name, member.size);
    }

    if !report.well_formed {
        tracing::warn!(
            "{} does not have the expected debian-binary, control.tar.gz, data.tar.gz layout",
            args.file.display()
        );
    }

    if let Some(control) = &report.control {
        println!();
        print!("{}", control);
    }

    if let Some(out_dir) = &args.extract {
        let files = extract(&args.file, out_dir)?;
        eprintln!("   Extracted {} members -> {}", files.len(), out_dir.display());
    }

    Ok(())
}
