//! Command implementations

pub mod changelog;
pub mod completions;
pub mod contents;
pub mod deb;

use std::path::Path;

use debber::util::config::{global_config_path, load_config, project_config_path};
use debber::util::Config;

/// Global config merged with `debber.toml` from `cwd`.
pub fn current_config(cwd: &Path) -> Config {
    load_config(global_config_path().as_deref(), &project_config_path(cwd))
}
