//! Error types for package assembly and changelog maintenance.
//!
//! Every failure is one of three kinds: bad input (`Config`), a filesystem
//! or codec failure at a named stage (`Io`), or a template that could not be
//! rendered (`Format`). Nothing is retried; callers fix the cause and re-run.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::architecture::ArchitectureParseError;
use crate::util::diagnostic::{suggestions, Diagnostic};

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, Error>;

/// Error raised while building a package or updating a changelog.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or invalid input. Reported before any I/O happens.
    #[error("{message}")]
    Config { message: String },

    /// A file could not be opened, created, read, written or closed.
    #[error("failed {action}: {}", path.display())]
    Io {
        action: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A template could not be rendered.
    #[error("failed to render {template} template: {message}")]
    Format {
        template: &'static str,
        message: String,
    },
}

impl Error {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    /// Create an I/O error for the given stage and path.
    pub fn io(action: impl Into<String>, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            action: action.into(),
            path: path.into(),
            source,
        }
    }

    /// Whether this is a configuration error.
    pub fn is_config(&self) -> bool {
        matches!(self, Error::Config { .. })
    }

    /// Whether this is an I/O error.
    pub fn is_io(&self) -> bool {
        matches!(self, Error::Io { .. })
    }

    /// Whether this is a template error.
    pub fn is_format(&self) -> bool {
        matches!(self, Error::Format { .. })
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Error::Config { message } => Diagnostic::error(message.clone())
                .with_suggestion("Fix the input and run the command again"),

            Error::Io {
                action,
                path,
                source,
            } => {
                let mut diag = Diagnostic::error(format!("failed {}", action))
                    .with_location(path)
                    .with_context(source.to_string());

                if source.kind() == io::ErrorKind::NotFound {
                    diag = diag.with_suggestion(suggestions::MISSING_FILE);
                } else if source.kind() == io::ErrorKind::PermissionDenied {
                    diag = diag.with_suggestion(suggestions::PERMISSION_DENIED);
                }

                diag.with_suggestion(suggestions::RERUN_VERBOSE)
            }

            Error::Format { template, message } => {
                Diagnostic::error(format!("failed to render {} template", template))
                    .with_context(message.clone())
            }
        }
    }
}

impl From<ArchitectureParseError> for Error {
    fn from(err: ArchitectureParseError) -> Self {
        Error::config(err.to_string())
    }
}

/// Attach a stage and path to a raw I/O result.
pub trait IoResultExt<T> {
    /// Map the error into [`Error::Io`].
    fn with_path(self, action: &str, path: &Path) -> Result<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_path(self, action: &str, path: &Path) -> Result<T> {
        self.map_err(|e| Error::io(action, path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display_names_stage_and_path() {
        let err = Error::io(
            "opening control archive",
            "/tmp/control.tar.gz",
            io::Error::from(io::ErrorKind::NotFound),
        );

        assert!(err.is_io());
        assert_eq!(
            err.to_string(),
            "failed opening control archive: /tmp/control.tar.gz"
        );
    }

    #[test]
    fn test_not_found_diagnostic_suggests_checking_paths() {
        let err = Error::io(
            "opening control archive",
            "/tmp/control.tar.gz",
            io::Error::from(io::ErrorKind::NotFound),
        );

        let output = err.to_diagnostic().format(false);
        assert!(output.contains("error: failed opening control archive"));
        assert!(output.contains("--> /tmp/control.tar.gz"));
        assert!(output.contains("help: consider:"));
    }

    #[test]
    fn test_architecture_error_is_config() {
        let err: Error = "sparc9000"
            .parse::<crate::core::Architecture>()
            .unwrap_err()
            .into();
        assert!(err.is_config());
        assert!(err.to_string().contains("sparc9000"));
    }
}
