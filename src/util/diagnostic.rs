//! User-friendly diagnostic messages.
//!
//! Errors are printed with the failing stage, the path involved, the
//! underlying cause and, where one exists, a suggested fix.

use std::fmt;
use std::path::PathBuf;

/// Common suggestion messages for consistent error handling.
pub mod suggestions {
    /// Suggestion when an input file or inner archive is missing.
    pub const MISSING_FILE: &str =
        "Check the path, and that the temp directory holds the inner archives";

    /// Suggestion when the filesystem refuses access.
    pub const PERMISSION_DENIED: &str =
        "Check permissions on the destination, temp and resources directories";

    /// Suggestion for any failed build.
    pub const RERUN_VERBOSE: &str = "Run again with `--verbose` to see each archive member";
}

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    fn label(self, color: bool) -> &'static str {
        match (self, color) {
            (Severity::Error, true) => "\x1b[1;31merror\x1b[0m",
            (Severity::Error, false) => "error",
            (Severity::Warning, true) => "\x1b[1;33mwarning\x1b[0m",
            (Severity::Warning, false) => "warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label(false))
    }
}

/// A diagnostic message with optional suggestions.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Primary message
    pub message: String,
    /// Severity level
    pub severity: Severity,
    /// File the message is about
    pub location: Option<PathBuf>,
    /// Underlying causes, outermost first
    pub context: Vec<String>,
    /// Suggested fixes
    pub suggestions: Vec<String>,
}

impl Diagnostic {
    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            severity,
            location: None,
            context: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    /// Create an error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Create a warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Add a cause line.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    /// Add a suggested fix.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Set the file location.
    pub fn with_location(mut self, path: impl Into<PathBuf>) -> Self {
        self.location = Some(path.into());
        self
    }

    /// Format the diagnostic for terminal output.
    pub fn format(&self, color: bool) -> String {
        let mut output = format!("{}: {}\n", self.severity.label(color), self.message);

        if let Some(path) = &self.location {
            output.push_str(&format!("  --> {}\n", path.display()));
        }

        for ctx in &self.context {
            output.push_str(&format!("  caused by: {}\n", ctx));
        }

        if !self.suggestions.is_empty() {
            let help = if color { "\x1b[1;32mhelp\x1b[0m" } else { "help" };
            output.push_str(&format!("\n{}: consider:\n", help));
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                output.push_str(&format!("  {}. {}\n", i + 1, suggestion));
            }
        }

        output
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(false))
    }
}

/// Print a diagnostic to stderr.
pub fn emit(diagnostic: &Diagnostic, color: bool) {
    eprint!("{}", diagnostic.format(color));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_formatting() {
        let diag = Diagnostic::error("failed writing data archive into .deb")
            .with_location("_out/tmp/data.tar.gz")
            .with_context("No such file or directory (os error 2)")
            .with_suggestion("Check the temp directory")
            .with_suggestion("Re-run the build");

        let output = diag.format(false);
        assert!(output.starts_with("error: failed writing data archive"));
        assert!(output.contains("  --> _out/tmp/data.tar.gz\n"));
        assert!(output.contains("  caused by: No such file"));
        assert!(output.contains("help: consider:"));
        assert!(output.contains("  2. Re-run the build\n"));
    }

    #[test]
    fn test_warning_with_color() {
        let output = Diagnostic::warning("pattern matched no files").format(true);
        assert!(output.starts_with("\x1b[1;33mwarning\x1b[0m: pattern matched no files"));
        assert!(!output.contains("help"));
    }
}
