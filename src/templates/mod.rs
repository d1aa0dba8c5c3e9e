//! Text templates for generated package metadata.
//!
//! Templates are constants with `{{field}}` placeholders. [`render`]
//! substitutes fields from a [`TemplateData`] record; a placeholder naming
//! an unknown field is an error rather than being left in the output.

use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset};
use regex::Regex;

use crate::core::{Architecture, Error, Package, Result};

/// Template for a brand-new `debian/changelog` holding one entry.
pub const CHANGELOG_INITIAL: &str = "\
{{name}} ({{version}}) {{status}}; urgency=low

  * {{entry}}

 -- {{maintainer}}  {{timestamp}}
";

/// Template for one entry appended to an existing changelog.
pub const CHANGELOG_ADDITIONAL_ENTRY: &str = "
{{name}} ({{version}}) {{status}}; urgency=low

  * {{entry}}

 -- {{maintainer}}  {{timestamp}}
";

/// Template for the `control` file of the control archive.
pub const CONTROL: &str = "\
Package: {{name}}
Version: {{version}}
Architecture: {{architecture}}
Maintainer: {{maintainer}}
Section: {{section}}
Priority: {{priority}}
{{depends}}Description: {{description}}
";

/// Date format of changelog trailer lines.
pub const CHANGELOG_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S %z";

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([A-Za-z_]+)\s*\}\}").unwrap());

/// Values available to templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateData {
    pub name: String,
    pub version: String,
    pub maintainer: String,
    pub description: String,
    pub architecture: String,
    pub status: String,
    pub section: String,
    pub priority: String,
    pub depends: Option<String>,
    pub entry: String,
    pub timestamp: String,
}

impl TemplateData {
    /// Build template data from package metadata. The entry and timestamp
    /// start empty.
    pub fn new(pkg: &Package) -> Self {
        TemplateData {
            name: pkg.name.clone(),
            version: pkg.version.clone(),
            maintainer: pkg.maintainer.clone(),
            description: pkg.description.clone(),
            architecture: pkg.architecture.clone(),
            status: pkg.status.clone(),
            section: pkg.section.clone(),
            priority: pkg.priority.clone(),
            depends: pkg.depends.clone(),
            entry: String::new(),
            timestamp: String::new(),
        }
    }

    /// Set the changelog entry text.
    pub fn with_entry(mut self, entry: impl Into<String>) -> Self {
        self.entry = entry.into();
        self
    }

    /// Set the timestamp, formatted for changelog trailers.
    pub fn with_timestamp(mut self, timestamp: &DateTime<FixedOffset>) -> Self {
        self.timestamp = timestamp.format(CHANGELOG_DATE_FORMAT).to_string();
        self
    }

    /// Override the architecture with a resolved value.
    pub fn with_architecture(mut self, arch: Architecture) -> Self {
        self.architecture = arch.as_str().to_string();
        self
    }

    fn field(&self, key: &str) -> Option<String> {
        let value = match key {
            "name" => self.name.clone(),
            "version" => self.version.clone(),
            "maintainer" => self.maintainer.clone(),
            "description" => format_description(&self.description),
            "architecture" => self.architecture.clone(),
            "status" => self.status.clone(),
            "section" => self.section.clone(),
            "priority" => self.priority.clone(),
            "depends" => match &self.depends {
                Some(d) if !d.trim().is_empty() => format!("Depends: {}\n", d.trim()),
                _ => String::new(),
            },
            "entry" => format_entry(&self.entry),
            "timestamp" => self.timestamp.clone(),
            _ => return None,
        };
        Some(value)
    }
}

/// Render `template` against `data`.
///
/// `template_name` only labels errors.
pub fn render(template_name: &'static str, template: &str, data: &TemplateData) -> Result<String> {
    let mut out = String::with_capacity(template.len() + 64);
    let mut last = 0;

    for caps in PLACEHOLDER.captures_iter(template) {
        let (Some(whole), Some(key)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let value = data.field(key.as_str()).ok_or_else(|| Error::Format {
            template: template_name,
            message: format!("unknown field `{}`", key.as_str()),
        })?;

        push_literal(&mut out, template_name, &template[last..whole.start()])?;
        out.push_str(&value);
        last = whole.end();
    }
    push_literal(&mut out, template_name, &template[last..])?;

    Ok(out)
}

fn push_literal(out: &mut String, template_name: &'static str, literal: &str) -> Result<()> {
    if literal.contains("{{") {
        return Err(Error::Format {
            template: template_name,
            message: "unterminated or malformed placeholder".to_string(),
        });
    }
    out.push_str(literal);
    Ok(())
}

/// Format a description for a control file: synopsis on the first line,
/// continuation lines indented by one space, blank lines as ` .`.
pub fn format_description(description: &str) -> String {
    let mut lines = description.trim_end().lines();
    let mut out = lines.next().unwrap_or_default().trim().to_string();

    for line in lines {
        out.push('\n');
        if line.trim().is_empty() {
            out.push_str(" .");
        } else {
            out.push(' ');
            out.push_str(line.trim_end());
        }
    }

    out
}

/// Indent continuation lines of a changelog entry under its `  * ` bullet.
fn format_entry(entry: &str) -> String {
    entry
        .trim()
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n    ")
}
