//! Debian architectures and designator resolution.
//!
//! A package declares an architecture *designator*: a concrete architecture,
//! `all`, `any`, or a comma-separated list of those. Building resolves the
//! designator to an ordered list of concrete architectures, one artifact each.

use serde::{Deserialize, Serialize};

/// Architectures that `any` expands to.
pub const ANY_EXPANSION: &[Architecture] =
    &[Architecture::I386, Architecture::Armhf, Architecture::Amd64];

/// A Debian architecture value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Architecture {
    /// 32-bit x86
    I386,
    /// 64-bit x86
    Amd64,
    /// ARM EABI, soft float
    Armel,
    /// ARM EABI, hard float
    Armhf,
    /// 64-bit ARM
    Arm64,
    /// 64-bit little-endian PowerPC
    Ppc64el,
    /// IBM Z
    S390x,
    /// 64-bit little-endian MIPS
    Mips64el,
    /// 64-bit RISC-V
    Riscv64,
    /// Architecture-independent
    All,
    /// Any architecture; expands to several concrete values
    Any,
}

impl Architecture {
    /// Every value, in a stable order.
    pub const VALUES: &'static [Architecture] = &[
        Architecture::I386,
        Architecture::Amd64,
        Architecture::Armel,
        Architecture::Armhf,
        Architecture::Arm64,
        Architecture::Ppc64el,
        Architecture::S390x,
        Architecture::Mips64el,
        Architecture::Riscv64,
        Architecture::All,
        Architecture::Any,
    ];

    /// Get the Debian name of this architecture.
    pub fn as_str(&self) -> &'static str {
        match self {
            Architecture::I386 => "i386",
            Architecture::Amd64 => "amd64",
            Architecture::Armel => "armel",
            Architecture::Armhf => "armhf",
            Architecture::Arm64 => "arm64",
            Architecture::Ppc64el => "ppc64el",
            Architecture::S390x => "s390x",
            Architecture::Mips64el => "mips64el",
            Architecture::Riscv64 => "riscv64",
            Architecture::All => "all",
            Architecture::Any => "any",
        }
    }

    /// Check if this value stands for more than one concrete architecture.
    pub fn is_multi(&self) -> bool {
        matches!(self, Architecture::Any)
    }

    /// Expand this value into concrete architectures.
    pub fn expand(&self) -> &'static [Architecture] {
        match self {
            Architecture::Any => ANY_EXPANSION,
            Architecture::I386 => &[Architecture::I386],
            Architecture::Amd64 => &[Architecture::Amd64],
            Architecture::Armel => &[Architecture::Armel],
            Architecture::Armhf => &[Architecture::Armhf],
            Architecture::Arm64 => &[Architecture::Arm64],
            Architecture::Ppc64el => &[Architecture::Ppc64el],
            Architecture::S390x => &[Architecture::S390x],
            Architecture::Mips64el => &[Architecture::Mips64el],
            Architecture::Riscv64 => &[Architecture::Riscv64],
            Architecture::All => &[Architecture::All],
        }
    }
}

impl std::str::FromStr for Architecture {
    type Err = ArchitectureParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "i386" | "386" => Ok(Architecture::I386),
            "amd64" => Ok(Architecture::Amd64),
            "armel" => Ok(Architecture::Armel),
            "armhf" => Ok(Architecture::Armhf),
            "arm64" => Ok(Architecture::Arm64),
            "ppc64el" => Ok(Architecture::Ppc64el),
            "s390x" => Ok(Architecture::S390x),
            "mips64el" => Ok(Architecture::Mips64el),
            "riscv64" => Ok(Architecture::Riscv64),
            "all" => Ok(Architecture::All),
            "any" => Ok(Architecture::Any),
            _ => Err(ArchitectureParseError(s.to_string())),
        }
    }
}

impl std::fmt::Display for Architecture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when an architecture designator cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchitectureParseError(pub String);

impl std::fmt::Display for ArchitectureParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let valid: Vec<&str> = Architecture::VALUES.iter().map(|a| a.as_str()).collect();
        if self.0.is_empty() {
            write!(
                f,
                "empty architecture designator, valid values: {}",
                valid.join(", ")
            )
        } else {
            write!(
                f,
                "invalid architecture '{}', valid values: {}",
                self.0,
                valid.join(", ")
            )
        }
    }
}

impl std::error::Error for ArchitectureParseError {}

/// Resolve a designator into concrete architectures.
///
/// The designator is split on commas and each token parsed; `any` is
/// expanded, duplicates are dropped keeping first-seen order. The result is
/// never empty and never contains [`Architecture::Any`].
pub fn resolve_arches(designator: &str) -> Result<Vec<Architecture>, ArchitectureParseError> {
    let mut resolved = Vec::new();

    for token in designator.split(',').map(str::trim) {
        let arch: Architecture = token.parse()?;
        for concrete in arch.expand() {
            if !resolved.contains(concrete) {
                resolved.push(*concrete);
            }
        }
    }

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_resolves_to_single_arch() {
        assert_eq!(resolve_arches("all").unwrap(), vec![Architecture::All]);
    }

    #[test]
    fn test_any_expands_to_concrete_arches() {
        let arches = resolve_arches("any").unwrap();
        assert_eq!(arches, ANY_EXPANSION.to_vec());
        assert!(arches.iter().all(|a| !a.is_multi()));
    }

    #[test]
    fn test_list_is_deduplicated_in_input_order() {
        let arches = resolve_arches("amd64, arm64,amd64,any").unwrap();
        assert_eq!(
            arches,
            vec![
                Architecture::Amd64,
                Architecture::Arm64,
                Architecture::I386,
                Architecture::Armhf,
            ]
        );
    }

    #[test]
    fn test_unknown_token_is_rejected() {
        let err = resolve_arches("amd64,sparc9000").unwrap_err();
        assert_eq!(err, ArchitectureParseError("sparc9000".to_string()));
        assert!(err.to_string().contains("valid values"));
    }

    #[test]
    fn test_empty_designator_is_rejected() {
        assert!(resolve_arches("").is_err());
        assert!(resolve_arches("amd64,").is_err());
    }

    #[test]
    fn test_round_trip_names() {
        for arch in Architecture::VALUES {
            assert_eq!(arch.as_str().parse::<Architecture>().unwrap(), *arch);
        }
    }
}
