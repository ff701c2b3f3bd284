//! Repository configuration (`.patchvault.toml`).
//!
//! Defines the typed configuration read from the repository root. A missing
//! file means all defaults (no error); a present-but-broken file is a
//! [`ConfigError`]. Command-line flags always win over configured values.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Name of the configuration file at the repository root.
pub const CONFIG_FILE: &str = ".patchvault.toml";

// ---------------------------------------------------------------------------
// VaultConfig
// ---------------------------------------------------------------------------

/// Top-level configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VaultConfig {
    /// Vault storage settings.
    #[serde(default)]
    pub vault: VaultSection,

    /// Collection defaults.
    #[serde(default)]
    pub collect: CollectSection,
}

impl VaultConfig {
    /// Load configuration from `<repo_root>/.patchvault.toml`.
    ///
    /// Missing file → defaults.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] when the file exists but cannot be read or parsed.
    pub fn load(repo_root: &Path) -> Result<Self, ConfigError> {
        let path = repo_root.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&path).map_err(|e| ConfigError {
            path: Some(path.clone()),
            message: e.to_string(),
        })?;
        toml::from_str(&raw).map_err(|e| ConfigError {
            path: Some(path),
            message: e.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// VaultSection
// ---------------------------------------------------------------------------

/// Where artifacts are stored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VaultSection {
    /// Vault root directory. No default: when unset, the CLI requires
    /// `--vault`.
    #[serde(default)]
    pub root: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// CollectSection
// ---------------------------------------------------------------------------

/// Defaults for `patchvault collect`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CollectSection {
    /// Keep going after a step fails, aggregating errors.
    #[serde(default)]
    pub best_effort: bool,

    /// How many stash entries `--stash` collects when no count is given;
    /// negative means all.
    #[serde(default = "default_stash_count")]
    pub stash_count: i64,

    /// How many commits `--previous` collects when no count is given.
    #[serde(default = "default_previous_count")]
    pub previous_count: usize,
}

impl Default for CollectSection {
    fn default() -> Self {
        Self {
            best_effort: false,
            stash_count: default_stash_count(),
            previous_count: default_previous_count(),
        }
    }
}

const fn default_stash_count() -> i64 {
    -1
}

const fn default_previous_count() -> usize {
    1
}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// The configuration file could not be loaded or parsed.
#[derive(Debug)]
pub struct ConfigError {
    /// Path to the configuration file, when known.
    pub path: Option<PathBuf>,
    /// Human-readable description of the problem.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(
                f,
                "configuration error in '{}': {}\n  To fix: edit the config file and correct the issue.",
                path.display(),
                self.message
            ),
            None => write!(f, "configuration error: {}", self.message),
        }
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let cfg = VaultConfig::load(dir.path()).unwrap();
        assert_eq!(cfg, VaultConfig::default());
        assert!(cfg.vault.root.is_none());
        assert!(!cfg.collect.best_effort);
        assert_eq!(cfg.collect.stash_count, -1);
        assert_eq!(cfg.collect.previous_count, 1);
    }

    #[test]
    fn full_file_parses() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            r#"
[vault]
root = "/var/patchvault"

[collect]
best_effort = true
stash_count = 3
previous_count = 5
"#,
        )
        .unwrap();

        let cfg = VaultConfig::load(dir.path()).unwrap();
        assert_eq!(cfg.vault.root, Some(PathBuf::from("/var/patchvault")));
        assert!(cfg.collect.best_effort);
        assert_eq!(cfg.collect.stash_count, 3);
        assert_eq!(cfg.collect.previous_count, 5);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "[collect]\nbest_effort = true\n",
        )
        .unwrap();

        let cfg = VaultConfig::load(dir.path()).unwrap();
        assert!(cfg.vault.root.is_none());
        assert!(cfg.collect.best_effort);
        assert_eq!(cfg.collect.stash_count, -1);
    }

    #[test]
    fn unknown_field_is_rejected() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "[vault]\nroto = \"/x\"\n").unwrap();

        let err = VaultConfig::load(dir.path()).unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains(CONFIG_FILE), "got: {msg}");
        assert!(msg.contains("To fix"), "got: {msg}");
    }

    #[test]
    fn broken_toml_is_a_config_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "[vault\n").unwrap();
        assert!(VaultConfig::load(dir.path()).is_err());
    }
}
