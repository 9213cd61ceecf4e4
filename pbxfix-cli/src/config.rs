//! Configuration file loading for pbxfix.
//!
//! Discovers and loads `pbxfix.toml` from the working directory.
//! Merges config file settings with CLI arguments (CLI takes precedence).

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use pbxfix_edit::DEFAULT_BACKUP_SUFFIX;
use pbxfix_types::rules::{PatchRules, TieBreak};
use serde::Deserialize;
use tracing::debug;

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "pbxfix.toml";

/// Top-level configuration from pbxfix.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PbxfixConfig {
    /// Which files the two passes target.
    pub rules: RulesConfig,

    /// Backup settings.
    pub backups: BackupsConfig,
}

/// Rules section of the config. Unset fields fall back to the built-in rules.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// File whose `in Resources` lines are stripped.
    pub resource_file: Option<String>,

    /// File whose duplicate `in Sources` references are collapsed.
    pub source_file: Option<String>,

    /// Which duplicates are removed.
    pub tie_break: Option<TieBreak>,
}

/// Backups section of the config.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackupsConfig {
    /// Suffix appended to the manifest path for the backup copy.
    pub suffix: String,
}

impl Default for BackupsConfig {
    fn default() -> Self {
        Self {
            suffix: DEFAULT_BACKUP_SUFFIX.to_string(),
        }
    }
}

/// Discover the pbxfix.toml config file in `dir`.
pub fn discover_config(dir: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

/// Load and parse a pbxfix.toml config file.
pub fn load_config(path: &Utf8Path) -> anyhow::Result<PbxfixConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    parse_config(&contents).with_context(|| format!("parse config file {}", path))
}

/// Parse a config file from a string.
pub fn parse_config(contents: &str) -> anyhow::Result<PbxfixConfig> {
    let config: PbxfixConfig = toml::from_str(contents).context("invalid TOML")?;
    Ok(config)
}

/// Load config from `dir`, or return default if not found.
pub fn load_or_default(dir: &Utf8Path) -> anyhow::Result<PbxfixConfig> {
    match discover_config(dir) {
        Some(path) => load_config(&path),
        None => Ok(PbxfixConfig::default()),
    }
}

/// Configuration after CLI overrides have been applied.
#[derive(Debug, Clone)]
pub struct MergedConfig {
    pub rules: PatchRules,
    pub backup_suffix: String,
}

/// CLI values that may override the config file.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub resource_file: Option<String>,
    pub source_file: Option<String>,
    pub tie_break: Option<TieBreak>,
    pub backup_suffix: Option<String>,
}

/// Builder for merging config file with CLI arguments.
pub struct ConfigMerger {
    config: PbxfixConfig,
}

impl ConfigMerger {
    pub fn new(config: PbxfixConfig) -> Self {
        Self { config }
    }

    /// CLI values win; then the config file; then the built-in defaults.
    pub fn merge(self, cli: CliOverrides) -> MergedConfig {
        let mut rules = PatchRules::default();

        if let Some(file) = cli.resource_file.or(self.config.rules.resource_file) {
            rules.resource.file_name = file;
        }
        if let Some(file) = cli.source_file.or(self.config.rules.source_file) {
            rules.source.file_name = file;
        }
        if let Some(tb) = cli.tie_break.or(self.config.rules.tie_break) {
            rules.source.tie_break = tb;
        }

        MergedConfig {
            rules,
            backup_suffix: cli.backup_suffix.unwrap_or(self.config.backups.suffix),
        }
    }
}
