use crate::rules::TieBreak;
use camino::Utf8PathBuf;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Outcome of one run of the patcher against one manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatchReport {
    pub schema: String,
    pub tool: ToolInfo,
    pub manifest: Utf8PathBuf,
    pub generated_at: DateTime<Utc>,

    pub resource: ResourcePassReport,
    pub source: SourcePassReport,

    /// Patched content differs from what was read.
    pub changed: bool,
    /// The manifest (and its backup) were written to disk.
    pub written: bool,
    pub dry_run: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_path: Option<Utf8PathBuf>,

    pub sha256_before: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256_after: Option<String>,

    pub bytes_before: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytes_after: Option<u64>,
}

impl PatchReport {
    pub fn new(tool: ToolInfo, manifest: Utf8PathBuf) -> Self {
        Self {
            schema: crate::schema::PBXFIX_REPORT_V1.to_string(),
            tool,
            manifest,
            generated_at: Utc::now(),
            resource: ResourcePassReport::default(),
            source: SourcePassReport::default(),
            changed: false,
            written: false,
            dry_run: false,
            backup_path: None,
            sha256_before: String::new(),
            sha256_after: None,
            bytes_before: 0,
            bytes_after: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcePassReport {
    pub file_name: String,
    /// Lines removed.
    pub removed: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcePassReport {
    pub file_name: String,
    pub tie_break: TieBreak,
    /// Occurrences matched before any removal.
    pub found: u64,
    pub removed: u64,
}
