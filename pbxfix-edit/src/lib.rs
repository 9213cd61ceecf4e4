//! Edit engine for pbxfix.
//!
//! Responsibilities:
//! - Run the resource and source removal passes over a manifest (in-memory).
//! - Persist the result: backup first, then an atomic replace, only when content changed.
//! - Generate a unified diff preview.

pub mod error;
pub mod passes;
mod write;

pub use error::{IoStage, PatchError, PatchResult};
pub use passes::{
    dedupe_source_refs, patch_content, strip_resource_refs, PatchedContent, SourcePassOutcome,
};
pub use write::backup_path;

use camino::Utf8Path;
use diffy::PatchFormatter;
use fs_err as fs;
use pbxfix_types::report::{PatchReport, ResourcePassReport, SourcePassReport, ToolInfo};
use pbxfix_types::rules::PatchRules;
use sha2::{Digest, Sha256};
use std::io;
use tracing::{debug, info};

pub const DEFAULT_BACKUP_SUFFIX: &str = ".backup";

#[derive(Debug, Clone)]
pub struct PatchOptions {
    /// Compute the patch but write nothing.
    pub dry_run: bool,
    pub backup_suffix: String,
}

impl Default for PatchOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            backup_suffix: DEFAULT_BACKUP_SUFFIX.to_string(),
        }
    }
}

/// Patch the manifest at `path` in place.
///
/// Returns the report and a unified diff (empty when nothing changed). When the content
/// changes and `opts.dry_run` is false, the untouched original is written and synced to
/// `<path><suffix>` before the manifest itself is replaced. An existing backup is kept;
/// the new one then goes to the first free `<path><suffix>.<n>`.
pub fn patch_manifest(
    path: &Utf8Path,
    rules: &PatchRules,
    tool: ToolInfo,
    opts: &PatchOptions,
) -> PatchResult<(PatchReport, String)> {
    let original = read_manifest(path)?;
    let patched = patch_content(&original, rules)?;

    let mut report = PatchReport::new(tool, path.to_path_buf());
    report.dry_run = opts.dry_run;
    report.sha256_before = sha256_hex(original.as_bytes());
    report.bytes_before = original.len() as u64;
    report.resource = ResourcePassReport {
        file_name: rules.resource.file_name.clone(),
        removed: patched.resource_removed as u64,
    };
    report.source = SourcePassReport {
        file_name: rules.source.file_name.clone(),
        tie_break: rules.source.tie_break,
        found: patched.source.found as u64,
        removed: patched.source.removed as u64,
    };

    if !patched.changed {
        info!("no changes needed for {}", path);
        return Ok((report, String::new()));
    }

    report.changed = true;
    report.sha256_after = Some(sha256_hex(patched.content.as_bytes()));
    report.bytes_after = Some(patched.content.len() as u64);
    let patch = preview_patch(path, &original, &patched.content);

    if opts.dry_run {
        info!("dry-run: {} not written", path);
        return Ok((report, patch));
    }

    let backup = write::write_new_backup(&backup_path(path, &opts.backup_suffix), &original)
        .map_err(|(backup, e)| PatchError::io(IoStage::Backup, backup, e))?;
    debug!("wrote backup {}", backup);

    write::replace_atomically(path, &patched.content)
        .map_err(|e| PatchError::io(IoStage::Write, path, e))?;
    info!("patched {}", path);

    report.written = true;
    report.backup_path = Some(backup);
    Ok((report, patch))
}

fn read_manifest(path: &Utf8Path) -> PatchResult<String> {
    match fs::read_to_string(path) {
        Ok(s) => Ok(s),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(PatchError::NotFound {
            path: path.to_path_buf(),
        }),
        Err(e) => Err(PatchError::io(IoStage::Read, path, e)),
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Git-style unified diff of one file. Empty when `before == after`.
pub fn preview_patch(path: &Utf8Path, before: &str, after: &str) -> String {
    if before == after {
        return String::new();
    }

    let mut out = String::new();
    out.push_str(&format!("diff --git a/{0} b/{0}\n", path));
    out.push_str(&format!("--- a/{0}\n+++ b/{0}\n", path));

    let patch = diffy::create_patch(before, after);
    let rendered = PatchFormatter::new().fmt_patch(&patch).to_string();
    // diffy writes its own "--- original" / "+++ modified" header.
    for line in rendered
        .split_inclusive('\n')
        .skip_while(|l| l.starts_with("---") || l.starts_with("+++"))
    {
        out.push_str(line);
    }
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}
