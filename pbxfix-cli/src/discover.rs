//! Resolve which `project.pbxproj` to patch.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use tracing::debug;

pub const MANIFEST_FILE_NAME: &str = "project.pbxproj";
const PROJECT_EXTENSION: &str = "xcodeproj";

/// Resolve the CLI path argument to a manifest path.
///
/// - an `.xcodeproj` path, existing or not, resolves to its `project.pbxproj`
/// - any other file path (or missing path) is returned as-is
/// - any other directory, or no argument at all, is searched for exactly one `.xcodeproj`
pub fn resolve_manifest(arg: Option<&Utf8Path>) -> anyhow::Result<Utf8PathBuf> {
    let Some(path) = arg else {
        return find_in_dir(Utf8Path::new("."));
    };

    if path.extension() == Some(PROJECT_EXTENSION) && (path.is_dir() || !path.exists()) {
        return Ok(path.join(MANIFEST_FILE_NAME));
    }
    if !path.is_dir() {
        return Ok(path.to_path_buf());
    }
    find_in_dir(path)
}

fn find_in_dir(dir: &Utf8Path) -> anyhow::Result<Utf8PathBuf> {
    let mut projects = Vec::new();
    let entries =
        fs::read_dir(dir.as_std_path()).with_context(|| format!("read directory {}", dir))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("read directory {}", dir))?;
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if Utf8Path::new(&name).extension() == Some(PROJECT_EXTENSION) && entry.path().is_dir() {
            projects.push(name);
        }
    }
    projects.sort();

    match projects.as_slice() {
        [] => anyhow::bail!(
            "no .{} found in {}; pass the path to {}",
            PROJECT_EXTENSION,
            dir,
            MANIFEST_FILE_NAME
        ),
        [one] => {
            let project = if dir.as_str() == "." {
                Utf8PathBuf::from(one)
            } else {
                dir.join(one)
            };
            debug!("discovered project {}", project);
            Ok(project.join(MANIFEST_FILE_NAME))
        }
        many => anyhow::bail!(
            "multiple .{} found in {}: {}; pass one explicitly",
            PROJECT_EXTENSION,
            dir,
            many.join(", ")
        ),
    }
}
