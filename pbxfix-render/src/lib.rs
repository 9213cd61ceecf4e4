//! Rendering helpers (plain text and markdown) for human-readable reports.

use pbxfix_types::report::PatchReport;
use pbxfix_types::rules::{RESOURCES_ROLE, SOURCES_ROLE};

const NEXT_STEPS: [&str; 4] = [
    "Close Xcode completely",
    "Open Xcode again",
    "Product > Clean Build Folder",
    "Product > Archive",
];

/// Operator-facing status lines, printed to stdout by the CLI.
pub fn render_text(report: &PatchReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("Patching {}\n", report.manifest));
    out.push_str(&format!("- {}\n", resource_line(report)));
    out.push_str(&format!("- {}\n", source_line(report)));

    if !report.changed {
        out.push_str("No changes needed - project file looks correct\n");
        return out;
    }

    if report.dry_run {
        out.push_str("Dry run: changes not written\n");
        return out;
    }

    if let Some(backup) = &report.backup_path {
        out.push_str(&format!("Created backup: {}\n", backup));
    }
    if report.written {
        out.push_str("Project file fixed\n\nNext steps:\n");
        for (i, step) in NEXT_STEPS.iter().enumerate() {
            out.push_str(&format!("{}. {}\n", i + 1, step));
        }
    }

    out
}

pub fn render_md(report: &PatchReport) -> String {
    let mut out = String::new();
    out.push_str("# pbxfix report\n\n");
    out.push_str(&format!("- Manifest: `{}`\n", report.manifest));
    out.push_str(&format!("- Changed: `{}`\n", report.changed));
    out.push_str(&format!("- Written: `{}`\n", report.written));
    if report.dry_run {
        out.push_str("- Dry run: `true`\n");
    }
    if let Some(backup) = &report.backup_path {
        out.push_str(&format!("- Backup: `{}`\n", backup));
    }
    out.push('\n');

    out.push_str("## Passes\n\n");
    out.push_str("| Pass | Pattern | Found | Removed |\n");
    out.push_str("|------|---------|-------|---------|\n");
    out.push_str(&format!(
        "| resource | `{} in {}` | {} | {} |\n",
        report.resource.file_name, RESOURCES_ROLE, report.resource.removed, report.resource.removed
    ));
    out.push_str(&format!(
        "| source ({}) | `{} in {}` | {} | {} |\n",
        report.source.tie_break,
        report.source.file_name,
        SOURCES_ROLE,
        report.source.found,
        report.source.removed
    ));

    out.push_str("\n## Digests\n\n");
    out.push_str(&format!(
        "- Before: `{}` ({} bytes)\n",
        report.sha256_before, report.bytes_before
    ));
    if let (Some(sha), Some(bytes)) = (&report.sha256_after, report.bytes_after) {
        out.push_str(&format!("- After: `{}` ({} bytes)\n", sha, bytes));
    }

    out
}

fn resource_line(report: &PatchReport) -> String {
    let r = &report.resource;
    if r.removed == 0 {
        format!("{} in {}: none found", r.file_name, RESOURCES_ROLE)
    } else {
        format!("{} in {}: removed {} line(s)", r.file_name, RESOURCES_ROLE, r.removed)
    }
}

fn source_line(report: &PatchReport) -> String {
    let s = &report.source;
    if s.removed == 0 {
        format!(
            "{} in {}: no duplicates ({} reference(s))",
            s.file_name, SOURCES_ROLE, s.found
        )
    } else {
        format!(
            "{} in {}: found {} instances, removed {} ({})",
            s.file_name, SOURCES_ROLE, s.found, s.removed, s.tie_break
        )
    }
}
