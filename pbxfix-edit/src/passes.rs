//! The two removal passes. Both are pure functions over the manifest text.

use pbxfix_types::rules::{PatchRules, ResourceRule, SourceRule, RESOURCES_ROLE, SOURCES_ROLE};
use regex::Regex;
use std::ops::Range;
use tracing::debug;

/// Build-file object ids are 24 uppercase hex digits.
const OBJECT_ID: &str = r"[A-F0-9]{24}";

fn resource_line_regex(file_name: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(
        r"^[ \t]*{OBJECT_ID}[ \t]+/\* {} in {RESOURCES_ROLE} \*/,?[ \t]*$",
        regex::escape(file_name)
    ))
}

fn source_ref_regex(file_name: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(
        r"\b{OBJECT_ID}[ \t]+/\* {} in {SOURCES_ROLE} \*/,?",
        regex::escape(file_name)
    ))
}

/// Pass A. Drops every line that is exactly a `<id> /* <file> in Resources */` entry.
///
/// Lines are compared without their terminator; removed lines take their `\n`
/// (or `\r\n`) with them. Returns the new content and the number of lines removed.
pub fn strip_resource_refs(
    content: &str,
    rule: &ResourceRule,
) -> Result<(String, usize), regex::Error> {
    let re = resource_line_regex(&rule.file_name)?;

    let mut out = String::with_capacity(content.len());
    let mut removed = 0;
    for line in content.split_inclusive('\n') {
        let body = line.strip_suffix('\n').unwrap_or(line);
        let body = body.strip_suffix('\r').unwrap_or(body);
        if re.is_match(body) {
            debug!("dropping resource ref: {}", body.trim());
            removed += 1;
            continue;
        }
        out.push_str(line);
    }

    Ok((out, removed))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourcePassOutcome {
    /// Occurrences present before the pass.
    pub found: usize,
    pub removed: usize,
}

/// Pass B. Collapses duplicate `<id> /* <file> in Sources */` references.
///
/// Only references count; `PBXBuildFile` object definitions with the same
/// annotation are left alone.
///
/// Nothing changes unless the reference occurs at least twice. Which occurrences go is
/// decided by the rule's tie-break. A removed occurrence takes its trailing comma, and
/// a line left holding only whitespace is dropped entirely.
pub fn dedupe_source_refs(
    content: &str,
    rule: &SourceRule,
) -> Result<(String, SourcePassOutcome), regex::Error> {
    let re = source_ref_regex(&rule.file_name)?;
    let matches: Vec<Range<usize>> = re
        .find_iter(content)
        .filter(|m| !is_object_definition(&content[m.end()..]))
        .map(|m| m.range())
        .collect();

    let mut outcome = SourcePassOutcome {
        found: matches.len(),
        removed: 0,
    };
    let doomed = rule.tie_break.removals(matches.len());
    if doomed.is_empty() {
        return Ok((content.to_string(), outcome));
    }

    debug!(
        "{} occurrences of {} in {}, removing {} ({})",
        matches.len(),
        rule.file_name,
        SOURCES_ROLE,
        doomed.len(),
        rule.tie_break
    );

    // Back to front so earlier ranges stay valid.
    let mut out = content.to_string();
    for &idx in doomed.iter().rev() {
        let range = removal_range(&out, matches[idx].clone());
        out.replace_range(range, "");
        outcome.removed += 1;
    }

    Ok((out, outcome))
}

/// `<id> /* ... */ = {isa = PBXBuildFile; ... };` defines the build file rather than
/// referencing it from a phase; those are never counted or removed.
fn is_object_definition(rest: &str) -> bool {
    rest.trim_start_matches([' ', '\t']).starts_with('=')
}

/// Widens a match to its whole line when nothing else lives on that line.
fn removal_range(content: &str, matched: Range<usize>) -> Range<usize> {
    let line_start = content[..matched.start]
        .rfind('\n')
        .map(|i| i + 1)
        .unwrap_or(0);
    let line_end = content[matched.end..]
        .find('\n')
        .map(|i| matched.end + i + 1)
        .unwrap_or(content.len());

    let before = &content[line_start..matched.start];
    let after = &content[matched.end..line_end];
    if before.trim().is_empty() && after.trim().is_empty() {
        line_start..line_end
    } else {
        matched
    }
}

/// Result of running both passes over a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchedContent {
    pub content: String,
    pub resource_removed: usize,
    pub source: SourcePassOutcome,
    pub changed: bool,
}

/// Runs the resource pass, then the source pass over its output.
pub fn patch_content(content: &str, rules: &PatchRules) -> Result<PatchedContent, regex::Error> {
    let (stripped, resource_removed) = strip_resource_refs(content, &rules.resource)?;
    let (deduped, source) = dedupe_source_refs(&stripped, &rules.source)?;
    let changed = deduped != content;

    Ok(PatchedContent {
        content: deduped,
        resource_removed,
        source,
        changed,
    })
}
