//! Property-based tests for the removal passes.
//!
//! These tests verify key invariants:
//! - The resource pass removes exactly the matching lines and nothing else
//! - The source pass removes the count the tie-break dictates, never the last survivor
//! - Patching already-patched content under a converging tie-break is a no-op

use pbxfix_edit::{dedupe_source_refs, patch_content, strip_resource_refs};
use pbxfix_types::rules::{PatchRules, ResourceRule, SourceRule, TieBreak};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Line {
    Plain(String),
    InfoPlist(String),
    Market(String),
    Other(String),
}

impl Line {
    fn render(&self) -> String {
        match self {
            Line::Plain(s) => format!("\t\t{s};\n"),
            Line::InfoPlist(id) => format!("\t\t\t\t{id} /* Info.plist in Resources */,\n"),
            Line::Market(id) => format!("\t\t\t\t{id} /* MarketComponents.swift in Sources */,\n"),
            Line::Other(id) => format!("\t\t\t\t{id} /* ContentView.swift in Sources */,\n"),
        }
    }
}

fn arb_id() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-F0-9]{24}").unwrap()
}

fn arb_line() -> impl Strategy<Value = Line> {
    prop_oneof![
        prop::string::string_regex("[a-z]{1,12} = [a-z0-9]{1,8}")
            .unwrap()
            .prop_map(Line::Plain),
        arb_id().prop_map(Line::InfoPlist),
        arb_id().prop_map(Line::Market),
        arb_id().prop_map(Line::Other),
    ]
}

fn arb_manifest() -> impl Strategy<Value = Vec<Line>> {
    prop::collection::vec(arb_line(), 0..24)
}

fn arb_tie_break() -> impl Strategy<Value = TieBreak> {
    prop_oneof![
        Just(TieBreak::RemoveFirst),
        Just(TieBreak::KeepLast),
        Just(TieBreak::KeepFirst),
    ]
}

fn render(lines: &[Line]) -> String {
    lines.iter().map(Line::render).collect()
}

fn count(lines: &[Line], pred: fn(&Line) -> bool) -> usize {
    lines.iter().filter(|l| pred(l)).count()
}

proptest! {
    #[test]
    fn resource_pass_removes_exactly_matching_lines(lines in arb_manifest()) {
        let content = render(&lines);
        let (out, removed) = strip_resource_refs(&content, &ResourceRule::default()).unwrap();

        let expected_removed = count(&lines, |l| matches!(l, Line::InfoPlist(_)));
        prop_assert_eq!(removed, expected_removed);
        prop_assert_eq!(out.lines().count(), lines.len() - expected_removed);

        let kept: Vec<Line> = lines
            .iter()
            .filter(|l| !matches!(l, Line::InfoPlist(_)))
            .cloned()
            .collect();
        prop_assert_eq!(out, render(&kept));
    }

    #[test]
    fn source_pass_removal_count_follows_tie_break(
        lines in arb_manifest(),
        tie_break in arb_tie_break(),
    ) {
        let content = render(&lines);
        let rule = SourceRule { tie_break, ..SourceRule::default() };
        let (out, outcome) = dedupe_source_refs(&content, &rule).unwrap();

        let n = count(&lines, |l| matches!(l, Line::Market(_)));
        let expected = match (tie_break, n) {
            (_, 0 | 1) => 0,
            (TieBreak::RemoveFirst, _) => 1,
            (TieBreak::KeepLast | TieBreak::KeepFirst, _) => n - 1,
        };
        prop_assert_eq!(outcome.found, n);
        prop_assert_eq!(outcome.removed, expected);

        let remaining = out.matches("MarketComponents.swift in Sources").count();
        prop_assert_eq!(remaining, n - expected);
        if n >= 1 {
            prop_assert!(remaining >= 1);
        }
        // Unrelated source references survive.
        prop_assert_eq!(
            out.matches("ContentView.swift in Sources").count(),
            count(&lines, |l| matches!(l, Line::Other(_)))
        );
    }

    #[test]
    fn remove_first_drops_the_first_occurrence(lines in arb_manifest()) {
        let content = render(&lines);
        let (out, _) = dedupe_source_refs(&content, &SourceRule::default()).unwrap();

        let markets: Vec<&String> = lines
            .iter()
            .filter_map(|l| match l { Line::Market(id) => Some(id), _ => None })
            .collect();
        if markets.len() >= 2 {
            let mut expected_lines = lines.clone();
            let first = expected_lines
                .iter()
                .position(|l| matches!(l, Line::Market(_)))
                .unwrap();
            expected_lines.remove(first);
            prop_assert_eq!(out, render(&expected_lines));
        } else {
            prop_assert_eq!(out, content);
        }
    }

    #[test]
    fn converging_tie_breaks_are_idempotent(
        lines in arb_manifest(),
        keep_last in any::<bool>(),
    ) {
        let mut rules = PatchRules::default();
        rules.source.tie_break = if keep_last { TieBreak::KeepLast } else { TieBreak::KeepFirst };

        let once = patch_content(&render(&lines), &rules).unwrap();
        let twice = patch_content(&once.content, &rules).unwrap();

        prop_assert!(!twice.changed);
        prop_assert_eq!(twice.content, once.content);
    }

    #[test]
    fn default_rules_are_idempotent_below_three_duplicates(lines in arb_manifest()) {
        let n = count(&lines, |l| matches!(l, Line::Market(_)));
        prop_assume!(n <= 2);

        let rules = PatchRules::default();
        let once = patch_content(&render(&lines), &rules).unwrap();
        let twice = patch_content(&once.content, &rules).unwrap();

        prop_assert!(!twice.changed);
    }
}
