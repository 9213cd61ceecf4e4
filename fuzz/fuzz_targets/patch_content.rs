#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use pbxfix_edit::patch_content;
use pbxfix_types::rules::{PatchRules, TieBreak};

#[derive(Debug, Arbitrary)]
struct Input {
    content: String,
    tie_break: u8,
}

fuzz_target!(|input: Input| {
    let mut rules = PatchRules::default();
    rules.source.tie_break = TieBreak::ALL[input.tie_break as usize % TieBreak::ALL.len()];

    let Ok(once) = patch_content(&input.content, &rules) else { return };

    // Removal only: never grows, never drops the last reference.
    assert!(once.content.len() <= input.content.len());
    assert!(once.source.found == 0 || once.source.removed < once.source.found);
    assert_eq!(once.changed, once.content != input.content);
    assert_eq!(
        once.source.removed,
        rules.source.tie_break.removals(once.source.found).len()
    );
});
