//! Scenario tests for the filter facade: containment, enumeration, and
//! masking against literal dictionaries and inputs.

use fcfilter_rs::{DictBuilder, Filter, FilterOptions, Match, Normalizer};

fn build_blob(words: &[&str], normalizer: Normalizer) -> Vec<u8> {
    let mut builder = DictBuilder::new(normalizer);
    for w in words {
        builder.add_word(w);
    }
    builder.build().to_bytes()
}

fn filter(words: &[&str]) -> Filter {
    let blob = build_blob(words, Normalizer::Lowercase);
    Filter::from_bytes(blob, FilterOptions::default()).unwrap()
}

fn find(f: &Filter, text: &str) -> Vec<(u32, u32)> {
    let mut out = [Match::default(); 64];
    let n = f.find_matches(text, &mut out);
    out[..n].iter().map(|m| (m.start, m.len)).collect()
}

struct Scenario {
    input: &'static str,
    contains: bool,
    matches: &'static [(u32, u32)],
    masked: &'static str,
}

#[test]
fn stock_dictionary_scenarios() {
    let f = filter(&["badword", "offensive", "spam", "test"]);
    let scenarios = [
        Scenario {
            input: "this has badword in it",
            contains: true,
            matches: &[(9, 7)],
            masked: "this has ******* in it",
        },
        Scenario {
            input: "BADWORD",
            contains: true,
            matches: &[(0, 7)],
            masked: "*******",
        },
        Scenario {
            input: "this is clean text",
            contains: false,
            matches: &[],
            masked: "this is clean text",
        },
        Scenario {
            input: "bad",
            contains: false,
            matches: &[],
            masked: "bad",
        },
        Scenario {
            input: "badword and spam here",
            contains: true,
            matches: &[(0, 7), (12, 4)],
            masked: "******* and **** here",
        },
    ];

    for s in &scenarios {
        assert_eq!(f.contains(s.input), s.contains, "contains({:?})", s.input);
        assert_eq!(find(&f, s.input), s.matches, "find_all({:?})", s.input);
        assert_eq!(f.mask(s.input), s.masked, "mask({:?})", s.input);
    }
}

#[test]
fn single_letter_dictionary_empty_input() {
    let f = filter(&["a", "b", "c"]);
    assert!(!f.contains(""));
    assert_eq!(find(&f, ""), vec![]);
    assert_eq!(f.mask(""), "");
}

#[test]
fn longest_at_position() {
    let f = filter(&["test", "testing"]);
    assert!(f.contains("testing"));
    assert_eq!(find(&f, "testing"), vec![(0, 7)]);
    assert_eq!(f.mask("testing"), "*******");
}

#[test]
fn fixed_mask_mode() {
    let blob = build_blob(
        &["badword", "offensive", "spam", "test"],
        Normalizer::Lowercase,
    );
    let f = Filter::from_bytes(
        blob,
        FilterOptions {
            fixed_mask: Some("***".to_string()),
            ..FilterOptions::default()
        },
    )
    .unwrap();
    assert_eq!(f.mask("this has badword in it"), "this has *** in it");
}

#[test]
fn substring_semantics() {
    // Deliberate: matches are substrings, not tokens.
    let f = filter(&["ass"]);
    assert!(f.contains("grass"));
    assert_eq!(find(&f, "classic"), vec![(2, 3)]);
}

#[test]
fn mismatched_normalization_degrades_to_case_sensitive() {
    // Dictionary built WITH lowercase, queried with normalization off.
    let blob = build_blob(&["badword"], Normalizer::Lowercase);
    let f = Filter::from_bytes(
        blob,
        FilterOptions {
            normalize: false,
            ..FilterOptions::default()
        },
    )
    .unwrap();
    assert!(f.contains("badword"));
    assert!(!f.contains("BADWORD"));
}

#[test]
fn unicode_dictionary_words() {
    let f = filter(&["schlüssel", "σοφια"]);
    assert!(f.contains("der SCHLÜSSEL hier"));
    assert!(f.contains("ΣΟΦΙΑ"));
    assert_eq!(f.mask("der SCHLÜSSEL hier"), "der ********* hier");
}

#[test]
fn offsets_are_utf16_code_units() {
    let f = filter(&["spam"]);
    // The emoji occupies two code units, so the match starts at 2.
    assert_eq!(find(&f, "😀spam"), vec![(2, 4)]);
}

#[test]
fn results_are_ordered_and_disjoint() {
    let f = filter(&["ab", "ba"]);
    let matches = find(&f, "ababab");
    let mut prev_end = 0u32;
    for (start, len) in &matches {
        assert!(*start >= prev_end, "overlap at {start}");
        assert!(*len > 0);
        prev_end = start + len;
    }
    assert!(!matches.is_empty());
}

#[test]
fn deterministic_across_invocations() {
    let f = filter(&["badword", "spam", "test"]);
    let text = "test badword spam test badword";
    let first = find(&f, text);
    for _ in 0..8 {
        assert_eq!(find(&f, text), first);
    }
}
