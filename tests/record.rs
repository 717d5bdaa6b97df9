#[path = "common/mod.rs"]
mod common;

use common::*;
use vetl::{decode_line, looks_well_formed, MIN_LINE_LEN};

#[test]
fn decodes_path_and_day_from_fixed_offsets() {
    let l = line("/a", "2024-01-02");
    let stripped = l.trim_end_matches('\n').as_bytes();
    let (path, day) = decode_line(stripped).unwrap();
    assert_eq!(path, b"/a");
    assert_eq!(day, b"2024-01-02");
}

#[test]
fn short_lines_are_unparseable() {
    assert!(decode_line(b"").is_none());
    assert!(decode_line(b"https://example.com,2024-01-01").is_none());
    let just_short = vec![b'x'; MIN_LINE_LEN - 1];
    assert!(decode_line(&just_short).is_none());
}

#[test]
fn exactly_minimum_length_yields_empty_path() {
    let l = line("", "2024-01-01");
    let stripped = l.trim_end_matches('\n').as_bytes();
    assert_eq!(stripped.len(), MIN_LINE_LEN);
    let (path, day) = decode_line(stripped).unwrap();
    assert_eq!(path, b"");
    assert_eq!(day, b"2024-01-01");
}

// The layout is a structural assumption: long-enough lines of the wrong shape
// still decode (to garbage) rather than erroring. The shape check is the only
// place that notices, and it never blocks counting.
#[test]
fn long_misshapen_lines_decode_to_garbage() {
    let garbage = vec![b'z'; MIN_LINE_LEN + 7];
    assert!(decode_line(&garbage).is_some());
    assert!(!looks_well_formed(&garbage));
}

#[test]
fn shape_check_accepts_conforming_lines() {
    let l = line("/blog/post-1", "2023-07-15");
    assert!(looks_well_formed(l.trim_end_matches('\n').as_bytes()));

    // Comma in the wrong spot.
    let bad = "https://example.com/a;2024-01-02T00:00:00+00:00";
    assert!(!looks_well_formed(bad.as_bytes()));

    // Day portion is not digits-and-dashes.
    let bad_day = "https://example.com/a,XXXX-01-02T00:00:00+00:00";
    assert!(!looks_well_formed(bad_day.as_bytes()));
}
