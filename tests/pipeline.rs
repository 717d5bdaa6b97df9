#[path = "common/mod.rs"]
mod common;

use common::*;
use serde_json::Value;
use std::collections::BTreeMap;
use vetl::VisitETL;

#[test]
fn produces_the_reference_report() {
    let dir = tempdir();
    let content = format!(
        "{}{}{}",
        line("/a", "2024-01-02"),
        line("/a", "2024-01-02"),
        line("/b", "2024-01-01"),
    );
    let input = write_log(dir.path(), "visits.log", &content);

    let expected = concat!(
        "{\n",
        "    \"\\/a\": {\n",
        "        \"2024-01-02\": 2\n",
        "    },\n",
        "    \"\\/b\": {\n",
        "        \"2024-01-01\": 1\n",
        "    }\n",
        "}"
    );

    assert_eq!(run_with_workers(&input, 1), expected);
    // A split mid-file must not change a single byte.
    assert_eq!(run_with_workers(&input, 2), expected);
}

#[test]
fn worker_count_never_changes_the_output() {
    let dir = tempdir();
    let input = write_log(dir.path(), "visits.log", &synth_corpus(500));

    let reference = run_with_workers(&input, 1);
    for workers in [2, 7, 16] {
        assert_eq!(run_with_workers(&input, workers), reference, "workers={workers}");
    }
}

#[test]
fn reruns_are_deterministic() {
    let dir = tempdir();
    let input = write_log(dir.path(), "visits.log", &synth_corpus(200));
    assert_eq!(run_with_workers(&input, 7), run_with_workers(&input, 7));
}

#[test]
fn day_counts_sum_to_input_lines() {
    let dir = tempdir();
    let content = synth_corpus(300);
    let input = write_log(dir.path(), "visits.log", &content);

    // Expected per-path totals straight from the fixture lines.
    let mut expected = BTreeMap::<String, u64>::new();
    for l in content.lines() {
        let path = &l[HOST.len()..l.len() - 26];
        *expected.entry(path.to_string()).or_insert(0) += 1;
    }

    let report: Value = serde_json::from_str(&run_with_workers(&input, 4)).unwrap();
    let obj = report.as_object().unwrap();
    assert_eq!(obj.len(), expected.len());
    for (path, days) in obj {
        let total: u64 = days.as_object().unwrap().values().map(|v| v.as_u64().unwrap()).sum();
        assert_eq!(total, expected[path], "path {path}");
    }
}

#[test]
fn day_keys_are_sorted_and_nonzero() {
    let dir = tempdir();
    let input = write_log(dir.path(), "visits.log", &synth_corpus(250));

    let report: Value = serde_json::from_str(&run_with_workers(&input, 3)).unwrap();
    for (path, days) in report.as_object().unwrap() {
        let keys: Vec<&String> = days.as_object().unwrap().keys().collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted, "days out of order for {path}");
        for v in days.as_object().unwrap().values() {
            assert!(v.as_u64().unwrap() > 0);
        }
    }
}

#[test]
fn paths_keep_first_appearance_order() {
    let dir = tempdir();
    let content = format!(
        "{}{}{}{}",
        line("/z", "2024-01-01"),
        line("/a", "2024-01-01"),
        line("/z", "2024-01-02"),
        line("/m", "2024-01-01"),
    );
    let input = write_log(dir.path(), "visits.log", &content);

    for workers in [1, 3] {
        let report = run_with_workers(&input, workers);
        let z = report.find("\\/z").unwrap();
        let a = report.find("\\/a").unwrap();
        let m = report.find("\\/m").unwrap();
        assert!(z < a && a < m, "workers={workers}");
    }
}

#[test]
fn short_lines_contribute_nothing() {
    let dir = tempdir();
    let content = format!(
        "{}noise\n\n{}{}",
        line("/a", "2024-01-01"),
        line("/a", "2024-01-01"),
        "https://example.com/x,2024", // truncated final line, no newline
    );
    let input = write_log(dir.path(), "visits.log", &content);

    let out = dir.path().join("report.json");
    let summary = VisitETL::new().progress(false).workers(2).parse(&input, &out).unwrap();
    assert_eq!(summary.records, 2);
    assert_eq!(summary.dropped_short, 3);

    let report: Value = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(report.as_object().unwrap().len(), 1);
    assert_eq!(report["/a"]["2024-01-01"], 2);
}

#[test]
fn minimum_length_line_counts_under_the_empty_path() {
    let dir = tempdir();
    let input = write_log(dir.path(), "visits.log", &line("", "2024-03-09"));

    let report: Value = serde_json::from_str(&run_with_workers(&input, 1)).unwrap();
    assert_eq!(report[""]["2024-03-09"], 1);
}

#[test]
fn empty_input_writes_an_empty_object() {
    let dir = tempdir();
    let input = write_log(dir.path(), "visits.log", "");
    assert_eq!(run_with_workers(&input, 4), "{}");
}

#[test]
fn report_has_no_trailing_newline() {
    let dir = tempdir();
    let input = write_log(dir.path(), "visits.log", &synth_corpus(10));
    assert!(!run_with_workers(&input, 2).ends_with('\n'));
}

#[test]
fn validate_mode_counts_suspect_lines_without_changing_output() {
    let dir = tempdir();
    // Long enough, wrong shape: decodes to garbage and is counted either way.
    let misshapen = "zzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzz\n";
    let content = format!("{}{}", line("/a", "2024-01-01"), misshapen);
    let input = write_log(dir.path(), "visits.log", &content);

    let out_plain = dir.path().join("plain.json");
    let out_validated = dir.path().join("validated.json");
    let plain = VisitETL::new().progress(false).workers(1).parse(&input, &out_plain).unwrap();
    let validated = VisitETL::new()
        .progress(false)
        .workers(1)
        .validate(true)
        .parse(&input, &out_validated)
        .unwrap();

    assert_eq!(plain.suspect, 0);
    assert_eq!(validated.suspect, 1);
    assert_eq!(plain.records, validated.records);
    assert_eq!(
        std::fs::read_to_string(&out_plain).unwrap(),
        std::fs::read_to_string(&out_validated).unwrap()
    );
}
