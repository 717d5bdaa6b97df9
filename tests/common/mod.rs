use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use vetl::VisitETL;

/// Scheme+host prefix used by the corpus; exactly 19 bytes per the layout.
pub const HOST: &str = "https://example.com";

/// Pads a `YYYY-MM-DD` day out to the full 25-byte ISO-8601 date field.
pub const DATE_SUFFIX: &str = "T00:00:00+00:00";

/// One conforming record line, trailing newline included.
pub fn line(path: &str, day: &str) -> String {
    format!("{HOST}{path},{day}{DATE_SUFFIX}\n")
}

/// Write `content` as a fixture log under `dir` and return its path.
pub fn write_log(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

pub fn tempdir() -> TempDir {
    tempfile::tempdir().unwrap()
}

/// Run the pipeline quietly at the given worker count and return the report bytes.
pub fn run_with_workers(input: &Path, workers: usize) -> String {
    let out = input.with_extension(format!("w{workers}.json"));
    VisitETL::new()
        .progress(false)
        .workers(workers)
        .parse(input, &out)
        .unwrap();
    fs::read_to_string(&out).unwrap()
}

/// Deterministic synthetic corpus: `lines` records over a small path/day pool,
/// driven by a fixed LCG so every run (and every worker split) sees the same bytes.
pub fn synth_corpus(lines: usize) -> String {
    const PATHS: [&str; 6] = ["/", "/about", "/blog/post-1", "/contact", "/blog/post-2", ""];
    const DAYS: [&str; 4] = ["2023-01-01", "2023-01-02", "2023-02-11", "2024-12-31"];

    let mut state: u64 = 0x9e37_79b9_7f4a_7c15;
    let mut out = String::new();
    for _ in 0..lines {
        state = state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        let p = PATHS[(state >> 33) as usize % PATHS.len()];
        let d = DAYS[(state >> 12) as usize % DAYS.len()];
        out.push_str(&line(p, d));
    }
    out
}
