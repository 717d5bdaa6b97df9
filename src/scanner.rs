//! The range scanner worker: chunked scan of one byte range into a
//! dictionary-compressed partial count table.

use crate::boundary::read_up_to;
use crate::intern::{DayId, Interner, PathId};
use crate::matrix::CountMatrix;
use crate::partial::PartialResult;
use crate::record::{decode_line, looks_well_formed};
use anyhow::{Context, Result};
use indicatif::ProgressBar;
use memchr::memchr_iter;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Seek, SeekFrom};
use std::path::Path;

/// Default chunk size; large enough to amortize I/O on spinning and NVMe disks.
pub const DEFAULT_CHUNK_BYTES: usize = 8 * 1024 * 1024;

/// Per-worker counters carried inside the partial result.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct ScanStats {
    /// Lines decoded and counted.
    pub records: u64,
    /// Lines below the fixed-layout minimum, silently dropped.
    pub dropped_short: u64,
    /// Lines counted despite failing the shape check (validate mode only).
    pub suspect: u64,
}

impl ScanStats {
    pub fn merge(&mut self, other: ScanStats) {
        self.records += other.records;
        self.dropped_short += other.dropped_short;
        self.suspect += other.suspect;
    }
}

/// Scan `[start, end)` of `input` and return the local partial aggregate.
///
/// Reads fixed-size chunks; a line spanning a chunk boundary is reassembled by
/// carrying its unterminated tail into the next chunk. A trailing tail at
/// end-of-range is decoded as one final record when long enough (the file's
/// last line without a newline); shorter tails fall under the short-line drop.
pub fn scan_range(
    input: &Path,
    start: u64,
    end: u64,
    chunk_bytes: usize,
    validate: bool,
    pb: Option<ProgressBar>,
) -> Result<PartialResult> {
    let mut local = LocalCounts::default();

    if end > start {
        let mut file =
            File::open(input).with_context(|| format!("open {} for scan", input.display()))?;
        file.seek(SeekFrom::Start(start))?;

        let chunk_bytes = chunk_bytes.max(64 * 1024);
        let mut chunk = vec![0u8; chunk_bytes];
        let mut carry: Vec<u8> = Vec::new();
        let mut remaining = end - start;

        while remaining > 0 {
            let want = chunk_bytes.min(remaining as usize);
            let n = read_up_to(&mut file, &mut chunk[..want])
                .with_context(|| format!("read {} at range scan", input.display()))?;
            if n == 0 {
                break;
            }
            remaining -= n as u64;

            let data = &chunk[..n];
            let mut pos = 0;
            for nl in memchr_iter(b'\n', data) {
                if carry.is_empty() {
                    local.count_line(&data[pos..nl], validate);
                } else {
                    carry.extend_from_slice(&data[pos..nl]);
                    local.count_line(&carry, validate);
                    carry.clear();
                }
                pos = nl + 1;
            }
            carry.extend_from_slice(&data[pos..]);

            if let Some(pb) = &pb {
                pb.inc(n as u64);
            }
        }

        // Unterminated tail at end-of-range: the file's final line.
        if !carry.is_empty() {
            local.count_line(&carry, validate);
        }
    }

    Ok(local.into_partial())
}

/// Worker-local interners + count matrix, grown in lockstep.
#[derive(Default)]
struct LocalCounts {
    paths: Interner<PathId>,
    days: Interner<DayId>,
    counts: CountMatrix,
    stats: ScanStats,
}

impl LocalCounts {
    fn count_line(&mut self, line: &[u8], validate: bool) {
        // A trailing \r (CRLF input) would otherwise shift the date window.
        let line = match line.last() {
            Some(b'\r') => &line[..line.len() - 1],
            _ => line,
        };
        let Some((path, day)) = decode_line(line) else {
            self.stats.dropped_short += 1;
            return;
        };
        if validate && !looks_well_formed(line) {
            self.stats.suspect += 1;
            tracing::debug!(len = line.len(), "counting line that fails the shape check");
        }

        let path = String::from_utf8_lossy(path);
        let day = String::from_utf8_lossy(day);

        let (day_id, new_day) = self.days.intern(&day);
        if new_day {
            self.counts.push_day_column();
        }
        let (path_id, new_path) = self.paths.intern(&path);
        if new_path {
            self.counts.push_path_row();
        }
        self.counts.add(path_id, day_id, 1);
        self.stats.records += 1;
    }

    fn into_partial(self) -> PartialResult {
        PartialResult {
            paths: self.paths.into_keys(),
            days: self.days.into_keys(),
            counts: self.counts.into_rows(),
            stats: self.stats,
        }
    }
}
