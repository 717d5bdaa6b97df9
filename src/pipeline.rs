use crate::boundary::plan_boundaries;
use crate::config::ParseOptions;
use crate::merge::GlobalAggregate;
use crate::partial::{read_and_remove_spill, sweep_stale_spills, write_spill, PartialResult};
use crate::progress::make_progress_bar_labeled;
use crate::scanner::scan_range;
use crate::util::init_tracing_once;
use crate::writer::write_report;
use anyhow::{Context, Result};
use rayon::prelude::*;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// The visit-log map/reduce pipeline: plan byte-aligned ranges, scan them in
/// a dedicated worker pool, merge the partials sequentially, stream the JSON
/// report. Workers exchange owned `PartialResult`s in memory by default; a
/// spill directory routes them through per-worker files instead, with
/// identical output.
#[derive(Clone)]
pub struct VisitETL {
    pub(crate) opts: ParseOptions,
}

/// What a completed run did, for callers that want more than the output file.
#[derive(Clone, Copy, Debug)]
pub struct ParseSummary {
    pub records: u64,
    pub dropped_short: u64,
    pub suspect: u64,
    pub paths: usize,
    pub days: usize,
    pub workers: usize,
}

/// Default parallelism: the machine's CPUs minus headroom for the parent and
/// the OS, clamped to [2, 16].
pub fn default_worker_count() -> usize {
    let hw = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(4);
    hw.saturating_sub(2).clamp(2, 16)
}

impl VisitETL {
    pub fn new() -> Self {
        Self { opts: ParseOptions::default() }
    }

    // -------- Builder methods --------
    pub fn workers(mut self, n: usize) -> Self { self.opts = self.opts.with_workers(n); self }
    pub fn chunk_bytes(mut self, bytes: usize) -> Self { self.opts = self.opts.with_chunk_bytes(bytes); self }
    pub fn write_buffer(mut self, bytes: usize) -> Self { self.opts = self.opts.with_write_buffer(bytes); self }
    pub fn spill_dir(mut self, dir: impl AsRef<Path>) -> Self { self.opts = self.opts.with_spill_dir(dir); self }
    pub fn validate(mut self, yes: bool) -> Self { self.opts = self.opts.with_validate(yes); self }
    pub fn progress(mut self, yes: bool) -> Self { self.opts = self.opts.with_progress(yes); self }
    pub fn progress_label(mut self, label: impl Into<String>) -> Self { self.opts = self.opts.with_progress_label(label); self }

    /// Run the full pipeline: `input` visit log in, `output` JSON report out.
    ///
    /// Any failure aborts the whole run with no partial output: a pool that
    /// cannot start (spawn phase), a read error inside a worker (scan phase),
    /// or a missing/malformed spill file (merge phase) all surface here.
    pub fn parse(&self, input: &Path, output: &Path) -> Result<ParseSummary> {
        init_tracing_once();

        let file_size = fs::metadata(input)
            .with_context(|| format!("stat {}", input.display()))?
            .len();
        let workers = self.opts.workers.unwrap_or_else(default_worker_count);

        // Strictly sequential, and done before any worker starts.
        let boundaries = plan_boundaries(input, file_size, workers)?;
        let ranges: Vec<(u64, u64)> = boundaries.windows(2).map(|w| (w[0], w[1])).collect();
        tracing::info!(file_size, workers, "planned {} scan ranges", ranges.len());

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .context("starting worker pool (spawn phase)")?;

        let pb = if self.opts.progress {
            Some(make_progress_bar_labeled(file_size, self.opts.progress_label.as_deref()))
        } else {
            None
        };

        let chunk_bytes = self.opts.chunk_bytes;
        let validate = self.opts.validate;

        // Map phase (fork/join barrier: collect joins every worker), then the
        // single-threaded reduce. Absorbing in worker-index order keeps path
        // discovery order equal to file order for any worker count.
        let mut agg = GlobalAggregate::new();
        if let Some(dir) = &self.opts.spill_dir {
            fs::create_dir_all(dir)
                .with_context(|| format!("preparing spill dir {}", dir.display()))?;
            let run_id = std::process::id();
            let swept = sweep_stale_spills(dir, run_id)?;
            if swept > 0 {
                tracing::warn!(swept, "removed stale partials left by a previous run");
            }

            let spilled: Vec<PathBuf> = pool.install(|| {
                ranges
                    .par_iter()
                    .enumerate()
                    .map(|(i, &(start, end))| {
                        let part =
                            scan_range(input, start, end, chunk_bytes, validate, pb.clone())?;
                        write_spill(dir, run_id, i, &part)
                    })
                    .collect::<Result<Vec<_>>>()
            })?;

            for path in spilled {
                let part = read_and_remove_spill(&path)
                    .context("collecting worker results (merge phase)")?;
                agg.absorb(part);
            }
        } else {
            let partials: Vec<PartialResult> = pool.install(|| {
                ranges
                    .par_iter()
                    .map(|&(start, end)| {
                        scan_range(input, start, end, chunk_bytes, validate, pb.clone())
                    })
                    .collect::<Result<Vec<_>>>()
            })?;
            for part in partials {
                agg.absorb(part);
            }
        }

        if let Some(pb) = &pb {
            pb.finish_with_message("scan done");
        }

        let out = File::create(output).with_context(|| format!("create {}", output.display()))?;
        let mut w = BufWriter::with_capacity(self.opts.write_buffer_bytes, out);
        write_report(&mut w, &agg)?;
        w.flush()?;

        let stats = agg.stats();
        if stats.dropped_short > 0 {
            tracing::info!(dropped = stats.dropped_short, "short lines contributed no records");
        }
        if validate && stats.suspect > 0 {
            tracing::warn!(suspect = stats.suspect, "lines counted despite failing the shape check");
        }
        tracing::info!(
            records = stats.records,
            paths = agg.path_count(),
            days = agg.day_count(),
            "report written to {}",
            output.display()
        );

        Ok(ParseSummary {
            records: stats.records,
            dropped_short: stats.dropped_short,
            suspect: stats.suspect,
            paths: agg.path_count(),
            days: agg.day_count(),
            workers,
        })
    }
}

impl Default for VisitETL {
    fn default() -> Self {
        Self::new()
    }
}
