//! One worker's partial aggregate and its binary spill codec.
//!
//! In the default configuration partials never touch disk: workers hand them
//! to the aggregator as owned values. With a spill directory configured, each
//! worker encodes its partial to a uniquely named file which the merge loop
//! reads and deletes. File names embed the process id so a sweep at startup
//! can clear leftovers from a crashed prior run without racing a live one.

use crate::scanner::ScanStats;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const SPILL_PREFIX: &str = "visits_partial_";

/// Local dictionaries plus count table from one worker. `counts` has one row
/// per entry of `paths` and one column per entry of `days`, both in the
/// worker's first-seen order.
#[derive(Debug, Serialize, Deserialize)]
pub struct PartialResult {
    pub paths: Vec<String>,
    pub days: Vec<String>,
    pub counts: Vec<Vec<u64>>,
    pub stats: ScanStats,
}

impl PartialResult {
    /// A partial is well-formed only when `counts` carries one row per path
    /// and one column per day. Corrupted spill bytes can still decode into a
    /// wrong-shaped value, which the merge must reject rather than index.
    pub fn check_shape(&self) -> Result<()> {
        if self.counts.len() != self.paths.len() {
            bail!(
                "{} count rows for {} paths",
                self.counts.len(),
                self.paths.len()
            );
        }
        if let Some(row) = self.counts.iter().find(|r| r.len() != self.days.len()) {
            bail!("count row of {} cells for {} days", row.len(), self.days.len());
        }
        Ok(())
    }
}

/// Binary-encode a partial for transfer.
pub fn encode_partial(part: &PartialResult) -> Result<Vec<u8>> {
    postcard::to_allocvec(part).context("encoding worker partial")
}

/// Decode a transferred partial; rejects truncated bytes and decodable bytes
/// whose count table disagrees with the dictionaries.
pub fn decode_partial(bytes: &[u8]) -> Result<PartialResult> {
    let part: PartialResult =
        postcard::from_bytes(bytes).context("decoding worker partial")?;
    part.check_shape().context("decoding worker partial")?;
    Ok(part)
}

/// Spill file path for worker `index` of run `run_id`.
fn spill_path(dir: &Path, run_id: u32, index: usize) -> PathBuf {
    dir.join(format!("{SPILL_PREFIX}{run_id}_{index:04}.bin"))
}

pub fn write_spill(dir: &Path, run_id: u32, index: usize, part: &PartialResult) -> Result<PathBuf> {
    let path = spill_path(dir, run_id, index);
    let bytes = encode_partial(part)?;
    fs::write(&path, bytes).with_context(|| format!("writing spill {}", path.display()))?;
    Ok(path)
}

/// Consume one spill file: read, decode, delete. Any failure is fatal for the
/// run — a range without a readable partial means incomplete coverage.
pub fn read_and_remove_spill(path: &Path) -> Result<PartialResult> {
    let bytes =
        fs::read(path).with_context(|| format!("reading worker partial {}", path.display()))?;
    let part = decode_partial(&bytes)
        .with_context(|| format!("worker partial {} is malformed", path.display()))?;
    fs::remove_file(path)
        .with_context(|| format!("removing consumed partial {}", path.display()))?;
    Ok(part)
}

/// Remove spill files left behind by runs other than `current_run`.
/// Returns how many files were swept.
pub fn sweep_stale_spills(dir: &Path, current_run: u32) -> Result<usize> {
    let mut swept = 0;
    let current = format!("{SPILL_PREFIX}{current_run}_");
    for entry in fs::read_dir(dir).with_context(|| format!("listing {}", dir.display()))? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if name.starts_with(SPILL_PREFIX) && !name.starts_with(&current) {
            fs::remove_file(entry.path())
                .with_context(|| format!("sweeping stale partial {}", entry.path().display()))?;
            swept += 1;
        }
    }
    Ok(swept)
}
