//! Boundary planning: split a flat file into byte-aligned scan ranges.

use anyhow::{Context, Result};
use memchr::memchr;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

// Plenty for one seek-and-skip: record lines are well under this.
const SCAN_BUF_BYTES: usize = 64 * 1024;

/// Compute `workers + 1` boundaries `b0=0 ≤ b1 ≤ … ≤ bN=file_size` such that
/// every interior boundary sits at the start of a line. The naive split point
/// `i * (file_size / workers)` is advanced to one past the next newline; if no
/// newline follows before EOF the boundary collapses to `file_size`. Adjacent
/// boundaries may coincide on tiny inputs, yielding empty ranges.
///
/// Runs sequentially and must complete before any worker starts.
pub fn plan_boundaries(input: &Path, file_size: u64, workers: usize) -> Result<Vec<u64>> {
    let workers = workers.max(1);
    let mut boundaries = Vec::with_capacity(workers + 1);
    boundaries.push(0);

    if workers > 1 {
        let mut file = File::open(input)
            .with_context(|| format!("open {} for boundary planning", input.display()))?;
        let step = file_size / workers as u64;
        for i in 1..workers {
            let naive = step * i as u64;
            boundaries.push(next_line_start(&mut file, naive, file_size)?);
        }
    }

    boundaries.push(file_size);
    Ok(boundaries)
}

/// First byte position at or after `from` that starts a line, i.e. one past
/// the next `\n`; `file_size` when the remainder holds no newline.
fn next_line_start(file: &mut File, from: u64, file_size: u64) -> Result<u64> {
    if from >= file_size {
        return Ok(file_size);
    }
    file.seek(SeekFrom::Start(from))?;
    let mut buf = vec![0u8; SCAN_BUF_BYTES];
    let mut pos = from;
    loop {
        let want = buf.len().min((file_size - pos) as usize);
        if want == 0 {
            return Ok(file_size);
        }
        let n = read_up_to(file, &mut buf[..want])?;
        if n == 0 {
            return Ok(file_size);
        }
        if let Some(nl) = memchr(b'\n', &buf[..n]) {
            return Ok(pos + nl as u64 + 1);
        }
        pos += n as u64;
    }
}

/// Fill as much of `buf` as the file yields; short only at EOF.
pub(crate) fn read_up_to(file: &mut File, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = file.read(&mut buf[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}
