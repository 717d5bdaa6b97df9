use crate::scanner::DEFAULT_CHUNK_BYTES;
use std::path::{Path, PathBuf};

/// User-facing options with sensible defaults and builder chaining.
#[derive(Clone, Debug)]
pub struct ParseOptions {
    pub workers: Option<usize>,       // Some(N) to pin the worker count, None to derive from CPUs
    pub chunk_bytes: usize,           // per-worker read chunk size
    pub write_buffer_bytes: usize,    // BufWriter capacity for the report
    pub spill_dir: Option<PathBuf>,   // if set, partials round-trip through files here
    pub validate: bool,               // count (never reject) lines failing the shape check
    pub progress: bool,               // show progress bar
    pub progress_label: Option<String>, // optional label for progress bar
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            workers: None,
            chunk_bytes: DEFAULT_CHUNK_BYTES,
            write_buffer_bytes: 256 * 1024,
            spill_dir: None,
            validate: false,
            progress: true,
            progress_label: None,
        }
    }
}

impl ParseOptions {
    pub fn with_workers(mut self, n: usize) -> Self {
        self.workers = Some(n.max(1));
        self
    }
    pub fn with_chunk_bytes(mut self, bytes: usize) -> Self {
        self.chunk_bytes = bytes.max(64 * 1024);
        self
    }
    pub fn with_write_buffer(mut self, bytes: usize) -> Self {
        self.write_buffer_bytes = bytes.max(8 * 1024);
        self
    }
    pub fn with_spill_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.spill_dir = Some(dir.as_ref().to_path_buf());
        self
    }
    pub fn with_validate(mut self, yes: bool) -> Self {
        self.validate = yes;
        self
    }
    pub fn with_progress(mut self, yes: bool) -> Self {
        self.progress = yes;
        self
    }
    pub fn with_progress_label(mut self, label: impl Into<String>) -> Self {
        self.progress_label = Some(label.into());
        self
    }
}
