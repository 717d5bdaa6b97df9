mod boundary;
mod config;
mod intern;
mod matrix;
mod merge;
mod partial;
mod pipeline;
mod progress;
mod record;
mod scanner;
mod util;
mod writer;

pub use crate::config::ParseOptions;
pub use crate::pipeline::{default_worker_count, ParseSummary, VisitETL};

pub use crate::boundary::plan_boundaries;
pub use crate::merge::GlobalAggregate;
pub use crate::partial::{decode_partial, encode_partial, sweep_stale_spills, PartialResult};
pub use crate::scanner::{scan_range, ScanStats, DEFAULT_CHUNK_BYTES};
pub use crate::writer::write_report;

// Expose the record-layout contract so collaborators (generators, tooling)
// can build conforming lines.
pub use crate::record::{decode_line, looks_well_formed, DAY_LEN, MIN_LINE_LEN, PREFIX_LEN};

// Expose interning types for callers inspecting aggregates directly.
pub use crate::intern::{DayId, Interner, PathId};

// Expose tracing bootstrap so binaries can initialize logging the same way.
pub use crate::util::init_tracing_once;
