//! Streaming JSON report writer.
//!
//! Emits the merged aggregate as one pretty-printed JSON object without ever
//! holding the serialized output in memory. The byte format is pinned to the
//! conventional pretty-printer defaults the previous single-process tool used:
//! 4-space indentation, `": "` separators, forward slashes escaped as `\/`,
//! non-ASCII as `\uXXXX`, and no trailing newline. `serde_json` cannot produce
//! the `\/` escapes, hence the hand-rolled encoder.

use crate::intern::{Id, PathId};
use crate::merge::GlobalAggregate;
use anyhow::Result;
use std::io::Write;

/// Stream `agg` as the final JSON object: path keys in first-discovery order,
/// day keys ascending, zero-count days omitted. An empty aggregate is `{}`.
pub fn write_report<W: Write>(w: &mut W, agg: &GlobalAggregate) -> Result<()> {
    let day_order = agg.day_order();

    w.write_all(b"{")?;
    let mut first_path = true;
    for (i, path) in agg.paths.keys().iter().enumerate() {
        if !first_path {
            w.write_all(b",")?;
        }
        first_path = false;

        w.write_all(b"\n    \"")?;
        write_escaped(w, path)?;
        w.write_all(b"\": {")?;

        let path_id = PathId::from_raw(i as u32);
        let mut first_day = true;
        for &day_id in &day_order {
            let n = agg.counts.get(path_id, day_id);
            if n == 0 {
                continue;
            }
            if !first_day {
                w.write_all(b",")?;
            }
            first_day = false;
            write!(w, "\n        \"{}\": {}", agg.days.key(day_id), n)?;
        }
        w.write_all(b"\n    }")?;
    }
    if !first_path {
        w.write_all(b"\n")?;
    }
    w.write_all(b"}")?;
    Ok(())
}

/// JSON string escaping matching `json_encode`'s defaults: `/` becomes `\/`
/// and anything outside printable ASCII becomes `\uXXXX` (UTF-16 units).
fn write_escaped<W: Write>(w: &mut W, s: &str) -> Result<()> {
    let mut units = [0u16; 2];
    for c in s.chars() {
        match c {
            '"' => w.write_all(b"\\\"")?,
            '\\' => w.write_all(b"\\\\")?,
            '/' => w.write_all(b"\\/")?,
            '\u{8}' => w.write_all(b"\\b")?,
            '\u{c}' => w.write_all(b"\\f")?,
            '\n' => w.write_all(b"\\n")?,
            '\r' => w.write_all(b"\\r")?,
            '\t' => w.write_all(b"\\t")?,
            c if (c as u32) < 0x20 => write!(w, "\\u{:04x}", c as u32)?,
            c if c.is_ascii() => w.write_all(&[c as u8])?,
            c => {
                for unit in c.encode_utf16(&mut units) {
                    write!(w, "\\u{:04x}", unit)?;
                }
            }
        }
    }
    Ok(())
}
