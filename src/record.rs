//! Fixed-layout visit record decoding.
//!
//! A record line is `<scheme+host prefix><path>,<ISO-8601 date>` where the
//! prefix is exactly 19 bytes and the date field is exactly 25 bytes, of which
//! only the leading `YYYY-MM-DD` is significant. Decoding is pure byte slicing
//! from known offsets; there is no tokenizer. This is a throughput choice:
//! a line long enough but shaped differently decodes to a garbage pair and is
//! counted anyway. Keep it that way — byte-compatibility of the output depends
//! on it. `looks_well_formed` exists for the opt-in validate mode only.

/// Length of the `https://host` style prefix preceding the path.
pub const PREFIX_LEN: usize = 19;

/// Length of the full ISO-8601 date field at the end of the line.
pub const DATE_FIELD_LEN: usize = 25;

/// Significant leading portion of the date field (`YYYY-MM-DD`).
pub const DAY_LEN: usize = 10;

/// Minimum decodable line length: prefix + `,` + date field.
pub const MIN_LINE_LEN: usize = PREFIX_LEN + 1 + DATE_FIELD_LEN;

/// Decode one newline-stripped line into `(path, day)` byte slices.
/// Returns `None` for lines too short to carry the fixed layout; such lines
/// count zero records. No other validation happens here.
#[inline]
pub fn decode_line(line: &[u8]) -> Option<(&[u8], &[u8])> {
    let len = line.len();
    if len < MIN_LINE_LEN {
        return None;
    }
    let path = &line[PREFIX_LEN..len - (DATE_FIELD_LEN + 1)];
    let day = &line[len - DATE_FIELD_LEN..len - (DATE_FIELD_LEN - DAY_LEN)];
    Some((path, day))
}

/// Cheap structural check used by the validate mode: prefix looks like a URL
/// scheme, the comma sits where the layout demands, and the day portion is
/// digits with dashes at positions 4 and 7. Counting ignores the verdict.
pub fn looks_well_formed(line: &[u8]) -> bool {
    let len = line.len();
    if len < MIN_LINE_LEN || !line.starts_with(b"http") {
        return false;
    }
    if line[len - (DATE_FIELD_LEN + 1)] != b',' {
        return false;
    }
    let day = &line[len - DATE_FIELD_LEN..len - (DATE_FIELD_LEN - DAY_LEN)];
    day.iter().enumerate().all(|(i, &b)| match i {
        4 | 7 => b == b'-',
        _ => b.is_ascii_digit(),
    })
}
