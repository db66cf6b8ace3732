//! Candidate key extraction.

/// Separator between a key and its value.
pub const SEPARATOR: u8 = b'=';

/// Whitespace in the C locale sense: space, `\t`, `\n`, `\v`, `\f`, `\r`.
pub fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r')
}

/// Extract the candidate key of a line.
///
/// Leading whitespace is skipped; the key runs up to (not including) the
/// first `=`, or to the end of the line when there is none. No unquoting or
/// unescaping is done, and whitespace inside or after the key is kept.
pub fn candidate_key(line: &[u8]) -> &[u8] {
    let start = line
        .iter()
        .position(|&b| !is_space(b))
        .unwrap_or(line.len());
    let rest = &line[start..];
    match rest.iter().position(|&b| b == SEPARATOR) {
        Some(end) => &rest[..end],
        None => rest,
    }
}
