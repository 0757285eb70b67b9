//! Dictionary file parsing.
//!
//! Each `-d` file holds one pattern per line. A byte is written either
//! literally or, for bytes that don't print cleanly, as a `|HH HH ...|`
//! block of space-separated hex pairs. A line whose `|...|` block never
//! closes, or that contains a non-hex character inside one, is malformed:
//! it contributes no pattern and is logged once, not treated as fatal.

use std::fs;
use std::path::PathBuf;

use mps_core::patterns_tree::Origin;

use crate::error::BenchError;

/// Read every `-d` file in order and collect the patterns they contain,
/// tagged with where each came from. `file_number` is 0-based in file
/// argument order; `line_number` is 1-based within its file.
pub fn load(paths: &[PathBuf]) -> Result<Vec<(Vec<u8>, Origin)>, BenchError> {
    let mut entries = Vec::new();
    for (file_number, path) in paths.iter().enumerate() {
        let contents = fs::read_to_string(path)
            .map_err(|source| BenchError::Io { path: path.clone(), source })?;
        for (i, line) in contents.lines().enumerate() {
            let line_number = i as u32 + 1;
            match parse_pattern_line(line) {
                Some(bytes) => entries.push((
                    bytes,
                    Origin { file_number: file_number as u32, line_number },
                )),
                None if line.is_empty() => {}
                None => tracing::warn!(
                    file = %path.display(),
                    line_number,
                    "skipping malformed dictionary line"
                ),
            }
        }
    }
    Ok(entries)
}

fn parse_pattern_line(line: &str) -> Option<Vec<u8>> {
    let bytes = line.as_bytes();
    let mut out = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'|' {
            i += 1;
            loop {
                while i < bytes.len() && bytes[i] == b' ' {
                    i += 1;
                }
                if i < bytes.len() && bytes[i] == b'|' {
                    i += 1;
                    break;
                }
                if i + 1 >= bytes.len() {
                    return None;
                }
                let hi = hex_val(bytes[i])?;
                let lo = hex_val(bytes[i + 1])?;
                out.push((hi << 4) | lo);
                i += 2;
            }
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}

fn hex_val(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_bytes_pass_through() {
        assert_eq!(parse_pattern_line("abc"), Some(b"abc".to_vec()));
    }

    #[test]
    fn hex_block_decodes() {
        assert_eq!(parse_pattern_line("|00 ff|"), Some(vec![0x00, 0xff]));
    }

    #[test]
    fn mixed_literal_and_hex() {
        assert_eq!(parse_pattern_line("ab|00|cd"), Some(vec![b'a', b'b', 0x00, b'c', b'd']));
    }

    #[test]
    fn unterminated_block_is_malformed() {
        assert_eq!(parse_pattern_line("ab|00 01"), None);
    }

    #[test]
    fn non_hex_char_in_block_is_malformed() {
        assert_eq!(parse_pattern_line("|zz|"), None);
    }

    #[test]
    fn empty_line_yields_no_pattern() {
        assert_eq!(parse_pattern_line(""), None);
    }

    #[test]
    fn hex_is_case_insensitive() {
        assert_eq!(parse_pattern_line("|Ab|"), Some(vec![0xab]));
    }
}
