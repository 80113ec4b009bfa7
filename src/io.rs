//! Reads observation sequences from a file of newline-separated integers.
//!
//! Per spec.md §6: one 32-bit unsigned integer per line, decimal or
//! `0x`-prefixed hexadecimal; blank lines and leading whitespace are
//! tolerated. A line that parses as neither is a hard [`RecoverError`]
//! rather than a silently-substituted `0` — the policy choice recorded in
//! DESIGN.md.

use std::fs;
use std::path::Path;

use crate::error::RecoverError;

/// Reads `path` and parses its contents as a newline-separated observation
/// sequence. See [`parse_observations`] for the line format.
pub fn read_observations_file(path: impl AsRef<Path>) -> Result<Vec<u32>, RecoverError> {
    let text = fs::read_to_string(path)?;
    parse_observations(&text)
}

/// Parses `text` as a newline-separated sequence of 32-bit unsigned
/// integers. Each non-blank line, after trimming leading/trailing
/// whitespace, must be either a decimal literal or a `0x`/`0X`-prefixed
/// hexadecimal literal; anything else is [`RecoverError::MalformedInput`],
/// reporting its 1-indexed line number.
pub fn parse_observations(text: &str) -> Result<Vec<u32>, RecoverError> {
    let mut values = Vec::new();
    for (idx, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        let parsed = if let Some(hex) = line.strip_prefix("0x").or_else(|| line.strip_prefix("0X")) {
            u32::from_str_radix(hex, 16)
        } else {
            line.parse::<u32>()
        };
        match parsed {
            Ok(value) => values.push(value),
            Err(_) => {
                return Err(RecoverError::MalformedInput {
                    line: idx + 1,
                    text: line.to_string(),
                })
            }
        }
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_decimal_and_hex_lines() {
        let text = "10\n0x1A\n  42  \n";
        assert_eq!(parse_observations(text).unwrap(), vec![10, 26, 42]);
    }

    #[test]
    fn tolerates_blank_lines() {
        let text = "1\n\n   \n2\n";
        assert_eq!(parse_observations(text).unwrap(), vec![1, 2]);
    }

    #[test]
    fn rejects_malformed_line_with_its_line_number() {
        let text = "1\nnot_a_number\n3\n";
        match parse_observations(text) {
            Err(RecoverError::MalformedInput { line, text }) => {
                assert_eq!(line, 2);
                assert_eq!(text, "not_a_number");
            }
            other => panic!("expected MalformedInput, got {other:?}"),
        }
    }

    #[test]
    fn reads_from_a_real_file() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("seedrecover_io_test_{}", std::process::id()));
        fs::write(&path, "5\n0x10\n").unwrap();
        let values = read_observations_file(&path).unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(values, vec![5, 16]);
    }

    #[test]
    fn missing_file_surfaces_as_io_error() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("seedrecover_io_test_missing_{}", std::process::id()));
        assert!(matches!(
            read_observations_file(&path),
            Err(RecoverError::Io(_))
        ));
    }
}
