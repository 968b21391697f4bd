//! Text form of save-file edits.
//!
//! Edits are written one group per line: a hexadecimal start offset
//! followed by decimal plain byte values, separated by whitespace.
//!
//! ```text
//! 0x0   1 1 1 1 1 1
//! 0xf   99 99 99
//! ff    55 55
//! ```
//!
//! The `0x` prefix is optional. Lines with fewer than two tokens (blank
//! lines, a lone offset) carry no edit and are ignored. A malformed token
//! anywhere fails the whole load, so nothing is applied from partially
//! understood input.

use std::io::{BufRead, BufReader, Read};

use crate::formats::mcs::ModificationGroup;
use crate::{Error, Result};

/// Parse one line. `line_no` is only used in error messages.
///
/// Returns `Ok(None)` for lines that carry no edit.
pub fn parse_line(line: &str, line_no: usize) -> Result<Option<ModificationGroup>> {
    let mut tokens = line.split_whitespace();
    let (Some(offset), Some(_)) = (tokens.next(), tokens.clone().next()) else {
        return Ok(None);
    };

    let start = parse_offset(offset).ok_or_else(|| Error::InvalidOffset {
        line: line_no,
        token: offset.to_owned(),
    })?;

    let values = tokens
        .map(|t| {
            t.parse::<u8>().map_err(|_| Error::InvalidValue {
                line: line_no,
                token: t.to_owned(),
            })
        })
        .collect::<Result<Vec<u8>>>()?;

    Ok(Some(ModificationGroup { start, values }))
}

/// Parse command-line style arguments: `["0x1A3", "12", "70"]`.
pub fn parse_args<S: AsRef<str>>(args: &[S]) -> Result<Option<ModificationGroup>> {
    let joined = args.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(" ");
    parse_line(&joined, 1)
}

/// Read every group from `reader`, one per line.
pub fn load_modifications<R: Read>(reader: R) -> Result<Vec<ModificationGroup>> {
    let buf = BufReader::new(reader);
    let mut groups = Vec::new();
    for (i, line) in buf.lines().enumerate() {
        let line = line?;
        if let Some(group) = parse_line(&line, i + 1)? {
            groups.push(group);
        }
    }
    log::debug!("loaded {} modification group(s)", groups.len());
    Ok(groups)
}

fn parse_offset(s: &str) -> Option<usize> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    usize::from_str_radix(digits, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line_with_prefix() {
        let g = parse_line("0x1A3 12 70 50 1", 1).unwrap().unwrap();
        assert_eq!(g.start, 0x1A3);
        assert_eq!(g.values, [12, 70, 50, 1]);
    }

    #[test]
    fn test_parse_line_without_prefix() {
        let g = parse_line("  ff\t55 55  ", 1).unwrap().unwrap();
        assert_eq!(g.start, 0xFF);
        assert_eq!(g.values, [55, 55]);
    }

    #[test]
    fn test_lines_without_values_are_ignored() {
        assert_eq!(parse_line("", 1).unwrap(), None);
        assert_eq!(parse_line("   ", 1).unwrap(), None);
        assert_eq!(parse_line("0x10", 1).unwrap(), None);
    }

    #[test]
    fn test_bad_offset() {
        let err = parse_line("0xZZ 1", 3).unwrap_err();
        assert!(matches!(err, Error::InvalidOffset { line: 3, ref token } if token == "0xZZ"));
        assert!(parse_line("+10 1", 1).is_err());
        assert!(parse_line("0x 1", 1).is_err());
    }

    #[test]
    fn test_bad_value() {
        assert!(matches!(
            parse_line("0x10 12 abc", 2),
            Err(Error::InvalidValue { line: 2, .. })
        ));
        assert!(matches!(
            parse_line("0x10 256", 1),
            Err(Error::InvalidValue { .. })
        ));
        assert!(matches!(
            parse_line("0x10 -1", 1),
            Err(Error::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_load_aborts_on_any_bad_line() {
        let input = "0x0 1 1 1\n0xf 99 x\n0xff 55\n";
        assert!(load_modifications(input.as_bytes()).is_err());
    }

    #[test]
    fn test_load_multiple_lines() {
        let input = "0x0 1 1 1 1 1 1\n\n0xf 99 99 99\n0xff 55 55\n";
        let groups = load_modifications(input.as_bytes()).unwrap();
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[1], ModificationGroup::new(0xF, [99, 99, 99]));
    }

    #[test]
    fn test_parse_args() {
        let g = parse_args(&["0x1A3", "12", "70"]).unwrap().unwrap();
        assert_eq!(g, ModificationGroup::new(0x1A3, [12, 70]));
    }
}
