//! Canonical text format for matrices and vectors.
//!
//! A matrix is written as `"<rows>,<columns>:<e11>,...,<e1c>;<e21>,...;...;"`:
//! a shape header, then every row with comma-separated elements and a
//! trailing `;`. Elements use the shortest representation that parses back
//! to the same `f64`, so the text round-trips exactly.

use std::fmt::{self, Write as _};

use crate::error::{PoseError, Result};

/// Significant digits compared by the equality contract.
pub(crate) const EQUALITY_DIGITS: usize = 15;

/// Write `data` (row-major, `rows x columns`) in canonical form.
pub(crate) fn write_canonical(
    f: &mut impl fmt::Write,
    rows: usize,
    columns: usize,
    data: &[f64],
) -> fmt::Result {
    write!(f, "{rows},{columns}:")?;
    for row in data.chunks(columns) {
        for (j, value) in row.iter().enumerate() {
            if j > 0 {
                f.write_char(',')?;
            }
            write!(f, "{value}")?;
        }
        f.write_char(';')?;
    }
    Ok(())
}

/// Parse canonical text into `(rows, columns, row-major elements)`.
///
/// # Errors
///
/// Returns [`PoseError::Format`] for a malformed header, a row or element
/// count that disagrees with the header, or an element that is not a finite
/// number.
pub(crate) fn parse_canonical(text: &str) -> Result<(usize, usize, Vec<f64>)> {
    let (header, body) = text
        .split_once(':')
        .ok_or_else(|| PoseError::format("missing ':' after shape header"))?;
    let (rows, columns) = header
        .split_once(',')
        .ok_or_else(|| PoseError::format("shape header must be '<rows>,<columns>'"))?;
    let rows = parse_dimension(rows)?;
    let columns = parse_dimension(columns)?;
    let len = rows
        .checked_mul(columns)
        .ok_or_else(|| PoseError::format(format!("shape {rows}x{columns} is too large")))?;

    let body = body
        .trim_end()
        .strip_suffix(';')
        .ok_or_else(|| PoseError::format("last row is not terminated by ';'"))?;

    // Every element takes at least two bytes of body text.
    let mut data = Vec::with_capacity(len.min(body.len() / 2 + 1));
    let mut row_count = 0;
    for row in body.split(';') {
        row_count += 1;
        if row_count > rows {
            return Err(PoseError::format(format!(
                "header declares {rows} rows but more were found"
            )));
        }
        let before = data.len();
        for token in row.split(',') {
            data.push(parse_element(token)?);
        }
        if data.len() - before != columns {
            return Err(PoseError::format(format!(
                "row {row_count} has {} elements, expected {columns}",
                data.len() - before
            )));
        }
    }
    if row_count != rows {
        return Err(PoseError::format(format!(
            "header declares {rows} rows, found {row_count}"
        )));
    }

    Ok((rows, columns, data))
}

fn parse_dimension(token: &str) -> Result<usize> {
    let value: usize = token
        .trim()
        .parse()
        .map_err(|e| PoseError::format(format!("invalid dimension '{token}': {e}")))?;
    if value == 0 {
        return Err(PoseError::format("dimensions must be positive"));
    }
    Ok(value)
}

fn parse_element(token: &str) -> Result<f64> {
    let token = token.trim();
    if token.is_empty() {
        return Err(PoseError::format("missing element"));
    }
    let value: f64 = token
        .parse()
        .map_err(|e| PoseError::format(format!("invalid element '{token}': {e}")))?;
    if !value.is_finite() {
        return Err(PoseError::format(format!("non-finite element '{token}'")));
    }
    Ok(value)
}

/// Fixed-precision key for one element under the equality contract.
///
/// Values that agree to [`EQUALITY_DIGITS`] significant digits share a key;
/// both zeros map to `"0"`.
pub(crate) fn equality_key(value: f64, out: &mut String) {
    if value == 0.0 {
        out.push('0');
    } else {
        let _ = write!(out, "{:.*e}", EQUALITY_DIGITS - 1, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(value: f64) -> String {
        let mut s = String::new();
        equality_key(value, &mut s);
        s
    }

    #[test]
    fn test_write_canonical() {
        let mut s = String::new();
        write_canonical(&mut s, 2, 2, &[1.0, 2.5, -3.0, 0.0]).unwrap();
        assert_eq!(s, "2,2:1,2.5;-3,0;");
    }

    #[test]
    fn test_parse_canonical() {
        let (rows, columns, data) = parse_canonical("2,3:1,2,3;4,5,6.5;").unwrap();
        assert_eq!((rows, columns), (2, 3));
        assert_eq!(data, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.5]);
    }

    #[test]
    fn test_parse_rejects_malformed_input() {
        for bad in [
            "3,1",
            "3:1;2;3;",
            "0,1:;",
            "2,1:1;",
            "2,1:1;2",
            "2,1:1;2;3;",
            "1,2:1;",
            "1,2:1,;",
            "1,1:abc;",
            "1,1:NaN;",
            "1,1:inf;",
            "x,1:1;",
        ] {
            assert!(
                matches!(parse_canonical(bad), Err(PoseError::Format(_))),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn test_parse_rejects_oversized_header() {
        for bad in ["999999999999999,1:1;", "18446744073709551615,2:1,2;"] {
            assert!(
                matches!(parse_canonical(bad), Err(PoseError::Format(_))),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn test_equality_key_precision() {
        assert_eq!(key(0.0), key(-0.0));
        assert_eq!(key(0.1), key(0.30000000000000004 - 0.2));
        assert_ne!(key(1.0), key(1.000_000_000_01));
    }
}
