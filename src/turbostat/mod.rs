//! Parser for the summary `turbostat --Summary --quiet --Joules --show Pkg_J`
//! prints on stderr once the wrapped command exits:
//!
//! ```text
//! 2.004856 sec
//! Pkg_J
//! 41.37
//! ```

use crate::error::{Error, Result};
use crate::measurement::Measurement;

const ELAPSED_LINE: usize = 0;
const ENERGY_LINE: usize = 2;
const ELAPSED_SUFFIX: &str = "sec";

/// Extracts elapsed seconds (line 1) and package joules (line 3) from a turbostat summary.
pub fn parse_summary(output: &str) -> Result<Measurement> {
    let lines: Vec<&str> = output.lines().collect();
    if lines.len() <= ENERGY_LINE {
        return Err(Error::parse(format!(
            "expected at least {} lines, got {}",
            ENERGY_LINE + 1,
            lines.len()
        )));
    }

    let elapsed_line = lines[ELAPSED_LINE].trim_end();
    let elapsed = elapsed_line
        .strip_suffix(ELAPSED_SUFFIX)
        .ok_or_else(|| Error::parse(format!("elapsed time line '{}' does not end with '{}'", elapsed_line, ELAPSED_SUFFIX)))?;

    let elapsed_secs = parse_value(elapsed, "elapsed time")?;
    let energy_joules = parse_value(lines[ENERGY_LINE], "energy")?;

    Ok(Measurement { elapsed_secs, energy_joules })
}

fn parse_value(text: &str, field: &str) -> Result<f64> {
    let text = text.trim();
    let value: f64 = text
        .parse()
        .map_err(|_| Error::parse(format!("{} '{}' is not a number", field, text)))?;

    if !value.is_finite() || value < 0.0 {
        return Err(Error::parse(format!("{} '{}' is not a non-negative finite number", field, text)));
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_three_line_report() {
        let m = parse_summary("2.5 sec\n...\n123.4").unwrap();
        assert_eq!(m.elapsed_secs, 2.5);
        assert_eq!(m.energy_joules, 123.4);
    }

    #[test]
    fn ignores_extra_lines_and_crlf() {
        let m = parse_summary("0.001203 sec\r\nPkg_J\r\n0.05\r\ntrailing noise\n").unwrap();
        assert_eq!(m.elapsed_secs, 0.001203);
        assert_eq!(m.energy_joules, 0.05);
    }

    #[test]
    fn rejects_short_report() {
        assert!(matches!(parse_summary("2.5 sec\nPkg_J"), Err(Error::Parse { .. })));
        assert!(matches!(parse_summary(""), Err(Error::Parse { .. })));
    }

    #[test]
    fn rejects_missing_unit() {
        assert!(matches!(parse_summary("2.5\nPkg_J\n123.4"), Err(Error::Parse { .. })));
        assert!(matches!(parse_summary("2.5 ms\nPkg_J\n123.4"), Err(Error::Parse { .. })));
    }

    #[test]
    fn rejects_non_numeric_values() {
        assert!(matches!(parse_summary("2.5 sec\nPkg_J\nPkg_J"), Err(Error::Parse { .. })));
        assert!(matches!(parse_summary("fast sec\nPkg_J\n1.0"), Err(Error::Parse { .. })));
        assert!(matches!(parse_summary("sudo: a password is required\n\n\n"), Err(Error::Parse { .. })));
    }

    #[test]
    fn rejects_negative_and_non_finite() {
        assert!(parse_summary("-1.0 sec\nPkg_J\n1.0").is_err());
        assert!(parse_summary("1.0 sec\nPkg_J\nNaN").is_err());
        assert!(parse_summary("1.0 sec\nPkg_J\ninf").is_err());
    }
}
