//! PEER `.AT2` accelerogram files.
//!
//! Four header lines precede the samples:
//! 1. database banner (ignored)
//! 2. event details
//! 3. units line (ignored)
//! 4. sample count and time step, either as `NPTS=  2000, DT= .0100 SEC`
//!    or as leading numbers `2000 .0100 NPTS, DT`
//!
//! Samples follow as whitespace-separated values, several per line.

use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

use super::LoadError;

/// Contents of an AT2 file.
#[derive(Debug, Clone, PartialEq)]
pub struct At2Record {
    pub details: String,
    pub dt: f64,
    pub samples: Vec<f64>,
}

static NPTS_DT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)NPTS\s*=\s*(?P<npts>\d+)\s*,?\s*DT\s*=\s*(?P<dt>[-+]?[0-9]*\.?[0-9]+(?:[eE][-+]?\d+)?)")
        .unwrap()
});

/// Parse the sample count and time step from header line 4.
fn parse_count_line(line: &str) -> Option<(usize, f64)> {
    if let Some(caps) = NPTS_DT_RE.captures(line) {
        let n = caps.name("npts")?.as_str().parse().ok()?;
        let dt = caps.name("dt")?.as_str().parse().ok()?;
        return Some((n, dt));
    }

    let mut tokens = line.split(|c: char| c.is_whitespace() || c == ',').filter(|t| !t.is_empty());
    let n = tokens.next()?.parse().ok()?;
    let dt = tokens.next()?.parse().ok()?;
    Some((n, dt))
}

/// Parse the text of an AT2 file.
pub fn parse_at2(text: &str) -> Result<At2Record, LoadError> {
    let mut lines = text.lines();
    let mut header = |line_no: usize| {
        lines.next().ok_or_else(|| LoadError::MalformedHeader {
            line: line_no,
            message: "file ends inside the header".to_string(),
        })
    };

    header(1)?;
    let details = header(2)?.trim().to_string();
    header(3)?;
    let count_line = header(4)?;
    let (npts, dt) = parse_count_line(count_line).ok_or_else(|| LoadError::MalformedHeader {
        line: 4,
        message: format!("expected sample count and time step, found {:?}", count_line.trim()),
    })?;

    let mut samples = Vec::with_capacity(npts);
    for token in lines.flat_map(str::split_whitespace).take(npts) {
        let v: f64 = token
            .parse()
            .map_err(|_| LoadError::BadSample(token.to_string()))?;
        samples.push(v);
    }

    if samples.len() < npts {
        return Err(LoadError::SampleCount {
            expected: npts,
            found: samples.len(),
        });
    }

    Ok(At2Record {
        details,
        dt,
        samples,
    })
}

/// Read and parse an AT2 file from disk.
pub fn load_at2(path: &Path) -> Result<At2Record, LoadError> {
    let text = std::fs::read_to_string(path)?;
    parse_at2(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NPTS_FORMAT: &str = "\
PEER STRONG MOTION DATABASE RECORD. PROCESSING BY PACIFIC ENGINEERING.
  NORTHRIDGE 01/17/94 1231, ARLETA, 090
ACCELERATION TIME HISTORY IN UNITS OF G
NPTS=     6, DT= .0200 SEC
  .1000E-02  -.2500E-02   .3000E-02   .0000E+00  -.1000E-01
  .5000E-02
";

    const LEGACY_FORMAT: &str = "\
PACIFIC ENGINEERING AND ANALYSIS STRONG-MOTION DATA
 LOMA PRIETA 10/18/89 00:05, GILROY ARRAY #3, 090
ACCELERATION TIME HISTORY IN UNITS OF G
  4  0.0050  NPTS, DT
 0.1 -0.2
 0.3 -0.4 0.5
";

    #[test]
    fn test_npts_header() {
        let r = parse_at2(NPTS_FORMAT).unwrap();
        assert_eq!(r.details, "NORTHRIDGE 01/17/94 1231, ARLETA, 090");
        assert!((r.dt - 0.02).abs() < 1e-12);
        assert_eq!(r.samples.len(), 6);
        assert!((r.samples[1] + 0.0025).abs() < 1e-12);
        assert!((r.samples[5] - 0.005).abs() < 1e-12);
    }

    #[test]
    fn test_legacy_header_ignores_extra_samples() {
        let r = parse_at2(LEGACY_FORMAT).unwrap();
        assert!((r.dt - 0.005).abs() < 1e-12);
        assert_eq!(r.samples, vec![0.1, -0.2, 0.3, -0.4]);
    }

    #[test]
    fn test_truncated_samples() {
        let text = LEGACY_FORMAT.replace("  4  0.0050", "  9  0.0050");
        assert!(matches!(
            parse_at2(&text),
            Err(LoadError::SampleCount { expected: 9, found: 5 })
        ));
    }

    #[test]
    fn test_missing_header() {
        assert!(matches!(
            parse_at2("only\ntwo lines\n"),
            Err(LoadError::MalformedHeader { line: 3, .. })
        ));
    }

    #[test]
    fn test_garbage_count_line() {
        let text = NPTS_FORMAT.replace("NPTS=     6, DT= .0200 SEC", "no numbers here");
        assert!(matches!(
            parse_at2(&text),
            Err(LoadError::MalformedHeader { line: 4, .. })
        ));
    }

    #[test]
    fn test_bad_sample() {
        let text = LEGACY_FORMAT.replace("-0.2", "abc");
        assert!(matches!(parse_at2(&text), Err(LoadError::BadSample(t)) if t == "abc"));
    }
}
