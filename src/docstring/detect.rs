//! Documentation dialect detection.
//!
//! Dialects are tried in a fixed order (reST, NumPy, Google) and the first
//! one with any marker wins. Confidence is the share of non-blank lines that
//! are markers of the winning dialect.

use crate::core::values::DocstringFormat;
use once_cell::sync::Lazy;
use regex::Regex;

static REST_FIELD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*:(?:param|parameter|arg|argument|key|keyword|cvar|ivar|var|type|vartype|returns?|rtype|raises?)\b",
    )
    .unwrap()
});

static NUMPY_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(?:Parameters|Other Parameters|Attributes|Returns|Yields|Raises|Warns|See Also|Notes|Examples|References)\s*$",
    )
    .unwrap()
});

static NUMPY_UNDERLINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*-{3,}\s*$").unwrap());

static GOOGLE_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(?:Args|Arguments|Parameters|Params|Attributes|Keyword Args|Keyword Arguments|Other Parameters|Returns|Return|Yields|Raises)\s*:\s*$",
    )
    .unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    pub format: DocstringFormat,
    /// In `(0, 1]` when markers were seen, `0.0` for plain prose
    pub confidence: f64,
}

type MarkerCounter = fn(&[&str]) -> usize;

/// Detection order
const DIALECTS: [(DocstringFormat, MarkerCounter); 3] = [
    (DocstringFormat::Rest, count_rest_markers),
    (DocstringFormat::Numpy, count_numpy_markers),
    (DocstringFormat::Google, count_google_markers),
];

/// Detect the dialect of a documentation block
pub fn detect_dialect(text: &str) -> Detection {
    let lines: Vec<&str> = text.lines().filter(|line| !line.trim().is_empty()).collect();
    if lines.is_empty() {
        return Detection {
            format: DocstringFormat::Rest,
            confidence: 0.0,
        };
    }

    DIALECTS
        .iter()
        .find_map(|(format, count)| {
            let markers = count(&lines);
            (markers > 0).then(|| Detection {
                format: *format,
                confidence: (markers as f64 / lines.len() as f64).min(1.0),
            })
        })
        .unwrap_or(Detection {
            format: DocstringFormat::Rest,
            confidence: 0.0,
        })
}

fn count_rest_markers(lines: &[&str]) -> usize {
    lines.iter().filter(|line| REST_FIELD.is_match(line)).count()
}

fn count_numpy_markers(lines: &[&str]) -> usize {
    lines
        .windows(2)
        .filter(|pair| NUMPY_HEADER.is_match(pair[0]) && NUMPY_UNDERLINE.is_match(pair[1]))
        .count()
        * 2
}

fn count_google_markers(lines: &[&str]) -> usize {
    lines.iter().filter(|line| GOOGLE_HEADER.is_match(line)).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn test_detect_rest() {
        let detection = detect_dialect(indoc! {"
            Summary

            :param x: the x
            :type x: ```int```
        "});
        assert_eq!(detection.format, DocstringFormat::Rest);
        assert!((detection.confidence - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_detect_numpy_before_google() {
        let detection = detect_dialect(indoc! {"
            Summary

            Parameters
            ----------
            x : int
                the x
        "});
        assert_eq!(detection.format, DocstringFormat::Numpy);
        assert!(detection.confidence > 0.0);
    }

    #[test]
    fn test_detect_google() {
        let detection = detect_dialect(indoc! {"
            Summary

            Args:
                x (int): the x
        "});
        assert_eq!(detection.format, DocstringFormat::Google);
        assert!((detection.confidence - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_prose_has_zero_confidence() {
        assert_eq!(
            detect_dialect("Just some words.\nNothing more."),
            Detection {
                format: DocstringFormat::Rest,
                confidence: 0.0
            }
        );
        assert_eq!(detect_dialect("").confidence, 0.0);
    }
}
