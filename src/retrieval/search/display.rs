//! Plain-text rendering of a ranking.

use std::fmt::Write as _;
use std::io;

use crate::retrieval::core::candidate::ScoredCandidate;

/// Render one line per result: 1-indexed rank, score to five decimals, quoted text.
#[must_use]
pub fn format_results(results: &[ScoredCandidate]) -> String {
    let mut out = String::new();
    for (index, result) in results.iter().enumerate() {
        let _ = writeln!(out, "    [{}] {:.5} \"{}\"", index + 1, result.score, result.text);
    }
    out
}

/// Write the [`format_results`] report to `writer`.
///
/// # Errors
/// Returns an error if the writer fails.
pub fn write_results<W: io::Write>(writer: &mut W, results: &[ScoredCandidate]) -> io::Result<()> {
    writer.write_all(format_results(results).as_bytes())?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranking() -> Vec<ScoredCandidate> {
        vec![
            ScoredCandidate {
                text: "cat on mat".to_string(),
                score: 0.95,
            },
            ScoredCandidate {
                text: "dog in fog".to_string(),
                score: 0.4,
            },
        ]
    }

    #[test]
    fn test_format_results() {
        assert_eq!(
            format_results(&ranking()),
            "    [1] 0.95000 \"cat on mat\"\n    [2] 0.40000 \"dog in fog\"\n"
        );
    }

    #[test]
    fn test_empty_ranking_renders_nothing() {
        assert_eq!(format_results(&[]), "");
    }

    #[test]
    fn test_write_results() {
        let mut buf = Vec::new();
        write_results(&mut buf, &ranking()).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), format_results(&ranking()));
    }
}
