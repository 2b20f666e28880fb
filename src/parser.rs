//! CSV parser for quiz mark columns.

use csv::ReaderBuilder;

use crate::curve::{CurveError, ScoreSet};

/// Parses a single mark, accepting `,` as the decimal separator.
///
/// Non-finite values (`NaN`, `inf`) are not marks and are rejected.
pub fn parse_mark(raw: &str) -> Option<f64> {
    let value: f64 = raw.trim().replace(',', ".").parse().ok()?;
    value.is_finite().then_some(value)
}

/// Decodes the first column of a CSV file with a header row into a [`ScoreSet`].
///
/// # Errors
///
/// Fails on the first value that is not a number rather than skipping it;
/// `row` in the error is the 1-based data row. An input with no data rows
/// yields [`CurveError::EmptyScoreSet`].
pub fn parse_score_column(bytes: &[u8]) -> Result<ScoreSet, CurveError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let mut marks = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let row = idx + 1;
        let record =
            result.map_err(|e| CurveError::DataUnavailable(format!("row {row}: {e}")))?;
        let raw = record.get(0).unwrap_or("");
        let mark = parse_mark(raw).ok_or_else(|| CurveError::UnparseableMark {
            row,
            value: raw.to_string(),
        })?;
        marks.push(mark);
    }

    ScoreSet::new(marks)
}
