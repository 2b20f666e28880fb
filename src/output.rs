//! Output formatting and persistence for curving reports.
//!
//! Supports pretty-printing, JSON serialization, a two-row summary table and
//! CSV export of the original-vs-curved comparison.

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::curve::CurveReport;
use crate::curve::transform::comparison_series;
use crate::stats::DistributionStats;
use csv::WriterBuilder;
use std::fs::File;
use std::path::Path;

/// One line of the summary table, formatted to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub label: &'static str,
    pub mean: String,
    pub std_dev: String,
}

impl SummaryRow {
    fn new(label: &'static str, stats: &DistributionStats) -> Self {
        Self {
            label,
            mean: format!("{:.2}", stats.mean),
            std_dev: format!("{:.2}", stats.std_dev),
        }
    }
}

/// Original and curved rows of the summary table.
pub fn summary_rows(report: &CurveReport) -> [SummaryRow; 2] {
    [
        SummaryRow::new("Original Marks", &report.original),
        SummaryRow::new("Adjusted Marks", &report.curved),
    ]
}

/// Logs the report using Rust's debug pretty-print format.
pub fn print_pretty(report: &CurveReport) {
    debug!("{:#?}", report);
}

/// Logs the report as pretty-printed JSON.
pub fn print_json(report: &CurveReport) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

/// Logs the summary table, the threshold shares and any probe lookup.
pub fn print_summary(report: &CurveReport) {
    for row in summary_rows(report) {
        info!(mean = %row.mean, std_dev = %row.std_dev, "{}", row.label);
    }

    info!(
        threshold = report.threshold,
        original_pct = %format!("{:.1}", report.original_share_at_or_above * 100.0),
        adjusted_pct = %format!("{:.1}", report.curved_share_at_or_above * 100.0),
        cap_pct = %format!("{:.0}", report.parameters.max_above_threshold_fraction() * 100.0),
        "Share of marks at or above threshold"
    );

    for fallback in &report.fallbacks {
        warn!(?fallback, "Fallback applied");
    }

    if let Some(probe) = &report.probe {
        info!(
            original = %format!("{:.2}", probe.raw),
            adjusted = %format!("{:.2}", probe.curved),
            at_or_above_threshold = probe.at_or_above_threshold,
            "Your adjusted mark is {:.2}; your rank is {} out of {} students",
            probe.curved,
            probe.rank,
            probe.total
        );
    }
}

/// Writes the comparison series (sorted by original mark) to a CSV file,
/// replacing any existing file.
pub fn write_comparison_csv(path: &Path, original: &[f64], report: &CurveReport) -> Result<()> {
    let rows = comparison_series(original, &report.curved_marks);
    debug!(path = %path.display(), rows = rows.len(), "Writing comparison CSV");

    let file = File::create(path)?;
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(file);

    for row in &rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::{CurveEngine, CurveParameters, ScoreSet};
    use std::fs;

    fn report(marks: &[f64], probe: Option<f64>) -> CurveReport {
        let scores = ScoreSet::new(marks.to_vec()).unwrap();
        let params = CurveParameters::new(3.75, 0.30).unwrap();
        CurveEngine::default().run(&scores, &params, probe).unwrap()
    }

    #[test]
    fn test_summary_rows_two_decimals() {
        let rows = summary_rows(&report(&[1.0, 2.0, 3.0, 4.0, 5.0], None));

        assert_eq!(rows[0].label, "Original Marks");
        assert_eq!(rows[0].mean, "3.00");
        assert_eq!(rows[0].std_dev, "1.41");
        assert_eq!(rows[1].mean, "3.75");
        assert_eq!(rows[1].std_dev, "0.48");
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&report(&[1.0, 2.0], None));
    }

    #[test]
    fn test_print_json_does_not_panic() {
        print_json(&report(&[1.0, 2.0], Some(1.5))).unwrap();
    }

    #[test]
    fn test_print_summary_with_fallbacks_does_not_panic() {
        print_summary(&report(&[3.0, 3.0], Some(3.0)));
    }

    #[test]
    fn test_comparison_csv_sorted_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("comparison.csv");
        let original = [3.0, 1.0, 2.0];

        write_comparison_csv(&path, &original, &report(&original, None)).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "position,index,original,curved");
        assert!(lines[1].starts_with("0,1,1.0,"));
        assert!(lines[3].starts_with("2,0,3.0,"));
    }

    #[test]
    fn test_comparison_csv_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("comparison.csv");
        let original = [1.0, 2.0];
        let r = report(&original, None);

        write_comparison_csv(&path, &original, &r).unwrap();
        write_comparison_csv(&path, &original, &r).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let header_count = content.lines().filter(|l| l.contains("position")).count();
        assert_eq!(header_count, 1);
    }
}
