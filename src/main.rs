//! CLI entry point for the quiz mark curving tool.
//!
//! Provides subcommands for curving one week's marks (with an optional
//! lookup of a single student's mark) and for summarizing every week.

mod infra;
mod services;

use crate::infra::github::client::GithubMarkSource;
use crate::services::loader::MarkLoader;
use crate::services::mark_source::{MarkSource, SourceRef};
use anyhow::{Result, bail};
use clap::{Args, Parser, Subcommand};
use quiz_curve::curve::{CurveEngine, CurveError, CurveParameters, CurvePolicy};
use quiz_curve::output::{print_json, print_pretty, print_summary, write_comparison_csv};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "quiz_curve")]
#[command(about = "Curve weekly quiz marks to a target average and H1 cap", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct CurveArgs {
    /// Target average of the adjusted marks
    #[arg(long, default_value_t = 3.75)]
    target_mean: f64,

    /// Maximum percentage of adjusted marks at or above the threshold
    #[arg(long, default_value_t = 30)]
    max_above_pct: u32,

    /// JSON file overriding the grading policy
    #[arg(long, value_name = "FILE")]
    policy: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Curve one week's marks and optionally look up a single mark
    Curve {
        /// Path to a CSV file or URL to fetch
        #[arg(value_name = "FILE_OR_URL", required_unless_present = "week", conflicts_with = "week")]
        source: Option<String>,

        /// Week number to fetch from the marks repository
        #[arg(short, long)]
        week: Option<u32>,

        #[command(flatten)]
        curve: CurveArgs,

        /// Original quiz mark (0-5) to look up
        #[arg(short, long)]
        probe: Option<f64>,

        /// CSV file to write the original-vs-adjusted comparison to
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Log the full report as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Summarize every published week
    Weeks {
        /// Number of weeks to try
        #[arg(short, long, default_value_t = 7)]
        count: u32,

        #[command(flatten)]
        curve: CurveArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/quiz_curve.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("quiz_curve.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let mut loader = MarkLoader::new(GithubMarkSource::from_env()?);

    match cli.command {
        Commands::Curve {
            source,
            week,
            curve,
            probe,
            output,
            json,
        } => {
            let source_ref = match (week, source) {
                (Some(week), _) => SourceRef::Week(week),
                (None, Some(source)) => SourceRef::from_arg(&source),
                (None, None) => bail!("either FILE_OR_URL or --week is required"),
            };
            let (engine, params) = engine_and_params(&curve)?;
            curve_source(
                &mut loader,
                &engine,
                &params,
                &source_ref,
                probe,
                output.as_deref(),
                json,
            )
            .await?;
        }
        Commands::Weeks { count, curve } => {
            let (engine, params) = engine_and_params(&curve)?;
            summarize_weeks(&mut loader, &engine, &params, count).await?;
        }
    }

    Ok(())
}

/// Builds the engine from the (optional) policy file and checks the
/// requested parameters against its bands.
fn engine_and_params(args: &CurveArgs) -> Result<(CurveEngine, CurveParameters)> {
    let policy = match &args.policy {
        Some(path) => CurvePolicy::load(path)?,
        None => CurvePolicy::default(),
    };
    let params = CurveParameters::from_percent(args.target_mean, args.max_above_pct)?;
    policy.validate(&params)?;
    Ok((CurveEngine::new(policy)?, params))
}

/// Curves a single mark column and reports the summary, the optional probe
/// lookup and the comparison CSV.
#[tracing::instrument(skip(loader, engine, params, output), fields(source = %source_ref.key()))]
async fn curve_source<S: MarkSource>(
    loader: &mut MarkLoader<S>,
    engine: &CurveEngine,
    params: &CurveParameters,
    source_ref: &SourceRef,
    probe: Option<f64>,
    output: Option<&Path>,
    json: bool,
) -> Result<()> {
    let scores = match loader.load(source_ref).await {
        Ok(scores) => scores,
        Err(e) if e.is_data_unavailable() => {
            warn!(error = %e, "Quiz marks are not available yet");
            return Err(e.into());
        }
        Err(e) => return Err(e.into()),
    };

    let report = match engine.run(&scores, params, probe) {
        Ok(report) => report,
        Err(e @ CurveError::OutOfRangeProbe { .. }) => {
            error!(error = %e, "Enter your original quiz mark between 0 and 5");
            return Err(e.into());
        }
        Err(e) => return Err(e.into()),
    };

    print_pretty(&report);
    print_summary(&report);
    if json {
        print_json(&report)?;
    }

    if let Some(path) = output {
        write_comparison_csv(path, scores.marks(), &report)?;
        info!(path = %path.display(), "Comparison written");
    }

    Ok(())
}

/// Curves each week in turn; unpublished weeks are skipped, not fatal.
#[tracing::instrument(skip(loader, engine, params))]
async fn summarize_weeks<S: MarkSource>(
    loader: &mut MarkLoader<S>,
    engine: &CurveEngine,
    params: &CurveParameters,
    count: u32,
) -> Result<()> {
    let mut available = 0;

    for week in 1..=count {
        let source_ref = SourceRef::Week(week);
        let scores = match loader.load(&source_ref).await {
            Ok(scores) => scores,
            Err(e) if e.is_data_unavailable() => {
                warn!(week, error = %e, "Quiz marks are not available yet");
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let report = engine.run(&scores, params, None)?;
        available += 1;
        // Each week is visited once per sweep.
        loader.invalidate(&source_ref);

        info!(
            week,
            students = report.original.count,
            original_mean = %format!("{:.2}", report.original.mean),
            adjusted_mean = %format!("{:.2}", report.curved.mean),
            adjusted_std_dev = %format!("{:.2}", report.curved.std_dev),
            adjusted_h1_pct = %format!("{:.1}", report.curved_share_at_or_above * 100.0),
            "Week curved"
        );
    }

    info!(available, tried = count, "Finished summarizing weeks");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_week_and_mark() {
        let cli = Cli::try_parse_from([
            "quiz_curve",
            "curve",
            "--week",
            "3",
            "--probe",
            "0",
            "--max-above-pct",
            "25",
        ])
        .unwrap();

        match cli.command {
            Commands::Curve {
                week, probe, curve, ..
            } => {
                assert_eq!(week, Some(3));
                assert_eq!(probe, Some(0.0));
                assert_eq!(curve.max_above_pct, 25);
                assert_eq!(curve.target_mean, 3.75);
            }
            _ => panic!("expected curve command"),
        }
    }

    #[test]
    fn test_cli_requires_a_source() {
        assert!(Cli::try_parse_from(["quiz_curve", "curve"]).is_err());
    }

    #[test]
    fn test_cli_rejects_source_and_week() {
        assert!(Cli::try_parse_from(["quiz_curve", "curve", "marks.csv", "--week", "1"]).is_err());
    }

    #[test]
    fn test_engine_and_params_rejects_out_of_band() {
        let args = CurveArgs {
            target_mean: 3.75,
            max_above_pct: 45,
            policy: None,
        };
        assert!(engine_and_params(&args).is_err());

        let args = CurveArgs {
            target_mean: 3.72,
            max_above_pct: 22,
            policy: None,
        };
        let (_, params) = engine_and_params(&args).unwrap();
        assert_eq!(params.max_above_threshold_fraction(), 0.22);
    }

    #[tokio::test]
    async fn test_curve_source_writes_comparison() {
        let dir = tempfile::tempdir().unwrap();
        let marks = dir.path().join("week1.csv");
        std::fs::write(&marks, "Mark\n1\n\"2,5\"\n3\n4\n5\n").unwrap();
        let out = dir.path().join("comparison.csv");

        let mut loader = MarkLoader::new(GithubMarkSource::with_client(
            "https://unused",
            quiz_curve::fetch::BasicClient::new().unwrap(),
        ));
        let (engine, params) = engine_and_params(&CurveArgs {
            target_mean: 3.75,
            max_above_pct: 30,
            policy: None,
        })
        .unwrap();

        curve_source(
            &mut loader,
            &engine,
            &params,
            &SourceRef::File(marks.display().to_string()),
            Some(2.5),
            Some(&out),
            false,
        )
        .await
        .unwrap();

        let content = std::fs::read_to_string(&out).unwrap();
        assert_eq!(content.lines().count(), 6);
    }

    struct WeekOneOnly;

    #[async_trait::async_trait]
    impl MarkSource for WeekOneOnly {
        async fn fetch_column(&self, source: &SourceRef) -> Result<Vec<u8>> {
            match source {
                SourceRef::Week(1) => Ok(b"Mark\n1\n2\n3\n4\n5\n".to_vec()),
                _ => bail!("404 Not Found"),
            }
        }
    }

    #[tokio::test]
    async fn test_summarize_weeks_skips_missing_and_drops_curved() {
        let mut loader = MarkLoader::new(WeekOneOnly);
        let (engine, params) = engine_and_params(&CurveArgs {
            target_mean: 3.75,
            max_above_pct: 30,
            policy: None,
        })
        .unwrap();

        summarize_weeks(&mut loader, &engine, &params, 3)
            .await
            .unwrap();

        assert!(!loader.invalidate(&SourceRef::Week(1)));
    }

    #[tokio::test]
    async fn test_curve_source_rejects_out_of_range_mark() {
        let dir = tempfile::tempdir().unwrap();
        let marks = dir.path().join("week1.csv");
        std::fs::write(&marks, "Mark\n1\n2\n").unwrap();

        let mut loader = MarkLoader::new(GithubMarkSource::with_client(
            "https://unused",
            quiz_curve::fetch::BasicClient::new().unwrap(),
        ));
        let (engine, params) = engine_and_params(&CurveArgs {
            target_mean: 3.75,
            max_above_pct: 30,
            policy: None,
        })
        .unwrap();

        let result = curve_source(
            &mut loader,
            &engine,
            &params,
            &SourceRef::File(marks.display().to_string()),
            Some(7.0),
            None,
            false,
        )
        .await;
        assert!(result.is_err());
    }
}
