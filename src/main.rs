//! CLI entry point for rank_insights.
//!
//! Provides subcommands for analyzing submission history, generating
//! insights, predicting a rank for the current submission, and mapping a
//! rank onto a college tier.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rank_insights::analyzers::{
    RankFeatures, analyze, fit_rank_model, generate_insights, predict_college, predict_rank,
};
use rank_insights::config::{AppConfig, load_tier_table};
use rank_insights::output::{
    AnalysisResponse, print_json, print_pretty, write_json, write_topic_csv, write_trend_csv,
};
use rank_insights::source::{JsonSource, SubmissionSource};
use serde_json::json;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "rank_insights")]
#[command(about = "Quiz performance analytics and rank prediction", long_about = None)]
struct Cli {
    /// Submission history: a JSON file path or URL
    #[arg(long, global = true, value_name = "FILE_OR_URL")]
    history: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate totals across the submission history
    Analyze,
    /// Averages, weak areas and accuracy trend for the history
    Insights,
    /// Fit the rank model on the history and predict a rank for one submission
    PredictRank {
        /// Submission to predict for: a JSON file path or URL
        #[arg(short, long, value_name = "FILE_OR_URL")]
        submission: Option<String>,
    },
    /// Map a rank onto a college tier
    PredictCollege {
        #[arg(short, long, allow_negative_numbers = true)]
        rank: f64,

        /// JSON file with custom tiers
        #[arg(long)]
        tiers: Option<String>,
    },
    /// Write analysis, insights and chart data to a directory
    Report {
        #[arg(short = 'd', long, default_value = "reports")]
        out_dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let _log_guard = init_logging()?;

    let cli = Cli::parse();
    let mut config = AppConfig::from_env();
    if let Some(history) = cli.history {
        config.history = history;
    }

    match cli.command {
        Commands::Analyze => {
            let source = JsonSource::new(&config.history, &config.submission)?;
            let records = source.history().await?;
            let analysis = analyze(&records);
            print_pretty(&analysis);
            print_json(&analysis)?;
        }
        Commands::Insights => {
            let source = JsonSource::new(&config.history, &config.submission)?;
            let records = source.history().await?;
            let insights = generate_insights(&analyze(&records))?;
            print_json(&insights)?;
        }
        Commands::PredictRank { submission } => {
            if let Some(submission) = submission {
                config.submission = submission;
            }
            let source = JsonSource::new(&config.history, &config.submission)?;

            let history = source.history().await?;
            let current = source
                .current()
                .await?
                .with_context(|| format!("no submission found at {}", config.submission))?;

            let model = fit_rank_model(&history)?;
            let features = RankFeatures::from_record(&current);
            info!(?features, "Extracted features");

            let predicted_rank = predict_rank(&features.to_array(), &model)?;
            print_json(&json!({ "predicted_rank": predicted_rank }))?;
        }
        Commands::PredictCollege { rank, tiers } => {
            let table = match tiers {
                Some(path) => load_tier_table(&path)?,
                None => config.tier_table()?,
            };
            let predicted_college = predict_college(rank, &table);
            print_json(&json!({ "predicted_college": predicted_college }))?;
        }
        Commands::Report { out_dir } => {
            let source = JsonSource::new(&config.history, &config.submission)?;
            let records = source.history().await?;

            let analysis = analyze(&records);
            let insights = generate_insights(&analysis)?;

            std::fs::create_dir_all(&out_dir)?;
            write_trend_csv(&out_dir.join("accuracy_trends.csv"), &analysis)?;
            write_topic_csv(&out_dir.join("topic_performance.csv"), &analysis)?;

            let response = AnalysisResponse::new(analysis, insights);
            write_json(&out_dir.join("report.json"), &response)?;
            print_json(&response)?;

            info!(out_dir = %out_dir.display(), quizzes = response.analysis.total_quizzes, "Report written");
        }
    }

    Ok(())
}

/// Logging setup: colored stderr plus a JSON daily rolling log file.
fn init_logging() -> Result<tracing_appender::non_blocking::WorkerGuard> {
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/rank_insights.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("rank_insights.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

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

    Ok(file_guard)
}
