//! Output formatting and persistence for analysis results.
//!
//! Supports JSON printing and file output, plus CSV exports of the accuracy
//! trend and per-topic counts for charting elsewhere.

use anyhow::Result;
use chrono::{DateTime, Utc};
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

use crate::analyzers::types::{InsightReport, PerformanceAnalysis};

/// Combined analysis and insights, as written by the `report` command.
#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub generated_at: DateTime<Utc>,
    pub analysis: PerformanceAnalysis,
    pub insights: InsightReport,
}

impl AnalysisResponse {
    pub fn new(analysis: PerformanceAnalysis, insights: InsightReport) -> Self {
        AnalysisResponse {
            generated_at: Utc::now(),
            analysis,
            insights,
        }
    }
}

#[derive(Serialize)]
struct TrendRow {
    quiz_number: usize,
    accuracy: f64,
}

#[derive(Serialize)]
struct TopicRow<'a> {
    topic: &'a str,
    correct_answers: u64,
    total_questions: u64,
    mistakes: u64,
}

/// Logs a value using Rust's debug pretty-print format.
pub fn print_pretty(value: &impl std::fmt::Debug) {
    debug!("{:#?}", value);
}

/// Prints a value to stdout as pretty JSON.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Writes a value to `path` as pretty JSON, replacing any existing file.
pub fn write_json(path: &Path, value: &impl Serialize) -> Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, value)?;
    info!(path = %path.display(), "JSON written");
    Ok(())
}

/// Writes the accuracy trend as `quiz_number,accuracy` rows, numbered from 1.
pub fn write_trend_csv(path: &Path, analysis: &PerformanceAnalysis) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(true).from_path(path)?;

    for (i, accuracy) in analysis.accuracy_trends.iter().enumerate() {
        writer.serialize(TrendRow {
            quiz_number: i + 1,
            accuracy: *accuracy,
        })?;
    }
    writer.flush()?;

    debug!(path = %path.display(), rows = analysis.accuracy_trends.len(), "Trend CSV written");
    Ok(())
}

/// Writes one row per topic with its correct, total and mistake counts.
pub fn write_topic_csv(path: &Path, analysis: &PerformanceAnalysis) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(true).from_path(path)?;

    for (topic, perf) in &analysis.topic_performance {
        writer.serialize(TopicRow {
            topic,
            correct_answers: perf.correct,
            total_questions: perf.total,
            mistakes: perf.mistakes,
        })?;
    }
    writer.flush()?;

    debug!(path = %path.display(), rows = analysis.topic_performance.len(), "Topic CSV written");
    Ok(())
}
