//! Data types produced by the aggregation and insight stages.

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

use crate::analyzers::utility::format_percentage;

/// Running totals for a single quiz topic.
///
/// `correct` and `mistakes` come from different counters, so they need not
/// add up to `total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TopicAggregate {
    pub correct: u64,
    pub total: u64,
    pub mistakes: u64,
}

/// Totals folded from a sequence of submissions.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PerformanceAnalysis {
    pub total_accuracy: f64,
    pub total_score: i64,
    pub total_final_score: f64,
    pub total_negative_score: f64,
    pub total_rank: i64,
    pub total_mistakes_corrected: i64,
    pub total_quizzes: usize,
    pub topic_performance: BTreeMap<String, TopicAggregate>,
    /// Per-submission accuracy, in input order.
    pub accuracy_trends: Vec<f64>,
}

/// Averages across all submissions. Every average is 0 when there are no submissions.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OverallPerformance {
    #[serde(rename = "Average Accuracy", serialize_with = "as_percentage")]
    pub average_accuracy: f64,
    #[serde(rename = "Average Score")]
    pub average_score: f64,
    #[serde(rename = "Average Final Score")]
    pub average_final_score: f64,
    #[serde(rename = "Average Negative Score")]
    pub average_negative_score: f64,
    #[serde(rename = "Average Rank")]
    pub average_rank: f64,
    #[serde(rename = "Average Mistakes Corrected")]
    pub average_mistakes_corrected: f64,
}

fn as_percentage<S: Serializer>(fraction: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_percentage(*fraction))
}

/// A topic whose correctness ratio fell below one half.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeakArea {
    pub correct_answers: u64,
    pub total_questions: u64,
    pub accuracy: f64,
    pub mistakes: u64,
}

/// Direction of accuracy between the first and last submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Trend {
    Improved,
    #[serde(rename = "No Significant Change")]
    NoSignificantChange,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Improved => "Improved",
            Trend::NoSignificantChange => "No Significant Change",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Insights derived from a [`PerformanceAnalysis`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightReport {
    #[serde(rename = "Overall Performance")]
    pub overall: OverallPerformance,
    #[serde(rename = "Weak Areas")]
    pub weak_areas: BTreeMap<String, WeakArea>,
    #[serde(rename = "Improvement Trends")]
    pub trend: Trend,
}
