use std::collections::BTreeMap;

use crate::analyzers::types::{InsightReport, OverallPerformance, PerformanceAnalysis, Trend, WeakArea};
use crate::analyzers::utility::{average, ratio};
use crate::error::AnalyticsError;

/// Topics answered correctly less often than this are weak areas.
pub const WEAK_AREA_THRESHOLD: f64 = 0.5;

impl OverallPerformance {
    /// Averages every running total over the number of submissions.
    pub fn from_analysis(analysis: &PerformanceAnalysis) -> Self {
        let n = analysis.total_quizzes;
        OverallPerformance {
            average_accuracy: average(analysis.total_accuracy, n),
            average_score: average(analysis.total_score as f64, n),
            average_final_score: average(analysis.total_final_score, n),
            average_negative_score: average(analysis.total_negative_score, n),
            average_rank: average(analysis.total_rank as f64, n),
            average_mistakes_corrected: average(analysis.total_mistakes_corrected as f64, n),
        }
    }
}

/// Builds the insight report for an analysis.
///
/// # Errors
///
/// Returns [`AnalyticsError::EmptyInput`] when the analysis has no accuracy
/// trend to classify, i.e. it was built from zero submissions.
pub fn generate_insights(analysis: &PerformanceAnalysis) -> Result<InsightReport, AnalyticsError> {
    Ok(InsightReport {
        overall: OverallPerformance::from_analysis(analysis),
        weak_areas: weak_areas(analysis),
        trend: classify_trend(&analysis.accuracy_trends)?,
    })
}

/// Collects topics whose correctness ratio is strictly below [`WEAK_AREA_THRESHOLD`].
///
/// Topics with no questions have no ratio and are never reported.
pub fn weak_areas(analysis: &PerformanceAnalysis) -> BTreeMap<String, WeakArea> {
    analysis
        .topic_performance
        .iter()
        .filter_map(|(topic, perf)| {
            let accuracy = ratio(perf.correct, perf.total)?;
            (accuracy < WEAK_AREA_THRESHOLD).then(|| {
                (
                    topic.clone(),
                    WeakArea {
                        correct_answers: perf.correct,
                        total_questions: perf.total,
                        accuracy,
                        mistakes: perf.mistakes,
                    },
                )
            })
        })
        .collect()
}

/// Compares the last accuracy value with the first.
///
/// A single value is compared with itself and reports no change.
pub fn classify_trend(series: &[f64]) -> Result<Trend, AnalyticsError> {
    let (Some(first), Some(last)) = (series.first(), series.last()) else {
        return Err(AnalyticsError::EmptyInput {
            operation: "trend classification",
        });
    };

    if last > first {
        Ok(Trend::Improved)
    } else {
        Ok(Trend::NoSignificantChange)
    }
}
