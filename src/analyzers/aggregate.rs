use crate::analyzers::types::PerformanceAnalysis;
use crate::records::SubmissionRecord;

/// Folds a sequence of submissions into a single [`PerformanceAnalysis`].
///
/// Every record contributes to the overall totals and the accuracy trend.
/// Records without a topic are left out of the per-topic breakdown only.
/// An empty input yields zero totals and an empty trend. Integer totals
/// saturate at the bounds of `i64` instead of overflowing.
pub fn analyze(records: &[SubmissionRecord]) -> PerformanceAnalysis {
    let mut analysis = PerformanceAnalysis::default();

    for record in records {
        analysis.total_quizzes += 1;
        analysis.total_accuracy += record.accuracy();
        analysis.total_score = analysis.total_score.saturating_add(record.score());
        analysis.total_final_score += record.final_score();
        analysis.total_negative_score += record.negative_score();
        analysis.total_rank = analysis.total_rank.saturating_add(record.better_than());
        analysis.total_mistakes_corrected = analysis
            .total_mistakes_corrected
            .saturating_add(record.mistakes_corrected());

        if let Some(topic) = record.topic() {
            let entry = analysis
                .topic_performance
                .entry(topic.to_string())
                .or_default();
            entry.correct += u64::from(record.correct_answers());
            entry.total += u64::from(record.total_questions());
            entry.mistakes += u64::from(record.incorrect_answers());
        }

        analysis.accuracy_trends.push(record.accuracy());
    }

    analysis
}
