//! Submission records and their construction-time validation.
//!
//! JSON submissions deserialize into [`RawSubmission`], which mirrors the
//! loosely typed shape stored on disk. Converting it into a
//! [`SubmissionRecord`] normalizes accuracy and rejects values the analytics
//! pipeline cannot use.

use chrono::{DateTime, FixedOffset};
use serde::Deserialize;

use crate::error::AnalyticsError;

/// Accuracy as it appears in stored submissions: a fraction or a percentage string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AccuracyValue {
    Fraction(f64),
    Text(String),
}

impl Default for AccuracyValue {
    fn default() -> Self {
        AccuracyValue::Fraction(0.0)
    }
}

/// Quiz metadata embedded in a submission. Only the fields the pipeline reads are kept.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct QuizRef {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
}

/// Unvalidated submission as deserialized from JSON.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawSubmission {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub quiz_id: Option<i64>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub submitted_at: Option<DateTime<FixedOffset>>,

    pub score: i64,
    pub accuracy: AccuracyValue,
    pub final_score: f64,
    pub negative_score: f64,
    pub correct_answers: u32,
    pub incorrect_answers: u32,
    pub total_questions: u32,
    pub better_than: i64,
    pub mistakes_corrected: i64,

    #[serde(default)]
    pub quiz: Option<QuizRef>,
}

/// A validated, immutable quiz submission.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionRecord {
    id: Option<i64>,
    quiz_id: Option<i64>,
    user_id: Option<String>,
    submitted_at: Option<DateTime<FixedOffset>>,
    score: i64,
    accuracy: f64,
    final_score: f64,
    negative_score: f64,
    correct_answers: u32,
    incorrect_answers: u32,
    total_questions: u32,
    better_than: i64,
    mistakes_corrected: i64,
    quiz_title: Option<String>,
    topic: Option<String>,
}

impl SubmissionRecord {
    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn quiz_id(&self) -> Option<i64> {
        self.quiz_id
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn submitted_at(&self) -> Option<DateTime<FixedOffset>> {
        self.submitted_at
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    /// Accuracy as a fraction in `[0, 1]`.
    pub fn accuracy(&self) -> f64 {
        self.accuracy
    }

    pub fn final_score(&self) -> f64 {
        self.final_score
    }

    pub fn negative_score(&self) -> f64 {
        self.negative_score
    }

    pub fn correct_answers(&self) -> u32 {
        self.correct_answers
    }

    pub fn incorrect_answers(&self) -> u32 {
        self.incorrect_answers
    }

    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    /// Number of peers this submission outperformed.
    pub fn better_than(&self) -> i64 {
        self.better_than
    }

    pub fn mistakes_corrected(&self) -> i64 {
        self.mistakes_corrected
    }

    pub fn quiz_title(&self) -> Option<&str> {
        self.quiz_title.as_deref()
    }

    /// Topic of the quiz, or `None` when missing or empty.
    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref().filter(|t| !t.is_empty())
    }
}

impl TryFrom<RawSubmission> for SubmissionRecord {
    type Error = AnalyticsError;

    fn try_from(raw: RawSubmission) -> Result<Self, Self::Error> {
        let accuracy = normalize_accuracy(&raw.accuracy)?;
        let (quiz_title, topic) = match raw.quiz {
            Some(quiz) => (quiz.title, quiz.topic),
            None => (None, None),
        };

        Ok(SubmissionRecord {
            id: raw.id,
            quiz_id: raw.quiz_id,
            user_id: raw.user_id,
            submitted_at: raw.submitted_at,
            score: raw.score,
            accuracy,
            final_score: raw.final_score,
            negative_score: raw.negative_score,
            correct_answers: raw.correct_answers,
            incorrect_answers: raw.incorrect_answers,
            total_questions: raw.total_questions,
            better_than: raw.better_than,
            mistakes_corrected: raw.mistakes_corrected,
            quiz_title,
            topic,
        })
    }
}

/// Converts a stored accuracy into a fraction.
///
/// Strings containing `%` are read as percentages (`"75%"` becomes `0.75`);
/// other strings and plain numbers are read as fractions. The result must be
/// finite and within `[0, 1]`.
pub fn normalize_accuracy(value: &AccuracyValue) -> Result<f64, AnalyticsError> {
    let fraction = match value {
        AccuracyValue::Fraction(f) => *f,
        AccuracyValue::Text(text) => {
            let (digits, scale) = if text.contains('%') {
                (text.replace('%', ""), 100.0)
            } else {
                (text.clone(), 1.0)
            };
            let parsed: f64 = digits.trim().parse().map_err(|_| AnalyticsError::InvalidRecord {
                field: "accuracy",
                reason: format!("`{text}` is not a number or percentage"),
            })?;
            parsed / scale
        }
    };

    if !fraction.is_finite() || !(0.0..=1.0).contains(&fraction) {
        return Err(AnalyticsError::InvalidRecord {
            field: "accuracy",
            reason: format!("{fraction} is outside [0, 1]"),
        });
    }

    Ok(fraction)
}
