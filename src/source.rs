//! Suppliers of submission data.
//!
//! A location is either a local JSON file or an `http(s)` URL. Missing local
//! files are tolerated: history reads as empty and the current submission as
//! absent. Callers receive records through [`SubmissionSource`] instead of
//! reading shared state.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::time::Duration;
use tracing::{debug, warn};

use crate::records::{RawSubmission, SubmissionRecord};

/// Provides the submission history and the submission being evaluated.
#[async_trait]
pub trait SubmissionSource: Send + Sync {
    /// All past submissions, in the order they were recorded.
    async fn history(&self) -> Result<Vec<SubmissionRecord>>;

    /// The fresh submission to analyze, if one is available.
    async fn current(&self) -> Result<Option<SubmissionRecord>>;
}

/// Reads history and the current submission from JSON files or URLs.
pub struct JsonSource {
    history: String,
    submission: String,
    client: reqwest::Client,
}

impl JsonSource {
    pub fn new(history: impl Into<String>, submission: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            history: history.into(),
            submission: submission.into(),
            client,
        })
    }
}

#[async_trait]
impl SubmissionSource for JsonSource {
    async fn history(&self) -> Result<Vec<SubmissionRecord>> {
        match read_location(&self.client, &self.history).await? {
            Some(bytes) => parse_history(&bytes)
                .with_context(|| format!("invalid submission history in {}", self.history)),
            None => Ok(Vec::new()),
        }
    }

    async fn current(&self) -> Result<Option<SubmissionRecord>> {
        match read_location(&self.client, &self.submission).await? {
            Some(bytes) => parse_submission(&bytes)
                .with_context(|| format!("invalid submission in {}", self.submission)),
            None => Ok(None),
        }
    }
}

/// Loads raw bytes from a local file path or fetches them over HTTP.
///
/// Returns `Ok(None)` when a local file does not exist.
#[tracing::instrument(skip(client))]
pub async fn read_location(client: &reqwest::Client, location: &str) -> Result<Option<Vec<u8>>> {
    if location.starts_with("http://") || location.starts_with("https://") {
        let response = client
            .get(location)
            .send()
            .await
            .with_context(|| format!("failed to fetch {location}"))?
            .error_for_status()?;
        let bytes = response.bytes().await?.to_vec();
        debug!(bytes = bytes.len(), "fetched submission data");
        return Ok(Some(bytes));
    }

    match tokio::fs::read(location).await {
        Ok(bytes) => {
            debug!(bytes = bytes.len(), "read submission data");
            Ok(Some(bytes))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!("submission data not found, treating as empty");
            Ok(None)
        }
        Err(e) => Err(e).with_context(|| format!("failed to read {location}")),
    }
}

/// Parses a JSON array of submissions. A JSON `null` is an empty history.
pub fn parse_history(bytes: &[u8]) -> Result<Vec<SubmissionRecord>> {
    let raw: Option<Vec<RawSubmission>> = serde_json::from_slice(bytes)?;

    raw.unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(i, r)| {
            SubmissionRecord::try_from(r).with_context(|| format!("submission #{i} is invalid"))
        })
        .collect()
}

/// Parses a single submission object. A JSON `null` means no submission.
pub fn parse_submission(bytes: &[u8]) -> Result<Option<SubmissionRecord>> {
    let raw: Option<RawSubmission> = serde_json::from_slice(bytes)?;
    Ok(raw.map(SubmissionRecord::try_from).transpose()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE: &str = r#"{
        "score": 40, "accuracy": "50%", "final_score": 38.0, "negative_score": 2.0,
        "correct_answers": 10, "incorrect_answers": 10, "total_questions": 20,
        "better_than": 12, "mistakes_corrected": 4,
        "quiz": { "topic": "Optics" }
    }"#;

    #[test]
    fn test_parse_history_null_is_empty() {
        assert!(parse_history(b"null").unwrap().is_empty());
        assert!(parse_history(b"[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_history_records() {
        let json = format!("[{ONE}, {ONE}]");
        let records = parse_history(json.as_bytes()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].accuracy(), 0.5);
        assert_eq!(records[1].topic(), Some("Optics"));
    }

    #[test]
    fn test_parse_history_reports_bad_record() {
        let bad = ONE.replace("\"50%\"", "\"150%\"");
        let json = format!("[{ONE}, {bad}]");

        let err = parse_history(json.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("submission #1"));
    }

    #[test]
    fn test_parse_submission() {
        assert!(parse_submission(b"null").unwrap().is_none());
        let record = parse_submission(ONE.as_bytes()).unwrap().unwrap();
        assert_eq!(record.better_than(), 12);
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(parse_history(b"{not json").is_err());
        assert!(parse_submission(b"[1, 2]").is_err());
    }

    #[tokio::test]
    async fn test_missing_files_are_tolerated() {
        let dir = std::env::temp_dir();
        let source = JsonSource::new(
            dir.join("rank_insights_missing_history.json").display().to_string(),
            dir.join("rank_insights_missing_submission.json").display().to_string(),
        )
        .unwrap();

        assert!(source.history().await.unwrap().is_empty());
        assert!(source.current().await.unwrap().is_none());
    }
}
