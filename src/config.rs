//! Runtime configuration read from the environment.

use anyhow::{Context, Result};
use std::path::Path;

use crate::analyzers::tiers::{CollegeTier, TierTable};

const DEFAULT_DATA_DIR: &str = "data";
const HISTORY_FILE: &str = "historical_data.json";
const SUBMISSION_FILE: &str = "submission_data.json";

/// Where submission data and the tier table come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub history: String,
    pub submission: String,
    pub tiers_path: Option<String>,
}

impl AppConfig {
    /// Reads `RANK_INSIGHTS_*` variables, falling back to files under the data directory.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let data_dir =
            lookup("RANK_INSIGHTS_DATA_DIR").unwrap_or_else(|| DEFAULT_DATA_DIR.to_string());
        let in_data_dir = |file: &str| Path::new(&data_dir).join(file).display().to_string();

        AppConfig {
            history: lookup("RANK_INSIGHTS_HISTORY").unwrap_or_else(|| in_data_dir(HISTORY_FILE)),
            submission: lookup("RANK_INSIGHTS_SUBMISSION")
                .unwrap_or_else(|| in_data_dir(SUBMISSION_FILE)),
            tiers_path: lookup("RANK_INSIGHTS_TIERS"),
        }
    }

    /// Loads the configured tier table, or the built-in one when none is set.
    pub fn tier_table(&self) -> Result<TierTable> {
        match &self.tiers_path {
            Some(path) => load_tier_table(path),
            None => Ok(TierTable::default()),
        }
    }
}

/// Loads tiers from a JSON array of `{name, rank_lower, rank_upper}` objects:
/// ```json
/// [
///   { "name": "College A", "rank_lower": 1, "rank_upper": 1000 },
///   { "name": "College B", "rank_lower": 1001, "rank_upper": 5000 }
/// ]
/// ```
pub fn load_tier_table(path: &str) -> Result<TierTable> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("failed to read tiers from {path}"))?;
    let tiers: Vec<CollegeTier> = serde_json::from_str(&content)?;
    Ok(TierTable::new(tiers)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;

    #[test]
    fn test_defaults_point_into_data_dir() {
        let config = AppConfig::from_lookup(|_| None);

        assert_eq!(
            config.history,
            Path::new("data").join("historical_data.json").display().to_string()
        );
        assert_eq!(
            config.submission,
            Path::new("data").join("submission_data.json").display().to_string()
        );
        assert_eq!(config.tiers_path, None);
        assert_eq!(config.tier_table().unwrap(), TierTable::default());
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("RANK_INSIGHTS_DATA_DIR", "/srv/quiz"),
            ("RANK_INSIGHTS_HISTORY", "https://example.com/history.json"),
        ]);
        let config = AppConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.history, "https://example.com/history.json");
        assert_eq!(
            config.submission,
            Path::new("/srv/quiz").join("submission_data.json").display().to_string()
        );
    }

    #[test]
    fn test_load_tier_table() {
        let path = format!("{}/rank_insights_test_tiers.json", std::env::temp_dir().display());
        fs::write(
            &path,
            r#"[{"name": "State", "rank_lower": 1, "rank_upper": 50},
                {"name": "Private", "rank_lower": 51, "rank_upper": 500}]"#,
        )
        .unwrap();

        let tiers = load_tier_table(&path).unwrap();
        assert_eq!(tiers.tiers().len(), 2);
        assert_eq!(tiers.lookup(51.0).map(|t| t.name.as_str()), Some("Private"));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_overlapping_tier_table_fails() {
        let path = format!("{}/rank_insights_test_bad_tiers.json", std::env::temp_dir().display());
        fs::write(
            &path,
            r#"[{"name": "A", "rank_lower": 1, "rank_upper": 50},
                {"name": "B", "rank_lower": 50, "rank_upper": 500}]"#,
        )
        .unwrap();

        assert!(load_tier_table(&path).is_err());

        fs::remove_file(&path).unwrap();
    }
}
