use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

use crate::error::AnalyticsError;

/// Rendering of [`CollegePrediction::NotFound`].
pub const NO_COLLEGE_FOUND: &str = "No college found";

/// A named college with an inclusive rank range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollegeTier {
    pub name: String,
    pub rank_lower: i64,
    pub rank_upper: i64,
}

impl CollegeTier {
    pub fn new(name: impl Into<String>, rank_lower: i64, rank_upper: i64) -> Self {
        CollegeTier {
            name: name.into(),
            rank_lower,
            rank_upper,
        }
    }

    pub fn contains(&self, rank: f64) -> bool {
        self.rank_lower as f64 <= rank && rank <= self.rank_upper as f64
    }

    fn overlaps(&self, other: &CollegeTier) -> bool {
        self.rank_lower <= other.rank_upper && other.rank_lower <= self.rank_upper
    }
}

/// Ordered, non-overlapping college tiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierTable {
    tiers: Vec<CollegeTier>,
}

impl TierTable {
    /// Validates and wraps `tiers`, keeping their order.
    ///
    /// # Errors
    ///
    /// Fails if a tier's lower bound exceeds its upper bound or two tiers share a rank.
    pub fn new(tiers: Vec<CollegeTier>) -> Result<Self, AnalyticsError> {
        for tier in &tiers {
            if tier.rank_lower > tier.rank_upper {
                return Err(AnalyticsError::InvalidTier {
                    name: tier.name.clone(),
                    reason: format!(
                        "lower bound {} exceeds upper bound {}",
                        tier.rank_lower, tier.rank_upper
                    ),
                });
            }
        }

        for (i, first) in tiers.iter().enumerate() {
            if let Some(second) = tiers[i + 1..].iter().find(|t| first.overlaps(t)) {
                return Err(AnalyticsError::OverlappingTiers {
                    first: first.name.clone(),
                    second: second.name.clone(),
                });
            }
        }

        Ok(TierTable { tiers })
    }

    pub fn tiers(&self) -> &[CollegeTier] {
        &self.tiers
    }

    /// Returns the first tier, in definition order, containing `rank`.
    pub fn lookup(&self, rank: f64) -> Option<&CollegeTier> {
        self.tiers.iter().find(|t| t.contains(rank))
    }
}

impl Default for TierTable {
    fn default() -> Self {
        TierTable {
            tiers: vec![
                CollegeTier::new("College A", 1, 1000),
                CollegeTier::new("College B", 1001, 5000),
                CollegeTier::new("College C", 5001, 10000),
                CollegeTier::new("College D", 10001, 20000),
                CollegeTier::new("College E", 20001, 50000),
                CollegeTier::new("College F", 50001, 100000),
            ],
        }
    }
}

/// Outcome of a tier lookup. Serializes as the college name or [`NO_COLLEGE_FOUND`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollegePrediction {
    Matched(String),
    NotFound,
}

impl CollegePrediction {
    pub fn as_str(&self) -> &str {
        match self {
            CollegePrediction::Matched(name) => name,
            CollegePrediction::NotFound => NO_COLLEGE_FOUND,
        }
    }
}

impl fmt::Display for CollegePrediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CollegePrediction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Maps a rank onto the first tier whose inclusive bounds contain it.
pub fn predict_college(rank: f64, tiers: &TierTable) -> CollegePrediction {
    match tiers.lookup(rank) {
        Some(tier) => CollegePrediction::Matched(tier.name.clone()),
        None => CollegePrediction::NotFound,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn college(rank: f64) -> String {
        predict_college(rank, &TierTable::default()).to_string()
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(college(1.0), "College A");
        assert_eq!(college(250.0), "College A");
        assert_eq!(college(1000.0), "College A");
        assert_eq!(college(1001.0), "College B");
        assert_eq!(college(5000.0), "College B");
        assert_eq!(college(100000.0), "College F");
    }

    #[test]
    fn test_out_of_range_ranks_are_not_found() {
        let tiers = TierTable::default();
        assert_eq!(predict_college(0.0, &tiers), CollegePrediction::NotFound);
        assert_eq!(predict_college(100001.0, &tiers), CollegePrediction::NotFound);
        assert_eq!(predict_college(-12.0, &tiers), CollegePrediction::NotFound);
        assert_eq!(college(0.0), NO_COLLEGE_FOUND);
    }

    #[test]
    fn test_fractional_rank_between_tiers_is_not_found() {
        assert_eq!(college(1000.5), NO_COLLEGE_FOUND);
    }

    #[test]
    fn test_gaps_are_not_found() {
        let tiers = TierTable::new(vec![
            CollegeTier::new("Near", 1, 10),
            CollegeTier::new("Far", 20, 30),
        ])
        .unwrap();

        assert_eq!(predict_college(15.0, &tiers), CollegePrediction::NotFound);
        assert_eq!(
            predict_college(20.0, &tiers),
            CollegePrediction::Matched("Far".to_string())
        );
    }

    #[test]
    fn test_default_table_is_valid() {
        let tiers = TierTable::default();
        assert_eq!(TierTable::new(tiers.tiers().to_vec()).unwrap(), tiers);
    }

    #[test]
    fn test_overlapping_tiers_are_rejected() {
        let err = TierTable::new(vec![
            CollegeTier::new("A", 1, 100),
            CollegeTier::new("B", 200, 300),
            CollegeTier::new("C", 100, 150),
        ])
        .unwrap_err();

        assert_eq!(
            err,
            AnalyticsError::OverlappingTiers {
                first: "A".to_string(),
                second: "C".to_string(),
            }
        );
    }

    #[test]
    fn test_inverted_bounds_are_rejected() {
        let err = TierTable::new(vec![CollegeTier::new("Backwards", 10, 1)]).unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidTier { .. }));
    }

    #[test]
    fn test_prediction_serializes_as_string() {
        let json = serde_json::to_string(&CollegePrediction::NotFound).unwrap();
        assert_eq!(json, "\"No college found\"");
    }
}
