//! Quiz performance analytics.
//!
//! Submissions are folded into totals ([`aggregate`]), turned into averages,
//! weak areas and a trend ([`insights`]), used to fit a least-squares rank
//! model ([`regression`]), and predicted ranks are mapped onto college tiers
//! ([`tiers`]).

pub mod aggregate;
pub mod insights;
pub mod regression;
pub mod tiers;
pub mod types;
pub mod utility;

pub use aggregate::analyze;
pub use insights::{classify_trend, generate_insights, weak_areas};
pub use regression::{RankFeatures, RegressionModel, fit_rank_model, predict_rank};
pub use tiers::{CollegePrediction, CollegeTier, TierTable, predict_college};
