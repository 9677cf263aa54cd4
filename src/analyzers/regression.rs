//! Closed-form least-squares rank prediction.
//!
//! The model regresses `better_than` on four submission features with an
//! intercept, solving the normal equations through a pseudo-inverse so that
//! singular or ill-conditioned systems still produce coefficients.

use nalgebra::{DMatrix, DVector};
use serde::Serialize;

use crate::error::AnalyticsError;
use crate::records::SubmissionRecord;

/// Number of predictor features, excluding the intercept.
pub const FEATURE_COUNT: usize = 4;

/// The predictor values of one submission, in model order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RankFeatures {
    pub score: f64,
    pub accuracy: f64,
    pub mistakes_corrected: f64,
    pub final_score: f64,
}

impl RankFeatures {
    pub fn from_record(record: &SubmissionRecord) -> Self {
        RankFeatures {
            score: record.score() as f64,
            accuracy: record.accuracy(),
            mistakes_corrected: record.mistakes_corrected() as f64,
            final_score: record.final_score(),
        }
    }

    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.score,
            self.accuracy,
            self.mistakes_corrected,
            self.final_score,
        ]
    }
}

/// Fitted coefficients: the intercept followed by one weight per feature.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegressionModel {
    coefficients: Vec<f64>,
}

impl RegressionModel {
    pub fn from_coefficients(coefficients: Vec<f64>) -> Self {
        RegressionModel { coefficients }
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn intercept(&self) -> f64 {
        self.coefficients.first().copied().unwrap_or(0.0)
    }

    pub fn weights(&self) -> &[f64] {
        self.coefficients.get(1..).unwrap_or(&[])
    }

    /// Number of features the model expects at prediction time.
    pub fn feature_count(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }
}

/// Fits θ = pinv(XᵀX)·Xᵀy over the submission history.
///
/// Each row of X is `[1, score, accuracy, mistakes_corrected, final_score]`
/// and y holds the matching `better_than` values.
///
/// XᵀX is scaled to a unit diagonal before the SVD so that features of very
/// different magnitude do not push the intercept below the singular value
/// cutoff. Singular values at or below `n·ε·σ_max` of the scaled matrix are
/// treated as zero.
///
/// # Errors
///
/// Returns [`AnalyticsError::EmptyInput`] for an empty history and
/// [`AnalyticsError::Decomposition`] if the normal equations overflow or the
/// SVD cannot be inverted.
#[tracing::instrument(level = "debug", skip_all, fields(records = records.len()))]
pub fn fit_rank_model(records: &[SubmissionRecord]) -> Result<RegressionModel, AnalyticsError> {
    if records.is_empty() {
        return Err(AnalyticsError::EmptyInput {
            operation: "rank model fit",
        });
    }

    let rows: Vec<[f64; FEATURE_COUNT]> = records
        .iter()
        .map(|r| RankFeatures::from_record(r).to_array())
        .collect();

    let x = DMatrix::from_fn(records.len(), FEATURE_COUNT + 1, |r, c| {
        if c == 0 { 1.0 } else { rows[r][c - 1] }
    });
    let y = DVector::from_iterator(records.len(), records.iter().map(|r| r.better_than() as f64));

    let xtx = x.tr_mul(&x);
    let xty = x.tr_mul(&y);
    if !xtx.iter().chain(xty.iter()).all(|v| v.is_finite()) {
        return Err(AnalyticsError::Decomposition(
            "normal equations overflow; feature magnitudes are too large".to_string(),
        ));
    }

    // pinv(XᵀX) is taken as S·pinv(S·XᵀX·S)·S with S = diag(XᵀX)^(-1/2).
    let n = xtx.nrows();
    let scale = DVector::from_iterator(
        n,
        xtx.diagonal()
            .iter()
            .map(|d| if *d > 0.0 { d.sqrt().recip() } else { 1.0 }),
    );
    let scaled = DMatrix::from_fn(n, n, |r, c| xtx[(r, c)] * scale[r] * scale[c]);

    let svd = scaled.svd(true, true);
    let cutoff = svd.singular_values.max() * n as f64 * f64::EPSILON;
    let pinv = svd
        .pseudo_inverse(cutoff)
        .map_err(|e| AnalyticsError::Decomposition(e.to_string()))?;

    let theta = scale.component_mul(&(pinv * scale.component_mul(&xty)));
    tracing::debug!(coefficients = ?theta.as_slice(), "rank model fitted");

    Ok(RegressionModel::from_coefficients(theta.iter().copied().collect()))
}

/// Prepends the intercept term to `features` and takes the dot product with θ.
///
/// # Errors
///
/// Returns [`AnalyticsError::ShapeMismatch`] when `features` does not have
/// exactly as many entries as the model has weights.
pub fn predict_rank(features: &[f64], model: &RegressionModel) -> Result<f64, AnalyticsError> {
    if features.len() != model.feature_count() {
        return Err(AnalyticsError::ShapeMismatch {
            expected: model.feature_count(),
            actual: features.len(),
        });
    }

    let dot = features
        .iter()
        .zip(model.weights())
        .map(|(f, w)| f * w)
        .sum::<f64>();

    Ok(model.intercept() + dot)
}
