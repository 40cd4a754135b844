//! Weights and thresholds that steer scoring and ranking.
//!
//! A [`WeightConfig`] is supplied once when a
//! [`ScoringModel`](crate::ScoringModel) is built and is never re-read per
//! call. The weights are expected to sum to `1.0` but nothing normalises
//! them; the combined score is clamped instead.

use serde::{Deserialize, Serialize};
use thiserror::Error;

const SUM_TOLERANCE: f32 = 1e-3;

/// Multipliers applied to each signal.
///
/// `similar_users` is accepted for compatibility with existing
/// configuration files. No signal feeds it, so it never contributes to a
/// score even though it counts towards [`SignalWeights::total`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalWeights {
    /// Weight of the location signal.
    pub location: f32,
    /// Weight of the cuisine overlap signal.
    pub cuisine: f32,
    /// Weight of the recency decay signal.
    pub recency: f32,
    /// Weight of the dining frequency signal.
    pub frequency: f32,
    /// Weight reserved for a similar-users signal that does not exist.
    pub similar_users: f32,
    /// Weight of the rating signal.
    pub rating: f32,
    /// Weight of the novelty signal.
    pub novelty: f32,
}

impl SignalWeights {
    const fn as_array(self) -> [f32; 7] {
        [
            self.location,
            self.cuisine,
            self.recency,
            self.frequency,
            self.similar_users,
            self.rating,
            self.novelty,
        ]
    }

    /// Sum of all seven weights, including the inert `similar_users`.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "the nominal weight budget is a plain sum"
    )]
    pub fn total(self) -> f32 {
        self.as_array().iter().sum()
    }

    fn has_finite_values(self) -> bool {
        self.as_array().iter().all(|weight| weight.is_finite())
    }

    fn has_non_negative_values(self) -> bool {
        self.as_array().iter().all(|weight| *weight >= 0.0_f32)
    }

    #[expect(
        clippy::float_arithmetic,
        reason = "tolerance check compares the weight sum with one"
    )]
    fn sums_to_one(self) -> bool {
        (self.total() - 1.0_f32).abs() <= SUM_TOLERANCE
    }
}

impl Default for SignalWeights {
    fn default() -> Self {
        Self {
            location: 0.25,
            cuisine: 0.20,
            recency: 0.15,
            frequency: 0.10,
            similar_users: 0.15,
            rating: 0.10,
            novelty: 0.05,
        }
    }
}

/// Complete scoring configuration.
///
/// # Examples
/// ```
/// use dinematch_core::WeightConfig;
///
/// let config = WeightConfig::default().validate().expect("defaults are valid");
/// assert_eq!(config.days_before_repeat, 30);
/// assert_eq!(config.max_recommendations, 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightConfig {
    /// Per-signal weights.
    pub weights: SignalWeights,
    /// Candidates scoring below this are discarded.
    pub min_score: f32,
    /// Days after a visit before a restaurant regains full recency.
    pub days_before_repeat: u32,
    /// Default shortlist length used by collaborators.
    pub max_recommendations: usize,
}

impl WeightConfig {
    /// Validate the configuration and return it unchanged.
    ///
    /// Weights must be finite and non-negative and `min_score` must be
    /// finite. A weight sum other than `1.0` is allowed but logged.
    ///
    /// # Errors
    /// Returns [`WeightConfigError`] describing the first problem found.
    pub fn validate(self) -> Result<Self, WeightConfigError> {
        if !self.weights.has_finite_values() {
            return Err(WeightConfigError::NonFiniteWeight);
        }
        if !self.weights.has_non_negative_values() {
            return Err(WeightConfigError::NegativeWeight);
        }
        if !self.min_score.is_finite() {
            return Err(WeightConfigError::NonFiniteMinScore);
        }
        if !self.weights.sums_to_one() {
            log::warn!(
                "signal weights sum to {}, not 1.0; scores are clamped rather than normalised",
                self.weights.total()
            );
        }
        Ok(self)
    }
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            weights: SignalWeights::default(),
            min_score: 0.3,
            days_before_repeat: 30,
            max_recommendations: 5,
        }
    }
}

/// Problems detected by [`WeightConfig::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WeightConfigError {
    /// A weight was NaN or infinite.
    #[error("signal weights must be finite")]
    NonFiniteWeight,
    /// A weight was below zero.
    #[error("signal weights must not be negative")]
    NegativeWeight,
    /// The minimum score was NaN or infinite.
    #[error("minimum score must be finite")]
    NonFiniteMinScore,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[expect(
        clippy::float_arithmetic,
        reason = "tests compare floating point values"
    )]
    fn default_weights_sum_to_one() {
        assert!((SignalWeights::default().total() - 1.0).abs() < 1e-6);
    }

    #[rstest]
    #[case(f32::NAN, WeightConfigError::NonFiniteWeight)]
    #[case(f32::INFINITY, WeightConfigError::NonFiniteWeight)]
    #[case(-0.1, WeightConfigError::NegativeWeight)]
    fn rejects_unusable_weights(#[case] rating: f32, #[case] expected: WeightConfigError) {
        let config = WeightConfig {
            weights: SignalWeights {
                rating,
                ..SignalWeights::default()
            },
            ..WeightConfig::default()
        };
        assert_eq!(config.validate(), Err(expected));
    }

    #[rstest]
    fn rejects_non_finite_min_score() {
        let config = WeightConfig {
            min_score: f32::NAN,
            ..WeightConfig::default()
        };
        assert_eq!(config.validate(), Err(WeightConfigError::NonFiniteMinScore));
    }

    #[rstest]
    fn accepts_weights_that_do_not_sum_to_one() {
        let config = WeightConfig {
            weights: SignalWeights {
                location: 2.0,
                ..SignalWeights::default()
            },
            ..WeightConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[rstest]
    #[expect(
        clippy::float_arithmetic,
        reason = "tests compare floating point values"
    )]
    fn partial_json_keeps_defaults() {
        let config: WeightConfig =
            serde_json::from_str(r#"{"min_score":0.5,"weights":{"novelty":0.2}}"#)
                .expect("config should decode");
        assert!((config.min_score - 0.5).abs() < f32::EPSILON);
        assert!((config.weights.novelty - 0.2).abs() < f32::EPSILON);
        assert!((config.weights.location - 0.25).abs() < f32::EPSILON);
        assert_eq!(config.days_before_repeat, 30);
    }
}
