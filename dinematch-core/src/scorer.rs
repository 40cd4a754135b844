//! Blend signals into a single bounded score.
//!
//! The [`Scorer`] trait is the seam the [`Ranker`](crate::Ranker) is generic
//! over; [`ScoringModel`] is the production implementation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    ProximityTable, Restaurant, SignalWeights, User, VisitHistory, WeightConfig,
    WeightConfigError, signals,
};

/// Raw, unweighted signal values for one candidate.
///
/// Reported for diagnostics only; scoring never reads a breakdown back.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Location proximity signal.
    pub location: f32,
    /// Cuisine overlap signal.
    pub cuisine: f32,
    /// Recency decay signal.
    pub recency: f32,
    /// Dining frequency signal.
    pub frequency: f32,
    /// Rating signal.
    pub rating: f32,
    /// Novelty signal.
    pub novelty: f32,
}

impl ScoreBreakdown {
    /// Value recorded for `signal`.
    #[must_use]
    pub const fn get(&self, signal: signals::Signal) -> f32 {
        match signal {
            signals::Signal::Location => self.location,
            signals::Signal::Cuisine => self.cuisine,
            signals::Signal::Recency => self.recency,
            signals::Signal::Frequency => self.frequency,
            signals::Signal::Rating => self.rating,
            signals::Signal::Novelty => self.novelty,
        }
    }

    /// Iterate over `(signal, value)` pairs in a fixed order.
    pub fn iter(&self) -> impl Iterator<Item = (signals::Signal, f32)> + '_ {
        signals::Signal::ALL
            .into_iter()
            .map(|signal| (signal, self.get(signal)))
    }

    /// Weighted sum of the signals, before clamping.
    ///
    /// `similar_users` has no signal and adds nothing.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "the score is a weighted sum of signals"
    )]
    pub fn weighted_sum(&self, weights: &SignalWeights) -> f32 {
        self.location * weights.location
            + self.cuisine * weights.cuisine
            + self.recency * weights.recency
            + self.frequency * weights.frequency
            + self.rating * weights.rating
            + self.novelty * weights.novelty
    }
}

/// Calculate how well a restaurant suits a diner.
///
/// Implementations must be thread-safe (`Send` + `Sync`) so candidate sets
/// can be scored in parallel, and must be infallible.
///
/// Implementations must:
/// - Produce finite (`f32::is_finite`) scores.
/// - Return values in `0.0..=1.0`.
///
/// Use [`Scorer::sanitise`] to apply these guards.
pub trait Scorer: Send + Sync {
    /// Return a score for `restaurant` according to `user` and `history`.
    fn score(
        &self,
        user: &User,
        restaurant: &Restaurant,
        history: &VisitHistory,
        now: DateTime<Utc>,
    ) -> f32;

    /// Return the per-signal values behind a score.
    fn breakdown(
        &self,
        user: &User,
        restaurant: &Restaurant,
        history: &VisitHistory,
        now: DateTime<Utc>,
    ) -> ScoreBreakdown;

    /// Clamp and validate a raw score.
    ///
    /// Returns `0.0` for non-finite values and clamps to `0.0..=1.0`.
    fn sanitise(score: f32) -> f32
    where
        Self: Sized,
    {
        if !score.is_finite() {
            return 0.0;
        }
        score.clamp(0.0, 1.0)
    }
}

/// Weighted blend of the six signals.
///
/// # Examples
/// ```
/// use chrono::{TimeZone, Utc};
/// use dinematch_core::{
///     DiningFrequency, Location, Restaurant, Scorer, ScoringModel, User, VisitHistory,
/// };
///
/// let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
/// let user = User::new("u", Location::in_neighborhood("downtown"))
///     .with_cuisines(["italian"])
///     .with_frequency(DiningFrequency::Weekly);
/// let restaurant = Restaurant::new("a", Location::in_neighborhood("downtown"))
///     .with_cuisines(["italian", "thai"])
///     .with_rating(4.5);
///
/// let model = ScoringModel::default();
/// let score = model.calculate_score(&user, &restaurant, &VisitHistory::default(), now);
/// assert!((score - 0.80).abs() < 1e-5);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringModel {
    config: WeightConfig,
    proximity: ProximityTable,
}

impl ScoringModel {
    /// Build a model from a configuration and proximity table.
    ///
    /// # Errors
    /// Returns [`WeightConfigError`] when the configuration fails
    /// [`WeightConfig::validate`].
    pub fn new(config: WeightConfig, proximity: ProximityTable) -> Result<Self, WeightConfigError> {
        Ok(Self {
            config: config.validate()?,
            proximity,
        })
    }

    /// Build a model using the default proximity table.
    ///
    /// # Errors
    /// Propagates [`ScoringModel::new`] failures.
    pub fn with_config(config: WeightConfig) -> Result<Self, WeightConfigError> {
        Self::new(config, ProximityTable::default())
    }

    /// The configuration this model was built with.
    #[must_use]
    pub const fn config(&self) -> &WeightConfig {
        &self.config
    }

    /// The proximity table used by the location signal.
    #[must_use]
    pub const fn proximity(&self) -> &ProximityTable {
        &self.proximity
    }

    /// Weighted, clamped score for one candidate.
    #[must_use]
    pub fn calculate_score(
        &self,
        user: &User,
        restaurant: &Restaurant,
        history: &VisitHistory,
        now: DateTime<Utc>,
    ) -> f32 {
        let raw = self
            .score_breakdown(user, restaurant, history, now)
            .weighted_sum(&self.config.weights);
        Self::sanitise(raw)
    }

    /// Unweighted signal values for one candidate.
    #[must_use]
    pub fn score_breakdown(
        &self,
        user: &User,
        restaurant: &Restaurant,
        history: &VisitHistory,
        now: DateTime<Utc>,
    ) -> ScoreBreakdown {
        ScoreBreakdown {
            location: signals::location_score(user, restaurant, &self.proximity),
            cuisine: signals::cuisine_score(user, restaurant),
            recency: signals::recency_score(
                history,
                restaurant,
                now,
                self.config.days_before_repeat,
            ),
            frequency: signals::frequency_score(user),
            rating: signals::rating_score(restaurant),
            novelty: signals::novelty_score(history, restaurant),
        }
    }
}

impl Default for ScoringModel {
    fn default() -> Self {
        Self {
            config: WeightConfig::default(),
            proximity: ProximityTable::default(),
        }
    }
}

impl Scorer for ScoringModel {
    fn score(
        &self,
        user: &User,
        restaurant: &Restaurant,
        history: &VisitHistory,
        now: DateTime<Utc>,
    ) -> f32 {
        self.calculate_score(user, restaurant, history, now)
    }

    fn breakdown(
        &self,
        user: &User,
        restaurant: &Restaurant,
        history: &VisitHistory,
        now: DateTime<Utc>,
    ) -> ScoreBreakdown {
        self.score_breakdown(user, restaurant, history, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Location, Signal};
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    #[fixture]
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[fixture]
    fn diner() -> User {
        User::new("u", Location::new("downtown", "springfield")).with_cuisines(["italian"])
    }

    #[rstest]
    fn overweighted_config_is_clamped(now: DateTime<Utc>, diner: User) {
        let config = WeightConfig {
            weights: SignalWeights {
                location: 3.0,
                cuisine: 3.0,
                recency: 3.0,
                frequency: 3.0,
                similar_users: 3.0,
                rating: 3.0,
                novelty: 3.0,
            },
            ..WeightConfig::default()
        };
        let model = ScoringModel::with_config(config).expect("valid config");
        let restaurant = Restaurant::new("r", Location::new("downtown", "springfield"));
        let score = model.calculate_score(&diner, &restaurant, &VisitHistory::default(), now);
        assert_eq!(score, 1.0);
    }

    #[rstest]
    fn similar_users_weight_is_inert(now: DateTime<Utc>, diner: User) {
        let only_similar = WeightConfig {
            weights: SignalWeights {
                location: 0.0,
                cuisine: 0.0,
                recency: 0.0,
                frequency: 0.0,
                similar_users: 1.0,
                rating: 0.0,
                novelty: 0.0,
            },
            ..WeightConfig::default()
        };
        let model = ScoringModel::with_config(only_similar).expect("valid config");
        let restaurant = Restaurant::new("r", Location::new("downtown", "springfield"));
        let score = model.calculate_score(&diner, &restaurant, &VisitHistory::default(), now);
        assert_eq!(score, 0.0);
    }

    #[rstest]
    fn breakdown_is_independent_of_weights(now: DateTime<Utc>, diner: User) {
        let restaurant = Restaurant::new("r", Location::new("downtown", "springfield"))
            .with_cuisines(["italian"]);
        let zeroed = WeightConfig {
            weights: SignalWeights {
                location: 0.0,
                cuisine: 0.0,
                recency: 0.0,
                frequency: 0.0,
                similar_users: 0.0,
                rating: 0.0,
                novelty: 0.0,
            },
            ..WeightConfig::default()
        };
        let model = ScoringModel::with_config(zeroed).expect("valid config");
        let history = VisitHistory::default();
        let breakdown = model.score_breakdown(&diner, &restaurant, &history, now);
        assert_eq!(breakdown, ScoringModel::default().score_breakdown(&diner, &restaurant, &history, now));
        assert_eq!(breakdown.get(Signal::Location), 1.0);
        assert_eq!(breakdown.get(Signal::Cuisine), 1.0);
        assert_eq!(breakdown.iter().count(), 6);
    }

    #[rstest]
    fn visit_halfway_through_repeat_window(now: DateTime<Utc>, diner: User) {
        let restaurant = Restaurant::new("r", Location::new("downtown", "springfield"));
        let history = crate::test_support::visited_days_ago(&diner, &restaurant, now, 15);
        let breakdown = ScoringModel::default().score_breakdown(&diner, &restaurant, &history, now);
        assert_eq!(breakdown.recency, 0.5);
        assert_eq!(breakdown.novelty, 0.0);
    }

    #[rstest]
    fn rejects_invalid_config() {
        let config = WeightConfig {
            min_score: f32::INFINITY,
            ..WeightConfig::default()
        };
        assert_eq!(
            ScoringModel::with_config(config),
            Err(WeightConfigError::NonFiniteMinScore)
        );
    }

    #[rstest]
    #[case(f32::NAN, 0.0)]
    #[case(f32::NEG_INFINITY, 0.0)]
    #[case(-0.3, 0.0)]
    #[case(1.7, 1.0)]
    #[case(0.42, 0.42)]
    fn sanitise_clamps_and_filters(#[case] input: f32, #[case] expected: f32) {
        assert_eq!(ScoringModel::sanitise(input), expected);
    }
}
