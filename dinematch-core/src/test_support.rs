//! Test-only scorers and fixtures shared by unit and behaviour tests.

use std::collections::HashMap;

use chrono::{DateTime, TimeDelta, Utc};

use crate::{Restaurant, RestaurantId, ScoreBreakdown, Scorer, User, Visit, VisitHistory};

/// `Scorer` returning preset scores keyed by restaurant identifier.
///
/// Restaurants without a preset receive the fallback score. The breakdown is
/// always empty.
#[derive(Debug, Clone, Default)]
pub struct FixedScorer {
    fallback: f32,
    scores: HashMap<RestaurantId, f32>,
}

impl FixedScorer {
    /// Create a scorer that returns `fallback` for every restaurant.
    #[must_use]
    pub fn new(fallback: f32) -> Self {
        Self {
            fallback,
            scores: HashMap::new(),
        }
    }

    /// Preset the score for one restaurant.
    #[must_use]
    pub fn with_score(mut self, restaurant: &str, score: f32) -> Self {
        self.scores.insert(RestaurantId::from(restaurant), score);
        self
    }
}

impl Scorer for FixedScorer {
    fn score(
        &self,
        _user: &User,
        restaurant: &Restaurant,
        _history: &VisitHistory,
        _now: DateTime<Utc>,
    ) -> f32 {
        Self::sanitise(
            self.scores
                .get(&restaurant.id)
                .copied()
                .unwrap_or(self.fallback),
        )
    }

    fn breakdown(
        &self,
        _user: &User,
        _restaurant: &Restaurant,
        _history: &VisitHistory,
        _now: DateTime<Utc>,
    ) -> ScoreBreakdown {
        ScoreBreakdown::default()
    }
}

/// Build a history holding one visit `days` days before `now`.
#[must_use]
pub fn visited_days_ago(
    user: &User,
    restaurant: &Restaurant,
    now: DateTime<Utc>,
    days: i64,
) -> VisitHistory {
    VisitHistory::from(vec![Visit {
        user_id: user.id.clone(),
        restaurant_id: restaurant.id.clone(),
        visited_at: now - TimeDelta::days(days),
    }])
}
