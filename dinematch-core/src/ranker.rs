//! Turn scored candidates into an ordered shortlist.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Restaurant, ScoreBreakdown, Scorer, ScoringModel, User, VisitHistory};

/// A restaurant that survived ranking, with its score and diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredMatch {
    /// The recommended restaurant.
    pub restaurant: Restaurant,
    /// Blended score in `0.0..=1.0`.
    pub score: f32,
    /// Unweighted signal values behind `score`.
    pub breakdown: ScoreBreakdown,
}

/// Filter, order and truncate candidates for one diner.
///
/// Candidates scoring below `min_score` are dropped. Survivors are ordered by
/// descending score; equal scores keep their input order, so the output is
/// reproducible for a fixed input.
///
/// # Examples
/// ```
/// use chrono::{TimeZone, Utc};
/// use dinematch_core::{Location, Ranker, Restaurant, ScoringModel, User, VisitHistory};
///
/// let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
/// let user = User::new("u", Location::new("downtown", "springfield"));
/// let ranker = Ranker::new(ScoringModel::default());
/// assert!(ranker.top_matches(&user, &[], &VisitHistory::default(), now, 5).is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct Ranker<S = ScoringModel> {
    scorer: S,
    min_score: f32,
    default_limit: usize,
}

impl Ranker<ScoringModel> {
    /// Rank with a [`ScoringModel`], taking the threshold and default limit
    /// from its configuration.
    #[must_use]
    pub fn new(model: ScoringModel) -> Self {
        let config = *model.config();
        Self {
            scorer: model,
            min_score: config.min_score,
            default_limit: config.max_recommendations,
        }
    }
}

impl<S: Scorer> Ranker<S> {
    /// Rank with an arbitrary scorer and explicit threshold and limit.
    pub const fn with_scorer(scorer: S, min_score: f32, default_limit: usize) -> Self {
        Self {
            scorer,
            min_score,
            default_limit,
        }
    }

    /// The scorer used to evaluate candidates.
    pub const fn scorer(&self) -> &S {
        &self.scorer
    }

    /// Candidates below this score are discarded.
    pub const fn min_score(&self) -> f32 {
        self.min_score
    }

    /// Shortlist length used by [`Ranker::default_top_matches`].
    pub const fn default_limit(&self) -> usize {
        self.default_limit
    }

    /// Return at most `limit` candidates at or above the threshold, best
    /// first.
    ///
    /// An empty candidate list, or one where nothing clears the threshold,
    /// yields an empty shortlist.
    pub fn top_matches(
        &self,
        user: &User,
        restaurants: &[Restaurant],
        history: &VisitHistory,
        now: DateTime<Utc>,
        limit: usize,
    ) -> Vec<ScoredMatch> {
        let mut matches: Vec<ScoredMatch> = restaurants
            .iter()
            .filter_map(|restaurant| self.evaluate(user, restaurant, history, now))
            .collect();

        // `sort_by` is stable, which preserves candidate order among ties.
        matches.sort_by(|lhs, rhs| descending(lhs.score, rhs.score));
        matches.truncate(limit);

        log::debug!(
            "ranked {} candidates for user {}: {} retained",
            restaurants.len(),
            user.id,
            matches.len()
        );
        matches
    }

    /// [`Ranker::top_matches`] using the configured default limit.
    pub fn default_top_matches(
        &self,
        user: &User,
        restaurants: &[Restaurant],
        history: &VisitHistory,
        now: DateTime<Utc>,
    ) -> Vec<ScoredMatch> {
        self.top_matches(user, restaurants, history, now, self.default_limit)
    }

    fn evaluate(
        &self,
        user: &User,
        restaurant: &Restaurant,
        history: &VisitHistory,
        now: DateTime<Utc>,
    ) -> Option<ScoredMatch> {
        let score = self.scorer.score(user, restaurant, history, now);
        if !score.is_finite() || score < self.min_score {
            return None;
        }
        Some(ScoredMatch {
            restaurant: restaurant.clone(),
            score,
            breakdown: self.scorer.breakdown(user, restaurant, history, now),
        })
    }
}

fn descending(lhs: f32, rhs: f32) -> Ordering {
    rhs.total_cmp(&lhs)
}
