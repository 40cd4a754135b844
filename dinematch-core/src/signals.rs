//! The six scoring signals.
//!
//! Each function is pure and returns a value in `0.0..=1.0`. Missing
//! optional data never fails; every signal has an explicit fallback.

use chrono::{DateTime, TimeDelta, Utc};

use crate::{ProximityTable, Restaurant, User, VisitHistory};

const SAME_NEIGHBORHOOD: f32 = 1.0;
const SAME_CITY: f32 = 0.5;
const NEARBY_NEIGHBORHOOD: f32 = 0.7;
const UNKNOWN_FREQUENCY: f32 = 0.5;
const UNKNOWN_RATING: f32 = 0.5;
const RATING_SCALE: f32 = 5.0;

/// Names of the signals reported in a score breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Signal {
    /// Location proximity.
    Location,
    /// Cuisine overlap.
    Cuisine,
    /// Time since the last visit.
    Recency,
    /// How often the diner eats out.
    Frequency,
    /// Restaurant rating.
    Rating,
    /// Whether the diner has never been.
    Novelty,
}

impl Signal {
    /// Every signal, in breakdown order.
    pub const ALL: [Self; 6] = [
        Self::Location,
        Self::Cuisine,
        Self::Recency,
        Self::Frequency,
        Self::Rating,
        Self::Novelty,
    ];

    /// Return the signal as a lowercase `&str`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Location => "location",
            Self::Cuisine => "cuisine",
            Self::Recency => "recency",
            Self::Frequency => "frequency",
            Self::Rating => "rating",
            Self::Novelty => "novelty",
        }
    }
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Score how close a restaurant is to the diner's home.
///
/// Checks run in a fixed order and the first hit wins: identical
/// neighbourhood (`1.0`), then same city (`0.5`), then a proximity-listed
/// neighbourhood (`0.7`). A same-city restaurant that is also listed as
/// nearby therefore scores `0.5`. Either neighbourhood missing or blank
/// yields `0.0`.
///
/// # Examples
/// ```
/// use dinematch_core::{Location, ProximityTable, Restaurant, User, signals};
///
/// let table = ProximityTable::default();
/// let user = User::new("u", Location::new("downtown", "springfield"));
/// let near = Restaurant::new("r", Location::new("midtown", "shelbyville"));
/// assert_eq!(signals::location_score(&user, &near, &table), 0.7);
/// ```
#[must_use]
pub fn location_score(user: &User, restaurant: &Restaurant, proximity: &ProximityTable) -> f32 {
    let (home, venue) = (&user.location, &restaurant.location);
    let (Some(home_hood), Some(venue_hood)) = (home.neighborhood(), venue.neighborhood()) else {
        return 0.0;
    };
    if home.shares_neighborhood_with(venue) {
        return SAME_NEIGHBORHOOD;
    }
    if home.shares_city_with(venue) {
        return SAME_CITY;
    }
    if proximity.is_nearby(home_hood, venue_hood) {
        return NEARBY_NEIGHBORHOOD;
    }
    0.0
}

/// Share of the diner's preferred cuisines the restaurant serves.
///
/// The measure is asymmetric: extra cuisines on the menu neither help nor
/// hurt. Either list missing yields `0.0`.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "overlap ratio divides two small set sizes"
)]
pub fn cuisine_score(user: &User, restaurant: &Restaurant) -> f32 {
    let (Some(preferred), Some(served)) = (&user.preferred_cuisines, &restaurant.cuisines) else {
        return 0.0;
    };
    let overlap = preferred.intersection(served).count();
    overlap as f32 / preferred.len().max(1) as f32
}

/// Whole days between two instants, rounded half up.
#[must_use]
pub fn days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    (to - from)
        .abs()
        .checked_add(&TimeDelta::hours(12))
        .map_or(i64::MAX, |elapsed| elapsed.num_days())
}

/// Linear decay that withholds a restaurant the diner visited recently.
///
/// Never visited scores `1.0`. Otherwise the first matching visit is aged in
/// whole days: a same-day visit scores `0.0`, and the score ramps linearly
/// to `1.0` at `days_before_repeat` days.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "decay ratio of elapsed days is bounded by the repeat window"
)]
pub fn recency_score(
    history: &VisitHistory,
    restaurant: &Restaurant,
    now: DateTime<Utc>,
    days_before_repeat: u32,
) -> f32 {
    let Some(visit) = history.first_visit_to(&restaurant.id) else {
        return 1.0;
    };
    let elapsed = days_between(visit.visited_at, now);
    if elapsed >= i64::from(days_before_repeat) {
        return 1.0;
    }
    if elapsed == 0 {
        return 0.0;
    }
    elapsed as f32 / days_before_repeat as f32
}

/// Score the diner's dining frequency tier.
///
/// A missing tier scores `0.5`.
#[must_use]
pub fn frequency_score(user: &User) -> f32 {
    user.dining_frequency
        .map_or(UNKNOWN_FREQUENCY, crate::DiningFrequency::score)
}

/// Normalise the average rating onto `0.0..=1.0`.
///
/// A missing or non-finite rating scores `0.5`.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "ratings are rescaled from five stars"
)]
pub fn rating_score(restaurant: &Restaurant) -> f32 {
    match restaurant.average_rating {
        Some(rating) if rating.is_finite() => (rating / RATING_SCALE).clamp(0.0, 1.0),
        _ => UNKNOWN_RATING,
    }
}

/// `1.0` when the diner has never visited the restaurant, else `0.0`.
#[must_use]
pub fn novelty_score(history: &VisitHistory, restaurant: &Restaurant) -> f32 {
    if history.contains(&restaurant.id) {
        0.0
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DiningFrequency, Location, Visit};
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    #[fixture]
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap()
    }

    #[rstest]
    fn same_city_beats_proximity() {
        let table = ProximityTable::default();
        let user = User::new("u", Location::new("downtown", "springfield"));
        let restaurant = Restaurant::new("r", Location::new("midtown", "springfield"));
        assert_eq!(location_score(&user, &restaurant, &table), SAME_CITY);
    }

    #[rstest]
    fn missing_neighbourhood_scores_zero() {
        let table = ProximityTable::default();
        let user = User::new("u", Location::default());
        let restaurant = Restaurant::new("r", Location::new("downtown", "springfield"));
        assert_eq!(location_score(&user, &restaurant, &table), 0.0);
    }

    #[rstest]
    #[case(0, 0)]
    #[case(11, 0)]
    #[case(12, 1)]
    #[case(36, 2)]
    fn days_round_half_up(now: DateTime<Utc>, #[case] hours: i64, #[case] days: i64) {
        let earlier = now - TimeDelta::hours(hours);
        assert_eq!(days_between(earlier, now), days);
        assert_eq!(days_between(now, earlier), days);
    }

    #[rstest]
    #[expect(
        clippy::float_arithmetic,
        reason = "tests compare floating point values"
    )]
    fn recency_ramps_linearly(now: DateTime<Utc>) {
        let restaurant = Restaurant::new("r", Location::default());
        let history = VisitHistory::from(vec![Visit::new("u", "r", now - TimeDelta::days(15))]);
        let score = recency_score(&history, &restaurant, now, 30);
        assert!((score - 0.5).abs() < 1e-6);
    }

    #[rstest]
    fn zero_repeat_window_always_recovers(now: DateTime<Utc>) {
        let restaurant = Restaurant::new("r", Location::default());
        let history = VisitHistory::from(vec![Visit::new("u", "r", now)]);
        assert_eq!(recency_score(&history, &restaurant, now, 0), 1.0);
    }

    #[rstest]
    #[case(Some(DiningFrequency::Daily), 1.0)]
    #[case(Some(DiningFrequency::Biweekly), 0.4)]
    #[case(None, 0.5)]
    fn frequency_tiers(#[case] tier: Option<DiningFrequency>, #[case] expected: f32) {
        let mut user = User::new("u", Location::default());
        user.dining_frequency = tier;
        assert_eq!(frequency_score(&user), expected);
    }

    #[rstest]
    #[case(Some(5.0), 1.0)]
    #[case(Some(0.0), 0.0)]
    #[case(Some(7.5), 1.0)]
    #[case(Some(f32::NAN), 0.5)]
    #[case(None, 0.5)]
    fn rating_is_rescaled(#[case] rating: Option<f32>, #[case] expected: f32) {
        let mut restaurant = Restaurant::new("r", Location::default());
        restaurant.average_rating = rating;
        assert_eq!(rating_score(&restaurant), expected);
    }
}
