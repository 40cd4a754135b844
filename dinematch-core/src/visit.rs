//! Past restaurant visits.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{RestaurantId, UserId};

/// One recorded visit of a diner to a restaurant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visit {
    /// Diner who made the visit.
    pub user_id: UserId,
    /// Restaurant that was visited.
    pub restaurant_id: RestaurantId,
    /// When the visit happened.
    #[serde(alias = "visit_date")]
    pub visited_at: DateTime<Utc>,
}

impl Visit {
    /// Record a visit.
    pub fn new(
        user_id: impl Into<String>,
        restaurant_id: impl Into<String>,
        visited_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id: UserId::new(user_id),
            restaurant_id: RestaurantId::new(restaurant_id),
            visited_at,
        }
    }
}

/// A diner's visits within the lookback window.
///
/// Order carries no meaning. The window boundary is the data provider's
/// responsibility; the history is scored as given.
///
/// # Examples
/// ```
/// use chrono::{TimeZone, Utc};
/// use dinematch_core::{RestaurantId, Visit, VisitHistory};
///
/// let at = Utc.with_ymd_and_hms(2024, 5, 1, 19, 0, 0).unwrap();
/// let history = VisitHistory::from(vec![Visit::new("u1", "r1", at)]);
/// assert!(history.contains(&RestaurantId::from("r1")));
/// assert!(history.first_visit_to(&RestaurantId::from("r2")).is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VisitHistory {
    visits: Vec<Visit>,
}

impl VisitHistory {
    /// Return the first recorded visit to `restaurant`, if any.
    ///
    /// When several visits match, which one is returned depends only on the
    /// order the provider supplied them in.
    #[must_use]
    pub fn first_visit_to(&self, restaurant: &RestaurantId) -> Option<&Visit> {
        self.visits
            .iter()
            .find(|visit| &visit.restaurant_id == restaurant)
    }

    /// Report whether the diner has any visit to `restaurant`.
    #[must_use]
    pub fn contains(&self, restaurant: &RestaurantId) -> bool {
        self.first_visit_to(restaurant).is_some()
    }

    /// Iterate over the visits.
    pub fn iter(&self) -> impl Iterator<Item = &Visit> {
        self.visits.iter()
    }

    /// Number of visits in the history.
    #[must_use]
    pub fn len(&self) -> usize {
        self.visits.len()
    }

    /// Report whether the history is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.visits.is_empty()
    }
}

impl From<Vec<Visit>> for VisitHistory {
    fn from(visits: Vec<Visit>) -> Self {
        Self { visits }
    }
}

impl FromIterator<Visit> for VisitHistory {
    fn from_iter<I: IntoIterator<Item = Visit>>(iter: I) -> Self {
        Self {
            visits: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    #[rstest]
    fn first_visit_follows_supplied_order() {
        let early = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let history: VisitHistory = [Visit::new("u", "r", late), Visit::new("u", "r", early)]
            .into_iter()
            .collect();
        let found = history
            .first_visit_to(&RestaurantId::from("r"))
            .expect("visit should be found");
        assert_eq!(found.visited_at, late);
    }

    #[rstest]
    fn decodes_visit_date_alias() {
        let json = r#"[{"user_id":"u","restaurant_id":"r","visit_date":"2024-03-04T10:00:00Z"}]"#;
        let history: VisitHistory = serde_json::from_str(json).expect("history should decode");
        assert_eq!(history.len(), 1);
    }
}
