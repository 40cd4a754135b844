//! Restaurants that can be recommended.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::Location;

/// Opaque restaurant identifier issued by the data provider.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RestaurantId(String);

impl RestaurantId {
    /// Wrap a raw identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RestaurantId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl std::fmt::Display for RestaurantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A candidate restaurant.
///
/// Fields the scoring engine does not read are dropped on decode.
///
/// # Examples
/// ```
/// use dinematch_core::{Location, Restaurant};
///
/// let restaurant = Restaurant::new("r1", Location::new("midtown", "springfield"))
///     .with_name("Luigi's")
///     .with_cuisines(["italian"])
///     .with_rating(4.0);
/// assert_eq!(restaurant.average_rating, Some(4.0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    /// Provider-issued identifier.
    #[serde(alias = "_id")]
    pub id: RestaurantId,
    /// Display name, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Trading location.
    #[serde(flatten)]
    pub location: Location,
    /// Cuisine tags served; `None` when never captured.
    #[serde(default)]
    pub cuisines: Option<BTreeSet<String>>,
    /// Average guest rating on a `0.0..=5.0` scale.
    #[serde(default)]
    pub average_rating: Option<f32>,
}

impl Restaurant {
    /// Construct a restaurant with no name, cuisines or rating.
    pub fn new(id: impl Into<String>, location: Location) -> Self {
        Self {
            id: RestaurantId::new(id),
            name: None,
            location,
            cuisines: None,
            average_rating: None,
        }
    }

    /// Set the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the cuisines served.
    #[must_use]
    pub fn with_cuisines<I, S>(mut self, cuisines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cuisines = Some(cuisines.into_iter().map(Into::into).collect());
        self
    }

    /// Set the average rating.
    #[must_use]
    pub const fn with_rating(mut self, rating: f32) -> Self {
        self.average_rating = Some(rating);
        self
    }
}
