//! Neighbourhood and city descriptors shared by diners and restaurants.

use serde::{Deserialize, Serialize};

/// Where a diner lives or a restaurant trades.
///
/// Both parts are optional because upstream records are frequently
/// incomplete. Signals treat a missing part as "no evidence" rather than as a
/// match.
///
/// # Examples
/// ```
/// use dinematch_core::Location;
///
/// let here = Location::new("downtown", "springfield");
/// assert_eq!(here.neighborhood(), Some("downtown"));
/// assert!(Location::default().city().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Location {
    /// Neighbourhood identifier, e.g. `"downtown"`.
    #[serde(default)]
    pub neighborhood: Option<String>,
    /// City identifier.
    #[serde(default)]
    pub city: Option<String>,
}

impl Location {
    /// Build a location with both neighbourhood and city.
    pub fn new(neighborhood: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            neighborhood: Some(neighborhood.into()),
            city: Some(city.into()),
        }
    }

    /// Build a location that only knows its neighbourhood.
    pub fn in_neighborhood(neighborhood: impl Into<String>) -> Self {
        Self {
            neighborhood: Some(neighborhood.into()),
            city: None,
        }
    }

    /// Return the neighbourhood, if known. A blank value counts as unknown.
    #[must_use]
    pub fn neighborhood(&self) -> Option<&str> {
        known(self.neighborhood.as_deref())
    }

    /// Return the city, if known. A blank value counts as unknown.
    #[must_use]
    pub fn city(&self) -> Option<&str> {
        known(self.city.as_deref())
    }

    /// Report whether both locations name the same, known city.
    #[must_use]
    pub fn shares_city_with(&self, other: &Self) -> bool {
        matches!((self.city(), other.city()), (Some(a), Some(b)) if a == b)
    }

    /// Report whether both locations name the same, known neighbourhood.
    #[must_use]
    pub fn shares_neighborhood_with(&self, other: &Self) -> bool {
        matches!(
            (self.neighborhood(), other.neighborhood()),
            (Some(a), Some(b)) if a == b
        )
    }
}

fn known(part: Option<&str>) -> Option<&str> {
    part.filter(|value| !value.is_empty())
}
