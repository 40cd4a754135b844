//! Diners and their dining habits.

use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};

use crate::Location;

/// Opaque diner identifier issued by the data provider.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
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

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// How often a diner reports eating out.
///
/// # Examples
/// ```
/// use dinematch_core::DiningFrequency;
///
/// assert_eq!(DiningFrequency::SeveralTimesWeek.as_str(), "several_times_week");
/// assert_eq!("weekly".parse::<DiningFrequency>(), Ok(DiningFrequency::Weekly));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiningFrequency {
    /// Eats out every day.
    Daily,
    /// Eats out a few times a week.
    SeveralTimesWeek,
    /// Eats out once a week.
    Weekly,
    /// Eats out every other week.
    Biweekly,
    /// Eats out about once a month.
    Monthly,
    /// Hardly ever eats out.
    Rarely,
}

impl DiningFrequency {
    /// Return the tier as its wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::SeveralTimesWeek => "several_times_week",
            Self::Weekly => "weekly",
            Self::Biweekly => "biweekly",
            Self::Monthly => "monthly",
            Self::Rarely => "rarely",
        }
    }

    /// Frequency signal value for this tier.
    #[must_use]
    pub const fn score(self) -> f32 {
        match self {
            Self::Daily => 1.0,
            Self::SeveralTimesWeek => 0.8,
            Self::Weekly => 0.6,
            Self::Biweekly => 0.4,
            Self::Monthly => 0.2,
            Self::Rarely => 0.1,
        }
    }
}

impl std::fmt::Display for DiningFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DiningFrequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Self::Daily),
            "several_times_week" => Ok(Self::SeveralTimesWeek),
            "weekly" => Ok(Self::Weekly),
            "biweekly" => Ok(Self::Biweekly),
            "monthly" => Ok(Self::Monthly),
            "rarely" => Ok(Self::Rarely),
            _ => Err(format!("unknown dining frequency '{s}'")),
        }
    }
}

/// A diner to recommend restaurants to.
///
/// # Examples
/// ```
/// use dinematch_core::{DiningFrequency, Location, User};
///
/// let user = User::new("u1", Location::new("downtown", "springfield"))
///     .with_cuisines(["italian", "thai"])
///     .with_frequency(DiningFrequency::Weekly);
/// assert_eq!(user.id.as_str(), "u1");
/// assert_eq!(user.preferred_cuisines.as_ref().map(|c| c.len()), Some(2));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Provider-issued identifier.
    #[serde(alias = "_id")]
    pub id: UserId,
    /// Home location.
    #[serde(flatten)]
    pub location: Location,
    /// Cuisine tags the diner prefers; `None` when never captured.
    #[serde(default)]
    pub preferred_cuisines: Option<BTreeSet<String>>,
    /// Self-reported dining frequency. Unrecognised tiers decode as `None`.
    #[serde(default, deserialize_with = "lenient_frequency")]
    pub dining_frequency: Option<DiningFrequency>,
    /// Whether the diner takes part in matching runs.
    #[serde(default = "active_by_default")]
    pub active: bool,
}

impl User {
    /// Construct an active user with no cuisine or frequency data.
    pub fn new(id: impl Into<String>, location: Location) -> Self {
        Self {
            id: UserId::new(id),
            location,
            preferred_cuisines: None,
            dining_frequency: None,
            active: true,
        }
    }

    /// Set the preferred cuisines, returning `self` for chaining.
    #[must_use]
    pub fn with_cuisines<I, S>(mut self, cuisines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.preferred_cuisines = Some(cuisines.into_iter().map(Into::into).collect());
        self
    }

    /// Set the dining frequency, returning `self` for chaining.
    #[must_use]
    pub const fn with_frequency(mut self, frequency: DiningFrequency) -> Self {
        self.dining_frequency = Some(frequency);
        self
    }
}

const fn active_by_default() -> bool {
    true
}

fn lenient_frequency<'de, D>(deserializer: D) -> Result<Option<DiningFrequency>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|tier| match tier.parse() {
        Ok(parsed) => Some(parsed),
        Err(reason) => {
            log::debug!("ignoring dining frequency: {reason}");
            None
        }
    }))
}
