//! Static neighbourhood adjacency used by the location signal.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

/// Maps a neighbourhood to the neighbourhoods considered nearby.
///
/// Adjacency is directional: listing `uptown` under `midtown` says nothing
/// about `midtown` under `uptown`. Build the table once and share it.
///
/// # Examples
/// ```
/// use dinematch_core::ProximityTable;
///
/// let table = ProximityTable::default();
/// assert!(table.is_nearby("downtown", "midtown"));
/// assert!(!table.is_nearby("downtown", "suburbs"));
///
/// let custom = ProximityTable::new().with_neighbours("harbour", ["old_town"]);
/// assert!(custom.is_nearby("harbour", "old_town"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProximityTable {
    nearby: HashMap<String, BTreeSet<String>>,
}

impl ProximityTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nearby: HashMap::new(),
        }
    }

    /// Add neighbours for `neighborhood`, returning `self` for chaining.
    #[must_use]
    pub fn with_neighbours<I, S>(mut self, neighborhood: impl Into<String>, neighbours: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.nearby
            .entry(neighborhood.into())
            .or_default()
            .extend(neighbours.into_iter().map(Into::into));
        self
    }

    /// Report whether `candidate` is listed as near `neighborhood`.
    #[must_use]
    pub fn is_nearby(&self, neighborhood: &str, candidate: &str) -> bool {
        self.nearby
            .get(neighborhood)
            .is_some_and(|neighbours| neighbours.contains(candidate))
    }
}

impl Default for ProximityTable {
    fn default() -> Self {
        Self::new()
            .with_neighbours("downtown", ["midtown", "old_town"])
            .with_neighbours("midtown", ["downtown", "uptown"])
            .with_neighbours("uptown", ["midtown", "suburbs"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("downtown", "old_town", true)]
    #[case("midtown", "uptown", true)]
    #[case("uptown", "suburbs", true)]
    #[case("suburbs", "uptown", false)]
    #[case("old_town", "downtown", false)]
    #[case("nowhere", "downtown", false)]
    fn default_table_is_directional(
        #[case] from: &str,
        #[case] to: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(ProximityTable::default().is_nearby(from, to), expected);
    }

    #[rstest]
    fn repeated_neighbours_accumulate() {
        let table = ProximityTable::new()
            .with_neighbours("a", ["c"])
            .with_neighbours("a", ["b"]);
        assert!(table.is_nearby("a", "b"));
        assert!(table.is_nearby("a", "c"));
        assert!(!table.is_nearby("b", "a"));
    }
}
