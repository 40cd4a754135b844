//! In-memory provider decoded from a JSON document.

use std::io::Read;

use chrono::{DateTime, Utc};
use dinematch_core::{Restaurant, User, UserId, Visit, VisitHistory};
use serde::{Deserialize, Serialize};

use crate::{DataProvider, ProviderError, UserPage};

/// Diners, restaurants and visits held in memory.
///
/// The JSON form is an object with `users`, `restaurants` and `visits`
/// arrays; any of them may be omitted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonDataset {
    /// Every diner, active or not.
    pub users: Vec<User>,
    /// Every restaurant.
    pub restaurants: Vec<Restaurant>,
    /// Every recorded visit.
    pub visits: Vec<Visit>,
}

impl JsonDataset {
    /// Decode a dataset from a JSON string.
    ///
    /// # Errors
    /// Returns the `serde_json` error when the document is malformed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Decode a dataset from a reader yielding JSON.
    ///
    /// # Errors
    /// Returns the `serde_json` error when the document is malformed or the
    /// reader fails.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, serde_json::Error> {
        serde_json::from_reader(reader)
    }

    fn active_users(&self) -> impl Iterator<Item = &User> {
        self.users.iter().filter(|user| user.active)
    }
}

impl DataProvider for JsonDataset {
    fn fetch_users(&self, cursor: usize, limit: usize) -> Result<UserPage, ProviderError> {
        let results: Vec<User> = self.active_users().skip(cursor).take(limit).cloned().collect();
        let remaining = self
            .active_users()
            .count()
            .saturating_sub(cursor.saturating_add(results.len()));
        Ok(UserPage { results, remaining })
    }

    fn fetch_user(&self, user_id: &UserId) -> Result<User, ProviderError> {
        self.users
            .iter()
            .find(|user| &user.id == user_id)
            .cloned()
            .ok_or_else(|| ProviderError::UserNotFound {
                user_id: user_id.clone(),
            })
    }

    fn fetch_restaurants(
        &self,
        neighborhood: Option<&str>,
    ) -> Result<Vec<Restaurant>, ProviderError> {
        Ok(self
            .restaurants
            .iter()
            .filter(|restaurant| {
                neighborhood.is_none_or(|wanted| restaurant.location.neighborhood() == Some(wanted))
            })
            .cloned()
            .collect())
    }

    fn fetch_visits(
        &self,
        user_id: &UserId,
        since: DateTime<Utc>,
    ) -> Result<VisitHistory, ProviderError> {
        Ok(self
            .visits
            .iter()
            .filter(|visit| &visit.user_id == user_id && visit.visited_at > since)
            .cloned()
            .collect())
    }
}
