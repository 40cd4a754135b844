//! Read access to diners, restaurants and visits.

use chrono::{DateTime, Utc};
use dinematch_core::{Restaurant, User, UserId, VisitHistory};

use crate::ProviderError;

/// One page of active diners.
#[derive(Debug, Clone, PartialEq)]
pub struct UserPage {
    /// Diners on this page.
    pub results: Vec<User>,
    /// Active diners after this page.
    pub remaining: usize,
}

/// Source of the records the scoring engine consumes.
///
/// Implementations must be `Send + Sync`; the matching service queries the
/// provider from several worker threads at once.
pub trait DataProvider: Send + Sync {
    /// Return up to `limit` active diners starting at `cursor`.
    ///
    /// # Errors
    /// Returns [`ProviderError`] when the provider cannot list diners.
    fn fetch_users(&self, cursor: usize, limit: usize) -> Result<UserPage, ProviderError>;

    /// Load a single diner by identifier.
    ///
    /// # Errors
    /// Returns [`ProviderError::UserNotFound`] for unknown identifiers.
    fn fetch_user(&self, user_id: &UserId) -> Result<User, ProviderError>;

    /// List restaurants, restricted to `neighborhood` when given.
    ///
    /// # Errors
    /// Returns [`ProviderError`] when the provider cannot list restaurants.
    fn fetch_restaurants(&self, neighborhood: Option<&str>)
    -> Result<Vec<Restaurant>, ProviderError>;

    /// Visits by `user_id` made strictly after `since`.
    ///
    /// # Errors
    /// Returns [`ProviderError`] when the provider cannot list visits.
    fn fetch_visits(
        &self,
        user_id: &UserId,
        since: DateTime<Utc>,
    ) -> Result<VisitHistory, ProviderError>;
}
