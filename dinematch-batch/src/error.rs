//! Error types raised by data providers, sinks and the matching service.

use dinematch_core::{RestaurantId, UserId};
use thiserror::Error;

/// Errors raised by a [`DataProvider`](crate::DataProvider).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The requested diner does not exist.
    #[error("user {user_id} not found")]
    UserNotFound {
        /// Identifier that was looked up.
        user_id: UserId,
    },
    /// The provider could not serve a request.
    #[error("failed to fetch {resource}: {message}")]
    Unavailable {
        /// What was being fetched.
        resource: &'static str,
        /// Provider-specific failure description.
        message: String,
    },
}

/// Errors raised by an [`OfferSink`](crate::OfferSink) or
/// [`ResultStore`](crate::ResultStore).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SinkError {
    /// The sink refused an offer.
    #[error("offer for restaurant {restaurant_id} was rejected: {reason}")]
    Rejected {
        /// Restaurant named in the rejected offer.
        restaurant_id: RestaurantId,
        /// Sink-specific rejection reason.
        reason: String,
    },
    /// The sink could not accept writes.
    #[error("sink unavailable: {message}")]
    Unavailable {
        /// Sink-specific failure description.
        message: String,
    },
}

/// Errors returned by [`MatchingService`](crate::MatchingService).
#[derive(Debug, Error)]
pub enum BatchError {
    /// Listing active diners failed.
    #[error("failed to list users")]
    FetchUsers {
        /// Source error from the provider.
        #[source]
        source: ProviderError,
    },
    /// Loading a single diner failed.
    #[error("failed to load user {user_id}")]
    FetchUser {
        /// Diner being processed.
        user_id: UserId,
        /// Source error from the provider.
        #[source]
        source: ProviderError,
    },
    /// Loading candidate restaurants failed.
    #[error("failed to list restaurants")]
    FetchRestaurants {
        /// Source error from the provider.
        #[source]
        source: ProviderError,
    },
    /// Persisting a diner's matching results failed.
    #[error("failed to store matching results for user {user_id}")]
    StoreResults {
        /// Diner being processed.
        user_id: UserId,
        /// Source error from the result store.
        #[source]
        source: SinkError,
    },
    /// Recording the execution log failed.
    #[error("failed to record execution log")]
    LogExecution {
        /// Source error from the result store.
        #[source]
        source: SinkError,
    },
}
