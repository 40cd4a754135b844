//! Offers produced from matches, and the sinks that persist them.

use chrono::{DateTime, Utc};
use dinematch_core::{RestaurantId, UserId};
use serde::{Deserialize, Serialize};

use crate::{RunSummary, SinkError};

/// Lifecycle state of an offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferStatus {
    /// Offer is live and may be claimed.
    Active,
}

/// A recommendation of one restaurant to one diner, valid until expiry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    /// Diner receiving the offer.
    pub user_id: UserId,
    /// Restaurant being offered.
    pub restaurant_id: RestaurantId,
    /// Match score that produced the offer.
    pub match_score: f32,
    /// When the offer was created.
    pub created_at: DateTime<Utc>,
    /// When the offer lapses.
    pub expires_at: DateTime<Utc>,
    /// Lifecycle state.
    pub status: OfferStatus,
    /// Whether the diner has claimed the offer.
    pub claimed: bool,
}

/// Record of one batch run, kept for auditing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionRecord {
    /// Kind of run, e.g. `monthly_matching`.
    pub kind: String,
    /// Scoring time the run used.
    pub started_at: DateTime<Utc>,
    /// Wall-clock duration in milliseconds.
    pub duration_ms: u64,
    /// Whether the run completed.
    pub success: bool,
    /// Failure that aborted the run, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Statistics gathered before the run finished or aborted.
    pub stats: RunSummary,
}

/// Destination for newly created offers.
pub trait OfferSink: Send + Sync {
    /// Persist one offer and return the stored form.
    ///
    /// # Errors
    /// Returns [`SinkError`] when the offer cannot be stored.
    fn create_offer(&self, offer: &Offer) -> Result<Offer, SinkError>;
}

/// Destination for per-diner results and run logs.
pub trait ResultStore: Send + Sync {
    /// Replace the stored results for `user_id`.
    ///
    /// # Errors
    /// Returns [`SinkError`] when the results cannot be stored.
    fn store_matching_results(&self, user_id: &UserId, offers: &[Offer]) -> Result<(), SinkError>;

    /// Append an execution record.
    ///
    /// # Errors
    /// Returns [`SinkError`] when the record cannot be stored.
    fn log_execution(&self, record: &ExecutionRecord) -> Result<(), SinkError>;
}
