//! Collaborator layer around the dinematch scoring engine.
//!
//! The crate provides the plumbing a deployment needs to turn rankings into
//! offers:
//! - **Data access** through the [`DataProvider`] trait, with
//!   [`JsonDataset`] as an in-memory implementation decoded from JSON.
//! - **Persistence** through the [`OfferSink`] and [`ResultStore`] traits,
//!   with [`MemorySink`] implementing both.
//! - **Orchestration** in [`MatchingService`], which processes one diner on
//!   demand or every active diner in a batch. A failure for one diner is
//!   recorded in the [`RunSummary`] and never aborts the rest of the run.
//!
//! # Examples
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use dinematch_batch::{BatchSettings, JsonDataset, MatchingService, MemorySink};
//! use dinematch_core::ScoringModel;
//!
//! let dataset = JsonDataset::from_json(r#"{
//!     "users": [{"id": "u1", "neighborhood": "downtown", "preferred_cuisines": ["thai"]}],
//!     "restaurants": [{"id": "r1", "neighborhood": "downtown", "cuisines": ["thai"]}],
//!     "visits": []
//! }"#).expect("valid dataset");
//! let sink = MemorySink::default();
//! let service = MatchingService::new(
//!     &dataset,
//!     &sink,
//!     &sink,
//!     ScoringModel::default(),
//!     BatchSettings::default(),
//! );
//!
//! let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
//! let summary = service.run_all(now).expect("run completes");
//! assert_eq!(summary.total_users, 1);
//! assert_eq!(summary.total_offers, 1);
//! ```

#![forbid(unsafe_code)]

mod dataset;
mod error;
mod memory;
mod offer;
mod provider;
mod service;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use dataset::JsonDataset;
pub use error::{BatchError, ProviderError, SinkError};
pub use memory::{MemorySink, SinkSnapshot};
pub use offer::{ExecutionRecord, Offer, OfferSink, OfferStatus, ResultStore};
pub use provider::{DataProvider, UserPage};
pub use service::{BatchSettings, MatchingService, ProcessedUser, RunSummary, UserFailure};
