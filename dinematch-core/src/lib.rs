//! Core domain types and the scoring engine for dinematch.
//!
//! The crate turns a diner, a set of candidate restaurants and the diner's
//! recent visit history into a ranked shortlist. Six independent signals
//! (location, cuisine, recency, frequency, rating and novelty) each produce a
//! value in `0.0..=1.0`; [`ScoringModel`] blends them with the weights from a
//! [`WeightConfig`] and [`Ranker`] filters, orders and truncates the results.
//!
//! Everything here is pure: the current time is always passed in by the
//! caller, so scoring is deterministic and safe to fan out across threads.
//!
//! # Examples
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use dinematch_core::{
//!     Location, Ranker, Restaurant, ScoringModel, User, VisitHistory,
//! };
//!
//! let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
//! let user = User::new("u1", Location::new("downtown", "springfield"))
//!     .with_cuisines(["italian"]);
//! let trattoria = Restaurant::new("r1", Location::new("downtown", "springfield"))
//!     .with_cuisines(["italian", "thai"])
//!     .with_rating(4.5);
//!
//! let ranker = Ranker::new(ScoringModel::default());
//! let matches = ranker.top_matches(&user, &[trattoria], &VisitHistory::default(), now, 5);
//! assert_eq!(matches.len(), 1);
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod config;
pub mod location;
pub mod proximity;
pub mod ranker;
pub mod restaurant;
pub mod scorer;
pub mod signals;
pub mod user;
pub mod visit;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use config::{SignalWeights, WeightConfig, WeightConfigError};
pub use location::Location;
pub use proximity::ProximityTable;
pub use ranker::{Ranker, ScoredMatch};
pub use restaurant::{Restaurant, RestaurantId};
pub use scorer::{ScoreBreakdown, Scorer, ScoringModel};
pub use signals::Signal;
pub use user::{DiningFrequency, User, UserId};
pub use visit::{Visit, VisitHistory};
