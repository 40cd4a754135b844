//! Facade crate for the dinematch restaurant recommendation engine.
//!
//! The scoring engine is always available; the batch matching layer, with its
//! data provider, sinks and orchestration, sits behind the `batch` feature.

#![forbid(unsafe_code)]

pub use dinematch_core::{
    DiningFrequency, Location, ProximityTable, Ranker, Restaurant, RestaurantId, ScoreBreakdown,
    ScoredMatch, Scorer, ScoringModel, Signal, SignalWeights, User, UserId, Visit, VisitHistory,
    WeightConfig, WeightConfigError,
};

#[cfg(feature = "batch")]
pub use dinematch_batch::{
    BatchError, BatchSettings, DataProvider, ExecutionRecord, JsonDataset, MatchingService,
    MemorySink, Offer, OfferSink, OfferStatus, ProcessedUser, ResultStore, RunSummary,
};
