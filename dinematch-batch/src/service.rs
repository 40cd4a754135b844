//! Matching runs: rank diners, create offers and record the outcome.

use std::error::Error;
use std::num::NonZeroUsize;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Instant;

use chrono::{DateTime, TimeDelta, Utc};
use dinematch_core::{Ranker, Restaurant, ScoredMatch, ScoringModel, User, UserId, VisitHistory};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    BatchError, DataProvider, ExecutionRecord, Offer, OfferSink, OfferStatus, ResultStore,
};

const RUN_KIND: &str = "monthly_matching";

const fn non_zero(value: usize) -> NonZeroUsize {
    match NonZeroUsize::new(value) {
        Some(size) => size,
        None => NonZeroUsize::MIN,
    }
}

/// Tunables for the collaborator layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchSettings {
    /// Diners requested per provider page.
    pub user_page_size: NonZeroUsize,
    /// Diners processed concurrently on the rayon pool.
    pub user_chunk_size: NonZeroUsize,
    /// Days an offer stays valid.
    pub offer_ttl_days: u32,
    /// Days of visit history fetched per diner.
    pub visit_lookback_days: u32,
    /// Shortlist length per diner.
    pub matches_per_user: usize,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            user_page_size: non_zero(100),
            user_chunk_size: non_zero(10),
            offer_ttl_days: 30,
            visit_lookback_days: 90,
            matches_per_user: 5,
        }
    }
}

/// Result of processing one diner on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedUser {
    /// Diner that was processed.
    pub user_id: UserId,
    /// Ranked matches, best first.
    pub matches: Vec<ScoredMatch>,
    /// Offers the sink accepted.
    pub offers: Vec<Offer>,
}

/// A diner whose processing failed during a batch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserFailure {
    /// Diner that failed.
    pub user_id: UserId,
    /// Human-readable failure description.
    pub message: String,
}

/// Aggregated statistics of a batch run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunSummary {
    /// Active diners found.
    pub total_users: usize,
    /// Matches produced across all diners.
    pub total_matches: usize,
    /// Offers the sink accepted across all diners.
    pub total_offers: usize,
    /// Diners whose processing failed.
    pub errors: Vec<UserFailure>,
}

impl RunSummary {
    /// Report whether every diner was processed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

struct UserOutcome {
    matches: usize,
    offers: usize,
}

/// Orchestrates ranking and offer creation against a provider and sinks.
///
/// The service borrows its collaborators, so a single
/// [`MemorySink`](crate::MemorySink) can act as both offer sink and result
/// store.
pub struct MatchingService<'a, P: ?Sized, O: ?Sized, R: ?Sized> {
    provider: &'a P,
    offers: &'a O,
    results: &'a R,
    ranker: Ranker<ScoringModel>,
    settings: BatchSettings,
}

impl<'a, P, O, R> MatchingService<'a, P, O, R>
where
    P: DataProvider + ?Sized,
    O: OfferSink + ?Sized,
    R: ResultStore + ?Sized,
{
    /// Wire a service from its collaborators.
    #[must_use]
    pub fn new(
        provider: &'a P,
        offers: &'a O,
        results: &'a R,
        model: ScoringModel,
        settings: BatchSettings,
    ) -> Self {
        Self {
            provider,
            offers,
            results,
            ranker: Ranker::new(model),
            settings,
        }
    }

    /// The settings this service runs with.
    #[must_use]
    pub const fn settings(&self) -> &BatchSettings {
        &self.settings
    }

    /// Rank one diner against restaurants in their neighbourhood, create
    /// offers and store the results.
    ///
    /// # Errors
    /// Returns [`BatchError`] when the diner or restaurants cannot be
    /// loaded, or the results cannot be stored. A failed visit lookup is
    /// logged and treated as an empty history.
    pub fn process_user(
        &self,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<ProcessedUser, BatchError> {
        let user = self
            .provider
            .fetch_user(user_id)
            .map_err(|source| BatchError::FetchUser {
                user_id: user_id.clone(),
                source,
            })?;
        let restaurants = self
            .provider
            .fetch_restaurants(user.location.neighborhood())
            .map_err(|source| BatchError::FetchRestaurants { source })?;
        let history = self.visit_history(&user, now);
        let matches = self.ranker.top_matches(
            &user,
            &restaurants,
            &history,
            now,
            self.settings.matches_per_user,
        );
        let offers = self.create_offers(&user.id, &matches, now);
        self.results
            .store_matching_results(&user.id, &offers)
            .map_err(|source| BatchError::StoreResults {
                user_id: user.id.clone(),
                source,
            })?;
        log::info!(
            "processed user {}: {} matches, {} offers",
            user.id,
            matches.len(),
            offers.len()
        );
        Ok(ProcessedUser {
            user_id: user.id,
            matches,
            offers,
        })
    }

    /// Process every active diner and record the run.
    ///
    /// Restaurants are fetched once and each diner is ranked against the
    /// ones sharing their neighbourhood or city. Diners are processed in
    /// concurrent chunks; a failure for one diner is added to
    /// [`RunSummary::errors`] and the run carries on.
    ///
    /// # Errors
    /// Returns [`BatchError`] when the diners or restaurants cannot be
    /// listed, or the execution record cannot be written. An aborted run is
    /// still recorded as unsuccessful before the error is returned.
    pub fn run_all(&self, now: DateTime<Utc>) -> Result<RunSummary, BatchError> {
        let started = Instant::now();
        let mut summary = RunSummary::default();
        let outcome = self.run_chunks(now, &mut summary);

        let record = ExecutionRecord {
            kind: RUN_KIND.to_owned(),
            started_at: now,
            duration_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            success: outcome.is_ok(),
            error: outcome.as_ref().err().map(|err| error_chain(err)),
            stats: summary.clone(),
        };
        if let Some(error) = &record.error {
            log::error!("matching run aborted: {error}");
        } else {
            log::info!(
                "matching run finished: {} users, {} matches, {} offers, {} errors",
                summary.total_users,
                summary.total_matches,
                summary.total_offers,
                summary.errors.len()
            );
        }
        self.results
            .log_execution(&record)
            .map_err(|source| BatchError::LogExecution { source })?;
        outcome.map(|()| summary)
    }

    fn run_chunks(&self, now: DateTime<Utc>, summary: &mut RunSummary) -> Result<(), BatchError> {
        let users = self.fetch_all_users()?;
        summary.total_users = users.len();
        let restaurants = self
            .provider
            .fetch_restaurants(None)
            .map_err(|source| BatchError::FetchRestaurants { source })?;

        for chunk in users.chunks(self.settings.user_chunk_size.get()) {
            let outcomes: Vec<(UserId, Result<UserOutcome, String>)> = chunk
                .par_iter()
                .map(|user| {
                    let outcome =
                        catch_unwind(AssertUnwindSafe(|| self.match_user(user, &restaurants, now)))
                            .unwrap_or_else(|_| Err("worker panicked".to_owned()));
                    (user.id.clone(), outcome)
                })
                .collect();

            for (user_id, outcome) in outcomes {
                match outcome {
                    Ok(counts) => {
                        summary.total_matches += counts.matches;
                        summary.total_offers += counts.offers;
                    }
                    Err(message) => {
                        log::warn!("failed to process user {user_id}: {message}");
                        summary.errors.push(UserFailure { user_id, message });
                    }
                }
            }
        }
        Ok(())
    }

    fn fetch_all_users(&self) -> Result<Vec<User>, BatchError> {
        let page_size = self.settings.user_page_size.get();
        let mut users = Vec::new();
        loop {
            let page = self
                .provider
                .fetch_users(users.len(), page_size)
                .map_err(|source| BatchError::FetchUsers { source })?;
            let fetched = page.results.len();
            users.extend(page.results);
            if page.remaining == 0 || fetched == 0 {
                break;
            }
        }
        Ok(users)
    }

    fn match_user(
        &self,
        user: &User,
        restaurants: &[Restaurant],
        now: DateTime<Utc>,
    ) -> Result<UserOutcome, String> {
        let local: Vec<Restaurant> = restaurants
            .iter()
            .filter(|restaurant| {
                restaurant.location.shares_neighborhood_with(&user.location)
                    || restaurant.location.shares_city_with(&user.location)
            })
            .cloned()
            .collect();
        let history = self.visit_history(user, now);
        let matches =
            self.ranker
                .top_matches(user, &local, &history, now, self.settings.matches_per_user);
        let offers = self.create_offers(&user.id, &matches, now);
        self.results
            .store_matching_results(&user.id, &offers)
            .map_err(|err| err.to_string())?;
        Ok(UserOutcome {
            matches: matches.len(),
            offers: offers.len(),
        })
    }

    fn visit_history(&self, user: &User, now: DateTime<Utc>) -> VisitHistory {
        let since = now - TimeDelta::days(i64::from(self.settings.visit_lookback_days));
        self.provider
            .fetch_visits(&user.id, since)
            .unwrap_or_else(|err| {
                log::warn!("using empty visit history for user {}: {err}", user.id);
                VisitHistory::default()
            })
    }

    /// Turn matches into offers and submit each one independently.
    ///
    /// Offers the sink rejects are logged and left out of the result.
    #[must_use]
    pub fn create_offers(
        &self,
        user_id: &UserId,
        matches: &[ScoredMatch],
        now: DateTime<Utc>,
    ) -> Vec<Offer> {
        let expires_at = now + TimeDelta::days(i64::from(self.settings.offer_ttl_days));
        matches
            .iter()
            .map(|scored| Offer {
                user_id: user_id.clone(),
                restaurant_id: scored.restaurant.id.clone(),
                match_score: scored.score,
                created_at: now,
                expires_at,
                status: OfferStatus::Active,
                claimed: false,
            })
            .filter_map(|offer| {
                self.offers
                    .create_offer(&offer)
                    .inspect_err(|err| log::warn!("dropping offer for user {user_id}: {err}"))
                    .ok()
            })
            .collect()
    }
}

/// Render an error with every `source()` cause, joined by `": "`.
fn error_chain(err: &dyn Error) -> String {
    let mut rendered = err.to_string();
    let mut cause = err.source();
    while let Some(inner) = cause {
        rendered.push_str(": ");
        rendered.push_str(&inner.to_string());
        cause = inner.source();
    }
    rendered
}
