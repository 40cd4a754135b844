//! Fault-injecting collaborators for exercising failure paths.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use dinematch_core::{Restaurant, RestaurantId, User, UserId, VisitHistory};

use crate::{
    DataProvider, ExecutionRecord, MemorySink, Offer, OfferSink, ProviderError, ResultStore,
    SinkError, UserPage,
};

/// [`MemorySink`] wrapper that rejects chosen offers and result writes.
#[derive(Debug, Default)]
pub struct FlakySink {
    inner: MemorySink,
    rejected_restaurants: BTreeSet<RestaurantId>,
    failing_users: BTreeSet<UserId>,
}

impl FlakySink {
    /// Reject every offer naming `restaurant`.
    #[must_use]
    pub fn rejecting_offers_for(mut self, restaurant: &str) -> Self {
        self.rejected_restaurants
            .insert(RestaurantId::from(restaurant));
        self
    }

    /// Fail every result write for `user`.
    #[must_use]
    pub fn failing_results_for(mut self, user: &str) -> Self {
        self.failing_users.insert(UserId::from(user));
        self
    }

    /// The sink receiving accepted writes.
    #[must_use]
    pub const fn inner(&self) -> &MemorySink {
        &self.inner
    }
}

impl OfferSink for FlakySink {
    fn create_offer(&self, offer: &Offer) -> Result<Offer, SinkError> {
        if self.rejected_restaurants.contains(&offer.restaurant_id) {
            return Err(SinkError::Rejected {
                restaurant_id: offer.restaurant_id.clone(),
                reason: "restaurant paused offers".to_owned(),
            });
        }
        self.inner.create_offer(offer)
    }
}

impl ResultStore for FlakySink {
    fn store_matching_results(&self, user_id: &UserId, offers: &[Offer]) -> Result<(), SinkError> {
        if self.failing_users.contains(user_id) {
            return Err(SinkError::Unavailable {
                message: format!("results table locked for {user_id}"),
            });
        }
        self.inner.store_matching_results(user_id, offers)
    }

    fn log_execution(&self, record: &ExecutionRecord) -> Result<(), SinkError> {
        self.inner.log_execution(record)
    }
}

/// Which provider operation should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outage {
    /// Listing diners fails.
    Users,
    /// Listing restaurants fails.
    Restaurants,
    /// Looking up visits fails.
    Visits,
}

/// Provider wrapper that fails one kind of request.
#[derive(Debug)]
pub struct FailingProvider<P> {
    inner: P,
    outage: Outage,
}

impl<P> FailingProvider<P> {
    /// Wrap `inner`, failing requests of the `outage` kind.
    pub const fn new(inner: P, outage: Outage) -> Self {
        Self { inner, outage }
    }

    fn check(&self, outage: Outage, resource: &'static str) -> Result<(), ProviderError> {
        if self.outage == outage {
            return Err(ProviderError::Unavailable {
                resource,
                message: "connection refused".to_owned(),
            });
        }
        Ok(())
    }
}

impl<P: DataProvider> DataProvider for FailingProvider<P> {
    fn fetch_users(&self, cursor: usize, limit: usize) -> Result<UserPage, ProviderError> {
        self.check(Outage::Users, "users")?;
        self.inner.fetch_users(cursor, limit)
    }

    fn fetch_user(&self, user_id: &UserId) -> Result<User, ProviderError> {
        self.check(Outage::Users, "users")?;
        self.inner.fetch_user(user_id)
    }

    fn fetch_restaurants(
        &self,
        neighborhood: Option<&str>,
    ) -> Result<Vec<Restaurant>, ProviderError> {
        self.check(Outage::Restaurants, "restaurants")?;
        self.inner.fetch_restaurants(neighborhood)
    }

    fn fetch_visits(
        &self,
        user_id: &UserId,
        since: DateTime<Utc>,
    ) -> Result<VisitHistory, ProviderError> {
        self.check(Outage::Visits, "visits")?;
        self.inner.fetch_visits(user_id, since)
    }
}

/// Provider wrapper whose visit lookup panics for one diner.
#[derive(Debug)]
pub struct PanickingProvider<P> {
    inner: P,
    user_id: UserId,
}

impl<P> PanickingProvider<P> {
    /// Wrap `inner`, panicking when visits for `user_id` are requested.
    pub fn new(inner: P, user_id: impl Into<UserId>) -> Self {
        Self {
            inner,
            user_id: user_id.into(),
        }
    }
}

impl<P: DataProvider> DataProvider for PanickingProvider<P> {
    fn fetch_users(&self, cursor: usize, limit: usize) -> Result<UserPage, ProviderError> {
        self.inner.fetch_users(cursor, limit)
    }

    fn fetch_user(&self, user_id: &UserId) -> Result<User, ProviderError> {
        self.inner.fetch_user(user_id)
    }

    fn fetch_restaurants(
        &self,
        neighborhood: Option<&str>,
    ) -> Result<Vec<Restaurant>, ProviderError> {
        self.inner.fetch_restaurants(neighborhood)
    }

    #[expect(
        clippy::panic_in_result_fn,
        reason = "simulates a provider bug inside a worker"
    )]
    fn fetch_visits(
        &self,
        user_id: &UserId,
        since: DateTime<Utc>,
    ) -> Result<VisitHistory, ProviderError> {
        assert!(
            user_id != &self.user_id,
            "visit index corrupted for {user_id}"
        );
        self.inner.fetch_visits(user_id, since)
    }
}
