//! Thread-safe in-memory sink.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use dinematch_core::UserId;
use serde::{Deserialize, Serialize};

use crate::{ExecutionRecord, Offer, OfferSink, ResultStore, SinkError};

/// Everything a [`MemorySink`] has received.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SinkSnapshot {
    /// Offers in creation order.
    pub offers: Vec<Offer>,
    /// Latest stored results per diner.
    pub results: BTreeMap<UserId, Vec<Offer>>,
    /// Execution records in arrival order.
    pub executions: Vec<ExecutionRecord>,
}

/// [`OfferSink`] and [`ResultStore`] backed by a mutex-guarded snapshot.
#[derive(Debug, Default)]
pub struct MemorySink {
    state: Mutex<SinkSnapshot>,
}

impl MemorySink {
    /// Clone the current contents.
    ///
    /// # Errors
    /// Returns [`SinkError::Unavailable`] when a writer panicked while
    /// holding the lock.
    pub fn snapshot(&self) -> Result<SinkSnapshot, SinkError> {
        self.lock().map(|state| state.clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, SinkSnapshot>, SinkError> {
        self.state.lock().map_err(|_| SinkError::Unavailable {
            message: "memory sink lock poisoned".to_owned(),
        })
    }
}

impl OfferSink for MemorySink {
    fn create_offer(&self, offer: &Offer) -> Result<Offer, SinkError> {
        self.lock()?.offers.push(offer.clone());
        Ok(offer.clone())
    }
}

impl ResultStore for MemorySink {
    fn store_matching_results(&self, user_id: &UserId, offers: &[Offer]) -> Result<(), SinkError> {
        self.lock()?
            .results
            .insert(user_id.clone(), offers.to_vec());
        Ok(())
    }

    fn log_execution(&self, record: &ExecutionRecord) -> Result<(), SinkError> {
        self.lock()?.executions.push(record.clone());
        Ok(())
    }
}
