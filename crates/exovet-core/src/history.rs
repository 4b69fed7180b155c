//! Prediction history: the persistence collaborator seam.
//!
//! The core calls `store` and `list_page` but owns none of the storage
//! semantics; [`MemoryStore`] is the in-memory reference implementation used
//! by tests and demos.

use std::collections::BTreeMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::{CandidateRecord, ClassificationResult};

/// Hard cap on page size regardless of what the caller asks for.
pub const MAX_PAGE_LIMIT: usize = 50;

/// How many recent records feed an owner's aggregate statistics.
pub const STATS_WINDOW: usize = 100;

/// One stored classification: input, output, owning identity, timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub owner: String,
    pub request: CandidateRecord,
    pub response: ClassificationResult,
    pub created_at: DateTime<Utc>,
}

impl PredictionRecord {
    pub fn new(
        owner: impl Into<String>,
        request: CandidateRecord,
        response: ClassificationResult,
    ) -> Self {
        Self {
            owner: owner.into(),
            request,
            response,
            created_at: Utc::now(),
        }
    }
}

/// One page of an owner's history, newest first.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryPage {
    pub records: Vec<PredictionRecord>,
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub pages: usize,
}

#[derive(Debug, Error)]
#[error("prediction store unavailable: {0}")]
pub struct HistoryError(pub String);

/// Persistence collaborator contract. Append-mostly; the core never updates
/// or deletes stored records.
pub trait PredictionStore: Send + Sync {
    fn store(&self, record: PredictionRecord) -> Result<(), HistoryError>;

    /// Page through an owner's history, newest first. `page` starts at 1;
    /// `limit` is clamped to `1..=MAX_PAGE_LIMIT`.
    fn list_page(&self, owner: &str, page: usize, limit: usize)
    -> Result<HistoryPage, HistoryError>;

    /// The most recent `n` records for an owner, newest first. Unlike
    /// `list_page` this is not capped; it backs aggregate statistics.
    fn recent(&self, owner: &str, n: usize) -> Result<Vec<PredictionRecord>, HistoryError>;

    fn count(&self, owner: &str) -> Result<usize, HistoryError>;
}

/// In-memory store, insertion-ordered.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<Vec<PredictionRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn owned_newest_first(&self, owner: &str) -> Vec<PredictionRecord> {
        let records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        records
            .iter()
            .rev()
            .filter(|r| r.owner == owner)
            .cloned()
            .collect()
    }
}

impl PredictionStore for MemoryStore {
    fn store(&self, record: PredictionRecord) -> Result<(), HistoryError> {
        debug!(owner = %record.owner, candidate = %record.response.candidate_identifier, "storing prediction");
        let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        records.push(record);
        Ok(())
    }

    fn list_page(
        &self,
        owner: &str,
        page: usize,
        limit: usize,
    ) -> Result<HistoryPage, HistoryError> {
        let page = page.max(1);
        let limit = limit.clamp(1, MAX_PAGE_LIMIT);
        let owned = self.owned_newest_first(owner);
        let total = owned.len();
        let records: Vec<PredictionRecord> = owned
            .into_iter()
            .skip((page - 1) * limit)
            .take(limit)
            .collect();
        Ok(HistoryPage {
            records,
            page,
            limit,
            total,
            pages: total.div_ceil(limit),
        })
    }

    fn recent(&self, owner: &str, n: usize) -> Result<Vec<PredictionRecord>, HistoryError> {
        let mut owned = self.owned_newest_first(owner);
        owned.truncate(n);
        Ok(owned)
    }

    fn count(&self, owner: &str) -> Result<usize, HistoryError> {
        Ok(self.owned_newest_first(owner).len())
    }
}

/// Aggregate statistics over an owner's recent history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OwnerStats {
    pub total_predictions: usize,
    pub confirmed_exoplanets: usize,
    /// Mean confidence over the stats window, rounded to three decimals.
    pub average_confidence: f64,
    pub planet_type_distribution: BTreeMap<String, usize>,
}

/// Compute an owner's statistics from the most recent [`STATS_WINDOW`] records.
pub fn owner_stats(store: &dyn PredictionStore, owner: &str) -> Result<OwnerStats, HistoryError> {
    let total_predictions = store.count(owner)?;
    let recent = store.recent(owner, STATS_WINDOW)?;

    let mut confirmed_exoplanets = 0;
    let mut confidence_sum = 0.0;
    let mut planet_type_distribution: BTreeMap<String, usize> = BTreeMap::new();

    for record in &recent {
        if record.response.is_exoplanet == Some(true) {
            confirmed_exoplanets += 1;
        }
        confidence_sum += record.response.confidence.unwrap_or(0.0);
        if let Some(planet_type) = record
            .response
            .details
            .as_ref()
            .and_then(|d| d.planet_type.as_deref())
        {
            *planet_type_distribution
                .entry(planet_type.to_string())
                .or_insert(0) += 1;
        }
    }

    let average_confidence = if recent.is_empty() {
        0.0
    } else {
        let mean = confidence_sum / recent.len() as f64;
        (mean * 1000.0).round() / 1000.0
    };

    Ok(OwnerStats {
        total_predictions,
        confirmed_exoplanets,
        average_confidence,
        planet_type_distribution,
    })
}
