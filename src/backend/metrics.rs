// src/backend/metrics.rs
use crate::error::PairError;
use crate::storage::{get_metrics, update_metrics};
use candid::CandidType;
use serde::{Deserialize, Serialize};

/// Aggregated application counters, kept in a stable cell and maintained by
/// the services as a side effect of their mutations.
#[derive(CandidType, Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct PairMetrics {
    pub total_users: u64,
    pub total_couples: u64,
    pub invites_created_total: u64,
    pub invites_claimed_total: u64,
    pub invites_expired_total: u64,
    pub collections_created_total: u64,
    pub collections_deleted_total: u64,
    pub items_created_total: u64,
    pub comments_created_total: u64,
    pub counter_repairs_total: u64,
}

/// Snapshot of the stored metrics for the admin endpoint.
pub fn get_pair_metrics() -> Result<PairMetrics, PairError> {
    Ok(get_metrics())
}

pub fn record<F>(update_fn: F)
where
    F: FnOnce(&mut PairMetrics),
{
    if let Err(e) = update_metrics(update_fn) {
        crate::utils::logging::warn(format!("Failed to update metrics: {}", e));
    }
}
