// src/backend/storage/metrics.rs
use crate::metrics::PairMetrics;
use crate::storage::memory::{get_metrics_memory, Memory};
use crate::storage::storable::Cbor;
use ic_stable_structures::StableCell;
use std::cell::RefCell;

type StorablePairMetrics = Cbor<PairMetrics>;

thread_local! {
    /// Global application metrics
    pub static METRICS_CELL: RefCell<StableCell<StorablePairMetrics, Memory>> = RefCell::new(
        StableCell::init(get_metrics_memory(), Cbor(PairMetrics::default()))
            .expect("Failed to initialize metrics stable cell")
    );
}

/// Helper function to get metrics.
pub fn get_metrics() -> PairMetrics {
    METRICS_CELL.with(|cell| cell.borrow().get().0.clone())
}

/// Helper function to update metrics.
pub fn update_metrics<F>(update_fn: F) -> Result<(), String>
where
    F: FnOnce(&mut PairMetrics),
{
    METRICS_CELL.with(|cell| {
        let mut metrics = cell.borrow().get().0.clone();
        update_fn(&mut metrics);
        cell.borrow_mut()
            .set(Cbor(metrics))
            .map_err(|e| format!("Failed to update metrics: {:?}", e))?;
        Ok(())
    })
}
