// src/backend/storage/config.rs
use crate::storage::memory::{get_memory, Memory};
use crate::storage::storable::Cbor;
use candid::Principal;
use ic_stable_structures::{memory_manager::MemoryId, StableCell};
use std::cell::RefCell;

// Define Memory IDs for config cells (ensure these are unique)
const ADMIN_PRINCIPAL_MEM_ID: MemoryId = MemoryId::new(25);
const MIN_CYCLES_THRESHOLD_MEM_ID: MemoryId = MemoryId::new(26);

// Default values (used if init args omit them)
const DEFAULT_ADMIN_PRINCIPAL: Principal = Principal::anonymous();
const DEFAULT_MIN_CYCLES_THRESHOLD: u128 = 10_000_000_000; // 10B cycles

thread_local! {
    /// Stable cell for the Admin Principal
    static ADMIN_PRINCIPAL: RefCell<StableCell<Cbor<Principal>, Memory>> = RefCell::new(
        StableCell::init(get_memory(ADMIN_PRINCIPAL_MEM_ID), Cbor(DEFAULT_ADMIN_PRINCIPAL))
            .expect("Failed to initialize admin principal stable cell")
    );

    /// Stable cell for the minimum cycles threshold
    static MIN_CYCLES_THRESHOLD: RefCell<StableCell<Cbor<u128>, Memory>> = RefCell::new(
        StableCell::init(get_memory(MIN_CYCLES_THRESHOLD_MEM_ID), Cbor(DEFAULT_MIN_CYCLES_THRESHOLD))
            .expect("Failed to initialize cycles threshold stable cell")
    );
}

pub fn get_admin_principal() -> Principal {
    ADMIN_PRINCIPAL.with(|cell| cell.borrow().get().0)
}

pub fn set_admin_principal(principal: Principal) -> Result<(), String> {
    ADMIN_PRINCIPAL.with(|cell| {
        cell.borrow_mut()
            .set(Cbor(principal))
            .map(|_prev| ())
            .map_err(|e| format!("Failed to set admin principal: {:?}", e))
    })
}

pub fn get_min_cycles_threshold() -> u128 {
    MIN_CYCLES_THRESHOLD.with(|cell| cell.borrow().get().0)
}

pub fn set_min_cycles_threshold(threshold: u128) -> Result<(), String> {
    MIN_CYCLES_THRESHOLD.with(|cell| {
        cell.borrow_mut()
            .set(Cbor(threshold))
            .map(|_prev| ())
            .map_err(|e| format!("Failed to set cycles threshold: {:?}", e))
    })
}
