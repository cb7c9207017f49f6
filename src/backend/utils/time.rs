// src/backend/utils/time.rs
use crate::models::common::Timestamp;

/// Returns the current Internet Computer time as nanoseconds since epoch.
#[cfg(target_arch = "wasm32")]
pub fn now_ns() -> Timestamp {
    ic_cdk::api::time()
}

/// Native builds (unit tests) run against a settable thread-local clock.
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ns() -> Timestamp {
    clock::NOW_NS.with(|cell| cell.get())
}

#[cfg(not(target_arch = "wasm32"))]
pub fn set_now_ns(now: Timestamp) {
    clock::NOW_NS.with(|cell| cell.set(now));
}

#[cfg(not(target_arch = "wasm32"))]
pub fn advance_ns(delta: u64) {
    clock::NOW_NS.with(|cell| cell.set(cell.get().saturating_add(delta)));
}

#[cfg(not(target_arch = "wasm32"))]
mod clock {
    use std::cell::Cell;

    thread_local! {
        // Arbitrary fixed epoch so tests are deterministic.
        pub static NOW_NS: Cell<u64> = Cell::new(1_750_000_000_000_000_000);
    }
}
