// src/backend/services/event_service.rs
// Change feed over ledger mutations, consumed through explicit watch
// handles by the push dispatcher and the pairing clients.

use crate::{
    error::PairError,
    models::common::{CoupleId, UserId},
    models::event::{ChangeEvent, ChangeKind},
    storage::events as event_storage,
    utils::{logging, time::now_ns},
};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// A registered consumer position in the feed.
#[derive(Clone, Debug)]
struct Watch {
    couple_id: CoupleId,
    next_seq: u64,
}

thread_local! {
    // Watch handles live in heap memory only and do not survive upgrades;
    // clients re-subscribe, the feed itself is stable.
    static WATCHES: RefCell<HashMap<u64, Watch>> = RefCell::new(HashMap::new());
    static NEXT_WATCH_ID: Cell<u64> = Cell::new(1);
}

/// Appends one event to the feed. Failures are logged, never propagated:
/// a mutation must not be rolled back because its notification record
/// could not be written.
pub fn emit(couple_id: &CoupleId, actor: UserId, kind: ChangeKind, details: Option<String>) {
    let event = ChangeEvent {
        seq: 0, // assigned by storage
        timestamp: now_ns(),
        actor,
        couple_id: couple_id.clone(),
        kind,
        details,
    };
    if let Err(e) = event_storage::append(event) {
        logging::warn(format!("Failed to append change event: {}", e));
    }
}

/// Registers a watch on one couple's slice of the feed, starting at
/// `from_seq` (default: only events after the current feed head).
pub fn subscribe(couple_id: CoupleId, from_seq: Option<u64>) -> u64 {
    let next_seq = from_seq.unwrap_or_else(event_storage::next_seq);
    let watch_id = NEXT_WATCH_ID.with(|cell| {
        let id = cell.get();
        cell.set(id.saturating_add(1));
        id
    });
    WATCHES.with(|watches| {
        watches.borrow_mut().insert(
            watch_id,
            Watch {
                couple_id,
                next_seq,
            },
        );
    });
    watch_id
}

/// Returns the watched couple's events since the handle's cursor and
/// advances the cursor past the feed head (apply-once delivery).
pub fn poll(watch_id: u64) -> Result<Vec<ChangeEvent>, PairError> {
    WATCHES.with(|watches| {
        let mut watches = watches.borrow_mut();
        let watch = watches
            .get_mut(&watch_id)
            .ok_or(PairError::WatchNotFound(watch_id))?;
        let events = event_storage::list_since(&watch.couple_id, watch.next_seq);
        watch.next_seq = event_storage::next_seq();
        Ok(events)
    })
}

/// Explicit cancellation of a watch handle.
pub fn unsubscribe(watch_id: u64) -> Result<(), PairError> {
    WATCHES.with(|watches| {
        watches
            .borrow_mut()
            .remove(&watch_id)
            .map(|_watch| ())
            .ok_or(PairError::WatchNotFound(watch_id))
    })
}
