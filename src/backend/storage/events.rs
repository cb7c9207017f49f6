// src/backend/storage/events.rs
use crate::models::common::CoupleId;
use crate::models::event::ChangeEvent;
use crate::storage::memory::{get_event_cursor_memory, get_event_log_memory, Memory};
use crate::storage::storable::Cbor;
use ic_stable_structures::{StableBTreeMap, StableCell};
use std::cell::RefCell;

type StorableEvent = Cbor<ChangeEvent>;

thread_local! {
    /// Ordered change feed: Key = sequence number, Value = ChangeEvent.
    /// Append-only; consumers track their own position through watch handles.
    pub static EVENT_LOG: RefCell<StableBTreeMap<u64, StorableEvent, Memory>> = RefCell::new(
        StableBTreeMap::init(get_event_log_memory())
    );

    /// Next sequence number to assign.
    static EVENT_CURSOR: RefCell<StableCell<u64, Memory>> = RefCell::new(
        StableCell::init(get_event_cursor_memory(), 0)
            .expect("Failed to initialize event cursor cell")
    );
}

/// The sequence number the next appended event will receive.
pub fn next_seq() -> u64 {
    EVENT_CURSOR.with(|cell| *cell.borrow().get())
}

/// Appends an event, assigning it the next sequence number. The passed
/// event's `seq` field is overwritten with the assigned value.
pub fn append(mut event: ChangeEvent) -> Result<u64, String> {
    let seq = next_seq();
    event.seq = seq;

    EVENT_LOG.with(|map_ref| {
        map_ref.borrow_mut().insert(seq, Cbor(event));
    });

    EVENT_CURSOR.with(|cell| {
        cell.borrow_mut()
            .set(seq.saturating_add(1))
            .map_err(|e| format!("Failed to advance event cursor: {:?}", e))
    })?;

    Ok(seq)
}

/// Events of one couple with `seq >= from_seq`, in feed order.
pub fn list_since(couple_id: &CoupleId, from_seq: u64) -> Vec<ChangeEvent> {
    EVENT_LOG.with(|map_ref| {
        map_ref
            .borrow()
            .range(from_seq..)
            .map(|(_seq, value)| value.0)
            .filter(|event| event.couple_id == *couple_id)
            .collect()
    })
}
