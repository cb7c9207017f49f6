// src/backend/models/common.rs
use candid::{CandidType, Principal};
use serde::{Deserialize, Serialize};

// Identity of an authenticated user is the caller principal.
pub type UserId = Principal;
pub type PrincipalId = Principal;

// Document ids are ULID strings (time-ordered, so listings sorted by id
// are also sorted by creation time).
pub type CoupleId = String;
pub type CollectionId = String;
pub type ItemId = String;
pub type CommentId = String;

// A pairing code: exactly six ASCII digits, leading zeros allowed.
pub type InviteCode = String;

pub type Timestamp = u64; // Nanoseconds since epoch (IC time).

/// Sentinel collection id for the virtual default collection. It has no
/// backing document and no item counter.
pub const INBOX_COLLECTION_ID: &str = "INBOX";

pub const NANOS_PER_MILLI: u64 = 1_000_000;
pub const NANOS_PER_SEC: u64 = 1_000_000_000;

#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq, Copy)]
pub enum InviteStatus {
    Open,
    Claimed,
    Expired,
}

#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq, Copy)]
pub enum ItemStatus {
    Pending,
    Done,
}

/// What to do with the items of a collection that is being deleted.
#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq, Copy)]
pub enum DeleteCollectionMode {
    MoveToInbox,
    DeleteAll,
}

/// True when the id refers to a real collection document rather than the
/// virtual Inbox.
pub fn is_real_collection(collection_id: &str) -> bool {
    collection_id != INBOX_COLLECTION_ID
}
