// src/backend/models/event.rs
use crate::models::common::{CoupleId, Timestamp, UserId};
use candid::CandidType;
use serde::{Deserialize, Serialize};

/// One entry of the ordered change feed. The push dispatcher and the pairing
/// watcher consume these through explicit watch handles instead of ambient
/// subscription state.
#[derive(CandidType, Serialize, Deserialize, Clone, Debug)]
pub struct ChangeEvent {
    /// Position in the global feed, assigned from a stable cursor.
    pub seq: u64,
    /// Nanoseconds since epoch.
    pub timestamp: Timestamp,
    /// Principal that performed the mutation.
    pub actor: UserId,
    /// The couple whose data changed.
    pub couple_id: CoupleId,
    pub kind: ChangeKind,
    /// JSON payload with routing data (item id, target path, ...).
    pub details: Option<String>,
}

#[derive(CandidType, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum ChangeKind {
    CoupleFormed,
    CollectionCreated,
    CollectionDeleted,
    ItemCreated,
    ItemMoved,
    ItemDeleted,
    ItemStatusChanged,
    CommentCreated,
    CommentDeleted,
    CountersRepaired,
}
