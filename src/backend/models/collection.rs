// src/backend/models/collection.rs
use crate::models::common::{CollectionId, CoupleId, Timestamp, UserId};
use candid::CandidType;
use serde::{Deserialize, Serialize};

/// A named, emoji-tagged grouping of items owned by one couple.
///
/// `item_count` is denormalized: it must equal the number of items of the
/// same couple whose `collection_id` equals this collection's id. Every
/// mutation that moves an item in or out of a real collection adjusts it in
/// the same update call.
#[derive(CandidType, Deserialize, Serialize, Clone, Debug)]
pub struct Collection {
    pub collection_id: CollectionId,
    pub couple_id: CoupleId,
    pub name: String,
    pub emoji: String,
    pub created_by: UserId,
    pub created_at: Timestamp,
    pub item_count: u32,
}
