// src/backend/models/item.rs
use crate::models::common::{CollectionId, CoupleId, ItemId, ItemStatus, Timestamp, UserId};
use candid::CandidType;
use serde::{Deserialize, Serialize};

/// A saved link. `collection_id` is either a real collection id of the same
/// couple or the `"INBOX"` sentinel.
#[derive(CandidType, Deserialize, Serialize, Clone, Debug)]
pub struct Item {
    pub item_id: ItemId,
    pub couple_id: CoupleId,
    pub url: String,
    pub title: Option<String>,
    pub note: Option<String>,
    pub collection_id: CollectionId,
    pub status: ItemStatus,
    pub created_by: UserId,
    pub created_at: Timestamp,
    pub comment_count: u32,
}
