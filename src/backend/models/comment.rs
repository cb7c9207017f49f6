// src/backend/models/comment.rs
use crate::models::common::{CommentId, CoupleId, ItemId, Timestamp, UserId};
use candid::CandidType;
use serde::{Deserialize, Serialize};

/// A remark attached to an item. Creation and deletion adjust the parent
/// item's `comment_count` in the same update call.
#[derive(CandidType, Deserialize, Serialize, Clone, Debug)]
pub struct Comment {
    pub comment_id: CommentId,
    pub couple_id: CoupleId,
    pub item_id: ItemId,
    pub text: String,
    pub author_id: UserId,
    pub created_at: Timestamp,
}
