// src/backend/models/couple.rs
use crate::models::common::{CoupleId, InviteCode, Timestamp, UserId};
use candid::CandidType;
use serde::{Deserialize, Serialize};

/// A pairing of exactly two users. Membership is immutable once created;
/// the creator of the redeemed invite is always `members[0]`.
#[derive(CandidType, Deserialize, Serialize, Clone, Debug)]
pub struct Couple {
    pub couple_id: CoupleId,
    pub members: Vec<UserId>,
    pub created_at: Timestamp,
    /// The invite code that formed this couple, kept for traceability.
    pub invite_code: InviteCode,
    pub title: Option<String>,
}

impl Couple {
    pub fn is_member(&self, uid: &UserId) -> bool {
        self.members.contains(uid)
    }

    /// The other member, if `uid` is one of the two.
    pub fn partner_of(&self, uid: &UserId) -> Option<UserId> {
        if !self.is_member(uid) {
            return None;
        }
        self.members.iter().find(|m| *m != uid).copied()
    }
}
