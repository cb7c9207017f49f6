// src/backend/models/invite.rs
use crate::models::common::{CoupleId, InviteCode, InviteStatus, Timestamp, UserId};
use candid::CandidType;
use serde::{Deserialize, Serialize};

/// A short-lived pairing token, keyed in storage by its own 6-digit code.
///
/// Lifecycle: `Open` -> `Claimed` (a second user redeemed it) or
/// `Open` -> `Expired`. Expiry is lazy: nothing sweeps open invites in the
/// background; the transition is written when an attempted redemption
/// observes a stale `expires_at`.
#[derive(CandidType, Deserialize, Serialize, Clone, Debug)]
pub struct Invite {
    pub code: InviteCode,
    pub creator_uid: UserId,
    pub creator_name: Option<String>,
    pub status: InviteStatus,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
    pub claimed_by_uid: Option<UserId>,
    pub couple_id: Option<CoupleId>,
}

impl Invite {
    pub fn is_past_expiry(&self, now: Timestamp) -> bool {
        now > self.expires_at
    }
}
