// src/backend/models/user.rs
use crate::models::common::{CoupleId, InviteCode, Timestamp, UserId};
use candid::CandidType;
use serde::{Deserialize, Serialize};

/// Per-user push notification toggles. Delivery itself happens off-canister;
/// the dispatcher reads these before sending.
#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct NotificationPreferences {
    pub new_items: bool,
    pub comments: bool,
    pub item_completed: bool,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            new_items: true,
            comments: true,
            item_completed: true,
        }
    }
}

#[derive(CandidType, Deserialize, Serialize, Clone, Debug)]
pub struct UserProfile {
    pub uid: UserId,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub photo_url: Option<String>,
    /// Nickname the partner sees; falls back to `display_name` in clients.
    pub nickname: Option<String>,
    /// Owning couple. Set exactly once; couples are never re-formed.
    pub couple_id: Option<CoupleId>,
    /// Invite this user created and is waiting to see claimed.
    pub pending_invite_code: Option<InviteCode>,
    /// Device registration tokens for the push dispatcher, deduplicated.
    pub fcm_tokens: Vec<String>,
    pub notification_preferences: NotificationPreferences,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// The subset of a user document the partner is allowed to see.
#[derive(CandidType, Deserialize, Serialize, Clone, Debug)]
pub struct PublicProfile {
    pub uid: UserId,
    pub nickname: Option<String>,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}

impl UserProfile {
    pub fn public_profile(&self) -> PublicProfile {
        PublicProfile {
            uid: self.uid,
            nickname: self.nickname.clone(),
            display_name: self.display_name.clone(),
            photo_url: self.photo_url.clone(),
        }
    }
}
