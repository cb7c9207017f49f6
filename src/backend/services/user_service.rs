// src/backend/services/user_service.rs
// User document upkeep: created on first authentication, profile fields
// merge-updated afterwards without ever touching the pairing fields.

use crate::{
    error::PairError,
    metrics,
    models::common::{CoupleId, Timestamp, UserId},
    models::user::{NotificationPreferences, PublicProfile, UserProfile},
    storage::{couples as couple_storage, users as user_storage},
    utils::{logging, time::now_ns},
};

/// A bare user document with no profile data and no pairing state.
pub(crate) fn new_profile(uid: UserId, now: Timestamp) -> UserProfile {
    UserProfile {
        uid,
        display_name: None,
        email: None,
        photo_url: None,
        nickname: None,
        couple_id: None,
        pending_invite_code: None,
        fcm_tokens: Vec::new(),
        notification_preferences: NotificationPreferences::default(),
        created_at: now,
        updated_at: now,
    }
}

/// Creates the caller's user document on first sight, or refreshes the
/// identity-provider fields on later calls. `couple_id` and
/// `pending_invite_code` are never written here.
pub fn ensure_user(
    caller: UserId,
    display_name: Option<String>,
    email: Option<String>,
    photo_url: Option<String>,
) -> Result<UserProfile, PairError> {
    let now = now_ns();
    let mut profile = match user_storage::get_user(&caller) {
        Some(existing) => existing,
        None => {
            metrics::record(|m| m.total_users = m.total_users.saturating_add(1));
            logging::info(format!("➕ INFO: User document created for {}", caller));
            new_profile(caller, now)
        }
    };

    profile.display_name = display_name;
    profile.email = email;
    profile.photo_url = photo_url;
    profile.updated_at = now;
    user_storage::insert_user(&profile);
    Ok(profile)
}

pub fn get_user(uid: &UserId) -> Result<UserProfile, PairError> {
    user_storage::get_user(uid).ok_or_else(|| PairError::UserNotFound(uid.to_text()))
}

pub fn set_nickname(caller: UserId, nickname: Option<String>) -> Result<UserProfile, PairError> {
    let mut profile = get_user(&caller)?;
    profile.nickname = nickname.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
    profile.updated_at = now_ns();
    user_storage::insert_user(&profile);
    Ok(profile)
}

/// Registers a device token for the push dispatcher, deduplicated.
pub fn save_fcm_token(caller: UserId, token: String) -> Result<(), PairError> {
    let token = token.trim().to_string();
    if token.is_empty() {
        return Err(PairError::InvalidInput("Token required".to_string()));
    }
    let mut profile = get_user(&caller)?;
    if !profile.fcm_tokens.contains(&token) {
        profile.fcm_tokens.push(token);
        profile.updated_at = now_ns();
        user_storage::insert_user(&profile);
    }
    Ok(())
}

/// Drops a device token (logout, or the dispatcher reported it invalid).
pub fn remove_fcm_token(caller: UserId, token: String) -> Result<(), PairError> {
    let mut profile = get_user(&caller)?;
    let before = profile.fcm_tokens.len();
    profile.fcm_tokens.retain(|t| t != &token);
    if profile.fcm_tokens.len() != before {
        profile.updated_at = now_ns();
        user_storage::insert_user(&profile);
    }
    Ok(())
}

pub fn set_notification_preferences(
    caller: UserId,
    preferences: NotificationPreferences,
) -> Result<(), PairError> {
    let mut profile = get_user(&caller)?;
    profile.notification_preferences = preferences;
    profile.updated_at = now_ns();
    user_storage::insert_user(&profile);
    Ok(())
}

/// The partner-visible profiles of a couple's two members, in member order.
/// A member without a user document yields a bare profile rather than an
/// error, matching what clients render for a not-yet-seen partner.
pub fn get_public_profiles(couple_id: &CoupleId) -> Result<Vec<PublicProfile>, PairError> {
    let couple = couple_storage::get_couple(couple_id)
        .ok_or_else(|| PairError::CoupleNotFound(couple_id.clone()))?;

    Ok(couple
        .members
        .iter()
        .map(|uid| match user_storage::get_user(uid) {
            Some(profile) => profile.public_profile(),
            None => PublicProfile {
                uid: *uid,
                nickname: None,
                display_name: None,
                photo_url: None,
            },
        })
        .collect())
}
