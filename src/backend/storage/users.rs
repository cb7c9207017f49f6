// src/backend/storage/users.rs
use crate::models::common::UserId;
use crate::models::user::UserProfile;
use crate::storage::memory::{get_users_memory, Memory};
use crate::storage::storable::{Cbor, StorableString};
use ic_stable_structures::StableBTreeMap;
use std::cell::RefCell;

type StorableUser = Cbor<UserProfile>;

thread_local! {
    /// User documents: Key = uid (Principal serialized as String), Value = UserProfile
    pub static USERS: RefCell<StableBTreeMap<StorableString, StorableUser, Memory>> = RefCell::new(
        StableBTreeMap::init(get_users_memory())
    );
}

/// Inserts or replaces a user document. Returns the previous document, if any.
pub fn insert_user(profile: &UserProfile) -> Option<UserProfile> {
    let key = Cbor(profile.uid.to_text());
    USERS.with(|map_ref| {
        map_ref
            .borrow_mut()
            .insert(key, Cbor(profile.clone()))
            .map(|prev| prev.0)
    })
}

pub fn get_user(uid: &UserId) -> Option<UserProfile> {
    let key = Cbor(uid.to_text());
    USERS.with(|map_ref| map_ref.borrow().get(&key).map(|cbor| cbor.0))
}
