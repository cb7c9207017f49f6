// src/backend/storage/invites.rs
use crate::models::common::InviteCode;
use crate::models::invite::Invite;
use crate::storage::memory::{get_invites_memory, Memory};
use crate::storage::storable::{Cbor, StorableString};
use ic_stable_structures::StableBTreeMap;
use std::cell::RefCell;

type StorableInvite = Cbor<Invite>;

thread_local! {
    /// Invites: Key = 6-digit code, Value = Invite.
    /// The code doubles as the primary key, so at most one invite document
    /// exists per code value at a time.
    pub static INVITES: RefCell<StableBTreeMap<StorableString, StorableInvite, Memory>> = RefCell::new(
        StableBTreeMap::init(get_invites_memory())
    );
}

/// Inserts or replaces an invite under its code.
pub fn insert_invite(invite: &Invite) -> Option<Invite> {
    let key = Cbor(invite.code.clone());
    INVITES.with(|map_ref| {
        map_ref
            .borrow_mut()
            .insert(key, Cbor(invite.clone()))
            .map(|prev| prev.0)
    })
}

pub fn get_invite(code: &InviteCode) -> Option<Invite> {
    let key = Cbor(code.clone());
    INVITES.with(|map_ref| map_ref.borrow().get(&key).map(|cbor| cbor.0))
}

pub fn invite_exists(code: &InviteCode) -> bool {
    let key = Cbor(code.clone());
    INVITES.with(|map_ref| map_ref.borrow().contains_key(&key))
}
