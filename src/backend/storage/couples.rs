// src/backend/storage/couples.rs
use crate::models::common::CoupleId;
use crate::models::couple::Couple;
use crate::storage::memory::{get_couples_memory, Memory};
use crate::storage::storable::{Cbor, StorableString};
use ic_stable_structures::StableBTreeMap;
use std::cell::RefCell;

type StorableCouple = Cbor<Couple>;

thread_local! {
    /// Couples: Key = couple_id (ULID string), Value = Couple
    pub static COUPLES: RefCell<StableBTreeMap<StorableString, StorableCouple, Memory>> = RefCell::new(
        StableBTreeMap::init(get_couples_memory())
    );
}

pub fn insert_couple(couple: &Couple) -> Option<Couple> {
    let key = Cbor(couple.couple_id.clone());
    COUPLES.with(|map_ref| {
        map_ref
            .borrow_mut()
            .insert(key, Cbor(couple.clone()))
            .map(|prev| prev.0)
    })
}

pub fn get_couple(couple_id: &CoupleId) -> Option<Couple> {
    let key = Cbor(couple_id.clone());
    COUPLES.with(|map_ref| map_ref.borrow().get(&key).map(|cbor| cbor.0))
}
