// src/backend/storage/collections.rs
use crate::models::collection::Collection;
use crate::models::common::{CollectionId, CoupleId};
use crate::storage::memory::{get_collections_memory, Memory};
use crate::storage::storable::{Cbor, StorableString};
use ic_stable_structures::StableBTreeMap;
use std::cell::RefCell;

type StorableCollection = Cbor<Collection>;

thread_local! {
    /// Collections: Key = "{couple_id}:{collection_id}", Value = Collection
    pub static COLLECTIONS: RefCell<StableBTreeMap<StorableString, StorableCollection, Memory>> = RefCell::new(
        StableBTreeMap::init(get_collections_memory())
    );
}

/// Generates a key for the COLLECTIONS map.
/// Format: "{couple_id}:{collection_id}"
pub fn create_collection_key(couple_id: &CoupleId, collection_id: &CollectionId) -> StorableString {
    Cbor(format!("{}:{}", couple_id, collection_id))
}

pub fn insert_collection(collection: &Collection) -> Option<Collection> {
    let key = create_collection_key(&collection.couple_id, &collection.collection_id);
    COLLECTIONS.with(|map_ref| {
        map_ref
            .borrow_mut()
            .insert(key, Cbor(collection.clone()))
            .map(|prev| prev.0)
    })
}

pub fn get_collection(couple_id: &CoupleId, collection_id: &CollectionId) -> Option<Collection> {
    let key = create_collection_key(couple_id, collection_id);
    COLLECTIONS.with(|map_ref| map_ref.borrow().get(&key).map(|cbor| cbor.0))
}

pub fn remove_collection(couple_id: &CoupleId, collection_id: &CollectionId) -> Option<Collection> {
    let key = create_collection_key(couple_id, collection_id);
    COLLECTIONS.with(|map_ref| map_ref.borrow_mut().remove(&key).map(|cbor| cbor.0))
}

/// All collections of one couple. Iterates the whole map and filters by
/// owner, matching the scan style used elsewhere in storage.
pub fn list_for_couple(couple_id: &CoupleId) -> Vec<Collection> {
    let mut collections = Vec::new();
    COLLECTIONS.with(|map_ref| {
        let map = map_ref.borrow();
        for (_key, value) in map.iter() {
            let collection: Collection = value.0;
            if collection.couple_id == *couple_id {
                collections.push(collection);
            }
        }
    });
    collections
}
