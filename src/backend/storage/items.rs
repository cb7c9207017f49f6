// src/backend/storage/items.rs
use crate::models::common::{CollectionId, CoupleId, ItemId};
use crate::models::item::Item;
use crate::storage::memory::{get_items_memory, Memory};
use crate::storage::storable::{Cbor, StorableString};
use ic_stable_structures::StableBTreeMap;
use std::cell::RefCell;

type StorableItem = Cbor<Item>;

thread_local! {
    /// Items: Key = "{couple_id}:{item_id}", Value = Item
    pub static ITEMS: RefCell<StableBTreeMap<StorableString, StorableItem, Memory>> = RefCell::new(
        StableBTreeMap::init(get_items_memory())
    );
}

/// Generates a key for the ITEMS map.
/// Format: "{couple_id}:{item_id}"
pub fn create_item_key(couple_id: &CoupleId, item_id: &ItemId) -> StorableString {
    Cbor(format!("{}:{}", couple_id, item_id))
}

pub fn insert_item(item: &Item) -> Option<Item> {
    let key = create_item_key(&item.couple_id, &item.item_id);
    ITEMS.with(|map_ref| {
        map_ref
            .borrow_mut()
            .insert(key, Cbor(item.clone()))
            .map(|prev| prev.0)
    })
}

pub fn get_item(couple_id: &CoupleId, item_id: &ItemId) -> Option<Item> {
    let key = create_item_key(couple_id, item_id);
    ITEMS.with(|map_ref| map_ref.borrow().get(&key).map(|cbor| cbor.0))
}

pub fn remove_item(couple_id: &CoupleId, item_id: &ItemId) -> Option<Item> {
    let key = create_item_key(couple_id, item_id);
    ITEMS.with(|map_ref| map_ref.borrow_mut().remove(&key).map(|cbor| cbor.0))
}

/// All items of one couple.
pub fn list_for_couple(couple_id: &CoupleId) -> Vec<Item> {
    let mut items = Vec::new();
    ITEMS.with(|map_ref| {
        let map = map_ref.borrow();
        for (_key, value) in map.iter() {
            let item: Item = value.0;
            if item.couple_id == *couple_id {
                items.push(item);
            }
        }
    });
    items
}

/// Items of one couple inside one collection (real or the Inbox sentinel).
pub fn list_for_collection(couple_id: &CoupleId, collection_id: &CollectionId) -> Vec<Item> {
    let mut items = Vec::new();
    ITEMS.with(|map_ref| {
        let map = map_ref.borrow();
        for (_key, value) in map.iter() {
            let item: Item = value.0;
            if item.couple_id == *couple_id && item.collection_id == *collection_id {
                items.push(item);
            }
        }
    });
    items
}
