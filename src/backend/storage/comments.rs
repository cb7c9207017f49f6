// src/backend/storage/comments.rs
use crate::models::comment::Comment;
use crate::models::common::{CommentId, CoupleId, ItemId};
use crate::storage::memory::{get_comments_memory, Memory};
use crate::storage::storable::{Cbor, StorableString};
use ic_stable_structures::StableBTreeMap;
use std::cell::RefCell;

type StorableComment = Cbor<Comment>;

thread_local! {
    /// Comments: Key = "{couple_id}:{item_id}:{comment_id}", Value = Comment
    pub static COMMENTS: RefCell<StableBTreeMap<StorableString, StorableComment, Memory>> = RefCell::new(
        StableBTreeMap::init(get_comments_memory())
    );
}

/// Generates a key for the COMMENTS map.
/// Format: "{couple_id}:{item_id}:{comment_id}"
pub fn create_comment_key(
    couple_id: &CoupleId,
    item_id: &ItemId,
    comment_id: &CommentId,
) -> StorableString {
    Cbor(format!("{}:{}:{}", couple_id, item_id, comment_id))
}

pub fn insert_comment(comment: &Comment) -> Option<Comment> {
    let key = create_comment_key(&comment.couple_id, &comment.item_id, &comment.comment_id);
    COMMENTS.with(|map_ref| {
        map_ref
            .borrow_mut()
            .insert(key, Cbor(comment.clone()))
            .map(|prev| prev.0)
    })
}

pub fn get_comment(
    couple_id: &CoupleId,
    item_id: &ItemId,
    comment_id: &CommentId,
) -> Option<Comment> {
    let key = create_comment_key(couple_id, item_id, comment_id);
    COMMENTS.with(|map_ref| map_ref.borrow().get(&key).map(|cbor| cbor.0))
}

pub fn remove_comment(
    couple_id: &CoupleId,
    item_id: &ItemId,
    comment_id: &CommentId,
) -> Option<Comment> {
    let key = create_comment_key(couple_id, item_id, comment_id);
    COMMENTS.with(|map_ref| map_ref.borrow_mut().remove(&key).map(|cbor| cbor.0))
}

/// All comments attached to one item.
pub fn list_for_item(couple_id: &CoupleId, item_id: &ItemId) -> Vec<Comment> {
    let mut comments = Vec::new();
    COMMENTS.with(|map_ref| {
        let map = map_ref.borrow();
        for (_key, value) in map.iter() {
            let comment: Comment = value.0;
            if comment.couple_id == *couple_id && comment.item_id == *item_id {
                comments.push(comment);
            }
        }
    });
    comments
}

/// Deletes every comment attached to one item. Returns how many were removed.
pub fn remove_for_item(couple_id: &CoupleId, item_id: &ItemId) -> u32 {
    let doomed: Vec<StorableString> = COMMENTS.with(|map_ref| {
        map_ref
            .borrow()
            .iter()
            .filter(|(_key, value)| {
                value.0.couple_id == *couple_id && value.0.item_id == *item_id
            })
            .map(|(key, _value)| key)
            .collect()
    });

    COMMENTS.with(|map_ref| {
        let mut map = map_ref.borrow_mut();
        for key in &doomed {
            map.remove(key);
        }
    });
    doomed.len() as u32
}
