// src/backend/services/collection_service.rs
// Collection lifecycle and the item-count repair path. The virtual Inbox
// ("INBOX") never has a document here and never has a counter.

use crate::{
    error::PairError,
    metrics,
    models::collection::Collection,
    models::common::{
        is_real_collection, CollectionId, CoupleId, DeleteCollectionMode, UserId,
        INBOX_COLLECTION_ID,
    },
    models::event::ChangeKind,
    services::event_service,
    storage::{
        collections as collection_storage, comments as comment_storage, items as item_storage,
    },
    utils::{guards, logging, rng, time::now_ns},
};
use serde_json::json;
use std::collections::HashMap;

const DEFAULT_EMOJI: &str = "✨";

/// Creates an empty collection for the couple.
///
/// # Arguments
/// * `name` - Display name; must be non-empty after trimming.
/// * `emoji` - Tag shown next to the name; falls back to a default.
pub fn create_collection(
    couple_id: &CoupleId,
    caller: UserId,
    name: &str,
    emoji: &str,
) -> Result<Collection, PairError> {
    guards::check_member(couple_id, &caller)?;

    let name = name.trim();
    if name.is_empty() {
        return Err(PairError::InvalidInput("Name required".to_string()));
    }
    let emoji = emoji.trim();
    let emoji = if emoji.is_empty() { DEFAULT_EMOJI } else { emoji };

    let collection = Collection {
        collection_id: rng::generate_ulid(),
        couple_id: couple_id.clone(),
        name: name.to_string(),
        emoji: emoji.to_string(),
        created_by: caller,
        created_at: now_ns(),
        item_count: 0,
    };
    collection_storage::insert_collection(&collection);

    metrics::record(|m| {
        m.collections_created_total = m.collections_created_total.saturating_add(1)
    });
    event_service::emit(
        couple_id,
        caller,
        ChangeKind::CollectionCreated,
        Some(json!({ "collection_id": collection.collection_id, "name": collection.name }).to_string()),
    );
    Ok(collection)
}

/// All collections of the couple, newest first.
pub fn list_collections(couple_id: &CoupleId, caller: &UserId) -> Result<Vec<Collection>, PairError> {
    guards::check_member(couple_id, caller)?;
    let mut collections = collection_storage::list_for_couple(couple_id);
    collections.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.collection_id.cmp(&a.collection_id))
    });
    Ok(collections)
}

/// Deletes a collection and settles its items in the same update call:
/// either every contained item moves to the Inbox, or every contained item
/// is deleted along with its comments. Returns how many items were affected.
pub fn delete_collection(
    couple_id: &CoupleId,
    caller: UserId,
    collection_id: &CollectionId,
    mode: DeleteCollectionMode,
) -> Result<u32, PairError> {
    guards::check_member(couple_id, &caller)?;

    if !is_real_collection(collection_id) {
        return Err(PairError::InvalidInput(
            "The Inbox cannot be deleted.".to_string(),
        ));
    }
    if collection_storage::get_collection(couple_id, collection_id).is_none() {
        return Err(PairError::CollectionNotFound(collection_id.clone()));
    }

    let contained = item_storage::list_for_collection(couple_id, collection_id);
    match mode {
        DeleteCollectionMode::MoveToInbox => {
            for mut item in contained.iter().cloned() {
                item.collection_id = INBOX_COLLECTION_ID.to_string();
                item_storage::insert_item(&item);
            }
        }
        DeleteCollectionMode::DeleteAll => {
            for item in &contained {
                comment_storage::remove_for_item(couple_id, &item.item_id);
                item_storage::remove_item(couple_id, &item.item_id);
            }
        }
    }
    // The counter dies with the document; nothing to reconcile on this path.
    collection_storage::remove_collection(couple_id, collection_id);

    metrics::record(|m| {
        m.collections_deleted_total = m.collections_deleted_total.saturating_add(1)
    });
    event_service::emit(
        couple_id,
        caller,
        ChangeKind::CollectionDeleted,
        Some(json!({ "collection_id": collection_id, "mode": mode, "items": contained.len() }).to_string()),
    );
    logging::info(format!(
        "🗑️ INFO: Collection {} deleted ({} items settled)",
        collection_id,
        contained.len()
    ));
    Ok(contained.len() as u32)
}

/// Recomputes every collection's `item_count` from a live scan of the
/// couple's items. The counters are maintained transactionally by the item
/// operations, so this normally corrects nothing; it exists as the repair
/// path for drift. Returns how many collections were corrected.
pub fn repair_collection_counts(couple_id: &CoupleId, caller: UserId) -> Result<u32, PairError> {
    guards::check_member(couple_id, &caller)?;

    let mut live_counts: HashMap<CollectionId, u32> = HashMap::new();
    for item in item_storage::list_for_couple(couple_id) {
        if is_real_collection(&item.collection_id) {
            *live_counts.entry(item.collection_id).or_insert(0) += 1;
        }
    }

    let mut repaired = 0u32;
    for mut collection in collection_storage::list_for_couple(couple_id) {
        let live = live_counts
            .get(&collection.collection_id)
            .copied()
            .unwrap_or(0);
        if collection.item_count != live {
            logging::warn(format!(
                "🔧 WARN: Collection {} counter drifted ({} stored, {} live)",
                collection.collection_id, collection.item_count, live
            ));
            collection.item_count = live;
            collection_storage::insert_collection(&collection);
            repaired += 1;
        }
    }

    if repaired > 0 {
        metrics::record(|m| {
            m.counter_repairs_total = m.counter_repairs_total.saturating_add(repaired as u64)
        });
        event_service::emit(
            couple_id,
            caller,
            ChangeKind::CountersRepaired,
            Some(json!({ "repaired": repaired }).to_string()),
        );
    }
    Ok(repaired)
}
