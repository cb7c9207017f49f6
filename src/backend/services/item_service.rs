// src/backend/services/item_service.rs
// The item ledger: every mutation keeps the denormalized collection
// counters consistent within the same update call. The Inbox sentinel has
// no counter, so moves in and out of it touch only the real side.

use crate::{
    error::PairError,
    metrics,
    models::comment::Comment,
    models::common::{
        is_real_collection, CollectionId, CommentId, CoupleId, ItemId, ItemStatus, UserId,
        INBOX_COLLECTION_ID,
    },
    models::event::ChangeKind,
    models::item::Item,
    services::event_service,
    storage::{
        collections as collection_storage, comments as comment_storage, items as item_storage,
    },
    utils::{guards, logging, rng, time::now_ns},
};
use serde_json::json;

/// Client route a notification about an item should open.
fn route_for(collection_id: &str) -> String {
    if is_real_collection(collection_id) {
        format!("/collections/{}", collection_id)
    } else {
        "/".to_string()
    }
}

fn bump_counter(couple_id: &CoupleId, collection_id: &CollectionId, delta: i32) {
    if !is_real_collection(collection_id) {
        return;
    }
    if let Some(mut collection) = collection_storage::get_collection(couple_id, collection_id) {
        collection.item_count = if delta >= 0 {
            collection.item_count.saturating_add(delta as u32)
        } else {
            collection.item_count.saturating_sub((-delta) as u32)
        };
        collection_storage::insert_collection(&collection);
    }
}

/// Saves a link for the couple, defaulting to the Inbox.
///
/// # Arguments
/// * `url` - Must be non-empty after trimming.
/// * `collection_id` - Target collection; `None` means the Inbox. A real
///   target must exist and its counter is incremented in the same call.
pub fn add_item(
    couple_id: &CoupleId,
    caller: UserId,
    url: &str,
    title: Option<String>,
    note: Option<String>,
    collection_id: Option<CollectionId>,
) -> Result<Item, PairError> {
    guards::check_member(couple_id, &caller)?;

    let url = url.trim();
    if url.is_empty() {
        return Err(PairError::InvalidInput("URL required".to_string()));
    }

    let collection_id = collection_id.unwrap_or_else(|| INBOX_COLLECTION_ID.to_string());
    if is_real_collection(&collection_id)
        && collection_storage::get_collection(couple_id, &collection_id).is_none()
    {
        return Err(PairError::CollectionNotFound(collection_id));
    }

    let item = Item {
        item_id: rng::generate_ulid(),
        couple_id: couple_id.clone(),
        url: url.to_string(),
        title,
        note,
        collection_id: collection_id.clone(),
        status: ItemStatus::Pending,
        created_by: caller,
        created_at: now_ns(),
        comment_count: 0,
    };
    item_storage::insert_item(&item);
    bump_counter(couple_id, &collection_id, 1);

    metrics::record(|m| m.items_created_total = m.items_created_total.saturating_add(1));
    event_service::emit(
        couple_id,
        caller,
        ChangeKind::ItemCreated,
        Some(
            json!({
                "item_id": item.item_id,
                "collection_id": collection_id,
                "route": route_for(&collection_id),
                "tag": format!("item_{}", item.item_id),
            })
            .to_string(),
        ),
    );
    Ok(item)
}

/// Items of one collection (or the Inbox), newest first.
pub fn list_items(
    couple_id: &CoupleId,
    caller: &UserId,
    collection_id: &str,
) -> Result<Vec<Item>, PairError> {
    guards::check_member(couple_id, caller)?;
    let mut items = item_storage::list_for_collection(couple_id, &collection_id.to_string());
    items.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.item_id.cmp(&a.item_id))
    });
    Ok(items)
}

/// Moves an item between collections, adjusting both counters in the same
/// call. Moving an item onto itself is a no-op.
pub fn move_item(
    couple_id: &CoupleId,
    caller: UserId,
    item_id: &ItemId,
    from_collection_id: &CollectionId,
    to_collection_id: &CollectionId,
) -> Result<(), PairError> {
    guards::check_member(couple_id, &caller)?;

    if from_collection_id == to_collection_id {
        return Ok(());
    }

    let mut item = item_storage::get_item(couple_id, item_id)
        .ok_or_else(|| PairError::ItemNotFound(item_id.clone()))?;
    if is_real_collection(to_collection_id)
        && collection_storage::get_collection(couple_id, to_collection_id).is_none()
    {
        return Err(PairError::CollectionNotFound(to_collection_id.clone()));
    }

    item.collection_id = to_collection_id.clone();
    item_storage::insert_item(&item);
    bump_counter(couple_id, from_collection_id, -1);
    bump_counter(couple_id, to_collection_id, 1);

    event_service::emit(
        couple_id,
        caller,
        ChangeKind::ItemMoved,
        Some(
            json!({
                "item_id": item_id,
                "from": from_collection_id,
                "to": to_collection_id,
            })
            .to_string(),
        ),
    );
    Ok(())
}

/// Deletes an item together with its comments, adjusting the counter of the
/// collection it was listed under.
pub fn delete_item(
    couple_id: &CoupleId,
    caller: UserId,
    item_id: &ItemId,
    collection_id: &CollectionId,
) -> Result<(), PairError> {
    guards::check_member(couple_id, &caller)?;

    if item_storage::get_item(couple_id, item_id).is_none() {
        return Err(PairError::ItemNotFound(item_id.clone()));
    }
    comment_storage::remove_for_item(couple_id, item_id);
    item_storage::remove_item(couple_id, item_id);
    bump_counter(couple_id, collection_id, -1);

    event_service::emit(
        couple_id,
        caller,
        ChangeKind::ItemDeleted,
        Some(json!({ "item_id": item_id, "collection_id": collection_id }).to_string()),
    );
    Ok(())
}

/// Flips an item between pending and done. No counter side effects.
pub fn set_item_status(
    couple_id: &CoupleId,
    caller: UserId,
    item_id: &ItemId,
    status: ItemStatus,
) -> Result<Item, PairError> {
    guards::check_member(couple_id, &caller)?;

    let mut item = item_storage::get_item(couple_id, item_id)
        .ok_or_else(|| PairError::ItemNotFound(item_id.clone()))?;
    item.status = status;
    item_storage::insert_item(&item);

    event_service::emit(
        couple_id,
        caller,
        ChangeKind::ItemStatusChanged,
        Some(json!({ "item_id": item_id, "status": status }).to_string()),
    );
    Ok(item)
}

/// Attaches a comment and bumps the item's comment counter in the same call.
pub fn add_comment(
    couple_id: &CoupleId,
    caller: UserId,
    item_id: &ItemId,
    text: &str,
) -> Result<Comment, PairError> {
    guards::check_member(couple_id, &caller)?;

    let text = text.trim();
    if text.is_empty() {
        return Err(PairError::InvalidInput(
            "The comment cannot be empty".to_string(),
        ));
    }
    let mut item = item_storage::get_item(couple_id, item_id)
        .ok_or_else(|| PairError::ItemNotFound(item_id.clone()))?;

    let comment = Comment {
        comment_id: rng::generate_ulid(),
        couple_id: couple_id.clone(),
        item_id: item_id.clone(),
        text: text.to_string(),
        author_id: caller,
        created_at: now_ns(),
    };
    comment_storage::insert_comment(&comment);
    item.comment_count = item.comment_count.saturating_add(1);
    item_storage::insert_item(&item);

    metrics::record(|m| m.comments_created_total = m.comments_created_total.saturating_add(1));
    event_service::emit(
        couple_id,
        caller,
        ChangeKind::CommentCreated,
        Some(
            json!({
                "item_id": item_id,
                "comment_id": comment.comment_id,
                "route": route_for(&item.collection_id),
            })
            .to_string(),
        ),
    );
    Ok(comment)
}

/// Comments of one item, newest first, optionally truncated.
pub fn list_comments(
    couple_id: &CoupleId,
    caller: &UserId,
    item_id: &ItemId,
    limit: Option<u32>,
) -> Result<Vec<Comment>, PairError> {
    guards::check_member(couple_id, caller)?;
    let mut comments = comment_storage::list_for_item(couple_id, item_id);
    comments.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.comment_id.cmp(&a.comment_id))
    });
    if let Some(limit) = limit {
        comments.truncate(limit as usize);
    }
    Ok(comments)
}

/// Removes a comment and decrements the item's comment counter.
pub fn delete_comment(
    couple_id: &CoupleId,
    caller: UserId,
    item_id: &ItemId,
    comment_id: &CommentId,
) -> Result<(), PairError> {
    guards::check_member(couple_id, &caller)?;

    if comment_storage::remove_comment(couple_id, item_id, comment_id).is_none() {
        return Err(PairError::CommentNotFound(comment_id.clone()));
    }
    if let Some(mut item) = item_storage::get_item(couple_id, item_id) {
        item.comment_count = item.comment_count.saturating_sub(1);
        item_storage::insert_item(&item);
    } else {
        logging::warn(format!(
            "Comment {} removed but its item {} is gone",
            comment_id, item_id
        ));
    }

    event_service::emit(
        couple_id,
        caller,
        ChangeKind::CommentDeleted,
        Some(json!({ "item_id": item_id, "comment_id": comment_id }).to_string()),
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::collection_service::create_collection;
    use crate::services::invite_service::{create_invite, redeem_invite};
    use crate::utils::{rng::seed_internal_rng, time};
    use candid::Principal;
    use pretty_assertions::assert_eq;

    fn uid(n: u8) -> UserId {
        Principal::from_slice(&[n; 4])
    }

    fn pair() -> CoupleId {
        seed_internal_rng([11u8; 32]);
        time::set_now_ns(1_750_000_000_000_000_000);
        let created = create_invite(uid(1), None).unwrap();
        redeem_invite(uid(2), &created.code).unwrap()
    }

    fn stored_count(couple_id: &CoupleId, collection_id: &CollectionId) -> u32 {
        collection_storage::get_collection(couple_id, collection_id)
            .map(|c| c.item_count)
            .unwrap_or(0)
    }

    /// Every real collection's stored counter must equal the live count of
    /// its items.
    fn assert_counters_consistent(couple_id: &CoupleId) {
        for collection in collection_storage::list_for_couple(couple_id) {
            let live = item_storage::list_for_collection(couple_id, &collection.collection_id)
                .len() as u32;
            assert_eq!(
                collection.item_count, live,
                "counter drift on {}",
                collection.collection_id
            );
        }
    }

    #[test]
    fn add_requires_a_url() {
        let couple = pair();
        let err = add_item(&couple, uid(1), "   ", None, None, None).unwrap_err();
        assert_eq!(err, PairError::InvalidInput("URL required".to_string()));
    }

    #[test]
    fn add_defaults_to_the_inbox() {
        let couple = pair();
        let item = add_item(&couple, uid(1), " https://a.example ", None, None, None).unwrap();
        assert_eq!(item.collection_id, INBOX_COLLECTION_ID);
        assert_eq!(item.url, "https://a.example");
        assert_eq!(item.status, ItemStatus::Pending);
        assert_eq!(item.comment_count, 0);
    }

    #[test]
    fn add_into_a_missing_collection_rejects() {
        let couple = pair();
        let err = add_item(
            &couple,
            uid(1),
            "https://a.example",
            None,
            None,
            Some("01J0000000000000000000GONE".to_string()),
        )
        .unwrap_err();
        assert!(matches!(err, PairError::CollectionNotFound(_)));
        assert_eq!(list_items(&couple, &uid(1), INBOX_COLLECTION_ID).unwrap().len(), 0);
    }

    #[test]
    fn counters_follow_add_move_delete() {
        let couple = pair();
        let trips = create_collection(&couple, uid(1), "Trips", "🧳").unwrap();

        // Scenario: add into Trips, move to Inbox, delete from Inbox.
        let item = add_item(&couple, uid(1), "https://a.example", None, None, Some(trips.collection_id.clone())).unwrap();
        assert_eq!(stored_count(&couple, &trips.collection_id), 1);
        assert_counters_consistent(&couple);

        move_item(&couple, uid(1), &item.item_id, &trips.collection_id, &INBOX_COLLECTION_ID.to_string()).unwrap();
        assert_eq!(stored_count(&couple, &trips.collection_id), 0);
        assert_counters_consistent(&couple);

        delete_item(&couple, uid(1), &item.item_id, &INBOX_COLLECTION_ID.to_string()).unwrap();
        assert_eq!(stored_count(&couple, &trips.collection_id), 0);
        assert_counters_consistent(&couple);
    }

    #[test]
    fn sequential_adds_accumulate_both_increments() {
        let couple = pair();
        let trips = create_collection(&couple, uid(1), "Trips", "🧳").unwrap();
        add_item(&couple, uid(1), "https://a.example", None, None, Some(trips.collection_id.clone())).unwrap();
        add_item(&couple, uid(2), "https://b.example", None, None, Some(trips.collection_id.clone())).unwrap();
        assert_eq!(stored_count(&couple, &trips.collection_id), 2);
        assert_counters_consistent(&couple);
    }

    #[test]
    fn move_onto_itself_is_a_noop() {
        let couple = pair();
        let trips = create_collection(&couple, uid(1), "Trips", "🧳").unwrap();
        let item = add_item(&couple, uid(1), "https://a.example", None, None, Some(trips.collection_id.clone())).unwrap();

        move_item(&couple, uid(1), &item.item_id, &trips.collection_id, &trips.collection_id).unwrap();
        assert_eq!(stored_count(&couple, &trips.collection_id), 1);
        let unchanged = item_storage::get_item(&couple, &item.item_id).unwrap();
        assert_eq!(unchanged.collection_id, trips.collection_id);

        // Even a dangling id is accepted: nothing is read on the no-op path.
        move_item(&couple, uid(1), &"01J0000000000000000000GONE".to_string(), &trips.collection_id, &trips.collection_id).unwrap();
    }

    #[test]
    fn move_round_trip_restores_initial_state() {
        let couple = pair();
        let a = create_collection(&couple, uid(1), "A", "🅰️").unwrap();
        let b = create_collection(&couple, uid(1), "B", "🅱️").unwrap();
        let item = add_item(&couple, uid(1), "https://a.example", None, None, Some(a.collection_id.clone())).unwrap();
        let count_after_create = stored_count(&couple, &a.collection_id);

        move_item(&couple, uid(2), &item.item_id, &a.collection_id, &b.collection_id).unwrap();
        move_item(&couple, uid(2), &item.item_id, &b.collection_id, &a.collection_id).unwrap();

        assert_eq!(stored_count(&couple, &a.collection_id), count_after_create);
        assert_eq!(stored_count(&couple, &b.collection_id), 0);
        let back = item_storage::get_item(&couple, &item.item_id).unwrap();
        assert_eq!(back.collection_id, a.collection_id);
        assert_counters_consistent(&couple);
    }

    #[test]
    fn moving_a_missing_item_rejects() {
        let couple = pair();
        let trips = create_collection(&couple, uid(1), "Trips", "🧳").unwrap();
        let err = move_item(
            &couple,
            uid(1),
            &"01J0000000000000000000GONE".to_string(),
            &INBOX_COLLECTION_ID.to_string(),
            &trips.collection_id,
        )
        .unwrap_err();
        assert!(matches!(err, PairError::ItemNotFound(_)));
        assert_eq!(stored_count(&couple, &trips.collection_id), 0);
    }

    #[test]
    fn status_toggle_touches_no_counter() {
        let couple = pair();
        let trips = create_collection(&couple, uid(1), "Trips", "🧳").unwrap();
        let item = add_item(&couple, uid(1), "https://a.example", None, None, Some(trips.collection_id.clone())).unwrap();

        let done = set_item_status(&couple, uid(2), &item.item_id, ItemStatus::Done).unwrap();
        assert_eq!(done.status, ItemStatus::Done);
        let pending = set_item_status(&couple, uid(2), &item.item_id, ItemStatus::Pending).unwrap();
        assert_eq!(pending.status, ItemStatus::Pending);
        assert_eq!(stored_count(&couple, &trips.collection_id), 1);
    }

    #[test]
    fn listing_is_newest_first_and_scoped() {
        let couple = pair();
        let trips = create_collection(&couple, uid(1), "Trips", "🧳").unwrap();
        add_item(&couple, uid(1), "https://old.example", None, None, None).unwrap();
        time::advance_ns(1_000_000_000);
        add_item(&couple, uid(1), "https://new.example", None, None, None).unwrap();
        add_item(&couple, uid(1), "https://trip.example", None, None, Some(trips.collection_id.clone())).unwrap();

        let inbox = list_items(&couple, &uid(1), INBOX_COLLECTION_ID).unwrap();
        assert_eq!(inbox.len(), 2);
        assert_eq!(inbox[0].url, "https://new.example");
        assert_eq!(inbox[1].url, "https://old.example");

        let trips_items = list_items(&couple, &uid(1), &trips.collection_id).unwrap();
        assert_eq!(trips_items.len(), 1);
    }

    #[test]
    fn comments_maintain_the_item_counter() {
        let couple = pair();
        let item = add_item(&couple, uid(1), "https://a.example", None, None, None).unwrap();

        let err = add_comment(&couple, uid(2), &item.item_id, "  ").unwrap_err();
        assert!(matches!(err, PairError::InvalidInput(_)));

        let first = add_comment(&couple, uid(2), &item.item_id, "nice find").unwrap();
        time::advance_ns(1_000_000_000);
        add_comment(&couple, uid(1), &item.item_id, "booked!").unwrap();
        assert_eq!(item_storage::get_item(&couple, &item.item_id).unwrap().comment_count, 2);

        let comments = list_comments(&couple, &uid(1), &item.item_id, None).unwrap();
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].text, "booked!");
        assert_eq!(list_comments(&couple, &uid(1), &item.item_id, Some(1)).unwrap().len(), 1);

        delete_comment(&couple, uid(2), &item.item_id, &first.comment_id).unwrap();
        assert_eq!(item_storage::get_item(&couple, &item.item_id).unwrap().comment_count, 1);

        let err = delete_comment(&couple, uid(2), &item.item_id, &first.comment_id).unwrap_err();
        assert!(matches!(err, PairError::CommentNotFound(_)));
    }

    #[test]
    fn deleting_an_item_cascades_its_comments() {
        let couple = pair();
        let item = add_item(&couple, uid(1), "https://a.example", None, None, None).unwrap();
        add_comment(&couple, uid(2), &item.item_id, "keep?").unwrap();

        delete_item(&couple, uid(1), &item.item_id, &INBOX_COLLECTION_ID.to_string()).unwrap();
        assert!(item_storage::get_item(&couple, &item.item_id).is_none());
        assert_eq!(comment_storage::list_for_item(&couple, &item.item_id).len(), 0);
    }

    #[test]
    fn ledger_is_member_guarded() {
        let couple = pair();
        let err = add_item(&couple, uid(9), "https://a.example", None, None, None).unwrap_err();
        assert!(matches!(err, PairError::NotAuthorized(_)));
    }
}
