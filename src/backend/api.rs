// src/backend/api.rs
// Candid API endpoint definitions (query/update functions)

use crate::{
    error::PairError,
    metrics::{get_pair_metrics, PairMetrics},
    models::collection::Collection,
    models::comment::Comment,
    models::common::{CollectionId, CommentId, CoupleId, DeleteCollectionMode, ItemId, ItemStatus},
    models::couple::Couple,
    models::event::ChangeEvent,
    models::invite::Invite,
    models::item::Item,
    models::user::{NotificationPreferences, PublicProfile, UserProfile},
    services::{
        collection_service, couple_service,
        couple_service::ReconcileOutcome,
        event_service,
        invite_service::{self, CreatedInvite},
        item_service, user_service,
    },
    utils::guards::{check_admin, check_cycles, check_member},
};
use candid::CandidType;
use ic_cdk::caller;
use ic_cdk_macros::{query, update};
use serde::Deserialize;
use validator::Validate;

// --- Validation Helper ---
fn validate_request<T: Validate>(req: &T) -> Result<(), PairError> {
    req.validate()
        .map_err(|e| PairError::InvalidInput(e.to_string()))
}

// --- Request Structs ---

// User registry
#[derive(CandidType, Deserialize, Clone, Debug, Validate)]
pub struct EnsureUserRequest {
    #[validate(length(max = 100))]
    pub display_name: Option<String>,
    #[validate(length(max = 320))]
    pub email: Option<String>,
    #[validate(length(max = 2048))]
    pub photo_url: Option<String>,
}

#[derive(CandidType, Deserialize, Clone, Debug, Validate)]
pub struct SetNicknameRequest {
    #[validate(length(max = 50))]
    pub nickname: Option<String>,
}

#[derive(CandidType, Deserialize, Clone, Debug, Validate)]
pub struct FcmTokenRequest {
    #[validate(length(min = 1, max = 4096))]
    pub token: String,
}

// Pairing
#[derive(CandidType, Deserialize, Clone, Debug, Validate)]
pub struct CreateInviteRequest {
    #[validate(length(max = 100))]
    pub creator_name: Option<String>,
}

#[derive(CandidType, Deserialize, Clone, Debug, Validate)]
pub struct RedeemInviteRequest {
    #[validate(length(min = 1, max = 32))]
    pub code: String,
}

#[derive(CandidType, Deserialize, Clone, Debug, Validate)]
pub struct SetCoupleTitleRequest {
    #[validate(length(min = 1))]
    pub couple_id: CoupleId,
    #[validate(length(max = 100))]
    pub title: Option<String>,
}

// Ledger
#[derive(CandidType, Deserialize, Clone, Debug, Validate)]
pub struct CreateCollectionRequest {
    #[validate(length(min = 1))]
    pub couple_id: CoupleId,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 16))]
    pub emoji: String,
}

#[derive(CandidType, Deserialize, Clone, Debug, Validate)]
pub struct DeleteCollectionRequest {
    #[validate(length(min = 1))]
    pub couple_id: CoupleId,
    #[validate(length(min = 1))]
    pub collection_id: CollectionId,
    pub mode: DeleteCollectionMode,
}

#[derive(CandidType, Deserialize, Clone, Debug, Validate)]
pub struct AddItemRequest {
    #[validate(length(min = 1))]
    pub couple_id: CoupleId,
    #[validate(length(min = 1, max = 2048))]
    pub url: String,
    #[validate(length(max = 300))]
    pub title: Option<String>,
    #[validate(length(max = 2000))]
    pub note: Option<String>,
    /// Target collection; omit for the Inbox.
    pub collection_id: Option<CollectionId>,
}

#[derive(CandidType, Deserialize, Clone, Debug, Validate)]
pub struct ListItemsRequest {
    #[validate(length(min = 1))]
    pub couple_id: CoupleId,
    #[validate(length(min = 1))]
    pub collection_id: CollectionId,
}

#[derive(CandidType, Deserialize, Clone, Debug, Validate)]
pub struct MoveItemRequest {
    #[validate(length(min = 1))]
    pub couple_id: CoupleId,
    #[validate(length(min = 1))]
    pub item_id: ItemId,
    #[validate(length(min = 1))]
    pub from_collection_id: CollectionId,
    #[validate(length(min = 1))]
    pub to_collection_id: CollectionId,
}

#[derive(CandidType, Deserialize, Clone, Debug, Validate)]
pub struct DeleteItemRequest {
    #[validate(length(min = 1))]
    pub couple_id: CoupleId,
    #[validate(length(min = 1))]
    pub item_id: ItemId,
    #[validate(length(min = 1))]
    pub collection_id: CollectionId,
}

#[derive(CandidType, Deserialize, Clone, Debug, Validate)]
pub struct SetItemStatusRequest {
    #[validate(length(min = 1))]
    pub couple_id: CoupleId,
    #[validate(length(min = 1))]
    pub item_id: ItemId,
    pub status: ItemStatus,
}

#[derive(CandidType, Deserialize, Clone, Debug, Validate)]
pub struct AddCommentRequest {
    #[validate(length(min = 1))]
    pub couple_id: CoupleId,
    #[validate(length(min = 1))]
    pub item_id: ItemId,
    #[validate(length(min = 1, max = 2000))]
    pub text: String,
}

#[derive(CandidType, Deserialize, Clone, Debug, Validate)]
pub struct ListCommentsRequest {
    #[validate(length(min = 1))]
    pub couple_id: CoupleId,
    #[validate(length(min = 1))]
    pub item_id: ItemId,
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<u32>,
}

#[derive(CandidType, Deserialize, Clone, Debug, Validate)]
pub struct DeleteCommentRequest {
    #[validate(length(min = 1))]
    pub couple_id: CoupleId,
    #[validate(length(min = 1))]
    pub item_id: ItemId,
    #[validate(length(min = 1))]
    pub comment_id: CommentId,
}

// Change feed
#[derive(CandidType, Deserialize, Clone, Debug, Validate)]
pub struct SubscribeChangesRequest {
    #[validate(length(min = 1))]
    pub couple_id: CoupleId,
    /// Feed position to start from; omit to receive only new events.
    pub from_seq: Option<u64>,
}

// --- User Endpoints ---

#[update]
fn ensure_user(req: EnsureUserRequest) -> Result<UserProfile, PairError> {
    validate_request(&req)?;
    check_cycles()?;
    user_service::ensure_user(caller(), req.display_name, req.email, req.photo_url)
}

#[query]
fn get_user() -> Result<UserProfile, PairError> {
    user_service::get_user(&caller())
}

#[update]
fn set_nickname(req: SetNicknameRequest) -> Result<UserProfile, PairError> {
    validate_request(&req)?;
    check_cycles()?;
    user_service::set_nickname(caller(), req.nickname)
}

#[update]
fn save_fcm_token(req: FcmTokenRequest) -> Result<(), PairError> {
    validate_request(&req)?;
    check_cycles()?;
    user_service::save_fcm_token(caller(), req.token)
}

#[update]
fn remove_fcm_token(req: FcmTokenRequest) -> Result<(), PairError> {
    validate_request(&req)?;
    check_cycles()?;
    user_service::remove_fcm_token(caller(), req.token)
}

#[update]
fn set_notification_preferences(preferences: NotificationPreferences) -> Result<(), PairError> {
    check_cycles()?;
    user_service::set_notification_preferences(caller(), preferences)
}

// --- Pairing Endpoints ---

#[update]
fn create_invite(req: CreateInviteRequest) -> Result<CreatedInvite, PairError> {
    validate_request(&req)?;
    check_cycles()?;
    invite_service::create_invite(caller(), req.creator_name)
}

#[update]
fn redeem_invite(req: RedeemInviteRequest) -> Result<CoupleId, PairError> {
    validate_request(&req)?;
    check_cycles()?;
    invite_service::redeem_invite(caller(), &req.code)
}

/// The invite a creator is waiting on, so its client can watch for the
/// claimed/expired transition.
#[query]
fn get_invite(code: String) -> Result<Invite, PairError> {
    invite_service::get_invite(&code)
}

#[update]
fn reconcile_pending_invite() -> Result<ReconcileOutcome, PairError> {
    check_cycles()?;
    couple_service::reconcile_pending_invite(caller())
}

#[query]
fn get_couple(couple_id: CoupleId) -> Result<Couple, PairError> {
    couple_service::get_couple(&couple_id, &caller())
}

#[update]
fn set_couple_title(req: SetCoupleTitleRequest) -> Result<Couple, PairError> {
    validate_request(&req)?;
    check_cycles()?;
    couple_service::set_couple_title(caller(), &req.couple_id, req.title)
}

#[query]
fn get_public_profiles(couple_id: CoupleId) -> Result<Vec<PublicProfile>, PairError> {
    check_member(&couple_id, &caller())?;
    user_service::get_public_profiles(&couple_id)
}

// --- Ledger Endpoints ---

#[update]
fn create_collection(req: CreateCollectionRequest) -> Result<Collection, PairError> {
    validate_request(&req)?;
    check_cycles()?;
    collection_service::create_collection(&req.couple_id, caller(), &req.name, &req.emoji)
}

#[query]
fn list_collections(couple_id: CoupleId) -> Result<Vec<Collection>, PairError> {
    collection_service::list_collections(&couple_id, &caller())
}

#[update]
fn delete_collection(req: DeleteCollectionRequest) -> Result<u32, PairError> {
    validate_request(&req)?;
    check_cycles()?;
    collection_service::delete_collection(&req.couple_id, caller(), &req.collection_id, req.mode)
}

#[update]
fn add_item(req: AddItemRequest) -> Result<Item, PairError> {
    validate_request(&req)?;
    check_cycles()?;
    item_service::add_item(
        &req.couple_id,
        caller(),
        &req.url,
        req.title,
        req.note,
        req.collection_id,
    )
}

#[query]
fn list_items(req: ListItemsRequest) -> Result<Vec<Item>, PairError> {
    validate_request(&req)?;
    item_service::list_items(&req.couple_id, &caller(), &req.collection_id)
}

#[update]
fn move_item(req: MoveItemRequest) -> Result<(), PairError> {
    validate_request(&req)?;
    check_cycles()?;
    item_service::move_item(
        &req.couple_id,
        caller(),
        &req.item_id,
        &req.from_collection_id,
        &req.to_collection_id,
    )
}

#[update]
fn delete_item(req: DeleteItemRequest) -> Result<(), PairError> {
    validate_request(&req)?;
    check_cycles()?;
    item_service::delete_item(&req.couple_id, caller(), &req.item_id, &req.collection_id)
}

#[update]
fn set_item_status(req: SetItemStatusRequest) -> Result<Item, PairError> {
    validate_request(&req)?;
    check_cycles()?;
    item_service::set_item_status(&req.couple_id, caller(), &req.item_id, req.status)
}

#[update]
fn add_comment(req: AddCommentRequest) -> Result<Comment, PairError> {
    validate_request(&req)?;
    check_cycles()?;
    item_service::add_comment(&req.couple_id, caller(), &req.item_id, &req.text)
}

#[query]
fn list_comments(req: ListCommentsRequest) -> Result<Vec<Comment>, PairError> {
    validate_request(&req)?;
    item_service::list_comments(&req.couple_id, &caller(), &req.item_id, req.limit)
}

#[update]
fn delete_comment(req: DeleteCommentRequest) -> Result<(), PairError> {
    validate_request(&req)?;
    check_cycles()?;
    item_service::delete_comment(&req.couple_id, caller(), &req.item_id, &req.comment_id)
}

// --- Maintenance & Feed Endpoints ---

#[update]
fn repair_collection_counts(couple_id: CoupleId) -> Result<u32, PairError> {
    check_cycles()?;
    collection_service::repair_collection_counts(&couple_id, caller())
}

#[update]
fn subscribe_changes(req: SubscribeChangesRequest) -> Result<u64, PairError> {
    validate_request(&req)?;
    check_cycles()?;
    check_member(&req.couple_id, &caller())?;
    Ok(event_service::subscribe(req.couple_id, req.from_seq))
}

#[update]
fn poll_changes(watch_id: u64) -> Result<Vec<ChangeEvent>, PairError> {
    check_cycles()?;
    event_service::poll(watch_id)
}

#[update]
fn unsubscribe_changes(watch_id: u64) -> Result<(), PairError> {
    check_cycles()?;
    event_service::unsubscribe(watch_id)
}

// --- Admin Endpoints ---

#[query]
fn get_metrics() -> Result<PairMetrics, PairError> {
    check_admin(caller())?;
    get_pair_metrics()
}
