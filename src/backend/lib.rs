// src/backend/lib.rs

pub mod api;
pub mod error;
pub mod metrics;
pub mod models;
pub mod services;
pub mod storage;
pub mod utils;

use models::init::InitArgs;
use std::time::Duration;

// Types referenced by the generated `export_candid!()` service definition.
// The macro emits these identifiers unqualified, so they must be in scope here.
use crate::api::{
    AddCommentRequest, AddItemRequest, CreateCollectionRequest, CreateInviteRequest,
    DeleteCollectionRequest, DeleteCommentRequest, DeleteItemRequest, EnsureUserRequest,
    FcmTokenRequest, ListCommentsRequest, ListItemsRequest, MoveItemRequest, RedeemInviteRequest,
    SetCoupleTitleRequest, SetItemStatusRequest, SetNicknameRequest, SubscribeChangesRequest,
};
use crate::error::PairError;
use crate::metrics::PairMetrics;
use crate::models::collection::Collection;
use crate::models::comment::Comment;
use crate::models::common::CoupleId;
use crate::models::couple::Couple;
use crate::models::event::ChangeEvent;
use crate::models::invite::Invite;
use crate::models::item::Item;
use crate::models::user::{NotificationPreferences, PublicProfile, UserProfile};
use crate::services::couple_service::ReconcileOutcome;
use crate::services::invite_service::CreatedInvite;

// Seeding needs an async raw_rand call, which init/post_upgrade cannot
// await; a zero-delay timer runs it right after the message completes.
fn schedule_rng_seeding() {
    ic_cdk_timers::set_timer(Duration::ZERO, || {
        ic_cdk::spawn(async {
            if let Err(e) = utils::rng::initialize_internal_rng().await {
                utils::logging::warn(format!("Failed to initialize internal RNG: {}", e));
            }
        });
    });
}

fn apply_init_args(args: Option<InitArgs>) {
    let Some(args) = args else { return };
    if let Some(admin) = args.admin_principal {
        if let Err(e) = storage::config::set_admin_principal(admin) {
            utils::logging::warn(e);
        }
    }
    if let Some(threshold) = args.min_cycles_threshold {
        if let Err(e) = storage::config::set_min_cycles_threshold(threshold) {
            utils::logging::warn(e);
        }
    }
}

#[ic_cdk::init]
fn init(args: Option<InitArgs>) {
    apply_init_args(args);
    schedule_rng_seeding();
    ic_cdk::println!("Pair Collection backend canister initialized.");
}

#[ic_cdk::post_upgrade]
fn post_upgrade(args: Option<InitArgs>) {
    apply_init_args(args);
    schedule_rng_seeding();
    ic_cdk::println!("Pair Collection backend canister upgraded.");
}

// Export Candid interface
ic_cdk::export_candid!();
