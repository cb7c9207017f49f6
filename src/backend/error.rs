// src/backend/error.rs
use candid::CandidType;
use serde::Deserialize;
use thiserror::Error;

#[derive(CandidType, Deserialize, Error, Debug, PartialEq, Eq)]
pub enum PairError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not authorized: {0}")]
    NotAuthorized(String),

    // Pairing preconditions. All of these reject before any write.
    #[error("Already paired: {0}")]
    AlreadyPaired(String),

    #[error("Invite code does not exist: {0}")]
    InviteNotFound(String),

    #[error("Invite code already used: {0}")]
    InviteAlreadyUsed(String),

    #[error("Invite code expired: {0}")]
    InviteExpired(String),

    #[error("Cannot join your own invite code")]
    OwnInviteCode,

    /// Transient: every candidate code collided with an existing invite.
    #[error("Could not generate an invite code, retry: {0}")]
    CodeGenerationFailed(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Couple not found: {0}")]
    CoupleNotFound(String),

    #[error("Collection not found: {0}")]
    CollectionNotFound(String),

    #[error("Item not found: {0}")]
    ItemNotFound(String),

    #[error("Comment not found: {0}")]
    CommentNotFound(String),

    #[error("Watch handle not found: {0}")]
    WatchNotFound(u64),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Internal canister error: {0}")]
    InternalError(String),

    #[error("Canister cycle balance too low for operation")]
    CycleLow,
}
