// src/backend/utils/guards.rs
use crate::error::PairError;
use crate::models::common::{CoupleId, UserId};
use crate::models::couple::Couple;
use crate::storage::{self, config};

/// Checks that `caller` is one of the couple's two members and returns the
/// couple for further use.
///
/// # Errors
///
/// Returns `PairError::CoupleNotFound` if the couple does not exist and
/// `PairError::NotAuthorized` if the caller is not a member.
pub fn check_member(couple_id: &CoupleId, caller: &UserId) -> Result<Couple, PairError> {
    let couple = storage::couples::get_couple(couple_id)
        .ok_or_else(|| PairError::CoupleNotFound(couple_id.clone()))?;
    if !couple.is_member(caller) {
        return Err(PairError::NotAuthorized(format!(
            "Caller {} is not a member of couple {}",
            caller, couple_id
        )));
    }
    Ok(couple)
}

/// Checks if the caller is the designated admin principal.
pub fn check_admin(caller: UserId) -> Result<(), PairError> {
    if caller == config::get_admin_principal() {
        Ok(())
    } else {
        Err(PairError::NotAuthorized(
            "Caller is not the admin principal.".to_string(),
        ))
    }
}

/// Checks if the canister has sufficient cycles.
///
/// # Errors
///
/// Returns `PairError::CycleLow` if the balance is below the threshold.
#[cfg(target_arch = "wasm32")]
pub fn check_cycles() -> Result<(), PairError> {
    let balance = ic_cdk::api::canister_balance128();
    let threshold = config::get_min_cycles_threshold();
    if balance < threshold {
        crate::utils::logging::warn(format!(
            "Cycle balance low: {} cycles, threshold: {}",
            balance, threshold
        ));
        Err(PairError::CycleLow)
    } else {
        Ok(())
    }
}

/// Native builds have no cycle balance to check.
#[cfg(not(target_arch = "wasm32"))]
pub fn check_cycles() -> Result<(), PairError> {
    Ok(())
}
