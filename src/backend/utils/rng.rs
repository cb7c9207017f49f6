// src/backend/utils/rng.rs

use crate::error::PairError;
use crate::models::common::NANOS_PER_MILLI;
use crate::utils::time::now_ns;
use ic_cdk::api::management_canister::main::raw_rand;
use rand::Rng;
use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
use std::cell::RefCell;
use ulid::Ulid;

thread_local! {
    // RNG backing invite codes and document ids, seeded once per canister
    // lifetime from raw_rand (init / post_upgrade timer).
    static INTERNAL_RNG: RefCell<Option<ChaCha8Rng>> = RefCell::new(None);
}

/// Seeds the thread-local RNG directly. The init timer calls this with
/// raw_rand output; native tests call it with a fixed seed.
pub fn seed_internal_rng(seed: [u8; 32]) {
    INTERNAL_RNG.with(|rng| {
        *rng.borrow_mut() = Some(ChaCha8Rng::from_seed(seed));
    });
}

/// Initializes the thread-local ChaCha8Rng using raw_rand from the IC.
/// Scheduled during canister init and post_upgrade.
pub async fn initialize_internal_rng() -> Result<(), PairError> {
    let raw: Result<(Vec<u8>,), _> = raw_rand().await;
    match raw {
        Ok((bytes,)) => {
            if bytes.len() >= 32 {
                let seed: [u8; 32] = bytes[..32].try_into().map_err(|_| {
                    PairError::InternalError("Failed to create seed from raw_rand".to_string())
                })?;
                seed_internal_rng(seed);
                crate::utils::logging::info("Internal RNG initialized successfully.");
                Ok(())
            } else {
                Err(PairError::InternalError(
                    "raw_rand returned insufficient bytes for seed".to_string(),
                ))
            }
        }
        Err(e) => Err(PairError::InternalError(format!(
            "Failed to get raw_rand: {:?}",
            e
        ))),
    }
}

/// Borrows the initialized internal RNG.
/// Panics if the RNG has not been initialized.
pub fn with_internal_rng<F, R>(f: F) -> R
where
    F: FnOnce(&mut ChaCha8Rng) -> R,
{
    INTERNAL_RNG.with(|rng| {
        let mut borrowed_rng = rng.borrow_mut();
        let rng_instance = borrowed_rng
            .as_mut()
            .expect("Internal RNG accessed before initialization");
        f(rng_instance)
    })
}

/// Draws a candidate pairing code: exactly six ASCII digits, uniformly from
/// 000000-999999 (leading zeros allowed).
pub fn generate_invite_code() -> String {
    with_internal_rng(|rng| format!("{:06}", rng.gen_range(0..1_000_000u32)))
}

/// Mints a ULID from the current time and the internal RNG. ULIDs sort by
/// creation time, which listing order relies on.
pub fn generate_ulid() -> String {
    let time_ms = now_ns() / NANOS_PER_MILLI;
    let random: u128 = with_internal_rng(|rng| rng.gen());
    Ulid::from_parts(time_ms, random).to_string()
}
