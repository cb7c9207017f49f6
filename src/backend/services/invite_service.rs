// src/backend/services/invite_service.rs
// Pairing code generation and redemption. Each public function runs inside
// one update call, so its reads and writes are atomic against every other
// operation; validation happens before the first write on every path except
// lazy expiry, where persisting the Expired status on failure is intended.

use crate::{
    error::PairError,
    metrics,
    models::common::{CoupleId, InviteCode, InviteStatus, Timestamp, UserId},
    models::couple::Couple,
    models::event::ChangeKind,
    models::invite::Invite,
    services::{event_service, user_service},
    storage::{couples as couple_storage, invites as invite_storage, users as user_storage},
    utils::{logging, rng, time::now_ns},
};
use serde_json::json;
use std::time::Duration;

const MAX_CODE_ATTEMPTS: u32 = 8;
const INVITE_TTL: Duration = Duration::from_secs(20 * 60);

#[derive(Clone, Debug, candid::CandidType, serde::Deserialize, serde::Serialize)]
pub struct CreatedInvite {
    pub code: InviteCode,
    pub expires_at: Timestamp,
}

/// Strips everything but ASCII digits and truncates to six characters.
pub fn normalize_code(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).take(6).collect()
}

/// Creates an invite with the code as its document id.
/// Retries with a fresh code on collision, up to a fixed bound.
///
/// # Arguments
/// * `creator_uid` - The caller; must not already be in a couple.
/// * `creator_name` - Display name shown to whoever enters the code.
///
/// # Returns
/// * `Result<CreatedInvite, PairError>` - The code and its expiry.
pub fn create_invite(
    creator_uid: UserId,
    creator_name: Option<String>,
) -> Result<CreatedInvite, PairError> {
    let current_time = now_ns();

    // 1. Precondition: the creator must not already have a partner.
    let mut creator = match user_storage::get_user(&creator_uid) {
        Some(profile) => {
            if profile.couple_id.is_some() {
                return Err(PairError::AlreadyPaired(
                    "You already have a partner. You cannot create a code.".to_string(),
                ));
            }
            profile
        }
        None => user_service::new_profile(creator_uid, current_time),
    };

    let expires_at = current_time.saturating_add(INVITE_TTL.as_nanos() as u64);

    // 2. Draw candidate codes until one is free. A colliding attempt has no
    //    side effects; only the winning code writes anything.
    for _attempt in 0..MAX_CODE_ATTEMPTS {
        let code = rng::generate_invite_code();
        if invite_storage::invite_exists(&code) {
            continue;
        }

        let invite = Invite {
            code: code.clone(),
            creator_uid,
            creator_name: creator_name.clone(),
            status: InviteStatus::Open,
            created_at: current_time,
            expires_at,
            claimed_by_uid: None,
            couple_id: None,
        };
        invite_storage::insert_invite(&invite);

        // 3. Mark the pending invite on the creator's user document. A
        //    previous pending code is overwritten; its invite stays Open
        //    until lazy expiry observes it.
        creator.pending_invite_code = Some(code.clone());
        creator.updated_at = current_time;
        user_storage::insert_user(&creator);

        metrics::record(|m| m.invites_created_total = m.invites_created_total.saturating_add(1));
        logging::info(format!(
            "✉️ INFO: Invite {} created by {}",
            code, creator_uid
        ));
        return Ok(CreatedInvite { code, expires_at });
    }

    Err(PairError::CodeGenerationFailed(
        "Could not generate a code, try again.".to_string(),
    ))
}

/// Redeems an invite code, forming the couple.
///
/// Both user documents converge inside this single update call: the joiner
/// and the creator each get `couple_id`, and the creator's pending code is
/// cleared, so neither side depends on the other's client being online.
///
/// # Returns
/// * `Result<CoupleId, PairError>` - The id of the newly formed couple.
pub fn redeem_invite(joiner_uid: UserId, raw_code: &str) -> Result<CoupleId, PairError> {
    // 1. Normalize before any document read.
    let code = normalize_code(raw_code);
    if code.len() != 6 {
        return Err(PairError::InvalidInput("Invalid code.".to_string()));
    }

    // 2. Look up and validate the invite.
    let mut invite = invite_storage::get_invite(&code)
        .ok_or_else(|| PairError::InviteNotFound(code.clone()))?;

    if invite.status != InviteStatus::Open {
        return Err(PairError::InviteAlreadyUsed(code));
    }
    if invite.creator_uid == joiner_uid {
        return Err(PairError::OwnInviteCode);
    }

    let current_time = now_ns();
    if invite.is_past_expiry(current_time) {
        // Lazy expiry: nothing sweeps invites in the background. The status
        // write survives the rejection.
        expire_invite(&mut invite);
        return Err(PairError::InviteExpired("The code has expired.".to_string()));
    }

    // 3. The joiner must be unpaired.
    let mut joiner = match user_storage::get_user(&joiner_uid) {
        Some(profile) => profile,
        None => user_service::new_profile(joiner_uid, current_time),
    };
    if joiner.couple_id.is_some() {
        return Err(PairError::AlreadyPaired(
            "You already have a partner.".to_string(),
        ));
    }

    // 4. So must the creator still be: if they paired elsewhere after
    //    creating this code, the invite can never form a couple.
    let mut creator = user_storage::get_user(&invite.creator_uid)
        .ok_or_else(|| PairError::UserNotFound(invite.creator_uid.to_text()))?;
    if creator.couple_id.is_some() {
        expire_invite(&mut invite);
        return Err(PairError::InviteExpired(
            "The code is no longer valid.".to_string(),
        ));
    }

    // 5. Form the couple, creator first.
    let couple_id = rng::generate_ulid();
    let couple = Couple {
        couple_id: couple_id.clone(),
        members: vec![invite.creator_uid, joiner_uid],
        created_at: current_time,
        invite_code: code.clone(),
        title: None,
    };
    couple_storage::insert_couple(&couple);

    joiner.couple_id = Some(couple_id.clone());
    joiner.updated_at = current_time;
    user_storage::insert_user(&joiner);

    creator.couple_id = Some(couple_id.clone());
    creator.pending_invite_code = None;
    creator.updated_at = current_time;
    user_storage::insert_user(&creator);

    // 6. Claim the invite.
    invite.status = InviteStatus::Claimed;
    invite.claimed_by_uid = Some(joiner_uid);
    invite.couple_id = Some(couple_id.clone());
    invite_storage::insert_invite(&invite);

    metrics::record(|m| {
        m.invites_claimed_total = m.invites_claimed_total.saturating_add(1);
        m.total_couples = m.total_couples.saturating_add(1);
    });
    event_service::emit(
        &couple_id,
        joiner_uid,
        ChangeKind::CoupleFormed,
        Some(json!({ "invite_code": code }).to_string()),
    );
    logging::info(format!(
        "💑 INFO: Couple {} formed from invite {} (creator {}, joiner {})",
        couple_id, code, invite.creator_uid, joiner_uid
    ));

    Ok(couple_id)
}

pub fn get_invite(raw_code: &str) -> Result<Invite, PairError> {
    let code = normalize_code(raw_code);
    if code.len() != 6 {
        return Err(PairError::InvalidInput("Invalid code.".to_string()));
    }
    invite_storage::get_invite(&code).ok_or(PairError::InviteNotFound(code))
}

fn expire_invite(invite: &mut Invite) {
    invite.status = InviteStatus::Expired;
    invite_storage::insert_invite(invite);
    metrics::record(|m| m.invites_expired_total = m.invites_expired_total.saturating_add(1));
    logging::info(format!("⌛ INFO: Invite {} expired", invite.code));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{rng::seed_internal_rng, time};
    use candid::Principal;
    use pretty_assertions::assert_eq;

    const BASE_NS: u64 = 1_750_000_000_000_000_000;

    fn uid(n: u8) -> UserId {
        Principal::from_slice(&[n; 4])
    }

    fn setup() {
        seed_internal_rng([7u8; 32]);
        time::set_now_ns(BASE_NS);
    }

    #[test]
    fn generated_codes_are_six_digits() {
        setup();
        for _ in 0..100 {
            let code = rng::generate_invite_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn open_codes_are_unique() {
        setup();
        let mut codes = std::collections::BTreeSet::new();
        for n in 0..10u8 {
            let created = create_invite(uid(n), None).unwrap();
            assert!(codes.insert(created.code), "duplicate open code");
        }
    }

    #[test]
    fn create_records_pending_code_and_expiry() {
        setup();
        let created = create_invite(uid(1), Some("Ana".into())).unwrap();
        assert_eq!(created.expires_at, BASE_NS + 20 * 60 * 1_000_000_000);

        let invite = get_invite(&created.code).unwrap();
        assert_eq!(invite.status, InviteStatus::Open);
        assert_eq!(invite.creator_uid, uid(1));
        assert_eq!(invite.creator_name.as_deref(), Some("Ana"));

        let creator = user_storage::get_user(&uid(1)).unwrap();
        assert_eq!(creator.pending_invite_code, Some(created.code));
        assert_eq!(creator.couple_id, None);
    }

    #[test]
    fn create_skips_colliding_codes() {
        setup();
        // Learn the first code the seeded RNG will draw, plant a foreign
        // invite under it, then reseed so create_invite draws it again.
        let occupied = rng::generate_invite_code();
        let second = rng::generate_invite_code();
        invite_storage::insert_invite(&Invite {
            code: occupied.clone(),
            creator_uid: uid(9),
            creator_name: None,
            status: InviteStatus::Open,
            created_at: BASE_NS,
            expires_at: BASE_NS + 1,
            claimed_by_uid: None,
            couple_id: None,
        });
        seed_internal_rng([7u8; 32]);

        let created = create_invite(uid(1), None).unwrap();
        assert_eq!(created.code, second);
        // The planted invite was not touched.
        assert_eq!(get_invite(&occupied).unwrap().creator_uid, uid(9));
    }

    #[test]
    fn create_fails_after_exhausting_attempts() {
        setup();
        // Occupy the first eight draws of the seeded sequence.
        let draws: Vec<String> = (0..MAX_CODE_ATTEMPTS)
            .map(|_| rng::generate_invite_code())
            .collect();
        for code in &draws {
            invite_storage::insert_invite(&Invite {
                code: code.clone(),
                creator_uid: uid(9),
                creator_name: None,
                status: InviteStatus::Open,
                created_at: BASE_NS,
                expires_at: BASE_NS + 1,
                claimed_by_uid: None,
                couple_id: None,
            });
        }
        seed_internal_rng([7u8; 32]);

        let err = create_invite(uid(1), None).unwrap_err();
        assert!(matches!(err, PairError::CodeGenerationFailed(_)));
        // No pending code was written on the caller.
        assert!(user_storage::get_user(&uid(1))
            .map(|u| u.pending_invite_code.is_none())
            .unwrap_or(true));
    }

    #[test]
    fn paired_creator_cannot_create() {
        setup();
        let created = create_invite(uid(1), None).unwrap();
        redeem_invite(uid(2), &created.code).unwrap();

        let err = create_invite(uid(1), None).unwrap_err();
        assert!(matches!(err, PairError::AlreadyPaired(_)));
    }

    #[test]
    fn redeem_forms_couple_atomically() {
        setup();
        let created = create_invite(uid(1), None).unwrap();
        let couple_id = redeem_invite(uid(2), &created.code).unwrap();

        let couple = couple_storage::get_couple(&couple_id).unwrap();
        assert_eq!(couple.members, vec![uid(1), uid(2)]);
        assert_eq!(couple.invite_code, created.code);

        // Both user documents converged in the same call.
        let creator = user_storage::get_user(&uid(1)).unwrap();
        assert_eq!(creator.couple_id, Some(couple_id.clone()));
        assert_eq!(creator.pending_invite_code, None);
        let joiner = user_storage::get_user(&uid(2)).unwrap();
        assert_eq!(joiner.couple_id, Some(couple_id.clone()));

        let invite = get_invite(&created.code).unwrap();
        assert_eq!(invite.status, InviteStatus::Claimed);
        assert_eq!(invite.claimed_by_uid, Some(uid(2)));
        assert_eq!(invite.couple_id, Some(couple_id));
    }

    #[test]
    fn redeem_normalizes_raw_input() {
        setup();
        let created = create_invite(uid(1), None).unwrap();
        let noisy = format!(
            " {}-{} ",
            &created.code[..3],
            &created.code[3..]
        );
        let couple_id = redeem_invite(uid(2), &noisy).unwrap();
        assert!(couple_storage::get_couple(&couple_id).is_some());
    }

    #[test]
    fn malformed_code_rejects_before_lookup() {
        setup();
        assert_eq!(
            redeem_invite(uid(2), "12-34").unwrap_err(),
            PairError::InvalidInput("Invalid code.".to_string())
        );
    }

    #[test]
    fn unknown_code_rejects() {
        setup();
        let err = redeem_invite(uid(2), "000001").unwrap_err();
        assert!(matches!(err, PairError::InviteNotFound(_)));
    }

    #[test]
    fn self_join_rejects() {
        setup();
        let created = create_invite(uid(1), None).unwrap();
        assert_eq!(
            redeem_invite(uid(1), &created.code).unwrap_err(),
            PairError::OwnInviteCode
        );
        // Still open for somebody else.
        assert_eq!(get_invite(&created.code).unwrap().status, InviteStatus::Open);
    }

    #[test]
    fn paired_joiner_rejects() {
        setup();
        let first = create_invite(uid(1), None).unwrap();
        redeem_invite(uid(2), &first.code).unwrap();

        let second = create_invite(uid(3), None).unwrap();
        let err = redeem_invite(uid(2), &second.code).unwrap_err();
        assert!(matches!(err, PairError::AlreadyPaired(_)));
        assert_eq!(get_invite(&second.code).unwrap().status, InviteStatus::Open);
    }

    #[test]
    fn expired_code_materializes_lazily() {
        setup();
        let created = create_invite(uid(1), None).unwrap();
        time::set_now_ns(created.expires_at + 1);

        let err = redeem_invite(uid(2), &created.code).unwrap_err();
        assert!(matches!(err, PairError::InviteExpired(_)));
        // The failed attempt persisted the terminal status.
        assert_eq!(
            get_invite(&created.code).unwrap().status,
            InviteStatus::Expired
        );

        // A second attempt rejects again with no further state change.
        let err = redeem_invite(uid(3), &created.code).unwrap_err();
        assert!(matches!(err, PairError::InviteAlreadyUsed(_)));
        assert_eq!(
            get_invite(&created.code).unwrap().status,
            InviteStatus::Expired
        );
    }

    #[test]
    fn claimed_code_rejects_again_without_state_change() {
        setup();
        let created = create_invite(uid(1), None).unwrap();
        let couple_id = redeem_invite(uid(2), &created.code).unwrap();

        let err = redeem_invite(uid(3), &created.code).unwrap_err();
        assert!(matches!(err, PairError::InviteAlreadyUsed(_)));
        let invite = get_invite(&created.code).unwrap();
        assert_eq!(invite.claimed_by_uid, Some(uid(2)));
        assert_eq!(invite.couple_id, Some(couple_id));
    }

    #[test]
    fn stale_invite_of_repaired_creator_rejects() {
        setup();
        // U1 leaves a code dangling, then pairs through U2's code instead.
        let dangling = create_invite(uid(1), None).unwrap();
        let other = create_invite(uid(2), None).unwrap();
        redeem_invite(uid(1), &other.code).unwrap();

        let err = redeem_invite(uid(3), &dangling.code).unwrap_err();
        assert!(matches!(err, PairError::InviteExpired(_)));
        assert_eq!(
            get_invite(&dangling.code).unwrap().status,
            InviteStatus::Expired
        );
        // U3 remains unpaired and can still pair elsewhere.
        assert!(user_storage::get_user(&uid(3))
            .map(|u| u.couple_id.is_none())
            .unwrap_or(true));
    }
}
