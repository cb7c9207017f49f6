// src/backend/services/couple_service.rs
// Couple reads and the pairing reconciliation a creator's client runs while
// it waits for its code to be claimed.

use crate::{
    error::PairError,
    models::common::{CoupleId, InviteStatus, UserId},
    models::couple::Couple,
    storage::{couples as couple_storage, invites as invite_storage, users as user_storage},
    utils::{guards, logging, time::now_ns},
};

/// What `reconcile_pending_invite` observed and did.
#[derive(Clone, Debug, PartialEq, Eq, candid::CandidType, serde::Deserialize, serde::Serialize)]
pub enum ReconcileOutcome {
    /// No pending code on the user document; nothing to do.
    NoPendingInvite,
    /// `couple_id` was already set; only the stale pending pointer was dropped.
    AlreadyPaired,
    /// The invite was claimed: `couple_id` adopted and the pending code cleared.
    Completed(CoupleId),
    /// The invite is gone or expired; the pending code was cleared.
    Cleared,
    /// The invite is still open; keep watching.
    StillOpen,
}

pub fn get_couple(couple_id: &CoupleId, caller: &UserId) -> Result<Couple, PairError> {
    guards::check_member(couple_id, caller)
}

pub fn set_couple_title(
    caller: UserId,
    couple_id: &CoupleId,
    title: Option<String>,
) -> Result<Couple, PairError> {
    let mut couple = guards::check_member(couple_id, &caller)?;
    couple.title = title.map(|t| t.trim().to_string()).filter(|t| !t.is_empty());
    couple_storage::insert_couple(&couple);
    Ok(couple)
}

/// Applies the pairing state a pending invite has reached onto its
/// creator's own user document.
///
/// Redemption already converges both members atomically, so under normal
/// operation this observes `NoPendingInvite` or drops a stale pointer; it
/// remains the idempotent completion path for user documents written by
/// older client releases. Repeated application of the same observation is
/// a no-op after the first write.
pub fn reconcile_pending_invite(uid: UserId) -> Result<ReconcileOutcome, PairError> {
    let mut user = user_storage::get_user(&uid)
        .ok_or_else(|| PairError::UserNotFound(uid.to_text()))?;

    let Some(code) = user.pending_invite_code.clone() else {
        return Ok(ReconcileOutcome::NoPendingInvite);
    };

    if user.couple_id.is_some() {
        user.pending_invite_code = None;
        user.updated_at = now_ns();
        user_storage::insert_user(&user);
        return Ok(ReconcileOutcome::AlreadyPaired);
    }

    let Some(invite) = invite_storage::get_invite(&code) else {
        // Dangling pointer; the invite document is gone.
        user.pending_invite_code = None;
        user.updated_at = now_ns();
        user_storage::insert_user(&user);
        return Ok(ReconcileOutcome::Cleared);
    };

    match invite.status {
        InviteStatus::Claimed => {
            let couple_id = invite.couple_id.clone().ok_or_else(|| {
                PairError::InternalError(format!(
                    "Claimed invite {} carries no couple id",
                    invite.code
                ))
            })?;
            user.couple_id = Some(couple_id.clone());
            user.pending_invite_code = None;
            user.updated_at = now_ns();
            user_storage::insert_user(&user);
            logging::info(format!(
                "🔗 INFO: User {} reconciled onto couple {}",
                uid, couple_id
            ));
            Ok(ReconcileOutcome::Completed(couple_id))
        }
        InviteStatus::Expired => {
            user.pending_invite_code = None;
            user.updated_at = now_ns();
            user_storage::insert_user(&user);
            Ok(ReconcileOutcome::Cleared)
        }
        // Expiry is materialized by redemption attempts, not here.
        InviteStatus::Open => Ok(ReconcileOutcome::StillOpen),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::invite::Invite;
    use crate::services::invite_service::{create_invite, redeem_invite};
    use crate::utils::{rng::seed_internal_rng, time};
    use candid::Principal;
    use pretty_assertions::assert_eq;

    const BASE_NS: u64 = 1_750_000_000_000_000_000;

    fn uid(n: u8) -> UserId {
        Principal::from_slice(&[n; 4])
    }

    fn setup() {
        seed_internal_rng([3u8; 32]);
        time::set_now_ns(BASE_NS);
    }

    #[test]
    fn reconcile_is_a_noop_after_atomic_redemption() {
        setup();
        let created = create_invite(uid(1), None).unwrap();
        redeem_invite(uid(2), &created.code).unwrap();

        // Redemption already cleared the pending pointer and set couple_id.
        assert_eq!(
            reconcile_pending_invite(uid(1)).unwrap(),
            ReconcileOutcome::NoPendingInvite
        );
    }

    #[test]
    fn reconcile_completes_a_split_write() {
        setup();
        let created = create_invite(uid(1), None).unwrap();
        let couple_id = redeem_invite(uid(2), &created.code).unwrap();

        // Simulate a creator document written by an older client: paired
        // state missing, pending pointer still in place.
        let mut creator = user_storage::get_user(&uid(1)).unwrap();
        creator.couple_id = None;
        creator.pending_invite_code = Some(created.code.clone());
        user_storage::insert_user(&creator);

        assert_eq!(
            reconcile_pending_invite(uid(1)).unwrap(),
            ReconcileOutcome::Completed(couple_id.clone())
        );
        let creator = user_storage::get_user(&uid(1)).unwrap();
        assert_eq!(creator.couple_id, Some(couple_id));
        assert_eq!(creator.pending_invite_code, None);

        // Applying the same observation again changes nothing.
        assert_eq!(
            reconcile_pending_invite(uid(1)).unwrap(),
            ReconcileOutcome::NoPendingInvite
        );
    }

    #[test]
    fn reconcile_keeps_watching_an_open_invite() {
        setup();
        let created = create_invite(uid(1), None).unwrap();
        assert_eq!(
            reconcile_pending_invite(uid(1)).unwrap(),
            ReconcileOutcome::StillOpen
        );
        // The pending pointer survives while the invite is open.
        let creator = user_storage::get_user(&uid(1)).unwrap();
        assert_eq!(creator.pending_invite_code, Some(created.code));
    }

    #[test]
    fn reconcile_clears_an_expired_invite() {
        setup();
        let created = create_invite(uid(1), None).unwrap();
        time::set_now_ns(created.expires_at + 1);
        // Somebody's failed redemption materializes the expiry.
        let _ = redeem_invite(uid(2), &created.code);

        assert_eq!(
            reconcile_pending_invite(uid(1)).unwrap(),
            ReconcileOutcome::Cleared
        );
        let creator = user_storage::get_user(&uid(1)).unwrap();
        assert_eq!(creator.pending_invite_code, None);
        assert_eq!(creator.couple_id, None);
    }

    #[test]
    fn reconcile_drops_stale_pointer_of_paired_user() {
        setup();
        // U1 leaves a code dangling and then pairs as a joiner elsewhere;
        // the dangling pointer survives redemption.
        let dangling = create_invite(uid(1), None).unwrap();
        let other = create_invite(uid(2), None).unwrap();
        redeem_invite(uid(1), &other.code).unwrap();

        let before = user_storage::get_user(&uid(1)).unwrap();
        assert_eq!(before.pending_invite_code, Some(dangling.code.clone()));

        assert_eq!(
            reconcile_pending_invite(uid(1)).unwrap(),
            ReconcileOutcome::AlreadyPaired
        );
        let after = user_storage::get_user(&uid(1)).unwrap();
        assert_eq!(after.pending_invite_code, None);
        assert!(after.couple_id.is_some());

        // The dangling invite itself is untouched until redemption
        // or lazy expiry observes it.
        let invite: Invite = invite_storage::get_invite(&dangling.code).unwrap();
        assert_eq!(invite.status, InviteStatus::Open);
    }

    #[test]
    fn couple_reads_are_member_guarded() {
        setup();
        let created = create_invite(uid(1), None).unwrap();
        let couple_id = redeem_invite(uid(2), &created.code).unwrap();

        assert!(get_couple(&couple_id, &uid(1)).is_ok());
        assert!(matches!(
            get_couple(&couple_id, &uid(9)).unwrap_err(),
            PairError::NotAuthorized(_)
        ));
    }

    #[test]
    fn title_trims_and_clears() {
        setup();
        let created = create_invite(uid(1), None).unwrap();
        let couple_id = redeem_invite(uid(2), &created.code).unwrap();

        let couple = set_couple_title(uid(2), &couple_id, Some(" Us ".into())).unwrap();
        assert_eq!(couple.title.as_deref(), Some("Us"));
        let couple = set_couple_title(uid(1), &couple_id, None).unwrap();
        assert_eq!(couple.title, None);
    }
}
