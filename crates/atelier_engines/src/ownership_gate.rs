#![forbid(unsafe_code)]

use atelier_contracts::ownership::{ClaimDecision, OwnershipRefusal, ReadDecision};
use atelier_contracts::{Principal, ReasonCodeId};

pub mod reason_codes {
    use atelier_contracts::ReasonCodeId;

    // Ownership gate reason-code namespace ("OW").
    pub const OWNER_CLAIM_ACCEPTED: ReasonCodeId = ReasonCodeId(0x4F57_0001);
    pub const OWNER_READ_AUTHORIZED: ReasonCodeId = ReasonCodeId(0x4F57_0002);

    pub const OWNER_CALLER_UNAUTHENTICATED: ReasonCodeId = ReasonCodeId(0x4F57_0010);
    pub const OWNER_ALREADY_CLAIMED: ReasonCodeId = ReasonCodeId(0x4F57_0011);
    pub const OWNER_CALLER_NOT_OWNER: ReasonCodeId = ReasonCodeId(0x4F57_0012);
    pub const OWNER_NOT_SET: ReasonCodeId = ReasonCodeId(0x4F57_0013);
}

/// Stateless decision logic for the single-owner bootstrap.
///
/// Callers hand in the owner snapshot they hold under their own lock; the
/// gate never reads or writes state itself, so the atomicity of
/// check-then-set belongs to whoever owns the cell.
#[derive(Debug, Clone, Copy, Default)]
pub struct OwnershipGate;

impl OwnershipGate {
    pub fn new() -> Self {
        Self
    }

    pub fn evaluate_claim(
        &self,
        caller: &Principal,
        current_owner: Option<&Principal>,
    ) -> ClaimDecision {
        if caller.is_anonymous() {
            return ClaimDecision::Refuse(OwnershipRefusal::Unauthenticated);
        }
        // The sitting owner gets no bypass here.
        if let Some(owner) = current_owner {
            return ClaimDecision::Refuse(OwnershipRefusal::AlreadyClaimed {
                owner: owner.clone(),
            });
        }
        ClaimDecision::Accept {
            owner: caller.clone(),
        }
    }

    /// Anyone other than the recorded owner, anonymous included, is `NotOwner`.
    pub fn evaluate_submissions_read(
        &self,
        caller: &Principal,
        current_owner: Option<&Principal>,
    ) -> ReadDecision {
        match current_owner {
            None => ReadDecision::Denied(OwnershipRefusal::NoOwnerYet),
            Some(owner) if caller == owner => ReadDecision::Authorized,
            Some(_) => ReadDecision::Denied(OwnershipRefusal::NotOwner),
        }
    }
}

pub fn reason_code_for_refusal(refusal: &OwnershipRefusal) -> ReasonCodeId {
    match refusal {
        OwnershipRefusal::Unauthenticated => reason_codes::OWNER_CALLER_UNAUTHENTICATED,
        OwnershipRefusal::AlreadyClaimed { .. } => reason_codes::OWNER_ALREADY_CLAIMED,
        OwnershipRefusal::NotOwner => reason_codes::OWNER_CALLER_NOT_OWNER,
        OwnershipRefusal::NoOwnerYet => reason_codes::OWNER_NOT_SET,
    }
}

pub fn reason_code_for_claim(decision: &ClaimDecision) -> ReasonCodeId {
    match decision {
        ClaimDecision::Accept { .. } => reason_codes::OWNER_CLAIM_ACCEPTED,
        ClaimDecision::Refuse(refusal) => reason_code_for_refusal(refusal),
    }
}

pub fn reason_code_for_read(decision: &ReadDecision) -> ReasonCodeId {
    match decision {
        ReadDecision::Authorized => reason_codes::OWNER_READ_AUTHORIZED,
        ReadDecision::Denied(refusal) => reason_code_for_refusal(refusal),
    }
}
