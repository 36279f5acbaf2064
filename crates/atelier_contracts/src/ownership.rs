#![forbid(unsafe_code)]

use thiserror::Error;

use crate::{Principal, SchemaVersion};

pub const OWNERSHIP_CONTRACT_VERSION: SchemaVersion = SchemaVersion(1);

/// Lifecycle of the single owner cell. `Claimed` is terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnerState {
    Unclaimed,
    Claimed(Principal),
}

impl OwnerState {
    pub fn from_owner(owner: Option<&Principal>) -> Self {
        match owner {
            Some(p) => OwnerState::Claimed(p.clone()),
            None => OwnerState::Unclaimed,
        }
    }

    pub fn owner(&self) -> Option<&Principal> {
        match self {
            OwnerState::Unclaimed => None,
            OwnerState::Claimed(p) => Some(p),
        }
    }

    pub fn is_claimed(&self) -> bool {
        matches!(self, OwnerState::Claimed(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OwnershipRefusal {
    /// The anonymous sentinel attempted a privileged operation.
    #[error("caller is not authenticated")]
    Unauthenticated,
    /// An owner already exists; this is informational for callers, which
    /// should re-read the owner and continue in read mode.
    #[error("ownership already claimed by {owner}")]
    AlreadyClaimed { owner: Principal },
    #[error("caller is not the owner")]
    NotOwner,
    #[error("no owner set yet")]
    NoOwnerYet,
}

impl OwnershipRefusal {
    pub fn outcome_label(&self) -> &'static str {
        match self {
            OwnershipRefusal::Unauthenticated => "UNAUTHENTICATED",
            OwnershipRefusal::AlreadyClaimed { .. } => "ALREADY_CLAIMED",
            OwnershipRefusal::NotOwner => "NOT_OWNER",
            OwnershipRefusal::NoOwnerYet => "NO_OWNER_YET",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimDecision {
    Accept { owner: Principal },
    Refuse(OwnershipRefusal),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadDecision {
    Authorized,
    Denied(OwnershipRefusal),
}

impl ReadDecision {
    pub fn is_authorized(&self) -> bool {
        matches!(self, ReadDecision::Authorized)
    }

    pub fn into_result(self) -> Result<(), OwnershipRefusal> {
        match self {
            ReadDecision::Authorized => Ok(()),
            ReadDecision::Denied(refusal) => Err(refusal),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_state_tracks_option() {
        let p = Principal::new("owner-1").unwrap();
        assert_eq!(OwnerState::from_owner(None), OwnerState::Unclaimed);
        let claimed = OwnerState::from_owner(Some(&p));
        assert!(claimed.is_claimed());
        assert_eq!(claimed.owner(), Some(&p));
    }

    #[test]
    fn denied_read_surfaces_refusal() {
        assert_eq!(ReadDecision::Authorized.into_result(), Ok(()));
        assert_eq!(
            ReadDecision::Denied(OwnershipRefusal::NoOwnerYet).into_result(),
            Err(OwnershipRefusal::NoOwnerYet)
        );
        assert_eq!(OwnershipRefusal::NotOwner.outcome_label(), "NOT_OWNER");
    }
}
