#![forbid(unsafe_code)]

use atelier_contracts::ownership::OwnershipRefusal;
use atelier_contracts::ContractViolation;
use atelier_engines::ownership_gate::reason_code_for_refusal;
use atelier_storage::store::StorageError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error(transparent)]
    Ownership(#[from] OwnershipRefusal),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("journal error: {0}")]
    Journal(String),
}

impl From<ContractViolation> for AdapterError {
    fn from(v: ContractViolation) -> Self {
        AdapterError::InvalidInput(v.to_string())
    }
}

impl AdapterError {
    /// - Unauthenticated: 401
    /// - NotOwner / NoOwnerYet: 403, told apart by `outcome`
    /// - AlreadyClaimed: 409
    /// - Invalid input: 400
    /// - Storage / journal: 500
    pub fn status_code(&self) -> StatusCode {
        match self {
            AdapterError::Ownership(OwnershipRefusal::Unauthenticated) => StatusCode::UNAUTHORIZED,
            AdapterError::Ownership(OwnershipRefusal::NotOwner)
            | AdapterError::Ownership(OwnershipRefusal::NoOwnerYet) => StatusCode::FORBIDDEN,
            AdapterError::Ownership(OwnershipRefusal::AlreadyClaimed { .. }) => {
                StatusCode::CONFLICT
            }
            AdapterError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AdapterError::Storage(_) | AdapterError::Journal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn outcome_label(&self) -> &'static str {
        match self {
            AdapterError::Ownership(refusal) => refusal.outcome_label(),
            AdapterError::InvalidInput(_) => "REJECTED",
            AdapterError::Storage(_) | AdapterError::Journal(_) => "INTERNAL_ERROR",
        }
    }

    fn client_reason(&self) -> String {
        match self {
            AdapterError::Storage(_) | AdapterError::Journal(_) => "internal error".to_string(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AdapterErrorResponse {
    pub status: String,
    pub outcome: String,
    pub reason: Option<String>,
    pub reason_code: Option<String>,
    pub owner: Option<String>,
}

impl From<&AdapterError> for AdapterErrorResponse {
    fn from(err: &AdapterError) -> Self {
        let (reason_code, owner) = match err {
            AdapterError::Ownership(refusal) => {
                let owner = match refusal {
                    OwnershipRefusal::AlreadyClaimed { owner } => Some(owner.to_string()),
                    _ => None,
                };
                (Some(reason_code_for_refusal(refusal).to_string()), owner)
            }
            _ => (None, None),
        };
        AdapterErrorResponse {
            status: "error".to_string(),
            outcome: err.outcome_label().to_string(),
            reason: Some(err.client_reason()),
            reason_code,
            owner,
        }
    }
}

impl IntoResponse for AdapterError {
    fn into_response(self) -> Response {
        if matches!(self, AdapterError::Storage(_) | AdapterError::Journal(_)) {
            tracing::error!(error = %self, "adapter request failed");
        }
        let status = self.status_code();
        (status, Json(AdapterErrorResponse::from(&self))).into_response()
    }
}

impl From<AdapterError> for tonic::Status {
    fn from(err: AdapterError) -> Self {
        let reason = err.client_reason();
        match err {
            AdapterError::Ownership(OwnershipRefusal::Unauthenticated) => {
                tonic::Status::unauthenticated(reason)
            }
            AdapterError::Ownership(OwnershipRefusal::NotOwner) => {
                tonic::Status::permission_denied(reason)
            }
            AdapterError::Ownership(OwnershipRefusal::NoOwnerYet) => {
                tonic::Status::failed_precondition(reason)
            }
            AdapterError::Ownership(OwnershipRefusal::AlreadyClaimed { .. }) => {
                tonic::Status::already_exists(reason)
            }
            AdapterError::InvalidInput(_) => tonic::Status::invalid_argument(reason),
            AdapterError::Storage(_) | AdapterError::Journal(_) => {
                tracing::error!(error = %err, "adapter rpc failed");
                tonic::Status::internal(reason)
            }
        }
    }
}
