#![forbid(unsafe_code)]

pub mod common;
pub mod contact;
pub mod gallery;
pub mod ownership;
pub mod principal;

pub use common::{ContractViolation, MonotonicTimeNs, ReasonCodeId, SchemaVersion, Validate};
pub use principal::Principal;
