#![forbid(unsafe_code)]

use crate::{ContractViolation, Validate};

/// Textual form of the principal the identity layer hands out for
/// unauthenticated callers.
pub const ANONYMOUS_PRINCIPAL_TEXT: &str = "2vxsx-fae";

pub const PRINCIPAL_MAX_LEN: usize = 128;

/// Opaque caller identity supplied by the identity layer.
///
/// The core never interprets a principal beyond equality; validation only
/// guarantees the text can be carried in a header or journal line intact.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Principal(String);

impl Principal {
    pub fn new(id: impl Into<String>) -> Result<Self, ContractViolation> {
        let v = Self(id.into());
        v.validate()?;
        Ok(v)
    }

    pub fn anonymous() -> Self {
        Self(ANONYMOUS_PRINCIPAL_TEXT.to_string())
    }

    pub fn is_anonymous(&self) -> bool {
        self.0 == ANONYMOUS_PRINCIPAL_TEXT
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Validate for Principal {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.0.is_empty() {
            return Err(ContractViolation::InvalidValue {
                field: "principal",
                reason: "must not be empty",
            });
        }
        if self.0.len() > PRINCIPAL_MAX_LEN {
            return Err(ContractViolation::InvalidValue {
                field: "principal",
                reason: "must be <= 128 chars",
            });
        }
        if !self.0.bytes().all(|b| b.is_ascii_graphic()) {
            return Err(ContractViolation::InvalidValue {
                field: "principal",
                reason: "must be printable ASCII without whitespace",
            });
        }
        Ok(())
    }
}

impl std::fmt::Display for Principal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
