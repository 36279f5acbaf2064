#![forbid(unsafe_code)]

use crate::common::validate_text;
use crate::{ContractViolation, MonotonicTimeNs, SchemaVersion, Validate};

pub const CONTACT_CONTRACT_VERSION: SchemaVersion = SchemaVersion(1);

pub const CONTACT_NAME_MAX_LEN: usize = 128;
pub const CONTACT_EMAIL_MAX_LEN: usize = 254;
pub const CONTACT_MESSAGE_MAX_LEN: usize = 4_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContactSubmissionId(pub u64);

/// A public contact-form write. Carries no caller identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmissionInput {
    pub schema_version: SchemaVersion,
    pub name: String,
    pub email: String,
    pub message: String,
    pub submitted_at: MonotonicTimeNs,
}

impl ContactSubmissionInput {
    pub fn v1(
        name: String,
        email: String,
        message: String,
        submitted_at: MonotonicTimeNs,
    ) -> Result<Self, ContractViolation> {
        let input = Self {
            schema_version: CONTACT_CONTRACT_VERSION,
            name,
            email,
            message,
            submitted_at,
        };
        input.validate()?;
        Ok(input)
    }
}

impl Validate for ContactSubmissionInput {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.schema_version != CONTACT_CONTRACT_VERSION {
            return Err(ContractViolation::InvalidValue {
                field: "contact_submission_input.schema_version",
                reason: "must match CONTACT_CONTRACT_VERSION",
            });
        }
        validate_text(
            "contact_submission_input.name",
            &self.name,
            CONTACT_NAME_MAX_LEN,
        )?;
        validate_text(
            "contact_submission_input.email",
            &self.email,
            CONTACT_EMAIL_MAX_LEN,
        )?;
        validate_text(
            "contact_submission_input.message",
            &self.message,
            CONTACT_MESSAGE_MAX_LEN,
        )?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmissionRecord {
    pub schema_version: SchemaVersion,
    pub contact_submission_id: ContactSubmissionId,
    pub name: String,
    pub email: String,
    pub message: String,
    pub submitted_at: MonotonicTimeNs,
}

impl ContactSubmissionRecord {
    pub fn from_input_v1(
        contact_submission_id: ContactSubmissionId,
        input: ContactSubmissionInput,
    ) -> Result<Self, ContractViolation> {
        input.validate()?;
        Ok(Self {
            schema_version: CONTACT_CONTRACT_VERSION,
            contact_submission_id,
            name: input.name,
            email: input.email,
            message: input.message,
            submitted_at: input.submitted_at,
        })
    }
}
