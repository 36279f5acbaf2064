#![forbid(unsafe_code)]

use atelier_contracts::contact::{
    ContactSubmissionId, ContactSubmissionInput, ContactSubmissionRecord,
};
use atelier_contracts::gallery::{Category, GalleryItemId, GalleryItemInput, GalleryItemRecord};
use atelier_contracts::ownership::OWNERSHIP_CONTRACT_VERSION;
use atelier_contracts::{ContractViolation, MonotonicTimeNs, Principal, SchemaVersion, Validate};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("append-only violation on {table}")]
    AppendOnlyViolation { table: &'static str },
    #[error("contract violation: {0}")]
    ContractViolation(#[from] ContractViolation),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerRecord {
    pub schema_version: SchemaVersion,
    pub principal: Principal,
    pub claimed_at: MonotonicTimeNs,
}

impl OwnerRecord {
    pub fn v1(
        principal: Principal,
        claimed_at: MonotonicTimeNs,
    ) -> Result<Self, ContractViolation> {
        let record = Self {
            schema_version: OWNERSHIP_CONTRACT_VERSION,
            principal,
            claimed_at,
        };
        record.validate()?;
        Ok(record)
    }
}

impl Validate for OwnerRecord {
    fn validate(&self) -> Result<(), ContractViolation> {
        self.principal.validate()?;
        if self.principal.is_anonymous() {
            return Err(ContractViolation::InvalidValue {
                field: "owner_record.principal",
                reason: "anonymous principal can never own the store",
            });
        }
        Ok(())
    }
}

/// In-memory tables behind the orders inbox and gallery.
///
/// The owner cell is write-once; both ledgers are append-only and keep
/// insertion order. Callers provide their own synchronization.
#[derive(Debug, Clone)]
pub struct StudioStore {
    owner: Option<OwnerRecord>,

    contact_ledger: Vec<ContactSubmissionRecord>,
    next_contact_submission_id: u64,

    gallery_ledger: Vec<GalleryItemRecord>,
    next_gallery_item_id: u64,
}

impl Default for StudioStore {
    fn default() -> Self {
        Self::new_in_memory()
    }
}

impl StudioStore {
    pub fn new_in_memory() -> Self {
        Self {
            owner: None,
            contact_ledger: Vec::new(),
            next_contact_submission_id: 1,
            gallery_ledger: Vec::new(),
            next_gallery_item_id: 1,
        }
    }

    pub fn owner(&self) -> Option<&OwnerRecord> {
        self.owner.as_ref()
    }

    pub fn owner_principal(&self) -> Option<&Principal> {
        self.owner.as_ref().map(|r| &r.principal)
    }

    pub fn set_owner_once(
        &mut self,
        principal: Principal,
        claimed_at: MonotonicTimeNs,
    ) -> Result<(), StorageError> {
        let record = OwnerRecord::v1(principal, claimed_at)?;
        if self.owner.is_some() {
            return Err(StorageError::AppendOnlyViolation { table: "owner" });
        }
        self.owner = Some(record);
        Ok(())
    }

    pub fn attempt_clear_owner(&mut self) -> Result<(), StorageError> {
        Err(StorageError::AppendOnlyViolation { table: "owner" })
    }

    pub fn append_contact_submission(
        &mut self,
        input: ContactSubmissionInput,
    ) -> Result<ContactSubmissionId, StorageError> {
        input.validate()?;

        let contact_submission_id = ContactSubmissionId(self.next_contact_submission_id);
        let rec = ContactSubmissionRecord::from_input_v1(contact_submission_id, input)?;
        self.next_contact_submission_id = self.next_contact_submission_id.saturating_add(1);
        self.contact_ledger.push(rec);
        Ok(contact_submission_id)
    }

    pub fn contact_submission_rows(&self) -> &[ContactSubmissionRecord] {
        &self.contact_ledger
    }

    pub fn attempt_overwrite_contact_submission(
        &mut self,
        _contact_submission_id: ContactSubmissionId,
    ) -> Result<(), StorageError> {
        Err(StorageError::AppendOnlyViolation {
            table: "contact_ledger",
        })
    }

    pub fn append_gallery_item(
        &mut self,
        input: GalleryItemInput,
    ) -> Result<GalleryItemId, StorageError> {
        input.validate()?;

        let gallery_item_id = GalleryItemId(self.next_gallery_item_id);
        let rec = GalleryItemRecord::from_input_v1(gallery_item_id, input)?;
        self.next_gallery_item_id = self.next_gallery_item_id.saturating_add(1);
        self.gallery_ledger.push(rec);
        Ok(gallery_item_id)
    }

    pub fn gallery_item_rows(&self) -> &[GalleryItemRecord] {
        &self.gallery_ledger
    }

    pub fn gallery_items_by_category(&self, category: Category) -> Vec<&GalleryItemRecord> {
        self.gallery_ledger
            .iter()
            .filter(|row| row.category == category)
            .collect()
    }
}
