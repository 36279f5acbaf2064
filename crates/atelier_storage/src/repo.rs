#![forbid(unsafe_code)]

use atelier_contracts::contact::{
    ContactSubmissionId, ContactSubmissionInput, ContactSubmissionRecord,
};
use atelier_contracts::gallery::{Category, GalleryItemId, GalleryItemInput, GalleryItemRecord};
use atelier_contracts::{MonotonicTimeNs, Principal};

use crate::store::{OwnerRecord, StorageError, StudioStore};

/// Typed repository interface for the write-once owner cell.
pub trait OwnershipRepo {
    fn owner_row(&self) -> Option<&OwnerRecord>;
    fn set_owner_once_row(
        &mut self,
        principal: Principal,
        claimed_at: MonotonicTimeNs,
    ) -> Result<(), StorageError>;
    fn attempt_clear_owner_row(&mut self) -> Result<(), StorageError>;
}

/// Typed repository interface for the public contact-form ledger.
pub trait ContactSubmissionRepo {
    fn append_contact_submission_row(
        &mut self,
        input: ContactSubmissionInput,
    ) -> Result<ContactSubmissionId, StorageError>;
    fn contact_submission_rows(&self) -> &[ContactSubmissionRecord];
    fn attempt_overwrite_contact_submission_row(
        &mut self,
        contact_submission_id: ContactSubmissionId,
    ) -> Result<(), StorageError>;
}

/// Typed repository interface for portfolio gallery rows.
pub trait GalleryRepo {
    fn append_gallery_item_row(
        &mut self,
        input: GalleryItemInput,
    ) -> Result<GalleryItemId, StorageError>;
    fn gallery_item_rows(&self) -> &[GalleryItemRecord];
    fn gallery_item_rows_by_category(&self, category: Category) -> Vec<&GalleryItemRecord>;
}

impl OwnershipRepo for StudioStore {
    fn owner_row(&self) -> Option<&OwnerRecord> {
        self.owner()
    }

    fn set_owner_once_row(
        &mut self,
        principal: Principal,
        claimed_at: MonotonicTimeNs,
    ) -> Result<(), StorageError> {
        self.set_owner_once(principal, claimed_at)
    }

    fn attempt_clear_owner_row(&mut self) -> Result<(), StorageError> {
        self.attempt_clear_owner()
    }
}

impl ContactSubmissionRepo for StudioStore {
    fn append_contact_submission_row(
        &mut self,
        input: ContactSubmissionInput,
    ) -> Result<ContactSubmissionId, StorageError> {
        self.append_contact_submission(input)
    }

    fn contact_submission_rows(&self) -> &[ContactSubmissionRecord] {
        StudioStore::contact_submission_rows(self)
    }

    fn attempt_overwrite_contact_submission_row(
        &mut self,
        contact_submission_id: ContactSubmissionId,
    ) -> Result<(), StorageError> {
        self.attempt_overwrite_contact_submission(contact_submission_id)
    }
}

impl GalleryRepo for StudioStore {
    fn append_gallery_item_row(
        &mut self,
        input: GalleryItemInput,
    ) -> Result<GalleryItemId, StorageError> {
        self.append_gallery_item(input)
    }

    fn gallery_item_rows(&self) -> &[GalleryItemRecord] {
        StudioStore::gallery_item_rows(self)
    }

    fn gallery_item_rows_by_category(&self, category: Category) -> Vec<&GalleryItemRecord> {
        self.gallery_items_by_category(category)
    }
}
