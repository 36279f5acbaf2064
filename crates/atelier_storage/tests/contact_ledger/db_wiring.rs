#![forbid(unsafe_code)]

use atelier_contracts::contact::{ContactSubmissionId, ContactSubmissionInput};
use atelier_contracts::{MonotonicTimeNs, Principal};
use atelier_storage::repo::{ContactSubmissionRepo, OwnershipRepo};
use atelier_storage::store::{StorageError, StudioStore};

fn submission(name: &str, at: u64) -> ContactSubmissionInput {
    ContactSubmissionInput::v1(
        name.to_string(),
        format!("{}@example.com", name.to_ascii_lowercase()),
        "Would love a charcoal portrait from a photo.".to_string(),
        MonotonicTimeNs(at),
    )
    .unwrap()
}

#[test]
fn at_contact_db_01_append_assigns_sequential_ids_and_keeps_order() {
    let mut s = StudioStore::new_in_memory();
    let a = s.append_contact_submission_row(submission("Meera", 30)).unwrap();
    let b = s.append_contact_submission_row(submission("Kabir", 20)).unwrap();
    assert_eq!(a, ContactSubmissionId(1));
    assert_eq!(b, ContactSubmissionId(2));

    let rows = s.contact_submission_rows();
    assert_eq!(rows.len(), 2);
    // Ledger order is append order, not timestamp order.
    assert_eq!(rows[0].name, "Meera");
    assert_eq!(rows[1].name, "Kabir");
    assert_eq!(rows[1].submitted_at, MonotonicTimeNs(20));
}

#[test]
fn at_contact_db_02_append_independent_of_owner_state() {
    let mut unclaimed = StudioStore::new_in_memory();
    let mut claimed = StudioStore::new_in_memory();
    claimed
        .set_owner_once_row(Principal::new("owner-a").unwrap(), MonotonicTimeNs(1))
        .unwrap();

    let a = unclaimed
        .append_contact_submission_row(submission("Meera", 5))
        .unwrap();
    let b = claimed
        .append_contact_submission_row(submission("Meera", 5))
        .unwrap();
    assert_eq!(a, b);
    assert_eq!(
        unclaimed.contact_submission_rows()[0].message,
        claimed.contact_submission_rows()[0].message
    );
}

#[test]
fn at_contact_db_03_invalid_input_rejected_before_write() {
    let mut s = StudioStore::new_in_memory();
    let mut bad = submission("Meera", 5);
    bad.email = "   ".to_string();
    assert!(matches!(
        s.append_contact_submission_row(bad),
        Err(StorageError::ContractViolation(_))
    ));
    assert!(s.contact_submission_rows().is_empty());

    // The failed write does not consume an id.
    let id = s.append_contact_submission_row(submission("Meera", 6)).unwrap();
    assert_eq!(id, ContactSubmissionId(1));
}

#[test]
fn at_contact_db_04_rows_are_append_only() {
    let mut s = StudioStore::new_in_memory();
    let id = s.append_contact_submission_row(submission("Meera", 5)).unwrap();
    assert_eq!(
        s.attempt_overwrite_contact_submission_row(id),
        Err(StorageError::AppendOnlyViolation {
            table: "contact_ledger"
        })
    );
}
