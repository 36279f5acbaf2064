#![forbid(unsafe_code)]

use atelier_contracts::{ContractViolation, MonotonicTimeNs, Principal};
use atelier_storage::repo::OwnershipRepo;
use atelier_storage::store::{StorageError, StudioStore};

fn principal(id: &str) -> Principal {
    Principal::new(id).unwrap()
}

#[test]
fn at_owner_db_01_first_write_sets_owner() {
    let mut s = StudioStore::new_in_memory();
    assert!(s.owner_row().is_none());

    s.set_owner_once_row(principal("rdmx6-jaaaa-aaaaa-aaadq-cai"), MonotonicTimeNs(10))
        .unwrap();

    let row = s.owner_row().unwrap();
    assert_eq!(row.principal.as_str(), "rdmx6-jaaaa-aaaaa-aaadq-cai");
    assert_eq!(row.claimed_at, MonotonicTimeNs(10));
    assert_eq!(
        s.owner_principal(),
        Some(&principal("rdmx6-jaaaa-aaaaa-aaadq-cai"))
    );
}

#[test]
fn at_owner_db_02_second_write_is_append_only_violation() {
    let mut s = StudioStore::new_in_memory();
    s.set_owner_once_row(principal("owner-a"), MonotonicTimeNs(10))
        .unwrap();

    for (who, at) in [("owner-b", 11), ("owner-a", 12)] {
        let err = s
            .set_owner_once_row(principal(who), MonotonicTimeNs(at))
            .unwrap_err();
        assert_eq!(err, StorageError::AppendOnlyViolation { table: "owner" });
    }

    let row = s.owner_row().unwrap();
    assert_eq!(row.principal, principal("owner-a"));
    assert_eq!(row.claimed_at, MonotonicTimeNs(10));
}

#[test]
fn at_owner_db_03_anonymous_never_stored() {
    let mut s = StudioStore::new_in_memory();
    let err = s
        .set_owner_once_row(Principal::anonymous(), MonotonicTimeNs(1))
        .unwrap_err();
    assert!(matches!(
        err,
        StorageError::ContractViolation(ContractViolation::InvalidValue {
            field: "owner_record.principal",
            ..
        })
    ));
    assert!(s.owner_row().is_none());
}

#[test]
fn at_owner_db_04_owner_cannot_be_cleared() {
    let mut s = StudioStore::new_in_memory();
    s.set_owner_once_row(principal("owner-a"), MonotonicTimeNs(1))
        .unwrap();
    assert_eq!(
        s.attempt_clear_owner_row(),
        Err(StorageError::AppendOnlyViolation { table: "owner" })
    );
    assert!(s.owner_row().is_some());
}
