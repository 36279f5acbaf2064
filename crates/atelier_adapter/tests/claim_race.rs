#![forbid(unsafe_code)]

use std::sync::{Arc, Barrier};
use std::thread;

use atelier_adapter::{AdapterError, StudioRuntime};
use atelier_contracts::ownership::OwnershipRefusal;
use atelier_contracts::Principal;

fn race(contenders: usize) -> (StudioRuntime, Vec<Result<Principal, AdapterError>>) {
    let runtime = StudioRuntime::default();
    let barrier = Arc::new(Barrier::new(contenders));
    let handles: Vec<_> = (0..contenders)
        .map(|i| {
            let runtime = runtime.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                let caller = Principal::new(format!("artist-{i}")).unwrap();
                barrier.wait();
                runtime.claim_owner(&caller)
            })
        })
        .collect();
    let results = handles.into_iter().map(|h| h.join().unwrap()).collect();
    (runtime, results)
}

#[test]
fn at_claim_race_01_two_concurrent_claims_have_exactly_one_winner() {
    for _ in 0..50 {
        let (runtime, results) = race(2);
        let winners: Vec<&Principal> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
        assert_eq!(winners.len(), 1);
        let winner = winners[0].clone();
        assert_eq!(runtime.get_owner(), Some(winner.clone()));

        for result in &results {
            if let Err(err) = result {
                assert!(matches!(
                    err,
                    AdapterError::Ownership(OwnershipRefusal::AlreadyClaimed { owner }) if *owner == winner
                ));
            }
        }
    }
}

#[test]
fn at_claim_race_02_many_contenders_one_owner() {
    let (runtime, results) = race(16);
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(runtime.get_owner().is_some());
}
