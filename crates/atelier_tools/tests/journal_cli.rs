#![forbid(unsafe_code)]

use atelier_adapter::{Journal, StudioRuntime};
use atelier_contracts::Principal;
use atelier_tools::studio_cli::execute_studio_command;

#[test]
fn at_studio_cli_db_01_reads_state_written_by_the_adapter() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("journal.jsonl");
    {
        let rt = StudioRuntime::new_with_journal(Journal::open(&path).unwrap()).unwrap();
        rt.claim_owner(&Principal::new("owner-a").unwrap()).unwrap();
        rt.submit_contact_form(
            "Ben".to_string(),
            "ben@example.com".to_string(),
            "Wedding portrait enquiry.".to_string(),
        )
        .unwrap();
    }

    let rt = StudioRuntime::new_with_journal(Journal::open(&path).unwrap()).unwrap();
    assert_eq!(execute_studio_command(&rt, "owner", None).unwrap(), "owner-a");
    let inbox = execute_studio_command(&rt, "inbox", Some("owner-a")).unwrap();
    assert!(inbox.contains("Ben <ben@example.com>"));
}
