use profile_sweeper::deletion::{remove_all, DeletionOutcome};
use profile_sweeper::profiles::ProfileEntry;
use profile_sweeper::registry::memory::InMemoryStore;
use profile_sweeper::registry::KeyHandle;

const LIST: &str = r"HKLM\SOFTWARE\Test\ProfileList";
const GUIDS: &str = r"HKLM\SOFTWARE\Test\ProfileGuid";

fn entry(identity: &str, correlation_id: Option<&str>) -> ProfileEntry {
    ProfileEntry {
        identity: identity.to_string(),
        image_path: r"C:\Users\bob".to_string(),
        correlation_id: correlation_id.map(str::to_string),
        location: KeyHandle::from_path(&format!(r"{}\{}", LIST, identity)),
    }
}

fn store_with_profile(identity: &str, guid: Option<&str>) -> InMemoryStore {
    let store = InMemoryStore::new();
    store.add_key(LIST, &[]);
    store.add_key(GUIDS, &[]);
    store.add_key(&format!(r"{}\{}", LIST, identity), &[]);
    if let Some(guid) = guid {
        store.add_key(&format!(r"{}\{}", GUIDS, guid), &[]);
    }
    store
}

#[test]
fn test_removes_primary_and_existing_secondary() {
    let sid = "S-1-5-21-4444444444-5555555555-6666666666-1001";
    let guid = "{0f0f0f0f-1111-2222-3333-444444444444}";
    let store = store_with_profile(sid, Some(guid));

    let outcomes = remove_all(&store, vec![entry(sid, Some(guid))], GUIDS);

    assert_eq!(outcomes.len(), 1);
    assert!(matches!(
        outcomes[0],
        DeletionOutcome::Removed {
            secondary_removed: true,
            ..
        }
    ));
    assert!(!store.contains(&format!(r"{}\{}", LIST, sid)));
    assert!(!store.contains(&format!(r"{}\{}", GUIDS, guid)));
    assert_eq!(
        store.delete_log(),
        vec![
            format!(r"{}\{}", LIST, sid),
            format!(r"{}\{}", GUIDS, guid),
        ]
    );
}

#[test]
fn test_missing_secondary_is_not_an_error() {
    let sid = "S-1-5-21-4444444444-5555555555-6666666666-1001";
    let guid = "{0f0f0f0f-1111-2222-3333-444444444444}";
    let store = store_with_profile(sid, None);

    let outcomes = remove_all(&store, vec![entry(sid, Some(guid))], GUIDS);

    assert!(matches!(
        outcomes[0],
        DeletionOutcome::Removed {
            secondary_removed: false,
            ..
        }
    ));
    // Existence was checked and found nothing, so only the primary delete ran
    assert_eq!(store.delete_log(), vec![format!(r"{}\{}", LIST, sid)]);
}

#[test]
fn test_no_correlation_id_skips_secondary() {
    let sid = "S-1-5-21-4444444444-5555555555-6666666666-1001";
    let store = store_with_profile(sid, None);

    let outcomes = remove_all(&store, vec![entry(sid, None)], GUIDS);

    assert!(matches!(
        outcomes[0],
        DeletionOutcome::Removed {
            secondary_removed: false,
            ..
        }
    ));
    assert_eq!(store.delete_log(), vec![format!(r"{}\{}", LIST, sid)]);
}

#[test]
fn test_empty_correlation_id_skips_secondary() {
    let sid = "S-1-5-21-4444444444-5555555555-6666666666-1001";
    let store = store_with_profile(sid, None);

    let outcomes = remove_all(&store, vec![entry(sid, Some(""))], GUIDS);

    assert!(matches!(
        outcomes[0],
        DeletionOutcome::Removed {
            secondary_removed: false,
            ..
        }
    ));
    assert_eq!(store.delete_log(), vec![format!(r"{}\{}", LIST, sid)]);
}

#[test]
fn test_failed_entry_does_not_stop_the_batch() {
    let first = "S-1-5-21-4444444444-5555555555-6666666666-1001";
    let second = "S-1-5-21-4444444444-5555555555-6666666666-1002";
    let store = InMemoryStore::new();
    store.add_key(LIST, &[]);
    store.add_key(GUIDS, &[]);
    store.add_key(&format!(r"{}\{}", LIST, first), &[]);
    store.add_key(&format!(r"{}\{}", LIST, second), &[]);
    store.fail_delete_on(&format!(r"{}\{}", LIST, first));

    let outcomes = remove_all(&store, vec![entry(first, None), entry(second, None)], GUIDS);

    assert_eq!(outcomes.len(), 2);
    assert!(matches!(outcomes[0], DeletionOutcome::Failed { .. }));
    assert!(matches!(outcomes[1], DeletionOutcome::Removed { .. }));
    assert!(store.contains(&format!(r"{}\{}", LIST, first)));
    assert!(!store.contains(&format!(r"{}\{}", LIST, second)));
}

#[test]
fn test_secondary_failure_marks_entry_failed() {
    let sid = "S-1-5-21-4444444444-5555555555-6666666666-1001";
    let guid = "{0f0f0f0f-1111-2222-3333-444444444444}";
    let store = store_with_profile(sid, Some(guid));
    store.fail_delete_on(&format!(r"{}\{}", GUIDS, guid));

    let outcomes = remove_all(&store, vec![entry(sid, Some(guid))], GUIDS);

    assert!(matches!(outcomes[0], DeletionOutcome::Failed { .. }));
    // The primary delete already happened; there is no rollback
    assert!(!store.contains(&format!(r"{}\{}", LIST, sid)));
    assert!(store.contains(&format!(r"{}\{}", GUIDS, guid)));
}

#[test]
fn test_failed_outcome_carries_the_entry() {
    let sid = "S-1-5-21-4444444444-5555555555-6666666666-1001";
    let store = store_with_profile(sid, None);
    store.fail_delete_on(&format!(r"{}\{}", LIST, sid));

    let outcomes = remove_all(&store, vec![entry(sid, None)], GUIDS);

    match &outcomes[0] {
        DeletionOutcome::Failed { entry, cause } => {
            assert_eq!(entry.identity, sid);
            assert!(cause.to_string().contains("access denied"));
        }
        other => panic!("expected Failed outcome, got {:?}", other),
    }
}
