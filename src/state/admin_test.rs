use super::*;
use crate::state::test_helpers::{BrokenStorage, RecordingStorage};

fn admin_over(storage: &Arc<RecordingStorage>) -> AdminSession {
    AdminSession::new(storage.clone(), "isAdminLoggedIn")
}

#[test]
fn flag_must_be_true() {
    assert!(is_well_formed_flag(Some("true")));
    assert!(is_well_formed_flag(Some(" TRUE ")));
    assert!(!is_well_formed_flag(Some("false")));
    assert!(!is_well_formed_flag(Some("1")));
    assert!(!is_well_formed_flag(Some("")));
    assert!(!is_well_formed_flag(None));
}

#[test]
fn sign_in_then_out_round_trips_the_flag() {
    let storage = Arc::new(RecordingStorage::default());
    let admin = admin_over(&storage);
    assert!(!admin.is_signed_in());

    admin.sign_in().unwrap();
    assert!(admin.is_signed_in());
    assert_eq!(storage.value("isAdminLoggedIn").as_deref(), Some("true"));

    admin.sign_out().unwrap();
    assert!(!admin.is_signed_in());
    assert_eq!(storage.value("isAdminLoggedIn"), None);
}

#[test]
fn admin_flag_ignores_customer_tokens() {
    let storage = Arc::new(RecordingStorage::with_entries([("accessToken", "a-1"), ("refreshToken", "r-1")]));
    let admin = admin_over(&storage);
    assert!(!admin.is_signed_in());
    admin.sign_out().unwrap();
    assert_eq!(storage.value("accessToken").as_deref(), Some("a-1"));
}

#[test]
fn unreadable_storage_means_signed_out() {
    let admin = AdminSession::new(Arc::new(BrokenStorage), "isAdminLoggedIn");
    assert!(!admin.is_signed_in());
    assert_eq!(admin.sign_in(), Err(StorageError::Unavailable));
}
