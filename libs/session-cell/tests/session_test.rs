use std::sync::Arc;

use session_cell::{FileStorage, MemoryStorage, Session, SessionStorage, SessionStore, IDENTITY_KEY, TOKEN_KEY};
use shared_api::TokenSource;
use shared_models::auth::Role;
use shared_utils::test_utils::{JwtTestUtils, TestIdentity};

fn assert_pairing(session: &Session) {
    assert_eq!(session.identity().is_some(), session.token().is_some());
}

#[test]
fn test_session_fields_always_paired() {
    let store = SessionStore::in_memory();
    let user = TestIdentity::patient("a@b.com");

    assert_pairing(&store.snapshot());
    store.login(user.to_identity(), JwtTestUtils::create_test_token(&user, Some(1)));
    assert_pairing(&store.snapshot());
    assert!(store.is_authenticated());

    store.login(user.to_identity(), "   ".to_string());
    assert_pairing(&store.snapshot());

    store.logout();
    assert_pairing(&store.snapshot());
    store.restore();
    assert_pairing(&store.snapshot());
}

#[test]
fn test_login_then_reload_restores_identical_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let user = TestIdentity::patient("a@b.com");
    let token = JwtTestUtils::create_test_token(&user, Some(4));

    let first = SessionStore::new(Arc::new(FileStorage::new(&path)));
    first.login(user.to_identity(), token.clone());
    drop(first);

    let reloaded = SessionStore::restored(Arc::new(FileStorage::new(&path)));
    let session = reloaded.snapshot();

    assert_eq!(session.identity(), Some(&user.to_identity()));
    assert_eq!(session.token(), Some(token.as_str()));
    assert_eq!(session.role(), Some(Role::Patient));
}

#[test]
fn test_restore_with_only_token_is_logged_out_and_cleared() {
    let storage = Arc::new(MemoryStorage::new());
    storage.set(TOKEN_KEY, "orphan-token").unwrap();

    let store = SessionStore::new(storage.clone());
    let session = store.restore();

    assert!(!session.is_authenticated());
    assert!(!store.is_authenticated());
    assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
}

#[test]
fn test_restore_with_only_identity_is_logged_out_and_cleared() {
    let storage = Arc::new(MemoryStorage::new());
    let user = TestIdentity::doctor("doc@example.com");
    storage.set(IDENTITY_KEY, &user.to_json().to_string()).unwrap();

    let store = SessionStore::restored(storage.clone());

    assert!(store.identity().is_none());
    assert!(store.token().is_none());
    assert_eq!(storage.get(IDENTITY_KEY).unwrap(), None);
}

#[test]
fn test_restore_rejects_unreadable_identity() {
    let storage = Arc::new(MemoryStorage::new());
    storage.set(TOKEN_KEY, "opaque").unwrap();
    storage.set(IDENTITY_KEY, "{\"id\": 42}").unwrap();

    let store = SessionStore::restored(storage.clone());

    assert!(!store.is_authenticated());
    assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
}

#[test]
fn test_restore_drops_expired_jwt() {
    let storage = Arc::new(MemoryStorage::new());
    let user = TestIdentity::patient("late@example.com");
    storage.set(TOKEN_KEY, &JwtTestUtils::create_expired_token(&user)).unwrap();
    storage.set(IDENTITY_KEY, &user.to_json().to_string()).unwrap();

    let store = SessionStore::restored(storage.clone());

    assert!(!store.is_authenticated());
    assert_eq!(storage.get(IDENTITY_KEY).unwrap(), None);
}

#[test]
fn test_restore_accepts_opaque_token() {
    let storage = Arc::new(MemoryStorage::new());
    let user = TestIdentity::patient("opaque@example.com");
    storage.set(TOKEN_KEY, "opaque-session-token").unwrap();
    storage.set(IDENTITY_KEY, &user.to_json().to_string()).unwrap();

    let store = SessionStore::restored(storage);

    assert_eq!(store.token().as_deref(), Some("opaque-session-token"));
}

#[test]
fn test_logout_is_idempotent() {
    let store = SessionStore::in_memory();
    let mut changes = store.subscribe();

    store.logout();
    assert!(!changes.has_changed().unwrap());

    let user = TestIdentity::doctor("doc@example.com");
    store.login(user.to_identity(), "token-1".to_string());
    assert!(changes.has_changed().unwrap());
    changes.borrow_and_update();

    store.logout();
    assert!(changes.has_changed().unwrap());
    changes.borrow_and_update();

    store.logout();
    assert!(!changes.has_changed().unwrap());
    assert!(!store.is_authenticated());
}

#[test]
fn test_logout_clears_durable_storage() {
    let storage = Arc::new(MemoryStorage::new());
    let store = SessionStore::new(storage.clone());
    let user = TestIdentity::patient("a@b.com");

    store.login(user.to_identity(), "token-1".to_string());
    assert_eq!(storage.get(TOKEN_KEY).unwrap().as_deref(), Some("token-1"));

    store.logout();
    assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
    assert_eq!(storage.get(IDENTITY_KEY).unwrap(), None);
}

#[test]
fn test_rejected_token_invalidates_session() {
    let store = SessionStore::in_memory();
    let user = TestIdentity::patient("a@b.com");
    store.login(user.to_identity(), "token-1".to_string());
    assert_eq!(store.bearer_token().as_deref(), Some("token-1"));

    store.token_rejected("token-1");

    assert!(!store.is_authenticated());
    assert_eq!(store.bearer_token(), None);
}

#[test]
fn test_rejection_of_replaced_token_keeps_session() {
    let storage = Arc::new(MemoryStorage::new());
    let store = SessionStore::new(storage.clone());
    let user = TestIdentity::doctor("doc@example.com");
    store.login(user.to_identity(), "token-1".to_string());
    store.login(user.to_identity(), "token-2".to_string());

    store.token_rejected("token-1");

    assert!(store.is_authenticated());
    assert_eq!(store.bearer_token().as_deref(), Some("token-2"));
    assert_eq!(storage.get(TOKEN_KEY).unwrap().as_deref(), Some("token-2"));
}

#[tokio::test]
async fn test_subscribers_observe_login_and_logout() {
    let store = Arc::new(SessionStore::in_memory());
    let mut changes = store.subscribe();
    let user = TestIdentity::doctor("doc@example.com");

    let writer = store.clone();
    let identity = user.to_identity();
    tokio::spawn(async move {
        writer.login(identity, "token-1".to_string());
    });

    changes.changed().await.unwrap();
    assert_eq!(changes.borrow_and_update().role(), Some(Role::Doctor));

    store.logout();
    changes.changed().await.unwrap();
    assert!(!changes.borrow_and_update().is_authenticated());
}

#[test]
fn test_invalidate_wakes_waiting_subscriber() {
    let store = SessionStore::in_memory();
    let user = TestIdentity::patient("a@b.com");
    store.login(user.to_identity(), "token-1".to_string());
    let mut changes = store.subscribe();

    store.invalidate("token expired");

    tokio_test::block_on(async {
        changes.changed().await.unwrap();
    });
    assert!(!changes.borrow().is_authenticated());
}

#[cfg(unix)]
#[test]
fn test_session_file_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let store = SessionStore::new(Arc::new(FileStorage::new(&path)));
    store.login(TestIdentity::patient("a@b.com").to_identity(), "token-1".to_string());

    let mode = std::fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}
