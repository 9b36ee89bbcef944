//! End-to-end user creation against the in-memory store.
//!
//! These tests wire the real store, validator and Argon2 hasher (at the
//! lowest cost to keep them fast).

use std::collections::HashSet;
use std::sync::{Arc, Barrier};

use futures::future::join_all;
use tokio_test::{assert_err, assert_ok};

use domain::{
    Argon2Hasher, CreateParams, DomainError, DomainResult, HashedPassword, MinLengthValidator,
    PasswordError, PasswordHasher, UserRole, MIN_HASH_COST,
};
use user_service_lib::infra::{InsertMode, MemoryUserStore};
use user_service_lib::repository::{UserCommands, UserQueries};
use user_service_lib::service::{Creator, UserManager, UserService};

fn setup(mode: InsertMode) -> (Arc<MemoryUserStore>, UserManager) {
    let store = Arc::new(MemoryUserStore::with_mode(mode));
    let creator = Creator::new(
        Arc::new(MinLengthValidator::default()),
        Arc::new(Argon2Hasher::new(MIN_HASH_COST)),
        store.clone(),
        store.clone(),
    );
    (store.clone(), UserManager::new(creator, store))
}

/// Holds every caller in `hash` until `n` of them have arrived, so all
/// concurrent creates have passed their uniqueness checks before any insert.
struct GatedHasher {
    gate: Barrier,
    inner: Argon2Hasher,
}

impl PasswordHasher for GatedHasher {
    fn hash(&self, password: &str) -> DomainResult<HashedPassword> {
        self.gate.wait();
        self.inner.hash(password)
    }

    fn verify(&self, password: &str, hashed: &HashedPassword) -> DomainResult<bool> {
        self.inner.verify(password, hashed)
    }
}

fn setup_gated(mode: InsertMode, n: usize) -> (Arc<MemoryUserStore>, Arc<UserManager>) {
    let store = Arc::new(MemoryUserStore::with_mode(mode));
    let creator = Creator::new(
        Arc::new(MinLengthValidator::default()),
        Arc::new(GatedHasher {
            gate: Barrier::new(n),
            inner: Argon2Hasher::new(MIN_HASH_COST),
        }),
        store.clone(),
        store.clone(),
    );
    (store.clone(), Arc::new(UserManager::new(creator, store)))
}

async fn create_concurrently(
    service: &Arc<UserManager>,
    n: usize,
    username: &str,
) -> Vec<DomainResult<domain::User>> {
    let attempts = (0..n).map(|_| {
        let service = service.clone();
        let username = username.to_string();
        tokio::spawn(async move {
            service
                .create_user(CreateParams::new(username, "longenough1"))
                .await
        })
    });
    join_all(attempts)
        .await
        .into_iter()
        .map(|joined| joined.expect("create task panicked"))
        .collect()
}

#[tokio::test]
async fn test_defaults_generated_id_and_user_role() {
    let (_store, service) = setup(InsertMode::RejectDuplicates);

    let user = assert_ok!(
        service
            .create_user(CreateParams::new("bob", "longenough"))
            .await
    );

    assert!(!user.id.is_empty());
    assert!(uuid::Uuid::parse_str(&user.id).is_ok());
    assert_eq!(user.username, "bob");
    assert_eq!(user.role, UserRole::User);
    assert!(user.deleted_at.is_none());
}

#[tokio::test]
async fn test_distinct_usernames_get_distinct_ids() {
    let (store, service) = setup(InsertMode::RejectDuplicates);

    let mut ids = HashSet::new();
    let mut usernames = HashSet::new();
    for i in 0..20 {
        let user = assert_ok!(
            service
                .create_user(CreateParams::new(format!("user{}", i), "longenough"))
                .await
        );
        ids.insert(user.id);
        usernames.insert(user.username);
    }

    assert_eq!(ids.len(), 20);
    assert_eq!(usernames.len(), 20);
    assert_eq!(store.len().await, 20);
}

#[tokio::test]
async fn test_id_collision_rejected_without_insert() {
    let (store, service) = setup(InsertMode::RejectDuplicates);
    let first = assert_ok!(
        service
            .create_user(CreateParams::new("alice", "longenough").with_id("u-1"))
            .await
    );

    let err = assert_err!(
        service
            .create_user(CreateParams::new("bob", "longenough").with_id(first.id.clone()))
            .await
    );

    assert!(matches!(err, DomainError::IdAlreadyExists));
    assert_eq!(store.len().await, 1);
    assert_eq!(service.get_user("u-1").await.unwrap().username, "alice");
}

#[tokio::test]
async fn test_username_collision_rejected_without_insert() {
    let (store, service) = setup(InsertMode::RejectDuplicates);
    assert_ok!(
        service
            .create_user(CreateParams::new("alice", "longenough"))
            .await
    );

    let err = assert_err!(
        service
            .create_user(CreateParams::new("alice", "different-password"))
            .await
    );

    assert!(matches!(err, DomainError::UsernameAlreadyExists));
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_password_policy_enforced() {
    let (store, service) = setup(InsertMode::RejectDuplicates);

    let err = assert_err!(service.create_user(CreateParams::new("a", "short")).await);
    assert!(matches!(
        err,
        DomainError::InvalidPassword(PasswordError::TooSmall { .. })
    ));
    assert!(store.is_empty().await);

    assert_ok!(
        service
            .create_user(CreateParams::new("a", "longenough1"))
            .await
    );
}

#[tokio::test]
async fn test_invalid_role_rejected_without_insert() {
    let (store, service) = setup(InsertMode::RejectDuplicates);

    let err = assert_err!(
        service
            .create_user(CreateParams::new("a", "longenough1").with_role("superadmin"))
            .await
    );

    assert!(matches!(err, DomainError::InvalidRole(_)));
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_empty_username_rejected() {
    let (store, service) = setup(InsertMode::RejectDuplicates);

    let err = assert_err!(service.create_user(CreateParams::new("", "longenough1")).await);

    assert!(matches!(err, DomainError::InvalidUsername));
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_lookup_round_trip() {
    let (_store, service) = setup(InsertMode::RejectDuplicates);
    let created = assert_ok!(
        service
            .create_user(CreateParams::new("carol", "longenough1").with_role("admin"))
            .await
    );

    let by_id = assert_ok!(service.get_user(&created.id).await);
    let by_username = assert_ok!(service.get_user_by_username("carol").await);

    assert_eq!(by_id, created);
    assert_eq!(by_username, created);
    assert_eq!(by_id.role, UserRole::Admin);
}

#[tokio::test]
async fn test_lookup_miss() {
    let (_store, service) = setup(InsertMode::RejectDuplicates);

    assert!(matches!(
        service.get_user("nonexistent").await,
        Err(DomainError::DoesNotExist)
    ));
    assert!(matches!(
        service.get_user_by_username("nonexistent").await,
        Err(DomainError::DoesNotExist)
    ));
}

#[tokio::test]
async fn test_stored_hash_is_not_plaintext_and_verifies() {
    let (store, service) = setup(InsertMode::RejectDuplicates);
    let created = assert_ok!(
        service
            .create_user(CreateParams::new("dave", "longenough1"))
            .await
    );

    let stored = assert_ok!(store.get_by_id(&created.id).await);

    assert!(!stored.hashed_password.is_empty());
    assert_ne!(stored.hashed_password.as_bytes(), b"longenough1");

    let hasher = Argon2Hasher::new(MIN_HASH_COST);
    assert!(hasher.verify("longenough1", &stored.hashed_password).unwrap());
    assert!(!hasher.verify("wrong-password", &stored.hashed_password).unwrap());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_same_username_single_winner() {
    let (store, service) = setup(InsertMode::RejectDuplicates);
    let service = Arc::new(service);

    let attempts = (0..8).map(|_| {
        let service = service.clone();
        tokio::spawn(async move {
            service
                .create_user(CreateParams::new("racer", "longenough1"))
                .await
        })
    });
    let results: Vec<_> = join_all(attempts)
        .await
        .into_iter()
        .map(|joined| joined.expect("create task panicked"))
        .collect();

    let successes = results.iter().filter(|r| r.is_ok()).count();
    let conflicts = results
        .iter()
        .filter(|r| matches!(r, Err(DomainError::UsernameAlreadyExists)))
        .count();

    assert_eq!(successes, 1);
    assert_eq!(conflicts, 7);
    assert_eq!(store.len().await, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_gated_race_rejecting_store_keeps_one_user() {
    let (store, service) = setup_gated(InsertMode::RejectDuplicates, 4);

    let results = create_concurrently(&service, 4, "racer").await;

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert_eq!(
        results
            .iter()
            .filter(|r| matches!(r, Err(DomainError::UsernameAlreadyExists)))
            .count(),
        3
    );
    assert_eq!(store.len().await, 1);
}

// Every create passes the username check before any of them inserts, and the
// overwriting store does not re-check, so the same username is stored 4 times.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_gated_race_overwrite_store_duplicates_username() {
    let (store, service) = setup_gated(InsertMode::Overwrite, 4);

    let results = create_concurrently(&service, 4, "racer").await;

    let ids: HashSet<String> = results
        .into_iter()
        .map(|r| assert_ok!(r).id)
        .collect();
    assert_eq!(ids.len(), 4);
    assert_eq!(store.len().await, 4);

    for id in &ids {
        assert_eq!(service.get_user(id).await.unwrap().username, "racer");
    }
}

// With an overwriting store, uniqueness depends on the non-atomic pre-checks.
// A direct insert that bypasses them shows the gap: the ID is silently reused.
#[tokio::test]
async fn test_overwrite_store_does_not_guard_insert() {
    let (store, service) = setup(InsertMode::Overwrite);
    let created = assert_ok!(
        service
            .create_user(CreateParams::new("erin", "longenough1").with_id("fixed"))
            .await
    );

    let replacement = domain::InsertParams {
        id: created.id.clone(),
        username: "mallory".to_string(),
        hashed_password: created.hashed_password.clone(),
        role: UserRole::Admin,
    };
    assert_ok!(store.insert(replacement).await);

    assert_eq!(store.len().await, 1);
    assert_eq!(service.get_user("fixed").await.unwrap().username, "mallory");

    // The Creator's own pre-check still catches the reused ID
    let err = assert_err!(
        service
            .create_user(CreateParams::new("frank", "longenough1").with_id("fixed"))
            .await
    );
    assert!(matches!(err, DomainError::IdAlreadyExists));
}
