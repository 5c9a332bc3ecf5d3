//! Full group lifecycle against the facade: create, update, delete,
//! and filtered bulk delete, on both storage backends.

use std::collections::BTreeSet;

use coffer::{BucketId, Coffer, CofferConfig, GroupId, Principal};
use coffer_core::AuthorityToken;
use coffer_perms::{MemoryIndex, PermissionIndex, SqliteIndex};
use coffer_store::{Filter, MembershipStore, MemoryStore, SqliteStore};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn principals(names: &[&str]) -> Vec<Principal> {
    names.iter().map(|n| Principal::new(*n)).collect()
}

fn token(bucket: &BucketId, group: &str) -> AuthorityToken {
    AuthorityToken::for_group(bucket, &GroupId::new(group))
}

async fn group_lifecycle<S: MembershipStore, I: PermissionIndex>(coffer: Coffer<S, I>) {
    init_tracing();
    let bucket = BucketId::new("bucket1");
    let g1 = GroupId::new("g1");
    let g1_token = token(&bucket, "g1");
    let alice = Principal::new("alice");
    let bob = Principal::new("bob");
    let carol = Principal::new("carol");

    // Create: both members hold the group's token.
    coffer
        .put_group(&bucket, g1.clone(), principals(&["alice", "bob"]))
        .await
        .unwrap();
    assert!(coffer.tokens_of(&alice).await.unwrap().contains(&g1_token));
    assert!(coffer.tokens_of(&bob).await.unwrap().contains(&g1_token));

    // Update: alice leaves, carol joins, bob stays.
    coffer
        .put_group(&bucket, g1.clone(), principals(&["bob", "carol"]))
        .await
        .unwrap();
    assert!(!coffer.tokens_of(&alice).await.unwrap().contains(&g1_token));
    assert!(coffer.tokens_of(&bob).await.unwrap().contains(&g1_token));
    assert!(coffer.tokens_of(&carol).await.unwrap().contains(&g1_token));

    // Delete: nobody holds the token anymore.
    let tombstone = coffer.delete_group(&bucket, &g1).await.unwrap();
    assert_eq!(tombstone.id, g1);
    for principal in [&alice, &bob, &carol] {
        assert!(!coffer.tokens_of(principal).await.unwrap().contains(&g1_token));
    }
    assert!(coffer.get_group(&bucket, &g1).await.unwrap().is_none());
}

async fn filtered_bulk_delete<S: MembershipStore, I: PermissionIndex>(coffer: Coffer<S, I>) {
    init_tracing();
    let bucket = BucketId::new("bucket1");
    let x = Principal::new("x");
    let y = Principal::new("y");

    coffer
        .put_group(&bucket, GroupId::new("team-a"), principals(&["x"]))
        .await
        .unwrap();
    coffer
        .put_group(&bucket, GroupId::new("team-b"), principals(&["x", "y"]))
        .await
        .unwrap();
    coffer
        .put_group(&bucket, GroupId::new("staff"), principals(&["x", "y"]))
        .await
        .unwrap();

    let tombstones = coffer
        .delete_groups(&bucket, &[Filter::IdPrefix("team-".into())])
        .await
        .unwrap();
    let deleted: Vec<_> = tombstones.iter().map(|t| t.id.as_str().to_owned()).collect();
    assert_eq!(deleted, ["team-a", "team-b"]);

    // Both principals lost exactly the team-* grants; staff remains.
    let staff_only: BTreeSet<_> = [token(&bucket, "staff")].into_iter().collect();
    assert_eq!(coffer.tokens_of(&x).await.unwrap(), staff_only);
    assert_eq!(coffer.tokens_of(&y).await.unwrap(), staff_only);
}

#[tokio::test]
async fn test_group_lifecycle_memory() {
    group_lifecycle(Coffer::new(
        MemoryStore::new(),
        MemoryIndex::new(),
        CofferConfig::default(),
    ))
    .await;
}

#[tokio::test]
async fn test_group_lifecycle_sqlite() {
    group_lifecycle(Coffer::new(
        SqliteStore::open_memory().unwrap(),
        SqliteIndex::open_memory().unwrap(),
        CofferConfig::default(),
    ))
    .await;
}

#[tokio::test]
async fn test_filtered_bulk_delete_memory() {
    filtered_bulk_delete(Coffer::new(
        MemoryStore::new(),
        MemoryIndex::new(),
        CofferConfig::default(),
    ))
    .await;
}

#[tokio::test]
async fn test_filtered_bulk_delete_sqlite() {
    filtered_bulk_delete(Coffer::new(
        SqliteStore::open_memory().unwrap(),
        SqliteIndex::open_memory().unwrap(),
        CofferConfig::default(),
    ))
    .await;
}

#[tokio::test]
async fn test_mixed_backends_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let coffer = Coffer::new(
        SqliteStore::open(dir.path().join("groups.db")).unwrap(),
        SqliteIndex::open(dir.path().join("grants.db")).unwrap(),
        CofferConfig::default(),
    );
    group_lifecycle(coffer).await;
}
