mod common;

use common::*;
use std::time::Duration;
use tokenrot::domain_model::*;
use tokenrot::domain_port::*;
use tokenrot::infra_memory::*;

#[tokio::test]
async fn revocation_is_monotone() {
    let h = harness(revoke_on_use());
    let mut token = h.issue(None, "read", "rt-1");
    assert!(!token.is_revoked(h.clock.as_ref()));

    let repo = MemoryTokenRepo::new(h.db.clone());
    let manager = MemoryTxManager::new(h.db.clone());
    let mut tx = manager.begin().await.unwrap();
    token.revoke(tx.as_mut(), &repo, h.clock.as_ref()).await.unwrap();
    tx.commit().await.unwrap();

    assert!(token.is_revoked(h.clock.as_ref()));
    for _ in 0..3 {
        h.clock.advance(Duration::from_secs(3600));
        assert!(token.is_revoked(h.clock.as_ref()));
        assert!(h.stored(token.id).is_revoked(h.clock.as_ref()));
    }
}

#[tokio::test]
async fn rolled_back_revocation_is_not_persisted() {
    let h = harness(revoke_on_use());
    let mut token = h.issue(None, "read", "rt-1");

    let repo = MemoryTokenRepo::new(h.db.clone());
    let manager = MemoryTxManager::new(h.db.clone());
    let mut tx = manager.begin().await.unwrap();
    token.revoke(tx.as_mut(), &repo, h.clock.as_ref()).await.unwrap();
    tx.rollback().await.unwrap();

    assert!(h.stored(token.id).revoked_at.is_none());
}

#[tokio::test]
async fn future_revocation_is_not_yet_effective() {
    let h = harness(grace_period(30));
    let mut token = h.issue(None, "read", "rt-1");

    let repo = MemoryTokenRepo::new(h.db.clone());
    let manager = MemoryTxManager::new(h.db.clone());
    let mut tx = manager.begin().await.unwrap();
    token
        .revoke_in(tx.as_mut(), &repo, h.clock.as_ref(), Duration::from_secs(30))
        .await
        .unwrap();
    tx.commit().await.unwrap();

    assert!(!token.is_revoked(h.clock.as_ref()));
    h.clock.advance(Duration::from_secs(29));
    assert!(!token.is_revoked(h.clock.as_ref()));
    h.clock.advance(Duration::from_secs(1));
    assert!(token.is_revoked(h.clock.as_ref()));
}

#[tokio::test]
async fn predecessor_is_revoked_after_grace_and_link_consumed() {
    let h = harness(grace_period(10));
    let predecessor = h.issue(None, "read", "rt-old");
    let mut successor = h.issue(None, "read", "rt-new");
    successor.previous_refresh_token = Some("rt-old".to_string());
    h.db.insert_token(successor.clone());

    let repo = MemoryTokenRepo::new(h.db.clone());
    let manager = MemoryTxManager::new(h.db.clone());
    let mut tx = manager.begin().await.unwrap();
    successor
        .revoke_predecessor_if_configured(tx.as_mut(), &repo, h.clock.as_ref(), &h.context.config)
        .await
        .unwrap();
    tx.commit().await.unwrap();

    assert_eq!(successor.previous_refresh_token, None);
    assert_eq!(h.stored(successor.id).previous_refresh_token, None);
    assert_eq!(
        h.stored(predecessor.id).revoked_at,
        Some(start() + chrono::Duration::seconds(10))
    );
    assert!(h.stored(successor.id).revoked_at.is_none());
}

#[tokio::test]
async fn revoked_predecessor_stays_revoked() {
    let h = harness(grace_period(10));
    let mut predecessor = h.issue(None, "read", "rt-old");
    let mut successor = h.issue(None, "read", "rt-new");
    successor.previous_refresh_token = Some("rt-old".to_string());
    h.db.insert_token(successor.clone());

    let repo = MemoryTokenRepo::new(h.db.clone());
    let manager = MemoryTxManager::new(h.db.clone());
    let mut tx = manager.begin().await.unwrap();
    predecessor.revoke(tx.as_mut(), &repo, h.clock.as_ref()).await.unwrap();
    tx.commit().await.unwrap();
    h.clock.advance(Duration::from_secs(1));
    assert!(h.stored(predecessor.id).is_revoked(h.clock.as_ref()));

    let mut tx = manager.begin().await.unwrap();
    successor
        .revoke_predecessor_if_configured(tx.as_mut(), &repo, h.clock.as_ref(), &h.context.config)
        .await
        .unwrap();
    tx.commit().await.unwrap();

    let stored = h.stored(predecessor.id);
    assert_eq!(stored.revoked_at, Some(start()));
    assert!(stored.is_revoked(h.clock.as_ref()));
    assert_eq!(h.stored(successor.id).previous_refresh_token, None);
}

#[tokio::test]
async fn missing_predecessor_still_consumes_link() {
    let h = harness(grace_period(10));
    let mut successor = h.issue(None, "read", "rt-new");
    successor.previous_refresh_token = Some("rt-pruned".to_string());
    h.db.insert_token(successor.clone());

    let repo = MemoryTokenRepo::new(h.db.clone());
    let manager = MemoryTxManager::new(h.db.clone());
    let mut tx = manager.begin().await.unwrap();
    successor
        .revoke_predecessor_if_configured(tx.as_mut(), &repo, h.clock.as_ref(), &h.context.config)
        .await
        .unwrap();
    tx.commit().await.unwrap();

    assert_eq!(h.stored(successor.id).previous_refresh_token, None);
    assert_eq!(h.db.tokens().len(), 1);
}

#[tokio::test]
async fn immediate_policy_leaves_link_alone() {
    let h = harness(revoke_on_use());
    let predecessor = h.issue(None, "read", "rt-old");
    let mut successor = h.issue(None, "read", "rt-new");
    successor.previous_refresh_token = Some("rt-old".to_string());
    h.db.insert_token(successor.clone());

    let repo = MemoryTokenRepo::new(h.db.clone());
    let manager = MemoryTxManager::new(h.db.clone());
    let mut tx = manager.begin().await.unwrap();
    successor
        .revoke_predecessor_if_configured(tx.as_mut(), &repo, h.clock.as_ref(), &h.context.config)
        .await
        .unwrap();
    tx.commit().await.unwrap();

    assert_eq!(
        h.stored(successor.id).previous_refresh_token.as_deref(),
        Some("rt-old")
    );
    assert!(h.stored(predecessor.id).revoked_at.is_none());
}
