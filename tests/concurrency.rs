mod common;

use common::*;
use futures_util::future::join_all;
use std::collections::HashSet;
use std::sync::Arc;
use tokenrot::application_port::*;
use tokenrot::domain_model::*;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_rotations_issue_a_single_successor() {
    let h = harness(revoke_on_use());
    let client = h.register_client("web", "secret");
    let r = h.issue(Some(&client), "read write", "rt-1");
    let service = Arc::new(h.service());

    let attempts = (0..8).map(|_| {
        let service = service.clone();
        tokio::spawn(async move {
            service
                .rotate(
                    Some(Credentials::new("web", "secret")),
                    RotationParams::new("rt-1"),
                )
                .await
        })
    });
    let outcomes: Vec<_> = join_all(attempts)
        .await
        .into_iter()
        .map(|joined| joined.expect("task panicked"))
        .collect();

    let winners: Vec<_> = outcomes.iter().filter_map(|o| o.as_ref().ok()).collect();
    assert_eq!(winners.len(), 1);

    for outcome in &outcomes {
        if let Err(e) = outcome {
            assert!(
                matches!(
                    e.kind(),
                    Some(FailureKind::InvalidGrant | FailureKind::ReuseDetected)
                ),
                "unexpected failure: {e}"
            );
        }
    }

    assert_eq!(h.successors_of("rt-1").len(), 1);
    assert_eq!(h.db.tokens().len(), 2);
    assert!(h.stored(r.id).is_revoked(h.clock.as_ref()));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_rotations_in_grace_window_share_one_refresh_token() {
    let h = harness(grace_period(10));
    let r = h.issue(None, "read", "rt-1");
    let service = Arc::new(h.service());

    let attempts = (0..8).map(|_| {
        let service = service.clone();
        tokio::spawn(async move { service.rotate(None, RotationParams::new("rt-1")).await })
    });
    let successors: Vec<AccessToken> = join_all(attempts)
        .await
        .into_iter()
        .map(|joined| joined.expect("task panicked").expect("rotation succeeds"))
        .collect();

    let refresh_values: HashSet<_> = successors
        .iter()
        .map(|t| t.refresh_token.clone().expect("refresh token issued"))
        .collect();
    assert_eq!(refresh_values.len(), 1);
    assert_eq!(h.successors_of("rt-1").len(), 8);

    let predecessor = h.stored(r.id);
    assert_eq!(
        predecessor.revoked_at,
        Some(start() + chrono::Duration::seconds(10))
    );
    assert!(!predecessor.is_revoked(h.clock.as_ref()));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn distinct_tokens_rotate_independently() {
    let h = harness(revoke_on_use());
    let values: Vec<String> = (0..6).map(|i| format!("rt-{i}")).collect();
    for value in &values {
        h.issue(None, "read", value);
    }
    let service = Arc::new(h.service());

    let attempts = values.iter().cloned().map(|value| {
        let service = service.clone();
        tokio::spawn(async move { service.rotate(None, RotationParams::new(value)).await })
    });
    let outcomes = join_all(attempts).await;

    for outcome in outcomes {
        outcome.expect("task panicked").expect("rotation succeeds");
    }
    for value in &values {
        assert_eq!(h.successors_of(value).len(), 1);
    }
}
