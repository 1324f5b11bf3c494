//! End-to-end gate behaviour over the in-memory adapters with virtual time.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use keystone_core::ports::RateLimitPolicy;
use keystone_core::{FetchPolicy, FetchSource, GateError, GuardedFetch, ManualClock, UpstreamError};
use keystone_infra::in_memory_gate;
use serde_json::{Value, json};

fn setup() -> (GuardedFetch<Value>, ManualClock) {
    let clock = ManualClock::new();
    (in_memory_gate(Arc::new(clock.clone())), clock)
}

fn policy(limit: u32, window_ms: u64, ttl_ms: u64) -> FetchPolicy {
    let rate_limit = RateLimitPolicy::new(limit, Duration::from_millis(window_ms)).unwrap();
    FetchPolicy::new(rate_limit, Duration::from_millis(ttl_ms)).unwrap()
}

async fn fetch_counting(
    gate: &GuardedFetch<Value>,
    client: &str,
    key: &str,
    policy: &FetchPolicy,
    calls: &AtomicUsize,
) -> Result<keystone_core::Fetched<Value>, GateError> {
    gate.fetch(
        client,
        key,
        policy,
        || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(json!({ "price": 500000 })) }
        },
        None,
    )
    .await
}

#[tokio::test]
async fn test_scenario_a_window_rollover() {
    let (gate, clock) = setup();
    let policy = policy(3, 60_000, 300_000);
    let calls = AtomicUsize::new(0);

    for _ in 0..3 {
        assert!(
            fetch_counting(&gate, "1.2.3.4", "zpid:123", &policy, &calls)
                .await
                .is_ok()
        );
    }

    let denied = fetch_counting(&gate, "1.2.3.4", "zpid:123", &policy, &calls).await;
    assert!(matches!(denied, Err(GateError::RateLimited { .. })));

    clock.advance(Duration::from_millis(60_001));
    assert!(
        fetch_counting(&gate, "1.2.3.4", "zpid:123", &policy, &calls)
            .await
            .is_ok()
    );
    // Only the first call missed the cache
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_scenario_b_cache_expiry_refetches() {
    let (gate, clock) = setup();
    let policy = policy(100, 60_000, 300_000);
    let calls = AtomicUsize::new(0);

    gate.cache()
        .put("zpid:123", json!({ "price": 500000 }), Duration::from_millis(300_000));
    assert_eq!(
        gate.cache().get("zpid:123"),
        Some(json!({ "price": 500000 }))
    );

    let hit = fetch_counting(&gate, "1.2.3.4", "zpid:123", &policy, &calls)
        .await
        .unwrap();
    assert_eq!(hit.source, FetchSource::Cache);
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    clock.advance(Duration::from_millis(300_001));
    assert_eq!(gate.cache().get("zpid:123"), None);

    let miss = fetch_counting(&gate, "1.2.3.4", "zpid:123", &policy, &calls)
        .await
        .unwrap();
    assert_eq!(miss.source, FetchSource::Upstream);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_scenario_c_fallback_not_cached() {
    let (gate, _) = setup();
    let policy = policy(10, 60_000, 300_000);
    let fallback = json!({ "isFallback": true });

    let fetched = gate
        .fetch(
            "1.2.3.4",
            "zpid:123",
            &policy,
            || async { Err(UpstreamError::RateLimited) },
            Some(fallback.clone()),
        )
        .await
        .unwrap();

    assert_eq!(fetched.value, fallback);
    assert_eq!(fetched.source, FetchSource::Fallback);
    assert_eq!(gate.cache().get("zpid:123"), None);
}

#[tokio::test]
async fn test_rate_limit_wins_over_live_cache_entry() {
    let (gate, _) = setup();
    let policy = policy(1, 60_000, 300_000);
    let calls = AtomicUsize::new(0);

    fetch_counting(&gate, "1.2.3.4", "zpid:123", &policy, &calls)
        .await
        .unwrap();
    assert!(gate.cache().get("zpid:123").is_some());

    let second = fetch_counting(&gate, "1.2.3.4", "zpid:123", &policy, &calls).await;
    assert!(matches!(second, Err(GateError::RateLimited { .. })));
}

#[tokio::test]
async fn test_exhausted_client_does_not_affect_others() {
    let (gate, _) = setup();
    let policy = policy(1, 60_000, 300_000);
    let calls = AtomicUsize::new(0);

    fetch_counting(&gate, "10.0.0.1", "zpid:1", &policy, &calls)
        .await
        .unwrap();
    assert!(
        fetch_counting(&gate, "10.0.0.1", "zpid:1", &policy, &calls)
            .await
            .is_err()
    );

    let other = fetch_counting(&gate, "10.0.0.2", "zpid:1", &policy, &calls)
        .await
        .unwrap();
    assert_eq!(other.source, FetchSource::Cache);
}

#[tokio::test]
async fn test_concurrent_misses_both_reach_upstream() {
    let (gate, _) = setup();
    let policy = policy(10, 60_000, 300_000);
    let calls = AtomicUsize::new(0);
    let (release_tx, release_rx) = futures::channel::oneshot::channel::<()>();
    let release = futures::future::FutureExt::shared(release_rx);

    let slow_fetch = |client: &'static str| {
        let release = release.clone();
        let gate = gate.clone();
        let calls = &calls;
        async move {
            gate.fetch(
                client,
                "search:austin, tx",
                &policy,
                || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async move {
                        let _ = release.await;
                        Ok(json!({ "results": [] }))
                    }
                },
                None,
            )
            .await
        }
    };

    let first = slow_fetch("10.0.0.1");
    let second = slow_fetch("10.0.0.2");
    let both = futures::future::join(first, second);
    let releaser = async {
        tokio::task::yield_now().await;
        let _ = release_tx.send(());
    };

    let ((a, b), ()) = futures::future::join(both, releaser).await;
    assert!(a.is_ok() && b.is_ok());
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_policies_beyond_clock_range_are_served() {
    let (gate, clock) = setup();
    let rate_limit = RateLimitPolicy::new(2, Duration::from_secs(u64::MAX)).unwrap();
    let policy = FetchPolicy::new(rate_limit, Duration::MAX).unwrap();
    let calls = AtomicUsize::new(0);

    let first = fetch_counting(&gate, "1.2.3.4", "zpid:123", &policy, &calls)
        .await
        .unwrap();
    assert_eq!(first.source, FetchSource::Upstream);

    clock.advance(Duration::from_secs(30 * 24 * 60 * 60));
    let second = fetch_counting(&gate, "1.2.3.4", "zpid:123", &policy, &calls)
        .await
        .unwrap();
    assert_eq!(second.source, FetchSource::Cache);
    assert_eq!(second.rate_limit.remaining, 0);

    let denied = fetch_counting(&gate, "1.2.3.4", "zpid:123", &policy, &calls).await;
    assert!(matches!(denied, Err(GateError::RateLimited { .. })));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
