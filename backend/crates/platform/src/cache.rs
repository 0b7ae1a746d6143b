//! Time-boxed Cache Infrastructure
//!
//! Generic in-memory cache with a per-entry TTL and single-flight fetch
//! coalescing: concurrent callers for the same key share one in-flight
//! fetch instead of each hitting the upstream. Volatile, process-local.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use tokio::sync::watch;

enum Slot<V> {
    /// A value stored at `stored_at`, valid while its age is under the TTL
    Ready { stored_at: Instant, value: V },
    /// A fetch is in flight; waiters subscribe to the receiver.
    /// A dropped sender (failed or cancelled fetch) wakes waiters.
    Pending(watch::Receiver<Option<V>>),
}

/// TTL cache with single-flight fetch coalescing
pub struct TtlCache<K, V> {
    entries: Arc<Mutex<HashMap<K, Slot<V>>>>,
}

enum Action<V> {
    Hit(V),
    Wait(watch::Receiver<Option<V>>),
    Lead(watch::Sender<Option<V>>),
}

/// Clears a leader's `Pending` slot unless a value was published.
///
/// Runs on drop, so a leader future that is cancelled mid-fetch (a
/// disconnecting HTTP client, an aborted task) releases the slot the
/// same way a failed fetch does. The receiver identifies the leader's
/// own generation, so a newer leader's slot is never removed.
struct PendingGuard<K, V>
where
    K: Eq + Hash,
{
    entries: Arc<Mutex<HashMap<K, Slot<V>>>>,
    key: K,
    rx: watch::Receiver<Option<V>>,
}

impl<K, V> Drop for PendingGuard<K, V>
where
    K: Eq + Hash,
{
    fn drop(&mut self) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(Slot::Pending(current)) = entries.get(&self.key) {
            if current.same_channel(&self.rx) {
                entries.remove(&self.key);
            }
        }
    }
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<K, Slot<V>>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Return the cached value for `key` if its age is under `ttl`;
    /// otherwise run `fetch`, store the result, and return it.
    ///
    /// Concurrent calls for the same key are coalesced: one caller becomes
    /// the leader and runs `fetch`, the rest wait for its result. A failed
    /// or cancelled fetch is not cached; the slot is cleared and waiters
    /// re-contend for leadership (which is why `fetch` must be
    /// re-invocable).
    pub async fn get_or_fetch<F, Fut, E>(&self, key: K, ttl: Duration, fetch: F) -> Result<V, E>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        loop {
            let action = {
                let mut entries = self.lock();
                match entries.get(&key) {
                    Some(Slot::Ready { stored_at, value }) if stored_at.elapsed() < ttl => {
                        Action::Hit(value.clone())
                    }
                    Some(Slot::Pending(rx)) => Action::Wait(rx.clone()),
                    _ => {
                        let (tx, rx) = watch::channel(None);
                        entries.insert(key.clone(), Slot::Pending(rx));
                        Action::Lead(tx)
                    }
                }
            };

            match action {
                Action::Hit(value) => return Ok(value),
                Action::Wait(mut rx) => {
                    let waited = rx
                        .wait_for(|slot| slot.is_some())
                        .await
                        .map(|slot| slot.clone());
                    match waited {
                        Ok(slot) => {
                            if let Some(value) = slot {
                                return Ok(value);
                            }
                        }
                        Err(_) => {
                            // Leader vanished without publishing. Its guard
                            // normally clears the slot; remove it here too so
                            // a stale entry can never outlive its channel,
                            // then contend again.
                            let mut entries = self.lock();
                            if let Some(Slot::Pending(current)) = entries.get(&key) {
                                if current.same_channel(&rx) {
                                    entries.remove(&key);
                                }
                            }
                        }
                    }
                }
                Action::Lead(tx) => {
                    let _cleanup = PendingGuard {
                        entries: Arc::clone(&self.entries),
                        key: key.clone(),
                        rx: tx.subscribe(),
                    };
                    match fetch().await {
                        Ok(value) => {
                            self.lock().insert(
                                key.clone(),
                                Slot::Ready {
                                    stored_at: Instant::now(),
                                    value: value.clone(),
                                },
                            );
                            let _ = tx.send(Some(value.clone()));
                            return Ok(value);
                        }
                        // The guard clears the Pending slot
                        Err(e) => return Err(e),
                    }
                }
            }
        }
    }

    /// Drop the entry for `key`, forcing the next caller to fetch
    pub async fn invalidate(&self, key: &K) {
        self.lock().remove(key);
    }
}

impl<K, V> Clone for TtlCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<K, V> Default for TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const TTL: Duration = Duration::from_secs(60);

    #[tokio::test]
    async fn test_second_call_within_ttl_hits_cache() {
        let cache: TtlCache<&str, u32> = TtlCache::new();
        let calls = AtomicUsize::new(0);

        let fetch = || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<u32, ()>(1500)
        };

        let first = cache.get_or_fetch("rapid", TTL, fetch).await.unwrap();
        let second = cache.get_or_fetch("rapid", TTL, fetch).await.unwrap();

        assert_eq!(first, 1500);
        assert_eq!(second, 1500);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_refetch_after_ttl_expiry() {
        let cache: TtlCache<&str, u32> = TtlCache::new();
        let calls = AtomicUsize::new(0);

        let fetch = || async {
            Ok::<u32, ()>(calls.fetch_add(1, Ordering::SeqCst) as u32)
        };

        let ttl = Duration::from_millis(20);
        let first = cache.get_or_fetch("rapid", ttl, fetch).await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        let second = cache.get_or_fetch("rapid", ttl, fetch).await.unwrap();

        assert_eq!(first, 0);
        assert_eq!(second, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_distinct_keys_fetch_independently() {
        let cache: TtlCache<&str, u32> = TtlCache::new();
        let calls = AtomicUsize::new(0);

        let fetch = || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<u32, ()>(0)
        };

        cache.get_or_fetch("rapid", TTL, fetch).await.unwrap();
        cache.get_or_fetch("blitz", TTL, fetch).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_concurrent_calls_share_one_fetch() {
        let cache: TtlCache<&str, u32> = TtlCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let fetch = {
            let calls = Arc::clone(&calls);
            move || {
                let calls = Arc::clone(&calls);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(30)).await;
                    Ok::<u32, ()>(7)
                }
            }
        };

        let (a, b) = tokio::join!(
            cache.get_or_fetch("rapid", TTL, &fetch),
            cache.get_or_fetch("rapid", TTL, &fetch),
        );

        assert_eq!(a.unwrap(), 7);
        assert_eq!(b.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_is_not_cached() {
        let cache: TtlCache<&str, u32> = TtlCache::new();
        let calls = AtomicUsize::new(0);

        let fetch = || async {
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Err("upstream down")
            } else {
                Ok(9)
            }
        };

        assert!(cache.get_or_fetch("rapid", TTL, fetch).await.is_err());
        assert_eq!(cache.get_or_fetch("rapid", TTL, fetch).await, Ok(9));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_waiter_retries_after_leader_failure() {
        let cache: TtlCache<&str, u32> = TtlCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let fetch = {
            let calls = Arc::clone(&calls);
            move || {
                let calls = Arc::clone(&calls);
                async move {
                    let n = calls.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    if n == 0 { Err(()) } else { Ok(n as u32) }
                }
            }
        };

        let (a, b) = tokio::join!(
            cache.get_or_fetch("rapid", TTL, &fetch),
            cache.get_or_fetch("rapid", TTL, &fetch),
        );

        // The leader observes the failure; the waiter re-contends and succeeds.
        let results = [a, b];
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert_eq!(results.iter().filter(|r| r.is_err()).count(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_cancelled_leader_releases_key() {
        let cache: TtlCache<&str, u32> = TtlCache::new();

        // A leader that would fetch forever, cancelled mid-flight
        let leader = tokio::spawn({
            let cache = cache.clone();
            async move {
                let _ = cache
                    .get_or_fetch("rapid", TTL, || async {
                        tokio::time::sleep(Duration::from_secs(60)).await;
                        Ok::<u32, ()>(0)
                    })
                    .await;
            }
        });
        tokio::time::sleep(Duration::from_millis(20)).await;
        leader.abort();
        let _ = leader.await;

        let calls = AtomicUsize::new(0);
        let fetch = || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<u32, ()>(5)
        };

        // The key must be free again, not wedged behind the dead leader
        let value = tokio::time::timeout(
            Duration::from_secs(1),
            cache.get_or_fetch("rapid", TTL, fetch),
        )
        .await
        .expect("key still held by a cancelled leader")
        .unwrap();

        assert_eq!(value, 5);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_waiter_takes_over_after_cancelled_leader() {
        let cache: TtlCache<&str, u32> = TtlCache::new();

        let leader = tokio::spawn({
            let cache = cache.clone();
            async move {
                let _ = cache
                    .get_or_fetch("rapid", TTL, || async {
                        tokio::time::sleep(Duration::from_secs(60)).await;
                        Ok::<u32, ()>(0)
                    })
                    .await;
            }
        });
        tokio::time::sleep(Duration::from_millis(20)).await;

        // Waiter joins the pending slot, then the leader is cancelled
        let waiter = tokio::spawn({
            let cache = cache.clone();
            async move {
                cache
                    .get_or_fetch("rapid", TTL, || async { Ok::<u32, ()>(11) })
                    .await
            }
        });
        tokio::time::sleep(Duration::from_millis(20)).await;
        leader.abort();
        let _ = leader.await;

        let value = tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter still blocked on the cancelled leader")
            .unwrap()
            .unwrap();
        assert_eq!(value, 11);
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch() {
        let cache: TtlCache<&str, u32> = TtlCache::new();
        let calls = AtomicUsize::new(0);

        let fetch = || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<u32, ()>(3)
        };

        cache.get_or_fetch("rapid", TTL, fetch).await.unwrap();
        cache.invalidate(&"rapid").await;
        cache.get_or_fetch("rapid", TTL, fetch).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
