//! Keyed query cache.
//!
//! Each [`QueryKey`] owns at most one entry. Reads return the last-known value
//! immediately and revalidate in the background when the entry is stale; a
//! fetch already in flight for a key is joined rather than repeated. Mutations
//! mark keys stale only after they resolve successfully.
//!
//! There is no retry, timeout or cancellation: a failed fetch leaves the entry
//! in [`QueryStatus::Error`] until the next read, and a fetch that never
//! resolves leaves it [`QueryStatus::Loading`].

use std::any::Any;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};
use tokio::sync::watch;

use careboard_core::{Clock, SystemClock};

type CachedValue = Arc<dyn Any + Send + Sync>;
type FetchFuture = Pin<Box<dyn Future<Output = Result<CachedValue, String>> + Send>>;
type Refetch = Arc<dyn Fn() -> FetchFuture + Send + Sync>;

/// Cache key: a resource kind plus an optional parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    resource: Cow<'static, str>,
    param: Option<String>,
}

impl QueryKey {
    pub fn new(resource: impl Into<Cow<'static, str>>, param: Option<String>) -> Self {
        Self {
            resource: resource.into(),
            param,
        }
    }

    pub fn agents() -> Self {
        Self::new("agents", None)
    }

    pub fn agent(id: &str) -> Self {
        Self::new("agent", Some(id.to_string()))
    }

    pub fn alerts(alert_type: Option<&str>) -> Self {
        Self::new("alerts", alert_type.map(str::to_string))
    }

    pub fn processes() -> Self {
        Self::new("processes", None)
    }

    pub fn personas() -> Self {
        Self::new("personas", None)
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn param(&self) -> Option<&str> {
        self.param.as_deref()
    }

    /// Whether `self`, used as an invalidation filter, covers `key`.
    ///
    /// A filter without a parameter covers every key of its resource.
    pub fn matches(&self, key: &QueryKey) -> bool {
        self.resource == key.resource && (self.param.is_none() || self.param == key.param)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.param {
            Some(p) => write!(f, "{}:{}", self.resource, p),
            None => f.write_str(&self.resource),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    /// Known key, nothing fetched yet.
    Idle,
    /// A fetch is in flight. Previously fetched data may still be present.
    Loading,
    /// The last fetch failed.
    Error,
    /// The last fetch succeeded.
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("fetch failed: {0}")]
    Fetch(String),
    #[error("cached value for {0} has a different type")]
    TypeMismatch(String),
    #[error("entry for {0} was dropped before its fetch settled")]
    Abandoned(String),
}

#[derive(Debug, Clone, Copy)]
pub struct CacheConfig {
    /// How long a successful fetch counts as fresh. Zero means every read
    /// revalidates in the background.
    pub stale_time: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            stale_time: Duration::zero(),
        }
    }
}

/// Point-in-time view of one entry.
#[derive(Debug, Clone)]
pub struct QuerySnapshot<T> {
    pub status: QueryStatus,
    pub data: Option<Arc<T>>,
    pub error: Option<QueryError>,
    pub updated_at: Option<DateTime<Utc>>,
    pub is_stale: bool,
}

struct Entry {
    status: QueryStatus,
    data: Option<CachedValue>,
    error: Option<QueryError>,
    updated_at: Option<DateTime<Utc>>,
    invalidated: bool,
    /// Bumped by every invalidation; a fetch only clears `invalidated` if no
    /// invalidation happened while it was in flight.
    epoch: u64,
    /// Id of the fetch whose result this entry will accept.
    in_flight: Option<u64>,
    refetch: Option<Refetch>,
    /// Observers handed out by `subscribe`.
    changes: watch::Sender<u64>,
    /// Internal waiters on an in-flight fetch. Kept apart from `changes` so
    /// that waiting does not count as observing.
    settled: watch::Sender<u64>,
}

impl Entry {
    fn new() -> Self {
        let (changes, _) = watch::channel(0);
        let (settled, _) = watch::channel(0);
        Self {
            status: QueryStatus::Idle,
            data: None,
            error: None,
            updated_at: None,
            invalidated: false,
            epoch: 0,
            in_flight: None,
            refetch: None,
            changes,
            settled,
        }
    }

    fn is_stale(&self, now: DateTime<Utc>, stale_time: Duration) -> bool {
        match (self.status, self.updated_at) {
            (_, None) | (QueryStatus::Error, _) => true,
            (_, Some(at)) => self.invalidated || at + stale_time <= now,
        }
    }

    fn has_subscribers(&self) -> bool {
        self.changes.receiver_count() > 0
    }

    fn notify(&self) {
        self.changes.send_modify(|v| *v = v.wrapping_add(1));
        self.settled.send_modify(|v| *v = v.wrapping_add(1));
    }
}

fn downcast<T: Send + Sync + 'static>(key: &QueryKey, value: CachedValue) -> Result<Arc<T>, QueryError> {
    value
        .downcast::<T>()
        .map_err(|_| QueryError::TypeMismatch(key.to_string()))
}

fn erase<T, F, Fut, E>(fetcher: F) -> Refetch
where
    T: Send + Sync + 'static,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    E: fmt::Display + Send + 'static,
{
    Arc::new(move || -> FetchFuture {
        let fut = fetcher();
        Box::pin(async move {
            fut.await
                .map(|v| Arc::new(v) as CachedValue)
                .map_err(|e| e.to_string())
        })
    })
}

struct Inner {
    entries: Mutex<HashMap<QueryKey, Entry>>,
    /// Fetch ids are unique across entries, so a fetch outliving `clear`
    /// cannot match a later entry for the same key.
    next_fetch: AtomicU64,
    clock: Arc<dyn Clock>,
    config: CacheConfig,
}

impl Inner {
    fn entries(&self) -> MutexGuard<'_, HashMap<QueryKey, Entry>> {
        // Entries are always left consistent between statements, so a
        // poisoned lock is still usable.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Start a fetch for `key` unless one is already in flight. Returns a
    /// receiver subscribed before the fetch could complete.
    fn begin_fetch(self: &Arc<Self>, key: &QueryKey) -> Option<watch::Receiver<u64>> {
        let mut entries = self.entries();
        let entry = entries.get_mut(key)?;
        let rx = entry.settled.subscribe();

        if entry.status == QueryStatus::Loading {
            return Some(rx);
        }
        let Some(refetch) = entry.refetch.clone() else {
            return Some(rx);
        };

        let fetch_id = self.next_fetch.fetch_add(1, Ordering::Relaxed);
        entry.status = QueryStatus::Loading;
        entry.in_flight = Some(fetch_id);
        let epoch = entry.epoch;
        entry.notify();
        drop(entries);

        tracing::debug!(%key, "query fetch started");
        let inner = Arc::clone(self);
        let key = key.clone();
        tokio::spawn(async move {
            let result = refetch().await;
            if inner.complete(&key, fetch_id, epoch, result) {
                inner.begin_fetch(&key);
            }
        });

        Some(rx)
    }

    /// Record a fetch result. Returns true when the entry was invalidated
    /// mid-flight and still has subscribers, i.e. it should be fetched again.
    /// Results from a fetch the entry no longer waits on are dropped.
    fn complete(
        &self,
        key: &QueryKey,
        fetch_id: u64,
        epoch: u64,
        result: Result<CachedValue, String>,
    ) -> bool {
        let now = self.clock.now();
        let mut entries = self.entries();
        let Some(entry) = entries.get_mut(key) else {
            return false;
        };
        if entry.in_flight != Some(fetch_id) {
            tracing::debug!(%key, fetch_id, "discarding result of superseded fetch");
            return false;
        }
        entry.in_flight = None;

        match result {
            Ok(value) => {
                tracing::debug!(%key, "query fetch succeeded");
                entry.status = QueryStatus::Success;
                entry.data = Some(value);
                entry.error = None;
                entry.updated_at = Some(now);
                if entry.epoch == epoch {
                    entry.invalidated = false;
                }
            }
            Err(message) => {
                tracing::warn!(%key, error = %message, "query fetch failed");
                entry.status = QueryStatus::Error;
                entry.error = Some(QueryError::Fetch(message));
            }
        }
        entry.notify();

        entry.status == QueryStatus::Success && entry.invalidated && entry.has_subscribers()
    }

    /// Wait until `key` is no longer loading and return its outcome.
    async fn settled<T: Send + Sync + 'static>(
        &self,
        key: &QueryKey,
        mut rx: watch::Receiver<u64>,
    ) -> Result<Arc<T>, QueryError> {
        loop {
            {
                let entries = self.entries();
                let entry = entries
                    .get(key)
                    .ok_or_else(|| QueryError::Abandoned(key.to_string()))?;
                match entry.status {
                    QueryStatus::Loading => {}
                    QueryStatus::Error => {
                        return Err(entry
                            .error
                            .clone()
                            .unwrap_or_else(|| QueryError::Fetch("unknown error".into())));
                    }
                    QueryStatus::Idle | QueryStatus::Success => {
                        let data = entry
                            .data
                            .clone()
                            .ok_or_else(|| QueryError::Abandoned(key.to_string()))?;
                        return downcast(key, data);
                    }
                }
            }
            rx.changed()
                .await
                .map_err(|_| QueryError::Abandoned(key.to_string()))?;
        }
    }
}

/// Shared, cheaply cloneable query cache handle.
#[derive(Clone)]
pub struct QueryCache {
    inner: Arc<Inner>,
}

impl fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryCache")
            .field("entries", &self.inner.entries().len())
            .field("config", &self.inner.config)
            .finish()
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

impl QueryCache {
    pub fn new(config: CacheConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: CacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Arc::new(Inner {
                entries: Mutex::new(HashMap::new()),
                next_fetch: AtomicU64::new(0),
                clock,
                config,
            }),
        }
    }

    /// Last-known value for `key`, fetching with `fetcher` when absent.
    ///
    /// When a value is cached it is returned immediately; if it is stale a
    /// background refetch is started (or the in-flight one reused). When no
    /// value is cached the call waits for the shared fetch to settle.
    pub async fn query<T, F, Fut, E>(&self, key: QueryKey, fetcher: F) -> Result<Arc<T>, QueryError>
    where
        T: Send + Sync + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: fmt::Display + Send + 'static,
    {
        let now = self.inner.clock.now();
        let (cached, stale) = {
            let mut entries = self.inner.entries();
            let entry = entries.entry(key.clone()).or_insert_with(Entry::new);
            entry.refetch = Some(erase(fetcher));
            (
                entry.data.clone(),
                entry.is_stale(now, self.inner.config.stale_time),
            )
        };

        match cached {
            Some(data) => {
                if stale {
                    self.inner.begin_fetch(&key);
                }
                downcast(&key, data)
            }
            None => self.await_fetch(&key).await,
        }
    }

    /// Fresh value for `key`: joins the in-flight fetch or starts a new one,
    /// regardless of staleness.
    pub async fn fetch<T, F, Fut, E>(&self, key: QueryKey, fetcher: F) -> Result<Arc<T>, QueryError>
    where
        T: Send + Sync + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: fmt::Display + Send + 'static,
    {
        {
            let mut entries = self.inner.entries();
            let entry = entries.entry(key.clone()).or_insert_with(Entry::new);
            entry.refetch = Some(erase(fetcher));
        }
        self.await_fetch(&key).await
    }

    async fn await_fetch<T: Send + Sync + 'static>(&self, key: &QueryKey) -> Result<Arc<T>, QueryError> {
        let rx = self
            .inner
            .begin_fetch(key)
            .ok_or_else(|| QueryError::Abandoned(key.to_string()))?;
        self.inner.settled(key, rx).await
    }

    /// Run a write, then mark every key covered by `invalidates` stale.
    ///
    /// Nothing is invalidated when the write fails.
    pub async fn mutate<R, E, F, Fut>(&self, mutation: F, invalidates: &[QueryKey]) -> Result<R, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<R, E>>,
    {
        let out = mutation().await?;
        for filter in invalidates {
            self.invalidate(filter);
        }
        Ok(out)
    }

    /// Mark every entry covered by `filter` stale and notify its subscribers.
    /// Entries with live subscribers are refetched right away. Returns the
    /// number of entries touched.
    pub fn invalidate(&self, filter: &QueryKey) -> usize {
        let mut refetch = Vec::new();
        let touched = {
            let mut entries = self.inner.entries();
            let mut touched = 0;
            for (key, entry) in entries.iter_mut().filter(|(k, _)| filter.matches(k)) {
                entry.invalidated = true;
                entry.epoch += 1;
                entry.notify();
                touched += 1;
                if entry.has_subscribers() && entry.refetch.is_some() {
                    refetch.push(key.clone());
                }
            }
            touched
        };

        tracing::debug!(%filter, touched, "queries invalidated");
        if tokio::runtime::Handle::try_current().is_ok() {
            for key in refetch {
                self.inner.begin_fetch(&key);
            }
        }
        touched
    }

    /// Seed or overwrite the cached value for `key` as freshly fetched.
    pub fn set_data<T: Send + Sync + 'static>(&self, key: QueryKey, value: T) {
        let now = self.inner.clock.now();
        let mut entries = self.inner.entries();
        let entry = entries.entry(key).or_insert_with(Entry::new);
        entry.data = Some(Arc::new(value));
        entry.error = None;
        entry.updated_at = Some(now);
        entry.invalidated = false;
        if entry.status != QueryStatus::Loading {
            entry.status = QueryStatus::Success;
        }
        entry.notify();
    }

    pub fn snapshot<T: Send + Sync + 'static>(
        &self,
        key: &QueryKey,
    ) -> Result<Option<QuerySnapshot<T>>, QueryError> {
        let now = self.inner.clock.now();
        let entries = self.inner.entries();
        let Some(entry) = entries.get(key) else {
            return Ok(None);
        };
        let data = match entry.data.clone() {
            Some(v) => Some(downcast(key, v)?),
            None => None,
        };
        Ok(Some(QuerySnapshot {
            status: entry.status,
            data,
            error: entry.error.clone(),
            updated_at: entry.updated_at,
            is_stale: entry.is_stale(now, self.inner.config.stale_time),
        }))
    }

    /// Status of `key`; unknown keys are `Idle`.
    pub fn status(&self, key: &QueryKey) -> QueryStatus {
        self.inner
            .entries()
            .get(key)
            .map(|e| e.status)
            .unwrap_or(QueryStatus::Idle)
    }

    /// Change notifications for `key`. The value is a counter bumped on every
    /// state change; read the state itself with [`snapshot`](Self::snapshot).
    ///
    /// Holding a receiver makes the entry "observed": invalidating it
    /// triggers an immediate refetch.
    pub fn subscribe(&self, key: QueryKey) -> watch::Receiver<u64> {
        let mut entries = self.inner.entries();
        entries
            .entry(key)
            .or_insert_with(Entry::new)
            .changes
            .subscribe()
    }

    /// Drop every entry. Waiters on in-flight fetches get `Abandoned`.
    pub fn clear(&self) {
        self.inner.entries().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use careboard_core::ManualClock;
    use chrono::TimeZone;
    use tokio::sync::Notify;

    type BoxedFetch = Pin<Box<dyn Future<Output = Result<Vec<u32>, String>> + Send>>;

    fn counting_fetcher(calls: Arc<AtomicUsize>) -> impl Fn() -> BoxedFetch + Send + Sync + 'static {
        move || -> BoxedFetch {
            let calls = calls.clone();
            Box::pin(async move {
                let n = calls.fetch_add(1, Ordering::SeqCst) as u32 + 1;
                tokio::time::sleep(std::time::Duration::from_millis(20)).await;
                Ok(vec![n])
            })
        }
    }

    fn pinned_clock() -> Arc<ManualClock> {
        Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 2, 5, 14, 30, 0).unwrap(),
        ))
    }

    async fn wait_for_status(cache: &QueryCache, key: &QueryKey, status: QueryStatus) {
        for _ in 0..100 {
            if cache.status(key) == status {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
        panic!("{key} never reached {status:?}");
    }

    #[test]
    fn key_filters_match_by_resource_and_optional_param() {
        let all_alerts = QueryKey::alerts(None);
        assert!(all_alerts.matches(&QueryKey::alerts(Some("critical"))));
        assert!(all_alerts.matches(&QueryKey::alerts(None)));
        assert!(!all_alerts.matches(&QueryKey::agents()));

        let critical = QueryKey::alerts(Some("critical"));
        assert!(critical.matches(&QueryKey::alerts(Some("critical"))));
        assert!(!critical.matches(&QueryKey::alerts(Some("high"))));
        assert!(!critical.matches(&QueryKey::alerts(None)));

        assert_eq!(QueryKey::agent("sentinel").to_string(), "agent:sentinel");
    }

    #[tokio::test]
    async fn concurrent_queries_share_one_fetch() {
        let cache = QueryCache::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let key = QueryKey::agents();

        let (a, b) = tokio::join!(
            cache.query(key.clone(), counting_fetcher(calls.clone())),
            cache.query(key.clone(), counting_fetcher(calls.clone())),
        );

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(*a.unwrap(), vec![1]);
        assert_eq!(*b.unwrap(), vec![1]);
        assert_eq!(cache.status(&key), QueryStatus::Success);
    }

    #[tokio::test]
    async fn fresh_entries_are_served_without_fetching() {
        let clock = pinned_clock();
        let cache = QueryCache::with_clock(
            CacheConfig {
                stale_time: Duration::minutes(5),
            },
            clock.clone(),
        );
        let calls = Arc::new(AtomicUsize::new(0));
        let key = QueryKey::processes();

        cache.query(key.clone(), counting_fetcher(calls.clone())).await.unwrap();
        clock.advance(Duration::minutes(1));
        let again = cache.query(key.clone(), counting_fetcher(calls.clone())).await.unwrap();

        assert_eq!(*again, vec![1]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.status(&key), QueryStatus::Success);
    }

    #[tokio::test]
    async fn stale_entries_return_old_value_and_revalidate_in_background() {
        let clock = pinned_clock();
        let cache = QueryCache::with_clock(
            CacheConfig {
                stale_time: Duration::minutes(5),
            },
            clock.clone(),
        );
        let calls = Arc::new(AtomicUsize::new(0));
        let key = QueryKey::personas();

        cache.query(key.clone(), counting_fetcher(calls.clone())).await.unwrap();
        clock.advance(Duration::minutes(6));

        let stale = cache.query(key.clone(), counting_fetcher(calls.clone())).await.unwrap();
        assert_eq!(*stale, vec![1]);
        assert_eq!(cache.status(&key), QueryStatus::Loading);

        wait_for_status(&cache, &key, QueryStatus::Success).await;
        let snap = cache.snapshot::<Vec<u32>>(&key).unwrap().unwrap();
        assert_eq!(*snap.data.unwrap(), vec![2]);
        assert!(!snap.is_stale);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failed_fetch_marks_error_without_retrying() {
        let cache = QueryCache::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let key = QueryKey::agent("oracle");

        let counted = calls.clone();
        let err = cache
            .query::<Vec<u32>, _, _, _>(key.clone(), move || {
                counted.fetch_add(1, Ordering::SeqCst);
                async { Err::<Vec<u32>, _>("API error (404): Agent not found") }
            })
            .await
            .unwrap_err();

        assert_eq!(
            err,
            QueryError::Fetch("API error (404): Agent not found".into())
        );
        assert_eq!(cache.status(&key), QueryStatus::Error);

        tokio::time::sleep(std::time::Duration::from_millis(30)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let snap = cache.snapshot::<Vec<u32>>(&key).unwrap().unwrap();
        assert!(snap.data.is_none());
        assert!(snap.is_stale);
    }

    #[tokio::test]
    async fn mutation_invalidates_only_after_success() {
        let cache = QueryCache::new(CacheConfig {
            stale_time: Duration::hours(1),
        });
        cache.set_data(QueryKey::alerts(None), vec![1u32]);
        cache.set_data(QueryKey::alerts(Some("critical")), vec![2u32]);
        cache.set_data(QueryKey::agents(), vec![3u32]);

        let failed: Result<(), &str> = cache
            .mutate(|| async { Err("boom") }, &[QueryKey::alerts(None)])
            .await;
        assert!(failed.is_err());
        let snap = cache.snapshot::<Vec<u32>>(&QueryKey::alerts(None)).unwrap().unwrap();
        assert!(!snap.is_stale);

        let observed_during = {
            let probe = cache.clone();
            cache
                .mutate(
                    || async move {
                        // Still fresh while the write is running.
                        let snap = probe
                            .snapshot::<Vec<u32>>(&QueryKey::alerts(Some("critical")))
                            .unwrap()
                            .unwrap();
                        Ok::<_, ()>(snap.is_stale)
                    },
                    &[QueryKey::alerts(None)],
                )
                .await
                .unwrap()
        };
        assert!(!observed_during);

        for key in [QueryKey::alerts(None), QueryKey::alerts(Some("critical"))] {
            let snap = cache.snapshot::<Vec<u32>>(&key).unwrap().unwrap();
            assert!(snap.is_stale, "{key} should be stale");
        }
        let agents = cache.snapshot::<Vec<u32>>(&QueryKey::agents()).unwrap().unwrap();
        assert!(!agents.is_stale);
    }

    #[tokio::test]
    async fn invalidation_refetches_observed_entries() {
        let cache = QueryCache::new(CacheConfig {
            stale_time: Duration::hours(1),
        });
        let calls = Arc::new(AtomicUsize::new(0));
        let key = QueryKey::alerts(None);

        cache.query(key.clone(), counting_fetcher(calls.clone())).await.unwrap();
        let mut rx = cache.subscribe(key.clone());

        assert_eq!(cache.invalidate(&QueryKey::alerts(None)), 1);
        rx.changed().await.unwrap();
        wait_for_status(&cache, &key, QueryStatus::Success).await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        let snap = cache.snapshot::<Vec<u32>>(&key).unwrap().unwrap();
        assert_eq!(*snap.data.unwrap(), vec![2]);
        assert!(!snap.is_stale);
    }

    #[tokio::test]
    async fn invalidation_during_fetch_keeps_entry_stale() {
        let cache = QueryCache::new(CacheConfig {
            stale_time: Duration::hours(1),
        });
        let gate = Arc::new(Notify::new());
        let key = QueryKey::processes();

        let released = gate.clone();
        let pending = {
            let cache = cache.clone();
            let key = key.clone();
            tokio::spawn(async move {
                cache
                    .query(key, move || {
                        let released = released.clone();
                        async move {
                            released.notified().await;
                            Ok::<_, String>(1u32)
                        }
                    })
                    .await
            })
        };

        wait_for_status(&cache, &key, QueryStatus::Loading).await;
        cache.invalidate(&key);
        gate.notify_one();

        assert_eq!(*pending.await.unwrap().unwrap(), 1);
        let snap = cache.snapshot::<u32>(&key).unwrap().unwrap();
        assert!(snap.is_stale);
    }

    #[tokio::test]
    async fn type_mismatch_is_reported() {
        let cache = QueryCache::default();
        cache.set_data(QueryKey::agents(), "not a list".to_string());
        let err = cache.snapshot::<Vec<u32>>(&QueryKey::agents()).unwrap_err();
        assert_eq!(err, QueryError::TypeMismatch("agents".into()));
    }

    #[tokio::test]
    async fn clear_abandons_waiters() {
        let cache = QueryCache::default();
        let key = QueryKey::agents();
        let waiter = {
            let cache = cache.clone();
            let key = key.clone();
            tokio::spawn(async move {
                cache
                    .query::<u32, _, _, _>(key, || async {
                        tokio::time::sleep(std::time::Duration::from_secs(60)).await;
                        Ok::<_, String>(1)
                    })
                    .await
            })
        };

        wait_for_status(&cache, &key, QueryStatus::Loading).await;
        cache.clear();
        assert_eq!(
            waiter.await.unwrap().unwrap_err(),
            QueryError::Abandoned("agents".into())
        );
    }

    #[tokio::test]
    async fn fetch_from_before_clear_does_not_settle_new_entry() {
        let cache = QueryCache::default();
        let key = QueryKey::agents();
        let gate = Arc::new(Notify::new());

        let first = {
            let cache = cache.clone();
            let key = key.clone();
            let gate = gate.clone();
            tokio::spawn(async move {
                cache
                    .query::<u32, _, _, _>(key, move || {
                        let gate = gate.clone();
                        async move {
                            gate.notified().await;
                            Ok::<_, String>(1)
                        }
                    })
                    .await
            })
        };
        wait_for_status(&cache, &key, QueryStatus::Loading).await;
        cache.clear();
        assert!(first.await.unwrap().is_err());

        let second = {
            let cache = cache.clone();
            let key = key.clone();
            tokio::spawn(async move {
                cache
                    .query::<u32, _, _, _>(key, || async {
                        tokio::time::sleep(std::time::Duration::from_millis(200)).await;
                        Ok::<_, String>(2)
                    })
                    .await
            })
        };
        wait_for_status(&cache, &key, QueryStatus::Loading).await;

        gate.notify_one();
        tokio::time::sleep(std::time::Duration::from_millis(30)).await;
        assert_eq!(cache.status(&key), QueryStatus::Loading);

        assert_eq!(*second.await.unwrap().unwrap(), 2);
        assert_eq!(cache.status(&key), QueryStatus::Success);
    }
}
