//! Resource binder: one card's fetch lifecycle
//!
//! A binder turns parameter changes into requests and folds the outcomes into
//! a [`ViewState`]. Requests run as Tokio tasks; each completion is tagged
//! with the generation it was issued under and posted back over a channel.
//! The binder applies a completion only if its generation is still current,
//! so a slow answer for an old key can never overwrite the state of a newer
//! one.
//!
//! ```text
//! set_params(p)
//!   key(p) == None        -> Idle, in-flight work aborted
//!   key == current, busy  -> nothing (one request per key)
//!   fresh cache entry     -> Loaded, no request
//!   otherwise             -> generation += 1, abort previous, Loading, spawn
//!
//! process_pending() / settle().await
//!   completion.generation != generation -> dropped (no state, no cache write)
//!   Ok(payload)                         -> Loaded, cached for the window
//!   Err(e)                              -> Failed(FAILURE_MESSAGE), last_error = e
//! ```
//!
//! Binder methods that fire requests must be called inside a Tokio runtime.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::cache::QueryCache;
use crate::client::{fetch_with_retry, Fetcher, RetryPolicy};
use crate::config::DashboardConfig;
use crate::envelope::unwrap_body;
use crate::error::FetchError;
use crate::query::{QueryKey, ResourceRequest};
use crate::resources::{Resource, TriggerMode};
use crate::view_state::{ViewEvent, ViewState, ViewStatus};

/// What a parameter change did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Key was empty; the card went back to `Idle`
    Cleared,
    /// The same key is already being fetched
    InFlight,
    /// Served from the cache without a request
    Cached,
    /// A new request went out
    Fired,
}

struct Completion<T> {
    generation: u64,
    key: QueryKey,
    outcome: Result<T, FetchError>,
}

pub struct ResourceBinder<R: Resource> {
    id: Uuid,
    fetcher: Arc<dyn Fetcher>,
    retry: RetryPolicy,
    freshness: Option<Duration>,
    cache: QueryCache<R::Payload>,
    state: ViewState<R::Payload>,
    params: Option<R::Params>,
    key: Option<QueryKey>,
    generation: u64,
    in_flight: Option<JoinHandle<()>>,
    tx: UnboundedSender<Completion<R::Payload>>,
    rx: UnboundedReceiver<Completion<R::Payload>>,
    last_error: Option<FetchError>,
}

impl<R: Resource> ResourceBinder<R> {
    pub fn new(fetcher: Arc<dyn Fetcher>, config: &DashboardConfig) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            id: Uuid::new_v4(),
            fetcher,
            retry: config.retry,
            freshness: config.freshness_for(R::NAME, R::DEFAULT_FRESHNESS),
            cache: QueryCache::new(),
            state: ViewState::Idle,
            params: None,
            key: None,
            generation: 0,
            in_flight: None,
            tx,
            rx,
            last_error: None,
        }
    }

    /// Fire the initial parameters of an on-mount resource. Input-gated
    /// resources stay `Idle` until [`set_params`](Self::set_params).
    pub fn mount(&mut self) -> Trigger {
        match (R::TRIGGER, R::initial_params()) {
            (TriggerMode::OnMount, Some(params)) => self.set_params(params),
            _ => Trigger::Cleared,
        }
    }

    pub fn set_params(&mut self, params: R::Params) -> Trigger {
        let key = R::key(&params);
        let request = R::request(&params);
        self.params = Some(params);

        let Some(key) = key else {
            self.supersede();
            self.key = None;
            self.last_error = None;
            self.transition(ViewEvent::Reset);
            debug!(resource = R::NAME, binder = %self.id, "empty key, idle");
            return Trigger::Cleared;
        };

        if self.key.as_ref() == Some(&key) && self.state.is_loading() {
            return Trigger::InFlight;
        }

        if let Some(hit) = self.cache.get(&key, Instant::now()).cloned() {
            debug!(resource = R::NAME, key = %key, binder = %self.id, "cache hit");
            self.supersede();
            self.key = Some(key);
            self.last_error = None;
            self.transition(ViewEvent::Fire);
            self.transition(ViewEvent::Resolve(hit));
            return Trigger::Cached;
        }

        self.key = Some(key.clone());
        self.fire(key, request);
        Trigger::Fired
    }

    /// Drop the cached answer for the current key and ask again. A refetch
    /// never joins the running request.
    pub fn refetch(&mut self) -> Trigger {
        let Some(params) = self.params.clone() else {
            return self.mount();
        };
        match self.key.clone() {
            Some(key) => {
                self.cache.invalidate(&key);
                self.fire(key, R::request(&params));
                Trigger::Fired
            }
            None => self.set_params(params),
        }
    }

    /// Apply every completion that has already arrived. Returns how many
    /// changed the state.
    pub fn process_pending(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(completion) = self.rx.try_recv() {
            if self.apply(completion) {
                applied += 1;
            }
        }
        applied
    }

    /// Wait until the current request (if any) has landed
    pub async fn settle(&mut self) -> &ViewState<R::Payload> {
        if let Some(handle) = self.in_flight.take() {
            if let Err(e) = handle.await {
                if e.is_panic() {
                    warn!(resource = R::NAME, binder = %self.id, "fetch task panicked");
                }
            }
        }
        self.process_pending();

        if self.state.is_loading() {
            // The task ended without reporting back
            self.transition(ViewEvent::Reject(R::FAILURE_MESSAGE.to_string()));
        }
        &self.state
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> &ViewState<R::Payload> {
        &self.state
    }

    pub fn status(&self) -> ViewStatus {
        self.state.status()
    }

    pub fn params(&self) -> Option<&R::Params> {
        self.params.as_ref()
    }

    pub fn key(&self) -> Option<&QueryKey> {
        self.key.as_ref()
    }

    /// Raw cause of the last failure. Not for display.
    pub fn last_error(&self) -> Option<&FetchError> {
        self.last_error.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn freshness(&self) -> Option<Duration> {
        self.freshness
    }

    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }

    fn fire(&mut self, key: QueryKey, request: ResourceRequest) {
        self.supersede();
        self.last_error = None;
        self.transition(ViewEvent::Fire);

        let generation = self.generation;
        let fetcher = Arc::clone(&self.fetcher);
        let retry = self.retry;
        let tx = self.tx.clone();

        let span = info_span!(
            "fetch",
            resource = R::NAME,
            key = %key,
            binder = %self.id,
            generation
        );

        self.in_flight = Some(tokio::spawn(
            async move {
                info!(request = %request, "fetching");
                let outcome = match fetch_with_retry(&*fetcher, &request, &retry).await {
                    Ok(body) => unwrap_body::<R::Payload>(R::NAME, body),
                    Err(e) => Err(e),
                };
                // Receiver gone means the binder was dropped
                let _ = tx.send(Completion {
                    generation,
                    key,
                    outcome,
                });
            }
            .instrument(span),
        ));
    }

    /// Invalidate whatever is in flight
    fn supersede(&mut self) {
        self.generation += 1;
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }

    fn apply(&mut self, completion: Completion<R::Payload>) -> bool {
        if completion.generation != self.generation {
            debug!(
                resource = R::NAME,
                key = %completion.key,
                binder = %self.id,
                stale = completion.generation,
                current = self.generation,
                "discarding stale completion"
            );
            return false;
        }
        self.in_flight = None;

        match completion.outcome {
            Ok(payload) => {
                if let Some(ttl) = self.freshness {
                    self.cache
                        .insert(completion.key, payload.clone(), ttl, Instant::now());
                }
                self.last_error = None;
                self.transition(ViewEvent::Resolve(payload));
            }
            Err(e) => {
                warn!(
                    resource = R::NAME,
                    key = %completion.key,
                    binder = %self.id,
                    error = %e,
                    class = ?e.class(),
                    "request failed"
                );
                self.last_error = Some(e);
                self.transition(ViewEvent::Reject(R::FAILURE_MESSAGE.to_string()));
            }
        }
        true
    }

    fn transition(&mut self, event: ViewEvent<R::Payload>) {
        let state = std::mem::take(&mut self.state);
        self.state = state.reduce(event);
    }
}

impl<R: Resource> Drop for ResourceBinder<R> {
    fn drop(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::resources::{Countries, Weather, WeatherQuery};
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Answers every request with the same body and counts calls
    struct Fixed {
        body: Value,
        calls: AtomicUsize,
    }

    impl Fixed {
        fn new(body: Value) -> Arc<Self> {
            Arc::new(Self {
                body,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl Fetcher for Fixed {
        async fn get_json(&self, _request: &ResourceRequest) -> Result<Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.body.clone())
        }
    }

    fn config() -> DashboardConfig {
        DashboardConfig::default().with_retry(RetryPolicy::none())
    }

    fn countries_body() -> Value {
        json!({ "data": { "countries": [{ "name": "Chile", "region": "Americas" }] } })
    }

    #[tokio::test]
    async fn test_input_gated_resource_stays_idle_on_mount() {
        let fetcher = Fixed::new(json!({}));
        let mut binder = ResourceBinder::<Weather>::new(fetcher.clone(), &config());

        assert_eq!(binder.mount(), Trigger::Cleared);
        assert!(binder.state().is_idle());
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_mount_loads_and_caches() {
        let fetcher = Fixed::new(countries_body());
        let mut binder = ResourceBinder::<Countries>::new(fetcher.clone(), &config());

        assert_eq!(binder.mount(), Trigger::Fired);
        assert!(binder.state().is_loading());
        binder.settle().await;

        assert_eq!(binder.status(), ViewStatus::Ready);
        assert_eq!(binder.cached_entries(), 1);

        // Same key again inside the window: no second request
        assert_eq!(binder.set_params(()), Trigger::Cached);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_refetch_bypasses_cache() {
        let fetcher = Fixed::new(countries_body());
        let mut binder = ResourceBinder::<Countries>::new(fetcher.clone(), &config());
        binder.mount();
        binder.settle().await;

        assert_eq!(binder.refetch(), Trigger::Fired);
        binder.settle().await;
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_stale_completion_is_discarded() {
        let fetcher = Fixed::new(countries_body());
        let mut binder = ResourceBinder::<Countries>::new(fetcher, &config());
        binder.mount();
        binder.settle().await;
        let loaded = binder.state().clone();

        let stale = Completion {
            generation: binder.generation() - 1,
            key: QueryKey::bare("countries"),
            outcome: Err(FetchError::Network("late".into())),
        };
        assert!(binder.tx.send(stale).is_ok());

        assert_eq!(binder.process_pending(), 0);
        assert_eq!(binder.state(), &loaded);
        assert!(binder.last_error().is_none());
    }

    #[tokio::test]
    async fn test_empty_key_returns_to_idle() {
        let fetcher = Fixed::new(json!({ "data": null }));
        let mut binder = ResourceBinder::<Weather>::new(fetcher, &config());

        assert_eq!(binder.set_params(WeatherQuery::new("Lima")), Trigger::Fired);
        let before = binder.generation();
        assert_eq!(binder.set_params(WeatherQuery::new("  ")), Trigger::Cleared);

        assert!(binder.state().is_idle());
        assert!(binder.key().is_none());
        assert!(binder.generation() > before);

        // Whatever the aborted request would have said never lands
        binder.settle().await;
        assert!(binder.state().is_idle());
    }

    #[tokio::test]
    async fn test_zero_freshness_override_disables_cache() {
        let fetcher = Fixed::new(countries_body());
        let config = config().with_freshness("countries", Duration::ZERO);
        let mut binder = ResourceBinder::<Countries>::new(fetcher.clone(), &config);

        assert_eq!(binder.freshness(), None);
        binder.mount();
        binder.settle().await;
        assert_eq!(binder.set_params(()), Trigger::Fired);
        binder.settle().await;
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
    }

    /// Never answers before `delay`; records whether the request ran to the end
    struct Stalled {
        delay: Duration,
        started: AtomicUsize,
        finished: AtomicUsize,
    }

    #[async_trait]
    impl Fetcher for Stalled {
        async fn get_json(&self, _request: &ResourceRequest) -> Result<Value> {
            self.started.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            self.finished.fetch_add(1, Ordering::SeqCst);
            Ok(countries_body())
        }
    }

    #[tokio::test]
    async fn test_drop_aborts_in_flight_request() {
        let fetcher = Arc::new(Stalled {
            delay: Duration::from_millis(200),
            started: AtomicUsize::new(0),
            finished: AtomicUsize::new(0),
        });
        let mut binder = ResourceBinder::<Countries>::new(fetcher.clone(), &config());
        assert_eq!(binder.mount(), Trigger::Fired);

        for _ in 0..100 {
            if fetcher.started.load(Ordering::SeqCst) > 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
        assert_eq!(fetcher.started.load(Ordering::SeqCst), 1);

        drop(binder);
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(fetcher.finished.load(Ordering::SeqCst), 0);
    }
}
