//! # Resource Store
//!
//! `ResourceStore<T, R>` keeps an ordered, observable, in-memory copy of one
//! remote collection and exposes create/read/update/delete. Every mutation is a
//! single round trip to the [`RemoteCollection`] followed by a local
//! reconciliation; the cache only changes after the remote call succeeded.
//!
//! ## Lifecycle
//!
//! ```text
//! Uninitialized --list()--> Loading --fetch done--> Ready
//! Ready --refresh()--> Loading --> Ready
//! Ready --create/update/delete--> Ready
//! ```
//!
//! There is no error phase. A failed call leaves the records as they were,
//! emits exactly one error [`Notification`] and returns the remote error to the
//! caller.
//!
//! ## Concurrency
//!
//! Calls are not queued, retried or deduplicated. Two updates for the same id
//! resolve in whatever order their responses arrive (last response wins). With
//! [`StoreConfig::discard_stale_responses`] set, every update/delete takes a
//! monotonic token per id and a response is applied locally only if no newer
//! request for that id was issued meanwhile.

use crate::entity::Resource;
use crate::error::{RemoteError, StoreError};
use crate::notify::{Notification, Notifier};
use crate::query::Query;
use crate::remote::RemoteCollection;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

/// Tunables shared by every store.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Request channel capacity for in-memory collection hosts.
    pub buffer_size: usize,
    /// Title of every failure notification.
    pub failure_title: String,
    /// Drop update/delete responses overtaken by a newer request for the same id.
    pub discard_stale_responses: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            buffer_size: 32,
            failure_title: "Request failed".to_string(),
            discard_stale_responses: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Loading,
    Ready,
}

/// Everything an observer sees: the phase and the cached records.
#[derive(Debug, Clone)]
pub struct StoreState<T> {
    pub phase: Phase,
    pub records: Vec<T>,
}

impl<T> StoreState<T> {
    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }
}

/// Result of [`ResourceStore::list`].
#[derive(Debug, Clone, PartialEq)]
pub struct Listing<T> {
    pub records: Vec<T>,
    pub loading: bool,
}

/// Mutation tokens for one id while any of its requests is outstanding.
#[derive(Debug, Default)]
struct Tokens {
    latest: u64,
    pending: usize,
}

struct Inner<T: Resource, R> {
    remote: R,
    notifier: Arc<dyn Notifier>,
    config: StoreConfig,
    query: Query,
    state: watch::Sender<StoreState<T>>,
    alive: AtomicBool,
    next_token: AtomicU64,
    in_flight: Mutex<HashMap<T::Id, Tokens>>,
}

/// In-memory reflection of one remote collection.
///
/// Cloning a store yields another handle to the same cache.
pub struct ResourceStore<T: Resource, R: RemoteCollection<T>> {
    inner: Arc<Inner<T, R>>,
}

impl<T: Resource, R: RemoteCollection<T>> Clone for ResourceStore<T, R> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Resource, R: RemoteCollection<T>> ResourceStore<T, R> {
    /// Store over the whole collection, listed by [`Resource::default_query`].
    pub fn new(remote: R, notifier: impl Notifier) -> Self {
        Self::with_config(remote, notifier, StoreConfig::default(), T::default_query())
    }

    pub fn with_config(remote: R, notifier: impl Notifier, config: StoreConfig, query: Query) -> Self {
        let (state, _) = watch::channel(StoreState {
            phase: Phase::Uninitialized,
            records: Vec::new(),
        });
        Self {
            inner: Arc::new(Inner {
                remote,
                notifier: Arc::new(notifier),
                config,
                query,
                state,
                alive: AtomicBool::new(true),
                next_token: AtomicU64::new(0),
                in_flight: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Direct access to the remote collection, for queries the cache does not cover.
    pub fn remote(&self) -> &R {
        &self.inner.remote
    }

    pub fn config(&self) -> &StoreConfig {
        &self.inner.config
    }

    pub fn phase(&self) -> Phase {
        self.inner.state.borrow().phase
    }

    /// Current cache without triggering a fetch.
    pub fn snapshot(&self) -> Listing<T> {
        let state = self.inner.state.borrow();
        Listing {
            records: state.records.clone(),
            loading: state.is_loading(),
        }
    }

    /// Cached record with the given id.
    pub fn find(&self, id: &T::Id) -> Option<T> {
        self.inner
            .state
            .borrow()
            .records
            .iter()
            .find(|r| r.id() == id)
            .cloned()
    }

    /// Watch every state transition.
    pub fn subscribe(&self) -> watch::Receiver<StoreState<T>> {
        self.inner.state.subscribe()
    }

    /// Tears the owning scope down. Calls still in flight return their result
    /// to the caller but no longer touch the cache or notify.
    pub fn close(&self) {
        self.inner.alive.store(false, Ordering::SeqCst);
    }

    pub fn is_closed(&self) -> bool {
        !self.inner.alive.load(Ordering::SeqCst)
    }

    /// Returns the cached records and whether a fetch is in flight.
    ///
    /// The first call performs the initial fetch-all. A failed fetch is
    /// reported through the notifier and leaves the last known records.
    pub async fn list(&self) -> Listing<T> {
        if self.is_closed() {
            return self.snapshot();
        }
        let first_use = self.inner.state.send_if_modified(|s| {
            if s.phase == Phase::Uninitialized {
                s.phase = Phase::Loading;
                true
            } else {
                false
            }
        });
        if first_use {
            // Failure already notified; list() never fails.
            let _ = self.fetch().await;
        }
        self.snapshot()
    }

    /// Re-fetches the collection.
    ///
    /// After [`close`](Self::close) the result is returned but the cache and
    /// phase are left alone.
    pub async fn refresh(&self) -> Result<Vec<T>, StoreError> {
        if !self.is_closed() {
            self.inner.state.send_modify(|s| s.phase = Phase::Loading);
        }
        self.fetch().await
    }

    #[instrument(skip(self), fields(collection = T::COLLECTION))]
    async fn fetch(&self) -> Result<Vec<T>, StoreError> {
        let result = self.inner.remote.select(self.inner.query.clone()).await;
        if self.is_closed() {
            debug!("Discarding fetch result after close");
            // A fetch torn down mid-flight must not leave the store loading.
            self.inner.state.send_if_modified(|s| {
                let loading = s.is_loading();
                if loading {
                    s.phase = Phase::Ready;
                }
                loading
            });
            return result.map_err(StoreError::from);
        }
        match result {
            Ok(records) => {
                let records = dedup_by_id(records);
                let size = records.len();
                self.inner.state.send_modify(|s| {
                    s.records = records.clone();
                    s.phase = Phase::Ready;
                });
                info!(size, "Fetched");
                Ok(records)
            }
            Err(e) => {
                self.inner.state.send_modify(|s| s.phase = Phase::Ready);
                self.fail(e)
            }
        }
    }

    /// Inserts a record and appends the server-returned row to the cache.
    #[instrument(skip(self), fields(collection = T::COLLECTION))]
    pub async fn create(&self, params: T::Create) -> Result<T, StoreError> {
        let record = match self.inner.remote.insert(params).await {
            Ok(record) => record,
            Err(e) => return self.fail(e),
        };
        if self.is_closed() {
            debug!("Discarding create result after close");
            return Ok(record);
        }

        let id = record.id().clone();
        let mut size = 0;
        self.inner.state.send_modify(|s| {
            match s.records.iter().position(|r| r.id() == &id) {
                Some(pos) => s.records[pos] = record.clone(),
                None => s.records.push(record.clone()),
            }
            size = s.records.len();
        });
        info!(%id, size, "Created");
        self.succeed("Record created", format!("{} {} created", T::COLLECTION, id));
        Ok(record)
    }

    /// Sends `patch` for `id` and replaces the cached row with the returned one.
    #[instrument(skip(self), fields(collection = T::COLLECTION))]
    pub async fn update(&self, id: T::Id, patch: T::Patch) -> Result<T, StoreError> {
        let token = self.issue_token(&id);
        let result = self.inner.remote.update(id.clone(), patch).await;
        let current = self.settle_token(&id, token);

        let record = match result {
            Ok(record) => record,
            Err(e) => return self.fail(e),
        };
        if self.is_closed() {
            debug!(%id, "Discarding update result after close");
            return Ok(record);
        }

        if current {
            // The returned row is complete, so merging it over the old one is a replacement.
            let applied = self.inner.state.send_if_modified(|s| {
                match s.records.iter_mut().find(|r| r.id() == &id) {
                    Some(slot) => {
                        *slot = record.clone();
                        true
                    }
                    None => false,
                }
            });
            if applied {
                info!(%id, "Updated");
            } else {
                debug!(%id, "Updated record is not cached");
            }
        } else {
            debug!(%id, token, "Discarding stale update response");
        }
        self.succeed("Record updated", format!("{} {} updated", T::COLLECTION, id));
        Ok(record)
    }

    /// Deletes `id` remotely and drops it from the cache.
    #[instrument(skip(self), fields(collection = T::COLLECTION))]
    pub async fn delete(&self, id: T::Id) -> Result<(), StoreError> {
        let token = self.issue_token(&id);
        let result = self.inner.remote.delete(id.clone()).await;
        let current = self.settle_token(&id, token);

        if let Err(e) = result {
            return self.fail(e);
        }
        if self.is_closed() {
            debug!(%id, "Discarding delete result after close");
            return Ok(());
        }

        if current {
            let mut size = 0;
            self.inner.state.send_if_modified(|s| {
                let before = s.records.len();
                s.records.retain(|r| r.id() != &id);
                size = s.records.len();
                size != before
            });
            info!(%id, size, "Deleted");
        } else {
            debug!(%id, token, "Discarding stale delete response");
        }
        self.succeed("Record deleted", format!("{} {} deleted", T::COLLECTION, id));
        Ok(())
    }

    fn issue_token(&self, id: &T::Id) -> u64 {
        if !self.inner.config.discard_stale_responses {
            return 0;
        }
        let token = self.inner.next_token.fetch_add(1, Ordering::SeqCst) + 1;
        let mut in_flight = self.inner.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        let tokens = in_flight.entry(id.clone()).or_default();
        tokens.latest = token;
        tokens.pending += 1;
        token
    }

    /// Marks the request holding `token` as answered and reports whether it
    /// is still the newest for `id`. The entry is dropped once nothing for
    /// `id` is outstanding.
    fn settle_token(&self, id: &T::Id, token: u64) -> bool {
        if !self.inner.config.discard_stale_responses {
            return true;
        }
        let mut in_flight = self.inner.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(tokens) = in_flight.get_mut(id) else {
            return true;
        };
        let current = tokens.latest == token;
        tokens.pending = tokens.pending.saturating_sub(1);
        if tokens.pending == 0 {
            in_flight.remove(id);
        }
        current
    }

    #[cfg(test)]
    fn tracked_ids(&self) -> usize {
        self.inner.in_flight.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn succeed(&self, title: &str, description: String) {
        self.inner
            .notifier
            .notify(Notification::success(title, description));
    }

    fn fail<V>(&self, e: RemoteError) -> Result<V, StoreError> {
        if self.is_closed() {
            debug!(error = %e, "Failure after close");
        } else {
            warn!(collection = T::COLLECTION, error = %e, "Remote call failed");
            self.inner.notifier.notify(Notification::error(
                self.inner.config.failure_title.clone(),
                e.to_string(),
            ));
        }
        Err(StoreError::from(e))
    }
}

/// Keeps the first occurrence of every id.
fn dedup_by_id<T: Resource>(records: Vec<T>) -> Vec<T> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|r| seen.insert(r.id().clone()))
        .collect()
}
