//! Keyed single-flight execution.
//!
//! The first caller for a key starts the work; every caller that arrives
//! while it runs awaits the same shared result instead of starting its own.
//! The key is released as soon as the work settles, so the next caller after
//! that starts a fresh flight.

use std::future::Future;
use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use tracing::{debug, warn};

type Flight<T> = Shared<BoxFuture<'static, Option<T>>>;

/// Deduplicates concurrent calls per key.
///
/// The work runs on its own task, detached from the caller that started it:
/// if that caller is cancelled the flight still completes for everyone else.
/// Joiners receive `None` only when the work panicked.
pub struct SingleFlight<T> {
    flights: Arc<DashMap<&'static str, Flight<T>>>,
}

impl<T> std::fmt::Debug for SingleFlight<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SingleFlight")
            .field("in_flight", &self.flights.len())
            .finish()
    }
}

impl<T> Default for SingleFlight<T> {
    fn default() -> Self {
        Self {
            flights: Arc::new(DashMap::new()),
        }
    }
}

impl<T> SingleFlight<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Creates an empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether work is currently running under `key`.
    pub fn is_in_flight(&self, key: &str) -> bool {
        self.flights.contains_key(key)
    }

    /// Runs `work` under `key`, or joins the flight already running there.
    ///
    /// `work` is only invoked by the caller that starts the flight.
    pub async fn run<F, Fut>(&self, key: &'static str, work: F) -> Option<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        // Lookup and insert happen under one shard lock.
        let flight = match self.flights.entry(key) {
            Entry::Occupied(entry) => {
                debug!(key, "Joining in-flight call");
                entry.get().clone()
            }
            Entry::Vacant(entry) => {
                let release = Release {
                    flights: Arc::clone(&self.flights),
                    key,
                };
                let fut = work();
                let handle = tokio::spawn(async move {
                    let _release = release;
                    fut.await
                });
                let flight = async move {
                    handle
                        .await
                        .map_err(|e| warn!(key, error = %e, "Single-flight task failed"))
                        .ok()
                }
                .boxed()
                .shared();
                entry.insert(flight.clone());
                flight
            }
        };

        flight.await
    }
}

/// Frees the key when the flight's task ends, including by panic.
///
/// Runs before any joiner observes the result, so a caller woken by the
/// result that immediately calls `run` again starts a new flight.
struct Release<T> {
    flights: Arc<DashMap<&'static str, Flight<T>>>,
    key: &'static str,
}

impl<T> Drop for Release<T> {
    fn drop(&mut self) {
        self.flights.remove(self.key);
    }
}
