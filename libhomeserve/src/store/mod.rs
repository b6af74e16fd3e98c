//! The store: one state tree, one way to change it
//!
//! `Store` owns the [`RootState`] snapshot, the [`ApiClient`] and the
//! persistence backend. Consumers read with [`Store::state`], write with
//! [`Store::dispatch`] or an async action (`store.login(..)`,
//! `store.fetch_bookings()`, ...), and watch with [`Store::subscribe`].
//!
//! # Concurrency
//!
//! Reducers run to completion under a write lock; async actions only suspend
//! while their request is in flight, and the lock is never held across that
//! wait. Nothing serializes async actions against each other: two concurrent
//! `fetch_bookings` calls both settle and the later settlement wins. Callers
//! that must not double-submit should check `loading` first.
//!
//! # Example
//!
//! ```no_run
//! use libhomeserve::{Config, Store};
//!
//! # async fn example() -> libhomeserve::Result<()> {
//! let store = Store::from_config(&Config::load()?)?;
//! let mut updates = store.subscribe();
//!
//! store.fetch_bookings().await?;
//! println!("{} bookings", store.state().booking.bookings().len());
//!
//! while let Ok(snapshot) = updates.try_recv() {
//!     println!("loading: {}", snapshot.booking.status.loading);
//! }
//! # Ok(())
//! # }
//! ```

pub mod persist;
pub mod state;

use std::future::Future;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::broadcast;

use crate::api::http::HttpTransport;
use crate::api::{ApiClient, Transport};
use crate::config::Config;
use crate::error::{ActionError, Result};
use crate::slices::Phase;

pub use persist::{FileStorage, MemoryStorage, PersistedState, StateStorage};
pub use state::{reduce, Action, RootState};

/// Snapshots buffered per subscriber before the oldest are dropped
const EVENT_CAPACITY: usize = 64;

pub type StateReceiver = broadcast::Receiver<Arc<RootState>>;

pub struct Store {
    state: RwLock<Arc<RootState>>,
    api: ApiClient,
    storage: Box<dyn StateStorage>,
    events: broadcast::Sender<Arc<RootState>>,
}

impl Store {
    /// Build a store, restoring the persisted auth/user partitions from
    /// `storage`. Restoration problems are logged and never fail construction.
    pub fn new(transport: Arc<dyn Transport>, storage: Box<dyn StateStorage>) -> Self {
        let state = persist::rehydrate(storage.as_ref());
        let api = ApiClient::new(transport);
        api.set_token(state.auth.token.clone());
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Self {
            state: RwLock::new(Arc::new(state)),
            api,
            storage,
            events,
        }
    }

    /// Store with nothing persisted beyond the process
    pub fn in_memory(transport: Arc<dyn Transport>) -> Self {
        Self::new(transport, Box::new(MemoryStorage::new()))
    }

    /// HTTP transport and file persistence as described by `config`
    pub fn from_config(config: &Config) -> Result<Self> {
        let transport = HttpTransport::new(&config.api)?;
        let storage = FileStorage::new(config.resolve_state_path());
        Ok(Self::new(Arc::new(transport), Box::new(storage)))
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Current immutable snapshot
    pub fn state(&self) -> Arc<RootState> {
        Arc::clone(&self.state.read())
    }

    /// Read one value out of the current snapshot
    pub fn select<R>(&self, selector: impl FnOnce(&RootState) -> R) -> R {
        selector(&self.state.read())
    }

    /// Receive every new snapshot produced after this call
    pub fn subscribe(&self) -> StateReceiver {
        self.events.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.events.receiver_count()
    }

    /// Apply one action. This is the only way the state tree changes.
    ///
    /// When the auth or user data changes, the snapshot is saved while the
    /// write lock is still held, so the stored snapshot always matches the
    /// latest state. The save is blocking I/O (a small JSON write and a
    /// rename for [`FileStorage`]) and runs on the calling thread. It is a
    /// short write that only happens on sign-in, sign-out and profile changes.
    pub fn dispatch(&self, action: impl Into<Action>) {
        let action = action.into();
        tracing::debug!(
            action = action.name(),
            phase = action.phase().unwrap_or("-"),
            "dispatch"
        );

        let mut current = self.state.write();
        let previous = Arc::clone(&current);
        let next = Arc::new(reduce(RootState::clone(&previous), action));
        *current = Arc::clone(&next);

        if previous.auth.token != next.auth.token {
            self.api.set_token(next.auth.token.clone());
        }

        let snapshot = PersistedState::capture(&next);
        if snapshot != PersistedState::capture(&previous) {
            if let Err(error) = persist::persist(self.storage.as_ref(), &snapshot) {
                tracing::warn!(%error, "failed to persist state");
            }
        }

        // No subscribers is fine
        let _ = self.events.send(next);
    }

    /// Run one remote call through the requested / succeeded / failed
    /// lifecycle of the action built by `wrap`.
    ///
    /// The outcome is reduced into the owning slice and also handed back to
    /// the caller.
    pub async fn run<T, A, W, F>(&self, wrap: W, call: F) -> std::result::Result<T, ActionError>
    where
        T: Clone,
        A: Into<Action>,
        W: Fn(Phase<T>) -> A,
        F: Future<Output = std::result::Result<T, ActionError>>,
    {
        self.dispatch(wrap(Phase::Requested));
        match call.await {
            Ok(value) => {
                self.dispatch(wrap(Phase::Succeeded(value.clone())));
                Ok(value)
            }
            Err(error) => {
                let action: Action = wrap(Phase::Failed(error.clone())).into();
                tracing::warn!(action = action.name(), %error, "action failed");
                self.dispatch(action);
                Err(error)
            }
        }
    }

    /// Drop the persisted snapshot. The in-memory state is left as is.
    pub fn purge_persisted(&self) -> Result<()> {
        self.storage.clear()?;
        Ok(())
    }
}
