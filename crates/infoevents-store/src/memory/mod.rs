//! In-memory backend.
//!
//! [`MemoryStore`] plays the part of the store server: it holds the records,
//! the cursor table behind paging cookies, and counters that let callers check
//! that every resource a session opened was given back. Fault hooks make the
//! failure paths of a session reachable without a real server.

mod cursor;
mod handles;

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use infoevents_model::InfoRecord;

use crate::cookie::{CookieToken, CursorRegistry};
use crate::error::StoreError;
use crate::traits::{ConnectionProvider, RecordReader};

use cursor::CursorEntry;
pub use handles::{MemoryConnection, MemoryQuery, MemoryRegistry, MemoryRepository};

/// Resource counters of a [`MemoryStore`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Connections handed out.
    pub connections_opened: usize,
    /// Connections disposed.
    pub connections_disposed: usize,
    /// Registries built.
    pub registries_built: usize,
    /// Registries disposed.
    pub registries_disposed: usize,
    /// Repositories handed out.
    pub repositories_opened: usize,
    /// Repositories disposed.
    pub repositories_disposed: usize,
    /// Page executions attempted.
    pub executions: usize,
    /// Cursor entries still referenced by at least one cookie.
    pub live_cursors: usize,
}

#[derive(Debug, Default)]
struct Faults {
    refuse_connections: Option<String>,
    fail_registry: Option<String>,
    hide_info_repository: bool,
    failing_executions: usize,
    latency: Duration,
}

#[derive(Debug, Default)]
struct StoreState {
    records: Vec<InfoRecord>,
    tables: BTreeSet<String>,
    cursors: HashMap<CookieToken, CursorEntry>,
    faults: Faults,
    stats: StoreStats,
}

#[derive(Debug, Default)]
struct Shared {
    state: Mutex<StoreState>,
}

impl Shared {
    fn lock(&self) -> Result<MutexGuard<'_, StoreState>, StoreError> {
        self.state
            .lock()
            .map_err(|_| StoreError::Unavailable("store state lock poisoned".to_string()))
    }
}

impl CursorRegistry for Shared {
    fn retain(&self, token: CookieToken) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        let entry = state
            .cursors
            .get_mut(&token)
            .ok_or(StoreError::UnknownCookie(token))?;
        entry.refs += 1;
        Ok(())
    }

    fn release(&self, token: CookieToken) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        let entry = state
            .cursors
            .get_mut(&token)
            .ok_or(StoreError::UnknownCookie(token))?;
        entry.refs -= 1;
        if entry.refs == 0 {
            state.cursors.remove(&token);
            tracing::trace!(%token, "cursor freed");
        }
        Ok(())
    }
}

/// Shared handle on an in-memory information event store.
///
/// Clones refer to the same store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    shared: Arc<Shared>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `records`.
    pub fn with_records(records: impl IntoIterator<Item = InfoRecord>) -> Result<Self, StoreError> {
        let store = Self::new();
        store.extend(records)?;
        Ok(store)
    }

    /// Adds records.
    pub fn extend(&self, records: impl IntoIterator<Item = InfoRecord>) -> Result<(), StoreError> {
        self.shared.lock()?.records.extend(records);
        Ok(())
    }

    /// Drains `reader` into the store and returns the number of records added.
    pub fn load<R: RecordReader>(&self, mut reader: R) -> Result<usize, StoreError> {
        let mut loaded = Vec::new();
        while let Some(record) = reader.read_next()? {
            loaded.push(record);
        }
        let count = loaded.len();
        self.extend(loaded)?;
        tracing::debug!(count, "records loaded into memory store");
        Ok(count)
    }

    /// Number of records held.
    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.shared.lock()?.records.len())
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    /// Registers a named table set that carries an information event table.
    pub fn add_table(&self, name: impl Into<String>) -> Result<(), StoreError> {
        self.shared.lock()?.tables.insert(name.into());
        Ok(())
    }

    /// Current resource counters.
    pub fn stats(&self) -> Result<StoreStats, StoreError> {
        let state = self.shared.lock()?;
        Ok(StoreStats {
            live_cursors: state.cursors.len(),
            ..state.stats
        })
    }

    /// Makes `get_connection` fail with `reason` (or succeed again with `None`).
    pub fn refuse_connections(&self, reason: Option<String>) -> Result<(), StoreError> {
        self.shared.lock()?.faults.refuse_connections = reason;
        Ok(())
    }

    /// Makes registry construction fail with `reason` (or succeed again with `None`).
    pub fn fail_registry(&self, reason: Option<String>) -> Result<(), StoreError> {
        self.shared.lock()?.faults.fail_registry = reason;
        Ok(())
    }

    /// Makes registries report no information event repository.
    pub fn hide_info_repository(&self, hidden: bool) -> Result<(), StoreError> {
        self.shared.lock()?.faults.hide_info_repository = hidden;
        Ok(())
    }

    /// Fails the next `count` page executions.
    pub fn fail_next_executions(&self, count: usize) -> Result<(), StoreError> {
        self.shared.lock()?.faults.failing_executions = count;
        Ok(())
    }

    /// Simulated execution time; executions whose timeout is shorter fail.
    pub fn set_latency(&self, latency: Duration) -> Result<(), StoreError> {
        self.shared.lock()?.faults.latency = latency;
        Ok(())
    }

    fn registry(&self) -> Arc<dyn CursorRegistry> {
        self.shared.clone()
    }
}

impl ConnectionProvider for MemoryStore {
    type Connection = MemoryConnection;

    fn get_connection(&self) -> Result<MemoryConnection, StoreError> {
        let mut state = self.shared.lock()?;
        if let Some(reason) = &state.faults.refuse_connections {
            return Err(StoreError::Unavailable(reason.clone()));
        }
        state.stats.connections_opened += 1;
        Ok(MemoryConnection::new(self.clone()))
    }
}
