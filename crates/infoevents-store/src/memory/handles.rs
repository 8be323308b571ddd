use crate::cookie::{CookieToken, PagingCookie};
use crate::error::StoreError;
use crate::query::{QueryOptions, QueryRequest, RecordPage};
use crate::traits::{
    Connection, InfoRepository, PagedQuery, RepositoryRegistry, TableConfiguration,
};

use super::cursor::{select_page, CursorEntry, Position};
use super::MemoryStore;

/// Connection to a [`MemoryStore`].
#[derive(Debug)]
pub struct MemoryConnection {
    store: MemoryStore,
    disposed: bool,
}

impl MemoryConnection {
    pub(super) fn new(store: MemoryStore) -> Self {
        Self {
            store,
            disposed: false,
        }
    }
}

impl Connection for MemoryConnection {
    type Registry = MemoryRegistry;

    fn build_registry(&self, table: &TableConfiguration) -> Result<MemoryRegistry, StoreError> {
        if self.disposed {
            return Err(StoreError::Disposed {
                resource: "connection",
            });
        }

        let mut state = self.store.shared.lock()?;
        if let Some(reason) = &state.faults.fail_registry {
            return Err(StoreError::Registry(reason.clone()));
        }

        let has_info = !state.faults.hide_info_repository
            && match table {
                TableConfiguration::Global => true,
                TableConfiguration::Named(name) => state.tables.contains(name),
            };
        state.stats.registries_built += 1;

        Ok(MemoryRegistry {
            store: self.store.clone(),
            has_info,
            disposed: false,
        })
    }

    fn dispose(&mut self) -> Result<(), StoreError> {
        if self.disposed {
            return Err(StoreError::Disposed {
                resource: "connection",
            });
        }
        self.disposed = true;
        self.store.shared.lock()?.stats.connections_disposed += 1;
        Ok(())
    }
}

/// Repository registry on a [`MemoryConnection`].
#[derive(Debug)]
pub struct MemoryRegistry {
    store: MemoryStore,
    has_info: bool,
    disposed: bool,
}

impl RepositoryRegistry for MemoryRegistry {
    type Repository = MemoryRepository;

    fn info_repository(&self) -> Option<MemoryRepository> {
        if self.disposed || !self.has_info {
            return None;
        }
        let mut state = self.store.shared.lock().ok()?;
        state.stats.repositories_opened += 1;
        Some(MemoryRepository {
            store: self.store.clone(),
            disposed: false,
        })
    }

    fn dispose(&mut self) -> Result<(), StoreError> {
        if self.disposed {
            return Err(StoreError::Disposed {
                resource: "registry",
            });
        }
        self.disposed = true;
        self.store.shared.lock()?.stats.registries_disposed += 1;
        Ok(())
    }
}

/// Information event repository of a [`MemoryStore`].
#[derive(Debug)]
pub struct MemoryRepository {
    store: MemoryStore,
    disposed: bool,
}

impl InfoRepository for MemoryRepository {
    type Query = MemoryQuery;

    fn create_read_query(
        &self,
        request: QueryRequest,
        options: QueryOptions,
    ) -> Result<MemoryQuery, StoreError> {
        if self.disposed {
            return Err(StoreError::Disposed {
                resource: "repository",
            });
        }
        if options.page_size == 0 {
            return Err(StoreError::InvalidQuery("page size must be positive".into()));
        }
        Ok(MemoryQuery {
            store: self.store.clone(),
            request,
            options,
            resume: None,
        })
    }

    fn dispose(&mut self) -> Result<(), StoreError> {
        if self.disposed {
            return Err(StoreError::Disposed {
                resource: "repository",
            });
        }
        self.disposed = true;
        self.store.shared.lock()?.stats.repositories_disposed += 1;
        Ok(())
    }
}

/// Paged read query on a [`MemoryRepository`].
///
/// Holds at most one pending resume cookie. The cookie is consumed by the next
/// successful execution; a failed execution leaves it in place.
#[derive(Debug)]
pub struct MemoryQuery {
    store: MemoryStore,
    request: QueryRequest,
    options: QueryOptions,
    resume: Option<PagingCookie>,
}

impl MemoryQuery {
    /// Request this query executes.
    pub fn request(&self) -> &QueryRequest {
        &self.request
    }

    /// Execution options.
    pub fn options(&self) -> QueryOptions {
        self.options
    }

    fn run(&self) -> Result<(Vec<infoevents_model::InfoRecord>, CookieToken), StoreError> {
        let mut state = self.store.shared.lock()?;
        state.stats.executions += 1;

        if state.faults.failing_executions > 0 {
            state.faults.failing_executions -= 1;
            return Err(StoreError::Unavailable("execution fault injected".into()));
        }
        if state.faults.latency > self.options.timeout {
            return Err(StoreError::Timeout {
                elapsed: state.faults.latency,
                limit: self.options.timeout,
            });
        }

        let position = match self.resume.as_ref().map(PagingCookie::token) {
            None => Position::default(),
            Some(token) => {
                state
                    .cursors
                    .get(&token)
                    .ok_or(StoreError::UnknownCookie(token))?
                    .position
            }
        };

        let (records, next) =
            select_page(&state.records, &self.request, position, self.options.page_size);

        let token = CookieToken::generate();
        state.cursors.insert(token, CursorEntry::new(next));
        Ok((records, token))
    }
}

impl PagedQuery for MemoryQuery {
    fn set_paging_cookie(&mut self, cookie: PagingCookie) {
        if let Some(previous) = self.resume.replace(cookie) {
            if let Err(err) = previous.release() {
                tracing::warn!(error = %err, "failed to release replaced resume cookie");
            }
        }
    }

    fn execute_paged(&mut self) -> Result<RecordPage, StoreError> {
        // The state lock must be gone before any cookie is released.
        let (records, token) = self.run()?;
        tracing::debug!(records = records.len(), %token, "page executed");

        if let Some(consumed) = self.resume.take() {
            if let Err(err) = consumed.release() {
                tracing::warn!(error = %err, "failed to release consumed resume cookie");
            }
        }

        let cookie = PagingCookie::new(token, self.store.registry());
        if self.options.auto_page {
            self.resume = Some(cookie);
            return Ok(RecordPage {
                records,
                paging_cookie: None,
            });
        }

        Ok(RecordPage {
            records,
            paging_cookie: Some(cookie),
        })
    }
}

impl Drop for MemoryQuery {
    fn drop(&mut self) {
        if let Some(pending) = self.resume.take() {
            if let Err(err) = pending.release() {
                tracing::debug!(error = %err, "pending resume cookie already gone");
            }
        }
    }
}
