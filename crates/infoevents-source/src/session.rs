use std::fmt;

use infoevents_store::{
    Connection, ConnectionProvider, InfoRepository, QueryOptions, QueryRequest,
    RepositoryRegistry, SortField, StoreError,
};

use crate::args::{ArgumentSpec, ArgumentValues, ARGUMENTS, FROM};
use crate::columns::{ColumnSpec, COLUMNS};
use crate::config::SessionConfig;
use crate::error::SourceError;
use crate::fetch::{Page, PageFetcher};
use crate::filter::build_filter;
use crate::params::QueryParameters;

type ConnectionOf<P> = <P as ConnectionProvider>::Connection;
type RegistryOf<P> = <ConnectionOf<P> as Connection>::Registry;
type RepositoryOf<P> = <RegistryOf<P> as RepositoryRegistry>::Repository;
type QueryOf<P> = <RepositoryOf<P> as InfoRepository>::Query;

/// Lifecycle phase of a [`QuerySession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Created, no provider yet.
    Uninitialized,
    /// Provider captured.
    Initialized,
    /// Store resources acquired and query built.
    Prepared,
    /// At least one page requested.
    Fetching,
    /// Preparation or a fetch failed; only teardown is allowed.
    Errored,
    /// Torn down.
    Destroyed,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionPhase::Uninitialized => "uninitialized",
            SessionPhase::Initialized => "initialized",
            SessionPhase::Prepared => "prepared",
            SessionPhase::Fetching => "fetching",
            SessionPhase::Errored => "errored",
            SessionPhase::Destroyed => "destroyed",
        };
        f.write_str(name)
    }
}

/// One query session: argument capture, preparation, paging and teardown.
///
/// Lifecycle calls are checked against the current [`SessionPhase`]; a call
/// out of order returns [`SourceError::InvalidState`] and leaves the session
/// unchanged. The session owns every store resource it acquires and gives
/// each back exactly once, on [`destroy`](QuerySession::destroy) or on drop.
pub struct QuerySession<P: ConnectionProvider> {
    config: SessionConfig,
    phase: SessionPhase,
    provider: Option<P>,
    parameters: Option<QueryParameters>,
    connection: Option<ConnectionOf<P>>,
    registry: Option<RegistryOf<P>>,
    repository: Option<RepositoryOf<P>>,
    fetcher: Option<PageFetcher<QueryOf<P>>>,
}

impl<P: ConnectionProvider> QuerySession<P> {
    /// Creates an uninitialized session.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::InvalidConfig`] if `config` fails validation.
    pub fn new(config: SessionConfig) -> Result<Self, SourceError> {
        config.validate()?;
        Ok(Self {
            config,
            phase: SessionPhase::Uninitialized,
            provider: None,
            parameters: None,
            connection: None,
            registry: None,
            repository: None,
            fetcher: None,
        })
    }

    /// Current phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Captured parameters, once arguments have been processed.
    pub fn parameters(&self) -> Option<&QueryParameters> {
        self.parameters.as_ref()
    }

    /// Declared input arguments.
    pub fn input_arguments(&self) -> &'static [ArgumentSpec] {
        &ARGUMENTS
    }

    /// Declared output columns.
    pub fn columns(&self) -> &'static [ColumnSpec] {
        &COLUMNS
    }

    /// Captures the connection provider. Performs no I/O.
    pub fn initialize(&mut self, provider: P) -> Result<(), SourceError> {
        self.expect_phase("initialize", &[SessionPhase::Uninitialized])?;
        self.provider = Some(provider);
        self.phase = SessionPhase::Initialized;
        Ok(())
    }

    /// Captures the query parameters. Allowed once, before preparation.
    pub fn process_arguments(&mut self, values: &ArgumentValues) -> Result<(), SourceError> {
        self.expect_phase("process arguments", &[SessionPhase::Initialized])?;
        if self.parameters.is_some() {
            return Err(SourceError::InvalidState {
                operation: "process arguments twice",
                phase: self.phase,
            });
        }
        self.parameters = Some(QueryParameters::from_arguments(values)?);
        Ok(())
    }

    /// Acquires store resources and builds the paged query.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Initialization`] if the connection, registry,
    /// repository or query cannot be obtained; the session is then
    /// [`Errored`](SessionPhase::Errored) and only teardown is allowed.
    pub fn prepare_fetch(&mut self) -> Result<(), SourceError> {
        self.expect_phase("prepare fetch", &[SessionPhase::Initialized])?;
        let parameters = self
            .parameters
            .clone()
            .ok_or(SourceError::MissingArgument(FROM))?;

        match self.acquire(&parameters) {
            Ok(fetcher) => {
                self.fetcher = Some(fetcher);
                self.phase = SessionPhase::Prepared;
                Ok(())
            }
            Err(err) => {
                tracing::error!(error = %err, "query session preparation failed");
                self.phase = SessionPhase::Errored;
                Err(err)
            }
        }
    }

    /// Fetches the next page.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Execution`] if the page cannot be fetched; the
    /// session is then [`Errored`](SessionPhase::Errored).
    pub fn next_page(&mut self) -> Result<Page, SourceError> {
        self.expect_phase(
            "next page",
            &[SessionPhase::Prepared, SessionPhase::Fetching],
        )?;
        let phase = self.phase;
        let fetcher = self.fetcher.as_mut().ok_or(SourceError::InvalidState {
            operation: "next page",
            phase,
        })?;

        self.phase = SessionPhase::Fetching;
        match fetcher.next_page() {
            Ok(page) => Ok(page),
            Err(err) => {
                tracing::error!(error = %err, "page fetch failed");
                self.phase = SessionPhase::Errored;
                Err(err)
            }
        }
    }

    /// Releases the connection, registry, repository and paging cookie, in
    /// that order. Parts never acquired are skipped; release failures are
    /// logged. Calling it again does nothing.
    pub fn destroy(&mut self) {
        if self.phase == SessionPhase::Destroyed {
            return;
        }

        if let Some(mut connection) = self.connection.take() {
            log_release("connection", connection.dispose());
        }
        if let Some(mut registry) = self.registry.take() {
            log_release("registry", registry.dispose());
        }
        if let Some(mut repository) = self.repository.take() {
            log_release("repository", repository.dispose());
        }
        if let Some(fetcher) = self.fetcher.take() {
            let pages = fetcher.pages_fetched();
            drop(fetcher.teardown());
            tracing::debug!(pages, "query session torn down");
        }

        self.provider = None;
        self.phase = SessionPhase::Destroyed;
    }

    fn acquire(
        &mut self,
        parameters: &QueryParameters,
    ) -> Result<PageFetcher<QueryOf<P>>, SourceError> {
        let provider = self.provider.as_ref().ok_or(SourceError::Initialization {
            context: "no connection provider",
            source: None,
        })?;

        let connection = self
            .connection
            .insert(provider.get_connection().map_err(init("open connection"))?);
        let registry = self.registry.insert(
            connection
                .build_registry(&self.config.table)
                .map_err(init("build repository registry"))?,
        );
        let repository = self.repository.insert(registry.info_repository().ok_or(
            SourceError::Initialization {
                context: "locate information event repository",
                source: None,
            },
        )?);

        let request = QueryRequest::new(build_filter(parameters))
            .order_by_descending(SortField::TimeOfArrival)
            .limit(self.config.limit);
        let options = QueryOptions {
            page_size: self.config.page_size,
            timeout: self.config.timeout(),
            auto_page: false,
        };
        let query = repository
            .create_read_query(request, options)
            .map_err(init("create read query"))?;

        Ok(PageFetcher::new(query))
    }

    fn expect_phase(
        &self,
        operation: &'static str,
        allowed: &[SessionPhase],
    ) -> Result<(), SourceError> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            Err(SourceError::InvalidState {
                operation,
                phase: self.phase,
            })
        }
    }
}

impl<P: ConnectionProvider> Drop for QuerySession<P> {
    fn drop(&mut self) {
        self.destroy();
    }
}

fn init(context: &'static str) -> impl FnOnce(StoreError) -> SourceError {
    move |source| SourceError::Initialization {
        context,
        source: Some(source),
    }
}

fn log_release(resource: &'static str, result: Result<(), StoreError>) {
    if let Err(err) = result {
        tracing::warn!(resource, error = %err, "failed to release store resource");
    }
}
