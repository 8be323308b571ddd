//! Storage backend traits.
//!
//! A query session walks these in order: provider → connection → registry →
//! repository → query. Every level that owns server resources has an explicit
//! `dispose`.

use infoevents_model::InfoRecord;
use serde::{Deserialize, Serialize};

use crate::cookie::PagingCookie;
use crate::error::StoreError;
use crate::query::{QueryOptions, QueryRequest, RecordPage};

/// Sequential source of records.
pub trait RecordReader {
    /// Reads the next record, or `None` at the end.
    fn read_next(&mut self) -> Result<Option<InfoRecord>, StoreError>;
}

/// Table layout a registry is built against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableConfiguration {
    /// The system-wide tables.
    #[default]
    Global,
    /// A custom table set registered under a name.
    Named(String),
}

/// Hands out connections to the store.
pub trait ConnectionProvider {
    /// Connection type.
    type Connection: Connection;

    /// Opens a connection.
    fn get_connection(&self) -> Result<Self::Connection, StoreError>;
}

/// Open connection to the store.
pub trait Connection {
    /// Registry type built on this connection.
    type Registry: RepositoryRegistry;

    /// Builds a repository registry for the given table layout.
    fn build_registry(&self, table: &TableConfiguration) -> Result<Self::Registry, StoreError>;

    /// Closes the connection.
    fn dispose(&mut self) -> Result<(), StoreError>;
}

/// Registry of repositories available on a connection.
pub trait RepositoryRegistry {
    /// Information event repository type.
    type Repository: InfoRepository;

    /// Looks up the information event repository; `None` if the table layout
    /// has none.
    fn info_repository(&self) -> Option<Self::Repository>;

    /// Frees the registry.
    fn dispose(&mut self) -> Result<(), StoreError>;
}

/// Read access to information events.
pub trait InfoRepository {
    /// Query type.
    type Query: PagedQuery;

    /// Creates a read query.
    fn create_read_query(
        &self,
        request: QueryRequest,
        options: QueryOptions,
    ) -> Result<Self::Query, StoreError>;

    /// Frees the repository.
    fn dispose(&mut self) -> Result<(), StoreError>;
}

/// A query executed one page at a time.
pub trait PagedQuery {
    /// Sets the resume point for the next execution. The query takes
    /// ownership of the cookie and releases it once consumed.
    fn set_paging_cookie(&mut self, cookie: PagingCookie);

    /// Executes exactly one page.
    fn execute_paged(&mut self) -> Result<RecordPage, StoreError>;
}
