use infoevents_store::PagedQuery;

use crate::columns::OutputRow;
use crate::cursor::CursorManager;
use crate::error::SourceError;
use crate::mapper::map_record;

/// One page of output rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Rows in query order.
    pub rows: Vec<OutputRow>,
    /// False exactly when `rows` is empty; the first such page ends the feed.
    pub has_next_page: bool,
}

/// Drives a prepared query one page at a time.
#[derive(Debug)]
pub struct PageFetcher<Q: PagedQuery> {
    query: Q,
    cursor: CursorManager,
    pages: usize,
}

impl<Q: PagedQuery> PageFetcher<Q> {
    /// Wraps a prepared query. No cookie is held until the first page.
    pub fn new(query: Q) -> Self {
        let mut cursor = CursorManager::new();
        cursor.prepare();
        Self {
            query,
            cursor,
            pages: 0,
        }
    }

    /// Fetches the next page.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Execution`] if the resume point cannot be
    /// applied or the query fails. No rows are returned in that case.
    pub fn next_page(&mut self) -> Result<Page, SourceError> {
        self.cursor
            .resume_into(&mut self.query)
            .map_err(|source| SourceError::Execution {
                operation: "apply paging cookie",
                source,
            })?;

        let page = self
            .query
            .execute_paged()
            .map_err(|source| SourceError::Execution {
                operation: "execute query page",
                source,
            })?;
        self.cursor.advance(page.paging_cookie);

        let rows: Vec<OutputRow> = page.records.iter().map(map_record).collect();
        self.pages += 1;
        tracing::debug!(page = self.pages, rows = rows.len(), "page fetched");

        Ok(Page {
            has_next_page: !rows.is_empty(),
            rows,
        })
    }

    /// Number of pages fetched so far.
    pub fn pages_fetched(&self) -> usize {
        self.pages
    }

    /// Releases the held cookie and gives back the query.
    pub fn teardown(mut self) -> Q {
        self.cursor.teardown();
        self.query
    }
}
