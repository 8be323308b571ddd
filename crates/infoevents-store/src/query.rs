//! Query requests, execution options and result pages.

use std::time::Duration;

use infoevents_model::InfoRecord;

use crate::cookie::PagingCookie;
use crate::filter::FilterElement;

/// Field a query can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    /// Arrival time (UTC), ties broken by tree id.
    TimeOfArrival,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Oldest first.
    Ascending,
    /// Newest first.
    Descending,
}

/// Ordering of a query's result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy {
    /// Field to order by.
    pub field: SortField,
    /// Direction.
    pub direction: SortDirection,
}

/// Shape of a read query: what to select, in which order, how many at most.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    /// Selection predicate.
    pub filter: FilterElement,
    /// Result ordering; ascending by arrival time when absent.
    pub order: Option<OrderBy>,
    /// Overall result cap across all pages.
    pub limit: Option<usize>,
}

impl QueryRequest {
    /// Selects every record matching `filter`.
    pub fn new(filter: FilterElement) -> Self {
        Self {
            filter,
            order: None,
            limit: None,
        }
    }

    /// Caps the total number of records served across all pages.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Orders newest first.
    pub fn order_by_descending(mut self, field: SortField) -> Self {
        self.order = Some(OrderBy {
            field,
            direction: SortDirection::Descending,
        });
        self
    }

    /// Orders oldest first.
    pub fn order_by_ascending(mut self, field: SortField) -> Self {
        self.order = Some(OrderBy {
            field,
            direction: SortDirection::Ascending,
        });
        self
    }
}

impl FilterElement {
    /// Starts a query over this filter with an overall result cap.
    pub fn limit(self, limit: usize) -> QueryRequest {
        QueryRequest::new(self).limit(limit)
    }
}

/// Execution options of a read query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    /// Records per page.
    pub page_size: usize,
    /// Ceiling for one page execution.
    pub timeout: Duration,
    /// When set, the query advances its own cursor and pages carry no cookie.
    pub auto_page: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            page_size: 1_000,
            timeout: Duration::from_secs(30),
            auto_page: true,
        }
    }
}

/// One executed page.
#[derive(Debug)]
pub struct RecordPage {
    /// Records in query order.
    pub records: Vec<InfoRecord>,
    /// Resume point for the next page, when the caller drives paging.
    pub paging_cookie: Option<PagingCookie>,
}
