use chrono::{DateTime, Utc};
use infoevents_model::{InfoRecord, TreeId};

use crate::filter::RecordFilter;
use crate::query::{QueryRequest, SortDirection, SortField};

type SortKey = (DateTime<Utc>, TreeId);

fn sort_key(record: &InfoRecord, field: SortField) -> SortKey {
    match field {
        SortField::TimeOfArrival => (record.arrived_at_utc(), record.tree_id),
    }
}

/// Where the next page of a query starts.
///
/// Keyed on the last record served rather than an offset, so records added
/// between pages never shift the window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(super) struct Position {
    after: Option<SortKey>,
    served: usize,
}

/// Server-side cursor entry behind one or more paging cookies.
#[derive(Debug)]
pub(super) struct CursorEntry {
    pub(super) position: Position,
    pub(super) refs: usize,
}

impl CursorEntry {
    pub(super) fn new(position: Position) -> Self {
        Self { position, refs: 1 }
    }
}

/// Selects the page of `request` starting at `position`.
///
/// Returns the page and the position following it.
pub(super) fn select_page(
    records: &[InfoRecord],
    request: &QueryRequest,
    position: Position,
    page_size: usize,
) -> (Vec<InfoRecord>, Position) {
    let (field, direction) = request
        .order
        .map(|o| (o.field, o.direction))
        .unwrap_or((SortField::TimeOfArrival, SortDirection::Ascending));

    let remaining = request
        .limit
        .map_or(usize::MAX, |limit| limit.saturating_sub(position.served));
    let take = page_size.min(remaining);
    if take == 0 {
        return (Vec::new(), position);
    }

    let beyond = |key: &SortKey| match (position.after, direction) {
        (None, _) => true,
        (Some(last), SortDirection::Ascending) => *key > last,
        (Some(last), SortDirection::Descending) => *key < last,
    };

    let mut candidates: Vec<(SortKey, &InfoRecord)> = records
        .iter()
        .filter(|r| request.filter.matches(r))
        .map(|r| (sort_key(r, field), r))
        .filter(|(key, _)| beyond(key))
        .collect();

    candidates.sort_by(|(a, _), (b, _)| match direction {
        SortDirection::Ascending => a.cmp(b),
        SortDirection::Descending => b.cmp(a),
    });
    candidates.truncate(take);

    let next = Position {
        after: candidates.last().map(|(key, _)| *key).or(position.after),
        served: position.served + candidates.len(),
    };
    let page = candidates.into_iter().map(|(_, r)| r.clone()).collect();
    (page, next)
}
