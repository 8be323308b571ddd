use chrono::SecondsFormat;
use infoevents_store::{Comparison, FilterElement, TextField};

use crate::params::QueryParameters;

/// Builds the store filter for a session.
///
/// The time range is `[from, until)`, open ended when `until` is absent. A
/// non-blank search term adds a case-insensitive match on parameter name or
/// value. An inverted range is passed through and selects nothing.
pub fn build_filter(params: &QueryParameters) -> FilterElement {
    let from = params.from.to_rfc3339_opts(SecondsFormat::AutoSi, true);
    let mut filter = FilterElement::time_of_arrival(Comparison::GreaterThanOrEqual, params.from);

    match params.until {
        Some(until) => {
            tracing::info!(
                "querying information events from {} until {}",
                from,
                until.to_rfc3339_opts(SecondsFormat::AutoSi, true)
            );
            filter = filter.and(FilterElement::time_of_arrival(Comparison::LessThan, until));
        }
        None => tracing::info!("querying information events from {} onwards", from),
    }

    if let Some(term) = params.effective_search_term() {
        filter = filter.and(
            FilterElement::contains(TextField::ParameterName, term)
                .or(FilterElement::contains(TextField::Value, term)),
        );
    }

    filter
}
