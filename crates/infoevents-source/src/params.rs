use chrono::{DateTime, Utc};

use crate::args::{ArgumentValue, ArgumentValues, FROM, SEARCH_TERM, UNTIL};
use crate::error::SourceError;

/// Parameters of one query session, captured once from the caller's arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParameters {
    /// Inclusive lower bound on arrival time.
    pub from: DateTime<Utc>,
    /// Exclusive upper bound on arrival time; unbounded when absent.
    pub until: Option<DateTime<Utc>>,
    /// Case-insensitive substring matched against parameter name and value.
    pub search_term: Option<String>,
}

impl QueryParameters {
    /// Parameters with only a lower bound.
    pub fn since(from: DateTime<Utc>) -> Self {
        Self {
            from,
            until: None,
            search_term: None,
        }
    }

    /// Sets the exclusive upper bound.
    pub fn until(mut self, until: DateTime<Utc>) -> Self {
        self.until = Some(until);
        self
    }

    /// Sets the search term.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search_term = Some(term.into());
        self
    }

    /// Search term, if one was given and is not blank.
    pub fn effective_search_term(&self) -> Option<&str> {
        self.search_term
            .as_deref()
            .filter(|term| !term.trim().is_empty())
    }

    /// Reads parameters from captured argument values.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::MissingArgument`] when `From` is absent and
    /// [`SourceError::InvalidArgument`] when a value has the wrong kind.
    pub fn from_arguments(values: &ArgumentValues) -> Result<Self, SourceError> {
        let from = match values.get(FROM) {
            Some(value) => timestamp(FROM, value)?,
            None => return Err(SourceError::MissingArgument(FROM)),
        };
        let until = values
            .get(UNTIL)
            .map(|value| timestamp(UNTIL, value))
            .transpose()?;
        let search_term = match values.get(SEARCH_TERM) {
            None => None,
            Some(ArgumentValue::Text(term)) => Some(term.clone()),
            Some(ArgumentValue::Timestamp(_)) => {
                return Err(kind_mismatch(SEARCH_TERM, "text"));
            }
        };

        Ok(Self {
            from,
            until,
            search_term,
        })
    }
}

fn timestamp(name: &str, value: &ArgumentValue) -> Result<DateTime<Utc>, SourceError> {
    match value {
        ArgumentValue::Timestamp(at) => Ok(*at),
        ArgumentValue::Text(_) => Err(kind_mismatch(name, "timestamp")),
    }
}

fn kind_mismatch(name: &str, expected: &str) -> SourceError {
    SourceError::InvalidArgument {
        name: name.to_string(),
        reason: format!("expected a {} value", expected),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use infoevents_model::parse_utc;

    #[test]
    fn reads_all_arguments() {
        let from = parse_utc("2025-01-01T00:00:00Z").unwrap();
        let until = parse_utc("2025-02-01T00:00:00Z").unwrap();
        let values = ArgumentValues::new()
            .with(FROM, ArgumentValue::Timestamp(from))
            .with(UNTIL, ArgumentValue::Timestamp(until))
            .with(SEARCH_TERM, ArgumentValue::Text("overload".into()));

        let params = QueryParameters::from_arguments(&values).unwrap();
        assert_eq!(params, QueryParameters::since(from).until(until).search("overload"));
    }

    #[test]
    fn from_is_required() {
        let err = QueryParameters::from_arguments(&ArgumentValues::new()).unwrap_err();
        assert!(matches!(err, SourceError::MissingArgument("From")));
    }

    #[test]
    fn wrong_kind_is_rejected() {
        let values = ArgumentValues::new().with(FROM, ArgumentValue::Text("yesterday".into()));
        assert!(matches!(
            QueryParameters::from_arguments(&values),
            Err(SourceError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn blank_search_term_is_ignored() {
        let params = QueryParameters::since(parse_utc("2025-01-01T00:00:00Z").unwrap()).search("  ");
        assert_eq!(params.effective_search_term(), None);
    }
}
