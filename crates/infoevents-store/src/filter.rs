//! Filter expressions over information event fields.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use infoevents_model::InfoRecord;

use crate::error::StoreError;
use crate::traits::RecordReader;

/// Trait for filtering records during iteration.
pub trait RecordFilter {
    /// Returns true if the record matches the filter criteria.
    fn matches(&self, record: &InfoRecord) -> bool;
}

/// Text fields a filter can match on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    /// Name of the originating element.
    ElementName,
    /// Parameter description.
    ParameterName,
    /// Displayed value.
    Value,
}

impl TextField {
    fn read(self, record: &InfoRecord) -> &str {
        match self {
            TextField::ElementName => &record.element_name,
            TextField::ParameterName => &record.parameter_name,
            TextField::Value => &record.value,
        }
    }

    fn label(self) -> &'static str {
        match self {
            TextField::ElementName => "ElementName",
            TextField::ParameterName => "ParameterName",
            TextField::Value => "Value",
        }
    }
}

/// Comparison operator for time leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// `==`
    Equal,
    /// `>`
    GreaterThan,
    /// `>=`
    GreaterThanOrEqual,
    /// `<`
    LessThan,
    /// `<=`
    LessThanOrEqual,
}

impl Comparison {
    fn holds<T: Ord>(self, left: &T, right: &T) -> bool {
        match self {
            Comparison::Equal => left == right,
            Comparison::GreaterThan => left > right,
            Comparison::GreaterThanOrEqual => left >= right,
            Comparison::LessThan => left < right,
            Comparison::LessThanOrEqual => left <= right,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            Comparison::Equal => "==",
            Comparison::GreaterThan => ">",
            Comparison::GreaterThanOrEqual => ">=",
            Comparison::LessThan => "<",
            Comparison::LessThanOrEqual => "<=",
        }
    }
}

/// Composable predicate over record fields.
///
/// Time leaves compare the arrival time normalized to UTC. `Contains` leaves
/// match case-insensitively. An empty `And` matches everything, an empty `Or`
/// matches nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterElement {
    /// Compare the arrival time against an instant.
    TimeOfArrival {
        /// Operator, with the record on the left.
        op: Comparison,
        /// Instant on the right.
        at: DateTime<Utc>,
    },
    /// Case-insensitive substring match on a text field.
    Contains {
        /// Field to search.
        field: TextField,
        /// Substring to look for.
        needle: String,
    },
    /// All children must match.
    And(Vec<FilterElement>),
    /// At least one child must match.
    Or(Vec<FilterElement>),
}

impl FilterElement {
    /// Arrival time leaf.
    pub fn time_of_arrival(op: Comparison, at: DateTime<Utc>) -> Self {
        FilterElement::TimeOfArrival { op, at }
    }

    /// Substring leaf.
    pub fn contains(field: TextField, needle: impl Into<String>) -> Self {
        FilterElement::Contains {
            field,
            needle: needle.into(),
        }
    }

    /// Combines with `other` using AND, flattening nested ANDs on the left.
    pub fn and(self, other: FilterElement) -> Self {
        match self {
            FilterElement::And(mut children) => {
                children.push(other);
                FilterElement::And(children)
            }
            left => FilterElement::And(vec![left, other]),
        }
    }

    /// Combines with `other` using OR, flattening nested ORs on the left.
    pub fn or(self, other: FilterElement) -> Self {
        match self {
            FilterElement::Or(mut children) => {
                children.push(other);
                FilterElement::Or(children)
            }
            left => FilterElement::Or(vec![left, other]),
        }
    }
}

impl RecordFilter for FilterElement {
    fn matches(&self, record: &InfoRecord) -> bool {
        match self {
            FilterElement::TimeOfArrival { op, at } => op.holds(&record.arrived_at_utc(), at),
            FilterElement::Contains { field, needle } => field
                .read(record)
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            FilterElement::And(children) => children.iter().all(|f| f.matches(record)),
            FilterElement::Or(children) => children.iter().any(|f| f.matches(record)),
        }
    }
}

impl fmt::Display for FilterElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterElement::TimeOfArrival { op, at } => write!(
                f,
                "TimeOfArrival {} {}",
                op.symbol(),
                at.to_rfc3339_opts(SecondsFormat::AutoSi, true)
            ),
            FilterElement::Contains { field, needle } => {
                write!(f, "{} CONTAINS '{}'", field.label(), needle)
            }
            FilterElement::And(children) => write_joined(f, children, " AND "),
            FilterElement::Or(children) => write_joined(f, children, " OR "),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, children: &[FilterElement], sep: &str) -> fmt::Result {
    for (idx, child) in children.iter().enumerate() {
        if idx > 0 {
            f.write_str(sep)?;
        }
        match child {
            FilterElement::And(_) | FilterElement::Or(_) => write!(f, "({})", child)?,
            leaf => write!(f, "{}", leaf)?,
        }
    }
    Ok(())
}

/// Reader that filters records from an underlying reader.
#[derive(Debug)]
pub struct FilteredReader<R: RecordReader, F: RecordFilter> {
    reader: R,
    filter: F,
}

impl<R: RecordReader, F: RecordFilter> FilteredReader<R, F> {
    /// Creates a new filtered reader.
    pub fn new(reader: R, filter: F) -> Self {
        Self { reader, filter }
    }
}

impl<R: RecordReader, F: RecordFilter> RecordReader for FilteredReader<R, F> {
    fn read_next(&mut self) -> Result<Option<InfoRecord>, StoreError> {
        loop {
            match self.reader.read_next()? {
                None => return Ok(None),
                Some(record) if self.filter.matches(&record) => return Ok(Some(record)),
                Some(_) => continue,
            }
        }
    }
}
