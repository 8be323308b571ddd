use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use infoevents_model::parse_utc;

use crate::error::SourceError;

/// Name of the lower bound argument.
pub const FROM: &str = "From";
/// Name of the upper bound argument.
pub const UNTIL: &str = "Until";
/// Name of the free-text search argument.
pub const SEARCH_TERM: &str = "Search term";

/// Value kind an argument accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentKind {
    /// RFC 3339 timestamp.
    Timestamp,
    /// Free text.
    Text,
}

impl fmt::Display for ArgumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgumentKind::Timestamp => f.pad("timestamp"),
            ArgumentKind::Text => f.pad("string"),
        }
    }
}

/// Declaration of one input argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgumentSpec {
    /// Name the caller supplies the value under.
    pub name: &'static str,
    /// Accepted value kind.
    pub kind: ArgumentKind,
    /// Whether the session refuses to start without it.
    pub required: bool,
}

/// Input arguments of a query session, in declaration order.
pub const ARGUMENTS: [ArgumentSpec; 3] = [
    ArgumentSpec {
        name: FROM,
        kind: ArgumentKind::Timestamp,
        required: true,
    },
    ArgumentSpec {
        name: UNTIL,
        kind: ArgumentKind::Timestamp,
        required: false,
    },
    ArgumentSpec {
        name: SEARCH_TERM,
        kind: ArgumentKind::Text,
        required: false,
    },
];

/// Looks up an argument declaration by name.
pub fn argument_spec(name: &str) -> Option<&'static ArgumentSpec> {
    ARGUMENTS.iter().find(|spec| spec.name == name)
}

/// A typed argument value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgumentValue {
    /// Timestamp, normalized to UTC.
    Timestamp(DateTime<Utc>),
    /// Text.
    Text(String),
}

/// Argument values supplied by the caller, keyed by argument name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentValues {
    values: BTreeMap<String, ArgumentValue>,
}

impl ArgumentValues {
    /// No values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a typed value.
    pub fn with(mut self, name: &str, value: ArgumentValue) -> Self {
        self.values.insert(name.to_string(), value);
        self
    }

    /// Parses `raw` according to the declaration of `name` and stores it.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::InvalidArgument`] for undeclared names and
    /// unparseable timestamps.
    pub fn parse(&mut self, name: &str, raw: &str) -> Result<(), SourceError> {
        let spec = argument_spec(name).ok_or_else(|| SourceError::InvalidArgument {
            name: name.to_string(),
            reason: "no such argument".to_string(),
        })?;

        let value = match spec.kind {
            ArgumentKind::Timestamp => {
                let at = parse_utc(raw).map_err(|err| SourceError::InvalidArgument {
                    name: name.to_string(),
                    reason: err.to_string(),
                })?;
                ArgumentValue::Timestamp(at)
            }
            ArgumentKind::Text => ArgumentValue::Text(raw.to_string()),
        };
        self.values.insert(spec.name.to_string(), value);
        Ok(())
    }

    /// Value supplied for `name`.
    pub fn get(&self, name: &str) -> Option<&ArgumentValue> {
        self.values.get(name)
    }

    /// Whether no values were supplied.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
