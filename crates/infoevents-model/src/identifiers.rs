use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::validation::ValidationError;

fn tree_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(\d{1,10})/(\d{1,10})$").expect("invalid regex"))
}

/// Identifier of an information event inside the alarm tree of one agent.
///
/// Textual form is `<dma_id>/<id>`. Consumers treat it as opaque; ordering is
/// only used as a tie-breaker between events that arrived at the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TreeId {
    /// Agent that raised the event.
    pub dma_id: u32,
    /// Event identifier, unique per agent.
    pub id: u32,
}

impl TreeId {
    /// Creates an identifier from its two components.
    pub fn new(dma_id: u32, id: u32) -> Self {
        Self { dma_id, id }
    }

    /// Parses the `<dma_id>/<id>` form.
    pub fn parse(value: impl AsRef<str>) -> Result<Self, ValidationError> {
        let s = value.as_ref();
        let caps = tree_id_pattern()
            .captures(s)
            .ok_or_else(|| ValidationError::PatternMismatch {
                field: "TreeId",
                value: s.to_string(),
            })?;

        let component = |idx: usize, field: &'static str| {
            caps[idx].parse::<u32>().map_err(|_| ValidationError::OutOfRange {
                field,
                value: caps[idx].to_string(),
            })
        };

        Ok(Self {
            dma_id: component(1, "dma_id")?,
            id: component(2, "id")?,
        })
    }
}

impl fmt::Display for TreeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.dma_id, self.id)
    }
}

impl FromStr for TreeId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TreeId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<TreeId> for String {
    fn from(value: TreeId) -> Self {
        value.to_string()
    }
}
