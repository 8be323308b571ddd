use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

/// Value type of an output column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Text.
    Text,
    /// UTC timestamp.
    Timestamp,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Text => f.pad("string"),
            ColumnKind::Timestamp => f.pad("timestamp"),
        }
    }
}

/// Declaration of one output column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    /// Column name.
    pub name: &'static str,
    /// Value type.
    pub kind: ColumnKind,
}

/// Output columns, in row order.
pub const COLUMNS: [ColumnSpec; 5] = [
    ColumnSpec {
        name: "Origin",
        kind: ColumnKind::Text,
    },
    ColumnSpec {
        name: "Type",
        kind: ColumnKind::Text,
    },
    ColumnSpec {
        name: "Value",
        kind: ColumnKind::Text,
    },
    ColumnSpec {
        name: "Time",
        kind: ColumnKind::Timestamp,
    },
    ColumnSpec {
        name: "ID",
        kind: ColumnKind::Text,
    },
];

/// One output row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputRow {
    /// Element the event came from.
    #[serde(rename = "Origin")]
    pub origin: String,
    /// Parameter the event is about.
    #[serde(rename = "Type")]
    pub kind: String,
    /// Displayed value.
    #[serde(rename = "Value")]
    pub value: String,
    /// Arrival time in UTC.
    #[serde(rename = "Time")]
    pub time: DateTime<Utc>,
    /// Tree id in `dma/id` form.
    #[serde(rename = "ID")]
    pub id: String,
}

/// A borrowed cell of an [`OutputRow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell<'a> {
    /// Text cell.
    Text(&'a str),
    /// Timestamp cell.
    Timestamp(DateTime<Utc>),
}

impl fmt::Display for Cell<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(text) => f.write_str(text),
            Cell::Timestamp(at) => f.write_str(&at.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
        }
    }
}

impl OutputRow {
    /// Cells in [`COLUMNS`] order.
    pub fn cells(&self) -> [Cell<'_>; 5] {
        [
            Cell::Text(&self.origin),
            Cell::Text(&self.kind),
            Cell::Text(&self.value),
            Cell::Timestamp(self.time),
            Cell::Text(&self.id),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_follow_column_kinds() {
        let row = OutputRow {
            origin: "Encoder 1".into(),
            kind: "CPU overload".into(),
            value: "97 %".into(),
            time: "2025-01-01T00:00:00Z".parse().unwrap(),
            id: "346/17".into(),
        };

        for (cell, column) in row.cells().iter().zip(COLUMNS.iter()) {
            let kind = match cell {
                Cell::Text(_) => ColumnKind::Text,
                Cell::Timestamp(_) => ColumnKind::Timestamp,
            };
            assert_eq!(kind, column.kind, "column {}", column.name);
        }
        assert_eq!(row.cells()[3].to_string(), "2025-01-01T00:00:00Z");
    }
}
