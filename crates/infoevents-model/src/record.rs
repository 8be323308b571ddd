use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::identifiers::TreeId;

/// An information event as held by the backing store.
///
/// Records are read-only for every consumer; only the store creates them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoRecord {
    /// Name of the element that produced the event ("Origin").
    pub element_name: String,
    /// Parameter description ("Type").
    pub parameter_name: String,
    /// Event value as displayed.
    pub value: String,
    /// Arrival time, with the offset the agent reported.
    pub time_of_arrival: DateTime<FixedOffset>,
    /// Alarm tree identifier.
    pub tree_id: TreeId,
}

impl InfoRecord {
    /// Arrival time normalized to UTC.
    pub fn arrived_at_utc(&self) -> DateTime<Utc> {
        self.time_of_arrival.with_timezone(&Utc)
    }
}
