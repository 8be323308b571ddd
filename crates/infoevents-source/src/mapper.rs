use infoevents_model::InfoRecord;

use crate::columns::OutputRow;

/// Projects a store record into an output row, normalizing its time to UTC.
pub fn map_record(record: &InfoRecord) -> OutputRow {
    OutputRow {
        origin: record.element_name.clone(),
        kind: record.parameter_name.clone(),
        value: record.value.clone(),
        time: record.arrived_at_utc(),
        id: record.tree_id.to_string(),
    }
}
