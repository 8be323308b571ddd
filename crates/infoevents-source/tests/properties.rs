use chrono::{DateTime, Duration, FixedOffset, Utc};
use infoevents_model::{parse_utc, InfoRecord, TreeId};
use infoevents_source::{
    ArgumentValue, ArgumentValues, QuerySession, SessionConfig, FROM, SEARCH_TERM, UNTIL,
};
use infoevents_store::MemoryStore;
use proptest::prelude::*;

const PARAMETERS: [&str; 4] = ["CPU overload", "Fan speed", "Memory OVERLOAD", "Link state"];
const VALUES: [&str; 4] = ["ok", "overload", "1200 rpm", "fan failure"];

fn base() -> DateTime<Utc> {
    parse_utc("2025-01-01T00:00:00Z").unwrap()
}

#[derive(Clone, Debug)]
struct Seed {
    minute: i64,
    offset_hours: i32,
    parameter: usize,
    value: usize,
}

fn arb_seed() -> impl Strategy<Value = Seed> {
    (0i64..120, -5i32..=5, 0usize..4, 0usize..4).prop_map(|(minute, offset_hours, parameter, value)| {
        Seed {
            minute,
            offset_hours,
            parameter,
            value,
        }
    })
}

fn arb_term() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some("overload".to_string())),
        Just(Some("FAN".to_string())),
        Just(Some("  ".to_string())),
    ]
}

fn build(seeds: &[Seed]) -> Vec<InfoRecord> {
    seeds
        .iter()
        .enumerate()
        .map(|(idx, seed)| {
            let offset = FixedOffset::east_opt(seed.offset_hours * 3600).unwrap();
            InfoRecord {
                element_name: format!("Element {}", idx),
                parameter_name: PARAMETERS[seed.parameter].to_string(),
                value: VALUES[seed.value].to_string(),
                time_of_arrival: (base() + Duration::minutes(seed.minute)).with_timezone(&offset),
                tree_id: TreeId::new(7, idx as u32),
            }
        })
        .collect()
}

fn expected(
    records: &[InfoRecord],
    from: DateTime<Utc>,
    until: Option<DateTime<Utc>>,
    term: Option<&str>,
) -> Vec<String> {
    let term = term.filter(|t| !t.trim().is_empty()).map(str::to_lowercase);
    let mut selected: Vec<&InfoRecord> = records
        .iter()
        .filter(|r| r.arrived_at_utc() >= from)
        .filter(|r| until.map_or(true, |until| r.arrived_at_utc() < until))
        .filter(|r| match &term {
            None => true,
            Some(term) => {
                r.parameter_name.to_lowercase().contains(term)
                    || r.value.to_lowercase().contains(term)
            }
        })
        .collect();
    selected.sort_by(|a, b| (b.arrived_at_utc(), b.tree_id).cmp(&(a.arrived_at_utc(), a.tree_id)));
    selected.iter().map(|r| r.tree_id.to_string()).collect()
}

proptest! {
    #[test]
    fn pages_concatenate_to_ordered_result_set(
        seeds in prop::collection::vec(arb_seed(), 0..40),
        from_minute in 0i64..120,
        until_minute in prop::option::of(0i64..140),
        term in arb_term(),
        page_size in 1usize..7,
    ) {
        let records = build(&seeds);
        let store = MemoryStore::with_records(records.clone()).unwrap();

        let from = base() + Duration::minutes(from_minute);
        let until = until_minute.map(|m| base() + Duration::minutes(m));

        let mut values = ArgumentValues::new().with(FROM, ArgumentValue::Timestamp(from));
        if let Some(until) = until {
            values = values.with(UNTIL, ArgumentValue::Timestamp(until));
        }
        if let Some(term) = &term {
            values = values.with(SEARCH_TERM, ArgumentValue::Text(term.clone()));
        }

        let config = SessionConfig { page_size, ..SessionConfig::default() };
        let mut session = QuerySession::new(config).unwrap();
        session.initialize(store.clone()).unwrap();
        session.process_arguments(&values).unwrap();
        session.prepare_fetch().unwrap();

        let mut served = Vec::new();
        let mut pages = 0;
        loop {
            let page = session.next_page().unwrap();
            pages += 1;
            prop_assert!(page.rows.len() <= page_size);
            prop_assert_eq!(page.has_next_page, !page.rows.is_empty());
            if !page.has_next_page {
                break;
            }
            served.extend(page.rows.into_iter().map(|row| row.id));
        }
        session.destroy();

        let want = expected(&records, from, until, term.as_deref());
        prop_assert_eq!(pages, want.len().div_ceil(page_size) + 1);
        prop_assert_eq!(served, want);

        let stats = store.stats().unwrap();
        prop_assert_eq!(stats.live_cursors, 0);
        prop_assert_eq!(stats.connections_disposed, 1);
        prop_assert_eq!(stats.registries_disposed, 1);
        prop_assert_eq!(stats.repositories_disposed, 1);
    }
}
