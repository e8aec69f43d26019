//! Per-year occurrence and death totals behind the decoupling chart

use crate::data::DisasterEvent;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearlyStat {
    pub year: i32,
    /// Events with a known disaster type
    pub occurrences: u64,
    pub deaths: u64,
}

/// Aggregate by start year, ascending
pub fn yearly_stats(events: &[&DisasterEvent]) -> Vec<YearlyStat> {
    let mut by_year: BTreeMap<i32, YearlyStat> = BTreeMap::new();

    for event in events {
        let stat = by_year.entry(event.start_year).or_insert(YearlyStat {
            year: event.start_year,
            occurrences: 0,
            deaths: 0,
        });
        if event.disaster_type.is_some() {
            stat.occurrences += 1;
        }
        stat.deaths += event.deaths();
    }

    by_year.into_values().collect()
}
