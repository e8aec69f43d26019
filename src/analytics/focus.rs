//! Detailed breakdown for a single focus country

use crate::data::DisasterEvent;
use serde::Serialize;
use std::collections::BTreeMap;

/// Affected population per year for one disaster type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeSeries {
    pub disaster_type: String,
    /// (year, affected) sorted by year
    pub points: Vec<(i32, u64)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bubble {
    pub year: i32,
    pub disaster_type: String,
    pub deaths: u64,
    pub event_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FocusReport {
    pub iso: String,
    pub name: String,
    pub event_count: usize,
    pub affected_by_type: Vec<TypeSeries>,
    pub bubbles: Vec<Bubble>,
}

impl FocusReport {
    pub fn build(events: &[&DisasterEvent], iso: &str, name: &str) -> Self {
        let mut series: Vec<(String, BTreeMap<i32, u64>)> = Vec::new();
        let mut bubbles = Vec::new();

        for event in events {
            let Some(kind) = &event.disaster_type else {
                continue;
            };

            let idx = match series.iter().position(|(k, _)| k == kind) {
                Some(idx) => idx,
                None => {
                    series.push((kind.clone(), BTreeMap::new()));
                    series.len() - 1
                }
            };
            *series[idx].1.entry(event.start_year).or_insert(0) += event.affected();

            bubbles.push(Bubble {
                year: event.start_year,
                disaster_type: kind.clone(),
                deaths: event.deaths(),
                event_name: event.event_name.clone(),
            });
        }

        Self {
            iso: iso.to_string(),
            name: name.to_string(),
            event_count: events.len(),
            affected_by_type: series
                .into_iter()
                .map(|(disaster_type, by_year)| TypeSeries {
                    disaster_type,
                    points: by_year.into_iter().collect(),
                })
                .collect(),
            bubbles,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.event_count == 0
    }

    pub fn max_deaths(&self) -> u64 {
        self.bubbles.iter().map(|b| b.deaths).max().unwrap_or(0)
    }
}
