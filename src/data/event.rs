use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// EM-DAT export column names
pub const COL_START_YEAR: &str = "Start Year";
pub const COL_GROUP: &str = "Disaster Group";
pub const COL_TYPE: &str = "Disaster Type";
pub const COL_COUNTRY: &str = "Country";
pub const COL_ISO: &str = "ISO";
pub const COL_EVENT_NAME: &str = "Event Name";
pub const COL_DEATHS: &str = "Total Deaths";
pub const COL_AFFECTED: &str = "Total Affected";
pub const COL_DAMAGE: &str = "Total Damage ('000 US$)";

/// A single disaster record, reduced to the columns the dashboard reads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisasterEvent {
    pub start_year: i32,
    pub disaster_group: Option<String>,
    pub disaster_type: Option<String>,
    pub country: Option<String>,
    pub iso: Option<String>,
    pub event_name: Option<String>,
    pub total_deaths: Option<u64>,
    pub total_affected: Option<u64>,
    /// Thousands of US dollars
    pub total_damage: Option<Decimal>,
}

impl DisasterEvent {
    pub fn new(start_year: i32) -> Self {
        Self {
            start_year,
            disaster_group: None,
            disaster_type: None,
            country: None,
            iso: None,
            event_name: None,
            total_deaths: None,
            total_affected: None,
            total_damage: None,
        }
    }

    pub fn deaths(&self) -> u64 {
        self.total_deaths.unwrap_or(0)
    }

    pub fn affected(&self) -> u64 {
        self.total_affected.unwrap_or(0)
    }

    pub fn damage(&self) -> Decimal {
        self.total_damage.unwrap_or(Decimal::ZERO)
    }

    pub fn in_group(&self, groups: &[String]) -> bool {
        self.disaster_group
            .as_ref()
            .map_or(false, |g| groups.iter().any(|s| s == g))
    }
}

/// The loaded dataset, shared read-only for the lifetime of the process
#[derive(Debug, Clone)]
pub struct Dataset {
    pub events: Vec<DisasterEvent>,
    pub source: PathBuf,
    pub loaded_at: DateTime<Utc>,
}

impl Dataset {
    pub fn new(events: Vec<DisasterEvent>, source: PathBuf) -> Self {
        Self {
            events,
            source,
            loaded_at: Utc::now(),
        }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Earliest and latest start year, `None` for an empty dataset
    pub fn year_bounds(&self) -> Option<(i32, i32)> {
        let min = self.events.iter().map(|e| e.start_year).min()?;
        let max = self.events.iter().map(|e| e.start_year).max()?;
        Some((min, max))
    }
}
