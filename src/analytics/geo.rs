//! Per-country totals for the global heatmap

use crate::data::DisasterEvent;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryStat {
    /// ISO 3166-1 alpha-3
    pub iso: String,
    pub country: Option<String>,
    pub total_affected: u64,
}

/// Group by ISO code, sorted by code; events without one are skipped
pub fn country_stats(events: &[&DisasterEvent]) -> Vec<CountryStat> {
    let mut by_iso: BTreeMap<&str, CountryStat> = BTreeMap::new();

    for event in events {
        let Some(iso) = event.iso.as_deref() else {
            continue;
        };
        let stat = by_iso.entry(iso).or_insert_with(|| CountryStat {
            iso: iso.to_string(),
            country: None,
            total_affected: 0,
        });
        if stat.country.is_none() {
            stat.country = event.country.clone();
        }
        stat.total_affected += event.affected();
    }

    by_iso.into_values().collect()
}

/// Countries ordered by affected population, largest first
pub fn top_countries(stats: &[CountryStat], limit: usize) -> Vec<CountryStat> {
    let mut ranked = stats.to_vec();
    ranked.sort_by(|a, b| b.total_affected.cmp(&a.total_affected).then_with(|| a.iso.cmp(&b.iso)));
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(iso: Option<&str>, country: Option<&str>, affected: Option<u64>) -> DisasterEvent {
        DisasterEvent {
            iso: iso.map(String::from),
            country: country.map(String::from),
            total_affected: affected,
            ..DisasterEvent::new(2000)
        }
    }

    #[test]
    fn test_country_stats() {
        let events = vec![
            event(Some("PHL"), None, Some(100)),
            event(Some("CHN"), Some("China"), Some(5000)),
            event(Some("PHL"), Some("Philippines"), Some(250)),
            event(Some("PHL"), Some("Philippines (the)"), None),
            event(None, Some("Unknown"), Some(99)),
        ];
        let refs: Vec<&DisasterEvent> = events.iter().collect();

        let stats = country_stats(&refs);
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].iso, "CHN");
        assert_eq!(stats[1].iso, "PHL");
        // First non-null name wins
        assert_eq!(stats[1].country.as_deref(), Some("Philippines"));
        assert_eq!(stats[1].total_affected, 350);
    }

    #[test]
    fn test_top_countries() {
        let stats = vec![
            CountryStat { iso: "BGD".into(), country: None, total_affected: 10 },
            CountryStat { iso: "CHN".into(), country: None, total_affected: 30 },
            CountryStat { iso: "IND".into(), country: None, total_affected: 30 },
        ];
        let top: Vec<String> = top_countries(&stats, 2).into_iter().map(|s| s.iso).collect();
        assert_eq!(top, vec!["CHN", "IND"]);
    }
}
