//! Year-range and disaster-group selection

use crate::config::DashboardConfig;
use crate::data::DisasterEvent;
use anyhow::{bail, Result};
use serde::Serialize;

/// Inclusive range of start years
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    /// Clamp both ends into `bounds`; a range still reversed after clamping is rejected
    pub fn clamped(start: i32, end: i32, bounds: (i32, i32)) -> Result<Self> {
        let (min, max) = bounds;
        let (start, end) = (start.clamp(min, max), end.clamp(min, max));
        if start > end {
            bail!("Start year {} is after end year {}", start, end);
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, year: i32) -> bool {
        year >= self.start && year <= self.end
    }
}

/// Configured default range pulled inside the dataset's bounds
pub fn default_range(config: &DashboardConfig, bounds: (i32, i32)) -> YearRange {
    let (min, max) = bounds;
    let start = config.default_start_year.clamp(min, max);
    let end = config.default_end_year.clamp(min, max);
    if start > end {
        YearRange::new(min, max)
    } else {
        YearRange::new(start, end)
    }
}

/// Distinct disaster groups within `range`, in order of first appearance
pub fn group_options(events: &[DisasterEvent], range: YearRange) -> Vec<String> {
    let mut groups: Vec<String> = Vec::new();
    for event in events.iter().filter(|e| range.contains(e.start_year)) {
        if let Some(group) = &event.disaster_group {
            if !groups.contains(group) {
                groups.push(group.clone());
            }
        }
    }
    groups
}

/// Active sidebar filters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Selection {
    pub range: YearRange,
    pub groups: Vec<String>,
}

impl Selection {
    pub fn new(range: YearRange, groups: Vec<String>) -> Self {
        Self { range, groups }
    }

    /// Every group present in the range, the dashboard's initial state
    pub fn all_groups(events: &[DisasterEvent], range: YearRange) -> Self {
        Self::new(range, group_options(events, range))
    }

    /// Build from optional user input: missing years fall back to `defaults`,
    /// missing groups mean every group in the resolved range
    pub fn resolve(
        events: &[DisasterEvent],
        bounds: (i32, i32),
        defaults: YearRange,
        start: Option<i32>,
        end: Option<i32>,
        groups: Option<Vec<String>>,
    ) -> Result<Self> {
        let range = YearRange::clamped(
            start.unwrap_or(defaults.start),
            end.unwrap_or(defaults.end),
            bounds,
        )?;
        Ok(match groups {
            Some(groups) => Self::new(range, groups),
            None => Self::all_groups(events, range),
        })
    }

    pub fn matches(&self, event: &DisasterEvent) -> bool {
        self.range.contains(event.start_year) && event.in_group(&self.groups)
    }

    pub fn select<'a>(&self, events: &'a [DisasterEvent]) -> Vec<&'a DisasterEvent> {
        events.iter().filter(|e| self.matches(e)).collect()
    }
}

/// Events of one country across the whole dataset, ignoring any selection
pub fn focus_events<'a>(events: &'a [DisasterEvent], iso: &str) -> Vec<&'a DisasterEvent> {
    events
        .iter()
        .filter(|e| e.iso.as_deref() == Some(iso))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(year: i32, group: Option<&str>, iso: &str) -> DisasterEvent {
        DisasterEvent {
            disaster_group: group.map(String::from),
            iso: Some(iso.to_string()),
            ..DisasterEvent::new(year)
        }
    }

    fn sample() -> Vec<DisasterEvent> {
        vec![
            event(1940, Some("Natural"), "USA"),
            event(1950, Some("Technological"), "KOR"),
            event(1990, Some("Natural"), "KOR"),
            event(2000, None, "JPN"),
            event(2024, Some("Complex"), "IND"),
        ]
    }

    #[test]
    fn test_range_is_inclusive() {
        let range = YearRange::new(1950, 1990);
        assert!(range.contains(1950));
        assert!(range.contains(1990));
        assert!(!range.contains(1949));
        assert!(!range.contains(1991));
    }

    #[test]
    fn test_clamped_range() {
        let range = YearRange::clamped(1900, 2100, (1940, 2024)).unwrap();
        assert_eq!(range, YearRange::new(1940, 2024));
        assert!(YearRange::clamped(2000, 1990, (1940, 2024)).is_err());
    }

    #[test]
    fn test_clamped_range_beyond_one_bound() {
        // Both ends past the latest year collapse onto it
        assert_eq!(
            YearRange::clamped(2030, 2025, (1940, 2024)).unwrap(),
            YearRange::new(2024, 2024)
        );
        assert_eq!(
            YearRange::clamped(1900, 1920, (1940, 2024)).unwrap(),
            YearRange::new(1940, 1940)
        );
    }

    #[test]
    fn test_default_range_clamps_into_bounds() {
        let config = DashboardConfig::default();
        assert_eq!(default_range(&config, (1900, 2030)), YearRange::new(1950, 2024));
        assert_eq!(default_range(&config, (1980, 2010)), YearRange::new(1980, 2010));
        // Data entirely after the configured window
        assert_eq!(default_range(&config, (2025, 2026)), YearRange::new(2025, 2025));
    }

    #[test]
    fn test_group_options_first_appearance_order() {
        let events = sample();
        assert_eq!(
            group_options(&events, YearRange::new(1940, 2024)),
            vec!["Natural", "Technological", "Complex"]
        );
        assert_eq!(
            group_options(&events, YearRange::new(1950, 2000)),
            vec!["Technological", "Natural"]
        );
    }

    #[test]
    fn test_selection_excludes_null_groups() {
        let events = sample();
        let selection = Selection::all_groups(&events, YearRange::new(1950, 2024));
        let years: Vec<i32> = selection.select(&events).iter().map(|e| e.start_year).collect();
        assert_eq!(years, vec![1950, 1990, 2024]);
    }

    #[test]
    fn test_empty_group_selection_selects_nothing() {
        let events = sample();
        let selection = Selection::new(YearRange::new(1940, 2024), Vec::new());
        assert!(selection.select(&events).is_empty());
    }

    #[test]
    fn test_resolve_selection() {
        let events = sample();
        let defaults = YearRange::new(1950, 2024);

        let selection = Selection::resolve(&events, (1940, 2024), defaults, None, Some(1990), None).unwrap();
        assert_eq!(selection.range, YearRange::new(1950, 1990));
        assert_eq!(selection.groups, vec!["Technological", "Natural"]);

        let explicit = Selection::resolve(
            &events,
            (1940, 2024),
            defaults,
            Some(1900),
            None,
            Some(vec!["Complex".into()]),
        )
        .unwrap();
        assert_eq!(explicit.range, YearRange::new(1940, 2024));
        assert_eq!(explicit.select(&events).len(), 1);

        let late = Selection::resolve(&events, (1940, 2024), defaults, Some(2030), None, None).unwrap();
        assert_eq!(late.range, YearRange::new(2024, 2024));
        assert_eq!(late.groups, vec!["Complex"]);

        assert!(Selection::resolve(&events, (1940, 2024), defaults, Some(2000), Some(1990), None).is_err());
    }

    #[test]
    fn test_focus_events_ignore_selection() {
        let events = sample();
        let korea = focus_events(&events, "KOR");
        assert_eq!(korea.len(), 2);
        assert!(focus_events(&events, "FRA").is_empty());
    }
}
