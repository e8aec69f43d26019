//! Headline KPI figures for the selected events

use crate::data::DisasterEvent;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Kpis {
    pub occurrences: u64,
    pub total_deaths: u64,
    pub total_affected: u64,
    /// Thousands of US dollars
    pub total_damage: Decimal,
}

impl Kpis {
    pub fn from_events(events: &[&DisasterEvent]) -> Self {
        events.iter().fold(Self::default(), |mut acc, e| {
            acc.occurrences += 1;
            acc.total_deaths += e.deaths();
            acc.total_affected += e.affected();
            acc.total_damage += e.damage();
            acc
        })
    }

    /// Display cards in dashboard order
    pub fn cards(&self) -> Vec<KpiCard> {
        let damage = self.total_damage.trunc().to_u64().unwrap_or(0);
        vec![
            KpiCard::new("Total occurrences", format!("{} events", format_thousands(self.occurrences))),
            KpiCard::new("Total deaths", format!("{} people", format_thousands(self.total_deaths))),
            KpiCard::new("Total affected", format!("{} people", format_thousands(self.total_affected))),
            KpiCard::new("Total damage ('000 US$)", format!("${}", format_thousands(damage))),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiCard {
    pub label: String,
    pub value: String,
}

impl KpiCard {
    fn new(label: &str, value: String) -> Self {
        Self {
            label: label.to_string(),
            value,
        }
    }
}

/// Group digits in threes with commas
pub fn format_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1000), "1,000");
        assert_eq!(format_thousands(1234567), "1,234,567");
        assert_eq!(format_thousands(100000), "100,000");
    }

    #[test]
    fn test_kpis_treat_nulls_as_zero() {
        let a = DisasterEvent {
            total_deaths: Some(10),
            total_affected: Some(1500),
            total_damage: Some(dec!(2500.75)),
            ..DisasterEvent::new(2000)
        };
        let b = DisasterEvent {
            total_deaths: Some(5),
            ..DisasterEvent::new(2001)
        };
        let kpis = Kpis::from_events(&[&a, &b]);

        assert_eq!(kpis.occurrences, 2);
        assert_eq!(kpis.total_deaths, 15);
        assert_eq!(kpis.total_affected, 1500);
        assert_eq!(kpis.total_damage, dec!(2500.75));
    }

    #[test]
    fn test_cards_truncate_damage() {
        let kpis = Kpis {
            occurrences: 1234,
            total_deaths: 56789,
            total_affected: 0,
            total_damage: dec!(1999999.9),
        };
        let values: Vec<String> = kpis.cards().into_iter().map(|c| c.value).collect();
        assert_eq!(
            values,
            vec!["1,234 events", "56,789 people", "0 people", "$1,999,999"]
        );
    }

    #[test]
    fn test_empty_selection() {
        let kpis = Kpis::from_events(&[]);
        assert_eq!(kpis, Kpis::default());
    }
}
