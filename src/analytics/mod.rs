//! Aggregations behind each dashboard section

mod filter;
mod focus;
mod geo;
mod hierarchy;
mod summary;
mod yearly;

pub use filter::{default_range, focus_events, group_options, Selection, YearRange};
pub use focus::{Bubble, FocusReport, TypeSeries};
pub use geo::{country_stats, top_countries, CountryStat};
pub use hierarchy::{type_hierarchy, GroupNode, TypeHierarchy, TypeNode};
pub use summary::{format_thousands, KpiCard, Kpis};
pub use yearly::{yearly_stats, YearlyStat};
