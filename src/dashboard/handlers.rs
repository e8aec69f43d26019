use super::{ApiError, AppState, FocusView};
use crate::analytics::{
    country_stats, group_options, type_hierarchy, yearly_stats, CountryStat, KpiCard, Kpis,
    Selection, YearRange, YearlyStat,
};
use crate::figures;
use axum::{
    extract::{Query, State},
    response::Html,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Sidebar state as query parameters
#[derive(Debug, Default, Deserialize)]
pub struct SelectionQuery {
    pub start: Option<i32>,
    pub end: Option<i32>,
    /// Comma-separated; absent means every group in range, empty means none
    pub groups: Option<String>,
}

impl SelectionQuery {
    pub fn parse_groups(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .map(String::from)
            .collect()
    }
}

#[derive(Debug, Serialize)]
pub struct Meta {
    pub title: String,
    pub icon: String,
    pub subtitle: String,
    pub year_bounds: (i32, i32),
    pub default_range: YearRange,
    pub focus_iso: String,
    pub focus_name: String,
    pub events: usize,
    pub loaded_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub selection: Selection,
    pub kpis: Kpis,
    pub cards: Vec<KpiCard>,
    pub decoupling: Value,
    pub heatmap: Value,
    pub sunburst: Value,
}

/// Main HTML page
pub async fn index_page(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(state.index_html.clone())
}

pub async fn meta(State(state): State<Arc<AppState>>) -> Json<Meta> {
    let dashboard = &state.config.dashboard;
    Json(Meta {
        title: dashboard.title.clone(),
        icon: dashboard.icon.clone(),
        subtitle: dashboard.subtitle.clone(),
        year_bounds: state.bounds,
        default_range: state.default_range(),
        focus_iso: state.config.focus.iso.clone(),
        focus_name: state.config.focus.name.clone(),
        events: state.dataset.len(),
        loaded_at: state.dataset.loaded_at,
    })
}

/// Group options for a year range
pub async fn list_groups(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SelectionQuery>,
) -> Result<Json<Vec<String>>, ApiError> {
    let range = state.resolve_range(&query)?;
    Ok(Json(group_options(&state.dataset.events, range)))
}

/// KPIs and the three overview charts for the current selection
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SelectionQuery>,
) -> Result<Json<DashboardView>, ApiError> {
    let selection = state.resolve(&query)?;
    let events = selection.select(&state.dataset.events);
    debug!(
        "Dashboard {}-{} over {} groups: {} events",
        selection.range.start,
        selection.range.end,
        selection.groups.len(),
        events.len()
    );

    let kpis = Kpis::from_events(&events);
    let cards = kpis.cards();

    Ok(Json(DashboardView {
        decoupling: figures::decoupling(&yearly_stats(&events), state.config.dashboard.chart_height),
        heatmap: figures::choropleth(&country_stats(&events)),
        sunburst: figures::sunburst(&type_hierarchy(&events)),
        selection,
        kpis,
        cards,
    }))
}

pub async fn yearly(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SelectionQuery>,
) -> Result<Json<Vec<YearlyStat>>, ApiError> {
    let selection = state.resolve(&query)?;
    Ok(Json(yearly_stats(&selection.select(&state.dataset.events))))
}

pub async fn countries(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SelectionQuery>,
) -> Result<Json<Vec<CountryStat>>, ApiError> {
    let selection = state.resolve(&query)?;
    Ok(Json(country_stats(&selection.select(&state.dataset.events))))
}

/// Focus-country section, independent of the sidebar filters
pub async fn focus(State(state): State<Arc<AppState>>) -> Json<FocusView> {
    Json(state.focus.clone())
}
