//! HTTP surface: the dashboard page plus the JSON endpoints it draws from

mod handlers;
mod page;

pub use handlers::{DashboardView, Meta, SelectionQuery};
pub use page::{escape_html, render_index};

use crate::analytics::{default_range, focus_events, FocusReport, Selection, YearRange};
use crate::config::Config;
use crate::data::Dataset;
use crate::figures;
use anyhow::{Context, Result};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Shared, read-only state behind every handler
pub struct AppState {
    pub dataset: Dataset,
    pub config: Config,
    pub bounds: (i32, i32),
    pub focus: FocusView,
    index_html: String,
}

impl AppState {
    pub fn new(dataset: Dataset, config: Config) -> Result<Self> {
        let bounds = dataset
            .year_bounds()
            .context("Dataset has no events to derive a year range from")?;

        let custom_css = load_style(Path::new(&config.dashboard.style_path));
        let index_html = render_index(&config.dashboard, custom_css.as_deref());
        let focus = FocusView::build(&dataset, &config);

        Ok(Self {
            dataset,
            config,
            bounds,
            focus,
            index_html,
        })
    }

    pub fn default_range(&self) -> YearRange {
        default_range(&self.config.dashboard, self.bounds)
    }

    /// Year range from the query, falling back to the configured defaults
    pub fn resolve_range(&self, query: &SelectionQuery) -> Result<YearRange> {
        let defaults = self.default_range();
        YearRange::clamped(
            query.start.unwrap_or(defaults.start),
            query.end.unwrap_or(defaults.end),
            self.bounds,
        )
    }

    pub fn resolve(&self, query: &SelectionQuery) -> Result<Selection> {
        Selection::resolve(
            &self.dataset.events,
            self.bounds,
            self.default_range(),
            query.start,
            query.end,
            query.groups.as_deref().map(SelectionQuery::parse_groups),
        )
    }
}

/// Focus-country payload; figures are absent when the country has no events
#[derive(Debug, Clone, Serialize)]
pub struct FocusView {
    pub iso: String,
    pub name: String,
    pub empty: bool,
    pub message: Option<String>,
    pub affected: Option<Value>,
    pub bubbles: Option<Value>,
}

impl FocusView {
    pub fn build(dataset: &Dataset, config: &Config) -> Self {
        let focus = &config.focus;
        let events = focus_events(&dataset.events, &focus.iso);
        let report = FocusReport::build(&events, &focus.iso, &focus.name);

        if report.is_empty() {
            return Self {
                iso: focus.iso.clone(),
                name: focus.name.clone(),
                empty: true,
                message: Some(format!("No {} data in the dataset.", focus.name)),
                affected: None,
                bubbles: None,
            };
        }

        Self {
            iso: focus.iso.clone(),
            name: focus.name.clone(),
            empty: false,
            message: None,
            affected: Some(figures::focus_affected(&report)),
            bubbles: Some(figures::focus_bubbles(&report)),
        }
    }
}

/// Bad query parameters, reported as 400 with a plain-text reason
#[derive(Debug)]
pub struct ApiError(anyhow::Error);

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, format!("{:#}", self.0)).into_response()
    }
}

fn load_style(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(css) => {
            info!("Loaded stylesheet {}", path.display());
            Some(css)
        }
        Err(e) => {
            warn!("Stylesheet {} not loaded: {}", path.display(), e);
            None
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::index_page))
        .route("/api/meta", get(handlers::meta))
        .route("/api/groups", get(handlers::list_groups))
        .route("/api/dashboard", get(handlers::dashboard))
        .route("/api/yearly", get(handlers::yearly))
        .route("/api/countries", get(handlers::countries))
        .route("/api/focus", get(handlers::focus))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DisasterEvent;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use std::path::PathBuf;
    use tower::ServiceExt;

    fn event(year: i32, group: &str, kind: &str, iso: &str, deaths: u64, affected: u64) -> DisasterEvent {
        DisasterEvent {
            disaster_group: Some(group.into()),
            disaster_type: Some(kind.into()),
            iso: Some(iso.into()),
            country: Some(iso.into()),
            total_deaths: Some(deaths),
            total_affected: Some(affected),
            ..DisasterEvent::new(year)
        }
    }

    fn test_state(events: Vec<DisasterEvent>) -> Arc<AppState> {
        let mut config = Config::default();
        config.dashboard.style_path = "does-not-exist.css".into();
        let dataset = Dataset::new(events, PathBuf::from("emdat.csv"));
        Arc::new(AppState::new(dataset, config).unwrap())
    }

    fn sample_state() -> Arc<AppState> {
        test_state(vec![
            event(1940, "Natural", "Flood", "CHN", 1000, 50000),
            event(1999, "Natural", "Storm", "KOR", 20, 3000),
            event(2000, "Technological", "Transport", "USA", 300, 0),
            event(2000, "Natural", "Flood", "KOR", 5, 700),
        ])
    }

    async fn get_json(state: Arc<AppState>, uri: &str) -> (StatusCode, Value) {
        let response = router(state)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_meta_reports_bounds_and_defaults() {
        let (status, meta) = get_json(sample_state(), "/api/meta").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(meta["year_bounds"], serde_json::json!([1940, 2000]));
        assert_eq!(meta["default_range"]["start"], 1950);
        assert_eq!(meta["default_range"]["end"], 2000);
        assert_eq!(meta["events"], 4);
    }

    #[tokio::test]
    async fn test_dashboard_defaults_to_all_groups() {
        let (status, view) = get_json(sample_state(), "/api/dashboard").await;
        assert_eq!(status, StatusCode::OK);
        // 1940 falls outside the default 1950 start
        assert_eq!(view["kpis"]["occurrences"], 3);
        assert_eq!(view["kpis"]["total_deaths"], 325);
        assert_eq!(view["selection"]["groups"], serde_json::json!(["Natural", "Technological"]));
        assert_eq!(view["cards"][2]["value"], "3,700 people");
        assert_eq!(view["decoupling"]["data"][0]["x"], serde_json::json!([1999, 2000]));
    }

    #[tokio::test]
    async fn test_dashboard_group_filter() {
        let (_, view) = get_json(sample_state(), "/api/dashboard?start=1900&end=2100&groups=Natural").await;
        assert_eq!(view["kpis"]["occurrences"], 3);
        assert_eq!(view["kpis"]["total_affected"], 53700);
        assert_eq!(view["selection"]["range"]["start"], 1940);
    }

    #[tokio::test]
    async fn test_empty_groups_select_nothing() {
        let (status, view) = get_json(sample_state(), "/api/dashboard?groups=").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["kpis"]["occurrences"], 0);
        assert_eq!(view["cards"][3]["value"], "$0");
    }

    #[tokio::test]
    async fn test_reversed_range_is_bad_request() {
        let (status, _) = get_json(sample_state(), "/api/dashboard?start=2000&end=1990").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_yearly_sorted_and_skips_untyped_occurrences() {
        let untyped = DisasterEvent {
            disaster_type: None,
            ..event(1999, "Natural", "Storm", "JPN", 40, 10)
        };
        let state = test_state(vec![
            event(2000, "Natural", "Flood", "KOR", 5, 700),
            untyped,
            event(1940, "Natural", "Flood", "CHN", 1000, 50000),
            event(1999, "Natural", "Storm", "KOR", 20, 3000),
        ]);

        let (status, yearly) = get_json(state, "/api/yearly?start=1900&end=2100").await;
        assert_eq!(status, StatusCode::OK);

        let rows = yearly.as_array().unwrap();
        let years: Vec<i64> = rows.iter().map(|r| r["year"].as_i64().unwrap()).collect();
        assert_eq!(years, vec![1940, 1999, 2000]);

        // The untyped 1999 event adds deaths but no occurrence
        assert_eq!(rows[1]["occurrences"], 1);
        assert_eq!(rows[1]["deaths"], 60);
    }

    #[tokio::test]
    async fn test_groups_follow_range() {
        let (_, groups) = get_json(sample_state(), "/api/groups?start=2000&end=2000").await;
        assert_eq!(groups, serde_json::json!(["Technological", "Natural"]));
    }

    #[tokio::test]
    async fn test_countries_endpoint() {
        let (_, countries) = get_json(sample_state(), "/api/countries?start=1999&end=2000").await;
        assert_eq!(countries[0]["iso"], "KOR");
        assert_eq!(countries[0]["total_affected"], 3700);
        assert_eq!(countries[1]["iso"], "USA");
    }

    #[tokio::test]
    async fn test_focus_ignores_filters() {
        let (_, focus) = get_json(sample_state(), "/api/focus").await;
        assert_eq!(focus["empty"], false);
        assert_eq!(focus["affected"]["data"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_focus_without_country_data() {
        let state = test_state(vec![event(2000, "Natural", "Flood", "CHN", 1, 1)]);
        let (_, focus) = get_json(state, "/api/focus").await;
        assert_eq!(focus["empty"], true);
        assert_eq!(focus["message"], "No Korea data in the dataset.");
        assert!(focus["affected"].is_null());
    }

    #[tokio::test]
    async fn test_index_page() {
        let response = router(sample_state())
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&bytes).contains("The Pulse of Disasters"));
    }
}
