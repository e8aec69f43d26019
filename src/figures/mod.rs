//! Plotly figure specs (`{"data": [...], "layout": {...}}`) for each chart

pub mod theme;

use crate::analytics::{CountryStat, FocusReport, TypeHierarchy, YearlyStat};
use serde_json::{json, Value};
use theme::{cycle, dark_layout, merge, plasma_scale, PASTEL, QUALITATIVE};

const BUBBLE_SIZE_MAX: f64 = 60.0;

fn figure(data: Vec<Value>, layout: Value) -> Value {
    let mut base = dark_layout();
    merge(&mut base, layout);
    json!({ "data": data, "layout": base })
}

/// Occurrences as bars on the left axis, deaths as a line on the right
pub fn decoupling(stats: &[YearlyStat], height: u32) -> Value {
    let years: Vec<i32> = stats.iter().map(|s| s.year).collect();
    let occurrences: Vec<u64> = stats.iter().map(|s| s.occurrences).collect();
    let deaths: Vec<u64> = stats.iter().map(|s| s.deaths).collect();

    figure(
        vec![
            json!({
                "type": "bar",
                "x": years,
                "y": occurrences,
                "name": "Occurrences",
                "marker": { "color": theme::OCCURRENCE_COLOR },
                "opacity": 0.6,
                "yaxis": "y"
            }),
            json!({
                "type": "scatter",
                "x": years,
                "y": deaths,
                "name": "Deaths",
                "mode": "lines+markers",
                "line": { "color": theme::DEATHS_COLOR, "width": 3 },
                "yaxis": "y2"
            }),
        ],
        json!({
            "xaxis": { "title": { "text": "Year" } },
            "yaxis": { "title": { "text": "Occurrences (events)" }, "side": "left" },
            "yaxis2": { "title": { "text": "Deaths (people)" }, "side": "right", "overlaying": "y" },
            "legend": { "x": 0, "y": 1.2, "orientation": "h" },
            "height": height
        }),
    )
}

/// Affected population per country on a natural-earth projection
pub fn choropleth(stats: &[CountryStat]) -> Value {
    let locations: Vec<&str> = stats.iter().map(|s| s.iso.as_str()).collect();
    let values: Vec<u64> = stats.iter().map(|s| s.total_affected).collect();
    let names: Vec<&str> = stats
        .iter()
        .map(|s| s.country.as_deref().unwrap_or(s.iso.as_str()))
        .collect();

    figure(
        vec![json!({
            "type": "choropleth",
            "locations": locations,
            "locationmode": "ISO-3",
            "z": values,
            "text": names,
            "hovertemplate": "<b>%{text}</b><br>Total affected: %{z:,}<extra></extra>",
            "colorscale": plasma_scale(),
            "colorbar": { "title": { "text": "Total affected" } }
        })],
        json!({
            "geo": { "projection": { "type": "natural earth" }, "showframe": false },
            "margin": { "r": 0, "t": 0, "l": 0, "b": 0 }
        }),
    )
}

/// Two-ring sunburst: groups inside, their types outside
pub fn sunburst(hierarchy: &TypeHierarchy) -> Value {
    let mut ids = Vec::new();
    let mut labels = Vec::new();
    let mut parents = Vec::new();
    let mut values = Vec::new();
    let mut colors = Vec::new();

    for (idx, group) in hierarchy.groups.iter().enumerate() {
        let color = cycle(&PASTEL, idx);

        ids.push(group.name.clone());
        labels.push(group.name.clone());
        parents.push(String::new());
        values.push(group.total_affected());
        colors.push(color);

        for kind in &group.types {
            ids.push(format!("{}/{}", group.name, kind.name));
            labels.push(kind.name.clone());
            parents.push(group.name.clone());
            values.push(kind.total_affected);
            colors.push(color);
        }
    }

    figure(
        vec![json!({
            "type": "sunburst",
            "ids": ids,
            "labels": labels,
            "parents": parents,
            "values": values,
            "branchvalues": "total",
            "marker": { "colors": colors }
        })],
        json!({ "margin": { "r": 0, "t": 30, "l": 0, "b": 0 } }),
    )
}

/// Stacked bars of affected population per year, one trace per disaster type
pub fn focus_affected(report: &FocusReport) -> Value {
    let data = report
        .affected_by_type
        .iter()
        .enumerate()
        .map(|(idx, series)| {
            let (years, affected): (Vec<i32>, Vec<u64>) = series.points.iter().copied().unzip();
            json!({
                "type": "bar",
                "x": years,
                "y": affected,
                "name": series.disaster_type,
                "marker": { "color": cycle(&QUALITATIVE, idx) }
            })
        })
        .collect();

    figure(
        data,
        json!({
            "title": { "text": format!("Affected people per year in {} (stacked)", report.name) },
            "barmode": "relative",
            "xaxis": { "title": { "text": "Start Year" } },
            "yaxis": { "title": { "text": "Total Affected" } },
            "legend": { "title": { "text": "Disaster Type" } }
        }),
    )
}

/// Year against disaster type, bubble area scaled by deaths
pub fn focus_bubbles(report: &FocusReport) -> Value {
    let max = report.max_deaths();
    let sizeref = if max == 0 {
        1.0
    } else {
        2.0 * max as f64 / (BUBBLE_SIZE_MAX * BUBBLE_SIZE_MAX)
    };

    let data = report
        .affected_by_type
        .iter()
        .enumerate()
        .map(|(idx, series)| {
            let points: Vec<_> = report
                .bubbles
                .iter()
                .filter(|b| b.disaster_type == series.disaster_type)
                .collect();
            let years: Vec<i32> = points.iter().map(|b| b.year).collect();
            let kinds: Vec<&str> = points.iter().map(|b| b.disaster_type.as_str()).collect();
            let sizes: Vec<u64> = points.iter().map(|b| b.deaths).collect();
            let names: Vec<&str> = points
                .iter()
                .map(|b| b.event_name.as_deref().unwrap_or(""))
                .collect();

            json!({
                "type": "scatter",
                "mode": "markers",
                "x": years,
                "y": kinds,
                "name": series.disaster_type,
                "hovertext": names,
                "hovertemplate": "<b>%{hovertext}</b><br>Year: %{x}<br>Deaths: %{marker.size:,}<extra></extra>",
                "marker": {
                    "color": cycle(&QUALITATIVE, idx),
                    "size": sizes,
                    "sizemode": "area",
                    "sizeref": sizeref,
                    "sizemin": 0
                }
            })
        })
        .collect();

    figure(
        data,
        json!({
            "title": { "text": "Deaths by disaster type (bubble size = deaths)" },
            "xaxis": { "title": { "text": "Start Year" } },
            "yaxis": { "title": { "text": "Disaster Type" } },
            "legend": { "title": { "text": "Disaster Type" } }
        }),
    )
}
