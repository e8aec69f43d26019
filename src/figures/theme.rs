use serde_json::{json, Value};

pub const OCCURRENCE_COLOR: &str = "#FF6B6B";
pub const DEATHS_COLOR: &str = "#4ECDC4";

/// Sequential scale for the choropleth (Plasma)
pub const PLASMA: [&str; 10] = [
    "#0d0887", "#46039f", "#7201a8", "#9c179e", "#bd3786", "#d8576b", "#ed7953", "#fb9f3a",
    "#fdca26", "#f0f921",
];

/// Qualitative palette for disaster groups
pub const PASTEL: [&str; 11] = [
    "rgb(102, 197, 204)",
    "rgb(246, 207, 113)",
    "rgb(248, 156, 116)",
    "rgb(220, 176, 242)",
    "rgb(135, 197, 95)",
    "rgb(158, 185, 243)",
    "rgb(254, 136, 177)",
    "rgb(201, 219, 116)",
    "rgb(139, 224, 164)",
    "rgb(180, 151, 231)",
    "rgb(179, 179, 179)",
];

/// Default qualitative palette for per-type traces
pub const QUALITATIVE: [&str; 10] = [
    "#636EFA", "#EF553B", "#00CC96", "#AB63FA", "#FFA15A", "#19D3F3", "#FF6692", "#B6E880",
    "#FF97FF", "#FECB52",
];

const BACKGROUND: &str = "rgb(17,17,17)";
const FONT: &str = "#f2f5fa";
const GRID: &str = "#283442";

pub fn cycle(palette: &[&'static str], idx: usize) -> &'static str {
    palette[idx % palette.len()]
}

/// Choropleth colour scale as Plotly `[[stop, colour], ...]`
pub fn plasma_scale() -> Value {
    let last = (PLASMA.len() - 1) as f64;
    Value::Array(
        PLASMA
            .iter()
            .enumerate()
            .map(|(i, c)| json!([i as f64 / last, c]))
            .collect(),
    )
}

/// Base layout of the dark template
pub fn dark_layout() -> Value {
    json!({
        "paper_bgcolor": BACKGROUND,
        "plot_bgcolor": BACKGROUND,
        "font": { "color": FONT },
        "xaxis": { "gridcolor": GRID, "zerolinecolor": GRID },
        "yaxis": { "gridcolor": GRID, "zerolinecolor": GRID },
        "geo": {
            "bgcolor": BACKGROUND,
            "lakecolor": BACKGROUND,
            "landcolor": BACKGROUND,
            "showlakes": true,
            "showland": true,
            "subunitcolor": "#506784"
        },
        "colorway": QUALITATIVE,
    })
}

/// Recursively merge `patch` into `base`, objects key by key
pub fn merge(base: &mut Value, patch: Value) {
    match (base, patch) {
        (Value::Object(base), Value::Object(patch)) => {
            for (key, value) in patch {
                merge(base.entry(key).or_insert(Value::Null), value);
            }
        }
        (base, patch) => *base = patch,
    }
}
