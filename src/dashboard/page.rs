//! The single dashboard page; charts are drawn client-side from `/api/*`

use crate::config::DashboardConfig;

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Render the page once at startup; `custom_css` is appended after the built-in styles
pub fn render_index(config: &DashboardConfig, custom_css: Option<&str>) -> String {
    let title = escape_html(&config.title);
    let icon = escape_html(&config.icon);
    let subtitle = escape_html(&config.subtitle);
    // Keep user CSS from closing the style element early
    let custom_css = custom_css.unwrap_or("").replace("</style", "<\\/style");

    format!(r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <link rel="icon" href="data:image/svg+xml,<svg xmlns=%22http://www.w3.org/2000/svg%22 viewBox=%220 0 100 100%22><text y=%22.9em%22 font-size=%2290%22>{icon}</text></svg>">
    <script src="https://cdn.plot.ly/plotly-2.35.2.min.js"></script>
    <style>
        * {{ margin: 0; padding: 0; box-sizing: border-box; }}
        body {{
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            background: #0e1117;
            color: #fafafa;
            min-height: 100vh;
            display: flex;
        }}
        .sidebar {{
            width: 300px;
            min-height: 100vh;
            background: #262730;
            padding: 24px 20px;
            flex-shrink: 0;
        }}
        .sidebar h2 {{
            font-size: 18px;
            margin-bottom: 20px;
        }}
        .sidebar label {{
            display: block;
            font-size: 13px;
            color: #a3a8b8;
            margin: 14px 0 6px;
        }}
        .sidebar input[type="number"] {{
            width: 110px;
            background: #0e1117;
            border: 1px solid #41444c;
            color: #fafafa;
            padding: 6px 8px;
            border-radius: 4px;
        }}
        .group-option {{
            display: flex;
            align-items: center;
            gap: 8px;
            font-size: 14px;
            margin: 6px 0;
        }}
        .main {{
            flex: 1;
            padding: 32px 48px;
            min-width: 0;
        }}
        .main-title {{
            font-size: 40px;
            font-weight: 700;
        }}
        .sub-title {{
            font-size: 18px;
            color: #a3a8b8;
            margin: 8px 0 24px;
        }}
        .kpis {{
            display: grid;
            grid-template-columns: repeat(4, 1fr);
            gap: 16px;
        }}
        .kpi .label {{ font-size: 14px; color: #a3a8b8; }}
        .kpi .value {{ font-size: 30px; margin-top: 4px; }}
        hr {{ border: none; border-top: 1px solid #31333f; margin: 28px 0; }}
        h3 {{ font-size: 22px; margin-bottom: 12px; }}
        .columns {{
            display: grid;
            grid-template-columns: 2fr 1fr;
            gap: 24px;
            margin-top: 28px;
        }}
        .tabs {{ display: flex; gap: 4px; border-bottom: 1px solid #31333f; }}
        .tab {{
            background: none;
            border: none;
            color: #a3a8b8;
            padding: 10px 14px;
            font-size: 14px;
            cursor: pointer;
        }}
        .tab.active {{ color: #ff4b4b; border-bottom: 2px solid #ff4b4b; }}
        .tab-panel {{ display: none; padding-top: 12px; }}
        .tab-panel.active {{ display: block; }}
        .notice {{
            background: rgba(28, 131, 225, 0.1);
            color: #c7ebff;
            padding: 14px 16px;
            border-radius: 6px;
        }}
        .error {{
            background: rgba(255, 43, 43, 0.09);
            color: #ffdede;
            padding: 14px 16px;
            border-radius: 6px;
            margin-bottom: 16px;
            display: none;
        }}
    </style>
    <style>
{custom_css}
    </style>
</head>
<body>
    <aside class="sidebar">
        <h2>🕹️ Filter Options</h2>
        <label for="start-year">Analysis period: from</label>
        <input type="number" id="start-year">
        <label for="end-year">to</label>
        <input type="number" id="end-year">
        <label>Disaster Group</label>
        <div id="groups"></div>
    </aside>
    <main class="main">
        <p class="main-title">{title} {icon}</p>
        <p class="sub-title">{subtitle}</p>
        <div class="error" id="error"></div>

        <div class="kpis" id="kpis"></div>
        <hr>

        <h3>📊 Insight 1: Disasters increased, but humanity grew stronger (Decoupling)</h3>
        <div id="decoupling"></div>

        <div class="columns">
            <div>
                <h3>🗺️ Global Heatmap: where is it most dangerous?</h3>
                <div id="heatmap"></div>
            </div>
            <div>
                <h3>🌪️ Disaster type analysis</h3>
                <div id="sunburst"></div>
            </div>
        </div>

        <hr>
        <h3 id="focus-title">Focus</h3>
        <div id="focus"></div>
    </main>

    <script>
        const plotConfig = {{ responsive: true, displaylogo: false }};
        let meta = null;

        function showError(message) {{
            const el = document.getElementById('error');
            el.textContent = message;
            el.style.display = message ? 'block' : 'none';
        }}

        function yearRange() {{
            return {{
                start: document.getElementById('start-year').value,
                end: document.getElementById('end-year').value,
            }};
        }}

        function selectedGroups() {{
            return Array.from(document.querySelectorAll('#groups input:checked'))
                .map(input => input.value);
        }}

        async function loadMeta() {{
            const res = await fetch('/api/meta');
            meta = await res.json();

            for (const id of ['start-year', 'end-year']) {{
                const input = document.getElementById(id);
                input.min = meta.year_bounds[0];
                input.max = meta.year_bounds[1];
                input.addEventListener('change', onRangeChange);
            }}
            document.getElementById('start-year').value = meta.default_range.start;
            document.getElementById('end-year').value = meta.default_range.end;
        }}

        // Group options follow the year range and reset to all selected
        async function loadGroups() {{
            const params = new URLSearchParams(yearRange());
            const res = await fetch('/api/groups?' + params);
            if (!res.ok) {{
                showError(await res.text());
                return false;
            }}
            const groups = await res.json();
            const container = document.getElementById('groups');
            container.innerHTML = '';
            for (const group of groups) {{
                const row = document.createElement('label');
                row.className = 'group-option';
                const input = document.createElement('input');
                input.type = 'checkbox';
                input.value = group;
                input.checked = true;
                input.addEventListener('change', loadDashboard);
                row.appendChild(input);
                row.appendChild(document.createTextNode(group));
                container.appendChild(row);
            }}
            return true;
        }}

        function renderKpis(cards) {{
            const container = document.getElementById('kpis');
            container.innerHTML = '';
            for (const card of cards) {{
                const el = document.createElement('div');
                el.className = 'kpi';
                const label = document.createElement('div');
                label.className = 'label';
                label.textContent = card.label;
                const value = document.createElement('div');
                value.className = 'value';
                value.textContent = card.value;
                el.appendChild(label);
                el.appendChild(value);
                container.appendChild(el);
            }}
        }}

        async function loadDashboard() {{
            const params = new URLSearchParams({{ ...yearRange(), groups: selectedGroups().join(',') }});
            const res = await fetch('/api/dashboard?' + params);
            if (!res.ok) {{
                showError(await res.text());
                return;
            }}
            showError('');
            const view = await res.json();

            renderKpis(view.cards);
            Plotly.react('decoupling', view.decoupling.data, view.decoupling.layout, plotConfig);
            Plotly.react('heatmap', view.heatmap.data, view.heatmap.layout, plotConfig);
            Plotly.react('sunburst', view.sunburst.data, view.sunburst.layout, plotConfig);
        }}

        function showTab(index) {{
            document.querySelectorAll('.tab').forEach((tab, i) => tab.classList.toggle('active', i === index));
            document.querySelectorAll('.tab-panel').forEach((panel, i) => panel.classList.toggle('active', i === index));
            window.dispatchEvent(new Event('resize'));
        }}

        async function loadFocus() {{
            const res = await fetch('/api/focus');
            const focus = await res.json();
            document.getElementById('focus-title').textContent = `Focus on ${{focus.name}}: disaster patterns`;

            const container = document.getElementById('focus');
            if (focus.empty) {{
                container.innerHTML = '';
                const notice = document.createElement('div');
                notice.className = 'notice';
                notice.textContent = focus.message;
                container.appendChild(notice);
                return;
            }}

            container.innerHTML = `
                <div class="tabs">
                    <button class="tab active" onclick="showTab(0)">Affected people by year</button>
                    <button class="tab" onclick="showTab(1)">Casualties by disaster type</button>
                </div>
                <div class="tab-panel active"><div id="focus-affected"></div></div>
                <div class="tab-panel"><div id="focus-bubbles"></div></div>`;
            Plotly.newPlot('focus-affected', focus.affected.data, focus.affected.layout, plotConfig);
            Plotly.newPlot('focus-bubbles', focus.bubbles.data, focus.bubbles.layout, plotConfig);
        }}

        async function onRangeChange() {{
            if (await loadGroups()) {{
                await loadDashboard();
            }}
        }}

        window.onload = async () => {{
            await loadMeta();
            await onRangeChange();
            await loadFocus();
        }};
    </script>
</body>
</html>"##)
}
