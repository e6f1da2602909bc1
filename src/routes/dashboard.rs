use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse},
};
use serde::Serialize;
use std::fmt::Write as _;

use crate::bootstrap::{
    ANOMALY_COUNT_BLOB, HUMIDS_BLOB, LABELS_BLOB, LOCATION_ID_BLOB, NORMAL_COUNT_BLOB, TEMPS_BLOB,
};
use crate::common::AppState;
use crate::dashboard::{Dashboard, escape_html};

/// Options of the `#chartDataLimit` selector
const CHART_LIMIT_OPTIONS: [usize; 4] = [10, 30, 50, 100];

pub async fn dashboard(State(state): State<AppState>) -> impl IntoResponse {
    let html = {
        let dashboard = state.dashboard.read().await;
        render_page(&dashboard, state.config.poll_interval_ms)
    };
    ([(header::CACHE_CONTROL, "no-store")], Html(html))
}

/// Render the full page: heading, stat cards, first table page and chart seed.
#[must_use]
pub fn render_page(dashboard: &Dashboard, refresh_ms: u64) -> String {
    let charts = dashboard.charts();
    let limit = dashboard.filters().chart_limit;

    let mut limit_options = String::new();
    let mut options: Vec<usize> = CHART_LIMIT_OPTIONS.to_vec();
    if !options.contains(&limit) {
        options.push(limit);
        options.sort_unstable();
    }
    for option in options {
        let selected = if option == limit { " selected" } else { "" };
        let _ = write!(
            limit_options,
            r#"<option value="{option}"{selected}>{option} data</option>"#
        );
    }

    let blobs = [
        json_blob(LABELS_BLOB, &charts.line.labels),
        json_blob(TEMPS_BLOB, &charts.line.temperature),
        json_blob(HUMIDS_BLOB, &charts.line.humidity),
        json_blob(ANOMALY_COUNT_BLOB, &charts.stats.anomaly),
        json_blob(NORMAL_COUNT_BLOB, &charts.stats.normal),
        json_blob(LOCATION_ID_BLOB, &dashboard.location().id),
        json_blob("view_revision_json", &dashboard.revision()),
        json_blob("refresh_ms_json", &refresh_ms),
    ]
    .join("\n    ");

    let location = escape_html(&dashboard.location().name);
    let total = charts.stats.total.to_string();
    let normal = charts.stats.normal.to_string();
    let anomaly = charts.stats.anomaly.to_string();
    let rows = dashboard.render_table();
    let pagination = dashboard.render_pagination();

    fill_template(DASHBOARD_HTML, |key| match key {
        "location" => Some(location.as_str()),
        "total" => Some(total.as_str()),
        "normal" => Some(normal.as_str()),
        "anomaly" => Some(anomaly.as_str()),
        "limit_options" => Some(limit_options.as_str()),
        "rows" => Some(rows.as_str()),
        "pagination" => Some(pagination.as_str()),
        "blobs" => Some(blobs.as_str()),
        _ => None,
    })
}

/// Replace `{{key}}` placeholders in one left-to-right pass.
///
/// Substituted text is never rescanned; unknown keys are kept verbatim.
fn fill_template<'a>(template: &str, value: impl Fn(&str) -> Option<&'a str>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        match value(&after[..end]) {
            Some(text) => out.push_str(text),
            None => out.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after[end + 2..];
    }

    out.push_str(rest);
    out
}

/// `<script type="application/json">` payload, safe against `</script>` in strings.
fn json_blob<T: Serialize + ?Sized>(id: &str, value: &T) -> String {
    let json = serde_json::to_string(value)
        .unwrap_or_else(|_| "null".to_string())
        .replace("</", "<\\/");
    format!(r#"<script id="{id}" type="application/json">{json}</script>"#)
}

const DASHBOARD_HTML: &str = r##"<!DOCTYPE html>
<html lang="id">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Dashboard Sensor - {{location}}</title>
    <style>
        :root {
            --bg: #f8fafc;
            --surface: #ffffff;
            --border: #e2e8f0;
            --text: #1e293b;
            --muted: #64748b;
            --accent: #4361ee;
            --normal: #38b000;
            --anomaly: #f72585;
        }
        * { box-sizing: border-box; margin: 0; padding: 0; }
        body { font-family: system-ui, -apple-system, sans-serif; background: var(--bg); color: var(--text); }
        .container { max-width: 1200px; margin: 0 auto; padding: 1.5rem; }
        .header-content { margin-bottom: 1.5rem; }
        h1 { font-size: 1.25rem; font-weight: 600; }
        .stats { display: grid; grid-template-columns: repeat(3, 1fr); gap: 1rem; margin-bottom: 1rem; }
        .stat-card { background: var(--surface); border: 1px solid var(--border); border-radius: 0.5rem; padding: 1rem; }
        .stat-card .stat-label { font-size: 0.75rem; color: var(--muted); }
        .stat-card .stat-value { font-size: 1.5rem; font-weight: 600; }
        .stat-card.normal .stat-value { color: var(--normal); }
        .stat-card.anomaly .stat-value { color: var(--anomaly); }
        .charts { display: grid; grid-template-columns: 2fr 1fr; gap: 1rem; margin-bottom: 1rem; }
        .chart-box { background: var(--surface); border: 1px solid var(--border); border-radius: 0.5rem; padding: 1rem; height: 320px; position: relative; }
        .chart-box select { position: absolute; top: 0.5rem; right: 0.5rem; }
        .filter-section, .search-section { display: flex; gap: 0.5rem; flex-wrap: wrap; align-items: center; margin-bottom: 0.75rem; }
        .filter-btn { padding: 0.5rem 1rem; border: 1px solid var(--border); border-radius: 0.375rem; background: var(--surface); cursor: pointer; }
        .filter-btn.active { background: var(--accent); border-color: var(--accent); color: white; }
        .search-box { flex: 1; padding: 0.5rem; border: 1px solid var(--border); border-radius: 0.375rem; }
        table { width: 100%; border-collapse: collapse; background: var(--surface); }
        th, td { padding: 0.5rem 0.75rem; border-bottom: 1px solid var(--border); text-align: left; font-size: 0.875rem; }
        .anomaly-row { background: #fff0f6; }
        .status-normal { color: var(--normal); font-weight: 600; }
        .status-anomaly { color: var(--anomaly); font-weight: 600; }
        .empty-row { text-align: center; padding: 40px; color: #999; }
        .pagination { display: flex; justify-content: center; align-items: center; gap: 10px; margin-top: 20px; }
        .pagination-info { color: #666; font-size: 14px; }
        .pagination-btn { padding: 8px 12px; border: 1px solid var(--accent); background: #fff; color: var(--accent); border-radius: 6px; cursor: pointer; min-width: 40px; }
        .pagination-btn.active { background: var(--accent); color: #fff; }
    </style>
</head>
<body>
<div class="container">
    <div class="header-content"><h1>Dashboard Sensor - {{location}}</h1></div>

    <div class="stats">
        <div class="stat-card total"><div class="stat-label">Total Data</div><div class="stat-value">{{total}}</div></div>
        <div class="stat-card normal"><div class="stat-label">Normal</div><div class="stat-value">{{normal}}</div></div>
        <div class="stat-card anomaly"><div class="stat-label">Anomali</div><div class="stat-value">{{anomaly}}</div></div>
    </div>

    <div class="charts">
        <div class="chart-box">
            <select id="chartDataLimit">{{limit_options}}</select>
            <canvas id="tempHumidityChart"></canvas>
        </div>
        <div class="chart-box"><canvas id="recentStatusPie"></canvas></div>
    </div>

    <div class="filter-section">
        <button class="filter-btn active" data-filter="all">Semua Data</button>
        <button class="filter-btn" data-filter="normal">Normal</button>
        <button class="filter-btn" data-filter="anomaly">Anomali</button>
        <select id="deviceSelect" class="filter-btn">
            <option>Urutkan Terbaru</option>
            <option>Urutkan Terlama</option>
            <option>Suhu Tertinggi</option>
            <option>Suhu Terendah</option>
        </select>
        <button id="exportCsvBtn" class="filter-btn">Export CSV</button>
    </div>
    <div class="search-section">
        <input class="search-box" type="text" placeholder="Cari device, suhu, kelembaban...">
        <button class="filter-btn">Cari</button>
    </div>

    <table>
        <thead>
            <tr><th>No</th><th>Waktu</th><th>Device ID</th><th>Suhu (°C)</th><th>Kelembaban (%)</th><th>Lokasi</th><th>Status</th></tr>
        </thead>
        <tbody id="sensor-rows">{{rows}}</tbody>
    </table>
    <div id="pagination-controls">{{pagination}}</div>
</div>

    {{blobs}}
<script src="https://cdn.jsdelivr.net/npm/chart.js@4"></script>
<script>
(function () {
    'use strict';

    const readJson = (id, fallback) => {
        const elem = document.getElementById(id);
        if (!elem) return fallback;
        try {
            const value = JSON.parse(elem.textContent || 'null');
            return value === null ? fallback : value;
        } catch (e) {
            console.error('Parse error for', id, e);
            return fallback;
        }
    };

    let viewRevision = readJson('view_revision_json', 0);
    let chartRevision = -1;
    const refreshMs = readJson('refresh_ms_json', 5000);

    const lineChart = new Chart(document.getElementById('tempHumidityChart'), {
        type: 'line',
        data: {
            labels: readJson('chart_labels_json', []),
            datasets: [
                { label: 'Suhu (°C)', data: readJson('chart_temps_json', []), borderColor: '#f72585', backgroundColor: 'rgba(247,37,133,0.08)', tension: 0.25 },
                { label: 'Kelembaban (%)', data: readJson('chart_humids_json', []), borderColor: '#4361ee', backgroundColor: 'rgba(67,97,238,0.08)', tension: 0.25 },
            ],
        },
        options: { responsive: true, maintainAspectRatio: false, scales: { y: { beginAtZero: true } } },
    });

    const pieChart = new Chart(document.getElementById('recentStatusPie'), {
        type: 'doughnut',
        data: {
            labels: ['Normal', 'Anomali'],
            datasets: [{ data: [readJson('normal_count_json', 0), readJson('anomaly_count_json', 0)], backgroundColor: ['#38b000', '#f72585'] }],
        },
        options: { responsive: true, maintainAspectRatio: false },
    });

    function applyView(view) {
        if (!view) return;
        document.getElementById('sensor-rows').innerHTML = view.table_html;
        document.getElementById('pagination-controls').innerHTML = view.pagination_html;
        viewRevision = view.revision;
    }

    function applyCharts(charts) {
        if (!charts) return;
        lineChart.data.labels = charts.line.labels;
        lineChart.data.datasets[0].data = charts.line.temperature;
        lineChart.data.datasets[1].data = charts.line.humidity;
        lineChart.update(charts.line.mode);
        pieChart.data.datasets[0].data = charts.donut.data;
        pieChart.update(charts.donut.mode);
        document.querySelector('.stat-card.total .stat-value').textContent = charts.stats.total;
        document.querySelector('.stat-card.normal .stat-value').textContent = charts.stats.normal;
        document.querySelector('.stat-card.anomaly .stat-value').textContent = charts.stats.anomaly;
        chartRevision = charts.revision;
    }

    async function send(path, body) {
        try {
            const response = await fetch(path, {
                method: 'POST',
                headers: { 'Content-Type': 'application/json' },
                body: JSON.stringify(body),
            });
            if (!response.ok) {
                console.warn('Request failed:', path, response.status);
                return null;
            }
            return await response.json();
        } catch (error) {
            console.error('Request error:', path, error);
            return null;
        }
    }

    document.querySelectorAll('.filter-section button.filter-btn[data-filter]').forEach((btn, _, all) => {
        btn.addEventListener('click', async () => {
            all.forEach(b => b.classList.remove('active'));
            btn.classList.add('active');
            applyView(await send('/api/view/filter', { filter: btn.dataset.filter }));
        });
    });

    document.getElementById('deviceSelect').addEventListener('change', async function () {
        applyView(await send('/api/view/sort', { sort: this.value }));
    });

    const searchBox = document.querySelector('.search-box');
    const search = async () => applyView(await send('/api/view/search', { query: searchBox.value.trim() }));
    document.querySelector('.search-section .filter-btn').addEventListener('click', search);
    searchBox.addEventListener('keypress', e => { if (e.key === 'Enter') search(); });

    document.getElementById('pagination-controls').addEventListener('click', async e => {
        const btn = e.target.closest('.pagination-btn');
        if (!btn) return;
        applyView(await send('/api/view/page', { page: parseInt(btn.dataset.page, 10) }));
    });

    document.getElementById('chartDataLimit').addEventListener('change', async function () {
        applyCharts(await send('/api/charts/limit', { limit: parseInt(this.value, 10) }));
    });

    document.getElementById('exportCsvBtn').addEventListener('click', async () => {
        const response = await fetch('/api/export.csv');
        if (!response.ok) {
            const body = await response.json().catch(() => ({}));
            alert(body.error || 'Tidak ada data untuk diekspor!');
            return;
        }
        const disposition = response.headers.get('Content-Disposition') || '';
        const match = disposition.match(/filename="([^"]+)"/);
        const url = URL.createObjectURL(await response.blob());
        const link = document.createElement('a');
        link.href = url;
        link.download = match ? match[1] : 'sensor_data.csv';
        document.body.appendChild(link);
        link.click();
        document.body.removeChild(link);
        setTimeout(() => URL.revokeObjectURL(url), 100);
    });

    async function refresh() {
        try {
            const [view, charts] = await Promise.all([
                fetch('/api/view').then(r => r.ok ? r.json() : null),
                fetch('/api/charts').then(r => r.ok ? r.json() : null),
            ]);
            if (view && view.revision !== viewRevision) applyView(view);
            if (charts && charts.revision !== chartRevision) applyCharts(charts);
        } catch (error) {
            console.error('Refresh error:', error);
        }
    }

    setInterval(refresh, refreshMs);
})();
</script>
</body>
</html>
"##;
