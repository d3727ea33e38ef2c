//! Embedded HTML/CSS/JS frontend for the dashboard.
//!
//! The page is compiled into the binary as a string constant. It fetches
//! filter options and chart inputs from the JSON API and draws them with
//! Chart.js; all filtering and aggregation happens server-side.

/// The complete single-page dashboard HTML.
pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Data Visualization Dashboard</title>
<script src="https://cdn.jsdelivr.net/npm/chart.js@4"></script>
<style>
:root {
  --text: #333;
  --muted: #555;
  --accent: #766cf2;
  --focus: #4CAF50;
  --radius: 15px;
  --font: 'Roboto', -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif;
}

@keyframes gradient {
  0%   { background-position: 0% 50%; }
  50%  { background-position: 100% 50%; }
  100% { background-position: 0% 50%; }
}

@keyframes fadeIn {
  from { opacity: 0; }
  to   { opacity: 1; }
}

* { box-sizing: border-box; }
body {
  margin: 0;
  font-family: var(--font);
  color: var(--text);
  text-align: center;
  padding: 20px;
  min-height: 100vh;
  background: linear-gradient(120deg, #f6d365 0%, #fda085 100%);
  background-size: 200% 200%;
  animation: gradient 10s ease infinite;
}

h1 {
  font-size: 2.5rem;
  color: var(--accent);
  margin-bottom: 20px;
  animation: fadeIn 1s ease-in-out;
}

.filters {
  display: flex;
  flex-wrap: wrap;
  justify-content: center;
  margin-bottom: 20px;
}

.filters label {
  margin: 10px;
  font-size: 1rem;
  color: var(--muted);
}

.filters select {
  padding: 10px;
  border-radius: 5px;
  border: 1px solid #ccc;
  margin-left: 10px;
  background: #fff;
  max-width: 220px;
  transition: all 0.3s ease;
}

.filters select:focus {
  outline: none;
  border-color: var(--focus);
  box-shadow: 0 0 5px rgba(76, 175, 80, 0.5);
}

.summary {
  color: var(--muted);
  margin-bottom: 10px;
}

.charts {
  display: flex;
  justify-content: space-around;
  align-items: flex-start;
  gap: 20px;
  flex-wrap: wrap;
}

.card {
  border-radius: var(--radius);
  padding: 20px;
  box-shadow: 0 8px 16px rgba(0, 0, 0, 0.2);
  background: rgba(255, 255, 255, 0.95);
  transition: all 0.3s ease;
  animation: fadeIn 1s ease-in-out;
}

.card:hover {
  transform: translateY(-5px);
  box-shadow: 0 12px 24px rgba(0, 0, 0, 0.3);
}

.card.wide  { width: 100%; max-width: 1200px; height: 540px; }
.card.small { width: 100%; max-width: 500px; height: 420px; }

.empty {
  color: var(--muted);
  padding: 80px 0;
}
</style>
</head>
<body>
<h1>Data Visualization Dashboard</h1>

<div id="filters" class="filters"></div>
<div id="summary" class="summary"></div>
<div id="empty" class="empty" hidden>No data available.</div>

<div id="charts" class="charts" hidden>
  <div class="card wide"><canvas id="bar"></canvas></div>
  <div class="card small"><canvas id="doughnut"></canvas></div>
  <div class="card small"><canvas id="polar"></canvas></div>
</div>

<script>
const filters = {};
const instances = {};

async function getJson(url) {
  const resp = await fetch(url);
  if (!resp.ok) throw new Error(url + ': ' + resp.status);
  return resp.json();
}

function query() {
  const parts = Object.entries(filters)
    .filter(([, v]) => v !== '')
    .map(([k, v]) => encodeURIComponent(k) + '=' + encodeURIComponent(v));
  return parts.length ? '?' + parts.join('&') : '';
}

function buildControls(options) {
  const root = document.getElementById('filters');
  root.innerHTML = '';
  for (const opt of options.fields) {
    filters[opt.field] = '';
    const label = document.createElement('label');
    label.textContent = 'Select ' + opt.label + ':';
    const select = document.createElement('select');
    select.name = opt.field;
    select.add(new Option('All', ''));
    for (const value of opt.values) select.add(new Option(value, value));
    select.addEventListener('change', e => {
      filters[e.target.name] = e.target.value;
      refresh();
    });
    label.appendChild(select);
    root.appendChild(label);
  }
}

function draw(id, spec, data) {
  if (instances[id]) instances[id].destroy();
  instances[id] = new Chart(document.getElementById(id), {
    type: spec.type,
    data: data,
    options: spec.options,
  });
}

async function refresh() {
  try {
    const body = await getJson('/api/charts' + query());
    const c = body.charts;
    document.getElementById('summary').textContent =
      c.matched_records + ' of ' + c.total_records + ' records';
    draw('bar', body.specs.series, c.series);
    draw('doughnut', body.specs.by_country, c.by_country);
    draw('polar', body.specs.by_region, c.by_region);
  } catch (e) {
    console.error('Error loading charts:', e);
  }
}

async function init() {
  try {
    const health = await getJson('/api/health');
    if (!health.loaded || health.records === 0) {
      document.getElementById('empty').hidden = false;
      return;
    }
    buildControls(await getJson('/api/options'));
    document.getElementById('charts').hidden = false;
    await refresh();
  } catch (e) {
    console.error('Error fetching data:', e);
  }
}

init();
</script>
</body>
</html>
"##;
