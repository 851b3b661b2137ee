//! UI routes - HTML page for the floradex-id web interface
//!
//! Single inline page (vanilla ES6+, no frameworks): upload a photo, pick
//! the organ, browse candidate species, then drill into invasive-species
//! tables, map points, and the encyclopedia panel for a selection.

use axum::{
    response::{Html, IntoResponse},
    routing::get,
    Router,
};

use crate::AppState;

/// Build UI routes
pub fn ui_routes() -> Router<AppState> {
    Router::new().route("/", get(root_page))
}

/// Root page - Plant Identification Home
async fn root_page() -> impl IntoResponse {
    Html(
        r##"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>floradex-id - Plant Species Identifier</title>
    <style>
        body {
            font-family: system-ui, -apple-system, sans-serif;
            max-width: 900px;
            margin: 40px auto;
            padding: 20px;
            line-height: 1.6;
        }
        h1 {
            color: #2d5016;
            border-bottom: 2px solid #4a7c23;
            padding-bottom: 10px;
        }
        .button {
            display: inline-block;
            padding: 10px 20px;
            background: #4a7c23;
            color: white;
            border: none;
            border-radius: 4px;
            cursor: pointer;
        }
        .button:hover {
            background: #3a6119;
        }
        table {
            border-collapse: collapse;
            width: 100%;
            margin: 12px 0;
        }
        th, td {
            border: 1px solid #ccc;
            padding: 6px 10px;
            text-align: left;
        }
        th {
            background: #eef4e6;
        }
        tr.selectable:hover {
            background: #f4f9ee;
            cursor: pointer;
        }
        .warning {
            color: #b30000;
            font-weight: bold;
        }
        .panel {
            border-left: 5px solid #4a7c23;
            background: #f8faf5;
            padding: 1em 1.5em;
            border-radius: 6px;
            margin: 1em 0;
        }
        .toxicity {
            border-left-color: #b30000;
            background: #fff6f6;
            white-space: pre-line;
        }
        #status { color: gray; }
    </style>
</head>
<body>
    <h1>Plant Species Identifier</h1>
    <p>Upload a plant photo to identify its species, then check Forest
    Service invasive-species records and encyclopedia details.</p>

    <form id="upload-form">
        <input type="file" id="image" accept="image/jpeg,image/png" required>
        <label for="organ">Organ shown:</label>
        <select id="organ">
            <option value="auto" selected>auto</option>
            <option value="leaf">leaf</option>
            <option value="flower">flower</option>
            <option value="fruit">fruit</option>
            <option value="bark">bark</option>
            <option value="habit">habit</option>
        </select>
        <button type="submit" class="button">Identify</button>
    </form>
    <p id="status"></p>

    <div id="results" hidden>
        <h2>Candidate Species</h2>
        <table id="species-table">
            <thead><tr>
                <th>Scientific Name</th><th>Common Names</th><th>Genus</th>
                <th>Family</th><th>Confidence Score</th>
            </tr></thead>
            <tbody></tbody>
        </table>
        <p>Select a row to see invasive-species and encyclopedia details.</p>
    </div>

    <div id="detail" hidden>
        <h2 id="detail-title"></h2>
        <p id="invasive-warning" class="warning" hidden></p>

        <h3>Invasive Species Records (Forest Service)</h3>
        <table id="invasive-table">
            <thead><tr>
                <th>NRCS Plant Code</th><th>Scientific Name</th>
                <th>Common Name</th><th>Project Code</th><th>Plant Status</th>
                <th>Forest Name</th><th>Examiners</th><th>Updated</th>
            </tr></thead>
            <tbody></tbody>
        </table>

        <h3>Summary by Forest Name</h3>
        <table id="summary-table">
            <thead><tr><th>Forest Name</th><th>Record Count</th></tr></thead>
            <tbody></tbody>
        </table>

        <h3>Map Points</h3>
        <table id="map-table">
            <thead><tr><th>Forest Name</th><th>Latitude</th><th>Longitude</th></tr></thead>
            <tbody></tbody>
        </table>

        <div id="encyclopedia" class="panel" hidden>
            <h3 id="wiki-title"></h3>
            <img id="wiki-thumb" width="200" hidden>
            <p id="wiki-description"></p>
            <p id="wiki-extract"></p>
            <p><a id="wiki-link" target="_blank" rel="noopener">Read more</a></p>
        </div>

        <div id="invasive-section" class="panel" hidden></div>
        <div id="toxicity-section" class="panel toxicity" hidden></div>
    </div>

    <script>
        const status = document.getElementById('status');
        const cellText = (row, text) => {
            const td = document.createElement('td');
            td.textContent = text;
            row.appendChild(td);
        };

        document.getElementById('upload-form').addEventListener('submit', async (e) => {
            e.preventDefault();
            const file = document.getElementById('image').files[0];
            if (!file) return;

            const form = new FormData();
            form.append('image', file);
            form.append('organ', document.getElementById('organ').value);

            status.textContent = 'Identifying...';
            document.getElementById('detail').hidden = true;
            try {
                const resp = await fetch('/api/identify', { method: 'POST', body: form });
                const body = await resp.json();
                if (!resp.ok) throw new Error(body.error ? body.error.message : resp.statusText);
                renderCandidates(body.candidates);
                status.textContent = body.candidates.length
                    ? '' : 'No species identified. Try another image.';
            } catch (err) {
                status.textContent = 'Identification failed: ' + err.message;
            }
        });

        function renderCandidates(candidates) {
            const tbody = document.querySelector('#species-table tbody');
            tbody.innerHTML = '';
            for (const c of candidates) {
                const row = document.createElement('tr');
                row.className = 'selectable';
                cellText(row, c.scientific_name);
                cellText(row, c.common_names.join(', '));
                cellText(row, c.genus);
                cellText(row, c.family);
                cellText(row, c.score_display);
                row.addEventListener('click', () => showDetail(c.scientific_name));
                tbody.appendChild(row);
            }
            document.getElementById('results').hidden = candidates.length === 0;
        }

        async function showDetail(name) {
            status.textContent = 'Loading details for ' + name + '...';
            try {
                const resp = await fetch('/api/species/' + encodeURIComponent(name));
                const body = await resp.json();
                if (!resp.ok) throw new Error(body.error ? body.error.message : resp.statusText);
                renderDetail(body);
                status.textContent = '';
            } catch (err) {
                status.textContent = 'Detail lookup failed: ' + err.message;
            }
        }

        function renderDetail(detail) {
            document.getElementById('detail-title').textContent = detail.scientific_name;

            const warning = document.getElementById('invasive-warning');
            warning.hidden = !detail.invasive_warning;
            warning.textContent = detail.invasive_warning || '';

            const records = document.querySelector('#invasive-table tbody');
            records.innerHTML = '';
            for (const r of detail.invasive.records) {
                const row = document.createElement('tr');
                for (const v of [r.plant_code, r.scientific_name, r.common_name,
                                 r.project_code, r.plant_status, r.unit_name,
                                 r.examiners, r.last_update]) {
                    cellText(row, v);
                }
                records.appendChild(row);
            }

            const summaries = document.querySelector('#summary-table tbody');
            summaries.innerHTML = '';
            for (const s of detail.invasive.summaries) {
                const row = document.createElement('tr');
                cellText(row, s.unit_name);
                cellText(row, String(s.record_count));
                summaries.appendChild(row);
            }

            const points = document.querySelector('#map-table tbody');
            points.innerHTML = '';
            for (const p of detail.invasive.points) {
                const row = document.createElement('tr');
                cellText(row, p.label);
                cellText(row, p.lat.toFixed(4));
                cellText(row, p.lon.toFixed(4));
                points.appendChild(row);
            }

            const wiki = document.getElementById('encyclopedia');
            if (detail.encyclopedia) {
                const e = detail.encyclopedia;
                wiki.hidden = false;
                document.getElementById('wiki-title').textContent = e.title;
                const thumb = document.getElementById('wiki-thumb');
                thumb.hidden = !e.thumbnail_url;
                if (e.thumbnail_url) thumb.src = e.thumbnail_url;
                document.getElementById('wiki-description').textContent = e.description || '';
                document.getElementById('wiki-extract').textContent = e.extract || '';
                const link = document.getElementById('wiki-link');
                link.hidden = !e.page_url;
                if (e.page_url) link.href = e.page_url;
            } else {
                wiki.hidden = true;
            }

            const invasiveSection = document.getElementById('invasive-section');
            invasiveSection.hidden = !detail.invasive_section;
            invasiveSection.textContent = detail.invasive_section || '';

            const toxicitySection = document.getElementById('toxicity-section');
            toxicitySection.hidden = !detail.toxicity_section;
            // Toxicity text carries highlight markup from the server
            toxicitySection.innerHTML = detail.toxicity_section || '';

            document.getElementById('detail').hidden = false;
        }
    </script>

    <p><small>Module: floradex-id v0.1.0 | Port 5731</small></p>
</body>
</html>
"##,
    )
}
