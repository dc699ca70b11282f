//! Standalone Leaflet page with every flight drawn at the default style.

use std::fmt::Write;

use shared::{MapView, NamedPath, PathCollection, PathStyle};

const LEAFLET_VERSION: &str = "1.9.3";
const TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
const ATTRIBUTION: &str = "&copy; OpenStreetMap contributors";

pub fn render_map_html(collection: &PathCollection, view: MapView) -> String {
    let mut html = String::new();
    html.push_str(&page_head(view));
    for path in collection {
        html.push_str(&polyline_statement(path));
        html.push('\n');
    }
    html.push_str("</script>\n</body>\n</html>\n");
    html
}

fn page_head(view: MapView) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8" />
  <title>Flight Paths</title>
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <link rel="stylesheet" href="https://unpkg.com/leaflet@{LEAFLET_VERSION}/dist/leaflet.css" />
  <script src="https://unpkg.com/leaflet@{LEAFLET_VERSION}/dist/leaflet.js"></script>
  <style>
    html, body, #map {{
      height: 100%;
      margin: 0;
    }}
  </style>
</head>
<body>
<div id="map"></div>
<script>
  const map = L.map('map').setView([{lat}, {lon}], {zoom});
  L.tileLayer('{TILE_URL}', {{
    attribution: '{ATTRIBUTION}'
  }}).addTo(map);
"#,
        lat = view.center.lat,
        lon = view.center.lon,
        zoom = view.zoom,
    )
}

/// `L.polyline(...)` for one path. Malformed coordinates are dropped since
/// JavaScript arrays cannot carry them through JSON.
fn polyline_statement(path: &NamedPath) -> String {
    let mut points = String::from("[");
    for (i, coord) in path.path().iter().filter(|c| !c.is_malformed()).enumerate() {
        if i > 0 {
            points.push(',');
        }
        let _ = write!(points, "[{}, {}]", coord.lat, coord.lon);
    }
    points.push(']');

    format!(
        "  L.polyline({points}, {style}).addTo(map).bindTooltip({label});",
        style = script_literal(&PathStyle::default_stroke()),
        label = script_literal(path.name()),
    )
}

/// JSON is valid JavaScript; `</` is escaped so a name cannot close the
/// surrounding script element.
fn script_literal<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| "null".to_string())
        .replace("</", "<\\/")
}
