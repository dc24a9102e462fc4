//! Leaflet map output.

use crate::domain::model::CoordinateTable;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{validate_range, Validate};
use serde::{Deserialize, Serialize};

pub const DEFAULT_ZOOM: u8 = 8;

const MAP_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{TITLE}}</title>
  <link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css" crossorigin="" />
  <script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js" crossorigin=""></script>
  <style>
    html, body { height: 100%; margin: 0; }
    #map { position: absolute; inset: 0; }
  </style>
</head>
<body>
  <div id="map"></div>
  <script>
    const view = {{VIEW}};
    const points = {{POINTS}};

    const map = L.map('map').setView(view.center, view.zoom);
    L.tileLayer(view.tiles.url, {
      attribution: view.tiles.attribution,
      maxZoom: view.tiles.maxZoom
    }).addTo(map);

    for (const point of points) {
      L.circleMarker(point, view.marker).addTo(map);
    }
  </script>
</body>
</html>
"#;

/// Named base layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TileLayer {
    #[default]
    #[serde(rename = "openstreetmap", alias = "OpenStreetMap")]
    OpenStreetMap,
    #[serde(rename = "cartodb-positron")]
    CartoDbPositron,
    #[serde(rename = "cartodb-dark-matter")]
    CartoDbDarkMatter,
}

impl TileLayer {
    pub fn url(&self) -> &'static str {
        match self {
            TileLayer::OpenStreetMap => "https://tile.openstreetmap.org/{z}/{x}/{y}.png",
            TileLayer::CartoDbPositron => {
                "https://{s}.basemaps.cartocdn.com/light_all/{z}/{x}/{y}{r}.png"
            }
            TileLayer::CartoDbDarkMatter => {
                "https://{s}.basemaps.cartocdn.com/dark_all/{z}/{x}/{y}{r}.png"
            }
        }
    }

    pub fn attribution(&self) -> &'static str {
        match self {
            TileLayer::OpenStreetMap => {
                "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors"
            }
            TileLayer::CartoDbPositron | TileLayer::CartoDbDarkMatter => {
                "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors &copy; <a href=\"https://carto.com/attributions\">CARTO</a>"
            }
        }
    }

    pub fn max_zoom(&self) -> u8 {
        match self {
            TileLayer::OpenStreetMap => 19,
            TileLayer::CartoDbPositron | TileLayer::CartoDbDarkMatter => 20,
        }
    }
}

/// Circle marker options, serialized with Leaflet's option names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarkerStyle {
    pub radius: f64,
    pub weight: f64,
    pub color: String,
    pub fill: bool,
    #[serde(rename = "fillOpacity", alias = "fill_opacity")]
    pub fill_opacity: f64,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            radius: 4.0,
            weight: 1.0,
            color: "#3388ff".to_string(),
            fill: true,
            fill_opacity: 0.8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapConfig {
    pub title: String,
    pub zoom: u8,
    pub tiles: TileLayer,
    pub marker: MarkerStyle,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            title: "Camera map".to_string(),
            zoom: DEFAULT_ZOOM,
            tiles: TileLayer::default(),
            marker: MarkerStyle::default(),
        }
    }
}

impl Validate for MapConfig {
    fn validate(&self) -> Result<()> {
        validate_range("map.zoom", self.zoom, 0, self.tiles.max_zoom())?;
        validate_range("map.marker.radius", self.marker.radius, 0.5, 100.0)?;
        validate_range("map.marker.weight", self.marker.weight, 0.0, 20.0)?;
        validate_range("map.marker.fill_opacity", self.marker.fill_opacity, 0.0, 1.0)?;
        Ok(())
    }
}

#[derive(Serialize)]
struct TileView {
    url: &'static str,
    attribution: &'static str,
    #[serde(rename = "maxZoom")]
    max_zoom: u8,
}

#[derive(Serialize)]
struct MapView<'a> {
    center: [f64; 2],
    zoom: u8,
    tiles: TileView,
    marker: &'a MarkerStyle,
}

pub struct MapRenderer {
    config: MapConfig,
}

impl MapRenderer {
    pub fn new(config: MapConfig) -> Self {
        Self { config }
    }

    /// Renders a self-contained HTML page with one circle marker per pair,
    /// centered on the table's centroid.
    pub fn render(&self, table: &CoordinateTable) -> Result<String> {
        let center = table.centroid().ok_or(EtlError::NoCoordinatesFound)?;

        let view = MapView {
            center: [center.latitude, center.longitude],
            zoom: self.config.zoom,
            tiles: TileView {
                url: self.config.tiles.url(),
                attribution: self.config.tiles.attribution(),
                max_zoom: self.config.tiles.max_zoom(),
            },
            marker: &self.config.marker,
        };
        let points: Vec<[f64; 2]> = table
            .iter()
            .map(|p| [p.latitude, p.longitude])
            .collect();

        tracing::debug!(
            "Rendering {} marker(s) centered at ({:.6}, {:.6})",
            points.len(),
            center.latitude,
            center.longitude
        );

        Ok(MAP_TEMPLATE
            .replace("{{TITLE}}", &escape_html(&self.config.title))
            .replace("{{VIEW}}", &script_json(&view)?)
            .replace("{{POINTS}}", &script_json(&points)?))
    }
}

/// JSON that is safe to inline inside a `<script>` element.
fn script_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
