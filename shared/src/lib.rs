pub mod geometry;
pub mod kml;
pub mod pipeline;
pub mod selection;

use serde::{Deserialize, Serialize};

pub use geometry::{PathBounds, haversine_km, path_length_km};
pub use kml::{Extraction, KmlError, Schema, extract_path};
pub use pipeline::{LoadReport, PathCollectionBuilder, display_name, parse_document_list};
pub use selection::{
    EntryOrder, MapSurface, SelectionController, SelectionState, SelectorControl, SelectorEntry,
};

/// A WGS84 position in decimal degrees. Altitude is never retained.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Either component failed to parse from the source document.
    pub fn is_malformed(&self) -> bool {
        self.lat.is_nan() || self.lon.is_nan()
    }
}

/// A non-empty flight track paired with the name of the document it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedPath {
    name: String,
    path: Vec<Coordinate>,
}

impl NamedPath {
    /// Returns `None` for an empty path; empty tracks are never materialized.
    pub fn new(name: impl Into<String>, path: Vec<Coordinate>) -> Option<Self> {
        if path.is_empty() {
            return None;
        }
        Some(Self {
            name: name.into(),
            path,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &[Coordinate] {
        &self.path
    }

    pub fn bounds(&self) -> Option<PathBounds> {
        PathBounds::from_path(&self.path)
    }
}

/// Ordered, immutable set of named paths. Duplicate names are kept as
/// distinct entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PathCollection(Vec<NamedPath>);

impl PathCollection {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NamedPath> {
        self.0.iter()
    }

    /// First path carrying `name`, in collection order.
    pub fn find(&self, name: &str) -> Option<&NamedPath> {
        self.0.iter().find(|entry| entry.name == name)
    }
}

impl FromIterator<NamedPath> for PathCollection {
    fn from_iter<I: IntoIterator<Item = NamedPath>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a PathCollection {
    type Item = &'a NamedPath;
    type IntoIter = std::slice::Iter<'a, NamedPath>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Stroke settings handed to the map renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathStyle {
    pub color: String,
    pub opacity: f64,
    pub weight: u32,
}

pub const DEFAULT_COLOR: &str = "#3C3CE8";
pub const HIGHLIGHT_COLOR: &str = "#FF0000";
pub const DEFAULT_WEIGHT: u32 = 2;

impl PathStyle {
    pub fn default_stroke() -> Self {
        Self {
            color: DEFAULT_COLOR.to_string(),
            opacity: 1.0,
            weight: DEFAULT_WEIGHT,
        }
    }

    pub fn highlight() -> Self {
        Self {
            color: HIGHLIGHT_COLOR.to_string(),
            ..Self::default_stroke()
        }
    }

    pub fn hidden() -> Self {
        Self {
            opacity: 0.0,
            ..Self::default_stroke()
        }
    }
}

impl Default for PathStyle {
    fn default() -> Self {
        Self::default_stroke()
    }
}

/// Per-path figures the backend publishes next to the geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathSummary {
    pub name: String,
    pub point_count: usize,
    pub distance_km: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<PathBounds>,
}

impl PathSummary {
    pub fn of(path: &NamedPath) -> Self {
        Self {
            name: path.name().to_string(),
            point_count: path.path().len(),
            distance_km: path_length_km(path.path()),
            bounds: path.bounds(),
        }
    }
}

/// Initial map framing before any path is selected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    pub center: Coordinate,
    pub zoom: u8,
}

impl Default for MapView {
    fn default() -> Self {
        // central Poland
        Self {
            center: Coordinate { lat: 52.0, lon: 19.0 },
            zoom: 6,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_path_rejects_empty_track() {
        assert!(NamedPath::new("empty", Vec::new()).is_none());
    }

    #[test]
    fn collection_keeps_duplicate_names() {
        let collection: PathCollection = [
            NamedPath::new("dup", vec![Coordinate::new(1.0, 2.0)]),
            NamedPath::new("dup", vec![Coordinate::new(3.0, 4.0)]),
        ]
        .into_iter()
        .flatten()
        .collect();

        assert_eq!(collection.len(), 2);
        assert_eq!(
            collection.find("dup").map(|p| p.path()[0]),
            Some(Coordinate::new(1.0, 2.0))
        );
    }

    #[test]
    fn hidden_style_only_drops_opacity() {
        let hidden = PathStyle::hidden();
        assert_eq!(hidden.opacity, 0.0);
        assert_eq!(hidden.color, DEFAULT_COLOR);
        assert_eq!(PathStyle::highlight().opacity, 1.0);
    }

    #[test]
    fn summary_counts_points() {
        let path = NamedPath::new(
            "a",
            vec![Coordinate::new(45.0, 5.0), Coordinate::new(46.0, 5.0)],
        )
        .unwrap();
        let summary = PathSummary::of(&path);
        assert_eq!(summary.point_count, 2);
        assert!((summary.distance_km - 111.19).abs() < 0.1);
        assert_eq!(summary.bounds.unwrap().min_lat, 45.0);
    }
}
