use serde::{Deserialize, Serialize};

use crate::Coordinate;

const EARTH_RADIUS_KM: f64 = 6_371.0;

/// Axis-aligned lat/lon box enclosing a path, used for viewport framing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl PathBounds {
    /// Malformed coordinates are skipped; `None` when nothing usable remains.
    pub fn from_path(path: &[Coordinate]) -> Option<Self> {
        let mut usable = path.iter().filter(|c| !c.is_malformed());
        let first = usable.next()?;
        let seed = Self {
            min_lat: first.lat,
            max_lat: first.lat,
            min_lon: first.lon,
            max_lon: first.lon,
        };
        Some(usable.fold(seed, |bounds, c| Self {
            min_lat: bounds.min_lat.min(c.lat),
            max_lat: bounds.max_lat.max(c.lat),
            min_lon: bounds.min_lon.min(c.lon),
            max_lon: bounds.max_lon.max(c.lon),
        }))
    }

    pub fn center(&self) -> Coordinate {
        Coordinate {
            lat: (self.min_lat + self.max_lat) / 2.0,
            lon: (self.min_lon + self.max_lon) / 2.0,
        }
    }

    pub fn contains(&self, coord: Coordinate) -> bool {
        (self.min_lat..=self.max_lat).contains(&coord.lat)
            && (self.min_lon..=self.max_lon).contains(&coord.lon)
    }
}

/// Track length along great circles. Segments touching a malformed
/// coordinate contribute nothing.
pub fn path_length_km(path: &[Coordinate]) -> f64 {
    path.windows(2)
        .filter(|w| !w[0].is_malformed() && !w[1].is_malformed())
        .map(|w| haversine_km(w[0], w[1]))
        .sum()
}

pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let sin_dlat = (dlat / 2.0).sin();
    let sin_dlon = (dlon / 2.0).sin();

    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon;
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}
