use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use geo_types::Point;
use gpx::{Gpx, GpxVersion, Track, TrackSegment, Waypoint};
use shared::{Coordinate, NamedPath};

use crate::error::ExportError;

/// Encodes one flight as a base64 GPX 1.1 track. Malformed coordinates are
/// left out.
pub fn encode_path_as_gpx(path: &NamedPath) -> Result<String, ExportError> {
    let mut segment = TrackSegment::new();
    segment.points.extend(
        path.path()
            .iter()
            .filter(|coord| !coord.is_malformed())
            .map(to_waypoint),
    );
    if segment.points.is_empty() {
        return Err(ExportError::NoValidPoints(path.name().to_string()));
    }

    let mut track = Track {
        name: Some(path.name().to_string()),
        ..Default::default()
    };
    track.segments.push(segment);

    let mut gpx = Gpx {
        version: GpxVersion::Gpx11,
        creator: Some("flight-paths".into()),
        ..Default::default()
    };
    gpx.tracks.push(track);

    let mut buffer = Vec::new();
    gpx::write(&gpx, &mut buffer)?;
    Ok(BASE64.encode(buffer))
}

fn to_waypoint(coord: &Coordinate) -> Waypoint {
    Waypoint::new(Point::new(coord.lon, coord.lat))
}
