use serde::{Deserialize, Serialize};
use shared::{Coordinate, LoadReport, NamedPath, PathCollection, PathSummary};

pub use shared::ApiError;

#[derive(Debug, Serialize)]
pub struct PathEntry<'a> {
    pub name: &'a str,
    pub path: &'a [Coordinate],
    pub summary: PathSummary,
}

impl<'a> From<&'a NamedPath> for PathEntry<'a> {
    fn from(path: &'a NamedPath) -> Self {
        Self {
            name: path.name(),
            path: path.path(),
            summary: PathSummary::of(path),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PathsResponse<'a> {
    pub paths: Vec<PathEntry<'a>>,
    pub report: LoadReport,
}

impl<'a> PathsResponse<'a> {
    pub fn new(collection: &'a PathCollection, report: LoadReport) -> Self {
        Self {
            paths: collection.iter().map(PathEntry::from).collect(),
            report,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GpxResponse {
    pub name: String,
    pub gpx_base64: String,
}
