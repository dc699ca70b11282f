use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to build GPX document: {0}")]
    Gpx(#[from] gpx::errors::GpxError),
    #[error("path {0:?} has no valid coordinate to export")]
    NoValidPoints(String),
}
