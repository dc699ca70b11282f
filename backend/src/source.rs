use std::{
    fs,
    io,
    path::{Component, Path, PathBuf},
};

use shared::{LoadReport, PathCollection, PathCollectionBuilder};

/// Optional list of documents to serve, in display order.
pub const MANIFEST_FILE: &str = "kml_files.json";
const KML_EXTENSION: &str = "kml";

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid document manifest: {0}")]
    Manifest(#[from] serde_json::Error),
    #[error("invalid document identifier {0:?}")]
    InvalidIdentifier(String),
}

/// A folder of KML flight logs. Identifiers are file names relative to the
/// folder.
#[derive(Debug, Clone)]
pub struct KmlDirectory {
    root: PathBuf,
}

impl KmlDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Document identifiers from `kml_files.json` when present, otherwise
    /// every `*.kml` file in the folder sorted by name.
    pub fn list(&self) -> Result<Vec<String>, SourceError> {
        let manifest = self.root.join(MANIFEST_FILE);
        if manifest.is_file() {
            let raw = fs::read_to_string(&manifest).map_err(|source| SourceError::Io {
                path: manifest.clone(),
                source,
            })?;
            return Ok(serde_json::from_str(&raw)?);
        }

        let entries = fs::read_dir(&self.root).map_err(|source| SourceError::Io {
            path: self.root.clone(),
            source,
        })?;
        let mut identifiers: Vec<String> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter(|path| path.extension().is_some_and(|ext| ext == KML_EXTENSION))
            .filter_map(|path| path.file_name()?.to_str().map(str::to_string))
            .collect();
        identifiers.sort();
        Ok(identifiers)
    }

    pub fn fetch(&self, identifier: &str) -> Result<String, SourceError> {
        let path = self.resolve(identifier)?;
        fs::read_to_string(&path).map_err(|source| SourceError::Io { path, source })
    }

    /// Lists, reads and extracts every document. Missing list or unreadable
    /// documents are logged and skipped.
    pub fn load_collection(&self) -> (PathCollection, LoadReport) {
        let identifiers = self.list().unwrap_or_else(|err| {
            tracing::error!("error fetching KML list: {err}");
            Vec::new()
        });

        let mut builder = PathCollectionBuilder::new();
        for identifier in &identifiers {
            builder.push_document(identifier, self.fetch(identifier));
        }
        let (collection, report) = builder.finish();
        tracing::info!(
            "loaded {} path(s) from {} document(s) in {:?}",
            collection.len(),
            report.documents(),
            self.root
        );
        (collection, report)
    }

    fn resolve(&self, identifier: &str) -> Result<PathBuf, SourceError> {
        let mut components = Path::new(identifier).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(self.root.join(identifier)),
            _ => Err(SourceError::InvalidIdentifier(identifier.to_string())),
        }
    }
}
