//! Turns fetched KML payloads into a [`PathCollection`]. The builder performs
//! no I/O: callers fetch documents however they like and hand each result
//! over, failures included, so one bad document never stops the others.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::kml::extract_path;
use crate::{NamedPath, PathCollection};

pub const KML_EXTENSION: &str = ".kml";

/// Display name of a document: the identifier minus a trailing `.kml`.
pub fn display_name(identifier: &str) -> &str {
    identifier
        .strip_suffix(KML_EXTENSION)
        .unwrap_or(identifier)
}

/// Decodes the JSON array of document identifiers. An unreadable list is
/// treated as an empty one.
pub fn parse_document_list(json: &str) -> Vec<String> {
    match serde_json::from_str::<Vec<String>>(json) {
        Ok(identifiers) => identifiers,
        Err(err) => {
            tracing::error!("document list unavailable: {err}");
            Vec::new()
        }
    }
}

/// What happened to each document pushed through the builder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
    pub loaded: usize,
    pub unavailable: usize,
    pub malformed: usize,
    pub empty: usize,
    /// Loaded documents carrying at least one non-numeric coordinate.
    pub with_malformed_points: usize,
}

impl LoadReport {
    pub fn documents(&self) -> usize {
        self.loaded + self.unavailable + self.malformed + self.empty
    }
}

#[derive(Debug, Default)]
pub struct PathCollectionBuilder {
    paths: Vec<NamedPath>,
    report: LoadReport,
}

impl PathCollectionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one fetch outcome. Documents are kept in the order pushed.
    pub fn push_document<E: Display>(&mut self, identifier: &str, fetched: Result<String, E>) {
        let text = match fetched {
            Ok(text) => text,
            Err(err) => {
                tracing::error!("failed to fetch {identifier}: {err}");
                self.report.unavailable += 1;
                return;
            }
        };

        let extraction = match extract_path(&text) {
            Ok(extraction) => extraction,
            Err(err) => {
                tracing::error!("error processing {identifier}: {err}");
                self.report.malformed += 1;
                return;
            }
        };

        let malformed_points = extraction.malformed_points();
        let schema = extraction.schema;
        let Some(path) = NamedPath::new(display_name(identifier), extraction.path) else {
            tracing::debug!("{identifier} holds no track or line string, skipping");
            self.report.empty += 1;
            return;
        };

        if malformed_points > 0 {
            tracing::warn!(
                "{identifier}: {malformed_points} coordinate(s) failed to parse and are kept as NaN"
            );
            self.report.with_malformed_points += 1;
        }
        tracing::debug!(
            "loaded {identifier} ({} points, {schema:?})",
            path.path().len()
        );
        self.report.loaded += 1;
        self.paths.push(path);
    }

    pub fn finish(self) -> (PathCollection, LoadReport) {
        if self.paths.is_empty() {
            tracing::warn!("no paths produced from {} document(s)", self.report.documents());
        }
        (self.paths.into_iter().collect(), self.report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Coordinate;

    const ONE_POINT_TRACK: &str = r#"<kml xmlns:gx="http://www.google.com/kml/ext/2.2">
        <gx:Track><gx:coord>19.0 52.0 120</gx:coord></gx:Track></kml>"#;

    #[test]
    fn display_name_strips_only_trailing_extension() {
        assert_eq!(display_name("2024-05-01.kml"), "2024-05-01");
        assert_eq!(display_name("a.kml.kml"), "a.kml");
        assert_eq!(display_name("a.kmlz"), "a.kmlz");
        assert_eq!(display_name("my.kml.backup"), "my.kml.backup");
        assert_eq!(display_name("noext"), "noext");
    }

    #[test]
    fn document_list_parses_identifiers() {
        assert_eq!(
            parse_document_list(r#"["a.kml", "b.kml"]"#),
            vec!["a.kml".to_string(), "b.kml".to_string()]
        );
    }

    #[test]
    fn unreadable_document_list_is_empty() {
        assert!(parse_document_list("<html>nope</html>").is_empty());
        assert!(parse_document_list(r#"{"files": []}"#).is_empty());
    }

    #[test]
    fn malformed_document_is_skipped() {
        let mut builder = PathCollectionBuilder::new();
        builder.push_document::<String>("a.kml", Ok(ONE_POINT_TRACK.to_string()));
        builder.push_document::<String>("b.kml", Ok("<kml><Document>".to_string()));
        let (collection, report) = builder.finish();

        assert_eq!(collection.len(), 1);
        let only = collection.iter().next().unwrap();
        assert_eq!(only.name(), "a");
        assert_eq!(only.path(), &[Coordinate::new(52.0, 19.0)]);
        assert_eq!(report.loaded, 1);
        assert_eq!(report.malformed, 1);
    }

    #[test]
    fn fetch_failure_does_not_abort_remaining_documents() {
        let mut builder = PathCollectionBuilder::new();
        builder.push_document("gone.kml", Err("404 Not Found"));
        builder.push_document::<&str>("a.kml", Ok(ONE_POINT_TRACK.to_string()));
        let (collection, report) = builder.finish();

        assert_eq!(collection.len(), 1);
        assert_eq!(report.unavailable, 1);
        assert_eq!(report.documents(), 2);
    }

    #[test]
    fn document_without_points_is_dropped() {
        let mut builder = PathCollectionBuilder::new();
        builder.push_document::<&str>("blank.kml", Ok("<kml><Document/></kml>".to_string()));
        let (collection, report) = builder.finish();

        assert!(collection.is_empty());
        assert_eq!(report.empty, 1);
    }

    #[test]
    fn collection_preserves_push_order_and_duplicates() {
        let mut builder = PathCollectionBuilder::new();
        for id in ["z.kml", "a.kml", "z.kml"] {
            builder.push_document::<&str>(id, Ok(ONE_POINT_TRACK.to_string()));
        }
        let (collection, _) = builder.finish();
        let names: Vec<&str> = collection.iter().map(NamedPath::name).collect();
        assert_eq!(names, ["z", "a", "z"]);
    }

    #[test]
    fn malformed_points_are_reported_but_kept() {
        let xml = r#"<kml><gx:Track><gx:coord>x 52 0</gx:coord></gx:Track></kml>"#;
        let mut builder = PathCollectionBuilder::new();
        builder.push_document::<&str>("nan.kml", Ok(xml.to_string()));
        let (collection, report) = builder.finish();

        assert_eq!(collection.len(), 1);
        assert_eq!(report.with_malformed_points, 1);
        assert!(collection.iter().next().unwrap().path()[0].lon.is_nan());
    }
}
