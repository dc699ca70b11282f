//! Coordinate extraction for the two KML encodings found in flight logs:
//! `gx:Track` (one `lon lat alt` sample per `gx:coord`) and `LineString`
//! (one `lon,lat[,alt]` token per whitespace-separated point).
//!
//! The whole document is scanned once. Track samples win: line-string points
//! are only used when no track sample exists anywhere in the document.

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::Coordinate;

const TRACK_TAG: &[u8] = b"gx:Track";
const SAMPLE_TAG: &[u8] = b"gx:coord";
const LINE_STRING_TAG: &[u8] = b"LineString";
const COORDINATES_TAG: &[u8] = b"coordinates";

#[derive(Debug, thiserror::Error)]
pub enum KmlError {
    #[error("malformed KML near byte {position}: {message}")]
    Malformed { position: u64, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schema {
    Track,
    LineString,
}

/// Geometry of one document. `schema` is `None` when neither encoding
/// produced a point.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub schema: Option<Schema>,
    pub path: Vec<Coordinate>,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Points with a field that did not parse as a number. These stay in the
    /// path as NaN.
    pub fn malformed_points(&self) -> usize {
        self.path.iter().filter(|c| c.is_malformed()).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CaptureKind {
    Sample,
    Coordinates,
}

struct Capture {
    kind: CaptureKind,
    depth: usize,
    text: String,
}

#[derive(Default)]
struct Scan {
    track: Vec<Coordinate>,
    line_string: Vec<Coordinate>,
    depth: usize,
    track_depth: usize,
    line_string_depth: usize,
    // only the first <coordinates> of a LineString is read
    line_string_read: bool,
    capture: Option<Capture>,
    saw_root: bool,
}

impl Scan {
    fn open(&mut self, name: &[u8]) {
        self.depth += 1;
        self.saw_root = true;
        match name {
            TRACK_TAG => self.track_depth += 1,
            LINE_STRING_TAG => {
                self.line_string_depth += 1;
                self.line_string_read = false;
            }
            SAMPLE_TAG if self.track_depth > 0 => self.begin(CaptureKind::Sample),
            COORDINATES_TAG if self.wants_coordinates() => {
                self.line_string_read = true;
                self.begin(CaptureKind::Coordinates);
            }
            _ => {}
        }
    }

    fn close(&mut self, name: &[u8]) {
        if self.capture.as_ref().is_some_and(|c| c.depth == self.depth) {
            if let Some(capture) = self.capture.take() {
                self.finish(capture.kind, &capture.text);
            }
        }
        match name {
            TRACK_TAG => self.track_depth = self.track_depth.saturating_sub(1),
            LINE_STRING_TAG => self.line_string_depth = self.line_string_depth.saturating_sub(1),
            _ => {}
        }
        self.depth = self.depth.saturating_sub(1);
    }

    fn empty(&mut self, name: &[u8]) {
        self.saw_root = true;
        match name {
            SAMPLE_TAG if self.track_depth > 0 && self.capture.is_none() => {
                self.finish(CaptureKind::Sample, "")
            }
            COORDINATES_TAG if self.wants_coordinates() => self.line_string_read = true,
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if let Some(capture) = self.capture.as_mut() {
            capture.text.push_str(text);
        }
    }

    fn wants_coordinates(&self) -> bool {
        self.line_string_depth > 0 && !self.line_string_read && self.capture.is_none()
    }

    fn begin(&mut self, kind: CaptureKind) {
        if self.capture.is_none() {
            self.capture = Some(Capture {
                kind,
                depth: self.depth,
                text: String::new(),
            });
        }
    }

    fn finish(&mut self, kind: CaptureKind, text: &str) {
        match kind {
            CaptureKind::Sample => self.track.push(parse_track_sample(text)),
            CaptureKind::Coordinates => self.line_string.extend(parse_line_string(text)),
        }
    }

    fn into_extraction(self) -> Extraction {
        if !self.track.is_empty() {
            Extraction {
                schema: Some(Schema::Track),
                path: self.track,
            }
        } else if !self.line_string.is_empty() {
            Extraction {
                schema: Some(Schema::LineString),
                path: self.line_string,
            }
        } else {
            Extraction {
                schema: None,
                path: Vec::new(),
            }
        }
    }
}

/// Extracts the combined path of a KML document, concatenating every track
/// (or, failing that, every line string) in document order.
pub fn extract_path(xml: &str) -> Result<Extraction, KmlError> {
    let mut reader = Reader::from_str(xml);
    let mut scan = Scan::default();

    loop {
        let event = reader.read_event().map_err(|err| KmlError::Malformed {
            position: reader.buffer_position() as u64,
            message: err.to_string(),
        })?;
        match event {
            Event::Start(e) => scan.open(e.name().as_ref()),
            Event::End(e) => scan.close(e.name().as_ref()),
            Event::Empty(e) => scan.empty(e.name().as_ref()),
            Event::Text(e) => {
                let text = e.unescape().map_err(|err| KmlError::Malformed {
                    position: reader.buffer_position() as u64,
                    message: err.to_string(),
                })?;
                scan.text(&text);
            }
            Event::CData(e) => scan.text(&String::from_utf8_lossy(&e.into_inner())),
            Event::Eof => break,
            _ => {}
        }
    }

    let position = reader.buffer_position() as u64;
    if !scan.saw_root {
        return Err(KmlError::Malformed {
            position,
            message: "document has no root element".into(),
        });
    }
    if scan.depth != 0 {
        return Err(KmlError::Malformed {
            position,
            message: format!("{} element(s) left unclosed", scan.depth),
        });
    }

    Ok(scan.into_extraction())
}

/// `"lon lat alt"` → (lat, lon). Missing or non-numeric fields become NaN.
fn parse_track_sample(text: &str) -> Coordinate {
    let mut fields = text.split_whitespace();
    let lon = parse_field(fields.next());
    let lat = parse_field(fields.next());
    Coordinate { lat, lon }
}

/// `"lon,lat[,alt] lon,lat[,alt] ..."`, one coordinate per token.
fn parse_line_string(text: &str) -> impl Iterator<Item = Coordinate> + '_ {
    text.split_whitespace().map(|token| {
        let mut fields = token.split(',');
        let lon = parse_field(fields.next());
        let lat = parse_field(fields.next());
        Coordinate { lat, lon }
    })
}

fn parse_field(field: Option<&str>) -> f64 {
    field
        .and_then(|f| f.trim().parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}
