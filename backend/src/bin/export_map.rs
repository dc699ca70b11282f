use std::path::PathBuf;

use backend::{html_export::render_map_html, source::KmlDirectory};
use clap::Parser;
use shared::{Coordinate, MapView};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Write every KML flight of a folder into one Leaflet HTML map"
)]
struct Args {
    /// Folder holding the .kml files (and optionally kml_files.json)
    #[arg(long, default_value = "kml")]
    kml_dir: PathBuf,

    /// Output HTML file, defaults to combined_flight_map.html inside the KML folder
    #[arg(long)]
    output: Option<PathBuf>,

    /// Initial map center latitude
    #[arg(long, default_value_t = 52.0)]
    center_lat: f64,
    #[arg(long, default_value_t = 19.0)]
    center_lon: f64,
    #[arg(long, default_value_t = 6)]
    zoom: u8,
}

impl Args {
    fn view(&self) -> MapView {
        MapView {
            center: Coordinate::new(self.center_lat, self.center_lon),
            zoom: self.zoom,
        }
    }

    fn output(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| self.kml_dir.join("combined_flight_map.html"))
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let (collection, report) = KmlDirectory::new(&args.kml_dir).load_collection();
    tracing::info!(
        "paths={} unavailable={} malformed={} empty={}",
        collection.len(),
        report.unavailable,
        report.malformed,
        report.empty
    );

    let output = args.output();
    std::fs::write(&output, render_map_html(&collection, args.view()))?;
    tracing::info!("combined map saved to {:?}", output);

    Ok(())
}
