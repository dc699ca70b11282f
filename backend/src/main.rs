use std::{error::Error, net::SocketAddr, sync::Arc};

use backend::{AppState, create_router, source::KmlDirectory};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_KML_DIR: &str = "kml";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "backend=debug,shared=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let kml_dir = std::env::var("KML_DIR").unwrap_or_else(|_| DEFAULT_KML_DIR.to_string());
    let kml = KmlDirectory::new(&kml_dir);
    match kml.list() {
        Ok(identifiers) => tracing::info!("serving {} KML document(s) from {kml_dir}", identifiers.len()),
        Err(err) => tracing::warn!("KML folder {kml_dir} not readable yet: {err}"),
    }

    let state = AppState { kml: Arc::new(kml) };
    let app = create_router(state);

    let addr: SocketAddr = std::env::var("BIND_ADDR")
        .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
        .parse()?;
    tracing::info!("starting backend on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
