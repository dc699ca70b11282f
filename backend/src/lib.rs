pub mod error;
pub mod gpx_export;
pub mod html_export;
pub mod models;
pub mod source;

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::gpx_export::encode_path_as_gpx;
use crate::models::{ApiError, GpxResponse, PathsResponse};
use crate::source::KmlDirectory;

#[derive(Clone)]
pub struct AppState {
    pub kml: Arc<KmlDirectory>,
}

type ApiResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

pub fn create_router(state: AppState) -> Router {
    let documents = ServeDir::new(state.kml.root());
    Router::new()
        .route("/api/kml", get(list_handler))
        .route("/api/paths", get(paths_handler))
        .route("/api/paths/:name/gpx", get(gpx_handler))
        .nest_service("/kml", documents)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /api/kml - document identifiers, in the order the map should load them
async fn list_handler(State(state): State<AppState>) -> ApiResult<Json<Vec<String>>> {
    let kml = state.kml.clone();
    let identifiers = tokio::task::spawn_blocking(move || kml.list())
        .await
        .map_err(|err| api_error(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()))?
        .map_err(|err| {
            tracing::error!("failed to list KML documents: {err}");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        })?;
    Ok(Json(identifiers))
}

/// GET /api/paths - every extracted path with its summary
async fn paths_handler(State(state): State<AppState>) -> ApiResult<Response> {
    let kml = state.kml.clone();
    let (collection, report) = tokio::task::spawn_blocking(move || kml.load_collection())
        .await
        .map_err(|err| api_error(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()))?;
    Ok(Json(PathsResponse::new(&collection, report)).into_response())
}

/// GET /api/paths/:name/gpx - first path with that name as base64 GPX
async fn gpx_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<GpxResponse>> {
    let kml = state.kml.clone();
    let (collection, _) = tokio::task::spawn_blocking(move || kml.load_collection())
        .await
        .map_err(|err| api_error(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()))?;

    let path = collection.find(&name).ok_or_else(|| {
        api_error(StatusCode::NOT_FOUND, format!("no path named {name:?}"))
    })?;
    let gpx_base64 = encode_path_as_gpx(path)
        .map_err(|err| api_error(StatusCode::UNPROCESSABLE_ENTITY, err.to_string()))?;

    Ok(Json(GpxResponse { name, gpx_base64 }))
}

fn api_error(status: StatusCode, message: String) -> (StatusCode, Json<ApiError>) {
    (status, Json(ApiError { message }))
}
