use crate::error::AppError;
use crate::state::SharedState;
use axum::body::Body;
use axum::extract::{Path, Request, State};
use axum::response::{Html, Response};
use axum::Json;
use reelindex_core::{FolderListing, MediaRecord, ReelError};
use serde::Serialize;
use std::time::Instant;
use tower_http::services::ServeFile;

const INDEX_HTML: &str = include_str!("../static/index.html");

// GET /
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

// GET /api/folder and /api/folder/
pub async fn browse_root(State(state): State<SharedState>) -> Result<Json<FolderListing>, AppError> {
    browse_folder(state, String::new()).await
}

// GET /api/folder/{*path}
pub async fn browse(
    State(state): State<SharedState>,
    Path(path): Path<String>,
) -> Result<Json<FolderListing>, AppError> {
    browse_folder(state, path).await
}

async fn browse_folder(state: SharedState, path: String) -> Result<Json<FolderListing>, AppError> {
    let start = Instant::now();
    let listing = state
        .read(move |store| reelindex_core::resolve(store, &path))
        .await?;

    tracing::info!(
        cwd = %listing.cwd,
        folders = listing.folders.len(),
        files = listing.files.len(),
        duration_ms = start.elapsed().as_millis() as u64,
        "GET /api/folder"
    );
    Ok(Json(listing))
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub results: Vec<MediaRecord>,
}

// GET /api/search/{name}
pub async fn search(
    State(state): State<SharedState>,
    Path(name): Path<String>,
) -> Result<Json<SearchResponse>, AppError> {
    let start = Instant::now();
    let needle = name.clone();
    let results = state
        .read(move |store| reelindex_core::search(store, &needle))
        .await?;

    tracing::info!(
        query = %name,
        results = results.len(),
        duration_ms = start.elapsed().as_millis() as u64,
        "GET /api/search"
    );
    Ok(Json(SearchResponse { results }))
}

// GET /api/search and /api/search/
pub async fn search_empty() -> AppError {
    AppError::from(ReelError::EmptyQuery)
}

#[derive(Serialize)]
pub struct FileResponse {
    pub file: MediaRecord,
}

// GET /api/file/{name}
pub async fn file(
    State(state): State<SharedState>,
    Path(name): Path<String>,
) -> Result<Json<FileResponse>, AppError> {
    let lookup = name.clone();
    let found = state
        .read(move |store| reelindex_core::find(store, &lookup))
        .await?;

    match found {
        Some(file) => Ok(Json(FileResponse { file })),
        None => Err(AppError::not_found(&format!("file {name}"))),
    }
}

// GET /media/{*path}
//
// Only paths present in the index are served; anything else under the scan
// root (the database, config files) is a 404.
pub async fn media(
    State(state): State<SharedState>,
    Path(path): Path<String>,
    request: Request,
) -> Result<Response, AppError> {
    let lookup = path.trim_start_matches('/').to_string();
    let record = state
        .read(move |store| store.find_by_path(&lookup))
        .await?
        .ok_or_else(|| AppError::not_found(&format!("media {path}")))?;

    let mut serve = ServeFile::new(state.media_root.join(&record.path));
    let response = serve
        .try_call(request)
        .await
        .map_err(AppError::internal)?;
    Ok(response.map(Body::new))
}
