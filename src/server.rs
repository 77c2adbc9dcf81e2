//! HTTP routes.
//!
//! Every handler is stateless apart from the injected upstream clients: it
//! validates the body, makes one or two upstream calls, reshapes the result
//! and returns JSON. Any failure ends the request with `{"error": ...}`.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{Method, header};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use log::info;
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::llm::Completion;
use crate::seo::{self, SeoSuggestions, Tags};
use crate::thumbnails::ThumbnailSet;
use crate::transcript::{self, NormalizedSegment};
use crate::youtube::VideoSource;
use crate::{extract_video_id, output, summarize};

/// Shared, read-only application state
#[derive(Clone)]
pub struct AppState {
    pub videos: Arc<dyn VideoSource>,
    pub llm: Arc<dyn Completion>,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(videos: Arc<dyn VideoSource>, llm: Arc<dyn Completion>, settings: Settings) -> Self {
        Self {
            videos,
            llm,
            settings: Arc::new(settings),
        }
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/transcript", post(transcript_handler))
        .route("/api/transcript/export", post(export_handler))
        .route("/api/summarize", post(summarize_handler))
        .route("/api/seo-enhance", post(seo_handler))
        .route("/api/thumbnails", post(thumbnails_handler))
        .route("/api/download-thumbnail", post(download_handler))
        .with_state(state)
        .layer(cors)
}

/// Bind to the configured address and serve until the process exits
pub async fn serve(state: AppState) -> eyre::Result<()> {
    let addr = format!("{}:{}", state.settings.host, state.settings.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{addr}");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

#[derive(Debug, Deserialize)]
struct UrlRequest {
    #[serde(default)]
    url: String,
}

#[derive(Debug, Deserialize)]
struct TranscriptRequest {
    #[serde(default)]
    url: String,
    #[serde(default)]
    query: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ExportRequest {
    #[serde(default)]
    url: String,
    #[serde(default)]
    timestamps: bool,
}

#[derive(Debug, Deserialize)]
struct SeoRequest {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    tags: Option<Tags>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DownloadRequest {
    #[serde(default)]
    image_url: String,
}

#[derive(Debug, Serialize)]
struct TranscriptResponse {
    transcript: Vec<NormalizedSegment>,
}

#[derive(Debug, Serialize)]
struct SummaryResponse {
    summary: String,
}

#[derive(Debug, Serialize)]
struct ThumbnailsResponse {
    thumbnails: ThumbnailSet,
    title: String,
}

async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn transcript_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<TranscriptRequest>, JsonRejection>,
) -> Result<Json<TranscriptResponse>> {
    let Json(req) = payload?;
    info!("Transcript request: {}", req.url);

    let video_id = extract_video_id(&req.url).ok_or(Error::InvalidUrl)?;
    let raw = state.videos.transcript(&video_id).await?;
    let mut segments = transcript::normalize(&raw);
    if let Some(query) = req.query.as_deref() {
        segments = transcript::search(segments, query);
    }

    Ok(Json(TranscriptResponse { transcript: segments }))
}

async fn export_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ExportRequest>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(req) = payload?;
    info!("Transcript export request: {} (timestamps: {})", req.url, req.timestamps);

    let video_id = extract_video_id(&req.url).ok_or(Error::InvalidUrl)?;
    let raw = state.videos.transcript(&video_id).await?;
    let text = output::render_text(&transcript::normalize(&raw), req.timestamps);

    Ok(([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], text))
}

async fn summarize_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<UrlRequest>, JsonRejection>,
) -> Result<Json<SummaryResponse>> {
    let Json(req) = payload?;
    info!("Summary request: {}", req.url);

    let video_id = extract_video_id(&req.url).ok_or(Error::InvalidUrl)?;
    let raw = state.videos.transcript(&video_id).await?;
    let summary = summarize::summarize(
        state.llm.as_ref(),
        &transcript::full_text(&raw),
        &state.settings.summary_model,
    )
    .await?;

    Ok(Json(SummaryResponse { summary }))
}

async fn seo_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<SeoRequest>, JsonRejection>,
) -> Result<Json<SeoSuggestions>> {
    let Json(req) = payload?;

    let (Some(title), Some(description)) = (
        req.title.filter(|t| !t.is_empty()),
        req.description.filter(|d| !d.is_empty()),
    ) else {
        return Err(Error::MissingFields("Title and description are required".to_string()));
    };
    info!("SEO request for title {title:?}");

    let suggestions = seo::enhance(
        state.llm.as_ref(),
        &title,
        &description,
        req.tags.as_ref(),
        &state.settings.seo_model,
    )
    .await?;

    Ok(Json(suggestions))
}

async fn thumbnails_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<UrlRequest>, JsonRejection>,
) -> Result<Json<ThumbnailsResponse>> {
    let Json(req) = payload?;
    info!("Thumbnail request: {}", req.url);

    let video_id = extract_video_id(&req.url).ok_or(Error::InvalidUrl)?;
    let thumbnails = ThumbnailSet::for_video(&video_id);
    let title = state.videos.title(&video_id).await?;

    Ok(Json(ThumbnailsResponse { thumbnails, title }))
}

async fn download_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<DownloadRequest>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(req) = payload?;
    info!("Thumbnail download: {}", req.image_url);

    let bytes = state.videos.download(&req.image_url).await.map_err(Error::Download)?;

    Ok((
        [
            (header::CONTENT_TYPE, "image/jpeg"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"thumbnail.jpg\""),
        ],
        bytes,
    ))
}
