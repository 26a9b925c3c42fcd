use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use http::StatusCode;
use serde::Serialize;
use serde_json::json;
use tracing::error;

use crate::content::client::VersesQuery;
use crate::content::error::ContentError;
use crate::server::server::AppState;

/// Local response envelope around upstream data
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self { success: true, data: Some(data), error: None }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self { success: false, data: None, error: Some(error.into()) }
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/api/surah", get(chapters))
        .route("/api/verses/{chapter_number}", get(verses))
        .route("/api/footnote/{id}", get(footnote))
        .route("/api/recitations", get(recitations))
        .route("/api/translations", get(translations))
        .route("/api/languages", get(languages))
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn chapters(State(state): State<AppState>) -> Response {
    respond("chapter list", state.content.chapters().await)
}

async fn verses(
    State(state): State<AppState>,
    chapter: Result<Path<u32>, PathRejection>,
    query: Result<Query<VersesQuery>, QueryRejection>,
) -> Response {
    let chapter = match chapter {
        Ok(Path(chapter)) if chapter > 0 => chapter,
        Ok(Path(chapter)) => return bad_request(format!("invalid chapter number {}", chapter)),
        Err(rejection) => return bad_request(rejection.body_text()),
    };
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => return bad_request(rejection.body_text()),
    };
    respond("verses", state.content.verses_by_chapter(chapter, &query).await)
}

async fn footnote(State(state): State<AppState>, id: Result<Path<u64>, PathRejection>) -> Response {
    match id {
        Ok(Path(id)) => respond("footnote", state.content.footnote(id).await),
        Err(rejection) => bad_request(rejection.body_text()),
    }
}

async fn recitations(State(state): State<AppState>) -> Response {
    respond("recitations", state.content.recitations().await)
}

async fn translations(State(state): State<AppState>) -> Response {
    respond("translations", state.content.translations().await)
}

async fn languages(State(state): State<AppState>) -> Response {
    respond("languages", state.content.languages().await)
}

fn respond<T: Serialize>(what: &str, result: Result<T, ContentError>) -> Response {
    match result {
        Ok(data) => (StatusCode::OK, Json(Envelope::ok(data))).into_response(),
        Err(err) => {
            error!("{} fetch failed: {}", what, err);
            (err.status_code(), Json(Envelope::<()>::failed(err.to_string()))).into_response()
        }
    }
}

fn bad_request(message: String) -> Response {
    (StatusCode::BAD_REQUEST, Json(Envelope::<()>::failed(message))).into_response()
}
