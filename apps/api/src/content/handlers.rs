//! Axum route handlers for stored content. Every route is owner-scoped:
//! another owner's record answers exactly like a missing one.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::content::archive::{build_archive, content_disposition};
use crate::content::lifecycle::{ContentSummary, Page, PageRequest};
use crate::errors::AppError;
use crate::generation::bundle::GeneratedBundle;
use crate::generation::generator::{
    enhance_description, generate_short_version, EnhancedDescription,
};
use crate::generation::prompts::Language;
use crate::models::content::ContentRecord;
use crate::routes::owner::OwnerId;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ShortVersionRequest {
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DescriptionRequest {
    #[serde(default)]
    pub with_audio: bool,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub total: i64,
}

fn language(tag: &Option<String>) -> Language {
    Language::from_tag(tag.as_deref().unwrap_or_default())
}

fn not_found(content_id: Uuid) -> AppError {
    AppError::NotFound(format!("Content {content_id} not found"))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/content?page=&size=
pub async fn handle_list_content(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Query(page): Query<PageRequest>,
) -> Result<Json<Page<ContentSummary>>, AppError> {
    let page = state.lifecycle.list_summaries(owner_id, page).await?;
    Ok(Json(page))
}

/// GET /api/v1/content/count
pub async fn handle_count_content(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
) -> Result<Json<CountResponse>, AppError> {
    let total = state.lifecycle.count(owner_id).await?;
    Ok(Json(CountResponse { total }))
}

/// GET /api/v1/content/:id
pub async fn handle_get_content(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Path(content_id): Path<Uuid>,
) -> Result<Json<ContentRecord>, AppError> {
    let record = state
        .lifecycle
        .get_owned(content_id, owner_id)
        .await?
        .ok_or_else(|| not_found(content_id))?;
    Ok(Json(record))
}

/// DELETE /api/v1/content/:id
pub async fn handle_delete_content(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Path(content_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.lifecycle.delete(content_id, owner_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(content_id))
    }
}

/// GET /api/v1/content/:id/download
///
/// Streams the zip package as an attachment.
pub async fn handle_download_content(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Path(content_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let record = state
        .lifecycle
        .get_owned(content_id, owner_id)
        .await?
        .ok_or_else(|| not_found(content_id))?;

    let package = build_archive(&record, state.blobs.as_ref())
        .await
        .map_err(|e| AppError::Internal(e.into()))?;
    info!(
        "Packaged content {content_id} as {} ({} bytes)",
        package.filename,
        package.bytes.len()
    );

    let disposition = content_disposition(&package.filename);
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        package.bytes,
    )
        .into_response())
}

/// POST /api/v1/content/:id/short-version
pub async fn handle_short_version(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Path(content_id): Path<Uuid>,
    Json(request): Json<ShortVersionRequest>,
) -> Result<Json<GeneratedBundle>, AppError> {
    let bundle =
        generate_short_version(&state, owner_id, content_id, language(&request.language)).await?;
    Ok(Json(bundle))
}

/// POST /api/v1/content/:id/description
pub async fn handle_enhance_description(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Path(content_id): Path<Uuid>,
    Json(request): Json<DescriptionRequest>,
) -> Result<Json<EnhancedDescription>, AppError> {
    let result = enhance_description(
        &state,
        owner_id,
        content_id,
        request.with_audio,
        language(&request.language),
    )
    .await?;
    Ok(Json(result))
}
