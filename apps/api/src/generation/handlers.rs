//! Axum route handlers for the Generation API.

use axum::{extract::State, Json};

use crate::errors::AppError;
use crate::generation::bundle::GeneratedBundle;
use crate::generation::duration::{
    duration_options, duration_options_by_category, DurationGroup, DurationOption,
};
use crate::generation::generator::generate_content;
use crate::generation::request::GenerationRequest;
use crate::generation::style_catalog::PersonaCatalog;
use crate::routes::owner::OwnerId;
use crate::state::AppState;

/// POST /api/v1/content/generate
///
/// Runs the whole pipeline. Model failures come back as a 200 with an
/// `ERROR` bundle; only invalid requests are rejected with 400.
pub async fn handle_generate(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Json(request): Json<GenerationRequest>,
) -> Result<Json<GeneratedBundle>, AppError> {
    let bundle = generate_content(&state, owner_id, request).await?;
    Ok(Json(bundle))
}

/// GET /api/v1/durations
pub async fn handle_list_durations() -> Json<Vec<DurationOption>> {
    Json(duration_options())
}

/// GET /api/v1/durations/by-category
pub async fn handle_durations_by_category() -> Json<Vec<DurationGroup>> {
    Json(duration_options_by_category())
}

/// GET /api/v1/personas
///
/// Only personas with a registered handler are advertised.
pub async fn handle_list_personas(State(state): State<AppState>) -> Json<Vec<PersonaCatalog>> {
    let served = state.registry.personas();
    Json(
        state
            .catalog
            .listing()
            .into_iter()
            .filter(|entry| served.contains(&entry.persona))
            .collect(),
    )
}
