use axum::{
    extract::{Path, Query, State},
    response::Html,
    Extension, Json,
};
use petfinder_core::SpeciesFilter;
use serde::{Deserialize, Serialize};

use crate::controller::PetListing;
use crate::middleware::RequestId;
use crate::render::{render_cards, render_page};

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct PetQuery {
    #[serde(rename = "type")]
    pub species: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct AdoptData {
    pet: String,
    message: String,
}

fn parse_filter(req_id: &RequestId, query: &PetQuery) -> Result<SpeciesFilter, ApiError> {
    SpeciesFilter::from_param(query.species.as_deref())
        .map_err(|e| ApiError::new(req_id.0.clone(), "bad_request", e.to_string()))
}

/// Full page. Every page view runs a fresh load cycle.
pub(super) async fn index(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<PetQuery>,
) -> Result<Html<String>, ApiError> {
    let filter = parse_filter(&req_id, &query)?;
    state.controller.load().await;
    let listing = state.controller.listing(filter).await;
    Ok(Html(render_page(&listing)))
}

/// Card fragment for the current session list.
pub(super) async fn fragment(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<PetQuery>,
) -> Result<Html<String>, ApiError> {
    let filter = parse_filter(&req_id, &query)?;
    let listing = state.controller.listing(filter).await;
    Ok(Html(render_cards(&listing.pets)))
}

pub(super) async fn list_pets(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<PetQuery>,
) -> Result<Json<ApiResponse<PetListing>>, ApiError> {
    let filter = parse_filter(&req_id, &query)?;
    let data = state.controller.listing(filter).await;
    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// Confirms interest only; nothing is recorded.
pub(super) async fn adopt_pet(
    Extension(req_id): Extension<RequestId>,
    Path(name): Path<String>,
) -> Result<Json<ApiResponse<AdoptData>>, ApiError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "pet name must not be empty",
        ));
    }

    tracing::info!(pet = %name, "adoption interest");
    Ok(Json(ApiResponse {
        data: AdoptData {
            pet: name.to_owned(),
            message: format!(
                "Great choice! You showed interest in adopting {name}. \
                 In a real application we would get in touch with you!"
            ),
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}
