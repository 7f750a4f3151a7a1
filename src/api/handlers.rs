//! API request handlers
//!
//! Bodies are decoded and validated here, before any store call. Missing
//! records become 404s here; the store itself only reports absence.

use crate::catalog::{self, FirmQuery, ResourceQuery, ReviewQuery};
use crate::error::ApiError;
use crate::types::{
    AdminLogin, NewPropFirm, NewResource, NewReview, NewUser, PropFirmUpdate, ResourceUpdate,
};
use crate::validation::Validate;
use crate::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};

type ApiResult<T> = Result<T, ApiError>;

const FIRM_NOT_FOUND: &str = "Prop firm not found";
const RESOURCE_NOT_FOUND: &str = "Resource not found";

// ==========================================
// Extraction Helpers
// ==========================================

fn parse_id(raw: &str, message: &str) -> ApiResult<i64> {
    raw.parse().map_err(|_| ApiError::BadRequest(message.to_string()))
}

fn firm_id(raw: &str) -> ApiResult<i64> {
    parse_id(raw, "Invalid firm ID")
}

fn resource_id(raw: &str) -> ApiResult<i64> {
    parse_id(raw, "Invalid resource ID")
}

/// Decode and validate a JSON body
fn validated<T: Validate>(payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    let Json(body) = payload?;
    body.validate()?;
    Ok(body)
}

fn query<T>(params: Result<Query<T>, QueryRejection>) -> ApiResult<T> {
    params
        .map(|Query(q)| q)
        .map_err(|e| ApiError::BadRequest(format!("Invalid query parameters: {}", e.body_text())))
}

#[derive(Debug, Deserialize)]
pub struct CompareQuery {
    #[serde(default)]
    pub ids: String,
}

// ==========================================
// Health Handlers
// ==========================================

pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

// ==========================================
// Firm Handlers
// ==========================================

pub async fn get_firms(
    State(state): State<Arc<AppState>>,
    params: Result<Query<FirmQuery>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let params = query(params)?;
    let firms = state.store.get_all_firms();
    if params.is_empty() {
        return Ok(Json(firms));
    }
    Ok(Json(params.apply(firms)))
}

pub async fn get_featured_firms(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.store.get_featured_firms())
}

pub async fn compare_firms(
    State(state): State<Arc<AppState>>,
    params: Result<Query<CompareQuery>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let params = query(params)?;
    let ids = catalog::compare_selection(&params.ids);
    Ok(Json(state.store.get_firms_by_ids(&ids)))
}

pub async fn get_firm(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = firm_id(&id)?;
    state
        .store
        .get_firm(id)
        .map(Json)
        .ok_or(ApiError::NotFound(FIRM_NOT_FOUND))
}

pub async fn create_firm(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewPropFirm>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let input = validated(payload)?;
    let firm = state.store.create_firm(input);
    Ok((StatusCode::CREATED, Json(firm)))
}

pub async fn update_firm(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<PropFirmUpdate>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let id = firm_id(&id)?;
    let updates = validated(payload)?;
    state
        .store
        .update_firm(id, updates)
        .map(Json)
        .ok_or(ApiError::NotFound(FIRM_NOT_FOUND))
}

pub async fn delete_firm(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = firm_id(&id)?;
    if state.store.delete_firm(id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(FIRM_NOT_FOUND))
    }
}

// ==========================================
// Review Handlers
// ==========================================

pub async fn get_firm_reviews(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = firm_id(&id)?;
    Ok(Json(state.store.get_reviews_by_firm(id)))
}

pub async fn get_reviews(
    State(state): State<Arc<AppState>>,
    params: Result<Query<ReviewQuery>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let params = query(params)?;
    Ok(Json(params.apply(state.store.get_all_reviews())))
}

pub async fn create_review(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewReview>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let input = validated(payload)?;
    let review = state.store.create_review(input);
    Ok((StatusCode::CREATED, Json(review)))
}

// ==========================================
// Resource Handlers
// ==========================================

pub async fn get_resources(
    State(state): State<Arc<AppState>>,
    params: Result<Query<ResourceQuery>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let params = query(params)?;
    Ok(Json(params.apply(state.store.get_all_resources())))
}

pub async fn get_resources_by_category(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
) -> impl IntoResponse {
    Json(state.store.get_resources_by_category(&category))
}

pub async fn get_resource(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = resource_id(&id)?;
    state
        .store
        .get_resource(id)
        .map(Json)
        .ok_or(ApiError::NotFound(RESOURCE_NOT_FOUND))
}

pub async fn create_resource(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewResource>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let input = validated(payload)?;
    let resource = state.store.create_resource(input);
    Ok((StatusCode::CREATED, Json(resource)))
}

pub async fn update_resource(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<ResourceUpdate>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let id = resource_id(&id)?;
    let updates = validated(payload)?;
    state
        .store
        .update_resource(id, updates)
        .map(Json)
        .ok_or(ApiError::NotFound(RESOURCE_NOT_FOUND))
}

pub async fn delete_resource(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = resource_id(&id)?;
    if state.store.delete_resource(id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(RESOURCE_NOT_FOUND))
    }
}

// ==========================================
// Auth Handlers
// ==========================================

pub async fn register(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let input = validated(payload)?;
    let user = state.store.create_user(input)?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn admin_login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AdminLogin>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(login) = payload?;
    if !state.store.verify_admin_credentials(&login.username, &login.password) {
        warn!("Failed admin login for '{}'", login.username);
        return Err(ApiError::InvalidCredentials);
    }
    info!("Admin '{}' logged in", login.username);
    Ok(Json(serde_json::json!({ "success": true })))
}
