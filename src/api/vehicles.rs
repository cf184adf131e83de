//! Vehicle API endpoints
//!
//! Handles HTTP requests for vehicle records:
//! - GET /api/vehicles - List vehicles, newest first
//! - POST /api/vehicles - Create a vehicle
//! - POST /api/update-status - Overwrite a vehicle's status
//! - POST /api/update-mintrans - Overwrite the permit flag
//! - POST /api/update-flags - Overwrite both permit flags
//! - DELETE /api/vehicles/{id} - Delete a vehicle
//!
//! All routes require authentication. Updates against a missing id succeed
//! silently without touching anything.

use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::api::middleware::{ApiError, AppState, AuthenticatedUser};
use crate::api::responses::OkResponse;
use crate::models::{NewVehicle, Vehicle};

/// Request body for status updates
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub id: i64,
    pub status: String,
}

/// Request body for permit updates
#[derive(Debug, Deserialize)]
pub struct UpdateMintransRequest {
    pub id: i64,
    pub value: bool,
}

/// Request body for bulk flag updates
#[derive(Debug, Deserialize)]
pub struct UpdateFlagsRequest {
    pub id: i64,
    pub mintrans_permit: bool,
    pub escort_received: bool,
}

/// Build the vehicle router (wrapped by the auth gate in api::build_router)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/vehicles", get(list_vehicles).post(create_vehicle))
        .route("/vehicles/{id}", delete(delete_vehicle))
        .route("/update-status", post(update_status))
        .route("/update-mintrans", post(update_mintrans))
        .route("/update-flags", post(update_flags))
}

/// GET /api/vehicles - List all vehicles, most recently created first
async fn list_vehicles(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<Json<Vec<Vehicle>>, ApiError> {
    let vehicles = state.vehicle_service.list().await?;
    Ok(Json(vehicles))
}

/// POST /api/vehicles - Create a vehicle record
///
/// Returns the full created record including its generated id.
async fn create_vehicle(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Json(body): Json<NewVehicle>,
) -> Result<Json<Vehicle>, ApiError> {
    let vehicle = state.vehicle_service.create(body).await?;
    Ok(Json(vehicle))
}

/// POST /api/update-status - Overwrite a vehicle's status
async fn update_status(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<Json<OkResponse>, ApiError> {
    state
        .vehicle_service
        .update_status(body.id, &body.status)
        .await?;

    Ok(Json(OkResponse::new()))
}

/// POST /api/update-mintrans - Overwrite the mintrans_permit flag
async fn update_mintrans(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Json(body): Json<UpdateMintransRequest>,
) -> Result<Json<OkResponse>, ApiError> {
    state
        .vehicle_service
        .update_permit(body.id, body.value)
        .await?;

    Ok(Json(OkResponse::new()))
}

/// POST /api/update-flags - Overwrite both permit flags together
async fn update_flags(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Json(body): Json<UpdateFlagsRequest>,
) -> Result<Json<OkResponse>, ApiError> {
    state
        .vehicle_service
        .update_flags(body.id, body.mintrans_permit, body.escort_received)
        .await?;

    Ok(Json(OkResponse::new()))
}

/// DELETE /api/vehicles/{id} - Delete a vehicle record
async fn delete_vehicle(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<Json<OkResponse>, ApiError> {
    state.vehicle_service.delete(id).await?;
    Ok(Json(OkResponse::new()))
}
