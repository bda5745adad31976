// libs/doctor-cell/src/handlers.rs
use axum::{
    extract::{Extension, Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{CreateDoctorRequest, UpdateAvailabilityRequest};
use crate::state::DoctorState;

/// Public doctor listing for the booking front end.
#[axum::debug_handler]
pub async fn list_doctors(State(state): State<DoctorState>) -> Result<Json<Value>, AppError> {
    let doctors = state.directory.list().await;

    Ok(Json(json!({
        "success": true,
        "doctors": doctors,
    })))
}

#[axum::debug_handler]
pub async fn get_doctor(
    State(state): State<DoctorState>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let doctor = state
        .directory
        .get(doctor_id)
        .await
        .ok_or_else(|| AppError::NotFound("Doctor not found".to_string()))?;

    let booked_slots = state.ledger.booked_slots(doctor_id).await;

    Ok(Json(json!({
        "success": true,
        "doctor": doctor,
        "slots_booked": booked_slots,
    })))
}

#[axum::debug_handler]
pub async fn register_doctor(
    State(state): State<DoctorState>,
    Extension(user): Extension<User>,
    Json(request): Json<CreateDoctorRequest>,
) -> Result<Json<Value>, AppError> {
    if !user.is_admin() {
        return Err(AppError::Auth("Not authorized to register doctors".to_string()));
    }

    let doctor = state.directory.create(request).await;

    Ok(Json(json!({
        "success": true,
        "doctor": doctor,
        "message": "Doctor registered",
    })))
}

#[axum::debug_handler]
pub async fn change_availability(
    State(state): State<DoctorState>,
    Path(doctor_id): Path<Uuid>,
    Extension(user): Extension<User>,
    Json(request): Json<UpdateAvailabilityRequest>,
) -> Result<Json<Value>, AppError> {
    // Doctors may toggle their own flag; admins may toggle anyone's.
    let is_self = user.id == doctor_id.to_string();
    if !is_self && !user.is_admin() {
        return Err(AppError::Auth("Not authorized to change this doctor's availability".to_string()));
    }

    let doctor = state
        .directory
        .set_available(doctor_id, request.is_available)
        .await
        .ok_or_else(|| AppError::NotFound("Doctor not found".to_string()))?;

    Ok(Json(json!({
        "success": true,
        "doctor": doctor,
        "message": "Availability changed",
    })))
}
